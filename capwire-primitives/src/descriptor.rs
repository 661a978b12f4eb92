//! Canonical descriptor tree for parameter and return types.
//!
//! Descriptors are the data interchange format consumed by invocation
//! layers, so their wire shape is a contract: leaf kinds carry only a
//! `type_name` key, `Union` adds an `args` array of member descriptors in
//! declaration order, `List` adds a single element descriptor under `args`,
//! and `Dict` carries the key descriptor under `args` plus the value
//! descriptor under `values`. The hand-written serde impls below reproduce
//! exactly that shape, including the key-omission rules.

use serde::de;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Wire spelling of the explicit null type.
pub const NONE_TYPE_NAME: &str = "None";
/// Wire spelling of the absent-annotation sentinel.
pub const UNANNOTATED_TYPE_NAME: &str = "_empty";

const UNION_TYPE_NAME: &str = "Union";
const LIST_TYPE_NAME: &str = "List";
const DICT_TYPE_NAME: &str = "Dict";

/// Serializable tree describing one parameter or return type.
///
/// A descriptor is a finite, immutable tree: it is built fresh on every
/// derivation, never cached, and never mutated afterwards. Malformed shapes
/// (a leaf carrying nested descriptors, a `Dict` missing its value type)
/// are unrepresentable by construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeDescriptor {
    /// Plain leaf type: a primitive canonical name, a user-defined type
    /// name, or `"Any"` for the unconstrained type.
    Named(String),
    /// Explicit null type.
    None,
    /// Absent annotation, distinct from the explicit null type and from the
    /// unconstrained `"Any"` type.
    Unannotated,
    /// Alternative types in declaration order. Members are kept verbatim:
    /// no deduplication, no flattening of nested unions.
    Union(Vec<TypeDescriptor>),
    /// Homogeneous sequence of one element type.
    List(Box<TypeDescriptor>),
    /// Mapping of one key type to one value type.
    Dict {
        /// Key type descriptor.
        key: Box<TypeDescriptor>,
        /// Value type descriptor.
        value: Box<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// Creates a leaf descriptor for a plain named type.
    ///
    /// The reserved spellings [`NONE_TYPE_NAME`] and [`UNANNOTATED_TYPE_NAME`]
    /// normalize onto their dedicated kinds so one wire form never has two
    /// in-memory representations.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            NONE_TYPE_NAME => Self::None,
            UNANNOTATED_TYPE_NAME => Self::Unannotated,
            _ => Self::Named(name),
        }
    }

    /// Creates a union of the given members, preserving their order.
    #[must_use]
    pub fn union(members: impl IntoIterator<Item = Self>) -> Self {
        Self::Union(members.into_iter().collect())
    }

    /// Creates a sequence descriptor from its element type.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// Creates a mapping descriptor from its key and value types.
    #[must_use]
    pub fn dict(key: Self, value: Self) -> Self {
        Self::Dict {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Returns the canonical `type_name` for this node.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::None => NONE_TYPE_NAME,
            Self::Unannotated => UNANNOTATED_TYPE_NAME,
            Self::Union(_) => UNION_TYPE_NAME,
            Self::List(_) => LIST_TYPE_NAME,
            Self::Dict { .. } => DICT_TYPE_NAME,
        }
    }

    /// Returns `true` for kinds that carry no nested descriptors.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Named(_) | Self::None | Self::Unannotated)
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Union(members) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type_name", UNION_TYPE_NAME)?;
                map.serialize_entry("args", members)?;
                map.end()
            }
            Self::List(element) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type_name", LIST_TYPE_NAME)?;
                map.serialize_entry("args", element.as_ref())?;
                map.end()
            }
            Self::Dict { key, value } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type_name", DICT_TYPE_NAME)?;
                map.serialize_entry("args", key.as_ref())?;
                map.serialize_entry("values", value.as_ref())?;
                map.end()
            }
            leaf => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type_name", leaf.type_name())?;
                map.end()
            }
        }
    }
}

/// Loosely-typed mirror of the wire form, validated in [`TryFrom`].
#[derive(Deserialize)]
struct RawDescriptor {
    type_name: String,
    #[serde(default)]
    args: Option<RawArgs>,
    #[serde(default)]
    values: Option<Box<RawDescriptor>>,
}

/// `args` holds an array for `Union` but a single descriptor for `List`
/// and `Dict`; the variant order matters for untagged resolution.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawArgs {
    Many(Vec<RawDescriptor>),
    One(Box<RawDescriptor>),
}

impl TryFrom<RawDescriptor> for TypeDescriptor {
    type Error = Error;

    fn try_from(raw: RawDescriptor) -> Result<Self> {
        let RawDescriptor {
            type_name,
            args,
            values,
        } = raw;

        match type_name.as_str() {
            UNION_TYPE_NAME => {
                if values.is_some() {
                    return Err(shape_error(&type_name, "`values` is only valid on `Dict`"));
                }
                let Some(RawArgs::Many(members)) = args else {
                    return Err(shape_error(
                        &type_name,
                        "`args` must be an array of member descriptors",
                    ));
                };
                let members = members
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Union(members))
            }
            LIST_TYPE_NAME => {
                if values.is_some() {
                    return Err(shape_error(&type_name, "`values` is only valid on `Dict`"));
                }
                let Some(RawArgs::One(element)) = args else {
                    return Err(shape_error(
                        &type_name,
                        "`args` must be a single element descriptor",
                    ));
                };
                Ok(Self::list((*element).try_into()?))
            }
            DICT_TYPE_NAME => {
                let Some(RawArgs::One(key)) = args else {
                    return Err(shape_error(
                        &type_name,
                        "`args` must be a single key descriptor",
                    ));
                };
                let Some(value) = values else {
                    return Err(shape_error(
                        &type_name,
                        "`values` must carry the value descriptor",
                    ));
                };
                Ok(Self::dict((*key).try_into()?, (*value).try_into()?))
            }
            _ => {
                if args.is_some() || values.is_some() {
                    return Err(shape_error(
                        &type_name,
                        "leaf descriptors carry no `args` or `values`",
                    ));
                }
                Ok(Self::named(type_name))
            }
        }
    }
}

impl<'de> Deserialize<'de> for TypeDescriptor {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawDescriptor::deserialize(deserializer)?;
        Self::try_from(raw).map_err(de::Error::custom)
    }
}

fn shape_error(type_name: &str, reason: &str) -> Error {
    Error::UnsupportedShape {
        type_name: type_name.into(),
        reason: reason.into(),
    }
}
