//! Descriptor derivation from Rust types.
//!
//! [`Describe`] is the type-annotation analogue for a language without
//! runtime reflection: the annotation is the Rust type itself, and the
//! descriptor is assembled structurally through trait impls. Container
//! impls recurse into their type parameters, so `Option<Vec<i64>>` yields a
//! union of a list-of-int and the null type without any special casing.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::descriptor::TypeDescriptor;

/// Types that can derive their canonical [`TypeDescriptor`].
///
/// Implemented for the primitive types, for the supported containers
/// (`Option`, `Vec`, slices, `HashMap`, `BTreeMap`), and for user-defined
/// types through `#[derive(Describe)]`, which describe themselves as a
/// named leaf. Shapes outside that grammar (tuples, trait
/// objects, function types) deliberately have no impl; the missing-impl
/// compile error is the fail-fast policy for unsupported annotations.
pub trait Describe {
    /// Returns the descriptor tree for this type.
    fn descriptor() -> TypeDescriptor;
}

/// Derives the descriptor for `T`.
///
/// Free-function spelling of [`Describe::descriptor`], convenient at call
/// sites that would otherwise need a fully qualified path.
#[must_use]
pub fn descriptor_of<T: Describe + ?Sized>() -> TypeDescriptor {
    T::descriptor()
}

macro_rules! describe_leaf {
    ($name:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::Named($name.to_owned())
                }
            }
        )+
    };
}

describe_leaf!("int" => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
describe_leaf!("float" => f32, f64);
describe_leaf!("str" => String, str, char);
describe_leaf!("bool" => bool);

impl Describe for () {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::None
    }
}

/// `Value` admits any JSON shape, the unconstrained annotation.
impl Describe for Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Named("Any".to_owned())
    }
}

/// An optional type is an ordinary two-member union whose second member is
/// the null type; it is never collapsed into a dedicated "optional" kind.
impl<T: Describe> Describe for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::union([T::descriptor(), TypeDescriptor::None])
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::list(T::descriptor())
    }
}

impl<T: Describe> Describe for [T] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::list(T::descriptor())
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::dict(K::descriptor(), V::descriptor())
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::dict(K::descriptor(), V::descriptor())
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}
