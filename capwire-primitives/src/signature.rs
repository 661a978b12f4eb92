//! Captured function signatures advertised to invocation layers.

use serde::{Deserialize, Serialize};

use crate::describe::Describe;
use crate::descriptor::TypeDescriptor;

/// A named parameter paired with its type descriptor.
///
/// Serialized as the two-element tuple `[name, descriptor]`; parameter
/// position within a signature's `args` is semantically significant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, TypeDescriptor)", into = "(String, TypeDescriptor)")]
pub struct ParameterDescriptor {
    name: String,
    descriptor: TypeDescriptor,
}

impl ParameterDescriptor {
    /// Creates a parameter descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter's type descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}

impl From<(String, TypeDescriptor)> for ParameterDescriptor {
    fn from((name, descriptor): (String, TypeDescriptor)) -> Self {
        Self { name, descriptor }
    }
}

impl From<ParameterDescriptor> for (String, TypeDescriptor) {
    fn from(value: ParameterDescriptor) -> Self {
        (value.name, value.descriptor)
    }
}

/// Snapshot of a function's declared signature.
///
/// Constructed once at capture time and never mutated afterwards. A
/// function with no parameters has an empty `args` sequence, not an absent
/// one.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SignatureRecord {
    name: String,
    args: Vec<ParameterDescriptor>,
    return_type: TypeDescriptor,
}

impl SignatureRecord {
    /// Starts building a signature for the named function.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SignatureBuilder {
        SignatureBuilder {
            name: name.into(),
            args: Vec::new(),
            return_type: TypeDescriptor::Unannotated,
        }
    }

    /// Returns the function's identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameters in declaration order.
    #[must_use]
    pub fn args(&self) -> &[ParameterDescriptor] {
        &self.args
    }

    /// Returns the return type descriptor.
    #[must_use]
    pub fn return_type(&self) -> &TypeDescriptor {
        &self.return_type
    }
}

/// Builder for [`SignatureRecord`].
///
/// Parameters are appended in call order, which becomes the advertised
/// declaration order. A builder that never sees a `returns` call keeps the
/// absent-annotation return descriptor, mirroring an unannotated return.
#[derive(Debug)]
pub struct SignatureBuilder {
    name: String,
    args: Vec<ParameterDescriptor>,
    return_type: TypeDescriptor,
}

impl SignatureBuilder {
    /// Appends a parameter whose type derives its own descriptor.
    #[must_use]
    pub fn param<T: Describe + ?Sized>(self, name: impl Into<String>) -> Self {
        self.param_with(name, T::descriptor())
    }

    /// Appends a parameter with an explicit descriptor.
    #[must_use]
    pub fn param_with(mut self, name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        self.args.push(ParameterDescriptor::new(name, descriptor));
        self
    }

    /// Appends a parameter that carries no annotation.
    #[must_use]
    pub fn param_untyped(self, name: impl Into<String>) -> Self {
        self.param_with(name, TypeDescriptor::Unannotated)
    }

    /// Sets the return descriptor from the given type.
    #[must_use]
    pub fn returns<T: Describe + ?Sized>(self) -> Self {
        self.returns_with(T::descriptor())
    }

    /// Sets an explicit return descriptor.
    #[must_use]
    pub fn returns_with(mut self, descriptor: TypeDescriptor) -> Self {
        self.return_type = descriptor;
        self
    }

    /// Finalises the record.
    #[must_use]
    pub fn build(self) -> SignatureRecord {
        SignatureRecord {
            name: self.name,
            args: self.args,
            return_type: self.return_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn zero_parameter_signature_has_empty_args() {
        let signature = SignatureRecord::builder("tick").returns::<i64>().build();
        let value = serde_json::to_value(&signature).expect("serialize");
        assert_eq!(value["args"], json!([]));
        assert_eq!(value["return_type"], json!({ "type_name": "int" }));
    }

    #[test]
    fn parameters_keep_declaration_order() {
        let signature = SignatureRecord::builder("mix")
            .param::<String>("text")
            .param::<i64>("count")
            .param::<bool>("loud")
            .build();
        let names: Vec<_> = signature.args().iter().map(ParameterDescriptor::name).collect();
        assert_eq!(names, ["text", "count", "loud"]);
    }

    #[test]
    fn untyped_positions_only_affect_themselves() {
        let signature = SignatureRecord::builder("partial")
            .param::<i64>("a")
            .param_untyped("b")
            .build();
        assert_eq!(signature.args()[0].descriptor(), &TypeDescriptor::named("int"));
        assert_eq!(signature.args()[1].descriptor(), &TypeDescriptor::Unannotated);
    }

    #[test]
    fn default_return_is_the_absent_annotation() {
        let signature = SignatureRecord::builder("fire_and_forget").build();
        assert_eq!(signature.return_type(), &TypeDescriptor::Unannotated);
    }

    #[test]
    fn wire_shape_matches_the_consumer_contract() {
        let signature = SignatureRecord::builder("add")
            .param::<i64>("a")
            .param::<i64>("b")
            .returns::<i64>()
            .build();
        assert_eq!(
            serde_json::to_value(&signature).expect("serialize"),
            json!({
                "name": "add",
                "args": [
                    ["a", { "type_name": "int" }],
                    ["b", { "type_name": "int" }],
                ],
                "return_type": { "type_name": "int" },
            })
        );
    }

    #[test]
    fn round_trips_through_the_wire_form() {
        let signature = SignatureRecord::builder("lookup")
            .param::<String>("key")
            .returns::<Option<Vec<f64>>>()
            .build();
        let encoded = serde_json::to_string(&signature).expect("serialize");
        let decoded: SignatureRecord = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(decoded, signature);
    }
}
