//! JSON argument decoding for generated capability executors.
//!
//! Invocation layers send either an object keyed by parameter name or an
//! array of positional values. Decoding happens per declared parameter so
//! that error messages can name the capability and the offending parameter.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::registry::{CapabilityError, CapabilityResult};

/// Extracts and decodes one declared parameter from an invocation payload.
///
/// A missing entry decodes from JSON `null`, which succeeds only when the
/// declared type admits it; optional parameters may therefore be omitted
/// entirely.
///
/// # Errors
///
/// Returns [`CapabilityError::InvalidInput`] when the payload is neither an
/// object, an array, nor `null`, or when the entry does not decode into the
/// declared type.
pub fn decode_arg<T>(capability: &str, input: &Value, index: usize, name: &str) -> CapabilityResult<T>
where
    T: DeserializeOwned,
{
    let entry = match input {
        Value::Object(fields) => fields.get(name).cloned().unwrap_or(Value::Null),
        Value::Array(items) => items.get(index).cloned().unwrap_or(Value::Null),
        Value::Null => Value::Null,
        other => {
            return Err(CapabilityError::invalid_input(
                capability,
                format!("expected an object or array payload, got `{other}`"),
            ));
        }
    };

    serde_json::from_value(entry).map_err(|err| {
        CapabilityError::invalid_input(capability, format!("parameter `{name}`: {err}"))
    })
}

/// Serializes a capability's return value onto the wire.
///
/// # Errors
///
/// Returns [`CapabilityError::Execution`] when the value cannot be
/// represented as JSON.
pub fn encode_output<T: Serialize>(capability: &str, output: T) -> CapabilityResult<Value> {
    serde_json::to_value(output).map_err(|err| {
        CapabilityError::execution(format!(
            "capability `{capability}` produced unserializable output: {err}"
        ))
    })
}
