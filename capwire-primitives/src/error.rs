//! Shared error definitions for capability primitives.

use thiserror::Error;

/// Result alias used throughout the capability runtime.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating descriptor types.
#[derive(Debug, Error)]
pub enum Error {
    /// A serialized descriptor did not match any supported shape.
    #[error("unsupported descriptor shape for `{type_name}`: {reason}")]
    UnsupportedShape {
        /// The `type_name` field of the offending descriptor.
        type_name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },
}
