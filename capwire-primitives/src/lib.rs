//! Core shared types for capability advertisement.
//!
//! A capability is a plain function whose declared signature has been
//! captured as a serializable [`SignatureRecord`]: the function's name, its
//! parameters in declaration order, and its return type, each described by a
//! canonical [`TypeDescriptor`] tree. Invocation layers consume these
//! records to learn what arguments a function expects without inspecting
//! source code.

#![warn(missing_docs, clippy::pedantic)]

mod describe;
mod descriptor;
mod error;
mod signature;

/// Descriptor derivation trait and the free-function spelling of it.
pub use describe::{Describe, descriptor_of};
/// Canonical descriptor tree and the reserved wire spellings.
pub use descriptor::{NONE_TYPE_NAME, TypeDescriptor, UNANNOTATED_TYPE_NAME};
/// Error type and result alias shared across the SDK.
pub use error::{Error, Result};
/// Captured signatures and their builder.
pub use signature::{ParameterDescriptor, SignatureBuilder, SignatureRecord};
