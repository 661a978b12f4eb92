//! Capability registration and invocation runtime.
//!
//! The registry stores capabilities keyed by function name, each entry
//! pairing the captured signature with a type-erased executor invoked over
//! JSON values. Registries are explicit, caller-owned objects: construct
//! one, pass it by reference to whichever subsystem registers or queries
//! capabilities, and drop it when done. Capabilities annotated with
//! `#[capability]` can additionally be collected at startup through
//! [`CapabilityRegistry::install_discovered`].

#![warn(missing_docs, clippy::pedantic)]

mod args;
mod discovery;
mod registry;

/// Argument decoding helpers used by generated executors.
pub use args::{decode_arg, encode_output};
/// Link-time discovery entry submitted by the `#[capability]` macro.
pub use discovery::DiscoveredCapability;
/// Registry, handles, bindings, and the capability error type.
pub use registry::{
    Capability, CapabilityBinding, CapabilityError, CapabilityFuture, CapabilityHandle,
    CapabilityRegistry, CapabilityResult,
};
