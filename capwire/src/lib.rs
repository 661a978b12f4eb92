//! Capability registration and signature advertisement SDK facade.
//!
//! Depend on this crate via `cargo add capwire`. It bundles the runtime
//! crates behind feature flags and re-exports the proc macros, whose
//! generated code resolves through this crate's paths.
//!
//! ```
//! use capwire::capability;
//! use capwire::registry::CapabilityRegistry;
//!
//! #[capability]
//! fn add(a: i64, b: i64) -> i64 {
//!     a + b
//! }
//!
//! fn main() {
//!     let registry = CapabilityRegistry::new();
//!     registry.register_binding(add_binding());
//!     assert!(registry.get("add").is_some());
//!     // Direct calls are unaffected by registration.
//!     assert_eq!(add(2, 3), 5);
//! }
//! ```

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use capwire_primitives as primitives;

/// Capability registry and invocation runtime (enabled by the `registry`
/// feature).
#[cfg(feature = "registry")]
pub use capwire_registry as registry;

/// `#[capability]` and `#[derive(Describe)]` (enabled by the `macros`
/// feature).
#[cfg(feature = "macros")]
pub use capwire_macros::{Describe, capability};

#[cfg(feature = "macros")]
#[doc(hidden)]
pub mod __private {
    pub use inventory;
    pub use serde_json;
}
