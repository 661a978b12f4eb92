//! Link-time discovery of annotated capabilities.
//!
//! The `#[capability]` macro submits one [`DiscoveredCapability`] per
//! annotated function, the Rust-native counterpart of registration at
//! definition time. The registry object itself stays explicit and
//! caller-owned; discovery only seeds an instance the caller already holds.

use capwire_primitives::SignatureRecord;
use serde_json::Value;
use tracing::debug;

use crate::registry::{CapabilityBinding, CapabilityFuture, CapabilityRegistry};

/// Capability submitted to the global discovery inventory by the
/// `#[capability]` macro.
pub struct DiscoveredCapability {
    signature: fn() -> SignatureRecord,
    executor: fn(Value) -> CapabilityFuture,
}

impl DiscoveredCapability {
    /// Creates a discovery entry. Called from generated code.
    #[must_use]
    pub const fn new(
        signature: fn() -> SignatureRecord,
        executor: fn(Value) -> CapabilityFuture,
    ) -> Self {
        Self {
            signature,
            executor,
        }
    }

    /// Materializes the registry binding for this entry.
    #[must_use]
    pub fn binding(&self) -> CapabilityBinding {
        CapabilityBinding::new((self.signature)(), self.executor)
    }
}

inventory::collect!(DiscoveredCapability);

impl CapabilityRegistry {
    /// Registers every capability submitted to the discovery inventory and
    /// returns how many entries were installed.
    ///
    /// Entries install in link order; a name collision among discovered
    /// capabilities resolves like any other registration, last write wins.
    pub fn install_discovered(&self) -> usize {
        let mut installed = 0;
        for entry in inventory::iter::<DiscoveredCapability> {
            entry.binding().register(self);
            installed += 1;
        }
        debug!(installed, "installed discovered capabilities");
        installed
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn probe_signature() -> SignatureRecord {
        SignatureRecord::builder("discovery_probe").returns::<bool>().build()
    }

    fn probe_executor(_input: Value) -> CapabilityFuture {
        Box::pin(async move { Ok(json!(true)) })
    }

    inventory::submit! {
        DiscoveredCapability::new(probe_signature, probe_executor)
    }

    #[tokio::test]
    async fn discovered_capabilities_install_into_an_explicit_registry() {
        let registry = CapabilityRegistry::new();
        let installed = registry.install_discovered();
        assert!(installed >= 1);

        let output = registry.invoke("discovery_probe", Value::Null).await.unwrap();
        assert_eq!(output, json!(true));
    }
}
