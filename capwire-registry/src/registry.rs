//! Runtime registry for capability signatures and execution.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use capwire_primitives::SignatureRecord;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Result alias for capability operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Future alias produced by generated capability bindings.
pub type CapabilityFuture = Pin<Box<dyn Future<Output = CapabilityResult<Value>> + Send>>;

/// Declarative binding returned by the `#[capability]` macro.
#[derive(Clone)]
pub struct CapabilityBinding {
    signature: SignatureRecord,
    executor: fn(Value) -> CapabilityFuture,
}

impl CapabilityBinding {
    /// Creates a binding from a captured signature and an executor function.
    #[must_use]
    pub fn new(signature: SignatureRecord, executor: fn(Value) -> CapabilityFuture) -> Self {
        Self {
            signature,
            executor,
        }
    }

    /// Returns the captured signature.
    #[must_use]
    pub fn signature(&self) -> &SignatureRecord {
        &self.signature
    }

    /// Registers the binding with the provided registry.
    ///
    /// A binding whose name is already registered replaces the prior entry;
    /// the last write wins.
    pub fn register(self, registry: &CapabilityRegistry) {
        let CapabilityBinding {
            signature,
            executor,
        } = self;
        registry.register(signature, executor);
    }
}

/// Trait implemented by capability executors.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Invokes the capability with the given JSON input, returning JSON
    /// output.
    async fn invoke(&self, input: Value) -> CapabilityResult<Value>;
}

#[async_trait]
impl<F, Fut> Capability for F
where
    F: Send + Sync + Fn(Value) -> Fut,
    Fut: Future<Output = CapabilityResult<Value>> + Send,
{
    async fn invoke(&self, input: Value) -> CapabilityResult<Value> {
        (self)(input).await
    }
}

/// Handle returned by the registry for direct invocation.
#[derive(Clone)]
pub struct CapabilityHandle {
    signature: SignatureRecord,
    executor: Arc<dyn Capability>,
}

impl CapabilityHandle {
    /// Returns the advertised signature.
    #[must_use]
    pub fn signature(&self) -> &SignatureRecord {
        &self.signature
    }

    /// Executes the underlying capability implementation.
    ///
    /// # Errors
    ///
    /// Propagates any [`CapabilityError`] returned by the underlying
    /// implementation.
    pub async fn invoke(&self, input: Value) -> CapabilityResult<Value> {
        self.executor.invoke(input).await
    }
}

/// Registry that stores capabilities keyed by function name.
///
/// The registry starts empty and grows monotonically: entries are inserted
/// or overwritten by [`register`](Self::register) and never removed. Each
/// registration is a single atomic map write, so concurrent registrations
/// under different names cannot corrupt the mapping and same-name races
/// resolve to last-write-wins.
#[derive(Default)]
pub struct CapabilityRegistry {
    inner: RwLock<HashMap<String, CapabilityHandle>>,
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().expect("capability registry poisoned");
        let names: Vec<_> = inner.keys().cloned().collect();
        f.debug_struct("CapabilityRegistry")
            .field("registered", &names)
            .finish()
    }
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a capability under its signature's function name.
    ///
    /// Re-registering a name silently replaces the prior entry; the last
    /// write wins. Calling the underlying function directly is unaffected
    /// by registration.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn register<C>(&self, signature: SignatureRecord, capability: C)
    where
        C: Capability + 'static,
    {
        let name = signature.name().to_owned();
        let arity = signature.args().len();
        let mut inner = self.inner.write().expect("capability registry poisoned");
        let replaced = inner
            .insert(
                name.clone(),
                CapabilityHandle {
                    signature,
                    executor: Arc::new(capability),
                },
            )
            .is_some();
        drop(inner);
        debug!(capability = %name, arity, replaced, "registered capability");
    }

    /// Registers a binding produced by the `#[capability]` macro.
    pub fn register_binding(&self, binding: CapabilityBinding) {
        binding.register(self);
    }

    /// Returns a handle to the capability matching the supplied name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<CapabilityHandle> {
        let inner = self.inner.read().ok()?;
        inner.get(name).cloned()
    }

    /// Invokes a registered capability directly.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::UnknownCapability`] when the name is not
    /// found, or propagates the error produced by the implementation.
    pub async fn invoke(&self, name: &str, input: Value) -> CapabilityResult<Value> {
        let handle = self
            .get(name)
            .ok_or_else(|| CapabilityError::UnknownCapability {
                name: name.to_owned(),
            })?;
        debug!(capability = %name, "invoking capability");
        handle.invoke(input).await
    }

    /// Lists the signatures of all registered capabilities.
    ///
    /// This is the advertisement surface handed to invocation layers.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn list(&self) -> Vec<SignatureRecord> {
        let inner = self.inner.read().expect("capability registry poisoned");
        inner
            .values()
            .map(|handle| handle.signature.clone())
            .collect()
    }

    /// Returns the number of registered capabilities.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("capability registry poisoned")
            .len()
    }

    /// Returns `true` when nothing has been registered yet.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Errors produced by capability registration and invocation.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// Requested capability does not exist.
    #[error("capability `{name}` is not registered")]
    UnknownCapability {
        /// Name of the missing capability.
        name: String,
    },

    /// Supplied arguments could not be decoded into the declared types.
    #[error("invalid input for capability `{capability}`: {reason}")]
    InvalidInput {
        /// Name of the capability being invoked.
        capability: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Capability execution failed.
    #[error("capability execution failed: {reason}")]
    Execution {
        /// Human-readable error returned by the implementation.
        reason: String,
    },
}

impl CapabilityError {
    /// Creates an invalid-input error for the named capability.
    #[must_use]
    pub fn invalid_input(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            capability: capability.into(),
            reason: reason.into(),
        }
    }

    /// Creates an execution error from the supplied reason.
    #[must_use]
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use capwire_primitives::TypeDescriptor;
    use serde_json::json;

    use super::*;

    fn echo_signature() -> SignatureRecord {
        SignatureRecord::builder("echo")
            .param::<Value>("payload")
            .returns::<Value>()
            .build()
    }

    #[tokio::test]
    async fn register_and_invoke_capability() {
        let registry = CapabilityRegistry::new();
        registry.register(echo_signature(), |input: Value| async move { Ok(input) });

        let payload = json!({ "message": "hello" });
        let output = registry.invoke("echo", payload.clone()).await.unwrap();
        assert_eq!(output, payload);
    }

    #[tokio::test]
    async fn last_registration_wins() {
        let registry = CapabilityRegistry::new();
        registry.register(echo_signature(), |_: Value| async move { Ok(json!(1)) });
        registry.register(echo_signature(), |_: Value| async move { Ok(json!(2)) });

        let output = registry.invoke("echo", Value::Null).await.unwrap();
        assert_eq!(output, json!(2));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn distinct_names_coexist() {
        let registry = CapabilityRegistry::new();
        registry.register(
            SignatureRecord::builder("first").build(),
            |_: Value| async move { Ok(json!("first")) },
        );
        registry.register(
            SignatureRecord::builder("second").build(),
            |_: Value| async move { Ok(json!("second")) },
        );

        assert!(registry.get("first").is_some());
        assert!(registry.get("second").is_some());
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn unknown_capability_errors() {
        let registry = CapabilityRegistry::new();
        let err = registry
            .invoke("missing", Value::Null)
            .await
            .expect_err("unknown capability should error");

        assert!(matches!(err, CapabilityError::UnknownCapability { name } if name == "missing"));
    }

    #[tokio::test]
    async fn binding_registers_and_invokes() {
        fn executor(input: Value) -> CapabilityFuture {
            Box::pin(async move { Ok(input) })
        }

        let registry = CapabilityRegistry::new();
        let binding = CapabilityBinding::new(echo_signature(), executor);
        assert_eq!(binding.signature().name(), "echo");
        registry.register_binding(binding);

        let payload = json!({ "message": "binding" });
        let output = registry.invoke("echo", payload.clone()).await.unwrap();
        assert_eq!(output, payload);
    }

    #[test]
    fn zero_parameter_signature_is_advertised_intact() {
        let registry = CapabilityRegistry::new();
        registry.register(
            SignatureRecord::builder("tick").returns::<i64>().build(),
            |_: Value| async move { Ok(json!(0)) },
        );

        let handle = registry.get("tick").expect("registered");
        assert!(handle.signature().args().is_empty());
        assert_eq!(handle.signature().return_type(), &TypeDescriptor::named("int"));
    }
}
