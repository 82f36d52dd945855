// Crypto Provider — Factory registry
//
// Maps provider types to factories and drives the two-phase construction:
//   1. validate the build source and let the factory create a pending provider
//   2. initialize keys, then require a non-empty public key
//   3. hand the caller the public capability set only
//
// The registry is an explicit value shared through `Arc`. A process-wide
// instance is available through `FactoryRegistry::global()` for callers that
// cannot thread one through.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use super::FactoryError;
use crate::components::{
    BuildSource, CryptoProvider, CryptoProviderConfig, PendingProvider,
};

static GLOBAL_REGISTRY: OnceCell<Arc<FactoryRegistry>> = OnceCell::new();

// ─── Factory Trait ───────────────────────────────────────────────────────────

/// Builds providers of one type.
pub trait ProviderFactory: Send + Sync {
    /// Build an uninitialized provider. Must not generate or load keys.
    fn create(&self, source: BuildSource) -> Result<Box<dyn PendingProvider>, FactoryError>;

    /// Registry key. Must be stable and non-empty.
    fn provider_type(&self) -> &str;

    /// Source types accepted by `create`. Informational only.
    fn supported_sources(&self) -> Vec<&'static str>;

    /// Persist provider-specific state. No-op unless overridden.
    fn save(&self, _provider: &dyn CryptoProvider) -> Result<(), FactoryError> {
        Ok(())
    }
}

// ─── Registration Policy ─────────────────────────────────────────────────────

/// What happens when a second factory registers for an existing type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationPolicy {
    /// Last registration wins; the replacement is logged.
    #[default]
    Replace,
    /// First registration wins; later ones fail with `DuplicateFactory`.
    Reject,
}

// ─── Registry ────────────────────────────────────────────────────────────────

pub struct FactoryRegistry {
    factories: RwLock<HashMap<String, Arc<dyn ProviderFactory>>>,
    policy: RegistrationPolicy,
}

impl FactoryRegistry {
    pub fn new(policy: RegistrationPolicy) -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// The process-wide registry, created empty with the default policy on
    /// first use.
    pub fn global() -> Arc<FactoryRegistry> {
        GLOBAL_REGISTRY
            .get_or_init(|| Arc::new(FactoryRegistry::new(RegistrationPolicy::default())))
            .clone()
    }

    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    pub fn register_factory(&self, factory: Arc<dyn ProviderFactory>) -> Result<(), FactoryError> {
        let provider_type = factory.provider_type().to_string();
        if provider_type.is_empty() {
            return Err(FactoryError::EmptyProviderType);
        }

        let mut factories = self.factories.write();
        if factories.contains_key(&provider_type) {
            match self.policy {
                RegistrationPolicy::Reject => {
                    return Err(FactoryError::DuplicateFactory(provider_type));
                }
                RegistrationPolicy::Replace => {
                    tracing::warn!(provider_type = %provider_type, "Replacing registered factory");
                }
            }
        }

        factories.insert(provider_type.clone(), factory);
        tracing::debug!(provider_type = %provider_type, "Factory registered");
        Ok(())
    }

    /// Snapshot of the registered provider types, in no particular order.
    pub fn registered_factories(&self) -> Vec<String> {
        self.factories.read().keys().cloned().collect()
    }

    fn factory(&self, provider_type: &str) -> Option<Arc<dyn ProviderFactory>> {
        // The read guard is dropped before the factory runs, so factories
        // may call back into the registry.
        self.factories.read().get(provider_type).cloned()
    }

    /// Build and key a provider of `provider_type` from `source`.
    pub fn create_crypto_provider(
        &self,
        provider_type: &str,
        source: BuildSource,
    ) -> Result<Box<dyn CryptoProvider>, FactoryError> {
        let factory = self
            .factory(provider_type)
            .ok_or_else(|| FactoryError::UnknownProviderType(provider_type.to_string()))?;

        source.validate()?;
        let source_type = source.source_type();
        let mut pending = factory.create(source)?;

        let name = pending.metadata().name.clone();
        pending
            .initialize_keys()
            .map_err(|source| FactoryError::KeyInitialization {
                name: name.clone(),
                source,
            })?;

        let has_public_key = pending
            .pub_key()
            .map(|key| !key.bytes().is_empty())
            .unwrap_or(false);
        if !has_public_key {
            return Err(FactoryError::MissingPublicKey(name));
        }

        tracing::debug!(
            provider_type = %provider_type,
            source = source_type,
            name = %name,
            "Crypto provider created"
        );
        Ok(pending.into_provider())
    }

    /// Build a provider from a `{"provider_type", "options"}` JSON envelope.
    pub fn load_crypto_provider(&self, raw: &str) -> Result<Box<dyn CryptoProvider>, FactoryError> {
        let config: CryptoProviderConfig =
            serde_json::from_str(raw).map_err(|e| FactoryError::MalformedConfig(e.to_string()))?;

        if config.provider_type.is_empty() {
            return Err(FactoryError::MalformedConfig(
                "provider_type is required".to_string(),
            ));
        }

        let provider_type = config.provider_type.clone();
        self.create_crypto_provider(&provider_type, BuildSource::config(config))
    }

    /// Route a provider to its owning factory's `save` hook.
    pub fn save_provider(&self, provider: &dyn CryptoProvider) -> Result<(), FactoryError> {
        let provider_type = &provider.metadata().provider_type;
        let factory = self
            .factory(provider_type)
            .ok_or_else(|| FactoryError::UnknownProviderType(provider_type.clone()))?;
        factory.save(provider)
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new(RegistrationPolicy::default())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use crate::components::{
        Hasher, HasherOptions, KeyInitializer, ProviderError, ProviderMetadata, PubKey,
        Signature, Signer, SignerOptions, Verifier, VerifierOptions, SOURCE_CONFIG, SOURCE_JSON,
        SOURCE_NEW,
    };

    // ─── Mock provider ───────────────────────────────────────────────────────

    #[derive(Debug)]
    struct MockKey(Vec<u8>);

    impl PubKey for MockKey {
        fn bytes(&self) -> &[u8] {
            &self.0
        }

        fn key_type(&self) -> &str {
            "mock"
        }
    }

    struct Noop;

    impl Signer for Noop {
        fn sign(&self, doc: &[u8], _: &SignerOptions) -> Result<Signature, ProviderError> {
            Ok(Signature::from_bytes(doc.to_vec()))
        }
    }

    impl Verifier for Noop {
        fn verify(
            &self,
            sig: &Signature,
            doc: &[u8],
            _: &VerifierOptions,
        ) -> Result<bool, ProviderError> {
            Ok(sig.as_bytes() == doc)
        }
    }

    impl Hasher for Noop {
        fn hash(&self, input: &[u8], _: &HasherOptions) -> Result<Vec<u8>, ProviderError> {
            Ok(input.to_vec())
        }
    }

    #[derive(Clone, Copy)]
    enum KeyBehavior {
        Generate,
        Fail,
        Empty,
    }

    struct MockProvider {
        metadata: ProviderMetadata,
        behavior: KeyBehavior,
    }

    impl CryptoProvider for MockProvider {
        fn signer(&self) -> Box<dyn Signer> {
            Box::new(Noop)
        }

        fn verifier(&self) -> Box<dyn Verifier> {
            Box::new(Noop)
        }

        fn hasher(&self) -> Box<dyn Hasher> {
            Box::new(Noop)
        }

        fn metadata(&self) -> &ProviderMetadata {
            &self.metadata
        }

        fn pub_key(&self) -> Option<Box<dyn PubKey>> {
            if self.metadata.public_key.is_empty() {
                return None;
            }
            Some(Box::new(MockKey(self.metadata.public_key.as_bytes().to_vec())))
        }
    }

    impl KeyInitializer for MockProvider {
        fn initialize_keys(&mut self) -> Result<(), ProviderError> {
            match self.behavior {
                KeyBehavior::Generate => {
                    if self.metadata.public_key.is_empty() {
                        self.metadata.public_key = format!("pk-{}", self.metadata.name);
                    }
                    Ok(())
                }
                KeyBehavior::Fail => Err(ProviderError::InvalidKey("boom".to_string())),
                KeyBehavior::Empty => Ok(()),
            }
        }
    }

    struct MockFactory {
        provider_type: String,
        behavior: KeyBehavior,
        calls: AtomicUsize,
        saves: AtomicUsize,
    }

    impl MockFactory {
        fn new(provider_type: &str) -> Arc<Self> {
            Self::with_behavior(provider_type, KeyBehavior::Generate)
        }

        fn with_behavior(provider_type: &str, behavior: KeyBehavior) -> Arc<Self> {
            Arc::new(Self {
                provider_type: provider_type.to_string(),
                behavior,
                calls: AtomicUsize::new(0),
                saves: AtomicUsize::new(0),
            })
        }
    }

    impl ProviderFactory for MockFactory {
        fn create(&self, source: BuildSource) -> Result<Box<dyn PendingProvider>, FactoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let metadata = match source {
                BuildSource::New { name } => {
                    ProviderMetadata::new("v1.0.0", &self.provider_type, &name)
                }
                BuildSource::Metadata { metadata } => metadata,
                BuildSource::Config { options, .. } => {
                    let name = options
                        .get("name")
                        .and_then(|v| v.as_str())
                        .ok_or_else(|| FactoryError::Config("name option missing".to_string()))?;
                    ProviderMetadata::new("v1.0.0", &self.provider_type, name)
                }
                other => {
                    return Err(FactoryError::UnsupportedSource {
                        provider_type: self.provider_type.clone(),
                        source_type: other.source_type(),
                    })
                }
            };
            metadata.validate_identity()?;

            Ok(Box::new(MockProvider {
                metadata,
                behavior: self.behavior,
            }))
        }

        fn provider_type(&self) -> &str {
            &self.provider_type
        }

        fn supported_sources(&self) -> Vec<&'static str> {
            vec![SOURCE_NEW, SOURCE_CONFIG]
        }

        fn save(&self, _provider: &dyn CryptoProvider) -> Result<(), FactoryError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    // ─── Registration ────────────────────────────────────────────────────────

    #[test]
    fn test_register_and_list() {
        let registry = FactoryRegistry::default();
        registry.register_factory(MockFactory::new("a")).unwrap();
        registry.register_factory(MockFactory::new("b")).unwrap();

        let mut types = registry.registered_factories();
        types.sort();
        assert_eq!(types, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_provider_type_is_rejected() {
        let registry = FactoryRegistry::default();
        assert!(matches!(
            registry.register_factory(MockFactory::new("")),
            Err(FactoryError::EmptyProviderType)
        ));
        assert!(registry.registered_factories().is_empty());
    }

    #[test]
    fn test_replace_policy_last_registration_wins() {
        let registry = FactoryRegistry::new(RegistrationPolicy::Replace);
        let first = MockFactory::new("mock");
        let second = MockFactory::new("mock");

        registry.register_factory(first.clone()).unwrap();
        registry.register_factory(second.clone()).unwrap();

        registry
            .create_crypto_provider("mock", BuildSource::new("k1"))
            .unwrap();
        assert_eq!(first.calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reject_policy_first_registration_wins() {
        let registry = FactoryRegistry::new(RegistrationPolicy::Reject);
        let first = MockFactory::new("mock");

        registry.register_factory(first.clone()).unwrap();
        assert!(matches!(
            registry.register_factory(MockFactory::new("mock")),
            Err(FactoryError::DuplicateFactory(t)) if t == "mock"
        ));

        registry
            .create_crypto_provider("mock", BuildSource::new("k1"))
            .unwrap();
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    }

    // ─── Creation ────────────────────────────────────────────────────────────

    #[test]
    fn test_create_returns_keyed_provider() {
        let registry = FactoryRegistry::default();
        registry.register_factory(MockFactory::new("mock")).unwrap();

        let provider = registry
            .create_crypto_provider("mock", BuildSource::new("alice"))
            .unwrap();

        assert_eq!(provider.metadata().provider_type, "mock");
        assert_eq!(provider.metadata().name, "alice");
        assert!(!provider.pub_key().unwrap().bytes().is_empty());
    }

    #[test]
    fn test_unknown_type_never_invokes_factory() {
        let registry = FactoryRegistry::default();
        let factory = MockFactory::new("mock");
        registry.register_factory(factory.clone()).unwrap();

        assert!(matches!(
            registry.create_crypto_provider("other", BuildSource::new("k")),
            Err(FactoryError::UnknownProviderType(t)) if t == "other"
        ));
        assert_eq!(factory.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_source_is_rejected_before_factory() {
        let registry = FactoryRegistry::default();
        let factory = MockFactory::new("mock");
        registry.register_factory(factory.clone()).unwrap();

        assert!(matches!(
            registry.create_crypto_provider("mock", BuildSource::json("not json")),
            Err(FactoryError::Validation(_))
        ));
        assert_eq!(factory.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsupported_source() {
        let registry = FactoryRegistry::default();
        registry.register_factory(MockFactory::new("mock")).unwrap();

        match registry.create_crypto_provider("mock", BuildSource::json("{}")) {
            Err(FactoryError::UnsupportedSource { source_type, .. }) => {
                assert_eq!(source_type, SOURCE_JSON)
            }
            other => panic!("expected UnsupportedSource, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_key_initialization_failure_is_wrapped() {
        let registry = FactoryRegistry::default();
        registry
            .register_factory(MockFactory::with_behavior("mock", KeyBehavior::Fail))
            .unwrap();

        assert!(matches!(
            registry.create_crypto_provider("mock", BuildSource::new("k")),
            Err(FactoryError::KeyInitialization { name, .. }) if name == "k"
        ));
    }

    #[test]
    fn test_missing_public_key_is_rejected() {
        let registry = FactoryRegistry::default();
        registry
            .register_factory(MockFactory::with_behavior("mock", KeyBehavior::Empty))
            .unwrap();

        assert!(matches!(
            registry.create_crypto_provider("mock", BuildSource::new("k")),
            Err(FactoryError::MissingPublicKey(name)) if name == "k"
        ));
    }

    // ─── Load envelope ───────────────────────────────────────────────────────

    #[test]
    fn test_load_crypto_provider() {
        let registry = FactoryRegistry::default();
        registry.register_factory(MockFactory::new("mock")).unwrap();

        let provider = registry
            .load_crypto_provider(r#"{"provider_type": "mock", "options": {"name": "loaded"}}"#)
            .unwrap();
        assert_eq!(provider.metadata().name, "loaded");
    }

    #[test]
    fn test_load_rejects_malformed_envelopes() {
        let registry = FactoryRegistry::default();
        registry.register_factory(MockFactory::new("mock")).unwrap();

        for raw in ["not json", "{}", r#"{"provider_type": ""}"#, r#"{"options": {}}"#] {
            assert!(
                matches!(
                    registry.load_crypto_provider(raw),
                    Err(FactoryError::MalformedConfig(_))
                ),
                "expected MalformedConfig for {}",
                raw
            );
        }
    }

    #[test]
    fn test_load_unknown_type() {
        let registry = FactoryRegistry::default();
        assert!(matches!(
            registry.load_crypto_provider(r#"{"provider_type": "nope", "options": {}}"#),
            Err(FactoryError::UnknownProviderType(_))
        ));
    }

    #[test]
    fn test_load_config_error_from_factory() {
        let registry = FactoryRegistry::default();
        registry.register_factory(MockFactory::new("mock")).unwrap();

        assert!(matches!(
            registry.load_crypto_provider(r#"{"provider_type": "mock", "options": {}}"#),
            Err(FactoryError::Config(_))
        ));
    }

    // ─── Save ────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_routes_to_owning_factory() {
        let registry = FactoryRegistry::default();
        let a = MockFactory::new("a");
        let b = MockFactory::new("b");
        registry.register_factory(a.clone()).unwrap();
        registry.register_factory(b.clone()).unwrap();

        let provider = registry
            .create_crypto_provider("b", BuildSource::new("k"))
            .unwrap();
        registry.save_provider(provider.as_ref()).unwrap();

        assert_eq!(a.saves.load(Ordering::SeqCst), 0);
        assert_eq!(b.saves.load(Ordering::SeqCst), 1);
    }

    // ─── Concurrency ─────────────────────────────────────────────────────────

    #[test]
    fn test_concurrent_registration_and_creation() {
        let registry = Arc::new(FactoryRegistry::default());
        registry.register_factory(MockFactory::new("base")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry
                        .register_factory(MockFactory::new(&format!("t{}", i)))
                        .unwrap();
                    for j in 0..10 {
                        registry
                            .create_crypto_provider("base", BuildSource::new(format!("k{}-{}", i, j)))
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.registered_factories().len(), 9);
    }

    #[test]
    fn test_global_registry_is_shared() {
        let a = FactoryRegistry::global();
        let b = FactoryRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
