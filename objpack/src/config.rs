//! Codec configuration.

use crate::extension::{ExtensionHook, FallbackSerializer};
use crate::record::TypeRegistry;
use std::fmt;
use std::sync::Arc;

/// Settings shared by encode and decode calls.
///
/// Cheap to clone; hooks and the registry are reference-counted.
///
/// # Example
///
/// ```
/// use objpack::{CodecConfig, TypeRegistry};
///
/// let config = CodecConfig::new()
///     .with_registry(TypeRegistry::new())
///     .with_max_depth(64);
/// assert_eq!(config.max_depth(), Some(64));
/// ```
#[derive(Clone, Default)]
pub struct CodecConfig {
    hook: Option<Arc<dyn ExtensionHook>>,
    fallback: Option<Arc<dyn FallbackSerializer>>,
    registry: Arc<TypeRegistry>,
    max_depth: Option<usize>,
    dynamic_records: bool,
}

impl CodecConfig {
    /// Default configuration: no hook, no fallback, empty registry, no
    /// depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an extension hook.
    #[must_use]
    pub fn with_hook<H: ExtensionHook + 'static>(self, hook: H) -> Self {
        self.with_shared_hook(Arc::new(hook))
    }

    /// Install an already shared extension hook.
    #[must_use]
    pub fn with_shared_hook(mut self, hook: Arc<dyn ExtensionHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Remove the extension hook.
    #[must_use]
    pub fn without_hook(mut self) -> Self {
        self.hook = None;
        self
    }

    /// Install a fallback serializer for unclaimed extension values.
    #[must_use]
    pub fn with_fallback<F: FallbackSerializer + 'static>(mut self, fallback: F) -> Self {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Use `registry` to resolve record type names.
    #[must_use]
    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Fail with `DepthLimitExceeded` once nesting exceeds `limit`.
    #[must_use]
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Decode unregistered record names as [`DynamicRecord`](crate::DynamicRecord)
    /// instead of failing with `UnknownType`.
    #[must_use]
    pub fn with_dynamic_records(mut self, enabled: bool) -> Self {
        self.dynamic_records = enabled;
        self
    }

    /// The installed hook.
    pub fn hook(&self) -> Option<&dyn ExtensionHook> {
        self.hook.as_deref()
    }

    /// The installed fallback serializer.
    pub fn fallback(&self) -> Option<&dyn FallbackSerializer> {
        self.fallback.as_deref()
    }

    /// The record type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The nesting limit, if any.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Whether unregistered records decode dynamically.
    pub fn dynamic_records(&self) -> bool {
        self.dynamic_records
    }
}

impl fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecConfig")
            .field("hook", &self.hook.is_some())
            .field("fallback", &self.fallback.is_some())
            .field("registry", &self.registry)
            .field("max_depth", &self.max_depth)
            .field("dynamic_records", &self.dynamic_records)
            .finish()
    }
}
