//! Source registry.
//!
//! Maps source tags (e.g. "notion") to their adapters so a refresh can be
//! dispatched by tag without knowing the concrete adapter type.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::builtin_sources;
use crate::traits::{
    adapter::SourceAdapter,
    fetcher::{HttpFetcher, PageRenderer},
};
use crate::types::source::SourceDescriptor;

/// Registry of source adapters keyed by tag.
///
/// # Example
///
/// ```ignore
/// let mut registry = SourceRegistry::new();
/// registry.register(Arc::new(brex(fetcher)?));
///
/// // Later, from a route handler
/// reconciler.run_source(&registry, "brex").await;
/// ```
#[derive(Default, Clone)]
pub struct SourceRegistry {
    adapters: HashMap<String, Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Registry holding every built-in source.
    pub fn builtin(
        fetcher: Arc<dyn HttpFetcher>,
        renderer: Option<Arc<dyn PageRenderer>>,
        page_delay: Duration,
    ) -> Result<Self, url::ParseError> {
        let mut registry = Self::new();
        for adapter in builtin_sources(fetcher, renderer, page_delay)? {
            registry.register(adapter);
        }
        Ok(registry)
    }

    /// Register an adapter under its tag, replacing any previous one.
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) -> &mut Self {
        self.adapters.insert(adapter.tag().to_string(), adapter);
        self
    }

    pub fn get(&self, tag: &str) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.get(tag).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.adapters.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.adapters.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Descriptors of every registered source, sorted by tag.
    pub fn descriptors(&self) -> Vec<SourceDescriptor> {
        let mut descriptors: Vec<SourceDescriptor> = self
            .adapters
            .values()
            .map(|a| a.descriptor().clone())
            .collect();
        descriptors.sort_by(|a, b| a.tag.cmp(&b.tag));
        descriptors
    }

    pub fn adapters(&self) -> impl Iterator<Item = &Arc<dyn SourceAdapter>> {
        self.adapters.values()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
