//! Lookup from persisted type tags to change factories.
//!
//! A change log only stores a tag and a JSON record per entry. Replaying it in a
//! fresh process asks the registry for the factory registered under the tag.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::change::Change;
use crate::error::{ChangeError, ChangeResult};
use crate::extract_terms::{EXTRACT_TERMS_TAG, ExtractTermsChange};

pub type ChangeFactory = fn(serde_json::Value) -> ChangeResult<Box<dyn Change>>;

#[derive(Debug, Clone, Default)]
pub struct ChangeRegistry {
    factories: FxHashMap<&'static str, ChangeFactory>,
}

static BUILTIN: Lazy<ChangeRegistry> = Lazy::new(ChangeRegistry::with_builtin);

/// Registry holding the changes this crate defines.
pub fn builtin_registry() -> &'static ChangeRegistry {
    &BUILTIN
}

fn load_extract_terms(record: serde_json::Value) -> ChangeResult<Box<dyn Change>> {
    Ok(Box::new(ExtractTermsChange::from_value(record)?))
}

impl ChangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(EXTRACT_TERMS_TAG, load_extract_terms);
        registry
    }

    /// Register `factory` under `tag`, returning the factory it replaced.
    pub fn register(&mut self, tag: &'static str, factory: ChangeFactory) -> Option<ChangeFactory> {
        self.factories.insert(tag, factory)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.factories.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn instantiate(&self, tag: &str, record: serde_json::Value) -> ChangeResult<Box<dyn Change>> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| ChangeError::UnknownChangeType {
                tag: tag.to_string(),
            })?;
        factory(record)
    }
}
