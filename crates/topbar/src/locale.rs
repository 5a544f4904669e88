//! UI string lookup.

use std::collections::HashMap;
use std::sync::Arc;

/// Translates UI strings into the admin user's language.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> String;
}

impl<T> Translator for Arc<T>
where
    T: Translator + ?Sized,
{
    fn translate(&self, text: &str) -> String {
        (**self).translate(text)
    }
}

/// Returns every string unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Lookup table; strings without an entry pass through.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    entries: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, text: &str) -> String {
        self.entries
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }
}
