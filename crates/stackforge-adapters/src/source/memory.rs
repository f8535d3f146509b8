//! In-memory document source for testing.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use stackforge_core::{
    application::ports::DocumentSource,
    domain::{DocumentFormat, RawDocument},
    error::{ForgeError, ForgeResult},
};

/// Thread-safe in-memory document source.
///
/// Clones share the same documents, so a test can keep a handle and add
/// documents after handing the source to a loader.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    inner: Arc<RwLock<HashMap<String, RawDocument>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a YAML document.
    pub fn with_yaml(self, id: &str, text: &str) -> Self {
        self.insert(RawDocument::yaml(id, text));
        self
    }

    pub fn with_document(self, id: &str, format: DocumentFormat, text: &str) -> Self {
        self.insert(RawDocument::new(id, format, text));
        self
    }

    /// Insert or replace a document.
    pub fn insert(&self, document: RawDocument) {
        if let Ok(mut inner) = self.inner.write() {
            inner.insert(document.id.clone(), document);
        }
    }

    pub fn remove(&self, id: &str) -> Option<RawDocument> {
        self.inner.write().ok()?.remove(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, id: &str) -> ForgeResult<Option<RawDocument>> {
        let inner = self.inner.read().map_err(|_| ForgeError::Internal {
            message: "document store lock poisoned".into(),
        })?;
        Ok(inner.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_documents() {
        let source = MemorySource::new();
        let handle = source.clone();
        handle.insert(RawDocument::yaml("app", "provider: aws"));

        assert_eq!(source.len(), 1);
        assert_eq!(
            source.fetch("app").unwrap().unwrap().text,
            "provider: aws"
        );
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(MemorySource::new().fetch("app").unwrap().is_none());
    }

    #[test]
    fn later_insert_replaces() {
        let source = MemorySource::new()
            .with_yaml("app", "a: 1")
            .with_document("app", DocumentFormat::Json, r#"{"a": 2}"#);

        let doc = source.fetch("app").unwrap().unwrap();
        assert_eq!(doc.format, DocumentFormat::Json);
        assert!(source.remove("app").is_some());
        assert!(source.is_empty());
    }
}
