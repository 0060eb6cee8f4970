//! Resource catalog.
//!
//! A read-only name to text mapping built from the registry at startup.
//! URIs are resolved to names by stripping the `file://` scheme, a trailing
//! slash and the `.txt` suffix.

use std::collections::HashMap;

use rmcp::model::{AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents};
use tracing::info;

use super::error::ResourceError;
use super::registry::{ResourceEntry, URI_SCHEME, URI_SUFFIX, get_all_resources};

/// MIME type of every catalog entry.
const MIME_TYPE: &str = "text/plain";

/// Catalog of static text resources.
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    entries: Vec<ResourceEntry>,
    index: HashMap<String, usize>,
}

impl ResourceCatalog {
    /// Build a catalog from the given entries, keeping their order.
    ///
    /// A later entry with the same name replaces the earlier one's text.
    pub fn new(entries: Vec<ResourceEntry>) -> Self {
        let mut catalog = Self {
            entries: Vec::with_capacity(entries.len()),
            index: HashMap::new(),
        };
        for entry in entries {
            match catalog.index.get(&entry.name) {
                Some(&i) => catalog.entries[i] = entry,
                None => {
                    catalog.index.insert(entry.name.clone(), catalog.entries.len());
                    catalog.entries.push(entry);
                }
            }
        }
        catalog
    }

    /// Build the catalog from the resource registry.
    pub fn from_registry() -> Self {
        info!("Registering resources from registry");
        Self::new(get_all_resources())
    }

    /// List resources for clients (metadata only, no text).
    pub fn list(&self) -> Vec<Resource> {
        self.entries
            .iter()
            .map(|entry| {
                let mut raw = RawResource::new(entry.uri(), entry.name.clone());
                raw.description = Some(entry.description.clone());
                raw.mime_type = Some(MIME_TYPE.to_string());
                raw.no_annotation()
            })
            .collect()
    }

    /// Read the text behind a resource URI.
    pub fn read(&self, uri: &str) -> Result<&str, ResourceError> {
        let key = resource_key(uri).ok_or_else(|| ResourceError::unknown(uri))?;
        self.index
            .get(key)
            .map(|&i| self.entries[i].text.as_str())
            .ok_or_else(|| ResourceError::unknown(uri))
    }

    /// Read a resource as a protocol result.
    pub fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let text = self.read(uri)?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self::from_registry()
    }
}

/// Derive the catalog key from a resource URI.
///
/// Returns `None` for other schemes, empty names and nested paths.
pub fn resource_key(uri: &str) -> Option<&str> {
    let rest = uri.strip_prefix(URI_SCHEME)?.trim_end_matches('/');
    let key = rest.strip_suffix(URI_SUFFIX).unwrap_or(rest);
    if key.is_empty() || key.contains('/') {
        return None;
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_key() {
        assert_eq!(resource_key("file://greeting.txt"), Some("greeting"));
        assert_eq!(resource_key("file://greeting.txt/"), Some("greeting"));
        assert_eq!(resource_key("file://greeting"), Some("greeting"));
        assert_eq!(resource_key("file://.txt"), None);
        assert_eq!(resource_key("file://"), None);
        assert_eq!(resource_key("file://docs/greeting.txt"), None);
        assert_eq!(resource_key("https://greeting.txt"), None);
    }

    #[test]
    fn test_list_is_stable_and_has_no_text() {
        let catalog = ResourceCatalog::from_registry();
        let resources = catalog.list();
        let uris: Vec<_> = resources.iter().map(|r| r.raw.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec!["file://greeting.txt", "file://help.txt", "file://about.txt"]
        );
        assert_eq!(resources[0].raw.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(
            resources[0].raw.description.as_deref(),
            Some("A sample text resource named greeting")
        );
    }

    #[test]
    fn test_read_greeting() {
        let catalog = ResourceCatalog::from_registry();
        assert_eq!(
            catalog.read("file://greeting.txt").unwrap(),
            "Hello! This is a sample text resource."
        );
    }

    #[test]
    fn test_read_missing() {
        let catalog = ResourceCatalog::from_registry();
        let err = catalog.read("file://missing.txt").unwrap_err();
        assert!(matches!(err, ResourceError::UnknownResource(ref uri) if uri == "file://missing.txt"));
        assert_eq!(err.to_string(), "Unknown resource: file://missing.txt");
    }

    #[test]
    fn test_read_resource_wraps_text() {
        let catalog = ResourceCatalog::from_registry();
        let result = catalog.read_resource("file://help.txt").unwrap();
        assert_eq!(result.contents.len(), 1);
        match &result.contents[0] {
            ResourceContents::TextResourceContents { uri, text, .. } => {
                assert_eq!(uri, "file://help.txt");
                assert!(text.starts_with("This server provides"));
            }
            _ => panic!("Expected text contents"),
        }
    }

    #[test]
    fn test_later_entry_replaces_text() {
        let catalog = ResourceCatalog::new(vec![
            ResourceEntry::sample("greeting", "first"),
            ResourceEntry::sample("greeting", "second"),
        ]);
        assert_eq!(catalog.list().len(), 1);
        assert_eq!(catalog.read("file://greeting.txt").unwrap(), "second");
    }
}
