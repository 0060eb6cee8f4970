//! Resource Registry - the static resource table.
//!
//! Every resource the server exposes is listed in [`get_all_resources`].

/// URI scheme every resource is addressed with.
pub const URI_SCHEME: &str = "file://";

/// Suffix appended to a resource name to form its URI.
pub const URI_SUFFIX: &str = ".txt";

/// A static text resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub name: String,
    pub text: String,
    pub description: String,
}

impl ResourceEntry {
    /// A plain text sample resource.
    pub fn sample(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            description: format!("A sample text resource named {}", name),
        }
    }

    /// The URI clients use to read this resource.
    pub fn uri(&self) -> String {
        format!("{}{}{}", URI_SCHEME, self.name, URI_SUFFIX)
    }
}

/// Get all registered resources, in presentation order.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    vec![
        ResourceEntry::sample("greeting", "Hello! This is a sample text resource."),
        ResourceEntry::sample(
            "help",
            "This server provides a few sample text resources for testing.",
        ),
        ResourceEntry::sample("about", "This is the MCP demo server implementation."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_all_resources() {
        let names: Vec<_> = get_all_resources().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["greeting", "help", "about"]);
    }

    #[test]
    fn test_entry_uri() {
        let uris: Vec<_> = get_all_resources().iter().map(ResourceEntry::uri).collect();
        assert_eq!(
            uris,
            vec!["file://greeting.txt", "file://help.txt", "file://about.txt"]
        );
    }
}
