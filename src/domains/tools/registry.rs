//! Tool Registry - central registration of all tools.
//!
//! Tools are added through [`ToolRegistryBuilder`], usually by the
//! registration table in `definitions::register_all`. Building the registry
//! rejects duplicate names and runs every module's one-time initialization;
//! after that the registry is immutable and shared without locks.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::Tool;
use tracing::{debug, info};

use super::context::ToolContext;
use super::definitions;
use super::error::DiscoveryError;
use super::handlers::{DEFAULT_HANDLER, Registered, ToolDefinition, ToolModule};

/// A registered tool.
#[derive(Clone)]
pub struct RegistryEntry {
    descriptor: Tool,
    module: Arc<dyn ToolModule>,
    handler_name: &'static str,
}

impl RegistryEntry {
    pub fn descriptor(&self) -> &Tool {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn module(&self) -> &Arc<dyn ToolModule> {
        &self.module
    }

    /// The handler invoked when a call does not name one.
    pub fn handler_name(&self) -> &'static str {
        self.handler_name
    }
}

/// Tool registry - name to module mapping, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Start an empty registration table.
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Build the registry from every tool shipped with the server.
    pub async fn discover(ctx: &ToolContext) -> Result<Self, DiscoveryError> {
        definitions::register_all(Self::builder()).build(ctx).await
    }

    /// Find a tool by name.
    pub fn lookup(&self, name: &str) -> Option<&RegistryEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Descriptors of all tools, in registration order.
    pub fn list_descriptors(&self) -> Vec<Tool> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    /// Names of all tools, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects tool modules before the registry is built.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    modules: Vec<Arc<dyn ToolModule>>,
}

impl ToolRegistryBuilder {
    /// Register a tool.
    pub fn register<T: ToolDefinition>(mut self, tool: T) -> Self {
        debug!("Registering tool: {}", T::NAME);
        self.modules.push(Arc::new(Registered(tool)));
        self
    }

    /// Register a nested group of tools.
    pub fn group(self, name: &str, register: impl FnOnce(Self) -> Self) -> Self {
        debug!("Registering tool group: {}", name);
        register(self)
    }

    /// Validate names, initialize every module once, and freeze the registry.
    ///
    /// Duplicates are detected before any initialization runs, so a failed
    /// build leaves no partially initialized registry behind.
    pub async fn build(self, ctx: &ToolContext) -> Result<ToolRegistry, DiscoveryError> {
        let mut entries = Vec::with_capacity(self.modules.len());
        let mut index = HashMap::with_capacity(self.modules.len());

        for module in self.modules {
            let descriptor = module.descriptor();
            let name = descriptor.name.to_string();
            if index.insert(name.clone(), entries.len()).is_some() {
                return Err(DiscoveryError::DuplicateTool(name));
            }
            entries.push(RegistryEntry {
                descriptor,
                module,
                handler_name: DEFAULT_HANDLER,
            });
        }

        for entry in &entries {
            entry
                .module
                .init(ctx)
                .await
                .map_err(|e| DiscoveryError::InitFailed {
                    tool: entry.name().to_string(),
                    reason: e.to_string(),
                })?;
        }

        info!("Registered {} tools", entries.len());
        Ok(ToolRegistry { entries, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{
        CountingTool, EchoTool, FailingTool, ShadowEchoTool, test_context,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_registry_preserves_registration_order() {
        let registry = ToolRegistry::builder()
            .register(FailingTool::upstream())
            .register(EchoTool)
            .build(&test_context())
            .await
            .unwrap();

        assert_eq!(registry.tool_names(), vec!["failing", "echo"]);
        let names: Vec<_> = registry
            .list_descriptors()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["failing", "echo"]);
    }

    #[tokio::test]
    async fn test_registry_lookup() {
        let registry = ToolRegistry::builder()
            .register(EchoTool)
            .build(&test_context())
            .await
            .unwrap();

        let entry = registry.lookup("echo").expect("echo registered");
        assert_eq!(entry.name(), "echo");
        assert_eq!(entry.handler_name(), DEFAULT_HANDLER);
        assert!(registry.lookup("nonexistent").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_fails_without_init() {
        let inits = Arc::new(AtomicUsize::new(0));
        let result = ToolRegistry::builder()
            .register(CountingTool {
                inits: inits.clone(),
                fail_init: false,
            })
            .register(EchoTool)
            .register(ShadowEchoTool {
                inits: inits.clone(),
            })
            .build(&test_context())
            .await;

        match result {
            Err(DiscoveryError::DuplicateTool(name)) => assert_eq!(name, "echo"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("duplicate names must be rejected"),
        }
        assert_eq!(inits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_duplicate_inside_group_is_detected() {
        let inits = Arc::new(AtomicUsize::new(0));
        let result = ToolRegistry::builder()
            .register(EchoTool)
            .group("shadows", |b| {
                b.register(ShadowEchoTool {
                    inits: inits.clone(),
                })
            })
            .build(&test_context())
            .await;

        assert!(matches!(result, Err(DiscoveryError::DuplicateTool(_))));
    }

    #[tokio::test]
    async fn test_init_runs_once_per_module() {
        let inits = Arc::new(AtomicUsize::new(0));
        let registry = ToolRegistry::builder()
            .register(CountingTool {
                inits: inits.clone(),
                fail_init: false,
            })
            .build(&test_context())
            .await
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(inits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_init_failure_is_fatal() {
        let result = ToolRegistry::builder()
            .register(EchoTool)
            .register(CountingTool {
                inits: Arc::new(AtomicUsize::new(0)),
                fail_init: true,
            })
            .build(&test_context())
            .await;

        match result {
            Err(DiscoveryError::InitFailed { tool, reason }) => {
                assert_eq!(tool, "counting");
                assert!(reason.contains("refused"));
            }
            _ => panic!("init failure must abort the build"),
        }
    }

    #[tokio::test]
    async fn test_discover_builtin_tools() {
        let registry = ToolRegistry::discover(&test_context()).await.unwrap();
        let names = registry.tool_names();
        assert_eq!(
            names,
            vec!["Time", "System Info", "Fetch", "D1", "Alist Search"]
        );
        for tool in registry.list_descriptors() {
            assert!(!tool.name.is_empty());
            assert!(tool.description.as_deref().is_some_and(|d| !d.is_empty()));
        }
    }
}
