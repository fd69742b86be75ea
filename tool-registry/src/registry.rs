//! Fixed set of tools, looked up by name.

use crate::{Tool, ToolDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of named tools. Populated at startup; never mutated afterwards.
/// Lookup returns `None` for unknown names so the caller decides how to fail.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    // Registration order, so descriptors are advertised deterministically.
    order: Vec<String>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool under its own name. Registering the same name twice
    /// replaces the earlier tool.
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
        self
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Descriptors of all registered tools, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.as_ref().descriptor())
            .collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True when no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes the input back."
        }
        fn input_contract(&self) -> &str {
            "any text"
        }
        async fn invoke(&self, input: &str) -> String {
            format!("echo: {input}")
        }
    }

    /// **Test: a registered tool is found by name, an unknown name is not.**
    #[tokio::test]
    async fn lookup_by_name() {
        let registry = ToolRegistry::new().register(Arc::new(EchoTool));

        let tool = registry.get("echo").expect("echo should be registered");
        assert_eq!(tool.invoke("hi").await, "echo: hi");
        assert!(registry.get("missing").is_none());
    }

    /// **Test: descriptors carry name, description, and input contract.**
    #[test]
    fn descriptors_reflect_registration() {
        let registry = ToolRegistry::new().register(Arc::new(EchoTool));
        let descriptors = registry.descriptors();

        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "echo");
        assert_eq!(descriptors[0].input_contract, "any text");
    }
}
