//! # tool-registry
//!
//! Named external capabilities with a uniform invoke contract, and the
//! registry that routes invocation requests by name.
//!
//! A [`Tool`] is stateless with respect to the conversation: it receives one
//! input string and returns one observation string. Execution failures are
//! rendered as `"<name> error: ..."` text inside [`Tool::invoke`], never
//! raised, so the reasoning loop always gets an observation it can react to.
//!
//! Two concrete tools are provided: [`SqlQueryTool`] (structured queries
//! against the clinic's Postgres database) and [`WebSearchTool`] (open web
//! search via the Tavily API).

mod descriptor;
mod registry;
mod search_tool;
mod sql_tool;

pub use descriptor::ToolDescriptor;
pub use registry::ToolRegistry;
pub use search_tool::WebSearchTool;
pub use sql_tool::SqlQueryTool;

use async_trait::async_trait;

/// A named capability the reasoning loop may dispatch to.
///
/// `invoke` is total: implementations catch their own failures and return
/// them as text. Tools keep no session context between invocations.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registry key; also the name advertised to the reasoning step.
    fn name(&self) -> &str;

    /// What the tool does; shown to the reasoning step when choosing.
    fn description(&self) -> &str;

    /// What the input string must contain (e.g. "a SQL query").
    fn input_contract(&self) -> &str;

    /// Runs the tool on one input and returns the observation text.
    async fn invoke(&self, input: &str) -> String;
}

impl dyn Tool {
    /// Static descriptor for this tool, for advertising capabilities.
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_contract: self.input_contract().to_string(),
        }
    }
}
