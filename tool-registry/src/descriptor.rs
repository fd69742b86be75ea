//! Static tool metadata advertised to the reasoning step.

use serde::{Deserialize, Serialize};

/// Name, purpose, and input contract of a registered tool. Built once at
/// startup; used both to inform the reasoning step of available capabilities
/// and to route its requests by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_contract: String,
}
