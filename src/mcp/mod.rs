pub mod jsonrpc;
pub mod registry;
pub mod server;
pub mod tools;
pub mod types;

pub use jsonrpc::{JsonRpcRequest, JsonRpcResponse};
pub use registry::{Tool, ToolRegistry};
pub use server::McpServer;
pub use tools::build_registry;
pub use types::{McpTool, McpToolCall, McpToolResult};
