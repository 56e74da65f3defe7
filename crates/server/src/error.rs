//! Structured errors for the jidanjia MCP server.
//!
//! Core errors are wrapped here so they can be mapped onto MCP error codes.

use jidanjia_core::Error;
use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Structured errors for the jidanjia MCP server.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Error raised by the extraction engine or the network client.
    #[error(transparent)]
    Core(#[from] Error),

    /// A worker task panicked or was cancelled.
    #[error("TASK_FAILED: {0}")]
    TaskFailed(String),
}

impl ToolError {
    fn code(&self) -> i32 {
        match self {
            ToolError::Core(Error::InvalidInput(_)) => -32602,
            ToolError::Core(Error::FreeListing(_)) => -32001,
            ToolError::Core(Error::HttpError(_)) => -32002,
            ToolError::Core(Error::FetchTimeout(_)) => -32003,
            ToolError::Core(Error::InvalidUrl(_)) => -32004,
            ToolError::Core(Error::ParseFailed(_)) => -32005,
            ToolError::Core(Error::ExportFailed(_)) => -32006,
            ToolError::TaskFailed(_) => -32000,
        }
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        McpError { code: ErrorCode(err.code()), message: err.to_string().into(), data: None }
    }
}

impl From<jidanjia_client::MissevanError> for ToolError {
    fn from(err: jidanjia_client::MissevanError) -> Self {
        ToolError::Core(err.into())
    }
}
