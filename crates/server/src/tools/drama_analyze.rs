//! drama_analyze tool implementation.
//!
//! Runs the extraction pipeline over one listing supplied by the client.
//! No network I/O is performed.

use jidanjia_core::{RawListing, analyze_listing};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Input parameters for drama_analyze tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DramaAnalyzeParams {
    /// The listing to analyze: name, id, price_units (diamonds), abstract and cover URL.
    #[serde(flatten)]
    pub listing: RawListing,
}

/// Implementation of the drama_analyze tool.
pub async fn analyze_impl(params: DramaAnalyzeParams) -> Result<CallToolResult, McpError> {
    let record = analyze_listing(&params.listing).map_err(ToolError::from)?;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&record).unwrap_or_default(),
    )]))
}
