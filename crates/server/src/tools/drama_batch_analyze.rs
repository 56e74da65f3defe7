//! drama_batch_analyze tool implementation.
//!
//! Analyzes many listings with bounded concurrency. Each listing gets its own
//! status; one bad listing never fails the batch.

use std::sync::Arc;

use jidanjia_core::{AppConfig, Error, MetadataRecord, RawListing, analyze_listing};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::ToolError;

/// Upper bound on worker count.
const MAX_CONCURRENCY: u8 = 16;

/// Input parameters for drama_batch_analyze tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DramaBatchAnalyzeParams {
    /// Listings to analyze.
    pub listings: Vec<RawListing>,

    /// Maximum number of concurrent workers (default: configured value, max: 16).
    #[serde(default)]
    pub max_concurrency: Option<u8>,
}

/// Batch item status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum BatchItemStatus {
    /// Analyzed without warnings.
    Success,
    /// Analyzed, but some per-episode price fell back to 0.
    Warning,
    /// Rejected by the engine.
    Failed,
}

/// Individual batch result item.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    /// Position in the input list.
    pub index: usize,
    /// Listing name as given.
    pub name: String,
    pub status: BatchItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<MetadataRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch summary statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchSummary {
    pub total: u32,
    pub succeeded: u32,
    pub warnings: u32,
    pub failed: u32,
}

/// Output structure for drama_batch_analyze tool.
#[derive(Debug, Clone, Serialize)]
pub struct DramaBatchAnalyzeOutput {
    /// Individual results in input order.
    pub results: Vec<BatchItem>,
    pub summary: BatchSummary,
}

fn to_item(index: usize, name: String, result: Result<MetadataRecord, Error>) -> BatchItem {
    match result {
        Ok(record) => {
            let status = if record.warnings.is_empty() { BatchItemStatus::Success } else { BatchItemStatus::Warning };
            BatchItem { index, name, status, record: Some(record), error: None }
        }
        Err(e) => BatchItem { index, name, status: BatchItemStatus::Failed, record: None, error: Some(e.to_string()) },
    }
}

/// Run the batch and collect results in input order.
pub async fn run_batch(config: &AppConfig, params: DramaBatchAnalyzeParams) -> Result<DramaBatchAnalyzeOutput, ToolError> {
    if params.listings.is_empty() {
        return Err(Error::InvalidInput("listings cannot be empty".into()).into());
    }

    let default_concurrency = u8::try_from(config.max_concurrency).unwrap_or(MAX_CONCURRENCY);
    let max_concurrency = params.max_concurrency.unwrap_or(default_concurrency).min(MAX_CONCURRENCY) as usize;
    if max_concurrency == 0 {
        return Err(Error::InvalidInput("max_concurrency must be at least 1".into()).into());
    }

    let semaphore = Arc::new(Semaphore::new(max_concurrency));
    let mut join_set = JoinSet::new();

    for (index, listing) in params.listings.into_iter().enumerate() {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| ToolError::TaskFailed(e.to_string()))?;

        join_set.spawn(async move {
            let _permit = permit;
            let result = analyze_listing(&listing);
            to_item(index, listing.name, result)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        results.push(joined.map_err(|e| ToolError::TaskFailed(e.to_string()))?);
    }
    results.sort_by_key(|item| item.index);

    let mut summary = BatchSummary { total: results.len() as u32, ..Default::default() };
    for item in &results {
        match item.status {
            BatchItemStatus::Success => summary.succeeded += 1,
            BatchItemStatus::Warning => summary.warnings += 1,
            BatchItemStatus::Failed => summary.failed += 1,
        }
    }

    tracing::info!(total = summary.total, failed = summary.failed, "batch analyzed");
    Ok(DramaBatchAnalyzeOutput { results, summary })
}

/// Implementation of the drama_batch_analyze tool.
pub async fn batch_analyze_impl(config: &AppConfig, params: DramaBatchAnalyzeParams) -> Result<CallToolResult, McpError> {
    let output = run_batch(config, params).await?;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
