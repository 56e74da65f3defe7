//! drama_lookup tool implementation.
//!
//! Searches the platform for a series and analyzes every priced season.

use jidanjia_client::{MissevanClient, analyze_seasons};
use jidanjia_core::{Error, MetadataRecord, clean_title};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Input parameters for drama_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DramaLookupParams {
    /// Drama name. Season suffixes such as 第二季 are stripped before searching.
    pub name: String,
}

/// Output structure for drama_lookup tool.
#[derive(Debug, Clone, Serialize)]
pub struct DramaLookupOutput {
    /// Series title used for the search.
    pub series_title: String,
    /// One record per priced season, in search order.
    pub records: Vec<MetadataRecord>,
    /// Priced seasons the engine rejected.
    pub rejected: usize,
}

/// Search and analyze one series.
pub async fn run_lookup(client: &MissevanClient, params: DramaLookupParams) -> Result<DramaLookupOutput, ToolError> {
    let series_title = clean_title(&params.name);
    if series_title.is_empty() {
        return Err(Error::InvalidInput("name cannot be empty".into()).into());
    }

    let candidates = client.search_dramas(&series_title).await?;
    let lookup = analyze_seasons(&series_title, &candidates);

    tracing::info!(series = %series_title, records = lookup.records.len(), "series looked up");
    Ok(DramaLookupOutput { series_title, records: lookup.records, rejected: lookup.rejected })
}

/// Implementation of the drama_lookup tool.
pub async fn lookup_impl(client: &MissevanClient, params: DramaLookupParams) -> Result<CallToolResult, McpError> {
    let output = run_lookup(client, params).await?;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jidanjia_client::MissevanConfig;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> MissevanClient {
        MissevanClient::new(MissevanConfig { base_url: server.uri(), min_interval: Duration::ZERO, ..Default::default() })
            .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_analyzes_priced_seasons() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dramaapi/search"))
            .and(query_param("s", "某某"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"info": {"Datas": [
                    {"id": 1, "name": "某某 第一季", "price": 200, "pay_type": 2, "abstract": "10集正剧，前2集免费"},
                    {"id": 2, "name": "某某 第二季", "price": "150", "pay_type": "2", "abstract": "共15集，含3集番外"},
                    {"id": 3, "name": "某某 小剧场", "price": 0, "pay_type": 0}
                ]}}"#,
            ))
            .mount(&server)
            .await;

        let params = DramaLookupParams { name: "某某 第二季".to_string() };
        let output = run_lookup(&client_for(&server), params).await.unwrap();

        assert_eq!(output.series_title, "某某");
        assert_eq!(output.records.len(), 2);
        assert_eq!(output.records[0].episodes.paid_episodes, Some(8));
        assert_eq!(output.records[1].episodes.main_episodes, Some(12));
        assert_eq!(output.rejected, 0);
    }

    #[tokio::test]
    async fn test_lookup_blank_name() {
        let server = MockServer::start().await;
        let params = DramaLookupParams { name: "  ".to_string() };
        let result = run_lookup(&client_for(&server), params).await;
        assert!(matches!(result, Err(ToolError::Core(Error::InvalidInput(_)))));
    }

    #[tokio::test]
    async fn test_lookup_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(path("/dramaapi/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let params = DramaLookupParams { name: "某某".to_string() };
        let err: McpError = lookup_impl(&client_for(&server), params).await.unwrap_err();
        assert_eq!(err.code, ErrorCode(-32002));
    }
}
