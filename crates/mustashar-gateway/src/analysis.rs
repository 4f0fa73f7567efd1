//! HTTP transport for the analysis gateway.

use async_trait::async_trait;
use tracing::debug;

use mustashar_chat::gateway::{AnalysisGateway, AnalysisRequest, AnalysisResponse};
use mustashar_core::config::GatewayConfig;
use mustashar_core::error::GatewayError;

use crate::{endpoint, status_message};

/// Remote function name under the gateway base URL.
const ANALYSIS_FUNCTION: &str = "legal-analysis";

/// `reqwest`-backed implementation of [`AnalysisGateway`].
pub struct HttpAnalysisGateway {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpAnalysisGateway {
    pub fn new(client: reqwest::Client, config: &GatewayConfig, api_key: String) -> Self {
        Self {
            client,
            url: endpoint(&config.base_url, ANALYSIS_FUNCTION),
            api_key,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AnalysisGateway for HttpAnalysisGateway {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, GatewayError> {
        debug!(
            category = %request.category,
            history_len = request.conversation_history.len(),
            continue_mode = request.continue_mode,
            "Sending analysis request"
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: status_message(status, &body),
            });
        }

        response
            .json::<AnalysisResponse>()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
