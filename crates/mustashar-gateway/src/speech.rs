//! HTTP transport for the speech gateway.
//!
//! The remote function returns audio as a base64 string; decoding happens
//! here so the playback controller only ever handles raw bytes.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mustashar_core::config::GatewayConfig;
use mustashar_core::error::GatewayError;
use mustashar_speech::error::SpeechError;
use mustashar_speech::gateway::{SpeechAudio, SpeechGateway};

use crate::{endpoint, status_message};

/// Remote function name under the gateway base URL.
const SPEECH_FUNCTION: &str = "text-to-speech";

const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeechResponseBody {
    audio_content: String,
    #[serde(default)]
    content_type: Option<String>,
}

fn decode_audio(body: SpeechResponseBody) -> Result<SpeechAudio, SpeechError> {
    let data = BASE64
        .decode(body.audio_content.as_bytes())
        .map_err(|e| SpeechError::Decode(e.to_string()))?;
    Ok(SpeechAudio {
        data,
        content_type: body
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
    })
}

/// `reqwest`-backed implementation of [`SpeechGateway`].
pub struct HttpSpeechGateway {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpSpeechGateway {
    pub fn new(client: reqwest::Client, config: &GatewayConfig, api_key: String) -> Self {
        Self {
            client,
            url: endpoint(&config.base_url, SPEECH_FUNCTION),
            api_key,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SpeechGateway for HttpSpeechGateway {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, SpeechError> {
        debug!(chars = text.chars().count(), "Sending synthesis request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&SpeechRequest { text })
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: status_message(status, &body),
            }
            .into());
        }

        let body = response
            .json::<SpeechResponseBody>()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        decode_audio(body)
    }
}

// =============================================================================
// Tests
// =============================================================================
