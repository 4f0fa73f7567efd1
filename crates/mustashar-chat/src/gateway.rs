//! Analysis gateway port.
//!
//! The remote analysis function is an external collaborator consumed
//! through a fixed request/response contract. Transport implementations
//! live elsewhere; this module defines the trait, the wire DTOs, and a
//! mock used throughout the session tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mustashar_core::error::GatewayError;

use crate::types::{Message, Role};

// =============================================================================
// Wire DTOs
// =============================================================================

/// One prior turn as replayed to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

impl From<&Message> for HistoryTurn {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }
}

/// Request body for the analysis function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub query: String,
    pub category: String,
    /// History as it stood before the current turn, oldest first.
    pub conversation_history: Vec<HistoryTurn>,
    pub continue_mode: bool,
}

/// Success body from the analysis function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
    pub timestamp: String,
    pub category: String,
}

/// Failure body from either remote function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// =============================================================================
// Port
// =============================================================================

/// Remote endpoint that turns a query plus prior turns into an analysis.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, GatewayError>;
}

// =============================================================================
// Mock implementation
// =============================================================================

use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted analysis gateway for tests.
///
/// Queued outcomes are returned in order; every received request is
/// recorded for assertions. An exhausted queue yields a canned answer.
pub struct MockAnalysisGateway {
    outcomes: Mutex<VecDeque<Result<AnalysisResponse, GatewayError>>>,
    requests: Mutex<Vec<AnalysisRequest>>,
}

impl Default for MockAnalysisGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnalysisGateway {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful analysis text.
    pub fn push_analysis(&self, analysis: &str) {
        self.outcomes
            .lock()
            .expect("mock lock")
            .push_back(Ok(AnalysisResponse {
                analysis: analysis.to_string(),
                timestamp: "2024-01-01T00:00:00Z".to_string(),
                category: "civil".to_string(),
            }));
    }

    /// Queue a gateway failure.
    pub fn push_error(&self, err: GatewayError) {
        self.outcomes.lock().expect("mock lock").push_back(Err(err));
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().expect("mock lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("mock lock").len()
    }
}

#[async_trait]
impl AnalysisGateway for MockAnalysisGateway {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, GatewayError> {
        self.requests.lock().expect("mock lock").push(request);
        self.outcomes
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(AnalysisResponse {
                    analysis: "تحليل افتراضي.".to_string(),
                    timestamp: "2024-01-01T00:00:00Z".to_string(),
                    category: "civil".to_string(),
                })
            })
    }
}

// =============================================================================
// Tests
// =============================================================================
