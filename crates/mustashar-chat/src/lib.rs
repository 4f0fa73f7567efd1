//! Conversation core for Mustashar.
//!
//! Provides keyword-based topic classification, truncation detection for
//! model answers, and the conversation session state machine that drives
//! analysis requests and continuation rounds.

pub mod classifier;
pub mod continuation;
pub mod error;
pub mod gateway;
pub mod session;
pub mod types;

pub use classifier::classify;
pub use continuation::ContinuationDetector;
pub use error::ChatError;
pub use gateway::{
    AnalysisGateway, AnalysisRequest, AnalysisResponse, HistoryTurn, MockAnalysisGateway,
};
pub use session::{ConversationSession, PendingSubmission, CONTINUE_SENTINEL};
pub use types::{Category, Message, Role};
