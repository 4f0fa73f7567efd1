//! Conversation session: the aggregate root.
//!
//! Owns the ordered message log, enforces the single-flight submission
//! invariant, coordinates the classifier and continuation detector, and
//! guards against stale gateway results arriving after a reset.
//!
//! Submission is split-phase so the in-flight state is explicit:
//! `begin_submit` validates and appends the user turn, the caller performs
//! the gateway call, and `resolve`/`fail` applies or discards the outcome.
//! `submit` composes the three phases for callers that hold the session
//! across the await.

use chrono::Utc;
use uuid::Uuid;

use mustashar_core::config::ChatConfig;

use crate::classifier::classify;
use crate::continuation::ContinuationDetector;
use crate::error::ChatError;
use crate::gateway::{AnalysisGateway, AnalysisRequest, HistoryTurn};
use crate::types::{Category, Message};

/// Fixed user-turn text for a continuation round.
pub const CONTINUE_SENTINEL: &str = "أكمل الإجابة السابقة";

/// Token for one in-flight submission.
///
/// Carries the prepared gateway request and the session generation it was
/// issued under; a token from before a reset is rejected on resolution.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    epoch: u64,
    pub request: AnalysisRequest,
}

/// One user's ongoing conversation.
pub struct ConversationSession {
    id: Uuid,
    messages: Vec<Message>,
    pending: bool,
    last_category: Category,
    /// Generation counter, bumped by `reset` to invalidate in-flight tokens.
    epoch: u64,
    history_limit: usize,
    max_query_chars: usize,
    detector: ContinuationDetector,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new(&ChatConfig::default())
    }
}

impl ConversationSession {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            pending: false,
            last_category: Category::default(),
            epoch: 0,
            history_limit: config.history_limit,
            max_query_chars: config.max_query_chars,
            detector: ContinuationDetector::new(config.near_limit_chars),
        }
    }

    // -----------------------------------------------------------------
    // Submission state machine
    // -----------------------------------------------------------------

    /// Validate a submission and append the user turn.
    ///
    /// A continuation round uses the fixed sentinel text and the previously
    /// classified category; reclassifying the sentinel would misroute it to
    /// the default topic. The returned request carries the history as it
    /// stood before this turn, capped to the configured limit.
    pub fn begin_submit(
        &mut self,
        user_text: &str,
        continuation: bool,
    ) -> Result<PendingSubmission, ChatError> {
        if self.pending {
            return Err(ChatError::SubmissionPending);
        }

        let effective = if continuation {
            CONTINUE_SENTINEL
        } else {
            let trimmed = user_text.trim();
            if trimmed.is_empty() {
                return Err(ChatError::EmptyQuery);
            }
            if trimmed.chars().count() > self.max_query_chars {
                return Err(ChatError::QueryTooLong(self.max_query_chars));
            }
            trimmed
        };

        if !continuation {
            self.last_category = classify(effective);
        }
        let category = self.last_category;

        let history_start = self.messages.len().saturating_sub(self.history_limit);
        let conversation_history: Vec<HistoryTurn> =
            self.messages[history_start..].iter().map(HistoryTurn::from).collect();

        let ts = self.next_timestamp();
        self.messages.push(Message::user(effective, ts));
        self.pending = true;

        tracing::debug!(
            session = %self.id,
            category = %category,
            continuation,
            history_len = conversation_history.len(),
            "Submission started"
        );

        Ok(PendingSubmission {
            epoch: self.epoch,
            request: AnalysisRequest {
                query: effective.to_string(),
                category: category.as_str().to_string(),
                conversation_history,
                continue_mode: continuation,
            },
        })
    }

    /// Apply a successful gateway result.
    ///
    /// A token issued before a reset yields `StaleResult`; callers treat
    /// that as log-only and must not surface it or mutate anything.
    pub fn resolve(
        &mut self,
        pending: PendingSubmission,
        analysis: &str,
    ) -> Result<Message, ChatError> {
        if pending.epoch != self.epoch {
            tracing::debug!(session = %self.id, "Dropping stale analysis result");
            return Err(ChatError::StaleResult);
        }

        let incomplete = self.detector.is_incomplete(analysis);
        let ts = self.next_timestamp();
        let message = Message::assistant(analysis, ts, incomplete);
        self.messages.push(message.clone());
        self.pending = false;

        tracing::debug!(session = %self.id, incomplete, "Submission resolved");
        Ok(message)
    }

    /// Record a failed gateway call.
    ///
    /// Returns the session to idle and appends nothing; the user turn is
    /// kept so a retry does not require retyping. Stale failures are
    /// ignored entirely.
    pub fn fail(&mut self, pending: PendingSubmission) {
        if pending.epoch != self.epoch {
            tracing::debug!(session = %self.id, "Dropping stale analysis failure");
            return;
        }
        self.pending = false;
        tracing::debug!(session = %self.id, "Submission failed, session idle");
    }

    /// One full submission round against the given gateway.
    pub async fn submit(
        &mut self,
        user_text: &str,
        continuation: bool,
        gateway: &dyn AnalysisGateway,
    ) -> Result<Message, ChatError> {
        let pending = self.begin_submit(user_text, continuation)?;
        let request = pending.request.clone();
        match gateway.analyze(request).await {
            Ok(response) => self.resolve(pending, &response.analysis),
            Err(err) => {
                self.fail(pending);
                Err(ChatError::from(err))
            }
        }
    }

    /// Request the remainder of a truncated answer.
    pub async fn continue_last(
        &mut self,
        gateway: &dyn AnalysisGateway,
    ) -> Result<Message, ChatError> {
        if !self.can_continue() {
            return Err(ChatError::NothingToContinue);
        }
        self.submit("", true, gateway).await
    }

    /// Whether the continue affordance applies: the most recent message is
    /// an incomplete assistant turn and nothing is in flight.
    pub fn can_continue(&self) -> bool {
        !self.pending
            && self
                .messages
                .last()
                .is_some_and(|m| m.role == crate::types::Role::Assistant && m.incomplete)
    }

    /// Start a new conversation.
    ///
    /// Clears the log and bumps the generation counter so any in-flight
    /// result is discarded on arrival instead of being applied to the
    /// now-empty conversation.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.pending = false;
        self.epoch += 1;
        tracing::info!(session = %self.id, "Conversation reset");
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_category(&self) -> Category {
        self.last_category
    }

    // -----------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------

    /// Current epoch seconds, clamped so timestamps never go backwards
    /// within a session even if the wall clock does.
    fn next_timestamp(&self) -> i64 {
        let now = Utc::now().timestamp();
        match self.messages.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
