//! Truncation detector for model answers.
//!
//! The analysis gateway reports no finish reason, so truncation is inferred
//! from the text itself. Three signals, any one sufficient: a trailing
//! ellipsis, a length at or above the model's near-limit output size, or a
//! missing sentence-terminal mark. Deliberately permissive: a false
//! "continue" affordance costs one declined click, a silently truncated
//! answer loses information. If the gateway ever reports a finish reason,
//! that field replaces this heuristic entirely.

/// Default character threshold, calibrated just under the gateway model's
/// maximum output size.
pub const DEFAULT_NEAR_LIMIT_CHARS: usize = 1800;

/// Explicit ellipsis markers treated as a cut-off signal.
const ELLIPSIS_MARKERS: &[&str] = &["...", "…"];

/// Sentence-terminal punctuation in the working language.
const TERMINAL_MARKS: &[char] = &['.', '!', '?', '؟', '۔'];

/// Heuristic predicate deciding whether an answer was cut off mid-thought.
#[derive(Debug, Clone, Copy)]
pub struct ContinuationDetector {
    near_limit_chars: usize,
}

impl Default for ContinuationDetector {
    fn default() -> Self {
        Self::new(DEFAULT_NEAR_LIMIT_CHARS)
    }
}

impl ContinuationDetector {
    pub fn new(near_limit_chars: usize) -> Self {
        Self { near_limit_chars }
    }

    /// True when the response looks truncated.
    ///
    /// Empty responses are not flagged; there is nothing to continue.
    pub fn is_incomplete(&self, response_text: &str) -> bool {
        let text = response_text.trim_end();
        if text.is_empty() {
            return false;
        }

        if ELLIPSIS_MARKERS.iter().any(|m| text.ends_with(m)) {
            return true;
        }

        if text.chars().count() >= self.near_limit_chars {
            return true;
        }

        !text.ends_with(TERMINAL_MARKS)
    }
}

// =============================================================================
// Tests
// =============================================================================
