// Per-request attempt records
// Author: kelexine (https://github.com/kelexine)

use crate::error::ProviderError;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success { bytes: usize, mime_type: String },
    Failure(ProviderError),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success { .. })
    }

    /// Metrics label: `success` or the error kind.
    pub fn label(&self) -> &'static str {
        match self {
            AttemptOutcome::Success { .. } => "success",
            AttemptOutcome::Failure(e) => e.kind(),
        }
    }
}

/// What happened when one provider was tried.
#[derive(Debug, Clone)]
pub struct ProviderAttempt {
    pub provider: &'static str,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
}

/// JSON-friendly view of an attempt for the probe output and logs.
#[derive(Debug, Serialize)]
pub struct AttemptSummary<'a> {
    pub provider: &'a str,
    pub outcome: &'a str,
    pub detail: String,
    pub elapsed_ms: u64,
}

impl ProviderAttempt {
    pub fn summary(&self) -> AttemptSummary<'_> {
        let detail = match &self.outcome {
            AttemptOutcome::Success { bytes, mime_type } => format!("{} bytes of {}", bytes, mime_type),
            AttemptOutcome::Failure(e) => e.to_string(),
        };
        AttemptSummary {
            provider: self.provider,
            outcome: self.outcome.label(),
            detail,
            elapsed_ms: self.elapsed.as_millis() as u64,
        }
    }
}

/// All attempts of one acquisition run, emitted as a single log event.
#[derive(Debug, Clone, Default)]
pub struct AttemptLog {
    attempts: Vec<ProviderAttempt>,
}

impl AttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attempt: ProviderAttempt) {
        crate::metrics::record_provider_attempt(attempt.provider, attempt.outcome.label());
        self.attempts.push(attempt);
    }

    pub fn attempts(&self) -> &[ProviderAttempt] {
        &self.attempts
    }

    pub fn into_attempts(self) -> Vec<ProviderAttempt> {
        self.attempts
    }

    /// One line per attempt, e.g. `unsplash=unavailable(12ms)`.
    pub fn compact(&self) -> String {
        let mut out = String::new();
        for (i, attempt) in self.attempts.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(
                out,
                "{}={}({}ms)",
                attempt.provider,
                attempt.outcome.label(),
                attempt.elapsed.as_millis()
            );
        }
        out
    }

    /// Emit the whole run as one structured event.
    pub fn emit(&self, request_id: Uuid, source: &str, elapsed: Duration) {
        let failures: Vec<String> = self
            .attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                AttemptOutcome::Failure(e) => Some(format!("{}: {}", a.provider, e)),
                AttemptOutcome::Success { .. } => None,
            })
            .collect();

        let elapsed_ms = elapsed.as_millis() as u64;
        info!(
            request_id = %request_id,
            source = source,
            attempts = self.attempts.len(),
            elapsed_ms = elapsed_ms,
            trail = %self.compact(),
            failures = ?failures,
            "Image acquired"
        );
    }
}
