//! Bounded retry with exponential backoff around one text generation.

use std::time::Duration;

use ai_llm_service::error_handler::{env_opt_u32, env_opt_u64};
use ai_llm_service::{AiLlmError, TextGenerator};
use serde::Serialize;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, warn};

use crate::error::{GeneratorError, Result};

/// Retry knobs for the generative fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. At least 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after every failure.
    pub base_backoff: Duration,
    /// Upper bound for a single attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(2_000),
            attempt_timeout: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// Reads `GENERATION_MAX_RETRIES`, `GENERATION_BACKOFF_MS` and
    /// `GENERATION_TIMEOUT_SECS`; unset values keep the defaults.
    ///
    /// # Errors
    /// Propagates invalid numbers from the environment.
    pub fn from_env() -> ai_llm_service::Result<Self> {
        let d = Self::default();
        Ok(Self {
            max_attempts: env_opt_u32("GENERATION_MAX_RETRIES")?
                .unwrap_or(d.max_attempts)
                .max(1),
            base_backoff: env_opt_u64("GENERATION_BACKOFF_MS")?
                .map_or(d.base_backoff, Duration::from_millis),
            attempt_timeout: env_opt_u64("GENERATION_TIMEOUT_SECS")?
                .map_or(d.attempt_timeout, Duration::from_secs),
        })
    }

    /// Delay after failed attempt `attempt` (1-based): `base * 2^(attempt-1)`.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_backoff.saturating_mul(factor)
    }
}

/// How one attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Succeeded,
    /// The attempt outlived `attempt_timeout`.
    Timeout,
    /// The generator failed in a way worth retrying.
    NonZeroExit,
    /// The generator failed in a way a retry would not fix.
    Rejected,
    /// Retryable failure on the final attempt.
    Exhausted,
}

/// Record of one attempt, kept for logs and callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationAttempt {
    pub attempt: u32,
    pub elapsed: Duration,
    pub status: AttemptStatus,
    pub detail: Option<String>,
}

/// Raw text of the successful attempt plus the attempt log.
#[derive(Debug, Clone)]
pub struct RetryOutcome {
    pub text: String,
    pub attempts: Vec<GenerationAttempt>,
}

/// Run `generator` on `prompt` under `policy`.
///
/// # Errors
/// [`GeneratorError::GenerationFailed`] once attempts are exhausted, or
/// right away for a failure that is not transient.
pub async fn run_with_retry(
    generator: &dyn TextGenerator,
    prompt: &str,
    policy: RetryPolicy,
) -> Result<RetryOutcome> {
    let max = policy.max_attempts.max(1);
    let mut attempts = Vec::with_capacity(max as usize);

    for attempt in 1..=max {
        let started = Instant::now();
        let result = match timeout(policy.attempt_timeout, generator.generate(prompt)).await {
            Ok(r) => r,
            Err(_) => Err(AiLlmError::Timeout(policy.attempt_timeout)),
        };
        let elapsed = started.elapsed();

        let err = match result {
            Ok(text) => {
                attempts.push(GenerationAttempt {
                    attempt,
                    elapsed,
                    status: AttemptStatus::Succeeded,
                    detail: None,
                });
                debug!(target: "recipe_generator::retry", attempt, ?elapsed, "generation succeeded");
                return Ok(RetryOutcome { text, attempts });
            }
            Err(e) => e,
        };

        let detail = err.to_string();
        if !err.is_transient() {
            attempts.push(GenerationAttempt {
                attempt,
                elapsed,
                status: AttemptStatus::Rejected,
                detail: Some(detail.clone()),
            });
            warn!(
                target: "recipe_generator::retry",
                attempt,
                ?elapsed,
                status = ?AttemptStatus::Rejected,
                error = %detail,
                "generation failed; not retrying"
            );
            return Err(GeneratorError::GenerationFailed {
                attempts: attempt,
                reason: detail,
            });
        }

        let status = if attempt == max {
            AttemptStatus::Exhausted
        } else if matches!(err, AiLlmError::Timeout(_)) {
            AttemptStatus::Timeout
        } else {
            AttemptStatus::NonZeroExit
        };
        attempts.push(GenerationAttempt {
            attempt,
            elapsed,
            status,
            detail: Some(detail.clone()),
        });

        if attempt == max {
            warn!(
                target: "recipe_generator::retry",
                attempt,
                ?elapsed,
                ?status,
                error = %detail,
                "generation attempts exhausted"
            );
            return Err(GeneratorError::GenerationFailed {
                attempts: max,
                reason: detail,
            });
        }

        let delay = policy.backoff_after(attempt);
        warn!(
            target: "recipe_generator::retry",
            attempt,
            ?elapsed,
            ?status,
            ?delay,
            error = %detail,
            "generation attempt failed; backing off"
        );
        sleep(delay).await;
    }

    Err(GeneratorError::GenerationFailed {
        attempts: max,
        reason: "no attempt was made".into(),
    })
}
