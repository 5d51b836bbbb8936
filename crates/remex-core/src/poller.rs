//! Bounded polling of a submission until it reaches a terminal status.
//!
//! A single awaited loop with an explicit exit condition: fetch, check,
//! sleep, repeat. Attempts are strictly sequential for a given token; the
//! loop never overlaps requests. If the attempt budget runs out before the
//! judge reports a terminal status, the last observed result is returned
//! as-is and the caller decides how to present it.

use crate::core_types::{JudgeResult, SubmissionToken};
use crate::errors::ExecError;
use crate::judge::JudgeClient;
use std::time::Duration;
use tokio::time::sleep;

/// Attempt budget and cadence for one poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: usize,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_millis(700),
        }
    }
}

/// Poll `token` until the judge reports a terminal status or the attempt
/// budget is exhausted.
///
/// A transport or parse failure from the judge aborts the loop immediately
/// and is propagated; no attempt is retried. On budget exhaustion the last
/// fetched (still in-progress) result is returned as a best-effort answer.
pub async fn poll_submission(
    client: &dyn JudgeClient,
    token: &SubmissionToken,
    policy: &PollPolicy,
) -> Result<JudgeResult, ExecError> {
    let mut last: Option<JudgeResult> = None;

    for attempt in 1..=policy.max_attempts {
        let result = client.fetch_status(token).await?;

        if result.status.is_terminal() {
            log::debug!(
                "submission {} terminal after {} attempt(s): status {}",
                token,
                attempt,
                result.status.id
            );
            return Ok(result);
        }

        last = Some(result);
        if attempt < policy.max_attempts {
            sleep(policy.interval).await;
        }
    }

    log::warn!(
        "submission {} still in progress after {} attempts, returning last result",
        token,
        policy.max_attempts
    );
    last.ok_or_else(|| ExecError::Internal("poll policy allows zero attempts".to_string()))
}
