use std::time::Duration;

/// Why a request failed, as far as retrying is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connect or read timed out.
    Timeout,
    /// Connection refused/reset, DNS failure.
    Connection,
    /// Server answered with an HTTP status.
    Status(u16),
    /// Anything else (bad URL, body decode, ...).
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Statuses worth another attempt: transient gateway/server errors.
const RETRY_STATUSES: [u16; 3] = [500, 502, 504];

/// Exponential backoff for page fetches.
///
/// The court's player pages occasionally 502 under load; three retries with
/// a short backoff ride that out without stalling a whole run.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(300),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based: the attempt that just failed.
    pub fn decide(&self, attempt: u32, kind: FailureKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        let retryable = match kind {
            FailureKind::Timeout | FailureKind::Connection => true,
            FailureKind::Status(code) => RETRY_STATUSES.contains(&code),
            FailureKind::Other => false,
        };
        if !retryable {
            return RetryDecision::NoRetry;
        }

        let factor = 1u32 << attempt.saturating_sub(1).min(8);
        let delay = self.base_delay.saturating_mul(factor).min(self.max_delay);
        RetryDecision::RetryAfter(delay)
    }
}
