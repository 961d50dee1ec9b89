//! Retry of transient SQLite failures.
//!
//! Busy/locked databases, I/O hiccups, and pool acquisition timeouts are
//! retried with capped exponential backoff. Every other error, including
//! constraint violations, fails on the first attempt.

use std::future::Future;
use std::time::Duration;

use chatty_types::config::DatabaseConfig;
use tracing::warn;

/// SQLITE_BUSY primary result code.
const SQLITE_BUSY: i64 = 5;
/// SQLITE_LOCKED primary result code.
const SQLITE_LOCKED: i64 = 6;

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

/// How many times, and how patiently, to retry a database operation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub enabled: bool,
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&DatabaseConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            enabled: config.retry_on_failure,
            max_retries: config.max_retries,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: Duration::from_secs(config.max_retry_delay_secs),
        }
    }

    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt` (0-based): `base * 2^attempt`, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `op`, retrying transient failures according to this policy.
    ///
    /// `op` is called once per attempt and must build a fresh future each time.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut op: F) -> Result<T, sqlx::Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if self.enabled && attempt < self.max_retries && is_transient(&err) => {
                    let delay = self.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        operation,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient database failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Whether an error is worth retrying.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
        sqlx::Error::Database(db) => db.code().is_some_and(|code| is_busy_code(&code)),
        _ => false,
    }
}

/// SQLite reports extended result codes; the low byte is the primary code.
fn is_busy_code(code: &str) -> bool {
    code.parse::<i64>()
        .map(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            enabled: true,
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    fn io_error() -> sqlx::Error {
        sqlx::Error::Io(std::io::Error::new(std::io::ErrorKind::Interrupted, "interrupted"))
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from_config(&DatabaseConfig::default());
        assert!(policy.enabled);
        assert_eq!(policy.max_retries, 6);
        assert_eq!(policy.max_delay, Duration::from_secs(30));
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = fast_policy(10);
        assert_eq!(policy.delay_for(0), Duration::from_millis(1));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4));
        assert_eq!(policy.delay_for(63), Duration::from_millis(4));
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient(&sqlx::Error::PoolTimedOut));
        assert!(is_transient(&io_error()));
        assert!(!is_transient(&sqlx::Error::RowNotFound));
        assert!(!is_transient(&sqlx::Error::PoolClosed));
    }

    #[test]
    fn test_busy_codes() {
        assert!(is_busy_code("5"));
        assert!(is_busy_code("6"));
        // SQLITE_BUSY_SNAPSHOT (517), SQLITE_LOCKED_SHAREDCACHE (262)
        assert!(is_busy_code("517"));
        assert!(is_busy_code("262"));
        // SQLITE_CONSTRAINT_UNIQUE (2067)
        assert!(!is_busy_code("2067"));
        assert!(!is_busy_code("not a number"));
    }

    #[tokio::test]
    async fn test_run_retries_transient_then_succeeds() {
        let calls = &AtomicU32::new(0);
        let result = fast_policy(3)
            .run("test", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(io_error())
                } else {
                    Ok(42)
                }
            })
            .await
            .unwrap();
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_gives_up_after_max_retries() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = fast_policy(2)
            .run("test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(io_error())
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_does_not_retry_permanent_errors() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = fast_policy(5)
            .run("test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(sqlx::Error::RowNotFound)
            })
            .await;
        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_policy_fails_immediately() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = RetryPolicy::disabled()
            .run("test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(io_error())
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
