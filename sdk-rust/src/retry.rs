use std::{fmt::Display, future::Future, time::Duration};
use tracing::{debug, warn};

/// Exponential backoff schedule for transient failures.
///
/// The first retry waits `initial_delay`; each following retry waits
/// `multiplier` times longer than the previous one. There is no jitter and no
/// wait after the final attempt.
/// # Default Values
/// - `max_attempts`: 5
/// - `initial_delay`: 1 second
/// - `multiplier`: 2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one. Zero is treated as
    /// one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            multiplier: 2,
        }
    }
}

/// Why [`RetryPolicy::run`] gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The operation failed with an error the predicate rejected.
    Terminal(E),
    /// Every attempt failed with a retryable error.
    Exhausted { attempts: u32, last: E },
}

impl<E> RetryError<E> {
    /// The error of the last attempt.
    pub fn into_inner(self) -> E {
        match self {
            Self::Terminal(error) | Self::Exhausted { last: error, .. } => error,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    #[must_use]
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// The waits between consecutive attempts: one fewer than
    /// `max_attempts`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let multiplier = self.multiplier;
        std::iter::successors(Some(self.initial_delay), move |delay| {
            Some(delay.saturating_mul(multiplier))
        })
        .take(self.max_attempts.saturating_sub(1) as usize)
    }

    /// Run `operation` until it succeeds, fails with an error that
    /// `is_retryable` rejects, or the attempts run out.
    ///
    /// `operation` receives the 1-based attempt number. Attempts never
    /// overlap: the next one starts only after the previous future resolved
    /// and the backoff elapsed.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        mut operation: F,
        is_retryable: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut delays = self.delays();
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt, max_attempts, "starting attempt");

            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(error) if !is_retryable(&error) => {
                    debug!(attempt, %error, "terminal failure, not retrying");
                    return Err(RetryError::Terminal(error));
                }
                Err(error) => match delays.next() {
                    Some(delay) => {
                        warn!(
                            attempt,
                            max_attempts,
                            ?delay,
                            %error,
                            "retryable failure, backing off"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        warn!(attempts = attempt, %error, "giving up after repeated failures");
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last: error,
                        });
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn default_schedule_doubles_from_one_second() {
        let delays: Vec<u64> = RetryPolicy::default()
            .delays()
            .map(|delay| delay.as_secs())
            .collect();
        assert_eq!(delays, vec![1, 2, 4, 8]);
    }

    #[test]
    fn single_attempt_has_no_delays() {
        assert_eq!(RetryPolicy::new(1).delays().count(), 0);
        assert_eq!(RetryPolicy::new(0).delays().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_attempts_until_exhausted() {
        let start = Instant::now();
        let mut started_at = Vec::new();

        let result: Result<(), _> = RetryPolicy::default()
            .run(
                |_| {
                    started_at.push(start.elapsed());
                    async { Err("503 Service Unavailable") }
                },
                |_| true,
            )
            .await;

        match result {
            Err(RetryError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 5);
                assert_eq!(last, "503 Service Unavailable");
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }

        let offsets: Vec<u64> = started_at.iter().map(Duration::as_secs).collect();
        assert_eq!(offsets, vec![0, 1, 3, 7, 15]);
        // No wait after the final attempt.
        assert!(start.elapsed() < Duration::from_secs(16));
    }

    #[tokio::test(start_paused = true)]
    async fn success_short_circuits_remaining_attempts() {
        let mut calls = 0;

        let result = RetryPolicy::default()
            .run(
                |attempt| {
                    calls += 1;
                    async move {
                        if attempt < 3 {
                            Err("429 Too Many Requests")
                        } else {
                            Ok(attempt)
                        }
                    }
                },
                |_| true,
            )
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_error_fails_without_waiting() {
        let start = Instant::now();
        let mut calls = 0;

        let result: Result<(), _> = RetryPolicy::default()
            .run(
                |_| {
                    calls += 1;
                    async { Err("400 Bad Request") }
                },
                |error: &&str| !error.starts_with('4'),
            )
            .await;

        assert!(matches!(result, Err(RetryError::Terminal("400 Bad Request"))));
        assert_eq!(calls, 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
