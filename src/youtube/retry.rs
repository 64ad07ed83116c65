use std::time::Duration;

use tracing::warn;

use super::error::ApiResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Sleep after the n-th failed attempt is `n^3` units.
    pub unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 8,
            unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.unit * attempt.pow(3)
    }

    /// Runs `operation` until it succeeds, fails with a non-transient error,
    /// or runs out of attempts. `sleep` is called between attempts.
    pub fn run<T>(
        &self,
        mut sleep: impl FnMut(Duration),
        mut operation: impl FnMut() -> ApiResult<T>,
    ) -> ApiResult<T> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match operation() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        "attempt {} of {} failed, retrying in {:?}: {}",
                        attempt, self.max_attempts, delay, e
                    );
                    sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
