use backon::ExponentialBuilder;
use std::time::Duration;

pub const STALE_SHORT: Duration = Duration::from_secs(30);
pub const STALE_MEDIUM: Duration = Duration::from_secs(60);
pub const STALE_LONG: Duration = Duration::from_secs(5 * 60);

/// Retry of a whole query, on top of whatever the transport does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: usize,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        retries: 0,
        min_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    };

    /// Delay doubles from `min_delay` and is capped at `max_delay`.
    pub fn exponential(retries: usize, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            retries,
            min_delay,
            max_delay,
        }
    }

    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_factor(2.0)
            .with_max_times(self.retries)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Per-query caching policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long a successful result is served without refetching.
    pub stale_time: Duration,
    /// Keep showing the previous key's data while a new key loads.
    pub keep_previous_data: bool,
    pub retry: RetryPolicy,
}

impl QueryOptions {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            keep_previous_data: false,
            retry: RetryPolicy::NONE,
        }
    }

    pub fn keep_previous_data(mut self) -> Self {
        self.keep_previous_data = true;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
