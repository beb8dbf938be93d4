use std::time::Duration;

/// Retry policy for a single logical fetch.
///
/// # Examples
///
/// ```
/// use weft_fetch::RetryOptions;
/// use std::time::Duration;
///
/// let options = RetryOptions::default()
///     .max_retries(5)
///     .require_eventual_success(true)
///     .extended_backoff(Duration::from_secs(10));
/// assert_eq!(options.max_retries, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryOptions {
    /// Number of failed attempts after which the fetch is exhausted.
    ///
    /// A fetch always makes at least one attempt.
    ///
    /// Default: 100
    pub max_retries: u32,

    /// What happens on exhaustion.
    ///
    /// - `false`: the fetch fails with [`Error::RetriesExhausted`](crate::Error::RetriesExhausted)
    /// - `true`: the fetch sleeps for `extended_backoff`, resets its retry
    ///   count and keeps going indefinitely
    ///
    /// Default: false
    pub require_eventual_success: bool,

    /// Fixed part of the delay between attempts.
    ///
    /// Default: 10ms
    pub base_delay: Duration,

    /// Added to the delay once per prior retry.
    ///
    /// The delay after retry N is: `base_delay + per_retry_delay * N`
    ///
    /// Default: 2ms
    pub per_retry_delay: Duration,

    /// Pause taken on exhaustion when eventual success is required.
    ///
    /// Default: 60s
    pub extended_backoff: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 100,
            require_eventual_success: false,
            base_delay: Duration::from_millis(10),
            per_retry_delay: Duration::from_millis(2),
            extended_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryOptions {
    /// Options for bulk or archival reads that must never give up.
    pub fn eventual() -> Self { Self::default().require_eventual_success(true) }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn require_eventual_success(mut self, require: bool) -> Self {
        self.require_eventual_success = require;
        self
    }

    #[must_use]
    pub fn base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    #[must_use]
    pub fn per_retry_delay(mut self, per_retry_delay: Duration) -> Self {
        self.per_retry_delay = per_retry_delay;
        self
    }

    #[must_use]
    pub fn extended_backoff(mut self, extended_backoff: Duration) -> Self {
        self.extended_backoff = extended_backoff;
        self
    }
}
