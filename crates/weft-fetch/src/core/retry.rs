use std::time::Duration;

/// Calculate the delay before the next attempt using linear backoff.
///
/// The delay formula is: `base + step * retry_count`
///
/// # Arguments
///
/// * `retry_count` - Number of retries already taken (0 = first retry)
/// * `base` - The fixed part of every delay
/// * `step` - Added once per prior retry
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use weft_fetch::retry_delay;
///
/// let base = Duration::from_millis(10);
/// let step = Duration::from_millis(2);
///
/// assert_eq!(retry_delay(0, base, step), Duration::from_millis(10));
/// assert_eq!(retry_delay(1, base, step), Duration::from_millis(12));
/// assert_eq!(retry_delay(99, base, step), Duration::from_millis(208));
/// ```
pub fn retry_delay(retry_count: u32, base: Duration, step: Duration) -> Duration {
    base.saturating_add(step.saturating_mul(retry_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_basic() {
        let base = Duration::from_millis(10);
        let step = Duration::from_millis(2);

        assert_eq!(retry_delay(0, base, step), Duration::from_millis(10));
        assert_eq!(retry_delay(1, base, step), Duration::from_millis(12));
        assert_eq!(retry_delay(2, base, step), Duration::from_millis(14));
        assert_eq!(retry_delay(50, base, step), Duration::from_millis(110));
    }

    #[test]
    fn test_retry_delay_zero_step() {
        let base = Duration::from_millis(25);

        assert_eq!(retry_delay(0, base, Duration::ZERO), base);
        assert_eq!(retry_delay(1000, base, Duration::ZERO), base);
    }

    #[test]
    fn test_retry_delay_zero_base() {
        let step = Duration::from_millis(3);

        assert_eq!(retry_delay(0, Duration::ZERO, step), Duration::ZERO);
        assert_eq!(retry_delay(4, Duration::ZERO, step), Duration::from_millis(12));
    }

    #[test]
    fn test_retry_delay_linear_growth() {
        let base = Duration::from_millis(10);
        let step = Duration::from_millis(2);

        let delays: Vec<Duration> = (0..5).map(|i| retry_delay(i, base, step)).collect();

        for i in 1..delays.len() {
            assert_eq!(delays[i] - delays[i - 1], step);
        }
    }

    #[test]
    fn test_retry_delay_overflow_protection() {
        let base = Duration::from_secs(u64::MAX / 2);
        let step = Duration::from_secs(u64::MAX / 2);

        let delay = retry_delay(u32::MAX, base, step);
        assert_eq!(delay, Duration::MAX);
    }
}
