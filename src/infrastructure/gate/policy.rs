use std::time::Duration;

use super::GateError;

/// Retry schedule for the startup gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Overall bound across all attempts
    pub timeout: Duration,
    /// Sleep after the first failed attempt
    pub initial_interval: Duration,
    /// Upper bound on any single sleep
    pub max_interval: Duration,
    /// Growth factor applied to the sleep after each failure
    pub multiplier: u32,
    /// Bound on a single connection attempt
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(2),
            multiplier: 2,
            attempt_timeout: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Sleep to use after a failure that followed a sleep of `current`
    pub fn next_interval(&self, current: Duration) -> Duration {
        current
            .saturating_mul(self.multiplier.max(1))
            .min(self.max_interval)
    }
}

/// Parse durations like `500ms`, `20s`, `2m`, `1h`; a bare number is seconds
pub fn parse_duration(input: &str) -> Result<Duration, GateError> {
    let s = input.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| GateError::InvalidDuration(input.to_string()))?;

    let duration = match unit {
        "ms" => Duration::from_millis(value),
        "" | "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.saturating_mul(60)),
        "h" => Duration::from_secs(value.saturating_mul(3600)),
        _ => return Err(GateError::InvalidDuration(input.to_string())),
    };

    Ok(duration)
}
