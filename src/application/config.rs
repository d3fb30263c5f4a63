use crate::error::{CheckoutError, Result};
use std::ops::Range;
use std::time::Duration;

/// Timing policy for the processing window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Upper bound on time spent in `processing`.
    pub timeout: Duration,
    /// How long the cancel control stays disabled after submission.
    pub cancel_grace: Duration,
    /// Window the simulated gateway draws its completion delay from.
    pub completion_window: Range<Duration>,
    /// Countdown granularity.
    pub tick: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            cancel_grace: Duration::from_secs(5),
            completion_window: Duration::from_secs(5)..Duration::from_secs(25),
            tick: Duration::from_secs(1),
        }
    }
}

impl CheckoutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick.is_zero() {
            return Err(CheckoutError::ConfigError(
                "tick must be greater than zero".to_string(),
            ));
        }
        if self.timeout.is_zero() || self.timeout.as_nanos() % self.tick.as_nanos() != 0 {
            return Err(CheckoutError::ConfigError(format!(
                "timeout {:?} must be a positive multiple of the tick {:?}",
                self.timeout, self.tick
            )));
        }
        if self.cancel_grace >= self.timeout {
            return Err(CheckoutError::ConfigError(format!(
                "cancel grace {:?} must be shorter than the timeout {:?}",
                self.cancel_grace, self.timeout
            )));
        }
        if self.completion_window.is_empty() {
            return Err(CheckoutError::ConfigError(format!(
                "completion window {:?} is empty",
                self.completion_window
            )));
        }
        Ok(())
    }

    /// Number of countdown ticks in the processing window.
    pub fn countdown_ticks(&self) -> u32 {
        u32::try_from(self.timeout.as_nanos() / self.tick.as_nanos().max(1)).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CheckoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.countdown_ticks(), 30);
    }

    #[test]
    fn test_rejects_zero_tick() {
        let config = CheckoutConfig {
            tick: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CheckoutError::ConfigError(_))
        ));
    }

    #[test]
    fn test_rejects_uneven_timeout() {
        let config = CheckoutConfig {
            timeout: Duration::from_millis(30_500),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CheckoutError::ConfigError(_))
        ));
    }

    #[test]
    fn test_rejects_grace_longer_than_timeout() {
        let config = CheckoutConfig {
            cancel_grace: Duration::from_secs(30),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CheckoutError::ConfigError(_))
        ));
    }

    #[test]
    fn test_rejects_empty_completion_window() {
        let config = CheckoutConfig {
            completion_window: Duration::from_secs(10)..Duration::from_secs(10),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CheckoutError::ConfigError(_))
        ));
    }
}
