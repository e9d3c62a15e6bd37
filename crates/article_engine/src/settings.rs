use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::RunId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("minimum delay {min:?} exceeds maximum delay {max:?}")]
    InvalidDelayRange { min: Duration, max: Duration },
}

/// Inclusive range the pause between two articles is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Result<Self, SettingsError> {
        if min > max {
            return Err(SettingsError::InvalidDelayRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn from_secs(min: u64, max: u64) -> Result<Self, SettingsError> {
        Self::new(Duration::from_secs(min), Duration::from_secs(max))
    }

    pub fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draws a delay uniformly from `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let low = saturating_nanos(self.min);
        let high = saturating_nanos(self.max);
        Duration::from_nanos(rng.gen_range(low..=high))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }
}

fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Everything a run needs besides the job list and the creator.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub delay: DelayRange,
    /// Upper bound for a single `create_article` call. A call that exceeds
    /// it ends the run with a fatal error.
    pub call_timeout: Option<Duration>,
    pub run_id: RunId,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            delay: DelayRange::default(),
            call_timeout: None,
            run_id: 1,
        }
    }
}
