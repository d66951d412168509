//! Half-open, strided range of remote file identifiers.

use crate::config::ConfigError;

/// IDs `start, start + step, ...` strictly below `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    start: u64,
    stop: u64,
    step: u64,
}

impl IdRange {
    pub fn new(start: u64, stop: u64, step: u64) -> Result<Self, ConfigError> {
        if step == 0 {
            return Err(ConfigError::ZeroStep);
        }

        if start >= stop {
            return Err(ConfigError::EmptyRange { start, stop });
        }

        Ok(Self { start, stop, step })
    }

    /// Yields exactly `len()` IDs.
    pub fn iter(&self) -> impl Iterator<Item = u64> {
        let step = self.step;
        let stop = self.stop;
        let first = if self.is_empty() { None } else { Some(self.start) };

        std::iter::successors(first, move |id| id.checked_add(step))
            .take_while(move |id| *id < stop)
    }

    pub fn len(&self) -> u64 {
        if self.start >= self.stop || self.step == 0 {
            return 0;
        }

        (self.stop - self.start).div_ceil(self.step)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn stop(&self) -> u64 {
        self.stop
    }

    pub fn step(&self) -> u64 {
        self.step
    }
}
