//! Progress value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A progress value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    /// Zero progress.
    pub const ZERO: Self = Self(0);

    /// Complete progress.
    pub const COMPLETE: Self = Self(100);

    /// Creates a new Progress, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Progress, returning error if out of range.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > 100 {
            return Err(ValidationError::out_of_range(
                "progress",
                0,
                100,
                value as i32,
            ));
        }
        Ok(Self(value))
    }

    /// Creates a Progress from a float, rounding to the nearest integer and
    /// clamping to [0, 100].
    pub fn from_f64_clamped(value: f64) -> Self {
        if value.is_nan() || value <= 0.0 {
            return Self::ZERO;
        }
        if value >= 100.0 {
            return Self::COMPLETE;
        }
        Self(value.round() as u8)
    }

    /// Computes the mean of a set of progress values, rounded to the nearest
    /// integer. An empty set yields zero.
    pub fn mean<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Progress>,
    {
        let mut sum: u32 = 0;
        let mut count: u32 = 0;
        for p in values {
            sum += u32::from(p.0);
            count += 1;
        }
        if count == 0 {
            return Self::ZERO;
        }
        Self::from_f64_clamped(f64::from(sum) / f64::from(count))
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true if progress has reached 100.
    pub fn is_complete(&self) -> bool {
        self.0 == 100
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
