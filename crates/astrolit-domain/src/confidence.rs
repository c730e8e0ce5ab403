//! Confidence values in the closed unit interval

use crate::DomainError;

/// A classifier confidence in [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Confidence(f64);

impl Confidence {
    /// Zero confidence, used when no signal was found
    pub const ZERO: Confidence = Confidence(0.0);

    /// Create a confidence, rejecting NaN and values outside [0, 1]
    ///
    /// # Examples
    ///
    /// ```
    /// use astrolit_domain::Confidence;
    ///
    /// assert!(Confidence::new(0.7).is_ok());
    /// assert!(Confidence::new(1.2).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(DomainError::ConfidenceOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Create a confidence, saturating into [0, 1] (NaN becomes 0)
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Raw value
    pub fn value(&self) -> f64 {
        self.0
    }
}
