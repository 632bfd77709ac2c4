//! Sampling window configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrajectoryError};

/// Time span covered by a trajectory window.
///
/// Six past points are spread evenly over `past_horizon` seconds before the
/// reference frame and five future points over `future_horizon` seconds
/// after it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// Seconds covered before the reference frame.
    pub past_horizon: f64,
    /// Seconds covered after the reference frame.
    pub future_horizon: f64,
    /// Smoothing window passed through to style and phase providers.
    pub provider_window: usize,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            past_horizon: 1.0,
            future_horizon: 1.0,
            provider_window: 0,
        }
    }
}

impl TrajectoryConfig {
    /// Set the past horizon.
    #[must_use]
    pub const fn past_horizon(mut self, seconds: f64) -> Self {
        self.past_horizon = seconds;
        self
    }

    /// Set the future horizon.
    #[must_use]
    pub const fn future_horizon(mut self, seconds: f64) -> Self {
        self.future_horizon = seconds;
        self
    }

    /// Set the provider window.
    #[must_use]
    pub const fn provider_window(mut self, window: usize) -> Self {
        self.provider_window = window;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either horizon is not positive and finite.
    pub fn validate(&self) -> Result<()> {
        if !self.past_horizon.is_finite() || self.past_horizon <= 0.0 {
            return Err(TrajectoryError::invalid_config(format!(
                "past_horizon must be positive and finite, got {}",
                self.past_horizon
            )));
        }
        if !self.future_horizon.is_finite() || self.future_horizon <= 0.0 {
            return Err(TrajectoryError::invalid_config(format!(
                "future_horizon must be positive and finite, got {}",
                self.future_horizon
            )));
        }
        Ok(())
    }
}
