//! Error types for trajectory sampling.

use motion_types::ClipId;
use thiserror::Error;

/// Errors that can occur while sampling a trajectory.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrajectoryError {
    /// The reference frame does not belong to the sampled clip.
    #[error("frame {index} of clip {frame_clip} does not belong to clip {clip}")]
    ForeignFrame {
        /// Clip the frame came from.
        frame_clip: ClipId,
        /// Index of the frame.
        index: usize,
        /// Clip being sampled.
        clip: ClipId,
    },

    /// A style provider returned a vector of the wrong length.
    #[error("style dimension mismatch: expected {expected}, got {actual}")]
    StyleDimension {
        /// Number of styles in the provider's catalog.
        expected: usize,
        /// Length of the returned vector.
        actual: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },
}

impl TrajectoryError {
    /// Create a style dimension error.
    #[must_use]
    pub const fn style_dimension(expected: usize, actual: usize) -> Self {
        Self::StyleDimension { expected, actual }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Result type for trajectory operations.
pub type Result<T> = std::result::Result<T, TrajectoryError>;
