//! Error types for contact labeling.

use motion_types::{JointId, MotionError};
use thiserror::Error;

/// Errors that can occur while configuring or computing contacts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContactError {
    /// The sensor joint does not exist in the clip.
    #[error("invalid sensor {sensor}: clip has {joint_count} joints")]
    InvalidSensor {
        /// The requested sensor joint.
        sensor: JointId,
        /// Number of joints in the clip.
        joint_count: usize,
    },

    /// The threshold must be positive and finite.
    #[error("invalid threshold: {0} (must be positive and finite)")]
    InvalidThreshold(f64),

    /// The ray normal must be finite and non-zero.
    #[error("invalid normal: {0:?} (must be finite and non-zero)")]
    InvalidNormal([f64; 3]),

    /// The pivot offset must be finite.
    #[error("invalid offset: {0:?} (must be finite)")]
    InvalidOffset([f64; 3]),

    /// A contact function already exists for this sensor.
    #[error("contact for {0} already exists")]
    DuplicateSensor(JointId),

    /// No contact function exists for this sensor.
    #[error("no contact for {0}")]
    UnknownSensor(JointId),

    /// Motion data error.
    #[error(transparent)]
    Motion(#[from] MotionError),
}

impl ContactError {
    /// Creates an invalid sensor error.
    #[must_use]
    pub const fn invalid_sensor(sensor: JointId, joint_count: usize) -> Self {
        Self::InvalidSensor {
            sensor,
            joint_count,
        }
    }
}

/// Result type for contact operations.
pub type Result<T> = std::result::Result<T, ContactError>;
