//! Error types for clip construction and skeleton lookups.

use thiserror::Error;

/// Errors that can occur while building or querying motion data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotionError {
    /// A clip needs at least one frame.
    #[error("motion clip has no frames")]
    EmptyClip,

    /// The framerate must be positive and finite.
    #[error("invalid framerate: {0} (must be positive and finite)")]
    InvalidFramerate(f64),

    /// A frame sample does not carry one pose per skeleton joint.
    #[error("frame {frame} has {actual} joint poses, skeleton has {expected}")]
    JointCountMismatch {
        /// Index of the offending frame.
        frame: usize,
        /// Number of joints in the skeleton.
        expected: usize,
        /// Number of poses in the frame sample.
        actual: usize,
    },

    /// The symmetry map does not cover every joint.
    #[error("symmetry map has {actual} entries, skeleton has {expected} joints")]
    SymmetryLength {
        /// Number of joints in the skeleton.
        expected: usize,
        /// Number of entries in the symmetry map.
        actual: usize,
    },

    /// A symmetry entry points outside the skeleton.
    #[error("joint {joint} maps to symmetric joint {target}, skeleton has {len} joints")]
    InvalidSymmetry {
        /// The joint whose entry is invalid.
        joint: usize,
        /// The out-of-range target.
        target: usize,
        /// Number of joints in the skeleton.
        len: usize,
    },

    /// No joint with the given name exists.
    #[error("unknown joint: {0}")]
    UnknownJoint(String),
}

impl MotionError {
    /// Creates a joint count mismatch error.
    #[must_use]
    pub const fn joint_count_mismatch(frame: usize, expected: usize, actual: usize) -> Self {
        Self::JointCountMismatch {
            frame,
            expected,
            actual,
        }
    }

    /// Creates an unknown joint error.
    #[must_use]
    pub fn unknown_joint(name: impl Into<String>) -> Self {
        Self::UnknownJoint(name.into())
    }
}

/// Result type for motion data operations.
pub type Result<T> = std::result::Result<T, MotionError>;
