//! Core types for motion-capture clips.
//!
//! This crate provides the data model shared by the annotation crates:
//!
//! - [`Pose`] - World position and orientation of a joint or root
//! - [`Mirror`] and [`MirrorAxis`] - Left-right reflection, computed on the fly
//! - [`Skeleton`] and [`JointId`] - Joint names and symmetry pairs
//! - [`Frame`] and [`ClipId`] - Handles into a recorded clip
//! - [`MotionSource`] - Read-only frame store consumed by the samplers
//! - [`MotionClip`] - In-memory [`MotionSource`]
//!
//! # Layer 0 Crate
//!
//! These types are **pure data** plus lookups. There is no I/O, no editor
//! integration and no rendering. The samplers in `motion-contact` and
//! `motion-trajectory` only see clips through [`MotionSource`], so any
//! engine-side clip representation can be plugged in.
//!
//! # Frame Convention
//!
//! Frames are 0-based. Frame `i` of a clip sampled at `framerate` has
//! timestamp `i / framerate`, and the clip's total time is the timestamp of
//! its last frame. Time lookups round to the nearest frame and clamp to the
//! clip.
//!
//! # Example
//!
//! ```
//! use motion_types::{FrameSample, Mirror, MotionClip, MotionSource, Pose, Skeleton};
//! use nalgebra::Point3;
//!
//! let skeleton = Skeleton::new(["Hips", "LeftFoot", "RightFoot"]).with_name_symmetry();
//! let sample = FrameSample::new(
//!     Pose::identity(),
//!     vec![
//!         Pose::from_position(Point3::new(0.0, 1.0, 0.0)),
//!         Pose::from_position(Point3::new(0.1, 0.0, 0.0)),
//!         Pose::from_position(Point3::new(-0.1, 0.0, 0.0)),
//!     ],
//! );
//!
//! let clip = MotionClip::new(skeleton, 60.0, vec![sample; 120]).unwrap();
//! assert_eq!(clip.frame_count(), 120);
//!
//! let foot = clip.skeleton().require("LeftFoot").unwrap();
//! let pose = clip.joint_pose(clip.first_frame(), foot, Mirror::Mirrored).unwrap();
//! assert!((pose.position.x - 0.1).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod clip;
mod error;
mod frame;
mod pose;
mod skeleton;
mod source;

pub use clip::{FrameSample, MotionClip};
pub use error::{MotionError, Result};
pub use frame::{ClipId, Frame};
pub use pose::{Mirror, MirrorAxis, Pose};
pub use skeleton::{JointId, Skeleton};
pub use source::MotionSource;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
