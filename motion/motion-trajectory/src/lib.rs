//! Fixed-window trajectory features for motion-capture clips.
//!
//! A [`Trajectory`] is twelve root samples around a reference frame: six in
//! the past, the reference frame itself and five in the future, spread over
//! configurable horizons (one second each way by default). Each point carries
//! the root pose and velocity, and optionally per-style weights, transition
//! signals and a locomotion phase.
//!
//! - [`TrajectorySampler`] - Builds a [`Trajectory`] from any
//!   [`MotionSource`](motion_types::MotionSource)
//! - [`TrajectoryConfig`] - Horizons and provider smoothing window
//! - [`StyleProvider`] / [`PhaseProvider`] - Optional annotations, with
//!   in-memory [`StyleTrack`] and [`PhaseTrack`]
//! - [`phase`] - Cyclic `[0, 1)` arithmetic
//!
//! # Clip Boundaries
//!
//! Samples that fall outside the clip are reflected around the first or last
//! frame, so every reference frame, including the first and the last, yields
//! a full window.
//!
//! # Example
//!
//! ```
//! use motion_trajectory::{PhaseTrack, TrajectorySampler};
//! use motion_types::{FrameSample, Mirror, MotionClip, MotionSource, Pose, Skeleton};
//!
//! let clip = MotionClip::new(
//!     Skeleton::new(Vec::<String>::new()),
//!     30.0,
//!     vec![FrameSample::new(Pose::identity(), vec![]); 100],
//! )
//! .unwrap();
//! let phases = PhaseTrack::new((0..100).map(|i| f64::from(i) / 25.0).collect()).unwrap();
//!
//! let trajectory = TrajectorySampler::default()
//!     .sample(&clip, clip.first_frame(), Mirror::Regular, None, Some(&phases))
//!     .unwrap();
//!
//! assert_eq!(trajectory.len(), 12);
//! assert!(trajectory.current().styles.is_empty());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
pub mod phase;
mod point;
mod provider;
mod sampler;

pub use config::TrajectoryConfig;
pub use error::{Result, TrajectoryError};
pub use point::{CURRENT, POINTS, Trajectory, TrajectoryPoint};
pub use provider::{PhaseProvider, PhaseTrack, StyleProvider, StyleTrack};
pub use sampler::TrajectorySampler;
