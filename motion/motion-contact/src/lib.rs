//! Raycast-based contact labeling for motion-capture clips.
//!
//! For each configured sensor joint and every frame of a clip, a short ray
//! is cast through the joint along a configurable normal. If it hits a
//! collider on the requested layers, the frame is labeled as in contact.
//! Every clip is labeled twice: as recorded and left-right mirrored.
//!
//! - [`ContactConfig`] - Sensor joint, threshold, offset, normal and layer mask
//! - [`ContactSampler`] - Computes [`ContactFlags`] for one configuration
//! - [`ContactFunction`] - Configuration plus flags, recomputed on change
//! - [`ContactModule`] - All sensors of a skeleton
//! - [`CollisionQuery`] - Raycast seam; [`CollisionWorld`] is a small
//!   built-in implementation with planes, boxes and spheres
//!
//! # Example
//!
//! ```
//! use motion_contact::{Collider, CollisionWorld, ContactModule, ContactScene};
//! use motion_types::{FrameSample, JointId, Mirror, MotionClip, MotionSource, Pose, Skeleton};
//! use nalgebra::Point3;
//!
//! // The foot touches down on the middle frame.
//! let samples = [0.3, 0.05, 0.3]
//!     .into_iter()
//!     .map(|y| {
//!         let foot = Pose::from_position(Point3::new(0.0, y, 0.0));
//!         FrameSample::new(Pose::identity(), vec![foot])
//!     })
//!     .collect();
//! let clip = MotionClip::new(Skeleton::new(["Foot"]), 30.0, samples).unwrap();
//!
//! let world = CollisionWorld::new().with(Collider::ground(0.0, 3));
//! let scene = ContactScene::new(&clip, &world);
//!
//! let mut contacts = ContactModule::new(clip.skeleton());
//! contacts.add_named(scene, "Foot").unwrap();
//!
//! let foot = JointId::new(0);
//! assert_eq!(contacts.get(foot).unwrap().flags(Mirror::Regular), &[false, true, false]);
//! assert_eq!(contacts.has_contact(foot, clip.frame(1).unwrap(), Mirror::Regular), Some(true));
//! ```
//!
//! # Parallelism
//!
//! Frames are independent. [`ContactSampler`] spreads them over rayon's
//! global pool by default; [`ContactSampler::sequential`] keeps everything on
//! the calling thread. Both produce identical flags.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod collision;
mod config;
mod error;
mod function;
mod layer;
mod module;
mod sampler;

pub use collision::{Collider, CollisionQuery, CollisionWorld, Ray, RayHit, Shape};
pub use config::ContactConfig;
pub use error::{ContactError, Result};
pub use function::ContactFunction;
pub use layer::LayerMask;
pub use module::ContactModule;
pub use sampler::{ContactFlags, ContactSampler, ContactScene, pivot_pose, probe};
