//! Per-frame contact sampling.
//!
//! For every frame and both mirror variants, the sensor joint's pivot (joint
//! pose shifted by the local offset) is the center of a probe ray:
//!
//! ```text
//! dir    = pivot.rotation * normal
//! origin = pivot.position - threshold * dir
//! hit    = raycast(origin, dir, 2 * threshold, mask)
//! ```
//!
//! The origin uses the configured normal as given; the cast itself measures
//! `2 * threshold` along the normalized direction. Frames are independent, so
//! the sampler fans them out over rayon unless told otherwise.

use motion_types::{Frame, Mirror, MotionSource, Pose};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collision::{CollisionQuery, Ray};
use crate::config::ContactConfig;
use crate::error::Result;

/// Contact flags for every frame of a clip, for both mirror variants.
///
/// Indexed by [`Mirror`]: `regular` holds the recorded clip, `inverse` the
/// mirrored one. Both have one entry per clip frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactFlags {
    flags: [Vec<bool>; 2],
}

impl ContactFlags {
    /// Flags for one mirror variant.
    #[must_use]
    pub fn get(&self, mirror: Mirror) -> &[bool] {
        &self.flags[mirror.index()]
    }

    /// Flags of the recorded clip.
    #[must_use]
    pub fn regular(&self) -> &[bool] {
        self.get(Mirror::Regular)
    }

    /// Flags of the mirrored clip.
    #[must_use]
    pub fn inverse(&self) -> &[bool] {
        self.get(Mirror::Mirrored)
    }

    /// Flag for one frame index, if in range.
    #[must_use]
    pub fn at(&self, index: usize, mirror: Mirror) -> Option<bool> {
        self.get(mirror).get(index).copied()
    }

    /// Number of frames covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags[0].len()
    }

    /// Returns true if no frames are covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags[0].is_empty()
    }

    /// Number of frames in contact for one mirror variant.
    #[must_use]
    pub fn contact_count(&self, mirror: Mirror) -> usize {
        self.get(mirror).iter().filter(|&&c| c).count()
    }
}

/// Computes [`ContactFlags`] for a clip.
///
/// # Example
///
/// ```
/// use motion_contact::{Collider, CollisionWorld, ContactConfig, ContactSampler};
/// use motion_types::{FrameSample, JointId, MotionClip, Pose, Skeleton};
/// use nalgebra::Point3;
///
/// // A single foot joint hovering 5 cm above the ground, then 50 cm.
/// let samples = [0.05, 0.5]
///     .into_iter()
///     .map(|y| {
///         let foot = Pose::from_position(Point3::new(0.0, y, 0.0));
///         FrameSample::new(Pose::identity(), vec![foot])
///     })
///     .collect();
/// let clip = MotionClip::new(Skeleton::new(["Foot"]), 30.0, samples).unwrap();
/// let world = CollisionWorld::new().with(Collider::ground(0.0, 0));
///
/// let flags = ContactSampler::default()
///     .compute(&clip, &ContactConfig::for_sensor(JointId::new(0)), &world)
///     .unwrap();
///
/// assert_eq!(flags.regular(), &[true, false]);
/// assert_eq!(flags.inverse(), &[true, false]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSampler {
    /// Whether to cast rays for different frames in parallel (via rayon).
    pub parallel: bool,
}

impl Default for ContactSampler {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl ContactSampler {
    /// Sampler that works through frames on the calling thread.
    #[must_use]
    pub const fn sequential() -> Self {
        Self { parallel: false }
    }

    /// Compute contact flags for every frame and both mirror variants.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid for this clip. No ray is cast
    /// in that case.
    pub fn compute<C, Q>(&self, clip: &C, config: &ContactConfig, query: &Q) -> Result<ContactFlags>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        config.validate(clip.joint_count())?;

        let flags = ContactFlags {
            flags: Mirror::ALL.map(|mirror| self.compute_variant(clip, config, query, mirror)),
        };

        debug!(
            sensor = %config.sensor,
            frames = flags.len(),
            regular = flags.contact_count(Mirror::Regular),
            inverse = flags.contact_count(Mirror::Mirrored),
            "Computed contacts"
        );

        Ok(flags)
    }

    fn compute_variant<C, Q>(
        &self,
        clip: &C,
        config: &ContactConfig,
        query: &Q,
        mirror: Mirror,
    ) -> Vec<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let hit = |index: usize| {
            clip.frame(index)
                .is_some_and(|frame| probe(clip, config, query, frame, mirror))
        };
        if self.parallel {
            (0..clip.frame_count()).into_par_iter().map(hit).collect()
        } else {
            (0..clip.frame_count()).map(hit).collect()
        }
    }
}

/// The sensor joint's pose shifted by the configured local offset.
///
/// Returns `None` if the sensor joint does not exist.
#[must_use]
pub fn pivot_pose<C>(clip: &C, frame: Frame, mirror: Mirror, config: &ContactConfig) -> Option<Pose>
where
    C: MotionSource + ?Sized,
{
    clip.joint_pose(frame, config.sensor, mirror)
        .map(|pose| pose.translated_local(&config.offset))
}

/// Casts the probe ray for one frame.
///
/// Returns false if the sensor joint does not exist.
#[must_use]
pub fn probe<C, Q>(
    clip: &C,
    config: &ContactConfig,
    query: &Q,
    frame: Frame,
    mirror: Mirror,
) -> bool
where
    C: MotionSource + ?Sized,
    Q: CollisionQuery + ?Sized,
{
    let Some(pivot) = pivot_pose(clip, frame, mirror, config) else {
        return false;
    };
    let direction = pivot.rotation * config.normal;
    let ray = Ray::new(pivot.position - direction * config.threshold, direction);
    query.raycast(&ray, config.ray_length(), config.mask)
}

/// A clip plus the collision world its contacts are tested against.
///
/// Passed to every operation that may recompute contact flags.
#[derive(Debug)]
pub struct ContactScene<'a, C: ?Sized, Q: ?Sized> {
    /// The clip.
    pub clip: &'a C,
    /// The collision world.
    pub query: &'a Q,
    /// How frames are sampled.
    pub sampler: ContactSampler,
}

impl<'a, C: ?Sized, Q: ?Sized> ContactScene<'a, C, Q> {
    /// Scene with the default (parallel) sampler.
    #[must_use]
    pub fn new(clip: &'a C, query: &'a Q) -> Self {
        Self {
            clip,
            query,
            sampler: ContactSampler::default(),
        }
    }

    /// Use a different sampler.
    #[must_use]
    pub fn with_sampler(mut self, sampler: ContactSampler) -> Self {
        self.sampler = sampler;
        self
    }
}

impl<C: ?Sized, Q: ?Sized> Clone for ContactScene<'_, C, Q> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized, Q: ?Sized> Copy for ContactScene<'_, C, Q> {}

impl<C, Q> ContactScene<'_, C, Q>
where
    C: MotionSource + ?Sized,
    Q: CollisionQuery + ?Sized,
{
    /// Compute flags for `config` in this scene.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid for the clip.
    pub fn compute(&self, config: &ContactConfig) -> Result<ContactFlags> {
        self.sampler.compute(self.clip, config, self.query)
    }
}
