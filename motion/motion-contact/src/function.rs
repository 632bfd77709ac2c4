//! A configured sensor and its computed contact flags.

use motion_types::{Frame, JointId, Mirror, MotionSource, Pose};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionQuery;
use crate::config::ContactConfig;
use crate::error::Result;
use crate::layer::LayerMask;
use crate::sampler::{ContactFlags, ContactScene, pivot_pose};

/// Contact flags for one sensor, kept in sync with its configuration.
///
/// Every setter compares the new value with the current one. An unchanged
/// value is a no-op (`Ok(false)`) and leaves the flags untouched. A changed
/// value is validated, the flags are recomputed into a fresh buffer and only
/// then are configuration and flags swapped in (`Ok(true)`). On error nothing
/// changes.
///
/// # Example
///
/// ```
/// use motion_contact::{Collider, CollisionWorld, ContactConfig, ContactFunction, ContactScene};
/// use motion_types::{FrameSample, JointId, Mirror, MotionClip, MotionSource, Pose, Skeleton};
/// use nalgebra::Point3;
///
/// let samples = [0.05, 0.15]
///     .into_iter()
///     .map(|y| {
///         let foot = Pose::from_position(Point3::new(0.0, y, 0.0));
///         FrameSample::new(Pose::identity(), vec![foot])
///     })
///     .collect();
/// let clip = MotionClip::new(Skeleton::new(["Foot"]), 30.0, samples).unwrap();
/// let world = CollisionWorld::new().with(Collider::ground(0.0, 0));
/// let scene = ContactScene::new(&clip, &world);
///
/// let config = ContactConfig::for_sensor(JointId::new(0));
/// let mut function = ContactFunction::new(scene, config).unwrap();
/// assert_eq!(function.flags(Mirror::Regular), &[true, false]);
///
/// // Widening the threshold reaches the ground from 15 cm too.
/// assert!(function.set_threshold(scene, 0.2).unwrap());
/// assert_eq!(function.flags(Mirror::Regular), &[true, true]);
///
/// // Same value again: nothing is recomputed.
/// assert!(!function.set_threshold(scene, 0.2).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactFunction {
    config: ContactConfig,
    flags: ContactFlags,
}

impl ContactFunction {
    /// Create a function and compute its flags.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid for the scene's clip.
    pub fn new<C, Q>(scene: ContactScene<'_, C, Q>, config: ContactConfig) -> Result<Self>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let flags = scene.compute(&config)?;
        Ok(Self { config, flags })
    }

    /// The current configuration.
    #[must_use]
    pub const fn config(&self) -> &ContactConfig {
        &self.config
    }

    /// The sensor joint.
    #[must_use]
    pub const fn sensor(&self) -> JointId {
        self.config.sensor
    }

    /// Flags for both mirror variants.
    #[must_use]
    pub const fn contact_flags(&self) -> &ContactFlags {
        &self.flags
    }

    /// Flags for one mirror variant, one per clip frame.
    #[must_use]
    pub fn flags(&self, mirror: Mirror) -> &[bool] {
        self.flags.get(mirror)
    }

    /// Whether the sensor touches something at `frame`.
    ///
    /// Returns `None` if the frame index is outside the computed range.
    #[must_use]
    pub fn has_contact(&self, frame: Frame, mirror: Mirror) -> Option<bool> {
        self.flags.at(frame.index(), mirror)
    }

    /// The sensor's pivot pose at `frame`.
    #[must_use]
    pub fn pivot_pose<C>(&self, clip: &C, frame: Frame, mirror: Mirror) -> Option<Pose>
    where
        C: MotionSource + ?Sized,
    {
        pivot_pose(clip, frame, mirror, &self.config)
    }

    /// Flags of a timeline window of `window` seconds around `center`.
    ///
    /// See [`MotionSource::frame_window`].
    #[must_use]
    pub fn timeline<C>(&self, clip: &C, center: Frame, window: f64, mirror: Mirror) -> &[bool]
    where
        C: MotionSource + ?Sized,
    {
        let flags = self.flags(mirror);
        let range = clip.frame_window(center, window);
        let end = (*range.end() + 1).min(flags.len());
        let start = (*range.start()).min(end);
        &flags[start..end]
    }

    /// Recompute the flags for the current configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid for the scene's clip;
    /// the old flags are kept.
    pub fn compute<C, Q>(&mut self, scene: ContactScene<'_, C, Q>) -> Result<()>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        self.flags = scene.compute(&self.config)?;
        Ok(())
    }

    /// Swap in flags computed elsewhere for the current configuration.
    pub(crate) fn replace_flags(&mut self, flags: ContactFlags) {
        self.flags = flags;
    }

    /// Replace the whole configuration.
    ///
    /// Returns `Ok(false)` without recomputing if `config` equals the current
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid; nothing changes.
    pub fn reconfigure<C, Q>(
        &mut self,
        scene: ContactScene<'_, C, Q>,
        config: ContactConfig,
    ) -> Result<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        if config == self.config {
            return Ok(false);
        }
        let flags = scene.compute(&config)?;
        self.config = config;
        self.flags = flags;
        Ok(true)
    }

    /// Set the sensor joint.
    ///
    /// # Errors
    ///
    /// Returns an error if the joint does not exist; nothing changes.
    pub fn set_sensor<C, Q>(
        &mut self,
        scene: ContactScene<'_, C, Q>,
        sensor: JointId,
    ) -> Result<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        self.reconfigure(scene, self.config.sensor(sensor))
    }

    /// Set the threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is not positive and finite; nothing
    /// changes.
    pub fn set_threshold<C, Q>(
        &mut self,
        scene: ContactScene<'_, C, Q>,
        threshold: f64,
    ) -> Result<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        self.reconfigure(scene, self.config.threshold(threshold))
    }

    /// Set the pivot offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset is not finite; nothing changes.
    pub fn set_offset<C, Q>(
        &mut self,
        scene: ContactScene<'_, C, Q>,
        offset: Vector3<f64>,
    ) -> Result<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        self.reconfigure(scene, self.config.offset(offset))
    }

    /// Set the ray normal.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero or not finite; nothing changes.
    pub fn set_normal<C, Q>(
        &mut self,
        scene: ContactScene<'_, C, Q>,
        normal: Vector3<f64>,
    ) -> Result<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        self.reconfigure(scene, self.config.normal(normal))
    }

    /// Set the layer mask.
    ///
    /// # Errors
    ///
    /// Returns an error only if the stored configuration has become invalid
    /// for the scene's clip; nothing changes in that case.
    pub fn set_mask<C, Q>(
        &mut self,
        scene: ContactScene<'_, C, Q>,
        mask: LayerMask,
    ) -> Result<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        self.reconfigure(scene, self.config.mask(mask))
    }
}
