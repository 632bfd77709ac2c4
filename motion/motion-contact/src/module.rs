//! The set of contact sensors of one skeleton.

use std::collections::BTreeMap;

use motion_types::{Frame, JointId, Mirror, MotionSource, Skeleton};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collision::CollisionQuery;
use crate::config::ContactConfig;
use crate::error::{ContactError, Result};
use crate::function::ContactFunction;
use crate::sampler::ContactScene;

/// Contact functions keyed by sensor joint.
///
/// At most one function exists per sensor. Functions are kept ordered by
/// joint index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactModule {
    names: Vec<String>,
    functions: BTreeMap<JointId, ContactFunction>,
}

impl ContactModule {
    /// Empty module for `skeleton`.
    #[must_use]
    pub fn new(skeleton: &Skeleton) -> Self {
        Self {
            names: skeleton.names().to_vec(),
            functions: BTreeMap::new(),
        }
    }

    /// Joint names the module was created with.
    #[must_use]
    pub fn joint_names(&self) -> &[String] {
        &self.names
    }

    /// Name of a joint.
    #[must_use]
    pub fn joint_name(&self, joint: JointId) -> Option<&str> {
        self.names.get(joint.index()).map(String::as_str)
    }

    /// Add a sensor with the default configuration.
    ///
    /// Returns `Ok(false)` and logs a warning if the sensor already has a
    /// function.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor does not exist in the clip.
    pub fn add<C, Q>(&mut self, scene: ContactScene<'_, C, Q>, sensor: JointId) -> Result<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        self.add_with(scene, ContactConfig::for_sensor(sensor))
    }

    /// Add a sensor with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid for the clip.
    pub fn add_with<C, Q>(
        &mut self,
        scene: ContactScene<'_, C, Q>,
        config: ContactConfig,
    ) -> Result<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        if self.functions.contains_key(&config.sensor) {
            warn!(
                sensor = %config.sensor,
                name = self.joint_name(config.sensor).unwrap_or("?"),
                "contact already exists"
            );
            return Ok(false);
        }
        let function = ContactFunction::new(scene, config)?;
        self.functions.insert(config.sensor, function);
        Ok(true)
    }

    /// Add a sensor by joint name.
    ///
    /// # Errors
    ///
    /// Returns an error if no joint has that name.
    pub fn add_named<C, Q>(&mut self, scene: ContactScene<'_, C, Q>, name: &str) -> Result<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let sensor = self
            .names
            .iter()
            .position(|n| n == name)
            .map(JointId::new)
            .ok_or_else(|| motion_types::MotionError::unknown_joint(name))?;
        self.add(scene, sensor)
    }

    /// Remove a sensor. Logs a warning and returns false if absent.
    pub fn remove(&mut self, sensor: JointId) -> bool {
        if self.functions.remove(&sensor).is_some() {
            true
        } else {
            warn!(sensor = %sensor, "contact does not exist");
            false
        }
    }

    /// The function for a sensor.
    #[must_use]
    pub fn get(&self, sensor: JointId) -> Option<&ContactFunction> {
        self.functions.get(&sensor)
    }

    /// All functions, ordered by sensor.
    pub fn iter(&self) -> impl Iterator<Item = &ContactFunction> {
        self.functions.values()
    }

    /// All sensors, in order.
    pub fn sensors(&self) -> impl Iterator<Item = JointId> + '_ {
        self.functions.keys().copied()
    }

    /// Number of sensors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if there are no sensors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Reconfigure the function for `sensor`.
    ///
    /// If `config.sensor` differs from `sensor`, the function moves to the
    /// new key. Returns whether the flags were recomputed.
    ///
    /// # Errors
    ///
    /// - [`ContactError::UnknownSensor`] if `sensor` has no function
    /// - [`ContactError::DuplicateSensor`] if the new sensor already has one
    /// - any validation error of `config`
    ///
    /// On error the module is unchanged.
    pub fn configure<C, Q>(
        &mut self,
        scene: ContactScene<'_, C, Q>,
        sensor: JointId,
        config: ContactConfig,
    ) -> Result<bool>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        if config.sensor != sensor && self.functions.contains_key(&config.sensor) {
            return Err(ContactError::DuplicateSensor(config.sensor));
        }
        let function = self
            .functions
            .get_mut(&sensor)
            .ok_or(ContactError::UnknownSensor(sensor))?;
        let changed = function.reconfigure(scene, config)?;
        if config.sensor != sensor {
            if let Some(function) = self.functions.remove(&sensor) {
                self.functions.insert(config.sensor, function);
            }
        }
        Ok(changed)
    }

    /// Recompute every function.
    ///
    /// All flags are computed first and swapped in together.
    ///
    /// # Errors
    ///
    /// Returns the first error; every function keeps its old flags.
    pub fn compute_all<C, Q>(&mut self, scene: ContactScene<'_, C, Q>) -> Result<()>
    where
        C: MotionSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let computed = self
            .functions
            .values()
            .map(|function| scene.compute(function.config()))
            .collect::<Result<Vec<_>>>()?;
        for (function, flags) in self.functions.values_mut().zip(computed) {
            function.replace_flags(flags);
        }
        info!(
            sensors = self.functions.len(),
            frames = scene.clip.frame_count(),
            "computed contacts"
        );
        Ok(())
    }

    /// Contact state of `sensor` at `frame`.
    ///
    /// Returns `None` if the sensor has no function or the frame is out of
    /// range.
    #[must_use]
    pub fn has_contact(&self, sensor: JointId, frame: Frame, mirror: Mirror) -> Option<bool> {
        self.get(sensor)?.has_contact(frame, mirror)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::collision::{Collider, CollisionWorld};
    use motion_types::{FrameSample, MotionClip, Pose};
    use nalgebra::Point3;

    fn skeleton() -> Skeleton {
        Skeleton::new(["Hips", "LeftFoot", "RightFoot"]).with_name_symmetry()
    }

    /// Left foot planted, right foot lifted.
    fn clip() -> MotionClip {
        let sample = FrameSample::new(
            Pose::identity(),
            vec![
                Pose::from_position(Point3::new(0.0, 1.0, 0.0)),
                Pose::from_position(Point3::new(0.1, 0.03, 0.0)),
                Pose::from_position(Point3::new(-0.1, 0.5, 0.0)),
            ],
        );
        MotionClip::new(skeleton(), 30.0, vec![sample; 10]).unwrap()
    }

    #[test]
    fn add_and_remove() {
        let clip = clip();
        let world = CollisionWorld::new().with(Collider::ground(0.0, 0));
        let scene = ContactScene::new(&clip, &world);
        let mut module = ContactModule::new(clip.skeleton());

        assert!(module.add_named(scene, "LeftFoot").unwrap());
        assert!(!module.add(scene, JointId::new(1)).unwrap());
        assert!(module.add(scene, JointId::new(2)).unwrap());
        assert_eq!(module.len(), 2);
        assert_eq!(
            module.sensors().collect::<Vec<_>>(),
            vec![JointId::new(1), JointId::new(2)]
        );

        assert!(module.remove(JointId::new(2)));
        assert!(!module.remove(JointId::new(2)));
        assert_eq!(module.len(), 1);
    }

    #[test]
    fn add_rejects_unknown_joint() {
        let clip = clip();
        let world = CollisionWorld::new();
        let scene = ContactScene::new(&clip, &world);
        let mut module = ContactModule::new(clip.skeleton());

        assert!(matches!(
            module.add_named(scene, "Tail").unwrap_err(),
            ContactError::Motion(_)
        ));
        assert!(matches!(
            module.add(scene, JointId::new(7)).unwrap_err(),
            ContactError::InvalidSensor { .. }
        ));
        assert!(module.is_empty());
    }

    #[test]
    fn has_contact_per_sensor() {
        let clip = clip();
        let world = CollisionWorld::new().with(Collider::ground(0.0, 0));
        let scene = ContactScene::new(&clip, &world);
        let mut module = ContactModule::new(clip.skeleton());
        module.add(scene, JointId::new(1)).unwrap();
        module.add(scene, JointId::new(2)).unwrap();

        let frame = clip.frame(4).unwrap();
        assert_eq!(module.has_contact(JointId::new(1), frame, Mirror::Regular), Some(true));
        assert_eq!(module.has_contact(JointId::new(2), frame, Mirror::Regular), Some(false));
        // Mirrored: the left foot reads the lifted right foot.
        assert_eq!(module.has_contact(JointId::new(1), frame, Mirror::Mirrored), Some(false));
        assert_eq!(module.has_contact(JointId::new(0), frame, Mirror::Regular), None);
    }

    #[test]
    fn configure_moves_sensor() {
        let clip = clip();
        let world = CollisionWorld::new().with(Collider::ground(0.0, 0));
        let scene = ContactScene::new(&clip, &world);
        let mut module = ContactModule::new(clip.skeleton());
        module.add(scene, JointId::new(1)).unwrap();
        module.add(scene, JointId::new(0)).unwrap();

        let moved = ContactConfig::for_sensor(JointId::new(2)).threshold(0.6);
        assert!(module.configure(scene, JointId::new(1), moved).unwrap());
        assert!(module.get(JointId::new(1)).is_none());
        let function = module.get(JointId::new(2)).unwrap();
        assert_eq!(function.contact_flags().contact_count(Mirror::Regular), 10);

        // Moving onto an occupied sensor is rejected.
        let clash = ContactConfig::for_sensor(JointId::new(0));
        assert_eq!(
            module.configure(scene, JointId::new(2), clash).unwrap_err(),
            ContactError::DuplicateSensor(JointId::new(0))
        );
        assert_eq!(
            module
                .configure(scene, JointId::new(1), ContactConfig::default())
                .unwrap_err(),
            ContactError::UnknownSensor(JointId::new(1))
        );
    }

    #[test]
    fn compute_all_after_world_change() {
        let clip = clip();
        let empty = CollisionWorld::new();
        let mut module = ContactModule::new(clip.skeleton());
        module.add(ContactScene::new(&clip, &empty), JointId::new(1)).unwrap();
        let frame = clip.first_frame();
        assert_eq!(module.has_contact(JointId::new(1), frame, Mirror::Regular), Some(false));

        let ground = CollisionWorld::new().with(Collider::ground(0.0, 0));
        module.compute_all(ContactScene::new(&clip, &ground)).unwrap();
        assert_eq!(module.has_contact(JointId::new(1), frame, Mirror::Regular), Some(true));
    }

    #[test]
    fn compute_all_failure_keeps_every_function() {
        let clip = clip();
        let world = CollisionWorld::new().with(Collider::ground(0.0, 0));
        let mut module = ContactModule::new(clip.skeleton());
        let scene = ContactScene::new(&clip, &world);
        for sensor in 0..3 {
            module.add(scene, JointId::new(sensor)).unwrap();
        }
        let before = module.clone();

        // Two joints and four frames: sensor 2 no longer exists.
        let sample = FrameSample::new(
            Pose::identity(),
            vec![Pose::identity(), Pose::from_position(Point3::new(0.0, 0.02, 0.0))],
        );
        let skeleton = Skeleton::new(["Hips", "LeftFoot"]);
        let smaller = MotionClip::new(skeleton, 30.0, vec![sample; 4]).unwrap();
        let err = module
            .compute_all(ContactScene::new(&smaller, &world))
            .unwrap_err();
        assert!(matches!(
            err,
            ContactError::InvalidSensor { sensor, joint_count: 2 } if sensor == JointId::new(2)
        ));

        assert_eq!(module, before);
        for function in module.iter() {
            assert_eq!(function.flags(Mirror::Regular).len(), 10);
            assert_eq!(function.flags(Mirror::Mirrored).len(), 10);
        }
    }
}
