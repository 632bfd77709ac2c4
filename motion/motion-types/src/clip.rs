//! In-memory motion clip.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::frame::{ClipId, Frame};
use crate::pose::{Mirror, Pose};
use crate::skeleton::{JointId, Skeleton};
use crate::source::MotionSource;

/// Recorded data for one frame: the root and every joint in world space.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameSample {
    /// Character root (usually the hips projected onto the ground).
    pub root: Pose,
    /// World pose of each joint, in skeleton order.
    pub joints: Vec<Pose>,
}

impl FrameSample {
    /// Create a frame sample.
    #[must_use]
    pub const fn new(root: Pose, joints: Vec<Pose>) -> Self {
        Self { root, joints }
    }
}

/// A motion-capture clip held in memory.
///
/// Velocities are finite differences of consecutive frames: frame `i` uses
/// `(p[i] - p[i-1]) * framerate`, the first frame uses the forward difference
/// and a single-frame clip has zero velocity. Mirrored lookups read the
/// symmetric joint and reflect it across the skeleton's mirror plane.
///
/// # Example
///
/// ```
/// use motion_types::{FrameSample, Mirror, MotionClip, MotionSource, Pose, Skeleton};
/// use nalgebra::{Point3, Vector3};
///
/// let skeleton = Skeleton::new(["Hips"]);
/// let samples = (0..31)
///     .map(|i| {
///         let root = Pose::from_position(Point3::new(f64::from(i) / 30.0, 0.0, 0.0));
///         FrameSample::new(root, vec![root])
///     })
///     .collect();
///
/// let clip = MotionClip::new(skeleton, 30.0, samples).unwrap();
/// assert!((clip.total_time() - 1.0).abs() < 1e-12);
///
/// let frame = clip.frame_at(0.5);
/// let velocity = clip.root_velocity(frame, Mirror::Regular);
/// assert!((velocity - Vector3::x()).norm() < 1e-9);
///
/// let mirrored = clip.root_velocity(frame, Mirror::Mirrored);
/// assert!((mirrored + Vector3::x()).norm() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct MotionClip {
    id: ClipId,
    skeleton: Skeleton,
    framerate: f64,
    samples: Vec<FrameSample>,
}

impl MotionClip {
    /// Build a clip from per-frame samples.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no samples, the framerate is not positive
    /// and finite, the skeleton's symmetry map is invalid, or a sample's joint
    /// count differs from the skeleton's.
    pub fn new(skeleton: Skeleton, framerate: f64, samples: Vec<FrameSample>) -> Result<Self> {
        if !framerate.is_finite() || framerate <= 0.0 {
            return Err(MotionError::InvalidFramerate(framerate));
        }
        skeleton.validate()?;
        if samples.is_empty() {
            return Err(MotionError::EmptyClip);
        }
        if let Some((frame, sample)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.joints.len() != skeleton.len())
        {
            return Err(MotionError::joint_count_mismatch(
                frame,
                skeleton.len(),
                sample.joints.len(),
            ));
        }
        Ok(Self {
            id: ClipId::next(),
            skeleton,
            framerate,
            samples,
        })
    }

    /// The skeleton.
    #[must_use]
    pub const fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// All frame samples in time order.
    #[must_use]
    pub fn samples(&self) -> &[FrameSample] {
        &self.samples
    }

    fn sample(&self, index: usize) -> &FrameSample {
        // Construction guarantees at least one sample.
        &self.samples[index.min(self.samples.len() - 1)]
    }

    /// Indices used for the finite difference at `index`.
    fn difference_pair(&self, index: usize) -> Option<(usize, usize)> {
        let last = self.samples.len() - 1;
        let index = index.min(last);
        match (index, last) {
            (_, 0) => None,
            (0, _) => Some((0, 1)),
            (i, _) => Some((i - 1, i)),
        }
    }

    fn velocity_of<F>(&self, index: usize, position: F) -> Vector3<f64>
    where
        F: Fn(&FrameSample) -> Vector3<f64>,
    {
        self.difference_pair(index).map_or_else(Vector3::zeros, |(a, b)| {
            (position(self.sample(b)) - position(self.sample(a))) * self.framerate
        })
    }

    fn reflect(&self, pose: Pose, mirror: Mirror) -> Pose {
        match mirror {
            Mirror::Regular => pose,
            Mirror::Mirrored => pose.mirrored(self.skeleton.mirror_axis()),
        }
    }

    fn reflect_vector(&self, vector: Vector3<f64>, mirror: Mirror) -> Vector3<f64> {
        match mirror {
            Mirror::Regular => vector,
            Mirror::Mirrored => self.skeleton.mirror_axis().reflect_vector(&vector),
        }
    }

    /// Joint index actually read for `joint` under `mirror`.
    fn source_joint(&self, joint: JointId, mirror: Mirror) -> Option<usize> {
        if !self.skeleton.contains(joint) {
            return None;
        }
        Some(match mirror {
            Mirror::Regular => joint.index(),
            Mirror::Mirrored => self.skeleton.symmetric(joint).index(),
        })
    }
}

impl MotionSource for MotionClip {
    fn clip_id(&self) -> ClipId {
        self.id
    }

    fn frame_count(&self) -> usize {
        self.samples.len()
    }

    fn framerate(&self) -> f64 {
        self.framerate
    }

    fn joint_count(&self) -> usize {
        self.skeleton.len()
    }

    fn root_pose(&self, frame: Frame, mirror: Mirror) -> Pose {
        self.reflect(self.sample(frame.index()).root, mirror)
    }

    fn root_velocity(&self, frame: Frame, mirror: Mirror) -> Vector3<f64> {
        let velocity = self.velocity_of(frame.index(), |s| s.root.position.coords);
        self.reflect_vector(velocity, mirror)
    }

    fn joint_pose(&self, frame: Frame, joint: JointId, mirror: Mirror) -> Option<Pose> {
        let source = self.source_joint(joint, mirror)?;
        let pose = *self.sample(frame.index()).joints.get(source)?;
        Some(self.reflect(pose, mirror))
    }

    fn joint_velocity(
        &self,
        frame: Frame,
        joint: JointId,
        mirror: Mirror,
    ) -> Option<Vector3<f64>> {
        let source = self.source_joint(joint, mirror)?;
        let velocity = self.velocity_of(frame.index(), |s| {
            s.joints
                .get(source)
                .map_or_else(Vector3::zeros, |pose| pose.position.coords)
        });
        Some(self.reflect_vector(velocity, mirror))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn skeleton() -> Skeleton {
        Skeleton::new(["Hips", "LeftFoot", "RightFoot"]).with_name_symmetry()
    }

    /// Root walks along +Z at 1 m/s, left foot at x=+0.1, right foot at x=-0.2.
    fn walking_clip(frames: usize) -> MotionClip {
        let samples = (0..frames)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let z = i as f64 / 30.0;
                let root = Pose::from_position(Point3::new(0.0, 0.0, z));
                FrameSample::new(
                    root,
                    vec![
                        Pose::from_position(Point3::new(0.0, 1.0, z)),
                        Pose::from_position(Point3::new(0.1, 0.05, z)),
                        Pose::from_position(Point3::new(-0.2, 0.05, z + 0.3)),
                    ],
                )
            })
            .collect();
        MotionClip::new(skeleton(), 30.0, samples).unwrap()
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(
            MotionClip::new(skeleton(), 30.0, Vec::new()).unwrap_err(),
            MotionError::EmptyClip
        );
        assert!(matches!(
            MotionClip::new(skeleton(), 0.0, vec![FrameSample::default()]).unwrap_err(),
            MotionError::InvalidFramerate(_)
        ));
        assert!(matches!(
            MotionClip::new(skeleton(), f64::NAN, vec![FrameSample::default()]).unwrap_err(),
            MotionError::InvalidFramerate(_)
        ));
        let err = MotionClip::new(skeleton(), 30.0, vec![FrameSample::default()]).unwrap_err();
        assert_eq!(err, MotionError::joint_count_mismatch(0, 3, 0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejects_deserialized_skeleton_with_bad_symmetry() {
        let json = r#"{"names":["LeftFoot"],"symmetry":[5],"mirror_axis":"X"}"#;
        let skeleton: Skeleton = serde_json::from_str(json).unwrap();
        let sample = FrameSample::new(Pose::identity(), vec![Pose::identity()]);
        assert_eq!(
            MotionClip::new(skeleton, 30.0, vec![sample; 2]).unwrap_err(),
            MotionError::InvalidSymmetry { joint: 0, target: 5, len: 1 }
        );
    }

    #[test]
    fn root_velocity_uses_finite_differences() {
        let clip = walking_clip(10);
        for index in [0, 1, 9] {
            let frame = clip.frame(index).unwrap();
            let v = clip.root_velocity(frame, Mirror::Regular);
            assert_relative_eq!(v, Vector3::z(), epsilon = 1e-9);
        }
    }

    #[test]
    fn single_frame_has_zero_velocity() {
        let clip = walking_clip(1);
        let v = clip.root_velocity(clip.first_frame(), Mirror::Regular);
        assert_eq!(v, Vector3::zeros());
        let jv = clip
            .joint_velocity(clip.first_frame(), JointId(1), Mirror::Mirrored)
            .unwrap();
        assert_eq!(jv, Vector3::zeros());
    }

    #[test]
    fn mirrored_joint_reads_symmetric_side() {
        let clip = walking_clip(5);
        let frame = clip.frame(2).unwrap();

        let left = clip.joint_pose(frame, JointId(1), Mirror::Regular).unwrap();
        assert_relative_eq!(left.position.x, 0.1);

        // Mirrored left foot is the right foot reflected across X.
        let mirrored_left = clip.joint_pose(frame, JointId(1), Mirror::Mirrored).unwrap();
        assert_relative_eq!(mirrored_left.position.x, 0.2);
        assert_relative_eq!(mirrored_left.position.z, 2.0 / 30.0 + 0.3, epsilon = 1e-12);
    }

    #[test]
    fn unknown_joint_is_none() {
        let clip = walking_clip(3);
        let frame = clip.first_frame();
        assert!(clip.joint_pose(frame, JointId(3), Mirror::Regular).is_none());
        assert!(clip.joint_velocity(frame, JointId(3), Mirror::Regular).is_none());
    }

    #[test]
    fn foreign_frame_index_is_clamped() {
        let clip = walking_clip(3);
        let other = walking_clip(10);
        let far = other.last_frame();
        let pose = clip.root_pose(far, Mirror::Regular);
        assert_relative_eq!(pose.position.z, 2.0 / 30.0, epsilon = 1e-12);
    }
}
