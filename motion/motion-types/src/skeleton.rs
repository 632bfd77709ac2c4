//! Joint identifiers and skeleton metadata.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::pose::MirrorAxis;

/// Index of a joint in a [`Skeleton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointId(pub usize);

impl JointId {
    /// Create a new joint ID.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for JointId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for JointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Joint({})", self.0)
    }
}

/// Joint names plus the left/right pairing used for mirroring.
///
/// # Example
///
/// ```
/// use motion_types::{JointId, Skeleton};
///
/// let skeleton = Skeleton::new(["Hips", "LeftFoot", "RightFoot"]).with_name_symmetry();
///
/// let left = skeleton.find("LeftFoot").unwrap();
/// assert_eq!(skeleton.symmetric(left), JointId::new(2));
/// assert_eq!(skeleton.symmetric(JointId::new(0)), JointId::new(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Skeleton {
    names: Vec<String>,
    symmetry: Vec<usize>,
    mirror_axis: MirrorAxis,
}

impl Skeleton {
    /// Create a skeleton where every joint is its own mirror image.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let symmetry = (0..names.len()).collect();
        Self {
            names,
            symmetry,
            mirror_axis: MirrorAxis::default(),
        }
    }

    /// Set an explicit symmetry map: entry `i` is the joint that `i` maps to
    /// when the clip is mirrored.
    ///
    /// # Errors
    ///
    /// Returns an error if the map length differs from the joint count or an
    /// entry is out of range.
    pub fn with_symmetry(mut self, symmetry: Vec<usize>) -> Result<Self> {
        check_symmetry(self.names.len(), &symmetry)?;
        self.symmetry = symmetry;
        Ok(self)
    }

    /// Check that the symmetry map covers every joint and stays in range.
    ///
    /// Skeletons built through the constructors always pass; deserialized
    /// ones may not.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::SymmetryLength`] or
    /// [`MotionError::InvalidSymmetry`].
    pub fn validate(&self) -> Result<()> {
        check_symmetry(self.names.len(), &self.symmetry)
    }

    /// Pair joints whose names differ only by `Left`/`Right`.
    ///
    /// Joints without a counterpart map to themselves.
    #[must_use]
    pub fn with_name_symmetry(mut self) -> Self {
        self.symmetry = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let counterpart = if name.contains("Left") {
                    name.replacen("Left", "Right", 1)
                } else if name.contains("Right") {
                    name.replacen("Right", "Left", 1)
                } else {
                    return i;
                };
                self.names
                    .iter()
                    .position(|other| *other == counterpart)
                    .unwrap_or(i)
            })
            .collect();
        self
    }

    /// Set the axis orthogonal to the mirror plane.
    #[must_use]
    pub const fn with_mirror_axis(mut self, axis: MirrorAxis) -> Self {
        self.mirror_axis = axis;
        self
    }

    /// Number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the skeleton has no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All joint names in index order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of a joint.
    #[must_use]
    pub fn name(&self, joint: JointId) -> Option<&str> {
        self.names.get(joint.0).map(String::as_str)
    }

    /// Look up a joint by exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<JointId> {
        self.names.iter().position(|n| n == name).map(JointId)
    }

    /// Look up a joint by exact name, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownJoint`] if no joint has this name.
    pub fn require(&self, name: &str) -> Result<JointId> {
        self.find(name)
            .ok_or_else(|| MotionError::unknown_joint(name))
    }

    /// Returns true if the joint index is in range.
    #[must_use]
    pub fn contains(&self, joint: JointId) -> bool {
        joint.0 < self.names.len()
    }

    /// The joint that `joint` maps to in the mirrored clip.
    ///
    /// Out-of-range joints map to themselves.
    #[must_use]
    pub fn symmetric(&self, joint: JointId) -> JointId {
        self.symmetry.get(joint.0).map_or(joint, |&s| JointId(s))
    }

    /// The mirror axis.
    #[must_use]
    pub const fn mirror_axis(&self) -> MirrorAxis {
        self.mirror_axis
    }
}

fn check_symmetry(len: usize, symmetry: &[usize]) -> Result<()> {
    if symmetry.len() != len {
        return Err(MotionError::SymmetryLength {
            expected: len,
            actual: symmetry.len(),
        });
    }
    match symmetry.iter().enumerate().find(|&(_, &target)| target >= len) {
        Some((joint, &target)) => Err(MotionError::InvalidSymmetry { joint, target, len }),
        None => Ok(()),
    }
}
