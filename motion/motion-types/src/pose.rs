//! Rigid poses and left-right mirroring.
//!
//! Mocap clips are stored once and mirrored on the fly. A mirrored pose is
//! the original pose reflected across the plane orthogonal to the clip's
//! [`MirrorAxis`]: the position component along the axis flips sign, and the
//! rotation keeps its component about the axis while the other two
//! quaternion components flip sign (`M R M` for the reflection `M`).

use nalgebra::{Isometry3, Point3, Quaternion, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Selects the regular or the mirrored variant of a clip.
///
/// Threaded through every lookup instead of duplicating code paths. Per-frame
/// data that exists for both variants is stored as `[T; 2]` indexed by
/// [`Mirror::index`].
///
/// # Example
///
/// ```
/// use motion_types::Mirror;
///
/// let flags = [false, true];
/// assert!(!flags[Mirror::Regular.index()]);
/// assert!(flags[Mirror::Mirrored.index()]);
/// assert_eq!(Mirror::from(true), Mirror::Mirrored);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mirror {
    /// The clip as recorded.
    #[default]
    Regular,
    /// The left-right reflected clip.
    Mirrored,
}

impl Mirror {
    /// Both variants, in index order.
    pub const ALL: [Self; 2] = [Self::Regular, Self::Mirrored];

    /// Position of this variant in a `[T; 2]` pair.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Regular => 0,
            Self::Mirrored => 1,
        }
    }

    /// Returns true for [`Mirror::Mirrored`].
    #[must_use]
    pub const fn is_mirrored(self) -> bool {
        matches!(self, Self::Mirrored)
    }
}

impl From<bool> for Mirror {
    fn from(mirrored: bool) -> Self {
        if mirrored {
            Self::Mirrored
        } else {
            Self::Regular
        }
    }
}

/// World axis orthogonal to the mirror plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MirrorAxis {
    /// Reflect across the YZ plane (left/right along X).
    #[default]
    X,
    /// Reflect across the XZ plane.
    Y,
    /// Reflect across the XY plane.
    Z,
}

impl MirrorAxis {
    const fn component(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Reflects a point across the mirror plane.
    #[must_use]
    pub fn reflect_point(self, point: &Point3<f64>) -> Point3<f64> {
        let mut out = *point;
        out[self.component()] = -out[self.component()];
        out
    }

    /// Reflects a free vector (velocity, direction) across the mirror plane.
    #[must_use]
    pub fn reflect_vector(self, vector: &Vector3<f64>) -> Vector3<f64> {
        let mut out = *vector;
        out[self.component()] = -out[self.component()];
        out
    }

    /// Reflects a rotation across the mirror plane.
    #[must_use]
    pub fn reflect_rotation(self, rotation: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        let q = rotation.quaternion();
        let (w, x, y, z) = (q.w, q.i, q.j, q.k);
        let reflected = match self {
            Self::X => Quaternion::new(w, x, -y, -z),
            Self::Y => Quaternion::new(w, -x, y, -z),
            Self::Z => Quaternion::new(w, -x, -y, z),
        };
        UnitQuaternion::new_unchecked(reflected)
    }
}

/// Position and orientation of a joint or root in world space.
///
/// # Example
///
/// ```
/// use motion_types::Pose;
/// use nalgebra::{Point3, UnitQuaternion, Vector3};
///
/// let pose = Pose::from_position_rotation(
///     Point3::new(1.0, 0.0, 0.0),
///     UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f64::consts::FRAC_PI_2),
/// );
///
/// // Offset one unit along the local Z axis
/// let pivot = pose.translated_local(&Vector3::z());
/// assert!((pivot.position.x - 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position in world coordinates.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Identity pose (origin, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Pose from position only (identity rotation).
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Pose from position and rotation.
    #[must_use]
    pub const fn from_position_rotation(
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self { position, rotation }
    }

    /// Pose from an isometry.
    #[must_use]
    pub fn from_isometry(iso: Isometry3<f64>) -> Self {
        Self {
            position: Point3::from(iso.translation.vector),
            rotation: iso.rotation,
        }
    }

    /// Convert to an isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(self.position.coords.into(), self.rotation)
    }

    /// Transform a point from local to world coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Rotate a local vector into world coordinates.
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    /// Transform a world point into this pose's local frame.
    #[must_use]
    pub fn inverse_transform_point(&self, world: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.inverse() * (world - self.position))
    }

    /// Rotate a world vector into this pose's local frame.
    #[must_use]
    pub fn inverse_transform_vector(&self, world: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * world
    }

    /// Express another world pose relative to this one.
    #[must_use]
    pub fn relative(&self, other: &Self) -> Self {
        Self {
            position: self.inverse_transform_point(&other.position),
            rotation: self.rotation.inverse() * other.rotation,
        }
    }

    /// This pose moved by `offset` given in its own local frame.
    ///
    /// Rotation is unchanged.
    #[must_use]
    pub fn translated_local(&self, offset: &Vector3<f64>) -> Self {
        Self {
            position: self.transform_point(&Point3::from(*offset)),
            rotation: self.rotation,
        }
    }

    /// Local +Z axis in world coordinates.
    #[must_use]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }

    /// Local +Y axis in world coordinates.
    #[must_use]
    pub fn up(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }

    /// This pose reflected across the mirror plane.
    #[must_use]
    pub fn mirrored(&self, axis: MirrorAxis) -> Self {
        Self {
            position: axis.reflect_point(&self.position),
            rotation: axis.reflect_rotation(&self.rotation),
        }
    }

    /// Check that no component is `NaN` or infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }
}
