//! Trajectory windows.

use motion_types::Pose;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Number of points in a trajectory window.
pub const POINTS: usize = 12;

/// Index of the point at the reference frame.
pub const CURRENT: usize = 6;

/// One sample of a trajectory window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Root pose.
    pub pose: Pose,
    /// Root linear velocity (world space).
    pub velocity: Vector3<f64>,
    /// Style weights, one per style in catalog order. Empty without a style
    /// provider.
    pub styles: Vec<f64>,
    /// Locomotion phase in `[0, 1)`.
    pub phase: f64,
    /// Transition signal per style. Empty without a style provider.
    pub signals: Vec<f64>,
}

impl TrajectoryPoint {
    /// Root position.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        self.pose.position
    }

    /// Root rotation.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.pose.rotation
    }

    /// Facing direction (root +Z).
    #[must_use]
    pub fn forward(&self) -> Vector3<f64> {
        self.pose.forward()
    }
}

/// Twelve root samples around a reference frame.
///
/// Points `0..6` are past samples in ascending time, point [`CURRENT`] is the
/// reference frame and points `7..12` are future samples in ascending time.
/// A trajectory is built fresh by [`TrajectorySampler`](crate::TrajectorySampler)
/// for every query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    points: [TrajectoryPoint; POINTS],
    style_names: Vec<String>,
}

impl Trajectory {
    /// A window of default points for the given style catalog.
    #[must_use]
    pub fn new(style_names: Vec<String>) -> Self {
        Self {
            points: Default::default(),
            style_names,
        }
    }

    /// All points.
    #[must_use]
    pub const fn points(&self) -> &[TrajectoryPoint; POINTS] {
        &self.points
    }

    /// Mutable access to all points.
    pub fn points_mut(&mut self) -> &mut [TrajectoryPoint; POINTS] {
        &mut self.points
    }

    /// Point at `index`, if in range.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<&TrajectoryPoint> {
        self.points.get(index)
    }

    /// The point at the reference frame.
    #[must_use]
    pub const fn current(&self) -> &TrajectoryPoint {
        &self.points[CURRENT]
    }

    /// Past points, oldest first.
    #[must_use]
    pub fn past(&self) -> &[TrajectoryPoint] {
        &self.points[..CURRENT]
    }

    /// Future points, nearest first.
    #[must_use]
    pub fn future(&self) -> &[TrajectoryPoint] {
        &self.points[CURRENT + 1..]
    }

    /// Style catalog.
    #[must_use]
    pub fn style_names(&self) -> &[String] {
        &self.style_names
    }

    /// Number of points (always [`POINTS`]).
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn len(&self) -> usize {
        POINTS
    }

    /// Always false.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Weights of one style across the window, or `None` if the style is not
    /// in the catalog.
    #[must_use]
    pub fn style_of(&self, name: &str) -> Option<[f64; POINTS]> {
        let index = self.style_names.iter().position(|n| n == name)?;
        let mut weights = [0.0; POINTS];
        for (w, point) in weights.iter_mut().zip(&self.points) {
            *w = point.styles.get(index).copied().unwrap_or(0.0);
        }
        Some(weights)
    }

    /// The window expressed in the current point's root frame.
    ///
    /// Positions, rotations and velocities become relative to the current
    /// root pose, so the current point sits at the origin facing +Z. Styles,
    /// phases and signals are unchanged.
    #[must_use]
    pub fn to_local(&self) -> Self {
        let root = self.current().pose;
        let mut local = self.clone();
        for point in &mut local.points {
            point.pose = root.relative(&point.pose);
            point.velocity = root.inverse_transform_vector(&point.velocity);
        }
        local
    }
}
