//! Per-sensor contact configuration.

use motion_types::JointId;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{ContactError, Result};
use crate::layer::LayerMask;

/// How one sensor joint probes for contact.
///
/// A ray of length `2 * threshold` is cast along `normal` (rotated into the
/// joint's frame), centered on the joint position shifted by `offset`.
///
/// # Example
///
/// ```
/// use motion_contact::{ContactConfig, LayerMask};
/// use motion_types::JointId;
/// use nalgebra::Vector3;
///
/// let config = ContactConfig::for_sensor(JointId::new(4))
///     .threshold(0.05)
///     .offset(Vector3::new(0.0, 0.0, 0.08))
///     .mask(LayerMask::layer(8));
///
/// assert!(config.validate(24).is_ok());
/// assert!(config.validate(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Joint the ray is attached to.
    pub sensor: JointId,
    /// Half the ray length (meters).
    pub threshold: f64,
    /// Pivot offset in the joint's local frame.
    pub offset: Vector3<f64>,
    /// Ray direction in the joint's local frame.
    pub normal: Vector3<f64>,
    /// Layers that count as contact.
    pub mask: LayerMask,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            sensor: JointId::new(0),
            threshold: 0.1,
            offset: Vector3::zeros(),
            normal: -Vector3::y(),
            mask: LayerMask::ALL,
        }
    }
}

impl ContactConfig {
    /// Default configuration for a sensor joint.
    #[must_use]
    pub fn for_sensor(sensor: JointId) -> Self {
        Self {
            sensor,
            ..Default::default()
        }
    }

    /// Set the sensor joint.
    #[must_use]
    pub const fn sensor(mut self, sensor: JointId) -> Self {
        self.sensor = sensor;
        self
    }

    /// Set the threshold.
    #[must_use]
    pub const fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the pivot offset.
    #[must_use]
    pub fn offset(mut self, offset: Vector3<f64>) -> Self {
        self.offset = offset;
        self
    }

    /// Set the ray normal.
    #[must_use]
    pub fn normal(mut self, normal: Vector3<f64>) -> Self {
        self.normal = normal;
        self
    }

    /// Set the layer mask.
    #[must_use]
    pub const fn mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    /// Validate against a clip with `joint_count` joints.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor is out of range, the threshold is not
    /// positive and finite, the normal is zero or not finite, or the offset is
    /// not finite.
    pub fn validate(&self, joint_count: usize) -> Result<()> {
        if self.sensor.index() >= joint_count {
            return Err(ContactError::invalid_sensor(self.sensor, joint_count));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ContactError::InvalidThreshold(self.threshold));
        }
        let norm = self.normal.norm();
        if !norm.is_finite() || norm < f64::EPSILON {
            return Err(ContactError::InvalidNormal(self.normal.into()));
        }
        if !self.offset.iter().all(|x| x.is_finite()) {
            return Err(ContactError::InvalidOffset(self.offset.into()));
        }
        Ok(())
    }

    /// Length of the probe ray.
    #[must_use]
    pub fn ray_length(&self) -> f64 {
        2.0 * self.threshold
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_probes_downward() {
        let config = ContactConfig::default();
        assert_eq!(config.sensor, JointId::new(0));
        assert_eq!(config.threshold, 0.1);
        assert_eq!(config.normal, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(config.mask, LayerMask::ALL);
        assert_eq!(config.ray_length(), 0.2);
    }

    #[test]
    fn validate_rejects_bad_sensor() {
        let config = ContactConfig::for_sensor(JointId::new(3));
        assert_eq!(
            config.validate(3).unwrap_err(),
            ContactError::invalid_sensor(JointId::new(3), 3)
        );
        assert!(config.validate(4).is_ok());
    }

    #[test]
    fn validate_rejects_bad_threshold() {
        for threshold in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let config = ContactConfig::default().threshold(threshold);
            assert!(matches!(
                config.validate(1).unwrap_err(),
                ContactError::InvalidThreshold(_)
            ));
        }
    }

    #[test]
    fn validate_rejects_degenerate_normal() {
        let config = ContactConfig::default().normal(Vector3::zeros());
        assert!(matches!(
            config.validate(1).unwrap_err(),
            ContactError::InvalidNormal(_)
        ));
        let config = ContactConfig::default().normal(Vector3::new(f64::NAN, 0.0, 0.0));
        assert!(config.validate(1).is_err());
    }

    #[test]
    fn validate_rejects_non_finite_offset() {
        let config = ContactConfig::default().offset(Vector3::new(0.0, f64::INFINITY, 0.0));
        assert!(matches!(
            config.validate(1).unwrap_err(),
            ContactError::InvalidOffset(_)
        ));
    }
}
