//! Collision layer masks.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Bit set of collision layers (32 layers).
///
/// # Example
///
/// ```
/// use motion_contact::LayerMask;
///
/// let ground = LayerMask::layer(8);
/// let mask = ground | LayerMask::layer(9);
///
/// assert!(mask.contains_layer(8));
/// assert!(!mask.contains_layer(0));
/// assert!(LayerMask::ALL.contains_layer(31));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// No layer.
    pub const NONE: Self = Self(0);

    /// Mask with a single layer set. Layers outside `0..32` give an empty mask.
    #[must_use]
    pub const fn layer(layer: u8) -> Self {
        match 1u32.checked_shl(layer as u32) {
            Some(bits) => Self(bits),
            None => Self::NONE,
        }
    }

    /// Returns true if `layer` is in the mask.
    #[must_use]
    pub const fn contains_layer(self, layer: u8) -> bool {
        self.intersects(Self::layer(layer))
    }

    /// Returns true if the masks share a layer.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if no layer is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
