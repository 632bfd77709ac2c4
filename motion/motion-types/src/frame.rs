//! Frame handles.

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static NEXT_CLIP_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a frame store.
///
/// Frames carry the id of the store that produced them so a store can reject
/// frames that belong to another clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClipId(u64);

impl ClipId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_CLIP_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Clip({})", self.0)
    }
}

/// A recorded frame of a clip.
///
/// Frames are lightweight handles; pose data is looked up through the
/// [`MotionSource`](crate::MotionSource) that produced them. Indices are
/// 0-based.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    clip: ClipId,
    index: usize,
    timestamp: f64,
}

impl Frame {
    /// Create a frame handle.
    ///
    /// Intended for [`MotionSource`](crate::MotionSource) implementations.
    #[must_use]
    pub const fn new(clip: ClipId, index: usize, timestamp: f64) -> Self {
        Self {
            clip,
            index,
            timestamp,
        }
    }

    /// Id of the clip this frame belongs to.
    #[must_use]
    pub const fn clip(&self) -> ClipId {
        self.clip
    }

    /// 0-based frame index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Time of the frame in seconds since clip start.
    #[must_use]
    pub const fn timestamp(&self) -> f64 {
        self.timestamp
    }
}
