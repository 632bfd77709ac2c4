//! The frame-store seam between motion data and the samplers.

use std::ops::RangeInclusive;

use nalgebra::Vector3;

use crate::frame::{ClipId, Frame};
use crate::pose::{Mirror, Pose};
use crate::skeleton::JointId;

/// Slack allowed between a frame's timestamp and the one derived from its
/// index, in seconds.
const TIMESTAMP_TOLERANCE: f64 = 1e-9;

/// Read-only access to a time-ordered sequence of recorded poses.
///
/// Implementors must hold at least one frame and a positive framerate. Frame
/// `i` has timestamp `i / framerate`, so the last frame sits exactly at
/// [`total_time`](Self::total_time).
///
/// Pose lookups take a [`Frame`] produced by this store. Frames from another
/// store should be rejected with [`owns`](Self::owns) before use; stores
/// resolve them by index, clamped to the last frame.
///
/// The `Sync` bound lets samplers fan frames out across threads.
pub trait MotionSource: Sync {
    /// Identity of this store.
    fn clip_id(&self) -> ClipId;

    /// Number of frames (at least one).
    fn frame_count(&self) -> usize;

    /// Samples per second.
    fn framerate(&self) -> f64;

    /// Number of joints per frame.
    fn joint_count(&self) -> usize;

    /// World pose of the character root.
    fn root_pose(&self, frame: Frame, mirror: Mirror) -> Pose;

    /// World-space linear velocity of the character root.
    fn root_velocity(&self, frame: Frame, mirror: Mirror) -> Vector3<f64>;

    /// World pose of a joint, or `None` if the joint does not exist.
    fn joint_pose(&self, frame: Frame, joint: JointId, mirror: Mirror) -> Option<Pose>;

    /// World-space linear velocity of a joint, or `None` if the joint does
    /// not exist.
    fn joint_velocity(&self, frame: Frame, joint: JointId, mirror: Mirror)
    -> Option<Vector3<f64>>;

    /// Duration of the clip in seconds (timestamp of the last frame).
    #[allow(clippy::cast_precision_loss)]
    fn total_time(&self) -> f64 {
        self.frame_count().saturating_sub(1) as f64 / self.framerate()
    }

    /// Timestamp of the frame at `index`.
    #[allow(clippy::cast_precision_loss)]
    fn timestamp_of(&self, index: usize) -> f64 {
        index as f64 / self.framerate()
    }

    /// Frame at `index`, if in range.
    fn frame(&self, index: usize) -> Option<Frame> {
        (index < self.frame_count())
            .then(|| Frame::new(self.clip_id(), index, self.timestamp_of(index)))
    }

    /// Nearest frame to `time`, with `time` clamped to the clip.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn frame_at(&self, time: f64) -> Frame {
        let last = self.frame_count().saturating_sub(1);
        let time = time.max(0.0).min(self.total_time());
        let index = ((time * self.framerate()).round() as usize).min(last);
        Frame::new(self.clip_id(), index, self.timestamp_of(index))
    }

    /// The first frame.
    fn first_frame(&self) -> Frame {
        Frame::new(self.clip_id(), 0, 0.0)
    }

    /// The last frame.
    fn last_frame(&self) -> Frame {
        let last = self.frame_count().saturating_sub(1);
        Frame::new(self.clip_id(), last, self.timestamp_of(last))
    }

    /// Returns true if `frame` was produced by this store: same clip, index
    /// in range and a timestamp matching the index.
    fn owns(&self, frame: Frame) -> bool {
        frame.clip() == self.clip_id()
            && frame.index() < self.frame_count()
            && (frame.timestamp() - self.timestamp_of(frame.index())).abs() <= TIMESTAMP_TOLERANCE
    }

    /// Frame indices of a timeline window of `window` seconds centered on
    /// `center`.
    ///
    /// Near the clip edges the window slides inward so it keeps its length
    /// where the clip is long enough.
    fn frame_window(&self, center: Frame, window: f64) -> RangeInclusive<usize> {
        let total = self.total_time();
        let half = window.max(0.0) / 2.0;
        let mut start = center.timestamp() - half;
        let mut end = center.timestamp() + half;
        if start < 0.0 {
            end -= start;
            start = 0.0;
        }
        if end > total {
            start -= end - total;
            end = total;
        }
        let start = self.frame_at(start.max(0.0)).index();
        let end = self.frame_at(end.min(total)).index();
        start..=end
    }
}
