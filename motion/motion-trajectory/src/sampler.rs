//! Fixed-window trajectory sampling.
//!
//! Past samples that would fall before the first frame, and future samples
//! past the last frame, are reflected back into the clip around that boundary
//! frame: the pose data comes from the mirrored time and the position is
//! extrapolated through the boundary.
//!
//! ```text
//!   past  (t + d < 0):  pivot = -(t + d)
//!                       pos   = first - ratio * (pos(pivot) - first)
//!   future (t + d > T): pivot = 2T - t - d
//!                       pos   = last  - ratio * (pos(pivot) - last)
//! ```
//!
//! `pivot` is clamped to `[0, T]`. When clamping changes it, `ratio` scales
//! the extrapolation by how far the unclamped pivot overshoots.

use motion_types::{Frame, Mirror, MotionSource};
use tracing::debug;

use crate::config::TrajectoryConfig;
use crate::error::{Result, TrajectoryError};
use crate::phase;
use crate::point::{CURRENT, POINTS, Trajectory, TrajectoryPoint};
use crate::provider::{PhaseProvider, StyleProvider};

const PAST: usize = CURRENT;
const FUTURE: usize = POINTS - CURRENT - 1;

/// Samples a 12-point root trajectory around a reference frame.
///
/// # Example
///
/// ```
/// use motion_trajectory::TrajectorySampler;
/// use motion_types::{FrameSample, Mirror, MotionClip, MotionSource, Pose, Skeleton};
/// use nalgebra::Point3;
///
/// // Root walks along +X at 1 m/s.
/// let samples = (0..90)
///     .map(|i| {
///         let root = Pose::from_position(Point3::new(f64::from(i) / 30.0, 0.0, 0.0));
///         FrameSample::new(root, vec![])
///     })
///     .collect();
/// let clip = MotionClip::new(Skeleton::new(Vec::<String>::new()), 30.0, samples).unwrap();
///
/// let sampler = TrajectorySampler::default();
/// let trajectory = sampler
///     .sample(&clip, clip.frame(45).unwrap(), Mirror::Regular, None, None)
///     .unwrap();
///
/// assert!((trajectory.current().position().x - 1.5).abs() < 1e-9);
/// assert!((trajectory.past()[0].position().x - 0.5).abs() < 1e-9);
/// assert!((trajectory.future()[4].position().x - 2.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrajectorySampler {
    config: TrajectoryConfig,
}

/// Clip boundary a sample is reflected around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    First,
    Last,
}

/// Where a window sample reads its data.
#[derive(Debug, Clone, Copy)]
enum Lookup {
    /// Inside the clip.
    Direct(Frame),
    /// Reflected around a boundary frame.
    Reflected {
        boundary: Boundary,
        reference: Frame,
        ratio: f64,
    },
}

impl TrajectorySampler {
    /// Create a sampler.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: TrajectoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The sampler's configuration.
    #[must_use]
    pub const fn config(&self) -> &TrajectoryConfig {
        &self.config
    }

    /// Sample the trajectory around `frame`.
    ///
    /// Without a style provider every point has empty styles and signals;
    /// without a phase provider every phase is 0.
    ///
    /// # Errors
    ///
    /// - [`TrajectoryError::ForeignFrame`] if `frame` does not belong to `clip`
    ///   (see [`MotionSource::owns`])
    /// - [`TrajectoryError::StyleDimension`] if the style provider returns a
    ///   vector whose length differs from its catalog
    /// - [`TrajectoryError::InvalidConfig`] if the configuration is invalid
    pub fn sample<C>(
        &self,
        clip: &C,
        frame: Frame,
        mirror: Mirror,
        style: Option<&dyn StyleProvider>,
        phase: Option<&dyn PhaseProvider>,
    ) -> Result<Trajectory>
    where
        C: MotionSource + ?Sized,
    {
        self.config.validate()?;
        if !clip.owns(frame) {
            return Err(TrajectoryError::ForeignFrame {
                frame_clip: frame.clip(),
                index: frame.index(),
                clip: clip.clip_id(),
            });
        }

        let window = Window {
            clip,
            mirror,
            style,
            phase,
            provider_window: self.config.provider_window,
        };
        let names = style.map(|s| s.names().to_vec()).unwrap_or_default();
        let mut trajectory = Trajectory::new(names);
        let points = trajectory.points_mut();

        points[CURRENT] = window.point(Lookup::Direct(frame))?;
        for (i, delta) in self.past_deltas().into_iter().enumerate() {
            points[i] = window.point(past_lookup(clip, frame, delta))?;
        }
        for (i, delta) in self.future_deltas().into_iter().enumerate() {
            points[CURRENT + 1 + i] = window.point(future_lookup(clip, frame, delta))?;
        }

        if let Some(style) = style {
            window.signals(points, style, frame, &self.past_deltas())?;
            finish(points);
        }
        Ok(trajectory)
    }

    /// Time offsets of the past points: `-H + i * H / 6`.
    #[allow(clippy::cast_precision_loss)]
    fn past_deltas(&self) -> [f64; PAST] {
        let h = self.config.past_horizon;
        std::array::from_fn(|i| -h + i as f64 * h / PAST as f64)
    }

    /// Time offsets of the future points: `i * H / 5` for `i` in `1..=5`.
    #[allow(clippy::cast_precision_loss)]
    fn future_deltas(&self) -> [f64; FUTURE] {
        let h = self.config.future_horizon;
        std::array::from_fn(|i| (i + 1) as f64 * h / FUTURE as f64)
    }
}

#[allow(clippy::float_cmp)]
fn past_lookup<C: MotionSource + ?Sized>(clip: &C, frame: Frame, delta: f64) -> Lookup {
    let total = clip.total_time();
    let t = frame.timestamp() + delta;
    if t >= 0.0 {
        return Lookup::Direct(clip.frame_at(t.min(total)));
    }
    let pivot = -t;
    let clamped = pivot.clamp(0.0, total);
    let ratio = if pivot == clamped || clamped == 0.0 {
        1.0
    } else {
        (pivot / clamped).abs()
    };
    debug!(
        delta,
        pivot,
        clamped,
        ratio,
        "reflecting past sample around first frame"
    );
    Lookup::Reflected {
        boundary: Boundary::First,
        reference: clip.frame_at(clamped),
        ratio,
    }
}

#[allow(clippy::float_cmp)]
fn future_lookup<C: MotionSource + ?Sized>(clip: &C, frame: Frame, delta: f64) -> Lookup {
    let total = clip.total_time();
    let t = frame.timestamp() + delta;
    if t <= total {
        return Lookup::Direct(clip.frame_at(t.max(0.0)));
    }
    let pivot = 2.0 * total - t;
    let clamped = pivot.clamp(0.0, total);
    let ratio = if pivot == clamped || clamped == total {
        1.0
    } else {
        ((total - pivot) / (total - clamped)).abs()
    };
    debug!(
        delta,
        pivot,
        clamped,
        ratio,
        "reflecting future sample around last frame"
    );
    Lookup::Reflected {
        boundary: Boundary::Last,
        reference: clip.frame_at(clamped),
        ratio,
    }
}

/// Everything a single query reads from.
struct Window<'a, C: ?Sized> {
    clip: &'a C,
    mirror: Mirror,
    style: Option<&'a dyn StyleProvider>,
    phase: Option<&'a dyn PhaseProvider>,
    provider_window: usize,
}

impl<C: MotionSource + ?Sized> Window<'_, C> {
    fn point(&self, lookup: Lookup) -> Result<TrajectoryPoint> {
        match lookup {
            Lookup::Direct(frame) => Ok(TrajectoryPoint {
                pose: self.clip.root_pose(frame, self.mirror),
                velocity: self.clip.root_velocity(frame, self.mirror),
                styles: self.styles(frame)?,
                phase: self.phase(frame),
                signals: Vec::new(),
            }),
            Lookup::Reflected {
                boundary,
                reference,
                ratio,
            } => {
                let boundary_frame = match boundary {
                    Boundary::First => self.clip.first_frame(),
                    Boundary::Last => self.clip.last_frame(),
                };
                let anchor = self.clip.root_pose(boundary_frame, self.mirror).position;
                let mut pose = self.clip.root_pose(reference, self.mirror);
                pose.position = anchor - ratio * (pose.position - anchor);

                let boundary_phase = self.phase(boundary_frame);
                let reference_phase = self.phase(reference);
                let phase = match boundary {
                    Boundary::First => phase::wrap(
                        boundary_phase - phase::delta(boundary_phase, reference_phase),
                    ),
                    Boundary::Last => phase::wrap(
                        boundary_phase + phase::delta(reference_phase, boundary_phase),
                    ),
                };

                Ok(TrajectoryPoint {
                    pose,
                    velocity: self.clip.root_velocity(reference, self.mirror),
                    styles: self.styles(reference)?,
                    phase,
                    signals: Vec::new(),
                })
            }
        }
    }

    fn styles(&self, frame: Frame) -> Result<Vec<f64>> {
        match self.style {
            Some(style) => checked(style, style.style(frame, self.provider_window)),
            None => Ok(Vec::new()),
        }
    }

    fn phase(&self, frame: Frame) -> f64 {
        self.phase.map_or(0.0, |p| {
            phase::wrap(p.phase(frame, self.mirror, self.provider_window))
        })
    }

    /// Signals of points `0..=6`; future points copy the current signal.
    fn signals(
        &self,
        points: &mut [TrajectoryPoint; POINTS],
        style: &dyn StyleProvider,
        frame: Frame,
        past_deltas: &[f64; PAST],
    ) -> Result<()> {
        let total = self.clip.total_time();
        let w = self.provider_window;
        let deltas = past_deltas.iter().copied().chain(std::iter::once(0.0));
        for (point, delta) in points.iter_mut().zip(deltas) {
            let t = frame.timestamp() + delta;
            let (target, at) = if t < 0.0 {
                let at = self.clip.frame_at((-t).clamp(0.0, total));
                (style.inverse_signal(at, w), at)
            } else {
                let at = self.clip.frame_at(t.clamp(0.0, total));
                (style.signal(at, w), at)
            };
            let target = checked(style, target)?;
            let current = checked(style, style.style(at, w))?;
            point.signals = target.iter().zip(&current).map(|(s, c)| s - c).collect();
        }
        let current = points[CURRENT].signals.clone();
        for point in &mut points[CURRENT + 1..] {
            point.signals.clone_from(&current);
        }
        Ok(())
    }
}

fn checked(style: &dyn StyleProvider, values: Vec<f64>) -> Result<Vec<f64>> {
    let expected = style.names().len();
    if values.len() == expected {
        Ok(values)
    } else {
        Err(TrajectoryError::style_dimension(expected, values.len()))
    }
}

/// Gate future style weights by the current transition signal.
///
/// Per style: a positive partial signal makes the weights non-decreasing into
/// the future, a negative partial signal non-increasing, and a zero or full
/// signal holds the current weight. A signal of exactly zero in every style
/// holds all current weights.
#[allow(clippy::float_cmp)]
fn finish(points: &mut [TrajectoryPoint; POINTS]) {
    let signals = points[CURRENT].signals.clone();
    for (i, &s) in signals.iter().enumerate() {
        let held = points[CURRENT].styles[i];
        for j in CURRENT + 1..POINTS {
            let previous = points[j - 1].styles[i];
            let value = &mut points[j].styles[i];
            if s > 0.0 && s < 1.0 {
                *value = previous.max(*value);
            } else if s < 0.0 && s > -1.0 {
                *value = previous.min(*value);
            } else if s == 0.0 || s.abs() == 1.0 {
                *value = held;
            }
        }
    }
    if signals.iter().map(|s| s.abs()).sum::<f64>() == 0.0 {
        let current = points[CURRENT].styles.clone();
        for point in &mut points[CURRENT + 1..] {
            point.styles.clone_from(&current);
        }
    }
}
