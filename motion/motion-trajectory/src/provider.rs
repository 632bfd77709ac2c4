//! Optional per-frame style and phase annotations.
//!
//! Both providers are looked up by [`Frame`]. The `window` argument is a
//! smoothing half-width in frames (see [`TrajectoryConfig::provider_window`]);
//! `0` means the raw value at the frame.
//!
//! [`TrajectoryConfig::provider_window`]: crate::TrajectoryConfig::provider_window

use motion_types::{Frame, Mirror};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrajectoryError};
use crate::phase;

/// Style weights and transition signals of a clip.
///
/// All vectors have one entry per style, in the order of [`names`](Self::names).
pub trait StyleProvider {
    /// Style catalog.
    fn names(&self) -> &[String];

    /// Style weights at `frame`.
    fn style(&self, frame: Frame, window: usize) -> Vec<f64>;

    /// Style the character is transitioning towards at `frame`.
    fn signal(&self, frame: Frame, window: usize) -> Vec<f64>;

    /// Transition target when the clip is played backwards through `frame`.
    fn inverse_signal(&self, frame: Frame, window: usize) -> Vec<f64>;
}

/// Locomotion phase of a clip.
pub trait PhaseProvider {
    /// Phase in `[0, 1)` at `frame`.
    fn phase(&self, frame: Frame, mirror: Mirror, window: usize) -> f64;
}

impl<F> PhaseProvider for F
where
    F: Fn(Frame, Mirror, usize) -> f64,
{
    fn phase(&self, frame: Frame, mirror: Mirror, window: usize) -> f64 {
        self(frame, mirror, window)
    }
}

/// In-memory [`StyleProvider`] with one row of weights per frame.
///
/// Signals default to the style rows themselves (no transition anywhere).
/// Frame indices beyond the last row read the last row.
///
/// # Example
///
/// ```
/// use motion_trajectory::{StyleProvider, StyleTrack};
/// use motion_types::{ClipId, Frame};
///
/// let track = StyleTrack::new(["Idle", "Walk"], vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
/// let frame = Frame::new(ClipId::next(), 1, 1.0 / 30.0);
///
/// assert_eq!(track.style(frame, 0), vec![0.0, 1.0]);
/// assert_eq!(track.style(frame, 1), vec![0.5, 0.5]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTrack {
    names: Vec<String>,
    styles: Vec<Vec<f64>>,
    signals: Vec<Vec<f64>>,
    inverse_signals: Vec<Vec<f64>>,
}

impl StyleTrack {
    /// Build a track from per-frame style weights.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no rows or a row's length differs from
    /// the number of names.
    pub fn new<I, S>(names: I, styles: Vec<Vec<f64>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if styles.is_empty() {
            return Err(TrajectoryError::invalid_config("style track has no frames"));
        }
        check_rows(names.len(), &styles)?;
        Ok(Self {
            names,
            signals: styles.clone(),
            inverse_signals: styles.clone(),
            styles,
        })
    }

    /// Set per-frame transition signals.
    ///
    /// # Errors
    ///
    /// Returns an error if the row count or a row length does not match.
    pub fn with_signals(mut self, signals: Vec<Vec<f64>>) -> Result<Self> {
        self.check_table(&signals)?;
        self.signals = signals;
        Ok(self)
    }

    /// Set per-frame transition signals for backward playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the row count or a row length does not match.
    pub fn with_inverse_signals(mut self, signals: Vec<Vec<f64>>) -> Result<Self> {
        self.check_table(&signals)?;
        self.inverse_signals = signals;
        Ok(self)
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns true if the track has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    fn check_table(&self, rows: &[Vec<f64>]) -> Result<()> {
        if rows.len() != self.styles.len() {
            return Err(TrajectoryError::invalid_config(format!(
                "expected {} signal rows, got {}",
                self.styles.len(),
                rows.len()
            )));
        }
        check_rows(self.names.len(), rows)
    }
}

fn check_rows(expected: usize, rows: &[Vec<f64>]) -> Result<()> {
    match rows.iter().find(|row| row.len() != expected) {
        Some(row) => Err(TrajectoryError::style_dimension(expected, row.len())),
        None => Ok(()),
    }
}

/// Mean of `rows` over `[index - window, index + window]`, clamped to the
/// table.
#[allow(clippy::cast_precision_loss)]
fn smoothed(rows: &[Vec<f64>], index: usize, window: usize) -> Vec<f64> {
    let Some(last) = rows.len().checked_sub(1) else {
        return Vec::new();
    };
    let index = index.min(last);
    let span = &rows[index.saturating_sub(window)..=index.saturating_add(window).min(last)];
    let mut mean = vec![0.0; rows.first().map_or(0, Vec::len)];
    for row in span {
        for (m, v) in mean.iter_mut().zip(row) {
            *m += v;
        }
    }
    let n = span.len() as f64;
    for m in &mut mean {
        *m /= n;
    }
    mean
}

impl StyleProvider for StyleTrack {
    fn names(&self) -> &[String] {
        &self.names
    }

    fn style(&self, frame: Frame, window: usize) -> Vec<f64> {
        smoothed(&self.styles, frame.index(), window)
    }

    fn signal(&self, frame: Frame, window: usize) -> Vec<f64> {
        smoothed(&self.signals, frame.index(), window)
    }

    fn inverse_signal(&self, frame: Frame, window: usize) -> Vec<f64> {
        smoothed(&self.inverse_signals, frame.index(), window)
    }
}

/// In-memory [`PhaseProvider`] with one phase per frame.
///
/// Smoothing averages the shortest-path phase differences around the frame,
/// so it behaves across the wrap from 1 back to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTrack {
    phases: [Vec<f64>; 2],
}

impl PhaseTrack {
    /// Build a track; the mirrored clip shares the same phases.
    ///
    /// Values are wrapped into `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `phases` is empty.
    pub fn new(phases: Vec<f64>) -> Result<Self> {
        if phases.is_empty() {
            return Err(TrajectoryError::invalid_config("phase track has no frames"));
        }
        let phases: Vec<f64> = phases.into_iter().map(phase::wrap).collect();
        Ok(Self {
            phases: [phases.clone(), phases],
        })
    }

    /// Use separate phases for the mirrored clip.
    ///
    /// # Errors
    ///
    /// Returns an error if the length differs from the regular phases.
    pub fn with_mirrored(mut self, phases: Vec<f64>) -> Result<Self> {
        let expected = self.phases[0].len();
        if phases.len() != expected {
            return Err(TrajectoryError::invalid_config(format!(
                "expected {expected} mirrored phases, got {}",
                phases.len()
            )));
        }
        self.phases[Mirror::Mirrored.index()] = phases.into_iter().map(phase::wrap).collect();
        Ok(self)
    }
}

impl PhaseProvider for PhaseTrack {
    #[allow(clippy::cast_precision_loss)]
    fn phase(&self, frame: Frame, mirror: Mirror, window: usize) -> f64 {
        let phases = &self.phases[mirror.index()];
        let Some(last) = phases.len().checked_sub(1) else {
            return 0.0;
        };
        let index = frame.index().min(last);
        let center = phases[index];
        let span = &phases[index.saturating_sub(window)..=index.saturating_add(window).min(last)];
        let offset = span.iter().map(|&p| phase::delta(center, p)).sum::<f64>() / span.len() as f64;
        phase::wrap(center + offset)
    }
}
