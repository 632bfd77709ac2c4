//! Cyclic phase arithmetic on `[0, 1)`.

/// Wrap `x` into `[0, 1)`.
///
/// ```
/// use motion_trajectory::phase;
///
/// assert!((phase::wrap(1.25) - 0.25).abs() < 1e-12);
/// assert!((phase::wrap(-0.25) - 0.75).abs() < 1e-12);
/// assert_eq!(phase::wrap(1.0), 0.0);
/// ```
#[must_use]
pub fn wrap(x: f64) -> f64 {
    let wrapped = x - x.floor();
    // x - floor(x) rounds up to 1.0 for tiny negative x.
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Signed shortest-path difference from `from` to `to`, in `[-0.5, 0.5)`.
///
/// ```
/// use motion_trajectory::phase;
///
/// assert!((phase::delta(0.9, 0.1) - 0.2).abs() < 1e-12);
/// assert!((phase::delta(0.1, 0.9) + 0.2).abs() < 1e-12);
/// ```
#[must_use]
pub fn delta(from: f64, to: f64) -> f64 {
    wrap(to - from + 0.5) - 0.5
}
