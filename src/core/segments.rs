use super::transform::AffineTransform;
use super::types::Point;

/// Splits paired `(x, y)` values into screen-space runs at every gap.
///
/// A missing value on either side closes the current run (empty runs are never
/// closed, so consecutive gaps collapse). The last run is always emitted, even
/// when empty after a trailing gap; empty input therefore yields one empty run.
/// Pairs are walked up to the shorter of the two sequences.
#[must_use]
pub fn segment(xs: &[Option<f64>], ys: &[Option<f64>], transform: AffineTransform) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for (x, y) in xs.iter().zip(ys) {
        match (x, y) {
            (Some(x), Some(y)) => current.push(transform.apply(*x, *y)),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }

    runs.push(current);
    runs
}

/// Total number of points across all runs.
#[must_use]
pub fn point_count(runs: &[Vec<Point>]) -> usize {
    runs.iter().map(Vec::len).sum()
}
