use serde::{Deserialize, Serialize};

use super::types::{AxisRange, Point, Rect, Viewport};
use crate::error::{ChartError, ChartResult};

/// Axis-aligned affine map `p' = (sx·x + tx, sy·y + ty)`; no rotation or shear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            sx: 1.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Fits the `from` box onto the `to` box, one scale and offset per axis.
    ///
    /// A zero-extent (or non-finite) dimension of `from` keeps unit scale,
    /// signed like the box extent, and maps its origin to the centre of `to`.
    #[must_use]
    pub fn from_boxes(from: Rect, to: Rect) -> Self {
        let (sx, tx) = fit_axis(from.x, from.width, to.x, to.width);
        let (sy, ty) = fit_axis(from.y, from.height, to.y, to.height);
        Self { sx, sy, tx, ty }
    }

    #[must_use]
    pub fn apply(self, x: f64, y: f64) -> Point {
        Point::new(self.sx * x + self.tx, self.sy * y + self.ty)
    }

    #[must_use]
    pub fn apply_point(self, point: Point) -> Point {
        self.apply(point.x, point.y)
    }

    /// Maps a box; the result may carry negative extents.
    #[must_use]
    pub fn apply_rect(self, rect: Rect) -> Rect {
        let origin = self.apply(rect.x, rect.y);
        Rect::new(
            origin.x,
            origin.y,
            rect.width * self.sx,
            rect.height * self.sy,
        )
    }

    /// Maps a screen point back to data space.
    pub fn invert_point(self, point: Point) -> ChartResult<Point> {
        if self.sx == 0.0 || self.sy == 0.0 || !self.sx.is_finite() || !self.sy.is_finite() {
            return Err(ChartError::InvalidData(
                "transform is not invertible".to_owned(),
            ));
        }
        Ok(Point::new(
            (point.x - self.tx) / self.sx,
            (point.y - self.ty) / self.sy,
        ))
    }
}

fn fit_axis(from_origin: f64, from_extent: f64, to_origin: f64, to_extent: f64) -> (f64, f64) {
    if !from_extent.is_finite() || from_extent == 0.0 || !from_origin.is_finite() {
        let scale = if from_extent.is_sign_negative() { -1.0 } else { 1.0 };
        let centre = to_origin + to_extent / 2.0;
        let origin = if from_origin.is_finite() { from_origin } else { 0.0 };
        return (scale, centre - scale * origin);
    }
    let scale = to_extent / from_extent;
    (scale, to_origin - from_origin * scale)
}

/// Data-space box for two axis ranges, with y flipped so larger values land
/// higher on screen: origin `(x.min, y.max)`, height `y.min - y.max`.
#[must_use]
pub fn data_box(x_range: AxisRange, y_range: AxisRange) -> Rect {
    Rect::new(
        x_range.min,
        y_range.max,
        x_range.max - x_range.min,
        // Negated so a zero-height box is -0.0 and still fits with scale -1.
        -(y_range.max - y_range.min),
    )
}

/// Affine map from the data rectangle of two axes onto the viewport.
#[must_use]
pub fn build_transform(
    x_range: AxisRange,
    y_range: AxisRange,
    viewport: Viewport,
) -> AffineTransform {
    AffineTransform::from_boxes(data_box(x_range, y_range), viewport.as_rect())
}
