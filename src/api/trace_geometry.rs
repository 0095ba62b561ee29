use serde::{Deserialize, Serialize};

use crate::core::{
    AffineTransform, AxisSide, BarGeometry, BarLayout, BarOrientation, MarkerShape, Point,
    StackBaselines, TraceStyle, build_bars, segment,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerGeometry {
    pub center: Point,
    pub shape: MarkerShape,
    pub size: f64,
}

/// Screen geometry of one trace, by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceGeometry {
    Scatter {
        /// Polyline runs split at gaps in the data.
        runs: Vec<Vec<Point>>,
        markers: Vec<MarkerGeometry>,
        style: TraceStyle,
    },
    Bar {
        rects: Vec<BarGeometry>,
        style: TraceStyle,
    },
}

impl TraceGeometry {
    #[must_use]
    pub fn style(&self) -> &TraceStyle {
        match self {
            Self::Scatter { style, .. } | Self::Bar { style, .. } => style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceLayout {
    pub id: String,
    pub index: usize,
    pub x_axis: AxisSide,
    pub y_axis: AxisSide,
    pub transform: AffineTransform,
    pub geometry: TraceGeometry,
}

/// Runs plus one marker per plotted point when the trace has markers.
#[must_use]
pub fn scatter_geometry(
    xs: &[Option<f64>],
    ys: &[Option<f64>],
    transform: AffineTransform,
    style: TraceStyle,
    marker: Option<(MarkerShape, f64)>,
) -> TraceGeometry {
    let runs = segment(xs, ys, transform);
    let markers = match marker {
        Some((shape, size)) if style.fill.is_some() => runs
            .iter()
            .flatten()
            .map(|center| MarkerGeometry {
                center: *center,
                shape,
                size,
            })
            .collect(),
        _ => Vec::new(),
    };
    TraceGeometry::Scatter {
        runs,
        markers,
        style,
    }
}

/// Bars along whichever axis carries the categories.
#[must_use]
pub fn bar_geometry(
    layout: BarLayout,
    xs: &[Option<f64>],
    ys: &[Option<f64>],
    transform: AffineTransform,
    style: TraceStyle,
    baselines: &mut StackBaselines,
) -> TraceGeometry {
    let (categories, values) = match layout.orientation {
        BarOrientation::Vertical => (xs, ys),
        BarOrientation::Horizontal => (ys, xs),
    };
    TraceGeometry::Bar {
        rects: build_bars(layout, categories, values, transform, baselines),
        style,
    }
}
