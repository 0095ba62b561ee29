use serde::{Deserialize, Serialize};

use super::axis::AxisSide;
use super::data::Row;
use super::style::TraceStyle;
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_MARKER_SIZE: f64 = 6.0;

/// Geometry family of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Scatter,
    Bar,
}

impl TraceKind {
    /// Parses a configured kind name; unknown names are reported per trace.
    pub fn parse(trace: &str, kind: &str) -> ChartResult<Self> {
        match kind.trim() {
            "" | "scatter" => Ok(Self::Scatter),
            "bar" => Ok(Self::Bar),
            other => Err(ChartError::UnsupportedTraceKind {
                trace: trace.to_owned(),
                kind: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    Circle,
    Square,
    Diamond,
    Triangle,
}

impl MarkerShape {
    pub fn parse(trace: &str, shape: &str) -> ChartResult<Self> {
        match shape.trim() {
            "circle" => Ok(Self::Circle),
            "square" => Ok(Self::Square),
            "diamond" => Ok(Self::Diamond),
            "triangle" => Ok(Self::Triangle),
            other => Err(ChartError::UnsupportedMarkerShape {
                trace: trace.to_owned(),
                shape: other.to_owned(),
            }),
        }
    }
}

/// Marker request as configured; the shape is resolved during layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSpec {
    pub shape: String,
    pub size: f64,
}

impl Default for MarkerSpec {
    fn default() -> Self {
        Self {
            shape: "circle".to_owned(),
            size: DEFAULT_MARKER_SIZE,
        }
    }
}

impl MarkerSpec {
    #[must_use]
    pub fn new(shape: impl Into<String>, size: f64) -> Self {
        Self {
            shape: shape.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum XAxisSide {
    Top,
    #[default]
    Bottom,
}

impl From<XAxisSide> for AxisSide {
    fn from(side: XAxisSide) -> Self {
        match side {
            XAxisSide::Top => Self::Top,
            XAxisSide::Bottom => Self::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum YAxisSide {
    #[default]
    Left,
    Right,
}

impl From<YAxisSide> for AxisSide {
    fn from(side: YAxisSide) -> Self {
        match side {
            YAxisSide::Left => Self::Left,
            YAxisSide::Right => Self::Right,
        }
    }
}

/// One series of rows bound to an x and a y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceSpec {
    pub id: Option<String>,
    pub x: String,
    pub y: String,
    pub kind: String,
    pub marker: Option<MarkerSpec>,
    pub style: TraceStyle,
    pub x_axis: XAxisSide,
    pub y_axis: YAxisSide,
    pub rows: Vec<Row>,
}

impl Default for TraceSpec {
    fn default() -> Self {
        Self {
            id: None,
            x: "x".to_owned(),
            y: "y".to_owned(),
            kind: "scatter".to_owned(),
            marker: None,
            style: TraceStyle::default(),
            x_axis: XAxisSide::default(),
            y_axis: YAxisSide::default(),
            rows: Vec::new(),
        }
    }
}

impl TraceSpec {
    #[must_use]
    pub fn scatter(x: impl Into<String>, y: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            rows,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bar(x: impl Into<String>, y: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            kind: "bar".to_owned(),
            ..Self::scatter(x, y, rows)
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: MarkerSpec) -> Self {
        self.marker = Some(marker);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: TraceStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_axes(mut self, x_axis: XAxisSide, y_axis: YAxisSide) -> Self {
        self.x_axis = x_axis;
        self.y_axis = y_axis;
        self
    }

    #[must_use]
    pub fn x_side(&self) -> AxisSide {
        self.x_axis.into()
    }

    #[must_use]
    pub fn y_side(&self) -> AxisSide {
        self.y_axis.into()
    }

    /// Id used in diagnostics before one has been assigned.
    #[must_use]
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.y)
    }

    pub fn resolve_kind(&self) -> ChartResult<TraceKind> {
        TraceKind::parse(self.display_id(), &self.kind)
    }

    /// Resolved marker shape, `Ok(None)` when the trace has no markers.
    pub fn resolve_marker(&self) -> ChartResult<Option<(MarkerShape, f64)>> {
        let Some(marker) = &self.marker else {
            return Ok(None);
        };
        let shape = MarkerShape::parse(self.display_id(), &marker.shape)?;
        if !marker.size.is_finite() || marker.size < 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "marker size of trace `{}` must be finite and >= 0",
                self.display_id()
            )));
        }
        Ok(Some((shape, marker.size)))
    }
}
