//! Screen geometry of axes and the plot padding they reserve.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{
    AxisOrientation, AxisRange, AxisSide, AxisSpec, AxisType, LabelStyle, LineStyle, Point,
    ResolvedAxis, Size, Viewport,
};
use crate::error::ChartResult;

use super::PlotConfig;

/// Snaps a coordinate to the centre of its pixel so 1px lines stay crisp.
#[must_use]
pub fn round_pixel(p: f64) -> f64 {
    p.floor() + 0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    #[must_use]
    pub fn get(self, side: AxisSide) -> f64 {
        match side {
            AxisSide::Top => self.top,
            AxisSide::Right => self.right,
            AxisSide::Bottom => self.bottom,
            AxisSide::Left => self.left,
        }
    }

    fn set(&mut self, side: AxisSide, value: f64) {
        match side {
            AxisSide::Top => self.top = value,
            AxisSide::Right => self.right = value,
            AxisSide::Bottom => self.bottom = value,
            AxisSide::Left => self.left = value,
        }
    }
}

/// Space reserved on one side: the axis line, ticks, labels and title each
/// add their size plus one pad. Sides without an axis get a double pad.
#[must_use]
pub fn side_padding(config: &PlotConfig, spec: Option<&AxisSpec>) -> f64 {
    let pad = config.pad;
    let Some(spec) = spec else {
        return pad * 2.0;
    };

    let mut padding = pad;
    if let Some(stroke_width) = config.axis_style_for(spec).stroke_width {
        if stroke_width > 0.0 {
            padding += stroke_width;
        }
    }
    if spec.tick_length > 0.0 {
        padding += spec.tick_length + pad;
    }
    if let Some(font_size) = positive_font_size(config.label_style_for(spec)) {
        padding += font_size + pad;
    }
    if has_title(spec) {
        if let Some(font_size) = positive_font_size(config.title_style_for(spec)) {
            padding += font_size + pad;
        }
    }
    padding
}

#[must_use]
pub fn compute_padding(config: &PlotConfig, specs: &IndexMap<AxisSide, AxisSpec>) -> Padding {
    let mut padding = Padding::default();
    for side in AxisSide::ALL {
        padding.set(side, side_padding(config, specs.get(&side)));
    }
    padding
}

/// Plot area left after padding; fails when nothing remains.
pub fn plot_viewport(size: Size, padding: Padding) -> ChartResult<Viewport> {
    Viewport::new(
        padding.left,
        padding.top,
        size.width - padding.left - padding.right,
        size.height - padding.top - padding.bottom,
    )
    .validate()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineSegment {
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[must_use]
    pub fn start(self) -> Point {
        Point::new(self.x1, self.y1)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextBaseline {
    Middle,
    Alphabetic,
    Hanging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLabel {
    pub text: String,
    pub position: Point,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickGeometry {
    pub value: f64,
    /// Runs outward from the axis line; zero length when the axis has no
    /// tick length.
    pub line: LineSegment,
    pub label: Option<TickLabel>,
    pub grid: Option<LineSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTitle {
    pub text: String,
    pub position: Point,
    /// Vertical titles are drawn rotated about `position`.
    pub orientation: AxisOrientation,
}

/// Everything a renderer needs to paint one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisGeometry {
    pub side: AxisSide,
    pub axis_type: AxisType,
    pub range: Option<AxisRange>,
    pub line: LineSegment,
    pub ticks: Vec<TickGeometry>,
    pub title: Option<AxisTitle>,
    pub style: LineStyle,
    pub label_style: LabelStyle,
    pub title_style: LabelStyle,
    pub grid_style: Option<LineStyle>,
}

/// Lays out one resolved axis along its side of the viewport.
#[must_use]
pub fn build_axis_geometry(
    axis: &ResolvedAxis,
    side: AxisSide,
    viewport: Viewport,
    config: &PlotConfig,
) -> AxisGeometry {
    let spec = axis.spec();
    let pad = config.pad;
    let line = axis_line(side, viewport);
    let orientation = side.orientation();
    let label_style = config.label_style_for(spec).clone();
    let title_style = config.title_style_for(spec).clone();

    let ticks = match axis.computed_range() {
        Some(range) if !range.is_degenerate() && !range.is_inverted() => axis
            .ticks()
            .iter()
            .copied()
            .filter(|tick| tick.is_finite())
            .map(|tick| tick_geometry(axis, side, line, viewport, range, tick, pad))
            .collect(),
        _ => Vec::new(),
    };

    let title = spec
        .title
        .as_deref()
        .filter(|title| !title.is_empty())
        .map(|text| {
            let offset = pad * 2.0
                + spec.tick_length
                + title_style.font_size.unwrap_or(0.0) / 2.0
                + label_style.font_size.unwrap_or(0.0);
            let centre = Point::new(
                viewport.x + viewport.width / 2.0,
                viewport.y + viewport.height / 2.0,
            );
            let position = match side {
                AxisSide::Left => Point::new(line.x1 - offset, centre.y),
                AxisSide::Right => Point::new(line.x1 + offset, centre.y),
                AxisSide::Top => Point::new(centre.x, line.y1 - offset),
                AxisSide::Bottom => Point::new(centre.x, line.y1 + offset),
            };
            AxisTitle {
                text: text.to_owned(),
                position,
                orientation,
            }
        });

    AxisGeometry {
        side,
        axis_type: axis.axis_type(),
        range: axis.computed_range(),
        line,
        ticks,
        title,
        style: config.axis_style_for(spec).clone(),
        label_style,
        title_style,
        grid_style: spec.grid_style.clone(),
    }
}

fn axis_line(side: AxisSide, viewport: Viewport) -> LineSegment {
    let left = round_pixel(viewport.x);
    let right = round_pixel(viewport.right());
    let top = round_pixel(viewport.y);
    let bottom = round_pixel(viewport.bottom());
    match side {
        AxisSide::Left => LineSegment::new(left, top, left, bottom),
        AxisSide::Right => LineSegment::new(right, top, right, bottom),
        AxisSide::Top => LineSegment::new(left, top, right, top),
        AxisSide::Bottom => LineSegment::new(left, bottom, right, bottom),
    }
}

fn tick_geometry(
    axis: &ResolvedAxis,
    side: AxisSide,
    line: LineSegment,
    viewport: Viewport,
    range: AxisRange,
    tick: f64,
    pad: f64,
) -> TickGeometry {
    let tick_length = axis.spec().tick_length;
    let (span, origin) = match side.orientation() {
        AxisOrientation::Horizontal => (line.x2 - line.x1, line.x1),
        AxisOrientation::Vertical => (line.y2 - line.y1, line.y1),
    };
    let mut offset = (tick - range.min) / range.span() * span;
    if side.orientation() == AxisOrientation::Vertical {
        offset = span - offset;
    }
    let at = round_pixel(origin + offset);

    let (tick_line, grid) = match side {
        AxisSide::Left => (
            LineSegment::new(line.x1 - tick_length, at, line.x1, at),
            LineSegment::new(line.x1, at, line.x1 + viewport.width, at),
        ),
        AxisSide::Right => (
            LineSegment::new(line.x1 + tick_length, at, line.x1, at),
            LineSegment::new(line.x1, at, line.x1 - viewport.width, at),
        ),
        AxisSide::Top => (
            LineSegment::new(at, line.y1 - tick_length, at, line.y1),
            LineSegment::new(at, line.y1, at, line.y1 + viewport.height),
        ),
        AxisSide::Bottom => (
            LineSegment::new(at, line.y2 + tick_length, at, line.y2),
            LineSegment::new(at, line.y2, at, line.y2 - viewport.height),
        ),
    };

    let label = axis.tick_label(tick).map(|text| {
        let outer = tick_line.start();
        let (position, anchor, baseline) = match side {
            AxisSide::Left => (
                Point::new(outer.x - pad, outer.y),
                TextAnchor::End,
                TextBaseline::Middle,
            ),
            AxisSide::Right => (
                Point::new(outer.x + pad, outer.y),
                TextAnchor::Start,
                TextBaseline::Middle,
            ),
            AxisSide::Top => (
                Point::new(outer.x, outer.y - pad),
                TextAnchor::Middle,
                TextBaseline::Alphabetic,
            ),
            AxisSide::Bottom => (
                Point::new(outer.x, outer.y + pad),
                TextAnchor::Middle,
                TextBaseline::Hanging,
            ),
        };
        TickLabel {
            text,
            position,
            anchor,
            baseline,
        }
    });

    TickGeometry {
        value: tick,
        line: tick_line,
        label,
        grid: axis.spec().grid_style.as_ref().map(|_| grid),
    }
}

fn positive_font_size(style: &LabelStyle) -> Option<f64> {
    style.font_size.filter(|size| *size > 0.0)
}

fn has_title(spec: &AxisSpec) -> bool {
    spec.title.as_deref().is_some_and(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{round_pixel, side_padding};
    use crate::api::PlotConfig;
    use crate::core::{AxisSpec, AxisType};

    #[test]
    fn round_pixel_lands_on_pixel_centres() {
        assert_eq!(round_pixel(10.0), 10.5);
        assert_eq!(round_pixel(10.9), 10.5);
        assert_eq!(round_pixel(-0.2), -0.5);
    }

    #[test]
    fn padding_accumulates_axis_parts() {
        let config = PlotConfig::default();
        assert_eq!(side_padding(&config, None), 8.0);

        let bare = AxisSpec::new(AxisType::Number);
        // pad + stroke + (label font + pad)
        assert_eq!(side_padding(&config, Some(&bare)), 4.0 + 1.0 + 16.0);

        let full = AxisSpec::new(AxisType::Number)
            .with_tick_length(6.0)
            .with_title("Value");
        assert_eq!(
            side_padding(&config, Some(&full)),
            4.0 + 1.0 + 10.0 + 16.0 + 18.0
        );
    }
}
