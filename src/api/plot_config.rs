use serde::{Deserialize, Serialize};

use crate::core::{AxisSide, AxisSpec, DEFAULT_HOVER_BUCKET_PX, LabelStyle, LineStyle};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_PAD: f64 = 4.0;
pub const DEFAULT_AXIS_STROKE_WIDTH: f64 = 1.0;
pub const DEFAULT_LABEL_FONT_SIZE: f64 = 12.0;
pub const DEFAULT_TITLE_FONT_SIZE: f64 = 14.0;

/// Axis configuration per plot side; unset sides are created on demand for
/// traces that reference them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub top: Option<AxisSpec>,
    pub bottom: Option<AxisSpec>,
    pub left: Option<AxisSpec>,
    pub right: Option<AxisSpec>,
}

impl AxesConfig {
    #[must_use]
    pub fn get(&self, side: AxisSide) -> Option<&AxisSpec> {
        match side {
            AxisSide::Top => self.top.as_ref(),
            AxisSide::Bottom => self.bottom.as_ref(),
            AxisSide::Left => self.left.as_ref(),
            AxisSide::Right => self.right.as_ref(),
        }
    }

    pub fn set(&mut self, side: AxisSide, spec: AxisSpec) {
        let slot = match side {
            AxisSide::Top => &mut self.top,
            AxisSide::Bottom => &mut self.bottom,
            AxisSide::Left => &mut self.left,
            AxisSide::Right => &mut self.right,
        };
        *slot = Some(spec);
    }

    /// Configured axes in side order.
    pub fn iter(&self) -> impl Iterator<Item = (AxisSide, &AxisSpec)> {
        AxisSide::ALL
            .into_iter()
            .filter_map(|side| self.get(side).map(|spec| (side, spec)))
    }
}

/// Plot-wide layout configuration.
///
/// Per-axis styles replace the plot defaults as a whole when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_pad")]
    pub pad: f64,
    #[serde(default)]
    pub axes: AxesConfig,
    #[serde(default = "default_axis_style")]
    pub axis_style: LineStyle,
    #[serde(default = "default_label_style")]
    pub label_style: LabelStyle,
    #[serde(default = "default_title_style")]
    pub title_style: LabelStyle,
    /// Width of the screen-x buckets that merge hover points.
    #[serde(default = "default_hover_bucket_px")]
    pub hover_bucket_px: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            pad: default_pad(),
            axes: AxesConfig::default(),
            axis_style: default_axis_style(),
            label_style: default_label_style(),
            title_style: default_title_style(),
            hover_bucket_px: default_hover_bucket_px(),
        }
    }
}

impl PlotConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pad(mut self, pad: f64) -> Self {
        self.pad = pad;
        self
    }

    #[must_use]
    pub fn with_axis(mut self, side: AxisSide, spec: AxisSpec) -> Self {
        self.axes.set(side, spec);
        self
    }

    #[must_use]
    pub fn with_hover_bucket_px(mut self, bucket_px: f64) -> Self {
        self.hover_bucket_px = bucket_px;
        self
    }

    /// Checks the plot-wide settings and every configured axis.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.pad.is_finite() || self.pad < 0.0 {
            return Err(ChartError::InvalidConfig(
                "pad must be finite and >= 0".to_owned(),
            ));
        }
        if !self.hover_bucket_px.is_finite() || self.hover_bucket_px <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "hover bucket width must be finite and > 0".to_owned(),
            ));
        }
        for (_, spec) in self.axes.iter() {
            spec.validate()?;
        }
        Ok(())
    }

    /// Effective line style of an axis.
    #[must_use]
    pub fn axis_style_for<'a>(&'a self, spec: &'a AxisSpec) -> &'a LineStyle {
        spec.style.as_ref().unwrap_or(&self.axis_style)
    }

    #[must_use]
    pub fn label_style_for<'a>(&'a self, spec: &'a AxisSpec) -> &'a LabelStyle {
        spec.label_style.as_ref().unwrap_or(&self.label_style)
    }

    #[must_use]
    pub fn title_style_for<'a>(&'a self, spec: &'a AxisSpec) -> &'a LabelStyle {
        spec.title_style.as_ref().unwrap_or(&self.title_style)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize plot config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse plot config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_pad() -> f64 {
    DEFAULT_PAD
}

fn default_axis_style() -> LineStyle {
    LineStyle::with_stroke_width(DEFAULT_AXIS_STROKE_WIDTH)
}

fn default_label_style() -> LabelStyle {
    LabelStyle::with_font_size(DEFAULT_LABEL_FONT_SIZE)
}

fn default_title_style() -> LabelStyle {
    LabelStyle::with_font_size(DEFAULT_TITLE_FONT_SIZE).bold()
}

fn default_hover_bucket_px() -> f64 {
    DEFAULT_HOVER_BUCKET_PX
}
