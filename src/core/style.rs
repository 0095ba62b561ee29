use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Trace colors assigned by trace order when a style leaves them unset.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#377eb8", "#4daf4a", "#e41a1c", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf",
];

/// RGBA color in normalized 0..=1 channel values.
///
/// Serializes as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(input: &str) -> ChartResult<Self> {
        let digits = input.trim().strip_prefix('#').unwrap_or(input.trim());
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_owned(),
            _ => {
                return Err(ChartError::InvalidConfig(format!(
                    "color `{input}` must be #rgb, #rrggbb or #rrggbbaa"
                )));
            }
        };

        let channel = |index: usize| -> ChartResult<f64> {
            let pair = expanded.get(index * 2..index * 2 + 2).ok_or_else(|| {
                ChartError::InvalidConfig(format!("color `{input}` is truncated"))
            })?;
            u8::from_str_radix(pair, 16)
                .map(|value| f64::from(value) / 255.0)
                .map_err(|_| ChartError::InvalidConfig(format!("color `{input}` is not hex")))
        };

        let alpha = if expanded.len() == 8 { channel(3)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(1)?, channel(2)?, alpha))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.alpha >= 1.0 {
            format!(
                "#{:02x}{:02x}{:02x}",
                byte(self.red),
                byte(self.green),
                byte(self.blue)
            )
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.red),
                byte(self.green),
                byte(self.blue),
                byte(self.alpha)
            )
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Palette color for the trace at `index`, wrapping around.
#[must_use]
pub fn palette_color(index: usize) -> Color {
    let hex = DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
    // Palette entries are compile-time constants in #rrggbb form.
    Color::from_hex(hex).unwrap_or(Color::rgb(0.0, 0.0, 0.0))
}

/// Stroke attributes for axis lines, ticks and grid lines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub stroke: Option<Color>,
    pub stroke_width: Option<f64>,
    pub stroke_dasharray: Option<Vec<f64>>,
    pub opacity: Option<f64>,
}

impl LineStyle {
    #[must_use]
    pub fn with_stroke_width(stroke_width: f64) -> Self {
        Self {
            stroke_width: Some(stroke_width),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Text attributes for tick labels and axis titles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub fill: Option<Color>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<FontWeight>,
}

impl LabelStyle {
    #[must_use]
    pub fn with_font_size(font_size: f64) -> Self {
        Self {
            font_size: Some(font_size),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.font_weight = Some(FontWeight::Bold);
        self
    }
}

/// Paint attributes of a trace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceStyle {
    pub stroke: Option<Color>,
    pub stroke_width: Option<f64>,
    pub stroke_dasharray: Option<Vec<f64>>,
    pub fill: Option<Color>,
    pub fill_opacity: Option<f64>,
    pub opacity: Option<f64>,
}

impl TraceStyle {
    /// Scatter traces get a palette stroke when they ask for a line width and
    /// a palette fill when they draw markers.
    #[must_use]
    pub fn resolve_scatter(&self, trace_index: usize, has_marker: bool) -> Self {
        let mut style = self.clone();
        let default_color = palette_color(trace_index);
        if style.stroke_width.is_some() && style.stroke.is_none() {
            style.stroke = Some(default_color);
        }
        if has_marker && style.fill.is_none() {
            style.fill = Some(default_color);
        }
        style
    }

    /// Bar traces get a palette fill when neither stroke nor fill is set.
    #[must_use]
    pub fn resolve_bar(&self, trace_index: usize) -> Self {
        let mut style = self.clone();
        if style.stroke.is_none() && style.fill.is_none() {
            style.fill = Some(palette_color(trace_index));
        }
        style
    }

    #[must_use]
    pub fn draws_lines(&self) -> bool {
        self.stroke.is_some()
    }
}
