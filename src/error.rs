use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("axis `{axis}` has no computed range")]
    MissingRange { axis: String },

    #[error("axis `{axis}` range is inverted: min={min}, max={max}")]
    InvertedRange { axis: String, min: f64, max: f64 },

    #[error("tick mode `months` can only be used with time axes, not `{axis_type}`")]
    UnsupportedTickMode { axis_type: String },

    #[error("trace `{trace}` uses unsupported marker shape `{shape}`")]
    UnsupportedMarkerShape { trace: String, shape: String },

    #[error("trace `{trace}` uses unsupported trace kind `{kind}`")]
    UnsupportedTraceKind { trace: String, kind: String },

    #[error("bar trace `{trace}` needs a group or stack axis")]
    BarAxisNotCategorical { trace: String },
}

impl ChartError {
    /// Per-axis and per-trace failures that leave the rest of a layout pass intact.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingRange { .. }
                | Self::InvertedRange { .. }
                | Self::UnsupportedMarkerShape { .. }
                | Self::UnsupportedTraceKind { .. }
                | Self::BarAxisNotCategorical { .. }
        )
    }
}
