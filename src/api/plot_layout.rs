use serde::{Deserialize, Serialize};

use crate::core::{AxisSide, HoverIndex, Viewport};
use crate::error::{ChartError, ChartResult};

use super::{AxisGeometry, Padding, TraceLayout};

pub const PLOT_LAYOUT_JSON_SCHEMA_V1: u32 = 1;

/// Element a non-fatal layout problem is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum IssueSubject {
    Axis(AxisSide),
    Trace(String),
}

/// Recoverable failure collected during a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutIssue {
    pub subject: IssueSubject,
    pub message: String,
}

impl LayoutIssue {
    #[must_use]
    pub fn new(subject: IssueSubject, error: &ChartError) -> Self {
        Self {
            subject,
            message: error.to_string(),
        }
    }
}

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    pub viewport: Viewport,
    pub padding: Padding,
    pub axes: Vec<AxisGeometry>,
    pub traces: Vec<TraceLayout>,
    pub hover: HoverIndex,
    pub issues: Vec<LayoutIssue>,
}

impl PlotLayout {
    #[must_use]
    pub fn axis(&self, side: AxisSide) -> Option<&AxisGeometry> {
        self.axes.iter().find(|axis| axis.side == side)
    }

    #[must_use]
    pub fn trace(&self, id: &str) -> Option<&TraceLayout> {
        self.traces.iter().find(|trace| trace.id == id)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize plot layout: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = PlotLayoutJsonContractV1 {
            schema_version: PLOT_LAYOUT_JSON_SCHEMA_V1,
            layout: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize plot layout contract v1: {e}"))
        })
    }

    /// Accepts both a bare layout and a v1 contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(layout) = serde_json::from_str::<PlotLayout>(input) {
            return Ok(layout);
        }
        let payload: PlotLayoutJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse plot layout json payload: {e}"))
        })?;
        if payload.schema_version != PLOT_LAYOUT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported plot layout schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.layout)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotLayoutJsonContractV1 {
    pub schema_version: u32,
    pub layout: PlotLayout,
}
