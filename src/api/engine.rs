use serde::{Deserialize, Serialize};

use crate::core::TraceSpec;
use crate::error::{ChartError, ChartResult};

use super::{PlotConfig, TraceIdGenerator};

/// Serializable plot document: configuration plus traces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Plot {
    pub config: PlotConfig,
    pub traces: Vec<TraceSpec>,
}

impl Plot {
    #[must_use]
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config,
            traces: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_trace(mut self, trace: TraceSpec) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let plot: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse plot: {e}")))?;
        plot.config.validate()?;
        Ok(plot)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize plot: {e}")))
    }
}

/// Plot instance that owns its traces and computes layouts.
///
/// Every trace carries an id from the moment it is added; layouts only read
/// engine state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotEngine {
    pub(super) config: PlotConfig,
    pub(super) traces: Vec<TraceSpec>,
    ids: TraceIdGenerator,
}

impl PlotEngine {
    pub fn new(config: PlotConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            traces: Vec::new(),
            ids: TraceIdGenerator::new(),
        })
    }

    pub fn from_plot(plot: Plot) -> ChartResult<Self> {
        let mut engine = Self::new(plot.config)?;
        for trace in plot.traces {
            engine.add_trace(trace);
        }
        Ok(engine)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        Self::from_plot(Plot::from_json_str(input)?)
    }

    /// Adds a trace and returns its id.
    pub fn add_trace(&mut self, mut trace: TraceSpec) -> String {
        let id = self.ids.assign(trace.id.as_deref(), &trace.y);
        trace.id = Some(id.clone());
        self.traces.push(trace);
        id
    }

    /// Replaces every trace; ids keep counting from the previous traces.
    pub fn set_traces(&mut self, traces: Vec<TraceSpec>) -> Vec<String> {
        self.traces.clear();
        traces
            .into_iter()
            .map(|trace| self.add_trace(trace))
            .collect()
    }

    pub fn remove_trace(&mut self, id: &str) -> Option<TraceSpec> {
        let index = self
            .traces
            .iter()
            .position(|trace| trace.id.as_deref() == Some(id))?;
        Some(self.traces.remove(index))
    }

    pub fn set_config(&mut self, config: PlotConfig) -> ChartResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    #[must_use]
    pub fn traces(&self) -> &[TraceSpec] {
        &self.traces
    }

    /// Snapshot of the engine as a plot document.
    #[must_use]
    pub fn to_plot(&self) -> Plot {
        Plot {
            config: self.config.clone(),
            traces: self.traces.clone(),
        }
    }
}
