mod axis_geometry;
mod engine;
mod layout_pass;
mod plot_config;
mod plot_layout;
mod trace_geometry;
mod trace_ids;

pub use axis_geometry::{
    AxisGeometry, AxisTitle, LineSegment, Padding, TextAnchor, TextBaseline, TickGeometry,
    TickLabel, build_axis_geometry, compute_padding, plot_viewport, round_pixel, side_padding,
};
pub use engine::{Plot, PlotEngine};
pub use plot_config::{
    AxesConfig, DEFAULT_AXIS_STROKE_WIDTH, DEFAULT_LABEL_FONT_SIZE, DEFAULT_PAD,
    DEFAULT_TITLE_FONT_SIZE, PlotConfig,
};
pub use plot_layout::{
    IssueSubject, LayoutIssue, PLOT_LAYOUT_JSON_SCHEMA_V1, PlotLayout, PlotLayoutJsonContractV1,
};
pub use trace_geometry::{
    MarkerGeometry, TraceGeometry, TraceLayout, bar_geometry, scatter_geometry,
};
pub use trace_ids::TraceIdGenerator;
