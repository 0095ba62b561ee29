pub mod axis;
pub mod bars;
pub mod data;
pub mod extract;
pub mod hover;
pub mod label_format;
pub mod segments;
pub mod style;
pub mod ticks;
pub mod trace;
pub mod transform;
pub mod types;

pub use axis::{
    AxisOrientation, AxisSeed, AxisSide, AxisSpec, AxisType, DEFAULT_BAR_RATIO, RangeSpec,
    RangedAxis, ResolvedAxis, RoundedAxis, StackSource, TickMode, category_range, round_range,
    stack_group_sums, stacked_range,
};
pub use bars::{BarGeometry, BarLayout, BarOrientation, StackBaselines, build_bars};
pub use data::{CellValue, Record, Row, format_plain_number};
pub use extract::{
    CategoryGroups, ColumnReader, ValueKind, extract_categories, extract_numbers,
    millis_to_datetime, parse_timestamp_millis,
};
pub use hover::{DEFAULT_HOVER_BUCKET_PX, HoverIndex, HoverIndexer, HoverPoint, HoverRegion};
pub use label_format::{format_calendar, format_numeral, value_title};
pub use segments::{point_count, segment};
pub use style::{
    Color, DEFAULT_PALETTE, FontWeight, LabelStyle, LineStyle, TraceStyle, palette_color,
};
pub use ticks::{
    MAX_TICK_COUNT, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, category_ticks, month_ticks,
    number_range_step, range_step, stepped_ticks,
};
pub use trace::{
    DEFAULT_MARKER_SIZE, MarkerShape, MarkerSpec, TraceKind, TraceSpec, XAxisSide, YAxisSide,
};
pub use transform::{AffineTransform, build_transform, data_box};
pub use types::{AxisRange, Point, Rect, Size, Viewport, extend_range};
