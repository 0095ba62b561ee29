//! One layout pass: ranges → rounding → ticks → transforms → geometry → hover.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use crate::core::{
    AxisRange, AxisSeed, AxisSide, AxisSpec, AxisType, BarLayout, BarOrientation, ColumnReader,
    HoverIndexer, HoverPoint, RangedAxis, ResolvedAxis, Size, StackBaselines, StackSource,
    TraceKind, TraceSpec, build_transform, extend_range, stack_group_sums, stacked_range,
};
use crate::error::{ChartError, ChartResult};

use super::{
    IssueSubject, LayoutIssue, PlotEngine, PlotLayout, TraceLayout, bar_geometry,
    build_axis_geometry, compute_padding, plot_viewport, scatter_geometry,
};

/// Slot of a bar trace among the bar traces sharing its category axis.
#[derive(Debug, Clone, Copy)]
struct BarSlot {
    category_side: AxisSide,
    index: usize,
    count: usize,
}

impl PlotEngine {
    /// Computes the full layout for an outer size.
    ///
    /// Per-axis and per-trace failures are reported in [`PlotLayout::issues`];
    /// configuration errors and an unusable size abort the pass. The result
    /// only depends on the engine state and `size`.
    pub fn layout(&self, size: Size) -> ChartResult<PlotLayout> {
        if !size.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        self.config.validate()?;

        let mut issues = Vec::new();
        let mut active: Vec<(usize, &TraceSpec, TraceKind)> = Vec::with_capacity(self.traces.len());
        for (index, trace) in self.traces.iter().enumerate() {
            match trace.resolve_kind() {
                Ok(kind) => active.push((index, trace, kind)),
                Err(err) => issues.push(report_issue(trace_subject(trace), err)),
            }
        }

        let specs = self.axis_specs(&active);
        let padding = compute_padding(&self.config, &specs);
        let viewport = plot_viewport(size, padding)?;
        debug!(
            traces = active.len(),
            axes = specs.len(),
            width = viewport.width,
            height = viewport.height,
            "starting layout pass"
        );

        let ranged = compute_ranges(specs, &active);
        let ranged = apply_forcing(ranged, &active);

        let mut axes: IndexMap<AxisSide, ResolvedAxis> = IndexMap::new();
        for (side, axis) in ranged {
            let (rounded, _) = axis.round();
            let (resolved, error) = rounded.resolve();
            if let Some(err) = error {
                if !err.is_recoverable() {
                    return Err(err);
                }
                issues.push(report_issue(IssueSubject::Axis(side), err));
            }
            axes.insert(side, resolved);
        }

        let slots = bar_slots(&active, &axes);
        let mut baselines: IndexMap<AxisSide, StackBaselines> = IndexMap::new();
        let mut hover = HoverIndexer::new(self.config.hover_bucket_px)?;
        let mut traces = Vec::with_capacity(active.len());

        for &(index, trace, kind) in &active {
            let (Some(x_axis), Some(y_axis)) = (axes.get(&trace.x_side()), axes.get(&trace.y_side()))
            else {
                continue;
            };
            let id = trace.display_id().to_owned();
            let transform = build_transform(
                x_axis.transform_range(),
                y_axis.transform_range(),
                viewport,
            );
            let xs = ColumnReader::for_axis(&trace.x, x_axis.axis_type())
                .read_frozen(&trace.rows, x_axis.groups());
            let ys = ColumnReader::for_axis(&trace.y, y_axis.axis_type())
                .read_frozen(&trace.rows, y_axis.groups());

            let geometry = match kind {
                TraceKind::Scatter => {
                    let marker = match trace.resolve_marker() {
                        Ok(marker) => marker,
                        Err(err) if err.is_recoverable() => {
                            issues.push(report_issue(IssueSubject::Trace(id.clone()), err));
                            None
                        }
                        Err(err) => return Err(err),
                    };
                    let style = trace.style.resolve_scatter(index, marker.is_some());
                    scatter_geometry(&xs, &ys, transform, style, marker)
                }
                TraceKind::Bar => {
                    let Some(slot) = slots.get(&index) else {
                        let err = ChartError::BarAxisNotCategorical { trace: id.clone() };
                        issues.push(report_issue(IssueSubject::Trace(id), err));
                        continue;
                    };
                    let category_axis = if slot.category_side == trace.x_side() {
                        x_axis
                    } else {
                        y_axis
                    };
                    let orientation = if slot.category_side == trace.x_side() {
                        BarOrientation::Vertical
                    } else {
                        BarOrientation::Horizontal
                    };
                    let mut layout = BarLayout::new(
                        category_axis.spec().bar_ratio(),
                        slot.index,
                        slot.count,
                        orientation,
                    )?;
                    if category_axis.axis_type() == AxisType::Stack {
                        layout = layout.stacked();
                    }
                    let style = trace.style.resolve_bar(index);
                    let stack = baselines.entry(slot.category_side).or_default();
                    bar_geometry(layout, &xs, &ys, transform, style, stack)
                }
            };

            for (x, y) in xs.iter().zip(&ys) {
                let (Some(x), Some(y)) = (*x, *y) else {
                    continue;
                };
                hover.push(HoverPoint {
                    trace_id: id.clone(),
                    trace_index: index,
                    x,
                    y,
                    x_label: x_axis.hover_label(x),
                    y_label: y_axis.hover_label(y),
                    screen: transform.apply(x, y),
                });
            }

            traces.push(TraceLayout {
                id,
                index,
                x_axis: trace.x_side(),
                y_axis: trace.y_side(),
                transform,
                geometry,
            });
        }

        let axis_geometry = axes
            .iter()
            .map(|(side, axis)| build_axis_geometry(axis, *side, viewport, &self.config))
            .collect();

        debug!(
            traces = traces.len(),
            issues = issues.len(),
            "finished layout pass"
        );
        Ok(PlotLayout {
            viewport,
            padding,
            axes: axis_geometry,
            traces,
            hover: hover.build(viewport),
            issues,
        })
    }

    /// Configured axes plus default axes for every side a trace references.
    fn axis_specs(&self, active: &[(usize, &TraceSpec, TraceKind)]) -> IndexMap<AxisSide, AxisSpec> {
        let referenced: IndexSet<AxisSide> = active
            .iter()
            .flat_map(|(_, trace, _)| [trace.x_side(), trace.y_side()])
            .collect();
        AxisSide::ALL
            .into_iter()
            .filter_map(|side| match self.config.axes.get(side) {
                Some(spec) => Some((side, spec.clone())),
                None if referenced.contains(&side) => Some((side, AxisSpec::default())),
                None => None,
            })
            .collect()
    }
}

/// Column a trace binds to `side`, if it uses that axis at all.
fn column_for(trace: &TraceSpec, side: AxisSide) -> Option<&str> {
    if trace.x_side() == side {
        Some(&trace.x)
    } else if trace.y_side() == side {
        Some(&trace.y)
    } else {
        None
    }
}

/// Axis on the other dimension of a trace.
fn opposite_side(trace: &TraceSpec, side: AxisSide) -> Option<AxisSide> {
    if trace.x_side() == side {
        Some(trace.y_side())
    } else if trace.y_side() == side {
        Some(trace.x_side())
    } else {
        None
    }
}

fn compute_ranges(
    specs: IndexMap<AxisSide, AxisSpec>,
    active: &[(usize, &TraceSpec, TraceKind)],
) -> IndexMap<AxisSide, RangedAxis> {
    specs
        .into_iter()
        .map(|(side, spec)| {
            let seed = AxisSeed::new(side.name(), spec).into_ranged();
            let axis = active.iter().fold(seed, |axis, (_, trace, _)| {
                match column_for(trace, side) {
                    Some(column) => axis.extend_with(&trace.rows, column),
                    None => axis,
                }
            });
            (side, axis)
        })
        .collect()
}

/// Stacked maxima and zero baselines for value axes opposite categorical ones.
fn apply_forcing(
    ranged: IndexMap<AxisSide, RangedAxis>,
    active: &[(usize, &TraceSpec, TraceKind)],
) -> IndexMap<AxisSide, RangedAxis> {
    let mut stacked: IndexMap<AxisSide, AxisRange> = IndexMap::new();
    let mut zero_based: IndexSet<AxisSide> = IndexSet::new();

    for (side, axis) in &ranged {
        match axis.spec().axis_type {
            AxisType::Stack => {
                let sources = active.iter().filter_map(|(_, trace, _)| {
                    let category_column = column_for(trace, *side)?;
                    let value_side = opposite_side(trace, *side)?;
                    Some(StackSource {
                        rows: trace.rows.as_slice(),
                        category_column,
                        value_column: column_for(trace, value_side)?,
                    })
                });
                let range = stacked_range(&stack_group_sums(sources));
                for value_side in active
                    .iter()
                    .filter_map(|(_, trace, _)| opposite_side(trace, *side))
                {
                    let merged = extend_range(stacked.get(&value_side).copied(), Some(range));
                    if let Some(merged) = merged {
                        stacked.insert(value_side, merged);
                    }
                }
            }
            AxisType::Group => {
                zero_based.extend(
                    active
                        .iter()
                        .filter_map(|(_, trace, _)| opposite_side(trace, *side)),
                );
            }
            AxisType::Number | AxisType::Time => {}
        }
    }

    ranged
        .into_iter()
        .map(|(side, axis)| {
            if axis.spec().axis_type.is_categorical() {
                return (side, axis);
            }
            let axis = match stacked.get(&side) {
                Some(range) => {
                    debug!(axis = side.name(), range = ?range, "forcing stacked range");
                    axis.force_range(*range)
                }
                None => axis,
            };
            let axis = if zero_based.contains(&side) {
                axis.include_zero()
            } else {
                axis
            };
            (side, axis)
        })
        .collect()
}

fn bar_slots(
    active: &[(usize, &TraceSpec, TraceKind)],
    axes: &IndexMap<AxisSide, ResolvedAxis>,
) -> IndexMap<usize, BarSlot> {
    let is_categorical = |side: AxisSide| {
        axes.get(&side)
            .is_some_and(|axis| axis.axis_type().is_categorical())
    };
    let bars: Vec<(usize, AxisSide)> = active
        .iter()
        .filter(|(_, _, kind)| *kind == TraceKind::Bar)
        .filter_map(|(index, trace, _)| {
            let side = if is_categorical(trace.x_side()) {
                trace.x_side()
            } else if is_categorical(trace.y_side()) {
                trace.y_side()
            } else {
                return None;
            };
            Some((*index, side))
        })
        .collect();

    let mut seen: IndexMap<AxisSide, usize> = IndexMap::new();
    bars.iter()
        .map(|(index, side)| {
            let count = bars.iter().filter(|(_, other)| other == side).count();
            let position = seen.entry(*side).or_insert(0);
            let slot = BarSlot {
                category_side: *side,
                index: *position,
                count,
            };
            *position += 1;
            (*index, slot)
        })
        .collect()
}

fn trace_subject(trace: &TraceSpec) -> IssueSubject {
    IssueSubject::Trace(trace.display_id().to_owned())
}

fn report_issue(subject: IssueSubject, err: ChartError) -> LayoutIssue {
    warn!(subject = ?subject, error = %err, "skipping layout element");
    LayoutIssue::new(subject, &err)
}
