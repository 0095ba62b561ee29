use approx::assert_abs_diff_eq;
use plot_rs::api::{IssueSubject, TraceGeometry};
use plot_rs::core::{
    AxisRange, AxisSide, AxisSpec, AxisType, MarkerSpec, Row, Size, TraceSpec, Viewport,
};
use plot_rs::{ChartError, Plot, PlotConfig, PlotEngine, PlotLayout};

fn branch_rows() -> Vec<Row> {
    [
        ("foo", 3.0, 2.0),
        ("bar", 1.2, 4.5),
        ("baz", 5.8, 3.2),
        ("fab", 2.4, 1.3),
    ]
    .into_iter()
    .map(|(name, first, second)| {
        Row::new()
            .with("name", name)
            .with("branch1", first)
            .with("branch2", second)
    })
    .collect()
}

fn stacked_engine() -> PlotEngine {
    let config = PlotConfig::new().with_axis(AxisSide::Bottom, AxisSpec::new(AxisType::Stack));
    let mut engine = PlotEngine::new(config).expect("engine");
    engine.add_trace(TraceSpec::bar("name", "branch1", branch_rows()));
    engine.add_trace(TraceSpec::bar("name", "branch2", branch_rows()));
    engine
}

fn bar_rects(layout: &PlotLayout, id: &str) -> Vec<plot_rs::core::BarGeometry> {
    match &layout.trace(id).expect("trace").geometry {
        TraceGeometry::Bar { rects, .. } => rects.clone(),
        TraceGeometry::Scatter { .. } => panic!("expected bar geometry for {id}"),
    }
}

fn daily_rows() -> Vec<Row> {
    (1..=11)
        .map(|day| {
            let value = if day == 6 { None } else { Some(f64::from(day)) };
            Row::new()
                .with("date", format!("2023-04-{day:02}"))
                .with("value", value)
        })
        .collect()
}

#[test]
fn stacked_bars_force_value_axis_to_largest_category_sum() {
    let engine = stacked_engine();
    let layout = engine.layout(Size::new(400.0, 300.0)).expect("layout");

    assert!(layout.issues.is_empty());
    let left = layout.axis(AxisSide::Left).expect("left axis");
    assert_eq!(left.range, Some(AxisRange::new(0.0, 9.0)));
    assert_eq!(left.ticks.len(), 10);

    let bottom = layout.axis(AxisSide::Bottom).expect("bottom axis");
    assert_eq!(bottom.range, Some(AxisRange::new(-0.5, 3.5)));
    let labels: Vec<&str> = bottom
        .ticks
        .iter()
        .filter_map(|tick| tick.label.as_ref().map(|label| label.text.as_str()))
        .collect();
    assert_eq!(labels, ["foo", "bar", "baz", "fab"]);
}

#[test]
fn stacked_bars_sit_on_top_of_each_other() {
    let engine = stacked_engine();
    let layout = engine.layout(Size::new(400.0, 300.0)).expect("layout");
    let lower = bar_rects(&layout, "branch1-0");
    let upper = bar_rects(&layout, "branch2-1");
    assert_eq!(lower.len(), 4);
    assert_eq!(upper.len(), 4);

    for (lower, upper) in lower.iter().zip(&upper) {
        assert_eq!(lower.category, upper.category);
        assert_eq!(upper.base, lower.value);
        assert_abs_diff_eq!(upper.rect.bottom(), lower.rect.y, epsilon = 1e-9);
        assert_abs_diff_eq!(upper.rect.x, lower.rect.x, epsilon = 1e-9);
        assert_abs_diff_eq!(upper.rect.width, lower.rect.width, epsilon = 1e-9);
    }

    // The tallest stack reaches the top of the plot area.
    assert_abs_diff_eq!(upper[2].rect.y, layout.viewport.y, epsilon = 1e-9);
    // Stacked bars span the full bar ratio of a category.
    let category_width = layout.viewport.width / 4.0;
    assert_abs_diff_eq!(lower[0].rect.width, 0.75 * category_width, epsilon = 1e-9);
}

#[test]
fn hover_groups_stacked_points_per_category() {
    let engine = stacked_engine();
    let layout = engine.layout(Size::new(400.0, 300.0)).expect("layout");

    let regions = layout.hover.regions();
    assert_eq!(regions.len(), 4);
    let labels: Vec<Option<&str>> = regions.iter().map(|region| region.label.as_deref()).collect();
    assert_eq!(labels, [Some("foo"), Some("bar"), Some("baz"), Some("fab")]);
    for region in regions {
        assert_eq!(region.points.len(), 2);
        assert_eq!(region.points[0].trace_id, "branch1-0");
        assert_eq!(region.points[1].trace_id, "branch2-1");
    }

    let centre = regions[1].points[0].screen;
    let hit = layout.hover.hit_test(centre.x, centre.y).expect("hit");
    assert_eq!(hit.label.as_deref(), Some("bar"));
}

#[test]
fn padding_and_viewport_follow_configured_axes() {
    let engine = stacked_engine();
    let layout = engine.layout(Size::new(400.0, 300.0)).expect("layout");

    assert_eq!(layout.padding.left, 21.0);
    assert_eq!(layout.padding.bottom, 21.0);
    assert_eq!(layout.padding.top, 8.0);
    assert_eq!(layout.padding.right, 8.0);
    assert_eq!(layout.viewport, Viewport::new(21.0, 8.0, 371.0, 271.0));

    let left = layout.axis(AxisSide::Left).expect("left axis");
    assert_eq!(left.line.x1, 21.5);
    assert_eq!(left.line.y1, 8.5);
    assert_eq!(left.line.y2, 279.5);
}

#[test]
fn layout_is_idempotent() {
    let engine = stacked_engine();
    let size = Size::new(640.0, 480.0);
    let first = engine.layout(size).expect("first");
    let second = engine.layout(size).expect("second");
    assert_eq!(
        first.to_json_pretty().expect("first json"),
        second.to_json_pretty().expect("second json")
    );
}

#[test]
fn layout_contract_round_trips() {
    let engine = stacked_engine();
    let layout = engine.layout(Size::new(400.0, 300.0)).expect("layout");

    let contract = layout.to_json_contract_v1_pretty().expect("contract");
    assert!(contract.contains("\"schema_version\": 1"));
    let restored = PlotLayout::from_json_compat_str(&contract).expect("restored");
    assert_eq!(restored.viewport, layout.viewport);
    assert_eq!(restored.padding, layout.padding);
    assert_eq!(restored.axes.len(), layout.axes.len());
    assert_eq!(restored.hover.len(), layout.hover.len());
    let ids: Vec<&str> = restored.traces.iter().map(|trace| trace.id.as_str()).collect();
    assert_eq!(ids, ["branch1-0", "branch2-1"]);

    let bare = layout.to_json_pretty().expect("bare");
    let restored = PlotLayout::from_json_compat_str(&bare).expect("bare restored");
    assert_eq!(restored.traces.len(), 2);

    let future = contract.replace("\"schema_version\": 1", "\"schema_version\": 2");
    assert!(matches!(
        PlotLayout::from_json_compat_str(&future),
        Err(ChartError::InvalidData(_))
    ));
}

#[test]
fn time_scatter_splits_at_gaps_and_labels_days() {
    let config = PlotConfig::new().with_axis(
        AxisSide::Bottom,
        AxisSpec::new(AxisType::Time).with_tick_format("MMM D"),
    );
    let mut engine = PlotEngine::new(config).expect("engine");
    let id = engine.add_trace(
        TraceSpec::scatter("date", "value", daily_rows()).with_marker(MarkerSpec::default()),
    );
    assert_eq!(id, "value-0");

    let layout = engine.layout(Size::new(500.0, 300.0)).expect("layout");
    assert!(layout.issues.is_empty());

    let bottom = layout.axis(AxisSide::Bottom).expect("bottom axis");
    assert_eq!(bottom.ticks.len(), 11);
    let first_label = bottom.ticks[0].label.as_ref().expect("label");
    assert_eq!(first_label.text, "Apr 1");

    let TraceGeometry::Scatter {
        runs,
        markers,
        style,
    } = &layout.trace("value-0").expect("trace").geometry
    else {
        panic!("expected scatter geometry");
    };
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].len(), 5);
    assert_eq!(runs[1].len(), 5);
    assert_eq!(markers.len(), 10);
    assert!(style.fill.is_some());

    // Left edge of the data maps to the left edge of the plot area.
    assert_abs_diff_eq!(runs[0][0].x, layout.viewport.x, epsilon = 1e-6);
    assert_eq!(layout.hover.len(), 10);
}

#[test]
fn horizontal_bars_grow_from_zero_on_group_axis() {
    let rows: Vec<Row> = [("north", 2.0), ("south", 5.0)]
        .into_iter()
        .map(|(region, sales)| Row::new().with("region", region).with("sales", sales))
        .collect();
    let config = PlotConfig::new().with_axis(AxisSide::Left, AxisSpec::new(AxisType::Group));
    let mut engine = PlotEngine::new(config).expect("engine");
    let id = engine.add_trace(TraceSpec::bar("sales", "region", rows));

    let layout = engine.layout(Size::new(300.0, 200.0)).expect("layout");
    assert!(layout.issues.is_empty());
    let bottom = layout.axis(AxisSide::Bottom).expect("bottom axis");
    assert_eq!(bottom.range, Some(AxisRange::new(0.0, 5.0)));

    let rects = bar_rects(&layout, &id);
    assert_eq!(rects.len(), 2);
    for bar in &rects {
        assert_abs_diff_eq!(bar.rect.x, layout.viewport.x, epsilon = 1e-9);
        assert!(bar.rect.height > 0.0);
    }
    assert_abs_diff_eq!(rects[1].rect.right(), layout.viewport.right(), epsilon = 1e-9);
}

#[test]
fn unsupported_elements_are_reported_and_skipped() {
    let rows: Vec<Row> = (0..3)
        .map(|index| Row::new().with("x", index).with("y", index * 2))
        .collect();
    let mut engine = PlotEngine::new(PlotConfig::new()).expect("engine");
    let plain = engine.add_trace(TraceSpec::scatter("x", "y", rows.clone()));
    let pie = engine.add_trace(TraceSpec {
        kind: "pie".to_owned(),
        ..TraceSpec::scatter("x", "y", rows.clone())
    });
    let hexagon = engine.add_trace(
        TraceSpec::scatter("x", "y", rows.clone()).with_marker(MarkerSpec::new("hexagon", 4.0)),
    );
    let bars = engine.add_trace(TraceSpec::bar("x", "y", rows));

    let layout = engine.layout(Size::new(300.0, 200.0)).expect("layout");
    let subjects: Vec<&IssueSubject> = layout.issues.iter().map(|issue| &issue.subject).collect();
    assert_eq!(
        subjects,
        [
            &IssueSubject::Trace(pie.clone()),
            &IssueSubject::Trace(hexagon.clone()),
            &IssueSubject::Trace(bars.clone()),
        ]
    );
    assert!(layout.issues[0].message.contains("pie"));
    assert!(layout.issues[1].message.contains("hexagon"));

    assert!(layout.trace(&plain).is_some());
    assert!(layout.trace(&pie).is_none());
    assert!(layout.trace(&bars).is_none());
    let TraceGeometry::Scatter { markers, runs, .. } =
        &layout.trace(&hexagon).expect("hexagon trace").geometry
    else {
        panic!("expected scatter geometry");
    };
    assert!(markers.is_empty());
    assert_eq!(runs[0].len(), 3);
}

#[test]
fn configured_axis_without_data_reports_missing_range() {
    let config = PlotConfig::new().with_axis(AxisSide::Right, AxisSpec::new(AxisType::Number));
    let mut engine = PlotEngine::new(config).expect("engine");
    engine.add_trace(TraceSpec::scatter(
        "x",
        "y",
        vec![Row::new().with("x", 1.0).with("y", 1.0)],
    ));

    let layout = engine.layout(Size::new(300.0, 200.0)).expect("layout");
    assert_eq!(layout.issues.len(), 1);
    assert_eq!(layout.issues[0].subject, IssueSubject::Axis(AxisSide::Right));
    let right = layout.axis(AxisSide::Right).expect("right axis");
    assert!(right.ticks.is_empty());
    assert_eq!(right.range, None);
}

#[test]
fn hover_ignores_points_clipped_by_a_manual_range() {
    let config = PlotConfig::new().with_axis(
        AxisSide::Bottom,
        AxisSpec::new(AxisType::Number).with_range(0.0, 10.0),
    );
    let mut engine = PlotEngine::new(config).expect("engine");
    let rows = [(-5.0, 1.0), (-4.0, 2.0), (5.0, 3.0), (14.0, 4.0)]
        .into_iter()
        .map(|(x, y)| Row::new().with("x", x).with("y", y))
        .collect();
    engine.add_trace(TraceSpec::scatter("x", "y", rows));

    let layout = engine.layout(Size::new(400.0, 300.0)).expect("layout");
    let viewport = layout.viewport;
    let regions = layout.hover.regions();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].points[0].x, 5.0);
    assert_eq!(regions[0].rect.x, viewport.x);
    assert_abs_diff_eq!(regions[0].rect.right(), viewport.right(), epsilon = 1e-9);
    assert!(regions.iter().all(|region| region.rect.width >= 0.0));
}

#[test]
fn months_on_number_axis_is_rejected_up_front() {
    let input = r#"{"config": {"axes": {"left": {"type": "number", "tick_mode": "months"}}}}"#;
    assert_eq!(
        Plot::from_json_str(input),
        Err(ChartError::UnsupportedTickMode {
            axis_type: "number".to_owned()
        })
    );

    let mut config = PlotConfig::new();
    config.axes.left =
        Some(AxisSpec::new(AxisType::Number).with_tick_mode(plot_rs::core::TickMode::Months));
    assert!(PlotEngine::new(config).is_err());
}

#[test]
fn plot_documents_load_from_json() {
    let input = r#"{
        "config": {
            "pad": 6,
            "axes": {
                "bottom": {"type": "stack"},
                "left": {"range": {"manual": {"min": 0, "max": 12}}}
            }
        },
        "traces": [
            {"kind": "bar", "x": "name", "y": "branch1", "rows": [{"name": "foo", "branch1": 3}]},
            {"kind": "bar", "x": "name", "y": "branch2", "rows": [{"name": "foo", "branch2": "4"}]}
        ]
    }"#;
    let engine = PlotEngine::from_json_str(input).expect("engine");
    assert_eq!(engine.config().pad, 6.0);
    let ids: Vec<Option<&str>> = engine
        .traces()
        .iter()
        .map(|trace| trace.id.as_deref())
        .collect();
    assert_eq!(ids, [Some("branch1-0"), Some("branch2-1")]);

    let layout = engine.layout(Size::new(200.0, 200.0)).expect("layout");
    // Manual ranges win over stacked forcing.
    assert_eq!(
        layout.axis(AxisSide::Left).and_then(|axis| axis.range),
        Some(AxisRange::new(0.0, 12.0))
    );
    let upper = bar_rects(&layout, "branch2-1");
    assert_eq!(upper[0].base, 3.0);
    assert_eq!(upper[0].value, 4.0);
}

#[test]
fn config_json_fills_defaults() {
    let config = PlotConfig::from_json_str("{}").expect("config");
    assert_eq!(config, PlotConfig::default());
    assert!(PlotConfig::from_json_str(r#"{"pad": -1}"#).is_err());
    assert!(PlotConfig::from_json_str(r#"{"hover_bucket_px": 0}"#).is_err());
}

#[test]
fn invalid_sizes_abort_the_pass() {
    let engine = stacked_engine();
    assert!(matches!(
        engine.layout(Size::new(0.0, 300.0)),
        Err(ChartError::InvalidViewport { .. })
    ));
    // Padding alone exceeds the available height.
    assert!(matches!(
        engine.layout(Size::new(400.0, 20.0)),
        Err(ChartError::InvalidViewport { .. })
    ));
}

#[test]
fn trace_ids_are_scoped_to_the_engine() {
    let mut first = PlotEngine::new(PlotConfig::new()).expect("first");
    let mut second = PlotEngine::new(PlotConfig::new()).expect("second");
    let rows = vec![Row::new().with("x", 1.0).with("y", 2.0)];

    assert_eq!(first.add_trace(TraceSpec::scatter("x", "y", rows.clone())), "y-0");
    assert_eq!(
        first.add_trace(TraceSpec::scatter("x", "y", rows.clone()).with_id("named")),
        "named"
    );
    assert_eq!(first.add_trace(TraceSpec::scatter("x", "y", rows.clone())), "y-2");
    assert_eq!(second.add_trace(TraceSpec::scatter("x", "y", rows)), "y-0");

    assert!(first.remove_trace("named").is_some());
    assert_eq!(first.traces().len(), 2);
    let layout = first.layout(Size::new(200.0, 200.0)).expect("layout");
    let ids: Vec<&str> = layout.traces.iter().map(|trace| trace.id.as_str()).collect();
    assert_eq!(ids, ["y-0", "y-2"]);
}

#[test]
fn plot_snapshot_round_trips_through_json() {
    let engine = stacked_engine();
    let json = engine.to_plot().to_json_pretty().expect("plot json");
    let restored = PlotEngine::from_json_str(&json).expect("restored");
    assert_eq!(restored.traces(), engine.traces());
    assert_eq!(restored.config(), engine.config());
}
