use approx::assert_abs_diff_eq;
use chrono::{TimeZone, Utc};
use plot_rs::ChartError;
use plot_rs::core::{
    AxisRange, AxisSeed, AxisSpec, AxisType, MS_PER_DAY, Row, StackSource, TickMode,
    category_ticks, number_range_step, round_range, stack_group_sums, stacked_range,
};

fn number_rows(column: &str, values: &[f64]) -> Vec<Row> {
    values
        .iter()
        .map(|value| Row::new().with(column, *value))
        .collect()
}

fn utc_millis(year: i32, month: u32, day: u32) -> f64 {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid date")
        .timestamp_millis() as f64
}

#[test]
fn rounding_widens_to_nearest_nice_step() {
    let (rounded, step) = round_range(AxisRange::new(-0.2, 0.9), AxisType::Number);
    assert_eq!(step, 1.0);
    assert_eq!(rounded, AxisRange::new(-1.0, 1.0));
}

#[test]
fn unit_range_gets_eleven_decimal_ticks() {
    let rows = number_rows("y", &[0.0, 1.0]);
    let (rounded, changed) = AxisSeed::new("left", AxisSpec::new(AxisType::Number))
        .compute_range(&rows, "y")
        .round();
    assert!(changed);
    assert_eq!(rounded.computed_range(), Some(AxisRange::new(0.0, 1.0)));

    let ticks = rounded.compute_ticks().expect("ticks");
    assert_eq!(ticks.len(), 11);
    let expected = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
    for (tick, expected) in ticks.iter().zip(expected) {
        assert_eq!(*tick, expected);
    }
}

#[test]
fn ten_day_time_axis_ticks_every_day() {
    let start = utc_millis(2023, 4, 1);
    let end = start + 10.0 * MS_PER_DAY;
    let rows = vec![
        Row::new().with("t", "2023-04-01"),
        Row::new().with("t", "2023-04-11"),
    ];
    let (rounded, _) = AxisSeed::new("bottom", AxisSpec::new(AxisType::Time))
        .compute_range(&rows, "t")
        .round();
    assert_eq!(rounded.computed_range(), Some(AxisRange::new(start, end)));

    let ticks = rounded.compute_ticks().expect("ticks");
    assert_eq!(ticks.len(), 11);
    for (index, tick) in ticks.iter().enumerate() {
        assert_eq!(*tick, start + index as f64 * MS_PER_DAY);
    }
}

#[test]
fn categorical_axis_centres_groups_on_integers() {
    let rows: Vec<Row> = ["foo", "bar", "baz", "fab"]
        .into_iter()
        .map(|name| Row::new().with("name", name))
        .collect();
    let ranged = AxisSeed::new("bottom", AxisSpec::new(AxisType::Group)).compute_range(&rows, "name");
    let groups: Vec<&str> = ranged.groups().iter().collect();
    assert_eq!(groups, ["foo", "bar", "baz", "fab"]);
    assert_eq!(ranged.computed_range(), Some(AxisRange::new(-0.5, 3.5)));

    let (rounded, changed) = ranged.round();
    assert!(!changed);
    assert_eq!(rounded.compute_ticks().expect("ticks"), vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn stacked_sums_force_value_range() {
    let rows: Vec<Row> = [
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
    .collect();

    let sums = stack_group_sums([
        StackSource {
            rows: rows.as_slice(),
            category_column: "name",
            value_column: "branch1",
        },
        StackSource {
            rows: rows.as_slice(),
            category_column: "name",
            value_column: "branch2",
        },
    ]);
    assert_abs_diff_eq!(sums["foo"], 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(sums["bar"], 5.7, epsilon = 1e-12);
    assert_abs_diff_eq!(sums["baz"], 9.0, epsilon = 1e-12);
    assert_abs_diff_eq!(sums["fab"], 3.7, epsilon = 1e-12);

    let forced = AxisSeed::new("left", AxisSpec::new(AxisType::Number))
        .compute_range(&rows, "branch1")
        .extend_with(&rows, "branch2")
        .force_range(stacked_range(&sums));
    let range = forced.computed_range().expect("range");
    assert_eq!(range.min, 0.0);
    assert_abs_diff_eq!(range.max, 9.0, epsilon = 1e-12);
}

#[test]
fn shared_axis_covers_union_of_traces() {
    let first = number_rows("a", &[2.0, 5.0]);
    let second = number_rows("b", &[-3.0, 4.0]);
    let ranged = AxisSeed::new("left", AxisSpec::new(AxisType::Number))
        .compute_range(&first, "a")
        .extend_with(&second, "b");
    assert_eq!(ranged.computed_range(), Some(AxisRange::new(-3.0, 5.0)));
}

#[test]
fn manual_range_and_ticks_are_kept() {
    let spec = AxisSpec::new(AxisType::Number)
        .with_range(0.0, 7.0)
        .with_manual_ticks(vec![0.0, 3.5, 7.0]);
    let rows = number_rows("y", &[100.0]);
    let (rounded, changed) = AxisSeed::new("left", spec).compute_range(&rows, "y").round();
    assert!(!changed);
    assert_eq!(rounded.computed_range(), Some(AxisRange::new(0.0, 7.0)));
    assert_eq!(rounded.compute_ticks().expect("ticks"), vec![0.0, 3.5, 7.0]);
}

#[test]
fn inverted_manual_range_reports_without_ticks() {
    let spec = AxisSpec::new(AxisType::Number).with_range(5.0, 1.0);
    let (rounded, _) = AxisSeed::new("left", spec).into_ranged().round();
    let (resolved, error) = rounded.resolve();
    assert!(matches!(error, Some(ChartError::InvertedRange { .. })));
    assert!(error.is_some_and(|err| err.is_recoverable()));
    assert!(resolved.ticks().is_empty());
}

#[test]
fn month_ticks_start_at_first_boundary_inside_range() {
    let spec = AxisSpec::new(AxisType::Time)
        .with_range(utc_millis(2023, 1, 15), utc_millis(2023, 5, 1))
        .with_tick_mode(TickMode::Months);
    let (rounded, _) = AxisSeed::new("bottom", spec).into_ranged().round();
    let ticks = rounded.compute_ticks().expect("ticks");
    assert_eq!(
        ticks,
        vec![
            utc_millis(2023, 2, 1),
            utc_millis(2023, 3, 1),
            utc_millis(2023, 4, 1)
        ]
    );
}

#[test]
fn long_time_spans_step_in_thirty_day_units() {
    let start = utc_millis(2023, 1, 1);
    let end = utc_millis(2024, 1, 1);
    // 365 days is ~12 thirty-day units, so the leading magnitude is 10 units.
    let step = number_range_step(start, end, 30.0 * MS_PER_DAY);
    assert_eq!(step, 300.0 * MS_PER_DAY);
}

#[test]
fn category_ticks_are_integers_inside_range() {
    assert_eq!(
        category_ticks(AxisRange::new(-0.5, 2.5)),
        vec![0.0, 1.0, 2.0]
    );
    assert!(category_ticks(AxisRange::new(0.2, 0.8)).is_empty());
}

#[test]
fn value_titles_follow_axis_type() {
    let rows: Vec<Row> = ["north", "south"]
        .into_iter()
        .map(|name| Row::new().with("region", name))
        .collect();
    let (rounded, _) = AxisSeed::new("bottom", AxisSpec::new(AxisType::Group))
        .compute_range(&rows, "region")
        .round();
    let (axis, _) = rounded.resolve();
    assert_eq!(axis.tick_label(1.0).as_deref(), Some("south"));
    assert_eq!(axis.tick_label(0.8).as_deref(), Some("south"));
    assert_eq!(axis.tick_label(2.0), None);
    assert_eq!(axis.tick_label(-1.0), None);

    let spec = AxisSpec::new(AxisType::Time).with_tick_format("YYYY-MM-DD");
    let (rounded, _) = AxisSeed::new("bottom", spec)
        .into_ranged()
        .round();
    let (axis, _) = rounded.resolve();
    assert_eq!(
        axis.tick_label(utc_millis(2023, 4, 1)).as_deref(),
        Some("2023-04-01")
    );

    let (rounded, _) = AxisSeed::new("left", AxisSpec::new(AxisType::Number))
        .into_ranged()
        .round();
    let (axis, _) = rounded.resolve();
    assert_eq!(axis.tick_label(2.5).as_deref(), Some("2.5"));
}
