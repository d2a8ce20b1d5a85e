//! Property tests for the widget layouts.
//!
//! Each property is a falsifiable claim about layout output for arbitrary
//! input, checked with proptest.
//!
//! Run: cargo test --test widget_properties_test

#![allow(clippy::unwrap_used)]

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use trueno_widgets::data::{
    reference_day, CategoryTable, Graph, GraphNode, Observation, WeatherData,
};
use trueno_widgets::layout::stack;
use trueno_widgets::widgets::{display_order, DisplayMode, LegendAxis, ScatterPlot};

fn table_from(values: &[Vec<f64>]) -> CategoryTable {
    let width = values.first().map_or(0, Vec::len);
    let keys: Vec<String> = (0..width).map(|k| format!("s{k}")).collect();
    let rows = values.iter().enumerate().map(|(i, v)| (format!("row{i}"), v.clone())).collect();
    CategoryTable::from_rows("label", keys, rows)
}

fn rows_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..6).prop_flat_map(|keys| {
        prop::collection::vec(prop::collection::vec(0.0f64..1e6, keys), 0..25)
    })
}

fn observations_from(offsets: &[i64]) -> WeatherData {
    let origin = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
    let observations = offsets
        .iter()
        .map(|&d| Observation {
            date: origin + Duration::days(d),
            temperature_min: (d % 40) as f64,
            temperature_max: 40.0 + (d % 50) as f64,
        })
        .collect();
    WeatherData::new(observations)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Stacked segments are contiguous from zero and end at the row total.
    #[test]
    fn prop_stack_tiles_each_row(values in rows_strategy()) {
        let table = table_from(&values);
        let rows: Vec<&[f64]> = table.rows.iter().map(|r| r.values.as_slice()).collect();
        let series = stack(&rows, &table.keys);
        for (r, row) in table.rows.iter().enumerate() {
            let mut baseline = 0.0;
            for s in &series {
                let [start, end] = s.segments[r];
                prop_assert!((start - baseline).abs() < 1e-6);
                prop_assert!(end >= start);
                baseline = end;
            }
            prop_assert!((baseline - row.total).abs() <= 1e-9 * row.total.max(1.0));
        }
    }

    /// Sorted order is non-increasing in total; other modes keep load order.
    #[test]
    fn prop_display_order(values in rows_strategy()) {
        let table = table_from(&values);
        let sorted = display_order(&table.rows, DisplayMode::Sorted);
        prop_assert_eq!(sorted.len(), table.rows.len());
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].total >= pair[1].total);
            if pair[0].total == pair[1].total {
                prop_assert!(pair[0].original_index < pair[1].original_index);
            }
        }
        for mode in [DisplayMode::Bar, DisplayMode::Stacked] {
            let order: Vec<usize> =
                display_order(&table.rows, mode).iter().map(|r| r.original_index).collect();
            prop_assert_eq!(order, (0..table.rows.len()).collect::<Vec<_>>());
        }
    }

    /// Adjacency is symmetric and reflexive.
    #[test]
    fn prop_adjacency_symmetric_reflexive(
        n in 1usize..12,
        links in prop::collection::vec((0usize..12, 0usize..12), 0..30)
    ) {
        let nodes: Vec<GraphNode> =
            (0..n).map(|i| GraphNode { id: format!("n{i}"), group: 0 }).collect();
        let ids: Vec<(String, String)> =
            links.iter().map(|&(a, b)| (format!("n{}", a % n), format!("n{}", b % n))).collect();
        let refs: Vec<(&str, &str, f64)> =
            ids.iter().map(|(a, b)| (a.as_str(), b.as_str(), 1.0)).collect();
        let graph = Graph::from_parts(nodes, &refs).unwrap();
        let adjacency = graph.adjacency();
        for a in 0..n {
            prop_assert!(adjacency.connected(a, a));
            for b in 0..n {
                prop_assert_eq!(adjacency.connected(a, b), adjacency.connected(b, a));
            }
        }
        for &(a, b) in &links {
            prop_assert!(adjacency.connected(a % n, b % n));
        }
    }

    /// The highlighted subset is exactly the observations inside the window,
    /// wrapping across the year boundary.
    #[test]
    fn prop_legend_window_filter(
        offsets in prop::collection::vec(0i64..730, 1..60),
        x in 0.0f32..250.0
    ) {
        let data = observations_from(&offsets);
        let days: Vec<f32> = data.observations.iter().map(|o| reference_day(o.date)).collect();
        let plot = ScatterPlot::new(data).build().unwrap();
        let window = LegendAxis::new(plot.legend().width).window(x);
        let expected: Vec<usize> = days
            .iter()
            .enumerate()
            .filter(|&(_, &d)| {
                if window.start < 0.0 {
                    d >= window.start + 366.0 || d <= window.end
                } else if window.end >= 366.0 {
                    d >= window.start || d <= window.end - 366.0
                } else {
                    window.start <= d && d <= window.end
                }
            })
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(plot.in_window(x), expected);
    }

    /// Marginal histogram counts sum to the active subset size.
    #[test]
    fn prop_histograms_sum_to_subset(
        offsets in prop::collection::vec(0i64..730, 1..60),
        x in 0.0f32..250.0
    ) {
        let plot = ScatterPlot::new(observations_from(&offsets)).build().unwrap();
        let all: Vec<usize> = (0..offsets.len()).collect();
        for subset in [all, plot.in_window(x)] {
            let (top, right) = plot.histograms(&subset);
            prop_assert_eq!(top.iter().map(|b| b.count).sum::<usize>(), subset.len());
            prop_assert_eq!(right.iter().map(|b| b.count).sum::<usize>(), subset.len());
        }
    }
}

#[test]
fn test_two_category_scenario() {
    let table = CategoryTable::from_csv_str("group,s1,s2\nA,10,20\nB,5,5\n").unwrap();
    let totals: Vec<f64> = table.rows.iter().map(|r| r.total).collect();
    assert_eq!(totals, vec![30.0, 10.0]);

    let sorted: Vec<&str> =
        display_order(&table.rows, DisplayMode::Sorted).iter().map(|r| r.label.as_str()).collect();
    assert_eq!(sorted, vec!["A", "B"]);

    let rows: Vec<&[f64]> = table.rows.iter().map(|r| r.values.as_slice()).collect();
    let series = stack(&rows, &table.keys);
    assert_eq!(series[0].segments[0], [0.0, 10.0]);
    assert_eq!(series[1].segments[0], [10.0, 30.0]);
}

#[test]
fn test_legend_window_fixed_dates() {
    let dates = [
        (2018, 12, 12),
        (2018, 12, 13),
        (2018, 12, 14),
        (2018, 12, 25),
        (2018, 12, 31),
        (2018, 1, 1),
        (2018, 1, 5),
        (2018, 1, 18),
        (2018, 1, 19),
        (2018, 1, 20),
        (2018, 6, 13),
        (2018, 6, 14),
        (2018, 7, 19),
        (2018, 7, 20),
    ];
    let observations = dates
        .iter()
        .map(|&(y, m, d)| Observation {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            temperature_min: 30.0,
            temperature_max: 50.0 + f64::from(d),
        })
        .collect();
    let plot = ScatterPlot::new(WeatherData::new(observations)).build().unwrap();

    // Centered on Dec 31: Dec 13 through Jan 18.
    assert_eq!(plot.in_window(250.0), vec![1, 2, 3, 4, 5, 6, 7]);
    // Centered on Jan 1: Dec 14 through Jan 19.
    assert_eq!(plot.in_window(0.0), vec![2, 3, 4, 5, 6, 7, 8]);
    // Mid-year, no wrap: Jun 14 through Jul 19.
    assert_eq!(plot.in_window(125.0), vec![11, 12]);
}
