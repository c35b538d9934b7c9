use super::*;
use serde_json::json;

#[test]
fn kinds_map_to_families() {
    assert_eq!(WidgetKind::Timeseries.chart_family(), ChartFamily::Bar);
    assert_eq!(WidgetKind::Distribution.chart_family(), ChartFamily::Bar);
    assert_eq!(WidgetKind::TimeseriesLine.chart_family(), ChartFamily::Line);
    assert_eq!(WidgetKind::TimeseriesStat.chart_family(), ChartFamily::Line);
    assert_eq!(WidgetKind::PieChart.chart_family(), ChartFamily::Bar);
    assert_eq!(WidgetKind::Unknown.chart_family(), ChartFamily::Bar);
    assert!(WidgetKind::TimeseriesStat.is_stat());
    assert!(!WidgetKind::Stat.is_stat());
}

#[test]
fn unknown_kind_strings_deserialize() {
    let w: Widget = serde_json::from_value(json!({ "type": "sankey" })).unwrap();
    assert_eq!(w.kind, WidgetKind::Unknown);

    let w: Widget = serde_json::from_value(json!({ "type": "top_list" })).unwrap();
    assert_eq!(w.kind, WidgetKind::TopList);
}

#[test]
fn summarize_prefixes() {
    assert_eq!(SummarizeBy::Max.prefix(), "<");
    assert_eq!(SummarizeBy::Min.prefix(), ">");
    assert_eq!(SummarizeBy::Sum.prefix(), "");
    assert_eq!(SummarizeBy::Count.prefix(), "");
}

#[test]
fn widget_fields_use_camel_case() {
    let w: Widget = serde_json::from_value(json!({
        "type": "timeseries_line",
        "id": "w1",
        "hideLegend": true,
        "legendPosition": "top",
        "showGridLines": false,
        "yAxis": { "label": "ms", "showOnlyMaxLabel": true },
        "summarizeBy": "count",
        "dataset": {
            "source": [["time", "a"]],
            "rowsPerMin": 2.0,
            "stats": { "max": 3, "max_group_sum": 4 }
        }
    }))
    .unwrap();

    assert!(w.hide_legend);
    assert_eq!(w.legend_position, LegendPosition::Top);
    assert_eq!(w.show_grid_lines, Some(false));
    assert_eq!(w.show_tooltip, None);
    let y = w.y_axis.as_ref().unwrap();
    assert_eq!(y.label.as_deref(), Some("ms"));
    assert!(y.show_only_max_label);
    assert_eq!(w.summarize_by, SummarizeBy::Count);

    let ds = w.dataset.as_ref().unwrap();
    assert_eq!(ds.rows_per_min, Some(2.0));
    assert_eq!(ds.stats.map(|s| s.max_group_sum), Some(4.0));
}

#[test]
fn empty_object_is_a_default_widget() {
    let w: Widget = serde_json::from_value(json!({})).unwrap();
    assert_eq!(w, Widget::default());
    assert_eq!(w.legend_position, LegendPosition::Bottom);
}
