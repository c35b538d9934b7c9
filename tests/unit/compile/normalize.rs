use super::*;
use crate::widget::model::ChartFamily;
use serde_json::json;

fn dataset() -> Value {
    json!({ "source": [["time", "a", "b"], [0, 1, 2], [60000, 3, 4]] })
}

#[test]
fn engine_flavored_option_is_accepted() {
    let option = json!({
        "grid": { "left": "3%", "right": "4%", "bottom": "10px", "top": 20, "containLabel": true },
        "xAxis": [{ "type": "time", "boundaryGap": false }],
        "yAxis": [{ "type": "value", "min": "dataMin", "max": 50 }],
        "series": [
            { "type": "scatter", "symbolSize": 4 },
            { "type": "line", "name": "b", "smooth": true, "itemStyle": { "color": "#123456" } }
        ],
        "dataset": dataset(),
        "visualMap": { "min": 0 }
    });

    let cfg = config_from_option(&option, 800, 400).unwrap();
    assert_eq!(cfg.grid.left, 24.0);
    assert_eq!(cfg.grid.right, 32.0);
    assert_eq!(cfg.grid.bottom, 10.0);
    assert_eq!(cfg.grid.top, 20.0);
    assert_eq!(cfg.y_axis.min, 0.0);
    assert_eq!(cfg.y_axis.max, Some(50.0));

    assert_eq!(cfg.series.len(), 1);
    assert_eq!(cfg.series[0].family, ChartFamily::Line);
    assert_eq!(cfg.series[0].name.as_deref(), Some("b"));
    // Positional encode keeps the series' own column.
    assert_eq!(cfg.series[0].encode, Encode { x: 0, y: 2 });
    assert_eq!(
        cfg.series[0].item_style.color.as_ref().map(ColorToken::as_str),
        Some("#123456")
    );
    assert!(cfg.dataset.is_some());
    assert!(!cfg.animation);
}

#[test]
fn lengths_resolve_against_extent() {
    assert_eq!(length(&json!(12), 500.0), Some(12.0));
    assert_eq!(length(&json!("12"), 500.0), Some(12.0));
    assert_eq!(length(&json!(" 12px "), 500.0), Some(12.0));
    assert_eq!(length(&json!("10%"), 500.0), Some(50.0));
    assert_eq!(length(&json!("auto"), 500.0), None);
    assert_eq!(length(&json!(null), 500.0), None);
}

#[test]
fn unsupported_grid_lengths_fall_back_per_side() {
    let option = json!({ "grid": { "left": "auto", "top": 40 } });
    let cfg = config_from_option(&option, 600, 400).unwrap();
    assert_eq!(cfg.grid.left, Grid::default().left);
    assert_eq!(cfg.grid.top, 40.0);
}

#[test]
fn malformed_blocks_use_defaults() {
    let option = json!({
        "legend": { "show": "yes" },
        "title": { "text": 42 },
        "tooltip": [],
        "series": [
            { "type": "bar", "showSymbol": "no", "stack": 3, "encode": { "y": ["a"] } }
        ]
    });
    let cfg = config_from_option(&option, 600, 400).unwrap();
    assert_eq!(cfg.legend, Legend::default());
    assert_eq!(cfg.title, None);
    assert_eq!(cfg.tooltip, Tooltip::default());

    assert_eq!(cfg.series.len(), 1);
    assert_eq!(cfg.series[0].stack, None);
    assert!(!cfg.series[0].show_symbol);
    assert_eq!(cfg.series[0].encode, Encode { x: 0, y: 1 });
}

#[test]
fn blank_colors_are_left_to_the_palette() {
    let option = json!({
        "backgroundColor": " ",
        "series": [{ "type": "line", "itemStyle": { "color": "" } }]
    });
    let cfg = config_from_option(&option, 600, 400).unwrap();
    assert_eq!(cfg.background_color, None);
    assert_eq!(cfg.series[0].item_style.color, None);
}

#[test]
fn typed_fields_round_trip() {
    let option = json!({
        "title": { "text": "Errors", "subtext": "<9/min" },
        "legend": { "show": false, "side": "top" },
        "xAxis": { "min": 0, "max": 60000, "name": "t" },
        "series": { "type": "bar", "name": "a", "stack": "units", "encode": { "x": 0, "y": 1 } },
        "dataset": [dataset()]
    });
    let cfg = config_from_option(&option, 600, 400).unwrap();
    assert_eq!(cfg.title.as_ref().map(|t| t.text.as_str()), Some("Errors"));
    assert!(!cfg.legend.show);
    assert_eq!(cfg.x_axis.max, Some(60000.0));
    assert_eq!(cfg.series[0].stack.as_deref(), Some("units"));
    assert_eq!(cfg.dataset.as_ref().map(|d| d.rows().len()), Some(2));
}

#[test]
fn non_object_option_is_invalid_input() {
    for option in [json!(null), json!([1, 2]), json!("chart")] {
        let err = config_from_option(&option, 600, 400).unwrap_err();
        assert!(matches!(err, PlotshotError::InvalidInput(_)));
    }
}
