use serde_json::Value;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::color::resolver::resolve_with;
use crate::color::theme::Theme;
use crate::compile::config::{
    AxisTick, DatasetSource, Encode, Grid, ItemStyle, Legend, LegendSide, RenderConfig, Series,
    TimeAxis, Title, Tooltip, ValueAxis,
};
use crate::compile::format::{format_number, nice_ticks};
use crate::foundation::error::{PlotshotError, PlotshotResult};
use crate::widget::model::{ChartFamily, Dataset, LegendPosition, Widget};

/// Stack key used when neither the value-axis label nor the unit names the stack.
pub const DEFAULT_STACK: &str = "units";

const TICK_TARGET: usize = 5;
const XXH3_SEED: u64 = 0x5eed_c0f1_9a7e_b00c;

/// Compile a widget and its dataset into a render configuration.
///
/// Pure: the same inputs always produce an identical config. Fails only when the dataset has
/// no header row or fewer than two header columns.
#[tracing::instrument(skip_all, fields(kind = ?widget.kind, theme = %theme.name))]
pub fn compile(widget: &Widget, dataset: &Dataset, theme: &Theme) -> PlotshotResult<RenderConfig> {
    let source = embed_source(&dataset.source)?;
    let header = source.header().unwrap_or(&[]);
    let family = widget.kind.chart_family();
    let chrome = Chrome::for_widget(widget);

    let stack_key = widget
        .y_axis
        .as_ref()
        .and_then(|a| a.label.clone())
        .or_else(|| widget.unit.clone())
        .unwrap_or_else(|| DEFAULT_STACK.to_string());

    let series = header
        .iter()
        .enumerate()
        .skip(1)
        .map(|(col, cell)| {
            let name = header_name(cell);
            Series {
                family,
                stack: match family {
                    ChartFamily::Bar => Some(stack_key.clone()),
                    ChartFamily::Line => None,
                },
                encode: Encode { x: 0, y: col },
                item_style: ItemStyle {
                    color: Some(resolve_with(&name, &theme.palette)),
                },
                show_symbol: false,
                name: Some(name),
            }
        })
        .collect::<Vec<_>>();

    let value_max = dataset.stats.map(|s| match family {
        ChartFamily::Line => s.max,
        ChartFamily::Bar => s.max_group_sum,
    });
    let only_max_label = widget
        .y_axis
        .as_ref()
        .is_some_and(|a| a.show_only_max_label);

    let config = RenderConfig {
        animation: false,
        background_color: None,
        title: title_for(widget, dataset),
        legend: Legend {
            show: chrome.legend,
            side: match widget.legend_position {
                LegendPosition::Top => LegendSide::Top,
                LegendPosition::Bottom => LegendSide::Bottom,
            },
        },
        tooltip: Tooltip {
            show: chrome.tooltip,
            ..Tooltip::default()
        },
        grid: grid_for(widget, chrome.legend),
        x_axis: TimeAxis {
            min: dataset.from.map(secs_to_ms),
            max: dataset.to.map(secs_to_ms),
            name: widget.x_axis.as_ref().and_then(|a| a.label.clone()),
            show_labels: chrome.x_labels,
        },
        y_axis: ValueAxis {
            min: 0.0,
            max: value_max,
            name: widget.y_axis.as_ref().and_then(|a| a.label.clone()),
            show_labels: chrome.y_labels,
            show_split_lines: chrome.grid_lines,
            ticks: value_ticks(value_max, only_max_label),
        },
        series,
        dataset: Some(source),
    };

    tracing::debug!(
        series = config.series.len(),
        fingerprint = config_fingerprint(&config),
        "compiled widget"
    );
    Ok(config)
}

/// Stable 64-bit fingerprint of a config's serialized form.
pub fn config_fingerprint(config: &RenderConfig) -> u64 {
    // Serializing plain data structs into a Vec cannot fail.
    let bytes = serde_json::to_vec(config).unwrap_or_default();
    xxh3_64_with_seed(&bytes, XXH3_SEED)
}

/// Resolved visibility of chart chrome.
#[derive(Clone, Copy, Debug)]
struct Chrome {
    legend: bool,
    tooltip: bool,
    x_labels: bool,
    y_labels: bool,
    grid_lines: bool,
}

impl Chrome {
    fn for_widget(w: &Widget) -> Self {
        if w.kind.is_stat() {
            return Self {
                legend: false,
                tooltip: false,
                x_labels: false,
                y_labels: false,
                grid_lines: false,
            };
        }
        let axis_labels = |a: &Option<crate::widget::model::WidgetAxis>| {
            a.as_ref().and_then(|a| a.show_axis_label).unwrap_or(true)
        };
        Self {
            legend: !w.hide_legend && !w.naked,
            tooltip: w.show_tooltip.unwrap_or(true),
            x_labels: axis_labels(&w.x_axis),
            y_labels: axis_labels(&w.y_axis),
            grid_lines: w.show_grid_lines.unwrap_or(true),
        }
    }
}

fn grid_for(w: &Widget, legend: bool) -> Grid {
    let (top, bottom) = if w.naked {
        (5.0, 5.0)
    } else if !legend {
        (10.0, 10.0)
    } else {
        match w.legend_position {
            LegendPosition::Top => (30.0, 10.0),
            LegendPosition::Bottom => (10.0, 30.0),
        }
    };
    Grid {
        top,
        bottom,
        ..Grid::default()
    }
}

fn title_for(w: &Widget, dataset: &Dataset) -> Option<Title> {
    let text = w.title.clone()?;
    let subtext = if w.hide_subtitle {
        None
    } else if let (true, Some(v)) = (w.kind.is_stat(), w.value.or(dataset.value)) {
        Some(format!(
            "{}{}{}",
            w.summarize_by.prefix(),
            format_number(v),
            w.unit.as_deref().unwrap_or("")
        ))
    } else {
        w.subtitle.clone()
    };
    Some(Title { text, subtext })
}

fn value_ticks(max: Option<f64>, only_max_label: bool) -> Vec<AxisTick> {
    let Some(max) = max else {
        return Vec::new();
    };
    let values = nice_ticks(max, TICK_TARGET);
    let last = values.len().saturating_sub(1);
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| AxisTick {
            value,
            label: (!only_max_label || i == last).then(|| format_number(value)),
        })
        .collect()
}

fn header_name(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn secs_to_ms(secs: f64) -> f64 {
    secs * 1000.0
}

/// Validate the raw source matrix and rescale each row's leading timestamp to milliseconds.
fn embed_source(raw: &Value) -> PlotshotResult<DatasetSource> {
    let Some(rows) = raw.as_array() else {
        return Err(PlotshotError::invalid_dataset(
            "dataset source must be an array of rows",
        ));
    };
    let Some(header) = rows.first().and_then(Value::as_array) else {
        return Err(PlotshotError::invalid_dataset("dataset is missing its header row"));
    };
    if header.len() < 2 {
        return Err(PlotshotError::invalid_dataset(format!(
            "dataset header needs a time column and at least one series, got {} column(s)",
            header.len()
        )));
    }

    let mut source = Vec::with_capacity(rows.len());
    source.push(header.clone());
    for (i, row) in rows.iter().enumerate().skip(1) {
        let Some(cells) = row.as_array() else {
            return Err(PlotshotError::invalid_dataset(format!(
                "dataset row {i} is not an array"
            )));
        };
        let mut out = cells.clone();
        if let Some(first) = out.first_mut() {
            *first = rescale_timestamp(first);
        }
        source.push(out);
    }
    Ok(DatasetSource { source })
}

fn rescale_timestamp(cell: &Value) -> Value {
    let Value::Number(n) = cell else {
        return cell.clone();
    };
    if let Some(ms) = n.as_i64().and_then(|s| s.checked_mul(1000)) {
        return Value::from(ms);
    }
    match n.as_f64() {
        Some(secs) => serde_json::Number::from_f64(secs_to_ms(secs))
            .map(Value::Number)
            .unwrap_or_else(|| cell.clone()),
        None => cell.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/options.rs"]
mod tests;
