use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::color::token::ColorToken;
use crate::compile::config::{
    DatasetSource, Encode, Grid, Legend, RenderConfig, Series, TimeAxis, Title, Tooltip,
    ValueAxis,
};
use crate::foundation::error::{PlotshotError, PlotshotResult};

/// Reduce a ready-made chart option to the [`RenderConfig`] a gateway draws.
///
/// The option may use any of the chart engine's vocabulary. Parts the gateway understands are
/// read leniently:
///
/// - `grid` sides accept numbers, `"N"`, `"Npx"` and `"N%"` (of `width` for left/right, of
///   `height` for top/bottom).
/// - `xAxis`/`yAxis`/`grid`/`title`/`dataset` given as arrays use their first element.
/// - Non-numeric axis bounds (`"dataMin"`, functions) mean autoscale.
/// - Series of a type other than `bar`/`line` are skipped; a missing `encode` maps series `i`
///   to column `i + 1`.
///
/// Any block that still does not fit falls back to its default. Only a non-object option is an
/// error.
pub fn config_from_option(
    option: &Value,
    width: u32,
    height: u32,
) -> PlotshotResult<RenderConfig> {
    let Value::Object(root) = option else {
        return Err(PlotshotError::invalid_input("'option' must be a JSON object"));
    };

    let grid = first(root.get("grid")).map(|g| sized_grid(g, width, height));
    let x_axis = first(root.get("xAxis")).map(numeric_bounds);
    let y_axis = first(root.get("yAxis")).map(numeric_bounds);

    Ok(RenderConfig {
        animation: false,
        background_color: root
            .get("backgroundColor")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            .map(ColorToken::from),
        title: first(root.get("title")).and_then(|t| block::<Title>("title", &t)),
        legend: first(root.get("legend"))
            .and_then(|l| block::<Legend>("legend", &l))
            .unwrap_or_default(),
        tooltip: first(root.get("tooltip"))
            .and_then(|t| block::<Tooltip>("tooltip", &t))
            .unwrap_or_default(),
        grid: grid
            .and_then(|g| block::<Grid>("grid", &g))
            .unwrap_or_default(),
        x_axis: x_axis
            .and_then(|a| block::<TimeAxis>("xAxis", &a))
            .unwrap_or_default(),
        y_axis: y_axis
            .and_then(|a| block::<ValueAxis>("yAxis", &a))
            .unwrap_or_default(),
        series: drawable_series(root.get("series")),
        dataset: first(root.get("dataset"))
            .and_then(|d| block::<DatasetSource>("dataset", &d)),
    })
}

// Arrays stand for "one per grid/axis"; the gateway draws a single one.
fn first(v: Option<&Value>) -> Option<Value> {
    match v? {
        Value::Null => None,
        Value::Array(items) => items.first().cloned(),
        other => Some(other.clone()),
    }
}

fn block<T: DeserializeOwned>(key: &str, v: &Value) -> Option<T> {
    match serde_json::from_value(v.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!(key, error = %e, "option block not understood, using defaults");
            None
        }
    }
}

fn sized_grid(grid: Value, width: u32, height: u32) -> Value {
    let Value::Object(mut grid) = grid else {
        return grid;
    };
    for (side, extent) in [
        ("left", width),
        ("right", width),
        ("top", height),
        ("bottom", height),
    ] {
        let Some(raw) = grid.get(side) else {
            continue;
        };
        match length(raw, f64::from(extent)) {
            Some(px) => {
                grid.insert(side.to_string(), Value::from(px));
            }
            None => {
                tracing::debug!(side, value = %raw, "unsupported grid length, using default");
                grid.remove(side);
            }
        }
    }
    Value::Object(grid)
}

/// Resolve a CSS-like length (`12`, `"12"`, `"12px"`, `"3%"`) against `extent` pixels.
fn length(v: &Value, extent: f64) -> Option<f64> {
    let px = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if let Some(pct) = s.strip_suffix('%') {
                extent * pct.trim().parse::<f64>().ok()? / 100.0
            } else {
                s.strip_suffix("px").unwrap_or(s).trim().parse().ok()?
            }
        }
        _ => return None,
    };
    px.is_finite().then_some(px)
}

fn numeric_bounds(axis: Value) -> Value {
    let Value::Object(mut axis) = axis else {
        return axis;
    };
    for bound in ["min", "max"] {
        if axis.get(bound).is_some_and(|b| !b.is_number()) {
            axis.remove(bound);
        }
    }
    Value::Object(axis)
}

fn drawable_series(series: Option<&Value>) -> Vec<Series> {
    let items: Vec<&Value> = match series {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) if single.is_object() => vec![single],
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let Value::Object(s) = s else {
                return None;
            };
            let kind = s.get("type").and_then(Value::as_str).unwrap_or("bar");
            if kind != "bar" && kind != "line" {
                tracing::debug!(series = i, kind, "series type not drawable, skipping");
                return None;
            }
            let fields = drawable_fields(s);
            let positional = !fields.contains_key("encode");
            let mut parsed: Series = block("series", &Value::Object(fields))?;
            if positional {
                parsed.encode = Encode { x: 0, y: i + 1 };
            }
            Some(parsed)
        })
        .collect()
}

// Keep the fields a `Series` reads, in the shapes it expects; anything else is dropped.
fn drawable_fields(s: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    if let Some(kind) = s.get("type") {
        out.insert("type".to_string(), kind.clone());
    }
    match s.get("name") {
        Some(Value::String(name)) => {
            out.insert("name".to_string(), Value::String(name.clone()));
        }
        Some(Value::Null) | None => {}
        Some(other) => {
            out.insert("name".to_string(), Value::String(other.to_string()));
        }
    }
    if let Some(stack) = s.get("stack").filter(|v| v.is_string()) {
        out.insert("stack".to_string(), stack.clone());
    }
    if let Some(show) = s.get("showSymbol").filter(|v| v.is_boolean()) {
        out.insert("showSymbol".to_string(), show.clone());
    }
    if let Some(encode) = s.get("encode") {
        if serde_json::from_value::<Encode>(encode.clone()).is_ok() {
            out.insert("encode".to_string(), encode.clone());
        } else {
            tracing::debug!(encode = %encode, "unsupported encode, using positional columns");
        }
    }
    if let Some(Value::String(color)) = s.get("itemStyle").and_then(|st| st.get("color"))
        && !color.trim().is_empty()
    {
        let mut style = Map::new();
        style.insert("color".to_string(), Value::String(color.clone()));
        out.insert("itemStyle".to_string(), Value::Object(style));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/compile/normalize.rs"]
mod tests;
