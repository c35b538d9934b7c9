use serde_json::{Map, Value};

use crate::color::resolver::resolve_with;
use crate::color::theme::Palette;

/// Fill in missing series colors on a ready-made chart option.
///
/// The option is arbitrary chart-engine JSON; only `series[*].name` and
/// `series[*].itemStyle.color` are ever written, everything else passes through untouched.
///
/// With a usable dataset (`dataset.source` whose header has at least two columns) and no
/// series, one bar series per value column is created. Otherwise each series without a color
/// gets one resolved from its name, the header cell at its position, or `Series N`; that name
/// is written back. A color counts as missing when it is absent, `null`, or a blank string.
/// Options without a usable dataset pass through.
pub fn apply_series_colors(mut option: Value, palette: &Palette) -> Value {
    let Some(names) = header_names(&option) else {
        return option;
    };
    let Some(root) = option.as_object_mut() else {
        return option;
    };

    // A lone series object is shorthand for a one-element list.
    if let Some(single) = root.get_mut("series")
        && single.is_object()
    {
        let s = single.take();
        *single = Value::Array(vec![s]);
    }

    let has_series = matches!(root.get("series"), Some(Value::Array(s)) if !s.is_empty());
    if !has_series {
        let created = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let name = name.unwrap_or_default();
                let mut style = Map::new();
                style.insert(
                    "color".to_string(),
                    Value::String(resolve_with(&name, palette).to_string()),
                );
                let mut encode = Map::new();
                encode.insert("x".to_string(), Value::from(0));
                encode.insert("y".to_string(), Value::from(i + 1));

                let mut series = Map::new();
                series.insert("type".to_string(), Value::String("bar".to_string()));
                series.insert("name".to_string(), Value::String(name));
                series.insert("encode".to_string(), Value::Object(encode));
                series.insert("itemStyle".to_string(), Value::Object(style));
                Value::Object(series)
            })
            .collect();
        root.insert("series".to_string(), Value::Array(created));
        return option;
    }

    if let Some(Value::Array(series)) = root.get_mut("series") {
        for (i, s) in series.iter_mut().enumerate() {
            let Value::Object(s) = s else {
                continue;
            };
            if has_color(s) {
                continue;
            }
            let name = s
                .get("name")
                .and_then(label)
                .filter(|n| !n.is_empty())
                .or_else(|| names.get(i).cloned().flatten().filter(|n| !n.is_empty()))
                .unwrap_or_else(|| format!("Series {}", i + 1));
            let color = Value::String(resolve_with(&name, palette).to_string());
            s.insert("name".to_string(), Value::String(name));

            match s.get_mut("itemStyle") {
                Some(Value::Object(style)) => {
                    style.insert("color".to_string(), color);
                }
                _ => {
                    let mut style = Map::new();
                    style.insert("color".to_string(), color);
                    s.insert("itemStyle".to_string(), Value::Object(style));
                }
            }
        }
    }
    option
}

// Series names from header[1..], or `None` when the option has no usable dataset.
fn header_names(option: &Value) -> Option<Vec<Option<String>>> {
    let header = option
        .get("dataset")?
        .get("source")?
        .as_array()?
        .first()?
        .as_array()?;
    if header.len() < 2 {
        return None;
    }
    Some(header[1..].iter().map(label).collect())
}

fn label(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// Gradients and other structured colors count as explicit.
fn has_color(series: &Map<String, Value>) -> bool {
    match series.get("itemStyle").and_then(|style| style.get("color")) {
        None | Some(Value::Null) => false,
        Some(Value::String(c)) => !c.trim().is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/series.rs"]
mod tests;
