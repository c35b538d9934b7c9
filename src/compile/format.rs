/// Format a value-axis number with magnitude suffixes.
///
/// - `|v| >= 1e9` -> one decimal + `B` (`1.5B`), likewise `M` and `K`.
/// - Below 1000, integers print as-is; other values round to 0 decimals when `>= 100`, 1 when
///   `>= 10`, else 2, with trailing zeros dropped.
///
/// Every branch rounds half away from zero (`1250` -> `1.3K`).
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }

    let mag = v.abs();
    if mag >= 1e9 {
        return format!("{:.1}B", tenths(v, 1e8));
    }
    if mag >= 1e6 {
        return format!("{:.1}M", tenths(v, 1e5));
    }
    if mag >= 1e3 {
        return format!("{:.1}K", tenths(v, 1e2));
    }

    if v.fract() == 0.0 {
        return format!("{v}");
    }

    let scale = if mag >= 100.0 {
        1.0
    } else if mag >= 10.0 {
        10.0
    } else {
        100.0
    };
    let rounded = (v * scale).round() / scale;
    if rounded == 0.0 {
        // Avoid "-0" for tiny negatives.
        return "0".to_string();
    }
    // `Display` for f64 prints the shortest round-trip form, so trailing zeros never appear.
    format!("{rounded}")
}

// `{:.1}` alone breaks ties to even, so settle the tenth digit first.
fn tenths(v: f64, unit_tenth: f64) -> f64 {
    (v / unit_tenth).round() / 10.0
}

/// Evenly spaced "nice" tick values from `0` up to at least `max`.
///
/// Steps are 1, 2 or 5 times a power of ten, aiming for about `target` intervals. Returns an
/// empty list when `max` is not a positive finite number.
pub fn nice_ticks(max: f64, target: usize) -> Vec<f64> {
    if !max.is_finite() || max <= 0.0 || target == 0 {
        return Vec::new();
    }

    let raw = max / target as f64;
    let exp = raw.log10().floor() as i32;
    let mult = [1.0, 2.0, 5.0]
        .into_iter()
        .find(|m| scaled(*m, exp) >= raw)
        .unwrap_or(10.0);
    let step = scaled(mult, exp);
    if !step.is_finite() || step <= 0.0 {
        return Vec::new();
    }

    let n = (max / step).ceil() as usize;
    (0..=n)
        .map(|i| scaled(i as f64 * mult, exp))
        .take_while(|v| v.is_finite())
        .collect()
}

// `units * 10^exp`, dividing for negative exponents so decimal steps land on the nearest f64
// (3 * 0.1 drifts to 0.30000000000000004, 3 / 10 does not).
fn scaled(units: f64, exp: i32) -> f64 {
    if exp >= 0 {
        units * 10f64.powi(exp)
    } else {
        units / 10f64.powi(-exp)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/format.rs"]
mod tests;
