//! Deterministic series colors from semantic label hints.
//!
//! Labels are matched, in order, against blank/null-ish values, HTTP status codes, percentile
//! names and log levels before falling back to a hash-selected palette slot. All tables are
//! static and ordered; the log-level table order decides which color wins when a label contains
//! several levels.

use crate::color::theme::Palette;
use crate::color::token::ColorToken;

/// Color used for `null`, `undefined` and `unknown` labels.
pub const NEUTRAL_GRAY: &str = "#9ca3af";

/// Color for status-shaped labels outside every known range.
pub const STATUS_FALLBACK: &str = "#9d96f5";

/// Built-in 20-color palette used when no theme palette applies.
pub const DEFAULT_PALETTE: [&str; 20] = [
    "#1A74A8", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4",
    "#c71585", "#37a2da", "#32c5e9", "#20b2aa", "#228b22", "#ff8c00", "#ff6347", "#dc143c",
    "#8b008b", "#4b0082", "#6a5acd", "#4169e1",
];

const STATUS_CLASS_COLORS: [(&str, &str); 4] = [
    ("2xx", "#1A74A8"),
    ("3xx", "#73c0de"),
    ("4xx", "#fac858"),
    ("5xx", "#ee6666"),
];

const STATUS_CODE_COLORS: [(u16, &str); 21] = [
    (200, "#1A74A8"),
    (201, "#37a2da"),
    (202, "#32c5e9"),
    (204, "#73c0de"),
    (206, "#67e0e3"),
    (301, "#73c0de"),
    (302, "#67e0e3"),
    (304, "#9fe6b8"),
    (307, "#3ba272"),
    (308, "#91cc75"),
    (400, "#fac858"),
    (401, "#ffdb5c"),
    (403, "#ff9f7f"),
    (404, "#fc8452"),
    (405, "#fb7293"),
    (429, "#e062ae"),
    (500, "#ee6666"),
    (502, "#fb7293"),
    (503, "#e062ae"),
    (504, "#e690d1"),
    (507, "#e7bcf3"),
];

/// Fallback per hundred-range, indexed by `code / 100 - 2`.
const STATUS_RANGE_COLORS: [&str; 4] = ["#67e0e3", "#3ba272", "#fb7293", "#e7bcf3"];

const PERCENTILE_COLORS: [(&str, &str); 11] = [
    ("p50", "#91cc75"),
    ("median", "#91cc75"),
    ("p75", "#3ba272"),
    ("q1", "#3ba272"),
    ("p90", "#fac858"),
    ("p95", "#fc8452"),
    ("q3", "#fc8452"),
    ("p99", "#dc2626"),
    ("p100", "#991b1b"),
    ("max", "#991b1b"),
    ("min", "#91cc75"),
];

// Order matters: the substring scan returns the first hit.
const LOG_LEVEL_COLORS: [(&str, &str); 12] = [
    ("error", "#ee6666"),
    ("fail", "#ee6666"),
    ("failed", "#ee6666"),
    ("exception", "#e062ae"),
    ("critical", "#e062ae"),
    ("warning", "#fac858"),
    ("warn", "#fac858"),
    ("success", "#91cc75"),
    ("ok", "#91cc75"),
    ("info", "#73c0de"),
    ("debug", "#9a60b4"),
    ("trace", "#e7bcf3"),
];

/// Resolve a series label against the built-in default palette.
pub fn resolve(label: &str) -> ColorToken {
    resolve_in(label, &DEFAULT_PALETTE)
}

/// Resolve a series label, taking palette-based colors from `palette`.
pub fn resolve_with(label: &str, palette: &Palette) -> ColorToken {
    let colors: Vec<&str> = palette.colors().iter().map(ColorToken::as_str).collect();
    resolve_in(label, &colors)
}

fn resolve_in(label: &str, palette: &[&str]) -> ColorToken {
    if label.trim().is_empty() {
        return ColorToken::from(palette_at(palette, 0));
    }

    let lower = label.to_lowercase();
    if matches!(lower.as_str(), "null" | "undefined" | "unknown") {
        return ColorToken::from(NEUTRAL_GRAY);
    }

    if is_status_code(label) || is_status_class(label) {
        return ColorToken::from(status_color(label));
    }

    if is_percentile_shaped(&lower) {
        let key = lower.trim();
        return match lookup(&PERCENTILE_COLORS, key) {
            Some(c) => ColorToken::from(c),
            None => ColorToken::from(hashed(label, palette)),
        };
    }

    if LOG_LEVEL_COLORS.iter().any(|(p, _)| lower.contains(*p)) {
        return match log_level_color(label) {
            Some(c) => ColorToken::from(c),
            None => ColorToken::from(hashed(label, palette)),
        };
    }

    ColorToken::from(hashed(label, palette))
}

/// Color for a status label: a class token (`"4xx"`) or a numeric code (`"404"`).
///
/// Numeric codes missing from the exact table fall back to their hundred-range color; codes
/// outside 200..=599 (or unparseable text) get [`STATUS_FALLBACK`].
pub fn status_color(code: &str) -> &'static str {
    let lower = code.to_ascii_lowercase();
    if let Some(c) = lookup(&STATUS_CLASS_COLORS, lower.as_str()) {
        return c;
    }
    match code.trim().parse::<u16>() {
        Ok(n) => status_code_color(n),
        Err(_) => STATUS_FALLBACK,
    }
}

/// Color for a numeric HTTP status code.
pub fn status_code_color(code: u16) -> &'static str {
    if let Some((_, c)) = STATUS_CODE_COLORS.iter().find(|(k, _)| *k == code) {
        return *c;
    }
    match code {
        200..=599 => STATUS_RANGE_COLORS[usize::from(code / 100 - 2)],
        _ => STATUS_FALLBACK,
    }
}

fn log_level_color(text: &str) -> Option<&'static str> {
    let normalized = text.trim().to_lowercase();
    if let Some(c) = lookup(&LOG_LEVEL_COLORS, normalized.as_str()) {
        return Some(c);
    }
    LOG_LEVEL_COLORS
        .iter()
        .find(|(pattern, _)| normalized.contains(*pattern))
        .map(|(_, c)| *c)
}

/// 32-bit rolling string hash (`h = h * 31 + unit`) over UTF-16 code units.
///
/// Arithmetic wraps at 32 bits; the absolute value is taken on the signed result, so
/// `i32::MIN` maps to `2^31`.
pub fn label_hash(label: &str) -> u32 {
    let mut h: i32 = 0;
    for unit in label.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }
    h.unsigned_abs()
}

fn hashed<'a>(label: &str, palette: &[&'a str]) -> &'a str {
    if palette.is_empty() {
        return DEFAULT_PALETTE[label_hash(label) as usize % DEFAULT_PALETTE.len()];
    }
    palette[label_hash(label) as usize % palette.len()]
}

fn palette_at<'a>(palette: &[&'a str], i: usize) -> &'a str {
    palette.get(i).copied().unwrap_or(DEFAULT_PALETTE[i])
}

fn lookup<K: PartialEq + ?Sized>(table: &[(&K, &'static str)], key: &K) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, c)| *c)
}

/// `[2-5]\d\d`, exact.
fn is_status_code(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 3 && (b'2'..=b'5').contains(&b[0]) && b[1].is_ascii_digit() && b[2].is_ascii_digit()
}

/// `[2-5]xx`, case-insensitive, exact.
fn is_status_class(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 3
        && (b'2'..=b'5').contains(&b[0])
        && b[1].eq_ignore_ascii_case(&b'x')
        && b[2].eq_ignore_ascii_case(&b'x')
}

/// Prefix `p<digits>` / `q<digits>`, or `median`/`max`/`min` anywhere. Expects lowercase input.
fn is_percentile_shaped(lower: &str) -> bool {
    let b = lower.as_bytes();
    let quantile_prefix = b.len() >= 2 && matches!(b[0], b'p' | b'q') && b[1].is_ascii_digit();
    quantile_prefix || lower.contains("median") || lower.contains("max") || lower.contains("min")
}

#[cfg(test)]
#[path = "../../tests/unit/color/resolver.rs"]
mod tests;
