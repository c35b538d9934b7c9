use serde::Deserialize;
use serde_json::Value;

use crate::foundation::error::{PlotshotError, PlotshotResult};
use crate::widget::model::Widget;

/// Default request body ceiling (2 MiB).
pub const MAX_PAYLOAD_BYTES: usize = 2 * 1024 * 1024;
/// Width used when a request names none.
pub const DEFAULT_WIDTH: u32 = 600;
/// Height used when a request names none.
pub const DEFAULT_HEIGHT: u32 = 400;
/// Smallest accepted image side.
pub const MIN_DIMENSION: u32 = 100;
/// Largest accepted image side.
pub const MAX_DIMENSION: u32 = 2000;

/// What a request asks to draw.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestPayload {
    /// A widget to compile.
    Widget(Box<Widget>),
    /// A ready-made chart option object, kept as-is; only missing series colors are filled in.
    Options(Box<Value>),
}

/// Decoded and normalized render request.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// Chart to draw.
    pub payload: RequestPayload,
    /// Image width, within [`MIN_DIMENSION`]..=[`MAX_DIMENSION`].
    pub width: u32,
    /// Image height, within [`MIN_DIMENSION`]..=[`MAX_DIMENSION`].
    pub height: u32,
    /// Theme override.
    pub theme: Option<String>,
}

#[derive(Deserialize)]
struct RawRequest {
    #[serde(default)]
    widget: Option<Widget>,
    #[serde(default)]
    option: Option<Value>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    theme: Option<String>,
}

impl RenderRequest {
    /// Decode a JSON request body.
    ///
    /// The size ceiling is checked before any parsing. When both `widget` and `option` are
    /// present, `widget` wins.
    pub fn from_slice(body: &[u8], max_payload: usize) -> PlotshotResult<Self> {
        if body.len() > max_payload {
            return Err(PlotshotError::payload_too_large(body.len(), max_payload));
        }
        let raw: RawRequest = serde_json::from_slice(body)
            .map_err(|e| PlotshotError::invalid_input(format!("malformed request body: {e}")))?;

        let payload = match (raw.widget, raw.option) {
            (Some(w), option) => {
                if option.is_some() {
                    tracing::debug!("request carries both widget and option, using widget");
                }
                RequestPayload::Widget(Box::new(w))
            }
            (None, Some(o)) if o.is_object() => RequestPayload::Options(Box::new(o)),
            (None, Some(_)) => {
                return Err(PlotshotError::invalid_input("'option' must be a JSON object"));
            }
            (None, None) => {
                return Err(PlotshotError::invalid_input(
                    "request needs either 'widget' or 'option'",
                ));
            }
        };

        Ok(Self {
            payload,
            width: clamp_dimension(raw.width, DEFAULT_WIDTH),
            height: clamp_dimension(raw.height, DEFAULT_HEIGHT),
            theme: raw.theme.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Request for `widget` at the default size.
    pub fn for_widget(widget: Widget) -> Self {
        Self {
            payload: RequestPayload::Widget(Box::new(widget)),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            theme: None,
        }
    }

    /// Request for a ready-made option object at the default size.
    pub fn for_options(option: Value) -> Self {
        Self {
            payload: RequestPayload::Options(Box::new(option)),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            theme: None,
        }
    }

    /// Override the size; values are clamped like decoded ones.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.clamp(MIN_DIMENSION, MAX_DIMENSION);
        self.height = height.clamp(MIN_DIMENSION, MAX_DIMENSION);
        self
    }

    /// Override the theme.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

/// Round and clamp a requested side; `None` yields `default`.
pub fn clamp_dimension(requested: Option<f64>, default: u32) -> u32 {
    match requested {
        Some(v) if v.is_finite() => {
            v.round()
                .clamp(f64::from(MIN_DIMENSION), f64::from(MAX_DIMENSION)) as u32
        }
        _ => default,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/request.rs"]
mod tests;
