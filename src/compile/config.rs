//! Fully resolved chart configuration handed to a [`crate::RenderGateway`].
//!
//! The shape follows the chart engine's option vocabulary (camelCase JSON) so that callers can
//! also submit ready-made configs. Every field has a default, so partial option objects
//! deserialize.

use serde::{Deserialize, Serialize};

use crate::color::token::ColorToken;
use crate::widget::model::ChartFamily;

/// Chart rendering configuration. Produced fresh per request; not retained.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Always `false`: output is a still image.
    pub animation: bool,
    /// Canvas background override; the theme background applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorToken>,
    /// Title block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    /// Legend band.
    pub legend: Legend,
    /// Tooltip.
    pub tooltip: Tooltip,
    /// Plot padding inside the canvas, in pixels.
    pub grid: Grid,
    /// Time axis.
    pub x_axis: TimeAxis,
    /// Value axis.
    pub y_axis: ValueAxis,
    /// Series, in header column order.
    pub series: Vec<Series>,
    /// Data matrix the series encode into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetSource>,
}

/// Title and optional subtext.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Title {
    /// Main title text.
    pub text: String,
    /// Secondary line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
}

/// Legend placement as emitted into configs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendSide {
    /// Above the plot.
    Top,
    /// Below the plot.
    #[default]
    Bottom,
}

/// Legend band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Legend {
    /// Whether the legend is drawn.
    pub show: bool,
    /// Band placement.
    pub side: LegendSide,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            show: true,
            side: LegendSide::Bottom,
        }
    }
}

/// Tooltip settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tooltip {
    /// Whether a tooltip is attached.
    pub show: bool,
    /// Trigger mode; always `"axis"` for compiled configs.
    pub trigger: String,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            show: true,
            trigger: "axis".to_string(),
        }
    }
}

/// Plot padding, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Grid {
    /// Top padding.
    pub top: f64,
    /// Right padding.
    pub right: f64,
    /// Bottom padding.
    pub bottom: f64,
    /// Left padding.
    pub left: f64,
    /// Padding is measured outside axis labels.
    pub contain_label: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 10.0,
            bottom: 30.0,
            left: 5.0,
            contain_label: true,
        }
    }
}

/// Time axis; bounds in epoch milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeAxis {
    /// Lower bound (ms).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound (ms).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Axis title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tick labels visible.
    pub show_labels: bool,
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            name: None,
            show_labels: true,
        }
    }
}

/// One value-axis tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    /// Tick position in data units.
    pub value: f64,
    /// Formatted label; `None` hides this tick's label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Value axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueAxis {
    /// Lower bound.
    pub min: f64,
    /// Upper bound; gateways autoscale when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Axis title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tick labels visible.
    pub show_labels: bool,
    /// Horizontal grid lines visible.
    pub show_split_lines: bool,
    /// Precomputed ticks, bottom to top.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ticks: Vec<AxisTick>,
}

impl Default for ValueAxis {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: None,
            name: None,
            show_labels: true,
            show_split_lines: true,
            ticks: Vec::new(),
        }
    }
}

/// Column mapping of a series into the dataset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encode {
    /// Time column (always 0 for compiled configs).
    pub x: usize,
    /// Value column.
    pub y: usize,
}

/// Per-series style.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemStyle {
    /// Series color; resolved from the series name when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorToken>,
}

/// One data series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Bar or line.
    #[serde(rename = "type", default = "default_family")]
    pub family: ChartFamily,
    /// Series name, normally the header cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Stack key; series sharing a key are summed per bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Dataset columns.
    #[serde(default)]
    pub encode: Encode,
    /// Style.
    #[serde(default)]
    pub item_style: ItemStyle,
    /// Draw point markers on lines.
    #[serde(default)]
    pub show_symbol: bool,
}

fn default_family() -> ChartFamily {
    ChartFamily::Bar
}

/// Embedded data matrix: header row followed by rows with millisecond timestamps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSource {
    /// Rows, header first.
    pub source: Vec<Vec<serde_json::Value>>,
}

impl DatasetSource {
    /// Header row, if present.
    pub fn header(&self) -> Option<&[serde_json::Value]> {
        self.source.first().map(Vec::as_slice)
    }

    /// Data rows (everything after the header).
    pub fn rows(&self) -> &[Vec<serde_json::Value>] {
        self.source.get(1..).unwrap_or(&[])
    }
}
