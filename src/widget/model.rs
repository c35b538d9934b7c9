use serde::{Deserialize, Serialize};

/// Widget kinds understood by dashboards.
///
/// Only a few kinds compile into distinct chart families; see
/// [`WidgetKind::chart_family`]. Unrecognized strings deserialize to [`WidgetKind::Unknown`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Container of nested widgets.
    Group,
    /// Log stream.
    Logs,
    /// Stacked bar timeseries.
    #[default]
    Timeseries,
    /// Line timeseries.
    TimeseriesLine,
    /// Single-line compact stat with sparkline.
    TimeseriesStat,
    /// Single value.
    Stat,
    /// Table-like list.
    List,
    /// Ranked list.
    TopList,
    /// Histogram-style distribution.
    Distribution,
    /// Geographic map.
    Geomap,
    /// Funnel.
    Funnel,
    /// Tree map.
    TreeMap,
    /// Pie chart.
    PieChart,
    /// Anomaly overview.
    Anomalies,
    /// Any kind this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// Series family a widget kind compiles into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartFamily {
    /// Bars, stacked per time bucket.
    Bar,
    /// Unstacked lines.
    Line,
}

impl WidgetKind {
    /// Fixed kind -> family mapping. New kinds must pick a family here explicitly.
    pub fn chart_family(self) -> ChartFamily {
        match self {
            Self::Timeseries | Self::Distribution => ChartFamily::Bar,
            Self::TimeseriesLine | Self::TimeseriesStat => ChartFamily::Line,
            Self::Group
            | Self::Logs
            | Self::Stat
            | Self::List
            | Self::TopList
            | Self::Geomap
            | Self::Funnel
            | Self::TreeMap
            | Self::PieChart
            | Self::Anomalies
            | Self::Unknown => ChartFamily::Bar,
        }
    }

    /// `true` for the compact stat display, which hides all chart chrome.
    pub fn is_stat(self) -> bool {
        matches!(self, Self::TimeseriesStat)
    }
}

/// How a stat value was aggregated; decides the prefix shown next to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarizeBy {
    /// Sum over the window.
    #[default]
    Sum,
    /// Maximum; shown as an upper bound.
    Max,
    /// Minimum; shown as a lower bound.
    Min,
    /// Count of rows.
    Count,
}

impl SummarizeBy {
    /// Display prefix: `"<"` for max, `">"` for min, empty otherwise.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Max => "<",
            Self::Min => ">",
            Self::Sum | Self::Count => "",
        }
    }
}

/// Legend band placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    /// Above the plot.
    Top,
    /// Below the plot.
    #[default]
    Bottom,
}

/// Per-axis display options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetAxis {
    /// Axis title; on the value axis it also names the bar stack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Show tick labels. Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_axis_label: Option<bool>,
    /// Keep only the label of the topmost tick.
    #[serde(default)]
    pub show_only_max_label: bool,
}

/// Summary statistics computed upstream over a dataset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsStats {
    /// Smallest cell value.
    pub min: f64,
    /// Largest cell value.
    pub max: f64,
    /// Sum of all cells.
    pub sum: f64,
    /// Number of cells.
    pub count: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Most frequent value.
    pub mode: f64,
    /// Largest per-time-bucket sum across series.
    pub max_group_sum: f64,
}

/// Tabular data for a widget.
///
/// `source` is expected to be a header row (first column is time) followed by data rows whose
/// first cell is a timestamp in seconds. It stays untyped here; the compiler validates it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Header row plus data rows.
    #[serde(default)]
    pub source: serde_json::Value,
    /// Rows per minute of the upstream query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_per_min: Option<f64>,
    /// Headline value for stat widgets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Window start in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    /// Window end in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    /// Summary statistics used to size the value axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<MetricsStats>,
}

/// Semantic chart description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    /// Widget kind.
    #[serde(rename = "type", default)]
    pub kind: WidgetKind,
    /// Caller-side identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Chart title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Chart subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Drop the subtitle line.
    #[serde(default)]
    pub hide_subtitle: bool,
    /// Compact mode: minimal padding, no legend band.
    #[serde(default)]
    pub naked: bool,
    /// Hide the legend.
    #[serde(default)]
    pub hide_legend: bool,
    /// Legend placement; bottom when unset.
    #[serde(default)]
    pub legend_position: LegendPosition,
    /// Show the tooltip. Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tooltip: Option<bool>,
    /// Show horizontal grid lines. Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_grid_lines: Option<bool>,
    /// Time axis options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<WidgetAxis>,
    /// Value axis options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<WidgetAxis>,
    /// Value unit, e.g. `"ms"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Headline value; overrides `dataset.value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Aggregation of the headline value.
    #[serde(default)]
    pub summarize_by: SummarizeBy,
    /// Theme name; `default` when unset or unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Data to plot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<Dataset>,
}

#[cfg(test)]
#[path = "../../tests/unit/widget/model.rs"]
mod tests;
