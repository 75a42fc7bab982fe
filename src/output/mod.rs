//! Chart-library shapes and the formatting shared by both projections.
//!
//! Field names on [`ChartTrace`] and [`ChoroplethSeries`] are the charting
//! consumer's prop schema and must not change.

use crate::config::DisplayConfig;
use indexmap::IndexMap;
use serde::Serialize;

/// Per-point sums keyed by counts key, in selection order.
pub type CategoryBreakdown = IndexMap<String, u64>;

pub const TIME_SERIES_HEADER: &str =
    "<b>%{x|%Y-%m-%d} at %{x|%I:%M %p}</b><br>Total Alarm Counts: %{y}<br>";
pub const WORLD_MAP_HEADER: &str = "<b>%{text}</b><br>Total Alarm Counts: %{z}<br>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceType {
    Scatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    /// Hidden until toggled from the legend.
    #[serde(rename = "legendonly")]
    LegendOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HoverInfo {
    #[serde(rename = "none")]
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTrace {
    pub x: Vec<String>,
    pub y: Vec<u64>,
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    pub mode: TraceMode,
    pub name: String,
    pub customdata: Vec<CategoryBreakdown>,
    pub hovertemplate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<HoverInfo>,
}

impl ChartTrace {
    /// Total across every point of the trace.
    pub fn total(&self) -> u64 {
        self.y.iter().fold(0, |acc, &y| acc.saturating_add(y))
    }

    pub fn is_aggregate(&self) -> bool {
        self.visible.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethSeries {
    pub customdata: Vec<CategoryBreakdown>,
    pub locations: Vec<String>,
    pub z: Vec<u64>,
    pub text: Vec<String>,
    pub hovertemplate: String,
}

/// `hegemony_alarm_counts` -> `Hegemony Alarm Counts`.
pub fn category_label(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn hover_line(key: &str) -> String {
    format!("{}: %{{customdata.{key}}}<br>", category_label(key))
}

pub fn hover_template<S: AsRef<str>>(header: &str, keys: &[S]) -> String {
    let mut template = header.to_string();
    for key in keys {
        template.push_str(&hover_line(key.as_ref()));
    }
    template
}

/// Pair each key with its sum; repeated keys accumulate into one field.
pub fn breakdown<S: AsRef<str>>(keys: &[S], sums: &[u64]) -> CategoryBreakdown {
    let mut out = CategoryBreakdown::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        let slot = out.entry(key.as_ref().to_string()).or_insert(0);
        *slot = slot.saturating_add(sums.get(i).copied().unwrap_or(0));
    }
    out
}

/// Shorten a legend name to the configured width, counting characters.
/// The result never exceeds `max_trace_name_chars`.
pub fn truncate_name(name: &str, display: &DisplayConfig) -> String {
    let max = display.max_trace_name_chars;
    if name.chars().count() <= max {
        return name.to_string();
    }
    let ellipsis_chars = display.ellipsis.chars().count();
    if ellipsis_chars >= max {
        return name.chars().take(max).collect();
    }
    let mut short: String = name.chars().take(max - ellipsis_chars).collect();
    short.push_str(&display.ellipsis);
    short
}

/// World-map payload for the chart: the series, or `{}` when there is none.
pub fn world_map_json(
    series: Option<&ChoroplethSeries>,
) -> serde_json::Result<serde_json::Value> {
    match series {
        Some(series) => serde_json::to_value(series),
        None => Ok(serde_json::json!({})),
    }
}
