//! Widget records and their persistence.
//!
//! A [`Widget`] is a completed, immutable visualization record. Its payload
//! is stored as the JSON it was persisted with; the typed [`WidgetData`]
//! is recovered where it is consumed (see [`crate::view`]).

mod data;
mod store;

pub use data::{
    ChartData, ChartKind, StatsData, TableData, WidgetData, DEFAULT_CHART_COLORS,
};
pub use store::{WidgetStore, COMPLETED_WIDGETS_KEY, CORRUPT_WIDGETS_KEY};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Widget identifier (milliseconds since the Unix epoch at creation).
pub type WidgetId = i64;

/// The kind of visualization a widget shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    #[default]
    Chart,
    Stats,
    Table,
    Custom,
}

impl WidgetType {
    /// All widget types, in the order the creation form offers them.
    pub const ALL: [WidgetType; 4] = [Self::Chart, Self::Stats, Self::Table, Self::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetType::Chart => "chart",
            WidgetType::Stats => "stats",
            WidgetType::Table => "table",
            WidgetType::Custom => "custom",
        }
    }

    /// Human-readable label for selection lists.
    pub fn label(&self) -> &'static str {
        match self {
            WidgetType::Chart => "Chart",
            WidgetType::Stats => "Statistics",
            WidgetType::Table => "Table",
            WidgetType::Custom => "Custom",
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised choice in a selection field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for WidgetType {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chart" => Ok(WidgetType::Chart),
            "stats" => Ok(WidgetType::Stats),
            "table" => Ok(WidgetType::Table),
            "custom" => Ok(WidgetType::Custom),
            _ => Err(UnknownChoice {
                kind: "widget type",
                value: s.to_string(),
            }),
        }
    }
}

/// A completed widget as persisted under [`COMPLETED_WIDGETS_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    pub widget_name: String,
    pub widget_type: WidgetType,
    pub description: String,
    /// RFC 3339 timestamp, set once at creation.
    pub created_at: String,
    /// Payload as persisted; shape depends on `widget_type`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl Widget {
    /// Build a widget from a typed payload. The widget type is taken from
    /// the payload so the two can never disagree.
    pub fn new(
        id: WidgetId,
        widget_name: impl Into<String>,
        description: impl Into<String>,
        created_at: impl Into<String>,
        data: &WidgetData,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id,
            widget_name: widget_name.into(),
            widget_type: data.widget_type(),
            description: description.into(),
            created_at: created_at.into(),
            data: data.to_value()?,
        })
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
