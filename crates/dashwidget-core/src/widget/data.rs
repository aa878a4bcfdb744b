//! Typed widget payloads.

use super::{UnknownChoice, WidgetType};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Colors used for chart series when none are given.
pub const DEFAULT_CHART_COLORS: [&str; 5] = ["#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEEAD"];

/// Chart sub-kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [Self::Bar, Self::Line, Self::Pie];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            _ => Err(UnknownChoice {
                kind: "chart type",
                value: s.to_string(),
            }),
        }
    }
}

/// Payload of a `chart` widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// Category labels.
    pub labels: Vec<String>,
    /// One value per label.
    pub values: Vec<f64>,
    pub chart_type: ChartKind,
    /// Colors, applied positionally.
    #[serde(default)]
    pub background_color: Vec<String>,
}

impl Default for ChartData {
    fn default() -> Self {
        Self {
            labels: vec!["Jan".into(), "Feb".into(), "Mar".into()],
            values: vec![30.0, 50.0, 70.0],
            chart_type: ChartKind::Bar,
            background_color: DEFAULT_CHART_COLORS[..3].iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Payload of a `stats` widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    /// Display string for the headline number.
    pub main_value: String,
    /// Percentage change; the sign gives the direction.
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub trend: f64,
    pub previous_value: String,
    pub time_frame: String,
}

impl Default for StatsData {
    fn default() -> Self {
        Self {
            main_value: "1,234".into(),
            trend: 12.5,
            previous_value: "1,096".into(),
            time_frame: "Last 30 days".into(),
        }
    }
}

/// Accept `12.5` as well as `"12.5"`; some writers store the trend as the
/// text typed into the form.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Value(f64),
        Text(String),
    }

    match Number::deserialize(deserializer)? {
        Number::Value(n) => Ok(n),
        Number::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {:?}", text))),
    }
}

/// Payload of a `table` widget. Rows are not checked against the header count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Default for TableData {
    fn default() -> Self {
        Self {
            headers: vec!["Name".into(), "Status".into(), "Value".into()],
            rows: vec![
                vec!["Item 1".into(), "Active".into(), "100".into()],
                vec!["Item 2".into(), "Pending".into(), "250".into()],
            ],
        }
    }
}

/// Type-specific payload, one variant per [`WidgetType`].
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetData {
    Chart(ChartData),
    Stats(StatsData),
    Table(TableData),
    Custom,
}

impl WidgetData {
    /// The default payload for a widget type.
    pub fn default_for(widget_type: WidgetType) -> Self {
        match widget_type {
            WidgetType::Chart => WidgetData::Chart(ChartData::default()),
            WidgetType::Stats => WidgetData::Stats(StatsData::default()),
            WidgetType::Table => WidgetData::Table(TableData::default()),
            WidgetType::Custom => WidgetData::Custom,
        }
    }

    /// The widget type this payload belongs to.
    pub fn widget_type(&self) -> WidgetType {
        match self {
            WidgetData::Chart(_) => WidgetType::Chart,
            WidgetData::Stats(_) => WidgetType::Stats,
            WidgetData::Table(_) => WidgetType::Table,
            WidgetData::Custom => WidgetType::Custom,
        }
    }

    /// Check whether this is the default payload for its type.
    pub fn is_default(&self) -> bool {
        *self == Self::default_for(self.widget_type())
    }

    /// Convert to the persisted JSON shape (`null` for custom widgets).
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            WidgetData::Chart(chart) => serde_json::to_value(chart),
            WidgetData::Stats(stats) => serde_json::to_value(stats),
            WidgetData::Table(table) => serde_json::to_value(table),
            WidgetData::Custom => Ok(Value::Null),
        }
    }

    /// Decode a persisted payload for the given widget type.
    pub fn from_value(widget_type: WidgetType, value: Value) -> Result<Self, serde_json::Error> {
        match widget_type {
            WidgetType::Chart => serde_json::from_value(value).map(WidgetData::Chart),
            WidgetType::Stats => serde_json::from_value(value).map(WidgetData::Stats),
            WidgetType::Table => serde_json::from_value(value).map(WidgetData::Table),
            WidgetType::Custom => Ok(WidgetData::Custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_payload_matches_type() {
        for widget_type in WidgetType::ALL {
            let data = WidgetData::default_for(widget_type);
            assert_eq!(data.widget_type(), widget_type);
            assert!(data.is_default());
        }
    }

    #[test]
    fn test_chart_default() {
        let WidgetData::Chart(chart) = WidgetData::default_for(WidgetType::Chart) else {
            panic!("chart default must be a chart payload");
        };
        assert_eq!(chart.labels, vec!["Jan", "Feb", "Mar"]);
        assert_eq!(chart.values, vec![30.0, 50.0, 70.0]);
        assert_eq!(chart.chart_type, ChartKind::Bar);
        assert_eq!(chart.background_color.len(), chart.labels.len());
    }

    #[test]
    fn test_edited_payload_is_not_default() {
        let mut stats = StatsData::default();
        stats.main_value = "9".into();
        assert!(!WidgetData::Stats(stats).is_default());
    }

    #[test]
    fn test_from_value_rejects_wrong_shape() {
        let table_shape = json!({"headers": ["A"], "rows": []});
        assert!(WidgetData::from_value(WidgetType::Chart, table_shape.clone()).is_err());
        assert!(WidgetData::from_value(WidgetType::Table, table_shape).is_ok());
    }

    #[test]
    fn test_custom_ignores_value() {
        let data = WidgetData::from_value(WidgetType::Custom, json!({"anything": 1})).unwrap();
        assert_eq!(data, WidgetData::Custom);
        assert_eq!(data.to_value().unwrap(), Value::Null);
    }

    #[test]
    fn test_chart_colors_optional() {
        let value = json!({"labels": ["A"], "values": [1], "chartType": "pie"});
        let data = WidgetData::from_value(WidgetType::Chart, value).unwrap();
        let WidgetData::Chart(chart) = data else {
            panic!("expected chart");
        };
        assert!(chart.background_color.is_empty());
        assert_eq!(chart.chart_type, ChartKind::Pie);
    }

    #[test]
    fn test_stats_trend_accepts_numeric_string() {
        let value = json!({"mainValue": "1", "trend": " 12.5", "previousValue": "0", "timeFrame": "day"});
        let WidgetData::Stats(stats) = WidgetData::from_value(WidgetType::Stats, value).unwrap() else {
            panic!("expected stats");
        };
        assert_eq!(stats.trend, 12.5);

        let value = json!({"mainValue": "1", "trend": "up", "previousValue": "0", "timeFrame": "day"});
        assert!(WidgetData::from_value(WidgetType::Stats, value).is_err());
    }

    #[test]
    fn test_chart_kind_from_str() {
        assert_eq!("Line".parse::<ChartKind>().unwrap(), ChartKind::Line);
        assert!("donut".parse::<ChartKind>().is_err());
    }
}
