//! Render boundary: turns stored widgets into display-ready views.
//!
//! Building a view never fails. A widget whose payload does not match its
//! type becomes a [`WidgetView::Placeholder`] so one bad record cannot take
//! the whole dashboard down.

use crate::clock::format_display_date;
use crate::widget::{
    ChartData, ChartKind, StatsData, TableData, Widget, WidgetData, WidgetId, WidgetType,
    DEFAULT_CHART_COLORS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a widget's payload cannot be displayed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("{0} widget has no data")]
    MissingData(WidgetType),
    #[error("{widget_type} data is malformed: {reason}")]
    Malformed {
        widget_type: WidgetType,
        reason: String,
    },
}

/// Decode a widget's stored payload according to its type.
pub fn typed_payload(widget: &Widget) -> Result<WidgetData, RenderError> {
    if widget.data.is_null() && widget.widget_type != WidgetType::Custom {
        return Err(RenderError::MissingData(widget.widget_type));
    }
    WidgetData::from_value(widget.widget_type, widget.data.clone()).map_err(|e| {
        RenderError::Malformed {
            widget_type: widget.widget_type,
            reason: e.to_string(),
        }
    })
}

/// One bar/point/slice of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub chart_type: ChartKind,
    pub points: Vec<ChartPoint>,
}

impl ChartView {
    /// Largest value, used to scale bars. At least `0`.
    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    /// Sum of all values, used for pie shares.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    pub main_value: String,
    pub trend: f64,
    pub direction: TrendDirection,
    pub previous_value: String,
    pub time_frame: String,
}

impl StatsView {
    /// Trend as shown next to the arrow, e.g. `12.5%`.
    pub fn trend_label(&self) -> String {
        format!("{}%", self.trend)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    /// Rows as stored; they may be shorter or longer than the header.
    pub rows: Vec<Vec<String>>,
}

/// Display-ready content of a widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WidgetView {
    Chart(ChartView),
    Stats(StatsView),
    Table(TableView),
    /// Custom widgets have no content of their own.
    Custom,
    /// Shown in place of content that could not be rendered.
    Placeholder { message: String },
}

impl WidgetView {
    /// Build the view for a widget, degrading to a placeholder on error.
    pub fn of(widget: &Widget) -> Self {
        match Self::try_of(widget) {
            Ok(view) => view,
            Err(e) => {
                log::warn!("Widget {} cannot be rendered: {}", widget.id, e);
                WidgetView::Placeholder {
                    message: format!("Unable to display this widget ({})", e),
                }
            }
        }
    }

    /// Build the view for a widget, reporting why it cannot be rendered.
    pub fn try_of(widget: &Widget) -> Result<Self, RenderError> {
        Ok(match typed_payload(widget)? {
            WidgetData::Chart(chart) => WidgetView::Chart(chart_view(chart)),
            WidgetData::Stats(stats) => WidgetView::Stats(stats_view(stats)),
            WidgetData::Table(table) => WidgetView::Table(table_view(table)),
            WidgetData::Custom => WidgetView::Custom,
        })
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, WidgetView::Placeholder { .. })
    }
}

/// Labels and values are paired up; the surplus of the longer list is not
/// drawn.
fn chart_view(chart: ChartData) -> ChartView {
    if chart.labels.len() != chart.values.len() {
        log::debug!(
            "Chart has {} labels but {} values; drawing {} points",
            chart.labels.len(),
            chart.values.len(),
            chart.labels.len().min(chart.values.len())
        );
    }

    let palette: Vec<String> = if chart.background_color.is_empty() {
        DEFAULT_CHART_COLORS.iter().map(|c| c.to_string()).collect()
    } else {
        chart.background_color
    };

    let points = chart
        .labels
        .into_iter()
        .zip(chart.values)
        .enumerate()
        .map(|(i, (label, value))| ChartPoint {
            label,
            value,
            color: palette[i % palette.len()].clone(),
        })
        .collect();

    ChartView {
        chart_type: chart.chart_type,
        points,
    }
}

fn stats_view(stats: StatsData) -> StatsView {
    let direction = if stats.trend >= 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };
    StatsView {
        main_value: stats.main_value,
        trend: stats.trend,
        direction,
        previous_value: stats.previous_value,
        time_frame: stats.time_frame,
    }
}

fn table_view(table: TableData) -> TableView {
    TableView {
        headers: table.headers,
        rows: table.rows,
    }
}

/// Icon shown on a widget card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetIcon {
    BarChart,
    Table,
    LineChart,
    Settings,
}

impl WidgetIcon {
    pub fn for_type(widget_type: WidgetType) -> Self {
        match widget_type {
            WidgetType::Chart => WidgetIcon::BarChart,
            WidgetType::Table => WidgetIcon::Table,
            WidgetType::Stats => WidgetIcon::LineChart,
            WidgetType::Custom => WidgetIcon::Settings,
        }
    }
}

/// Everything a widget card shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetCard {
    pub id: WidgetId,
    pub icon: WidgetIcon,
    pub title: String,
    /// `Created on M/D/YYYY`.
    pub created_on: String,
    pub description: String,
    /// Type badge text.
    pub badge: String,
    pub content: WidgetView,
}

impl WidgetCard {
    pub fn from_widget(widget: &Widget) -> Self {
        let date = format_display_date(&widget.created_at)
            .unwrap_or_else(|| widget.created_at.clone());
        Self {
            id: widget.id,
            icon: WidgetIcon::for_type(widget.widget_type),
            title: widget.widget_name.clone(),
            created_on: format!("Created on {}", date),
            description: widget.description.clone(),
            badge: widget.widget_type.to_string(),
            content: WidgetView::of(widget),
        }
    }
}

/// Icon shown on a summary stat card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatIcon {
    Dollar,
    Users,
    Cart,
    TrendingUp,
}

/// A summary number at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub icon: StatIcon,
}

impl StatCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, icon: StatIcon) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            icon,
        }
    }

    /// The cards shown when nothing else is configured.
    pub fn defaults() -> Vec<StatCard> {
        vec![
            StatCard::new("Revenue", "$45,231", StatIcon::Dollar),
            StatCard::new("Active Users", "2,453", StatIcon::Users),
            StatCard::new("Sales", "432", StatIcon::Cart),
            StatCard::new("Growth", "+12.5%", StatIcon::TrendingUp),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored(widget_type: WidgetType, data: serde_json::Value) -> Widget {
        Widget {
            id: 1,
            widget_name: "W".into(),
            widget_type,
            description: "D".into(),
            created_at: "2024-04-05T19:34:38.901Z".into(),
            data,
        }
    }

    #[test]
    fn test_chart_view_assigns_colors_positionally() {
        let widget = stored(
            WidgetType::Chart,
            json!({"labels": ["a", "b", "c"], "values": [1, 2, 3], "chartType": "bar",
                   "backgroundColor": ["red", "blue"]}),
        );
        let WidgetView::Chart(chart) = WidgetView::of(&widget) else {
            panic!("expected chart view");
        };
        let colors: Vec<_> = chart.points.iter().map(|p| p.color.as_str()).collect();
        assert_eq!(colors, vec!["red", "blue", "red"]);
        assert_eq!(chart.max_value(), 3.0);
        assert_eq!(chart.total(), 6.0);
    }

    #[test]
    fn test_chart_without_colors_uses_palette() {
        let widget = stored(
            WidgetType::Chart,
            json!({"labels": ["a"], "values": [1], "chartType": "line"}),
        );
        let WidgetView::Chart(chart) = WidgetView::of(&widget) else {
            panic!("expected chart view");
        };
        assert_eq!(chart.points[0].color, DEFAULT_CHART_COLORS[0]);
        assert_eq!(chart.chart_type, ChartKind::Line);
    }

    #[test]
    fn test_chart_length_mismatch_draws_common_points() {
        // Trailing comma in the labels field leaves an empty extra label
        let widget = stored(
            WidgetType::Chart,
            json!({"labels": ["Jan", "Feb", "Mar", ""], "values": [30, 50, 70], "chartType": "bar"}),
        );
        let WidgetView::Chart(chart) = WidgetView::of(&widget) else {
            panic!("expected chart view");
        };
        let labels: Vec<_> = chart.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan", "Feb", "Mar"]);

        let widget = stored(
            WidgetType::Chart,
            json!({"labels": ["a"], "values": [1, 2], "chartType": "pie"}),
        );
        let WidgetView::Chart(chart) = WidgetView::of(&widget) else {
            panic!("expected chart view");
        };
        assert_eq!(chart.points.len(), 1);
        assert_eq!(chart.total(), 1.0);
    }

    #[test]
    fn test_table_without_headers_is_placeholder() {
        let widget = stored(WidgetType::Table, json!({"rows": [["a"]]}));
        assert!(matches!(
            WidgetView::try_of(&widget),
            Err(RenderError::Malformed { widget_type: WidgetType::Table, .. })
        ));
        assert!(WidgetView::of(&widget).is_placeholder());
    }

    #[test]
    fn test_missing_data_is_placeholder() {
        let widget = stored(WidgetType::Stats, serde_json::Value::Null);
        assert_eq!(
            WidgetView::try_of(&widget),
            Err(RenderError::MissingData(WidgetType::Stats))
        );
    }

    #[test]
    fn test_custom_renders_without_data() {
        let widget = stored(WidgetType::Custom, serde_json::Value::Null);
        assert_eq!(WidgetView::of(&widget), WidgetView::Custom);
    }

    #[test]
    fn test_stats_direction() {
        let down = stored(
            WidgetType::Stats,
            json!({"mainValue": "9", "trend": -2.5, "previousValue": "10", "timeFrame": "week"}),
        );
        let WidgetView::Stats(stats) = WidgetView::of(&down) else {
            panic!("expected stats view");
        };
        assert_eq!(stats.direction, TrendDirection::Down);
        assert_eq!(stats.trend_label(), "-2.5%");

        let flat = stored(
            WidgetType::Stats,
            json!({"mainValue": "9", "trend": 0, "previousValue": "9", "timeFrame": "week"}),
        );
        let WidgetView::Stats(stats) = WidgetView::of(&flat) else {
            panic!("expected stats view");
        };
        assert_eq!(stats.direction, TrendDirection::Up);
    }

    #[test]
    fn test_table_rows_are_kept_as_is() {
        let widget = stored(
            WidgetType::Table,
            json!({"headers": ["A", "B"], "rows": [["1"], ["1", "2", "3"]]}),
        );
        let WidgetView::Table(table) = WidgetView::of(&widget) else {
            panic!("expected table view");
        };
        assert_eq!(table.rows[0].len(), 1);
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn test_card_metadata() {
        let widget = stored(WidgetType::Stats, json!(null));
        let card = WidgetCard::from_widget(&widget);
        assert_eq!(card.icon, WidgetIcon::LineChart);
        assert_eq!(card.created_on, "Created on 4/5/2024");
        assert_eq!(card.badge, "stats");
        assert!(card.content.is_placeholder());
    }

    #[test]
    fn test_card_keeps_unparseable_date() {
        let mut widget = stored(WidgetType::Custom, json!(null));
        widget.created_at = "sometime".into();
        assert_eq!(WidgetCard::from_widget(&widget).created_on, "Created on sometime");
    }

    #[test]
    fn test_view_serializes_with_kind_tag() {
        let value = serde_json::to_value(WidgetView::Placeholder { message: "x".into() }).unwrap();
        assert_eq!(value, json!({"kind": "placeholder", "message": "x"}));
    }
}
