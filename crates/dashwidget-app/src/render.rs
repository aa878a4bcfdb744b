//! Plain-text rendering of dashboard views.

use dashwidget_core::form::FormField;
use dashwidget_core::view::{ChartView, StatsView, TableView, TrendDirection};
use dashwidget_core::widget::ChartKind;
use dashwidget_core::{DraftFormModel, Signal, StatCard, Store, WidgetCard, WidgetView};
use std::fmt::Write;

const BAR_WIDTH: f64 = 24.0;

/// `[Title] description`
pub fn signal_line(signal: &Signal) -> String {
    format!("[{}] {}", signal.title(), signal.description())
}

/// Summary cards on one line each.
pub fn stat_cards(cards: &[StatCard]) -> String {
    let width = cards.iter().map(|c| c.title.len()).max().unwrap_or(0);
    let mut out = String::new();
    for card in cards {
        let _ = writeln!(out, "{:width$}  {}", card.title, card.value, width = width);
    }
    out
}

pub fn widget_card(card: &WidgetCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {} [{}]", card.id, card.title, card.badge);
    let _ = writeln!(out, "  {}", card.created_on);
    if !card.description.is_empty() {
        let _ = writeln!(out, "  {}", card.description);
    }
    for line in content_lines(&card.content) {
        let _ = writeln!(out, "  {}", line);
    }
    out
}

/// Body of a card, one entry per line.
pub fn content_lines(view: &WidgetView) -> Vec<String> {
    match view {
        WidgetView::Chart(chart) => chart_lines(chart),
        WidgetView::Stats(stats) => stats_lines(stats),
        WidgetView::Table(table) => table_lines(table),
        WidgetView::Custom => vec!["(custom widget)".to_string()],
        WidgetView::Placeholder { message } => vec![format!("! {}", message)],
    }
}

fn chart_lines(chart: &ChartView) -> Vec<String> {
    let width = chart.points.iter().map(|p| p.label.len()).max().unwrap_or(0);
    let mut lines = vec![format!("{} chart", chart.chart_type)];

    match chart.chart_type {
        ChartKind::Bar => {
            let max = chart.max_value();
            for point in &chart.points {
                let len = if max > 0.0 {
                    (point.value.max(0.0) / max * BAR_WIDTH).round() as usize
                } else {
                    0
                };
                lines.push(format!(
                    "{:width$}  {} {}",
                    point.label,
                    "#".repeat(len),
                    point.value,
                    width = width
                ));
            }
        }
        ChartKind::Pie => {
            let total = chart.total();
            for point in &chart.points {
                let share = if total != 0.0 { point.value / total * 100.0 } else { 0.0 };
                lines.push(format!(
                    "{:width$}  {:.1}% ({})",
                    point.label,
                    share,
                    point.color,
                    width = width
                ));
            }
        }
        ChartKind::Line => {
            let values: Vec<String> = chart.points.iter().map(|p| p.value.to_string()).collect();
            let labels: Vec<&str> = chart.points.iter().map(|p| p.label.as_str()).collect();
            lines.push(labels.join(" -> "));
            lines.push(values.join(" -> "));
        }
    }
    lines
}

fn stats_lines(stats: &StatsView) -> Vec<String> {
    let arrow = match stats.direction {
        TrendDirection::Up => "up",
        TrendDirection::Down => "down",
    };
    vec![
        stats.main_value.clone(),
        format!(
            "{} {} from {} ({})",
            arrow,
            stats.trend_label(),
            stats.previous_value,
            stats.time_frame
        ),
    ]
}

fn table_lines(table: &TableView) -> Vec<String> {
    let mut lines = vec![table.headers.join(" | ")];
    lines.extend(table.rows.iter().map(|row| row.join(" | ")));
    lines
}

/// Field values and errors of the form, in display order.
pub fn form<S: Store>(model: &DraftFormModel<S>) -> String {
    let form = model.form();
    let mut out = String::new();
    let _ = writeln!(out, "Form: {:?}", model.phase());
    for field in FormField::fields_for(form.widget_type()) {
        let value = form.field_text(field).unwrap_or_default();
        let _ = writeln!(out, "  {} ({}): {}", field.label(), field, value);
        if let Some(error) = form.errors().get(&field) {
            let _ = writeln!(out, "    ! {}", error);
        }
    }
    out
}
