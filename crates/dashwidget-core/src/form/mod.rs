//! The widget creation form.
//!
//! [`DraftForm`] holds the field values of one in-progress widget;
//! [`DraftFormModel`] drives its open/edit/submit lifecycle and keeps the
//! draft persisted under [`WIDGET_FORM_DRAFT_KEY`] so an abandoned form
//! can be resumed.

mod model;
pub mod parse;

pub use model::{DraftFormModel, FormPhase, SubmitOutcome, WIDGET_FORM_DRAFT_KEY};

use crate::widget::{UnknownChoice, WidgetData, WidgetType};
use parse::{coerce_number, join_list, join_rows, parse_numbers, parse_rows, split_list};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Validation messages keyed by field.
pub type FormErrors = BTreeMap<FormField, String>;

/// An editable field of the creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    WidgetName,
    WidgetType,
    Description,
    ChartLabels,
    ChartValues,
    ChartType,
    ChartColors,
    StatsMainValue,
    StatsTrend,
    StatsPreviousValue,
    StatsTimeFrame,
    TableHeaders,
    TableRows,
}

impl FormField {
    pub const ALL: [FormField; 13] = [
        Self::WidgetName,
        Self::WidgetType,
        Self::Description,
        Self::ChartLabels,
        Self::ChartValues,
        Self::ChartType,
        Self::ChartColors,
        Self::StatsMainValue,
        Self::StatsTrend,
        Self::StatsPreviousValue,
        Self::StatsTimeFrame,
        Self::TableHeaders,
        Self::TableRows,
    ];

    /// Fields present whatever the widget type.
    pub const COMMON: [FormField; 3] = [Self::WidgetName, Self::WidgetType, Self::Description];

    /// Persisted/JS name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            FormField::WidgetName => "widgetName",
            FormField::WidgetType => "widgetType",
            FormField::Description => "description",
            FormField::ChartLabels => "chartLabels",
            FormField::ChartValues => "chartValues",
            FormField::ChartType => "chartType",
            FormField::ChartColors => "chartColors",
            FormField::StatsMainValue => "statsMainValue",
            FormField::StatsTrend => "statsTrend",
            FormField::StatsPreviousValue => "statsPreviousValue",
            FormField::StatsTimeFrame => "statsTimeFrame",
            FormField::TableHeaders => "tableHeaders",
            FormField::TableRows => "tableRows",
        }
    }

    /// Label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            FormField::WidgetName => "Widget Name",
            FormField::WidgetType => "Widget Type",
            FormField::Description => "Description",
            FormField::ChartLabels => "Labels (comma-separated)",
            FormField::ChartValues => "Values (comma-separated)",
            FormField::ChartType => "Chart Type",
            FormField::ChartColors => "Colors (comma-separated)",
            FormField::StatsMainValue => "Main Value",
            FormField::StatsTrend => "Trend (%)",
            FormField::StatsPreviousValue => "Previous Value",
            FormField::StatsTimeFrame => "Time Frame",
            FormField::TableHeaders => "Headers (comma-separated)",
            FormField::TableRows => "Rows (one per line, comma-separated)",
        }
    }

    /// The widget type a payload field belongs to; `None` for common fields.
    pub fn payload_type(&self) -> Option<WidgetType> {
        match self {
            FormField::WidgetName | FormField::WidgetType | FormField::Description => None,
            FormField::ChartLabels
            | FormField::ChartValues
            | FormField::ChartType
            | FormField::ChartColors => Some(WidgetType::Chart),
            FormField::StatsMainValue
            | FormField::StatsTrend
            | FormField::StatsPreviousValue
            | FormField::StatsTimeFrame => Some(WidgetType::Stats),
            FormField::TableHeaders | FormField::TableRows => Some(WidgetType::Table),
        }
    }

    /// Check if the field can be edited on a form of the given type.
    pub fn applies_to(&self, widget_type: WidgetType) -> bool {
        self.payload_type().is_none_or(|t| t == widget_type)
    }

    /// Every field shown for a widget type, common fields first.
    pub fn fields_for(widget_type: WidgetType) -> Vec<FormField> {
        Self::ALL
            .into_iter()
            .filter(|f| f.applies_to(widget_type))
            .collect()
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = UnknownChoice;

    /// Accepts the camelCase name as well as kebab/snake spellings
    /// (`widget-name`, `widget_name`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| *c != '-' && *c != '_').collect();
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownChoice {
                kind: "form field",
                value: s.to_string(),
            })
    }
}

/// Errors from form operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("The form is not open")]
    NotOpen,
    #[error("Field {field} does not apply to {widget_type} widgets")]
    FieldNotApplicable {
        field: FormField,
        widget_type: WidgetType,
    },
    #[error(transparent)]
    InvalidChoice(#[from] UnknownChoice),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Field values of an in-progress widget.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftForm {
    widget_name: String,
    description: String,
    /// Payload; also determines the widget type.
    data: WidgetData,
    errors: FormErrors,
}

/// Persisted shape of a draft.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftSnapshot {
    #[serde(default)]
    widget_name: String,
    #[serde(default)]
    widget_type: WidgetType,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    data: Value,
}

impl DraftForm {
    /// An empty form for the given widget type.
    pub fn new(widget_type: WidgetType) -> Self {
        Self {
            widget_name: String::new(),
            description: String::new(),
            data: WidgetData::default_for(widget_type),
            errors: FormErrors::new(),
        }
    }

    pub fn widget_name(&self) -> &str {
        &self.widget_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn widget_type(&self) -> WidgetType {
        self.data.widget_type()
    }

    pub fn data(&self) -> &WidgetData {
        &self.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Current value of a field as editable text, or `None` if the field
    /// does not apply to the current widget type.
    pub fn field_text(&self, field: FormField) -> Option<String> {
        let text = match (field, &self.data) {
            (FormField::WidgetName, _) => self.widget_name.clone(),
            (FormField::WidgetType, data) => data.widget_type().to_string(),
            (FormField::Description, _) => self.description.clone(),
            (FormField::ChartLabels, WidgetData::Chart(chart)) => join_list(&chart.labels),
            (FormField::ChartValues, WidgetData::Chart(chart)) => join_list(&chart.values),
            (FormField::ChartType, WidgetData::Chart(chart)) => chart.chart_type.to_string(),
            (FormField::ChartColors, WidgetData::Chart(chart)) => {
                join_list(&chart.background_color)
            }
            (FormField::StatsMainValue, WidgetData::Stats(stats)) => stats.main_value.clone(),
            (FormField::StatsTrend, WidgetData::Stats(stats)) => stats.trend.to_string(),
            (FormField::StatsPreviousValue, WidgetData::Stats(stats)) => {
                stats.previous_value.clone()
            }
            (FormField::StatsTimeFrame, WidgetData::Stats(stats)) => stats.time_frame.clone(),
            (FormField::TableHeaders, WidgetData::Table(table)) => join_list(&table.headers),
            (FormField::TableRows, WidgetData::Table(table)) => join_rows(&table.rows),
            _ => return None,
        };
        Some(text)
    }

    /// Check whether nothing differs from a fresh form of `initial_type`.
    pub fn is_pristine(&self, initial_type: WidgetType) -> bool {
        self.widget_name.is_empty()
            && self.description.is_empty()
            && self.widget_type() == initial_type
            && self.data.is_default()
    }

    /// Required-field check. Returns an empty map when the form is valid.
    ///
    /// Name and description must contain something other than whitespace.
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        if self.widget_name.trim().is_empty() {
            errors.insert(FormField::WidgetName, "Widget name is required".to_string());
        }
        if self.description.trim().is_empty() {
            errors.insert(FormField::Description, "Description is required".to_string());
        }
        errors
    }

    /// Apply an edit to one field.
    ///
    /// Switching the widget type replaces the payload with the new type's
    /// default; edits made to the old payload are discarded.
    pub(crate) fn apply(&mut self, field: FormField, text: &str) -> Result<(), FormError> {
        match field {
            FormField::WidgetName => self.widget_name = text.to_string(),
            FormField::Description => self.description = text.to_string(),
            FormField::WidgetType => {
                let selected: WidgetType = text.parse()?;
                if selected != self.widget_type() {
                    self.data = WidgetData::default_for(selected);
                }
            }
            _ => self.apply_payload(field, text)?,
        }
        Ok(())
    }

    fn apply_payload(&mut self, field: FormField, text: &str) -> Result<(), FormError> {
        let widget_type = self.widget_type();
        match (field, &mut self.data) {
            (FormField::ChartLabels, WidgetData::Chart(chart)) => chart.labels = split_list(text),
            (FormField::ChartValues, WidgetData::Chart(chart)) => {
                chart.values = parse_numbers(text)
            }
            (FormField::ChartType, WidgetData::Chart(chart)) => chart.chart_type = text.parse()?,
            (FormField::ChartColors, WidgetData::Chart(chart)) => {
                chart.background_color = split_list(text)
            }
            (FormField::StatsMainValue, WidgetData::Stats(stats)) => {
                stats.main_value = text.to_string()
            }
            (FormField::StatsTrend, WidgetData::Stats(stats)) => stats.trend = coerce_number(text),
            (FormField::StatsPreviousValue, WidgetData::Stats(stats)) => {
                stats.previous_value = text.to_string()
            }
            (FormField::StatsTimeFrame, WidgetData::Stats(stats)) => {
                stats.time_frame = text.to_string()
            }
            (FormField::TableHeaders, WidgetData::Table(table)) => {
                table.headers = split_list(text)
            }
            (FormField::TableRows, WidgetData::Table(table)) => table.rows = parse_rows(text),
            _ => return Err(FormError::FieldNotApplicable { field, widget_type }),
        }
        Ok(())
    }

    pub(crate) fn set_errors(&mut self, errors: FormErrors) {
        self.errors = errors;
    }

    pub(crate) fn clear_error(&mut self, field: FormField) {
        self.errors.remove(&field);
    }

    pub(crate) fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Serialize the persisted snapshot (errors are not persisted).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let snapshot = DraftSnapshot {
            widget_name: self.widget_name.clone(),
            widget_type: self.widget_type(),
            description: self.description.clone(),
            data: self.data.to_value()?,
        };
        serde_json::to_string(&snapshot)
    }

    /// Restore from a persisted snapshot.
    ///
    /// A payload that does not fit the stored widget type is replaced by
    /// that type's default rather than rejecting the whole draft.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let snapshot: DraftSnapshot = serde_json::from_str(json)?;
        let widget_type = snapshot.widget_type;
        let data = if snapshot.data.is_null() {
            WidgetData::default_for(widget_type)
        } else {
            WidgetData::from_value(widget_type, snapshot.data).unwrap_or_else(|e| {
                log::warn!("Draft payload does not match {} widget: {}", widget_type, e);
                WidgetData::default_for(widget_type)
            })
        };

        Ok(Self {
            widget_name: snapshot.widget_name,
            description: snapshot.description,
            data,
            errors: FormErrors::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{ChartKind, StatsData};

    #[test]
    fn test_field_from_str() {
        assert_eq!("widgetName".parse::<FormField>().unwrap(), FormField::WidgetName);
        assert_eq!("widget-name".parse::<FormField>().unwrap(), FormField::WidgetName);
        assert_eq!("stats_time_frame".parse::<FormField>().unwrap(), FormField::StatsTimeFrame);
        assert!("colour".parse::<FormField>().is_err());
    }

    #[test]
    fn test_field_name_matches_serde() {
        for field in FormField::ALL {
            assert_eq!(serde_json::to_value(field).unwrap(), serde_json::json!(field.name()));
        }
    }

    #[test]
    fn test_fields_for_type() {
        let stats = FormField::fields_for(WidgetType::Stats);
        assert_eq!(&stats[..3], &FormField::COMMON);
        assert!(stats.contains(&FormField::StatsTrend));
        assert!(!stats.contains(&FormField::ChartLabels));
        assert_eq!(FormField::fields_for(WidgetType::Custom), FormField::COMMON.to_vec());
    }

    #[test]
    fn test_validate_requires_name_and_description() {
        let mut form = DraftForm::new(WidgetType::Chart);
        let errors = form.validate();
        assert!(errors.contains_key(&FormField::WidgetName));
        assert!(errors.contains_key(&FormField::Description));

        form.apply(FormField::WidgetName, "  ").unwrap();
        form.apply(FormField::Description, "Sales").unwrap();
        let errors = form.validate();
        assert!(errors.contains_key(&FormField::WidgetName));
        assert!(!errors.contains_key(&FormField::Description));
    }

    #[test]
    fn test_apply_chart_fields() {
        let mut form = DraftForm::new(WidgetType::Chart);
        form.apply(FormField::ChartLabels, "Q1, Q2").unwrap();
        form.apply(FormField::ChartValues, "10, oops").unwrap();
        form.apply(FormField::ChartType, "pie").unwrap();

        let WidgetData::Chart(chart) = form.data() else {
            panic!("expected chart payload");
        };
        assert_eq!(chart.labels, vec!["Q1", "Q2"]);
        assert_eq!(chart.values, vec![10.0, 0.0]);
        assert_eq!(chart.chart_type, ChartKind::Pie);
    }

    #[test]
    fn test_apply_rejects_foreign_field() {
        let mut form = DraftForm::new(WidgetType::Chart);
        let result = form.apply(FormField::TableRows, "a,b");
        assert_eq!(
            result,
            Err(FormError::FieldNotApplicable {
                field: FormField::TableRows,
                widget_type: WidgetType::Chart,
            })
        );
    }

    #[test]
    fn test_apply_rejects_unknown_choice() {
        let mut form = DraftForm::new(WidgetType::Chart);
        assert!(matches!(
            form.apply(FormField::WidgetType, "gauge"),
            Err(FormError::InvalidChoice(_))
        ));
        assert!(matches!(
            form.apply(FormField::ChartType, "donut"),
            Err(FormError::InvalidChoice(_))
        ));
        assert_eq!(form.widget_type(), WidgetType::Chart);
    }

    #[test]
    fn test_reselecting_same_type_keeps_payload() {
        let mut form = DraftForm::new(WidgetType::Chart);
        form.apply(FormField::ChartLabels, "X").unwrap();
        form.apply(FormField::WidgetType, "chart").unwrap();
        assert_eq!(form.field_text(FormField::ChartLabels).as_deref(), Some("X"));
    }

    #[test]
    fn test_field_text() {
        let form = DraftForm::new(WidgetType::Table);
        assert_eq!(
            form.field_text(FormField::TableRows).as_deref(),
            Some("Item 1, Active, 100\nItem 2, Pending, 250")
        );
        assert_eq!(form.field_text(FormField::WidgetType).as_deref(), Some("table"));
        assert_eq!(form.field_text(FormField::ChartLabels), None);
    }

    #[test]
    fn test_pristine() {
        let mut form = DraftForm::new(WidgetType::Chart);
        assert!(form.is_pristine(WidgetType::Chart));
        assert!(!form.is_pristine(WidgetType::Stats));

        form.apply(FormField::Description, "x").unwrap();
        assert!(!form.is_pristine(WidgetType::Chart));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut form = DraftForm::new(WidgetType::Stats);
        form.apply(FormField::WidgetName, "Users").unwrap();
        form.apply(FormField::StatsTrend, "-4.5").unwrap();

        let restored = DraftForm::from_json(&form.to_json().unwrap()).unwrap();
        assert_eq!(restored, form);
    }

    #[test]
    fn test_snapshot_without_data_uses_default() {
        let restored =
            DraftForm::from_json(r#"{"widgetName":"Test","widgetType":"stats","description":""}"#)
                .unwrap();
        assert_eq!(restored.widget_name(), "Test");
        assert_eq!(restored.data(), &WidgetData::Stats(StatsData::default()));
    }

    #[test]
    fn test_whitespace_only_fields_are_required() {
        let mut form = DraftForm::new(WidgetType::Chart);
        form.apply(FormField::WidgetName, "   ").unwrap();
        form.apply(FormField::Description, " ok ").unwrap();

        let errors = form.validate();
        assert_eq!(errors.get(&FormField::WidgetName).map(String::as_str), Some("Widget name is required"));
        assert!(!errors.contains_key(&FormField::Description));
    }

    #[test]
    fn test_snapshot_with_mismatched_data_uses_default() {
        let restored = DraftForm::from_json(
            r#"{"widgetName":"T","widgetType":"table","description":"d","data":{"labels":[]}}"#,
        )
        .unwrap();
        assert_eq!(restored.data(), &WidgetData::default_for(WidgetType::Table));
    }

    #[test]
    fn test_custom_snapshot_has_no_data() {
        let form = DraftForm::new(WidgetType::Custom);
        assert!(!form.to_json().unwrap().contains("\"data\""));
    }
}
