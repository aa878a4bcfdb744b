//! Lifecycle of the creation form.

use super::{DraftForm, FormError, FormErrors, FormField};
use crate::clock::{format_timestamp, Clock};
use crate::signal::Signal;
use crate::storage::{Store, StoreError, StoreResult};
use crate::widget::{Widget, WidgetId, WidgetStore, WidgetType};
use std::sync::Arc;

/// Key holding the persisted draft.
pub const WIDGET_FORM_DRAFT_KEY: &str = "widget_form_draft";

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Closed,
    /// Open with default values.
    OpenEmpty,
    /// Open with a draft loaded from storage.
    OpenRestored,
    /// Open and edited since opening.
    OpenEditing,
    /// Validation and creation in progress.
    Submitting,
}

impl FormPhase {
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            FormPhase::OpenEmpty | FormPhase::OpenRestored | FormPhase::OpenEditing
        )
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The widget was created and the form closed.
    Created(Widget),
    /// Required fields are missing; the form stays open.
    Invalid(FormErrors),
}

/// Drives one creation form from open to submit, cancel or clear.
///
/// Every edit re-persists the draft, so closing the form without submitting
/// keeps the work: the next [`open`](Self::open) restores it. Submitting or
/// clearing removes it.
pub struct DraftFormModel<S: Store> {
    storage: Arc<S>,
    clock: Box<dyn Clock>,
    /// Widget type of a fresh form.
    initial_type: WidgetType,
    form: DraftForm,
    phase: FormPhase,
    /// Highest id handed out (or seen in the store).
    last_id: WidgetId,
    /// Whether the last draft write failed, to avoid repeating the notice
    /// on every keystroke.
    draft_write_failed: bool,
    signals: Vec<Signal>,
}

impl<S: Store> DraftFormModel<S> {
    /// Create a closed form on top of a storage backend.
    pub fn new(storage: Arc<S>, clock: Box<dyn Clock>) -> Self {
        Self::with_initial_type(storage, clock, WidgetType::default())
    }

    /// Create a closed form whose fresh state uses `initial_type`.
    pub fn with_initial_type(
        storage: Arc<S>,
        clock: Box<dyn Clock>,
        initial_type: WidgetType,
    ) -> Self {
        Self {
            storage,
            clock,
            initial_type,
            form: DraftForm::new(initial_type),
            phase: FormPhase::Closed,
            last_id: 0,
            draft_write_failed: false,
            signals: Vec::new(),
        }
    }

    /// Make sure generated ids are greater than `id`.
    pub fn seed_ids(&mut self, id: WidgetId) {
        self.last_id = self.last_id.max(id);
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    /// Current field values.
    pub fn form(&self) -> &DraftForm {
        &self.form
    }

    pub fn initial_type(&self) -> WidgetType {
        self.initial_type
    }

    /// Check if a draft is currently persisted.
    ///
    /// An unreadable store counts as having no draft.
    pub fn has_saved_draft(&self) -> bool {
        match self.storage.contains(WIDGET_FORM_DRAFT_KEY) {
            Ok(found) => found,
            Err(e) => {
                log::warn!("Cannot check for a widget draft: {}", e);
                false
            }
        }
    }

    /// Open the form, restoring a persisted draft if there is one.
    ///
    /// Opening a form that is already open does nothing.
    pub fn open(&mut self) -> FormPhase {
        if self.phase.is_open() {
            return self.phase;
        }

        match self.restore() {
            Some(form) => {
                log::info!("Restored widget draft \"{}\"", form.widget_name());
                self.form = form;
                self.phase = FormPhase::OpenRestored;
                self.signals.push(Signal::DraftRestored);
            }
            None => {
                self.form = DraftForm::new(self.initial_type);
                self.phase = FormPhase::OpenEmpty;
            }
        }
        self.phase
    }

    /// Edit one field and persist the draft.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        if !self.phase.is_open() {
            return Err(FormError::NotOpen);
        }

        self.form.apply(field, value)?;
        self.form.clear_error(field);
        self.phase = FormPhase::OpenEditing;
        self.persist();
        Ok(())
    }

    /// Select the widget type, resetting the payload to that type's default.
    pub fn select_type(&mut self, widget_type: WidgetType) -> Result<(), FormError> {
        self.set_field(FormField::WidgetType, widget_type.as_str())
    }

    /// Validate the form and, if valid, append a new widget to `widgets`.
    pub fn submit(&mut self, widgets: &WidgetStore<S>) -> Result<SubmitOutcome, FormError> {
        if !self.phase.is_open() {
            return Err(FormError::NotOpen);
        }
        self.phase = FormPhase::Submitting;

        let errors = self.form.validate();
        if !errors.is_empty() {
            log::debug!("Rejected submit: {} field error(s)", errors.len());
            self.form.set_errors(errors.clone());
            self.phase = FormPhase::OpenEditing;
            self.signals.push(Signal::ValidationFailed(errors.clone()));
            return Ok(SubmitOutcome::Invalid(errors));
        }

        let now = self.clock.now_millis();
        let id = self.next_id(now);
        let widget = match Widget::new(
            id,
            self.form.widget_name(),
            self.form.description(),
            format_timestamp(now),
            self.form.data(),
        ) {
            Ok(widget) => widget,
            Err(e) => {
                self.phase = FormPhase::OpenEditing;
                return Err(FormError::Serialization(e.to_string()));
            }
        };

        let appended = widgets.append(widget.clone());
        if appended.is_ok() {
            // The widget is durable, the draft has served its purpose
            if let Err(e) = self.storage.remove(WIDGET_FORM_DRAFT_KEY) {
                log::warn!("Failed to remove submitted draft: {}", e);
            }
        }

        log::info!("Created widget {} \"{}\"", widget.id, widget.widget_name);
        self.form = DraftForm::new(self.initial_type);
        self.phase = FormPhase::Closed;
        self.draft_write_failed = false;
        self.signals.push(Signal::WidgetCreated(widget.clone()));
        if let Err(e) = appended {
            // Keep the draft so the widget can be recreated after a reload
            self.signals.push(Signal::StorageFailed(e.to_string()));
        }
        Ok(SubmitOutcome::Created(widget))
    }

    /// Discard the draft, in memory and in storage.
    ///
    /// An open form stays open with default values.
    pub fn clear_draft(&mut self) {
        if let Err(e) = self.storage.remove(WIDGET_FORM_DRAFT_KEY) {
            log::error!("Failed to remove widget draft: {}", e);
            self.signals.push(Signal::StorageFailed(e.to_string()));
        }
        self.form = DraftForm::new(self.initial_type);
        if self.phase.is_open() {
            self.phase = FormPhase::OpenEmpty;
        }
        self.draft_write_failed = false;
        self.signals.push(Signal::DraftCleared);
    }

    /// Close the form without submitting. The persisted draft is kept.
    pub fn close(&mut self) {
        self.form.clear_errors();
        self.phase = FormPhase::Closed;
    }

    /// Drain queued signals, oldest first.
    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    fn next_id(&mut self, now: i64) -> WidgetId {
        let id = now.max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }

    fn restore(&self) -> Option<DraftForm> {
        let json = match self.storage.get(WIDGET_FORM_DRAFT_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Ignoring unreadable widget draft: {}", e);
                return None;
            }
        };

        match DraftForm::from_json(&json) {
            Ok(form) => Some(form),
            Err(e) => {
                log::warn!("Discarding malformed widget draft: {}", e);
                if let Err(e) = self.storage.remove(WIDGET_FORM_DRAFT_KEY) {
                    log::warn!("Failed to remove malformed widget draft: {}", e);
                }
                None
            }
        }
    }

    /// Write the draft, or remove it when nothing has been entered.
    fn persist(&mut self) {
        match self.write_draft() {
            Ok(()) => self.draft_write_failed = false,
            Err(e) => {
                log::error!("Failed to save widget draft: {}", e);
                if !self.draft_write_failed {
                    self.signals.push(Signal::StorageFailed(e.to_string()));
                }
                self.draft_write_failed = true;
            }
        }
    }

    fn write_draft(&self) -> StoreResult<()> {
        if self.form.is_pristine(self.initial_type) {
            return self.storage.remove(WIDGET_FORM_DRAFT_KEY);
        }
        let json = self
            .form
            .to_json()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        log::debug!("Saving widget draft ({} bytes)", json.len());
        self.storage.set(WIDGET_FORM_DRAFT_KEY, &json)
    }
}
