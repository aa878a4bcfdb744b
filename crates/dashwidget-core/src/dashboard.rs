//! Dashboard shell: the widget list on screen and the creation form.

use crate::clock::Clock;
use crate::config::DashboardConfig;
use crate::form::{DraftFormModel, FormError, FormField, SubmitOutcome};
use crate::signal::{Notifier, Signal};
use crate::storage::Store;
use crate::view::{StatCard, WidgetCard};
use crate::widget::{Widget, WidgetId, WidgetStore, WidgetType};
use std::sync::Arc;

/// Message shown when no widgets exist.
pub const EMPTY_STATE_MESSAGE: &str =
    "No widgets created yet. Click the \"Create a new widget\" button to get started!";

/// Displayed dashboard state.
///
/// The widget list is loaded once at mount and then kept in step with the
/// form and delete actions, without re-reading the store.
pub struct Dashboard<S: Store> {
    store: WidgetStore<S>,
    form: DraftFormModel<S>,
    widgets: Vec<Widget>,
    stat_cards: Vec<StatCard>,
    signals: Vec<Signal>,
}

impl<S: Store> Dashboard<S> {
    /// Load the stored widgets and prepare a closed creation form.
    pub fn mount(storage: Arc<S>, config: &DashboardConfig, clock: Box<dyn Clock>) -> Self {
        let store = WidgetStore::new(storage.clone());
        let widgets = store.load_all();
        log::info!("Mounted dashboard with {} widget(s)", widgets.len());

        let mut form = DraftFormModel::with_initial_type(storage, clock, config.initial_widget_type);
        if let Some(max_id) = widgets.iter().map(|w| w.id).max() {
            form.seed_ids(max_id);
        }

        Self {
            store,
            form,
            widgets,
            stat_cards: config.stat_cards.clone(),
            signals: Vec::new(),
        }
    }

    /// Widgets in display order.
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Card views for every widget.
    pub fn cards(&self) -> Vec<WidgetCard> {
        self.widgets.iter().map(WidgetCard::from_widget).collect()
    }

    pub fn stat_cards(&self) -> &[StatCard] {
        &self.stat_cards
    }

    /// `"1 widget created"`, `"3 widgets created"`.
    pub fn widget_count_label(&self) -> String {
        let count = self.widgets.len();
        format!("{} widget{} created", count, if count == 1 { "" } else { "s" })
    }

    pub fn form(&self) -> &DraftFormModel<S> {
        &self.form
    }

    pub fn open_form(&mut self) {
        self.form.open();
        self.collect_form_signals();
    }

    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        let result = self.form.set_field(field, value);
        self.collect_form_signals();
        result
    }

    pub fn select_type(&mut self, widget_type: WidgetType) -> Result<(), FormError> {
        let result = self.form.select_type(widget_type);
        self.collect_form_signals();
        result
    }

    /// Submit the form. A created widget is added to the list right away.
    pub fn submit_form(&mut self) -> Result<SubmitOutcome, FormError> {
        let result = self.form.submit(&self.store);
        self.collect_form_signals();
        result
    }

    /// Close the form, keeping the draft.
    pub fn cancel_form(&mut self) {
        self.form.close();
    }

    pub fn clear_draft(&mut self) {
        self.form.clear_draft();
        self.collect_form_signals();
    }

    /// Delete a widget. Returns whether a widget was removed.
    ///
    /// Only the matching widget leaves the list, so widgets that live in
    /// this session alone (their write failed) stay visible. If the store
    /// rejects the write the widget is still removed for this session.
    pub fn delete_widget(&mut self, id: WidgetId) -> bool {
        let existed = self.widget(id).is_some();
        if let Err(e) = self.store.delete(id) {
            log::error!("Failed to delete widget {}: {}", id, e);
            self.signals.push(Signal::StorageFailed(e.to_string()));
        }
        self.widgets.retain(|w| w.id != id);

        if existed {
            self.signals.push(Signal::WidgetDeleted(id));
        }
        existed
    }

    /// Re-read the widget list from the store.
    pub fn reload(&mut self) {
        self.widgets = self.store.load_all();
    }

    /// Drain queued signals, oldest first.
    pub fn take_signals(&mut self) -> Vec<Signal> {
        self.collect_form_signals();
        std::mem::take(&mut self.signals)
    }

    /// Hand every queued signal to `notifier`.
    pub fn notify_all(&mut self, notifier: &mut dyn Notifier) {
        for signal in self.take_signals() {
            notifier.notify(&signal);
        }
    }

    fn collect_form_signals(&mut self) {
        for signal in self.form.take_signals() {
            if let Signal::WidgetCreated(widget) = &signal {
                self.widgets.push(widget.clone());
            }
            self.signals.push(signal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use crate::widget::{WidgetData, COMPLETED_WIDGETS_KEY};

    const NOW: i64 = 1_712_345_678_901;

    fn mount(storage: &Arc<MemoryStore>) -> Dashboard<MemoryStore> {
        Dashboard::mount(
            storage.clone(),
            &DashboardConfig::default(),
            Box::new(ManualClock::new(NOW)),
        )
    }

    fn create(dashboard: &mut Dashboard<MemoryStore>, name: &str) -> Widget {
        dashboard.open_form();
        dashboard.set_field(FormField::WidgetName, name).unwrap();
        dashboard.set_field(FormField::Description, "desc").unwrap();
        match dashboard.submit_form().unwrap() {
            SubmitOutcome::Created(widget) => widget,
            SubmitOutcome::Invalid(errors) => panic!("unexpected errors: {:?}", errors),
        }
    }

    #[test]
    fn test_mount_empty() {
        let dashboard = mount(&Arc::new(MemoryStore::new()));
        assert!(dashboard.widgets().is_empty());
        assert_eq!(dashboard.widget_count_label(), "0 widgets created");
        assert_eq!(dashboard.stat_cards(), StatCard::defaults().as_slice());
    }

    #[test]
    fn test_created_widget_appears_and_persists() {
        let storage = Arc::new(MemoryStore::new());
        let mut dashboard = mount(&storage);

        let widget = create(&mut dashboard, "Revenue");
        assert_eq!(dashboard.widgets(), &[widget.clone()]);
        assert_eq!(dashboard.widget_count_label(), "1 widget created");

        let signals = dashboard.take_signals();
        assert_eq!(signals, vec![Signal::WidgetCreated(widget.clone())]);

        // A new mount sees the same list
        let remounted = mount(&storage);
        assert_eq!(remounted.widgets(), &[widget]);
    }

    #[test]
    fn test_mount_seeds_ids_from_store() {
        let storage = Arc::new(MemoryStore::new());
        let existing = Widget::new(
            NOW + 50,
            "Later",
            "clock was ahead",
            "2024-04-05T19:34:38.951Z",
            &WidgetData::default_for(WidgetType::Chart),
        )
        .unwrap();
        WidgetStore::new(storage.clone()).append(existing).unwrap();

        let mut dashboard = mount(&storage);
        let created = create(&mut dashboard, "New");
        assert_eq!(created.id, NOW + 51);
    }

    #[test]
    fn test_delete_widget() {
        let storage = Arc::new(MemoryStore::new());
        let mut dashboard = mount(&storage);
        let first = create(&mut dashboard, "first");
        let second = create(&mut dashboard, "second");
        dashboard.take_signals();

        assert!(dashboard.delete_widget(first.id));
        assert_eq!(dashboard.widgets(), &[second.clone()]);
        assert_eq!(dashboard.take_signals(), vec![Signal::WidgetDeleted(first.id)]);

        // Unknown id: nothing removed, nothing announced
        assert!(!dashboard.delete_widget(first.id));
        assert!(dashboard.take_signals().is_empty());
        assert_eq!(mount(&storage).widgets(), &[second]);
    }

    #[test]
    fn test_delete_with_failing_store_updates_session() {
        let storage = Arc::new(MemoryStore::with_quota(1_000));
        let mut dashboard = mount(&storage);
        let widget = create(&mut dashboard, "big");
        dashboard.take_signals();

        // A damaged list too large to back up within the quota
        storage.set(COMPLETED_WIDGETS_KEY, &"x".repeat(600)).unwrap();

        assert!(dashboard.delete_widget(widget.id));
        assert!(dashboard.widgets().is_empty());
        let signals = dashboard.take_signals();
        assert!(matches!(
            signals.as_slice(),
            [Signal::StorageFailed(_), Signal::WidgetDeleted(_)]
        ));
    }

    #[test]
    fn test_delete_keeps_unsaved_widgets() {
        let storage = Arc::new(MemoryStore::with_quota(700));
        let mut dashboard = mount(&storage);
        let saved = create(&mut dashboard, "a");
        let unsaved = create(&mut dashboard, "b");
        assert!(matches!(
            dashboard.take_signals().as_slice(),
            [
                Signal::WidgetCreated(_),
                Signal::WidgetCreated(_),
                Signal::StorageFailed(_)
            ]
        ));

        assert!(dashboard.delete_widget(saved.id));
        assert_eq!(dashboard.widgets(), &[unsaved]);
        assert!(mount(&storage).widgets().is_empty());
    }

    #[test]
    fn test_corrupt_store_mounts_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(COMPLETED_WIDGETS_KEY, "[{").unwrap();

        let mut dashboard = mount(&storage);
        assert!(dashboard.widgets().is_empty());

        create(&mut dashboard, "fresh");
        assert_eq!(mount(&storage).widgets().len(), 1);
    }

    #[test]
    fn test_validation_failure_keeps_list() {
        let mut dashboard = mount(&Arc::new(MemoryStore::new()));
        dashboard.open_form();
        let outcome = dashboard.submit_form().unwrap();

        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert!(dashboard.widgets().is_empty());
        assert!(dashboard.form().is_open());
    }

    #[test]
    fn test_notify_all_forwards_in_order() {
        let mut dashboard = mount(&Arc::new(MemoryStore::new()));
        dashboard.open_form();
        dashboard.clear_draft();
        dashboard.delete_widget(1);

        let mut received: Vec<Signal> = Vec::new();
        dashboard.notify_all(&mut received);
        assert_eq!(received, vec![Signal::DraftCleared]);
        assert!(dashboard.take_signals().is_empty());
    }

    #[test]
    fn test_cards_follow_widgets() {
        let mut dashboard = mount(&Arc::new(MemoryStore::new()));
        create(&mut dashboard, "Revenue");

        let cards = dashboard.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Revenue");
        assert!(!cards[0].content.is_placeholder());
    }
}
