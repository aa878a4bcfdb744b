//! Notifications emitted by the form model and the dashboard.
//!
//! Signals are fire-and-forget: models queue them, the host drains the
//! queue and hands each one to a [`Notifier`] (toast layer, console, ...).

use crate::form::FormErrors;
use crate::widget::{Widget, WidgetId};

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A persisted draft was loaded into the form.
    DraftRestored,
    /// A widget was created (and appended to the store, unless a
    /// [`Signal::StorageFailed`] accompanies it).
    WidgetCreated(Widget),
    /// Submit was rejected; carries the field errors.
    ValidationFailed(FormErrors),
    /// The draft was discarded on request.
    DraftCleared,
    /// A widget was removed from the dashboard.
    WidgetDeleted(WidgetId),
    /// A write was rejected; the change only lives in memory.
    StorageFailed(String),
}

impl Signal {
    /// Stable identifier, e.g. `"widget-created"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Signal::DraftRestored => "draft-restored",
            Signal::WidgetCreated(_) => "widget-created",
            Signal::ValidationFailed(_) => "validation-failed",
            Signal::DraftCleared => "draft-cleared",
            Signal::WidgetDeleted(_) => "widget-deleted",
            Signal::StorageFailed(_) => "storage-failed",
        }
    }

    /// Toast title.
    pub fn title(&self) -> &'static str {
        match self {
            Signal::DraftRestored => "Draft Restored",
            Signal::WidgetCreated(_) => "Widget Created",
            Signal::ValidationFailed(_) => "Validation Error",
            Signal::DraftCleared => "Draft Cleared",
            Signal::WidgetDeleted(_) => "Widget Deleted",
            Signal::StorageFailed(_) => "Storage Error",
        }
    }

    /// Toast description.
    pub fn description(&self) -> String {
        match self {
            Signal::DraftRestored => "Your previous widget draft has been restored.".to_string(),
            Signal::WidgetCreated(widget) => {
                format!("\"{}\" has been added to your dashboard.", widget.widget_name)
            }
            Signal::ValidationFailed(_) => "Please fill in all required fields.".to_string(),
            Signal::DraftCleared => "The form has been reset.".to_string(),
            Signal::WidgetDeleted(_) => "The widget has been removed successfully.".to_string(),
            Signal::StorageFailed(_) => {
                "Your changes could not be saved and will be lost on reload.".to_string()
            }
        }
    }
}

/// Receiver for signals.
pub trait Notifier {
    fn notify(&mut self, signal: &Signal);
}

/// Notifier that writes every signal to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, signal: &Signal) {
        match signal {
            Signal::StorageFailed(reason) => {
                log::error!("{}: {} ({})", signal.title(), signal.description(), reason)
            }
            _ => log::info!("{}: {}", signal.title(), signal.description()),
        }
    }
}

impl Notifier for Vec<Signal> {
    fn notify(&mut self, signal: &Signal) {
        self.push(signal.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let signals = [
            Signal::DraftRestored,
            Signal::ValidationFailed(FormErrors::new()),
            Signal::DraftCleared,
            Signal::WidgetDeleted(1),
            Signal::StorageFailed("quota".into()),
        ];
        let mut kinds: Vec<_> = signals.iter().map(Signal::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), signals.len());
    }

    #[test]
    fn test_delete_toast_text() {
        let signal = Signal::WidgetDeleted(7);
        assert_eq!(signal.title(), "Widget Deleted");
        assert_eq!(signal.description(), "The widget has been removed successfully.");
    }

    #[test]
    fn test_vec_collects_signals() {
        let mut sink: Vec<Signal> = Vec::new();
        sink.notify(&Signal::DraftCleared);
        assert_eq!(sink, vec![Signal::DraftCleared]);
    }
}
