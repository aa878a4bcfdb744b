//! Durable list of completed widgets.

use super::{Widget, WidgetId};
use crate::storage::{Store, StoreError, StoreResult};
use serde_json::Value;
use std::sync::Arc;

/// Key holding the serialized widget list.
pub const COMPLETED_WIDGETS_KEY: &str = "completed_widgets";

/// Key receiving an unparseable widget list before it is overwritten.
pub const CORRUPT_WIDGETS_KEY: &str = "completed_widgets.corrupt";

/// Owns the persisted list of completed widgets.
///
/// Every operation reads and/or writes the whole list. That is fine for
/// dashboard-sized lists; it does not scale to thousands of widgets.
pub struct WidgetStore<S: Store> {
    storage: Arc<S>,
}

impl<S: Store> Clone for WidgetStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: Store> WidgetStore<S> {
    /// Create a widget store on top of a storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Load every widget.
    ///
    /// A missing entry is an empty list. An entry that cannot be parsed is
    /// logged and also treated as empty, so a damaged store never takes
    /// the dashboard down.
    pub fn load_all(&self) -> Vec<Widget> {
        match self.try_load_all() {
            Ok(widgets) => widgets,
            Err(e) => {
                log::warn!("Ignoring unreadable widget list: {}", e);
                Vec::new()
            }
        }
    }

    /// Load every widget, reporting a damaged entry as an error.
    ///
    /// Individual records that cannot be decoded are skipped.
    pub fn try_load_all(&self) -> StoreResult<Vec<Widget>> {
        let Some(json) = self.storage.get(COMPLETED_WIDGETS_KEY)? else {
            return Ok(Vec::new());
        };
        parse_list(&json).map(|(widgets, _)| widgets)
    }

    /// Append a widget and persist the full list.
    ///
    /// The caller guarantees that `widget.id` is not already present.
    pub fn append(&self, widget: Widget) -> StoreResult<()> {
        let mut widgets = self.load_for_update()?;
        log::debug!("Appending widget {} ({})", widget.id, widget.widget_type);
        widgets.push(widget);
        self.write(&widgets)
    }

    /// Delete the widget with `id` and return the remaining list.
    ///
    /// Deleting an id that is not present leaves the list unchanged.
    pub fn delete(&self, id: WidgetId) -> StoreResult<Vec<Widget>> {
        let mut widgets = self.load_for_update()?;
        let before = widgets.len();
        widgets.retain(|w| w.id != id);
        if widgets.len() == before {
            log::debug!("Widget {} not found, nothing to delete", id);
        }
        self.write(&widgets)?;
        Ok(widgets)
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Read the list for a read-modify-write.
    ///
    /// An entry that is unparseable, or holds records that do not decode,
    /// is copied to [`CORRUPT_WIDGETS_KEY`] before the caller replaces it.
    fn load_for_update(&self) -> StoreResult<Vec<Widget>> {
        let Some(json) = self.storage.get(COMPLETED_WIDGETS_KEY)? else {
            return Ok(Vec::new());
        };
        match parse_list(&json) {
            Ok((widgets, 0)) => Ok(widgets),
            Ok((widgets, skipped)) => {
                log::warn!(
                    "Backing up widget list to {} before dropping {} undecodable record(s)",
                    CORRUPT_WIDGETS_KEY,
                    skipped
                );
                self.storage.set(CORRUPT_WIDGETS_KEY, &json)?;
                Ok(widgets)
            }
            Err(e) => {
                log::warn!(
                    "Widget list is unreadable ({}); backing it up to {}",
                    e,
                    CORRUPT_WIDGETS_KEY
                );
                self.storage.set(CORRUPT_WIDGETS_KEY, &json)?;
                Ok(Vec::new())
            }
        }
    }

    fn write(&self, widgets: &[Widget]) -> StoreResult<()> {
        let json = serde_json::to_string(widgets)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.storage.set(COMPLETED_WIDGETS_KEY, &json).inspect_err(|e| {
            log::error!("Failed to persist {} widgets: {}", widgets.len(), e);
        })
    }
}

/// Parse a serialized list, skipping records that do not decode.
///
/// Returns the decoded widgets and the number of records skipped.
fn parse_list(json: &str) -> StoreResult<(Vec<Widget>, usize)> {
    let records: Vec<Value> =
        serde_json::from_str(json).map_err(|e| StoreError::read(COMPLETED_WIDGETS_KEY, e))?;

    let mut widgets = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Widget>(record) {
            Ok(widget) => widgets.push(widget),
            Err(e) => {
                log::warn!("Skipping widget record {}: {}", index, e);
                skipped += 1;
            }
        }
    }
    Ok((widgets, skipped))
}
