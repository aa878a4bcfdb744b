//! Dashwidget Core Library
//!
//! Platform-agnostic widget persistence, draft forms and dashboard state.

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod form;
pub mod signal;
pub mod storage;
pub mod view;
pub mod widget;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, EMPTY_STATE_MESSAGE};
pub use form::{DraftForm, DraftFormModel, FormError, FormErrors, FormField, FormPhase, SubmitOutcome};
pub use signal::{LogNotifier, Notifier, Signal};
pub use storage::{MemoryStore, PlatformStore, Store, StoreError, StoreResult};
pub use view::{RenderError, StatCard, WidgetCard, WidgetView};
pub use widget::{Widget, WidgetData, WidgetId, WidgetStore, WidgetType};
