//! WebAssembly entry point and browser binding.

use dashwidget_core::form::FormField;
use dashwidget_core::storage::{create_default_store, LocalStorage};
use dashwidget_core::{
    Dashboard, DashboardConfig, LogNotifier, Notifier, Signal, SubmitOutcome, SystemClock,
    WidgetType,
};
use serde_json::{json, Map, Value};
use wasm_bindgen::prelude::*;

/// Dashboard over the page's `localStorage`.
///
/// Every mutating call flushes queued signals to the handler registered
/// with `setSignalHandler`, or to the console when there is none.
#[wasm_bindgen]
pub struct WasmDashboard {
    dashboard: Dashboard<LocalStorage>,
    handler: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl WasmDashboard {
    /// Mount the dashboard. `config` is an optional JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<WasmDashboard, JsError> {
        let config = match config {
            Some(json) => DashboardConfig::from_json(&json)?,
            None => DashboardConfig::default(),
        };
        let storage = create_default_store()?;
        Ok(Self {
            dashboard: Dashboard::mount(storage, &config, Box::new(SystemClock)),
            handler: None,
        })
    }

    /// Register `handler(kind, title, description)` for signals.
    #[wasm_bindgen(js_name = setSignalHandler)]
    pub fn set_signal_handler(&mut self, handler: js_sys::Function) {
        self.handler = Some(handler);
    }

    #[wasm_bindgen(js_name = openForm)]
    pub fn open_form(&mut self) {
        self.dashboard.open_form();
        self.flush();
    }

    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), JsError> {
        let field: FormField = field.parse()?;
        let result = self.dashboard.set_field(field, value);
        self.flush();
        Ok(result?)
    }

    #[wasm_bindgen(js_name = selectType)]
    pub fn select_type(&mut self, widget_type: &str) -> Result<(), JsError> {
        let widget_type: WidgetType = widget_type.parse()?;
        let result = self.dashboard.select_type(widget_type);
        self.flush();
        Ok(result?)
    }

    /// Submit the form. Returns `true` if a widget was created.
    pub fn submit(&mut self) -> Result<bool, JsError> {
        let outcome = self.dashboard.submit_form();
        self.flush();
        Ok(matches!(outcome?, SubmitOutcome::Created(_)))
    }

    #[wasm_bindgen(js_name = cancelForm)]
    pub fn cancel_form(&mut self) {
        self.dashboard.cancel_form();
        self.flush();
    }

    #[wasm_bindgen(js_name = clearDraft)]
    pub fn clear_draft(&mut self) {
        self.dashboard.clear_draft();
        self.flush();
    }

    /// Ids are millisecond timestamps, well within `f64` precision.
    #[wasm_bindgen(js_name = deleteWidget)]
    pub fn delete_widget(&mut self, id: f64) -> bool {
        let removed = self.dashboard.delete_widget(id as i64);
        self.flush();
        removed
    }

    #[wasm_bindgen(js_name = countLabel)]
    pub fn count_label(&self) -> String {
        self.dashboard.widget_count_label()
    }

    #[wasm_bindgen(js_name = widgetsJson)]
    pub fn widgets_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(self.dashboard.widgets())?)
    }

    #[wasm_bindgen(js_name = cardsJson)]
    pub fn cards_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.dashboard.cards())?)
    }

    #[wasm_bindgen(js_name = statCardsJson)]
    pub fn stat_cards_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(self.dashboard.stat_cards())?)
    }

    /// Phase, field values and errors of the form.
    #[wasm_bindgen(js_name = formJson)]
    pub fn form_json(&self) -> String {
        let model = self.dashboard.form();
        let form = model.form();

        let mut fields = Map::new();
        for field in FormField::fields_for(form.widget_type()) {
            if let Some(text) = form.field_text(field) {
                fields.insert(field.name().to_string(), Value::String(text));
            }
        }
        let errors: Map<String, Value> = form
            .errors()
            .iter()
            .map(|(field, message)| (field.name().to_string(), Value::String(message.clone())))
            .collect();

        json!({
            "phase": format!("{:?}", model.phase()),
            "open": model.is_open(),
            "widgetType": form.widget_type(),
            "fields": fields,
            "errors": errors,
        })
        .to_string()
    }

    fn flush(&mut self) {
        for signal in self.dashboard.take_signals() {
            match &self.handler {
                Some(handler) => notify_js(handler, &signal),
                None => LogNotifier.notify(&signal),
            }
        }
    }
}

fn notify_js(handler: &js_sys::Function, signal: &Signal) {
    let result = handler.call3(
        &JsValue::NULL,
        &JsValue::from_str(signal.kind()),
        &JsValue::from_str(signal.title()),
        &JsValue::from_str(&signal.description()),
    );
    if let Err(e) = result {
        log::warn!("Signal handler threw for {}: {:?}", signal.kind(), e);
    }
}

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logger unavailable: {}", e)));
    }

    log::info!("Starting dashwidget (WASM)");
}
