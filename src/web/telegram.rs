//! Telegram WebApp bridge (`window.Telegram.WebApp`).

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::host::{ColorScheme, EmbeddingHost, Haptic};
use crate::share::SHARE_TITLE;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, Debug)]
    pub type WebApp;

    #[wasm_bindgen(method, catch)]
    fn ready(this: &WebApp) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn expand(this: &WebApp) -> Result<(), JsValue>;

    #[wasm_bindgen(method, getter, js_name = colorScheme)]
    fn color_scheme(this: &WebApp) -> Option<String>;

    #[wasm_bindgen(method, getter, js_name = HapticFeedback)]
    fn haptic_feedback(this: &WebApp) -> HapticFeedback;

    #[wasm_bindgen(method, catch, js_name = showPopup)]
    fn show_popup(this: &WebApp, params: &JsValue, callback: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = sendData)]
    fn send_data(this: &WebApp, data: &str) -> Result<(), JsValue>;

    pub type HapticFeedback;

    #[wasm_bindgen(method, catch, js_name = notificationOccurred)]
    fn notification_occurred(this: &HapticFeedback, kind: &str) -> Result<(), JsValue>;
}

#[derive(Serialize)]
struct PopupButton<'a> {
    id: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Serialize)]
struct PopupParams<'a> {
    title: &'a str,
    message: &'a str,
    buttons: [PopupButton<'a>; 2],
}

const SHARE_BUTTON: &str = "share";

pub struct TelegramHost {
    app: WebApp,
}

impl TelegramHost {
    /// Present when the Telegram web-app script is loaded on the page.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let telegram = js_sys::Reflect::get(&window, &JsValue::from_str("Telegram")).ok()?;
        if telegram.is_undefined() || telegram.is_null() {
            return None;
        }
        let app = js_sys::Reflect::get(&telegram, &JsValue::from_str("WebApp")).ok()?;
        if app.is_undefined() || app.is_null() {
            return None;
        }
        Some(Self { app: app.unchecked_into() })
    }
}

impl EmbeddingHost for TelegramHost {
    fn is_embedded(&self) -> bool {
        true
    }

    fn ready(&self) {
        if let Err(e) = self.app.ready().and_then(|_| self.app.expand()) {
            log::warn!("host handshake failed: {e:?}");
        }
    }

    fn color_scheme(&self) -> ColorScheme {
        self.app.color_scheme().map(|s| ColorScheme::parse(&s)).unwrap_or_default()
    }

    fn haptic(&self, signal: Haptic) {
        if let Err(e) = self.app.haptic_feedback().notification_occurred(signal.as_str()) {
            log::debug!("haptic feedback unavailable: {e:?}");
        }
    }

    fn share(&self, text: &str) -> bool {
        let params = PopupParams {
            title: SHARE_TITLE,
            message: text,
            buttons: [
                PopupButton { id: SHARE_BUTTON, kind: None, text: Some("Send") },
                PopupButton { id: "cancel", kind: Some("cancel"), text: None },
            ],
        };
        let params = match serde_json::to_string(&params)
            .map_err(|e| JsValue::from_str(&e.to_string()))
            .and_then(|json| js_sys::JSON::parse(&json))
        {
            Ok(p) => p,
            Err(e) => {
                log::warn!("could not build share popup: {e:?}");
                return false;
            }
        };

        let app = self.app.clone();
        let payload = text.to_string();
        let on_close = Closure::once_into_js(move |button: JsValue| {
            if button.as_string().as_deref() == Some(SHARE_BUTTON) {
                if let Err(e) = app.send_data(&payload) {
                    log::warn!("host rejected shared result: {e:?}");
                }
            }
        });
        match self.app.show_popup(&params, on_close.unchecked_ref()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("share popup failed: {e:?}");
                false
            }
        }
    }
}
