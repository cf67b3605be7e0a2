//! Browser share sheet and clipboard, reached through `navigator`.
//! Both are looked up dynamically because support varies per browser.

use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};

use super::dom::{ToastKind, Toaster, logged};
use crate::share::PlatformShare;

pub struct BrowserShare {
    toaster: Toaster,
}

impl BrowserShare {
    pub fn new(toaster: Toaster) -> Self {
        Self { toaster }
    }
}

fn navigator_method(name: &str) -> Option<(JsValue, Function)> {
    let navigator: JsValue = web_sys::window()?.navigator().into();
    let method = Reflect::get(&navigator, &JsValue::from_str(name)).ok()?;
    method.dyn_into::<Function>().ok().map(|f| (navigator, f))
}

fn clipboard_write_text() -> Option<(JsValue, Function)> {
    let navigator: JsValue = web_sys::window()?.navigator().into();
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard")).ok()?;
    if clipboard.is_undefined() {
        return None;
    }
    let write = Reflect::get(&clipboard, &JsValue::from_str("writeText")).ok()?;
    write.dyn_into::<Function>().ok().map(|f| (clipboard, f))
}

impl PlatformShare for BrowserShare {
    fn native_share(&self, title: &str, text: &str) -> bool {
        let Some((navigator, share)) = navigator_method("share") else {
            return false;
        };
        let data = Object::new();
        logged("share data", Reflect::set(&data, &"title".into(), &title.into()));
        logged("share data", Reflect::set(&data, &"text".into(), &text.into()));
        match share.call1(&navigator, &data) {
            Ok(promise) => {
                spawn_local(async move {
                    // rejected when the user dismisses the sheet
                    if let Err(e) = JsFuture::from(Promise::from(promise)).await {
                        log::debug!("share sheet closed: {e:?}");
                    }
                });
                true
            }
            Err(e) => {
                log::debug!("navigator.share threw: {e:?}");
                false
            }
        }
    }

    fn copy_to_clipboard(&self, text: &str) {
        let toaster = self.toaster.clone();
        let Some((clipboard, write)) = clipboard_write_text() else {
            toaster.show("Copying is not supported here", ToastKind::Error);
            return;
        };
        let promise = match write.call1(&clipboard, &JsValue::from_str(text)) {
            Ok(p) => Promise::from(p),
            Err(e) => {
                log::warn!("clipboard write threw: {e:?}");
                toaster.show("Could not copy the result", ToastKind::Error);
                return;
            }
        };
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => toaster.show("Copied", ToastKind::Success),
                Err(e) => {
                    log::warn!("clipboard write rejected: {e:?}");
                    toaster.show("Could not copy the result", ToastKind::Error);
                }
            }
        });
    }
}
