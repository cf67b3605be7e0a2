//! Browser adapter: binds the page, picks the host and store, loads the bank.

mod app;
mod dom;
mod platform;
pub mod storage;
mod telegram;

use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlElement, MouseEvent, window};

use self::app::{App, install, with_app};
use self::dom::{Dom, Screen, set_visible};
use crate::config::GameConfig;
use crate::error::QuizError;
use crate::host::{ColorScheme, EmbeddingHost, NoHost};
use crate::question::{Difficulty, QuestionBank};
use crate::stats::{MemoryStats, StatsStore};

pub fn start(config: GameConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let host: Box<dyn EmbeddingHost> = match telegram::TelegramHost::detect() {
        Some(tg) => {
            log::info!("running inside Telegram");
            Box::new(tg)
        }
        None => Box::new(NoHost),
    };
    host.ready();
    if host.color_scheme() == ColorScheme::Dark {
        if let Some(root) = doc.document_element() {
            root.set_attribute("data-theme", "dark")?;
        }
    }

    let store: Box<dyn StatsStore> = match storage::LocalStorageStats::open(&config.stats_key) {
        Ok(s) => Box::new(s),
        Err(e) => {
            log::warn!("{e}; stats will not survive a reload");
            Box::new(MemoryStats::default())
        }
    };
    let difficulty = storage::load_difficulty(&config.difficulty_key).unwrap_or_default();

    let dom = Dom::bind(doc, config.toast_ms)?;
    wire_events(&dom)?;
    dom.switch_screen(Screen::Loading);

    let url = config.questions_url.clone();
    let loading_delay = config.loading_delay_ms;
    let app = App::new(config, dom, store, host, difficulty);
    install(app);

    wasm_bindgen_futures::spawn_local(async move {
        match fetch_bank(&url).await {
            Ok(bank) => with_app(|app| app.bank_loaded(bank)),
            Err(e) => with_app(|app| app.bank_failed(&e.to_string())),
        }
        Timeout::new(loading_delay, || with_app(App::show_start)).forget();
    });
    Ok(())
}

async fn fetch_bank(url: &str) -> Result<QuestionBank, QuizError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| QuizError::Fetch(e.to_string()))?;
    if !resp.ok() {
        return Err(QuizError::Fetch(format!("HTTP {} for {url}", resp.status())));
    }
    let body = resp.text().await.map_err(|e| QuizError::Fetch(e.to_string()))?;
    QuestionBank::from_json(&body)
}

fn on_click(target: &EventTarget, handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut()>::new(handler);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_modal(open: &HtmlElement, close: &HtmlElement, modal: &HtmlElement) -> Result<(), JsValue> {
    let m = modal.clone();
    on_click(open, move || set_visible(&m, true, "flex"))?;
    let m = modal.clone();
    on_click(close, move || set_visible(&m, false, "flex"))
}

fn wire_events(dom: &Dom) -> Result<(), JsValue> {
    on_click(&dom.start_btn, || with_app(App::on_start))?;
    on_click(&dom.play_again_btn, || with_app(App::on_start))?;
    on_click(&dom.home_btn, || with_app(App::on_home))?;
    on_click(&dom.share_btn, || with_app(App::on_share))?;
    on_click(&dom.hint_btn, || with_app(App::on_hint))?;
    on_click(&dom.skip_btn, || with_app(App::on_skip))?;
    on_click(&dom.next_btn, || with_app(App::on_next))?;

    for btn in &dom.difficulty_btns {
        let Some(difficulty) = btn
            .get_attribute("data-difficulty")
            .and_then(|raw| Difficulty::parse(&raw))
        else {
            log::warn!("difficulty button without a valid data-difficulty");
            continue;
        };
        on_click(btn, move || with_app(|app| app.on_difficulty(difficulty)))?;
    }

    wire_modal(&dom.rules_btn, &dom.rules_close, &dom.rules_modal)?;
    wire_modal(&dom.about_btn, &dom.about_close, &dom.about_modal)?;

    // click on the dimmed backdrop closes whichever overlay it belongs to
    let backdrop = Closure::<dyn FnMut(MouseEvent)>::new(|evt: MouseEvent| {
        let Some(el) = evt.target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) else {
            return;
        };
        if el.class_list().contains("modal") {
            set_visible(&el, false, "flex");
        }
    });
    if let Some(win) = window() {
        win.add_event_listener_with_callback("click", backdrop.as_ref().unchecked_ref())?;
    }
    backdrop.forget();
    Ok(())
}
