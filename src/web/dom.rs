//! Element handles for the quiz page and small DOM helpers.
//!
//! The markup is owned by `index.html`; every id looked up here must exist or
//! startup fails with `QuizError::Dom`.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlImageElement};

use crate::error::QuizError;

/// Circumference of the countdown ring, in SVG user units.
const RING_LENGTH: f64 = 283.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Start,
    Game,
    Result,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Warning,
    Success,
    Error,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Warning => "warning",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

/// Transient notices stacked in `#toast-container`.
#[derive(Clone)]
pub struct Toaster {
    document: Document,
    container: Element,
    duration_ms: u32,
}

impl Toaster {
    pub fn show(&self, text: &str, kind: ToastKind) {
        let Ok(div) = self.document.create_element("div") else {
            return;
        };
        div.set_class_name(&format!("toast {}", kind.class()));
        div.set_text_content(Some(text));
        if self.container.append_child(&div).is_err() {
            return;
        }
        Timeout::new(self.duration_ms, move || div.remove()).forget();
    }
}

pub struct Dom {
    pub document: Document,
    screens: [(Screen, HtmlElement); 4],

    pub best_score: HtmlElement,
    pub games_played: HtmlElement,
    pub avg_score: HtmlElement,
    pub start_btn: HtmlElement,
    pub difficulty_btns: Vec<Element>,

    pub current_question: HtmlElement,
    pub total_questions: HtmlElement,
    pub current_score: HtmlElement,
    pub progress_fill: HtmlElement,
    pub difficulty_badge: HtmlElement,
    pub question_text: HtmlElement,
    pub question_image: HtmlElement,
    pub q_img: HtmlImageElement,
    pub answers: HtmlElement,
    pub hint_btn: HtmlElement,
    pub skip_btn: HtmlElement,
    pub next_btn: HtmlElement,
    pub hints_left: HtmlElement,
    pub skips_left: HtmlElement,
    pub timer_container: HtmlElement,
    pub timer_progress: Element,
    pub timer_text: HtmlElement,

    pub final_score: HtmlElement,
    pub correct_answers: HtmlElement,
    pub time_spent: HtmlElement,
    pub hints_used: HtmlElement,
    pub result_emoji: HtmlElement,
    pub result_title: HtmlElement,
    pub result_message: HtmlElement,
    pub play_again_btn: HtmlElement,
    pub share_btn: HtmlElement,
    pub home_btn: HtmlElement,

    pub rules_modal: HtmlElement,
    pub about_modal: HtmlElement,
    pub rules_btn: HtmlElement,
    pub about_btn: HtmlElement,
    pub rules_close: HtmlElement,
    pub about_close: HtmlElement,

    pub toaster: Toaster,
}

fn by_id<T: JsCast>(doc: &Document, id: &str) -> Result<T, QuizError> {
    doc.get_element_by_id(id)
        .ok_or_else(|| QuizError::Dom(format!("missing #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| QuizError::Dom(format!("#{id} has an unexpected element type")))
}

impl Dom {
    pub fn bind(document: Document, toast_ms: u32) -> Result<Self, QuizError> {
        let doc = &document;
        let mut difficulty_btns = Vec::new();
        let list = doc
            .query_selector_all(".difficulty-btn")
            .map_err(|_| QuizError::Dom("bad selector .difficulty-btn".into()))?;
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                difficulty_btns.push(el);
            }
        }

        let toaster = Toaster {
            document: document.clone(),
            container: by_id(doc, "toast-container")?,
            duration_ms: toast_ms,
        };

        Ok(Self {
            screens: [
                (Screen::Loading, by_id(doc, "loading-screen")?),
                (Screen::Start, by_id(doc, "start-screen")?),
                (Screen::Game, by_id(doc, "game-screen")?),
                (Screen::Result, by_id(doc, "result-screen")?),
            ],
            best_score: by_id(doc, "best-score")?,
            games_played: by_id(doc, "games-played")?,
            avg_score: by_id(doc, "avg-score")?,
            start_btn: by_id(doc, "start-btn")?,
            difficulty_btns,
            current_question: by_id(doc, "current-question")?,
            total_questions: by_id(doc, "total-questions")?,
            current_score: by_id(doc, "current-score")?,
            progress_fill: by_id(doc, "progress-fill")?,
            difficulty_badge: by_id(doc, "current-difficulty")?,
            question_text: by_id(doc, "question-text")?,
            question_image: by_id(doc, "question-image")?,
            q_img: by_id(doc, "q-img")?,
            answers: by_id(doc, "answers-container")?,
            hint_btn: by_id(doc, "hint-btn")?,
            skip_btn: by_id(doc, "skip-btn")?,
            next_btn: by_id(doc, "next-btn")?,
            hints_left: by_id(doc, "hints-left")?,
            skips_left: by_id(doc, "skips-left")?,
            timer_container: by_id(doc, "timer-container")?,
            timer_progress: by_id(doc, "timer-progress")?,
            timer_text: by_id(doc, "timer-text")?,
            final_score: by_id(doc, "final-score")?,
            correct_answers: by_id(doc, "correct-answers")?,
            time_spent: by_id(doc, "time-spent")?,
            hints_used: by_id(doc, "hints-used")?,
            result_emoji: by_id(doc, "result-emoji")?,
            result_title: by_id(doc, "result-title")?,
            result_message: by_id(doc, "result-message")?,
            play_again_btn: by_id(doc, "play-again-btn")?,
            share_btn: by_id(doc, "share-btn")?,
            home_btn: by_id(doc, "home-btn")?,
            rules_modal: by_id(doc, "rules-modal")?,
            about_modal: by_id(doc, "about-modal")?,
            rules_btn: by_id(doc, "rules-btn")?,
            about_btn: by_id(doc, "about-btn")?,
            rules_close: by_id(doc, "rules-close")?,
            about_close: by_id(doc, "about-close")?,
            toaster,
            document,
        })
    }

    pub fn switch_screen(&self, target: Screen) {
        for (screen, el) in &self.screens {
            let classes = el.class_list();
            logged("screen switch", if *screen == target { classes.add_1("active") } else { classes.remove_1("active") });
        }
    }

    pub fn toast(&self, text: &str, kind: ToastKind) {
        self.toaster.show(text, kind);
    }

    pub fn set_timer(&self, left: u32, total: u32) {
        set_text(&self.timer_text, left);
        let offset = RING_LENGTH * (1.0 - f64::from(left) / f64::from(total.max(1)));
        logged(
            "timer ring",
            self.timer_progress
                .set_attribute("style", &format!("stroke-dashoffset: {offset}")),
        );
    }

    pub fn new_answer_button(&self, letter: char, text: &str) -> Result<HtmlButtonElement, JsValue> {
        let btn: HtmlButtonElement = self.document.create_element("button")?.dyn_into()?;
        btn.set_class_name("answer-btn");
        let badge = self.document.create_element("span")?;
        badge.set_class_name("answer-letter");
        badge.set_text_content(Some(&letter.to_string()));
        btn.append_child(&badge)?;
        btn.append_with_str_1(&format!(" {text}"))?;
        self.answers.append_child(&btn)?;
        Ok(btn)
    }
}

/// Log a failed DOM call at debug level; rendering carries on.
pub fn logged<T>(what: &str, result: Result<T, JsValue>) {
    if let Err(e) = result {
        log::debug!("{what} failed: {e:?}");
    }
}

pub fn set_text(el: &Element, value: impl ToString) {
    el.set_text_content(Some(&value.to_string()));
}

pub fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    logged("style", el.style().set_property(prop, value));
}

pub fn set_visible(el: &HtmlElement, visible: bool, display: &str) {
    set_style(el, "display", if visible { display } else { "none" });
}
