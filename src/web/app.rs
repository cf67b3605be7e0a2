//! Page controller: forwards DOM events and timer ticks into `GameSession`
//! and redraws from its state.

use std::cell::RefCell;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlButtonElement;

use super::dom::{Dom, Screen, ToastKind, logged, set_style, set_text, set_visible};
use super::platform::BrowserShare;
use super::storage;
use crate::config::GameConfig;
use crate::feedback::format_time;
use crate::error::ActionError;
use crate::host::EmbeddingHost;
use crate::question::{Difficulty, QuestionBank, answer_letter};
use crate::session::{GameSession, HintOutcome, OptionState, Phase, RoundStart, RoundSummary, SkipOutcome, Step, Tick};
use crate::share::{dispatch_share, share_text};
use crate::stats::{StatsRecord, StatsStore, record_round};

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

pub(crate) fn install(app: App) {
    APP.with(|cell| cell.replace(Some(app)));
}

/// Run `f` against the live app. Silently skipped before `install` or while
/// another handler holds the app.
pub(crate) fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut guard) => {
            if let Some(app) = guard.as_mut() {
                f(app);
            }
        }
        Err(_) => log::warn!("re-entrant event ignored"),
    });
}

/// Drop a timer handle after the current callback returns, so a timer never
/// frees its own closure mid-call.
fn drop_later<T: 'static>(value: T) {
    wasm_bindgen_futures::spawn_local(async move { drop(value) });
}

pub(crate) struct App {
    config: GameConfig,
    session: GameSession,
    bank: QuestionBank,
    dom: Dom,
    store: Box<dyn StatsStore>,
    host: Box<dyn EmbeddingHost>,
    countdown: Option<Interval>,
    reveal: Option<Timeout>,
    /// One slot per answer option; `None` where the button failed to render.
    answer_buttons: Vec<Option<HtmlButtonElement>>,
    answer_handlers: Vec<Closure<dyn FnMut()>>,
    last_summary: Option<RoundSummary>,
    stats: StatsRecord,
}

impl App {
    pub(crate) fn new(
        config: GameConfig,
        dom: Dom,
        store: Box<dyn StatsStore>,
        host: Box<dyn EmbeddingHost>,
        difficulty: Difficulty,
    ) -> Self {
        let stats = store.load();
        Self {
            stats,
            session: GameSession::new(config.clone(), difficulty),
            config,
            bank: QuestionBank::default(),
            dom,
            store,
            host,
            countdown: None,
            reveal: None,
            answer_buttons: Vec::new(),
            answer_handlers: Vec::new(),
            last_summary: None,
        }
    }

    pub(crate) fn bank_loaded(&mut self, bank: QuestionBank) {
        self.bank = bank;
        self.session.mark_loaded();
    }

    pub(crate) fn bank_failed(&mut self, reason: &str) {
        log::error!("question bank unavailable: {reason}");
        if let Some(win) = web_sys::window() {
            logged("alert", win.alert_with_message("Could not load the questions. Please reload the page."));
        }
        self.session.mark_loaded();
    }

    pub(crate) fn show_start(&mut self) {
        self.render_stats();
        self.render_difficulty();
        self.dom.switch_screen(Screen::Start);
    }

    // --- timers -------------------------------------------------------------

    fn stop_timers(&mut self) {
        self.countdown = None;
        self.reveal = None;
    }

    fn start_countdown(&mut self) {
        self.countdown = Some(Interval::new(1_000, || with_app(App::on_tick)));
    }

    fn schedule_reveal(&mut self, delay_ms: u32) {
        self.reveal = Some(Timeout::new(delay_ms, || {
            with_app(|app| {
                if app.session.reveal_advance() {
                    set_visible(&app.dom.next_btn, true, "inline-flex");
                }
            })
        }));
    }

    // --- handlers -----------------------------------------------------------

    pub(crate) fn on_start(&mut self) {
        if self.session.phase() == Phase::Loading {
            return;
        }
        self.stop_timers();
        match self.session.start(self.bank.questions(), &mut rand::thread_rng()) {
            RoundStart::Started { .. } => {
                self.last_summary = None;
                set_text(&self.dom.total_questions, self.session.round_len());
                self.render_difficulty();
                self.dom.switch_screen(Screen::Game);
                self.present();
            }
            RoundStart::Empty => {
                self.dom.toast("No questions available", ToastKind::Error);
                self.show_start();
            }
        }
    }

    fn on_tick(&mut self) {
        match self.session.tick() {
            Tick::Running(left) => self.dom.set_timer(left, self.session.question_seconds()),
            Tick::Expired => {
                self.dom.set_timer(0, self.session.question_seconds());
                if let Some(handle) = self.countdown.take() {
                    drop_later(handle);
                }
                self.render_options();
                self.schedule_reveal(self.config.expiry_reveal_delay_ms);
            }
            Tick::Stopped => {
                if let Some(handle) = self.countdown.take() {
                    drop_later(handle);
                }
            }
        }
    }

    fn on_answer(&mut self, choice: usize) {
        match self.session.answer(choice, self.host.as_ref()) {
            Ok(_) => {
                self.countdown = None;
                self.render_options();
                set_text(&self.dom.current_score, self.session.score());
                self.schedule_reveal(self.config.answer_reveal_delay_ms);
            }
            Err(e) => log::debug!("answer ignored: {e}"),
        }
    }

    pub(crate) fn on_hint(&mut self) {
        match self.session.use_hint(&mut rand::thread_rng()) {
            Ok(HintOutcome::Eliminated(_)) => {
                self.render_options();
                set_text(&self.dom.hints_left, self.session.hints_remaining());
            }
            Ok(HintOutcome::Exhausted) => self.dom.toast("No hints left", ToastKind::Warning),
            Ok(HintOutcome::NothingToEliminate) => {
                self.dom.toast("Nothing left to remove", ToastKind::Info)
            }
            Err(e) => self.rejected(e),
        }
    }

    pub(crate) fn on_skip(&mut self) {
        match self.session.use_skip() {
            Ok(SkipOutcome::Skipped(step)) => {
                set_text(&self.dom.skips_left, self.session.skips_remaining());
                self.after_step(step);
            }
            Ok(SkipOutcome::Exhausted) => self.dom.toast("No skips left", ToastKind::Warning),
            Err(e) => self.rejected(e),
        }
    }

    /// Notice for a hint or skip the session refused.
    fn rejected(&self, e: ActionError) {
        log::debug!("action ignored: {e}");
        let text = match e {
            ActionError::NotActive => "No round in progress",
            _ => "This question is already answered",
        };
        self.dom.toast(text, ToastKind::Info);
    }

    pub(crate) fn on_next(&mut self) {
        match self.session.advance() {
            Ok(step) => self.after_step(step),
            Err(e) => log::debug!("advance ignored: {e}"),
        }
    }

    fn after_step(&mut self, step: Step) {
        self.stop_timers();
        match step {
            Step::Question(_) => self.present(),
            Step::Finished(summary) => self.finish(summary),
        }
    }

    fn finish(&mut self, summary: RoundSummary) {
        set_style(&self.dom.progress_fill, "width", "100%");
        match record_round(self.store.as_mut(), summary.percent) {
            Ok(stats) => self.stats = stats,
            Err(e) => {
                log::error!("stats not saved: {e}");
                self.dom.toast("Could not save your statistics", ToastKind::Error);
            }
        }
        self.last_summary = Some(summary);
        self.render_result(&summary);
        self.dom.switch_screen(Screen::Result);
    }

    pub(crate) fn on_home(&mut self) {
        self.stop_timers();
        self.session.go_home();
        self.show_start();
    }

    pub(crate) fn on_difficulty(&mut self, difficulty: Difficulty) {
        if self.session.phase() == Phase::Active {
            return;
        }
        self.session.set_difficulty(difficulty);
        storage::save_difficulty(&self.config.difficulty_key, difficulty);
        self.render_difficulty();
    }

    pub(crate) fn on_share(&mut self) {
        let Some(summary) = self.last_summary else {
            return;
        };
        let platform = BrowserShare::new(self.dom.toaster.clone());
        dispatch_share(self.host.as_ref(), &platform, &share_text(summary.percent));
    }

    // --- rendering ----------------------------------------------------------

    fn present(&mut self) {
        let Some(question) = self.session.current_question().cloned() else {
            return;
        };
        let dom = &self.dom;
        set_text(&dom.current_question, self.session.current_index() + 1);
        set_style(&dom.progress_fill, "width", &format!("{}%", self.session.progress_percent()));
        set_text(&dom.current_score, self.session.score());
        set_text(&dom.hints_left, self.session.hints_remaining());
        set_text(&dom.skips_left, self.session.skips_remaining());
        set_text(&dom.question_text, &question.text);
        match &question.image {
            Some(src) => {
                dom.q_img.set_src(src);
                set_visible(&dom.question_image, true, "block");
            }
            None => set_visible(&dom.question_image, false, "block"),
        }

        dom.answers.set_inner_html("");
        self.answer_buttons.clear();
        self.answer_handlers.clear();
        for (i, text) in question.answers.iter().enumerate() {
            match self.dom.new_answer_button(answer_letter(i), text) {
                Ok(btn) => {
                    let handler = Closure::<dyn FnMut()>::new(move || with_app(|app| app.on_answer(i)));
                    btn.set_onclick(Some(handler.as_ref().unchecked_ref()));
                    self.answer_buttons.push(Some(btn));
                    self.answer_handlers.push(handler);
                }
                Err(e) => {
                    log::error!("could not render answer {i}: {e:?}");
                    self.answer_buttons.push(None);
                }
            }
        }

        set_visible(&self.dom.timer_container, true, "flex");
        self.dom.set_timer(self.session.time_left(), self.session.question_seconds());
        set_visible(&self.dom.next_btn, false, "inline-flex");
        self.start_countdown();
    }

    fn render_options(&self) {
        for (slot, state) in self.answer_buttons.iter().zip(self.session.options()) {
            let Some(btn) = slot else {
                continue;
            };
            btn.set_disabled(!state.is_interactive());
            let classes = btn.class_list();
            logged("answer classes", classes.remove_2("correct", "incorrect"));
            match state {
                OptionState::Correct => logged("answer classes", classes.add_1("correct")),
                OptionState::Incorrect => logged("answer classes", classes.add_1("incorrect")),
                OptionState::Eliminated => set_style(btn, "opacity", "0.4"),
                OptionState::Enabled | OptionState::Locked => {}
            }
        }
    }

    fn render_stats(&self) {
        let stats = &self.stats;
        set_text(&self.dom.best_score, stats.best);
        set_text(&self.dom.games_played, stats.games);
        set_text(&self.dom.avg_score, stats.avg);
    }

    fn render_difficulty(&self) {
        let current = self.session.difficulty();
        for btn in &self.dom.difficulty_btns {
            let selected = btn
                .get_attribute("data-difficulty")
                .and_then(|raw| Difficulty::parse(&raw))
                == Some(current);
            logged("difficulty button", btn.class_list().toggle_with_force("active", selected));
        }
        let (emoji, label) = current.badge();
        self.dom.difficulty_badge.set_inner_html(&format!(
            "<span class=\"difficulty-emoji\">{emoji}</span><span class=\"difficulty-text\">{label}</span>"
        ));
    }

    fn render_result(&self, summary: &RoundSummary) {
        let dom = &self.dom;
        let feedback = summary.feedback();
        set_text(&dom.final_score, summary.score);
        set_text(&dom.correct_answers, format!("{}/{}", summary.correct, summary.questions));
        set_text(&dom.hints_used, summary.hints_used);
        set_text(&dom.time_spent, format_time(summary.elapsed_seconds));
        set_text(&dom.result_emoji, feedback.icon);
        set_text(&dom.result_title, feedback.title);
        set_text(&dom.result_message, feedback.message);
    }
}
