//! Auto Quiz core crate.
//!
//! Timed multiple-choice rounds over a car-themed question bank. The round
//! logic (`session`, `sampler`, `stats`, ...) is plain Rust and runs under a
//! native `cargo test`; the `web` adapter binds it to the page and is only
//! compiled for wasm32.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod feedback;
pub mod host;
pub mod logging;
pub mod question;
pub mod sampler;
pub mod session;
pub mod share;
pub mod stats;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::GameConfig;
pub use error::{ActionError, QuizError};
pub use question::{Difficulty, Question, QuestionBank};
pub use session::{GameSession, Phase, RoundSummary, Step};
pub use stats::{StatsRecord, StatsStore};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

/// Page entrypoint. `config_json` may override any `GameConfig` field.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_quiz(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(raw) => GameConfig::from_json(raw)?,
        None => GameConfig::default(),
    };
    logging::init(config.level_filter());
    web::start(config)
}
