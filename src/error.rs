use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures outside the round state machine: loading, storage, DOM wiring.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("question bank request failed: {0}")]
    Fetch(String),
    #[error("question bank is malformed: {0}")]
    BankFormat(serde_json::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("browser storage unavailable")]
    StorageUnavailable,
    #[error("storage write failed: {0}")]
    Storage(String),
    #[error("dom: {0}")]
    Dom(String),
}

impl From<QuizError> for JsValue {
    fn from(err: QuizError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// A game action arrived in a state where it is not allowed. State is left
/// untouched whenever one of these is returned.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("no round is in progress")]
    NotActive,
    #[error("the current question is already answered")]
    AlreadyAnswered,
    #[error("the current question is still open")]
    NotAnswered,
    #[error("answer option {0} does not exist")]
    NoSuchOption(usize),
    #[error("answer option {0} is disabled")]
    OptionDisabled(usize),
}
