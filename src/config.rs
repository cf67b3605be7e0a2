//! Tunable game constants. Defaults mirror the shipped game; a page may pass a
//! JSON object to `start_quiz` overriding any subset of fields.

use serde::Deserialize;

use crate::error::QuizError;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Target number of questions per round.
    pub round_size: usize,
    /// Countdown length per question, in seconds.
    pub question_seconds: u32,
    pub hints_per_round: u32,
    pub skips_per_round: u32,
    /// Points added to the in-game counter for each correct answer.
    pub points_per_correct: u32,
    pub answer_reveal_delay_ms: u32,
    pub expiry_reveal_delay_ms: u32,
    pub toast_ms: u32,
    /// Pause between bank load and the start screen.
    pub loading_delay_ms: u32,
    pub questions_url: String,
    pub stats_key: String,
    pub difficulty_key: String,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_size: 10,
            question_seconds: 30,
            hints_per_round: 3,
            skips_per_round: 2,
            points_per_correct: 10,
            answer_reveal_delay_ms: 600,
            expiry_reveal_delay_ms: 500,
            toast_ms: 3000,
            loading_delay_ms: 800,
            questions_url: "questions.json".to_string(),
            stats_key: "autoQuizStats".to_string(),
            difficulty_key: "autoQuizDifficulty".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse an override object; absent fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, QuizError> {
        let cfg: GameConfig =
            serde_json::from_str(raw).map_err(|e| QuizError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        if self.round_size == 0 {
            return Err(QuizError::Config("round_size must be at least 1".into()));
        }
        if self.question_seconds == 0 {
            return Err(QuizError::Config("question_seconds must be at least 1".into()));
        }
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(QuizError::Config(format!("unknown log level '{}'", self.log_level)));
        }
        Ok(())
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
