//! Question records and the bank loaded from `questions.json`.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Value used in `data-difficulty` attributes and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == raw.trim())
    }

    /// Badge shown in the game header: (emoji, label).
    pub fn badge(self) -> (&'static str, &'static str) {
        match self {
            Difficulty::Easy => ("🟢", "Easy"),
            Difficulty::Medium => ("🟡", "Medium"),
            Difficulty::Hard => ("🔴", "Hard"),
        }
    }
}

/// One multiple-choice question. Field names follow the bank file format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub answers: Vec<String>,
    pub correct: usize,
    #[serde(rename = "level")]
    pub difficulty: Difficulty,
}

impl Question {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }

    fn problem(&self) -> Option<&'static str> {
        if self.answers.len() < 2 {
            Some("fewer than two answers")
        } else if self.correct >= self.answers.len() {
            Some("correct index out of range")
        } else {
            None
        }
    }
}

/// Letter prefix for an answer button: A, B, C ...
pub fn answer_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Parse the bank file. Unusable records are dropped with a warning rather
    /// than failing the whole load.
    pub fn from_json(raw: &str) -> Result<Self, QuizError> {
        let parsed: Vec<Question> = serde_json::from_str(raw).map_err(QuizError::BankFormat)?;
        let total = parsed.len();
        let questions: Vec<Question> = parsed
            .into_iter()
            .enumerate()
            .filter_map(|(i, q)| match q.problem() {
                Some(why) => {
                    log::warn!("dropping question #{i} ({why}): {}", q.text);
                    None
                }
                None => Some(q),
            })
            .collect();
        log::info!("question bank loaded: {} of {} usable", questions.len(), total);
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn count_for(&self, difficulty: Difficulty) -> usize {
        self.questions.iter().filter(|q| q.difficulty == difficulty).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"question": "Which brand makes the Corolla?", "answers": ["Honda", "Toyota", "Mazda"], "correct": 1, "level": "easy"},
        {"question": "Broken", "answers": ["Only one"], "correct": 0, "level": "easy"},
        {"question": "Out of range", "answers": ["a", "b"], "correct": 5, "level": "hard"},
        {"question": "Whose logo?", "image": "img/logo.png", "answers": ["BMW", "Audi"], "correct": 0, "level": "medium"}
    ]"#;

    #[test]
    fn parses_and_drops_invalid_records() {
        let bank = QuestionBank::from_json(SAMPLE).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.questions()[0].text, "Which brand makes the Corolla?");
        assert_eq!(bank.questions()[1].image.as_deref(), Some("img/logo.png"));
        assert_eq!(bank.count_for(Difficulty::Medium), 1);
        assert_eq!(bank.count_for(Difficulty::Hard), 0);
    }

    #[test]
    fn malformed_bank_is_an_error() {
        assert!(matches!(
            QuestionBank::from_json("{\"not\": \"a list\"}"),
            Err(QuizError::BankFormat(_))
        ));
    }

    #[test]
    fn difficulty_round_trips_through_its_label() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::parse(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::parse("extreme"), None);
        assert_eq!(Difficulty::Hard.badge(), ("🔴", "Hard"));
    }

    #[test]
    fn letters_start_at_a() {
        assert_eq!(answer_letter(0), 'A');
        assert_eq!(answer_letter(3), 'D');
    }
}
