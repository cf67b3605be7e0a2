//! Round state machine.
//!
//! `GameSession` owns everything that changes during a play-through and knows
//! nothing about the page. The browser adapter forwards clicks and countdown
//! ticks here, then redraws from the accessors. Every action either applies
//! completely or returns an [`ActionError`] and leaves the session untouched.
//!
//! Lifecycle: `Loading -> Idle -> Active(0..n) -> Finished -> Idle`.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::GameConfig;
use crate::error::ActionError;
use crate::feedback::{Feedback, feedback_for};
use crate::host::{EmbeddingHost, Haptic};
use crate::question::{Difficulty, Question};
use crate::sampler::sample_round;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Idle,
    Active,
    Finished,
}

/// How an answer option should be drawn and whether it accepts clicks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Enabled,
    /// Removed by a hint; dimmed and disabled.
    Eliminated,
    /// Question is over and this option carries no mark.
    Locked,
    Correct,
    Incorrect,
}

impl OptionState {
    pub fn is_interactive(self) -> bool {
        matches!(self, OptionState::Enabled)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionStatus {
    Open,
    Answered { choice: usize, correct: bool },
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStart {
    Started { questions: usize },
    /// Nothing to play; the session stays idle.
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_index: usize,
    pub points_awarded: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Running(u32),
    Expired,
    /// No countdown is live.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintOutcome {
    Eliminated(usize),
    Exhausted,
    /// Every wrong option is already gone; the hint was not spent.
    NothingToEliminate,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Question(usize),
    Finished(RoundSummary),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SkipOutcome {
    Skipped(Step),
    Exhausted,
}

/// Final numbers of a completed round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub difficulty: Difficulty,
    pub questions: usize,
    pub correct: u32,
    pub score: u32,
    pub percent: u32,
    pub hints_used: u32,
    pub elapsed_seconds: u32,
}

impl RoundSummary {
    pub fn feedback(&self) -> Feedback {
        feedback_for(self.percent)
    }
}

/// `round(correct / total * 100)`, zero for an empty round.
pub fn percent_of(correct: u32, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(correct) / total as f64 * 100.0).round() as u32
}

pub struct GameSession {
    rules: GameConfig,
    phase: Phase,
    difficulty: Difficulty,
    round: Vec<Question>,
    index: usize,
    score: u32,
    correct_count: u32,
    hints_remaining: u32,
    skips_remaining: u32,
    elapsed_seconds: u32,
    time_left: u32,
    countdown_live: bool,
    options: Vec<OptionState>,
    status: QuestionStatus,
    advance_visible: bool,
}

impl GameSession {
    pub fn new(rules: GameConfig, difficulty: Difficulty) -> Self {
        let hints = rules.hints_per_round;
        let skips = rules.skips_per_round;
        Self {
            rules,
            phase: Phase::Loading,
            difficulty,
            round: Vec::new(),
            index: 0,
            score: 0,
            correct_count: 0,
            hints_remaining: hints,
            skips_remaining: skips,
            elapsed_seconds: 0,
            time_left: 0,
            countdown_live: false,
            options: Vec::new(),
            status: QuestionStatus::Open,
            advance_visible: false,
        }
    }

    /// Question bank is in (or failed to load); the start screen may show.
    pub fn mark_loaded(&mut self) {
        if self.phase == Phase::Loading {
            self.phase = Phase::Idle;
        }
    }

    /// Takes effect at the next `start`.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Reset all round accumulators, sample a new round and present its first
    /// question.
    pub fn start<R: Rng + ?Sized>(&mut self, bank: &[Question], rng: &mut R) -> RoundStart {
        self.reset();
        self.round = sample_round(bank, self.difficulty, self.rules.round_size, rng);
        if self.round.is_empty() {
            log::warn!("no questions available for a {} round", self.difficulty.as_str());
            self.phase = Phase::Idle;
            return RoundStart::Empty;
        }
        log::info!(
            "round started: {} questions, difficulty {}",
            self.round.len(),
            self.difficulty.as_str()
        );
        self.phase = Phase::Active;
        self.present();
        RoundStart::Started { questions: self.round.len() }
    }

    fn reset(&mut self) {
        self.round.clear();
        self.index = 0;
        self.score = 0;
        self.correct_count = 0;
        self.hints_remaining = self.rules.hints_per_round;
        self.skips_remaining = self.rules.skips_per_round;
        self.elapsed_seconds = 0;
        self.time_left = 0;
        self.countdown_live = false;
        self.options.clear();
        self.status = QuestionStatus::Open;
        self.advance_visible = false;
    }

    fn present(&mut self) {
        let answers = self.round[self.index].answers.len();
        self.options = vec![OptionState::Enabled; answers];
        self.status = QuestionStatus::Open;
        self.time_left = self.rules.question_seconds;
        self.countdown_live = true;
        self.advance_visible = false;
    }

    fn open_question(&self) -> Result<&Question, ActionError> {
        if self.phase != Phase::Active {
            return Err(ActionError::NotActive);
        }
        if self.status != QuestionStatus::Open {
            return Err(ActionError::AlreadyAnswered);
        }
        Ok(&self.round[self.index])
    }

    pub fn select_answer(&mut self, choice: usize) -> Result<AnswerOutcome, ActionError> {
        let question = self.open_question()?;
        let state = self
            .options
            .get(choice)
            .copied()
            .ok_or(ActionError::NoSuchOption(choice))?;
        if !state.is_interactive() {
            return Err(ActionError::OptionDisabled(choice));
        }
        let correct = question.is_correct(choice);
        let correct_index = question.correct;

        self.countdown_live = false;
        let points_awarded = if correct {
            self.correct_count += 1;
            self.rules.points_per_correct
        } else {
            0
        };
        self.score += points_awarded;
        self.lock(Some(choice), correct_index);
        self.status = QuestionStatus::Answered { choice, correct };
        log::debug!("question {} answered: choice {choice}, correct {correct}", self.index);
        Ok(AnswerOutcome { correct, correct_index, points_awarded })
    }

    /// [`select_answer`](Self::select_answer) plus the host's success/error
    /// haptic. Rejected clicks send no signal.
    pub fn answer(&mut self, choice: usize, host: &dyn EmbeddingHost) -> Result<AnswerOutcome, ActionError> {
        let outcome = self.select_answer(choice)?;
        host.haptic(if outcome.correct { Haptic::Success } else { Haptic::Error });
        Ok(outcome)
    }

    /// Freeze all options and paint the marks. Hint eliminations stay dimmed.
    fn lock(&mut self, chosen: Option<usize>, correct_index: usize) {
        for (i, state) in self.options.iter_mut().enumerate() {
            *state = if i == correct_index {
                OptionState::Correct
            } else if Some(i) == chosen {
                OptionState::Incorrect
            } else if *state == OptionState::Eliminated {
                OptionState::Eliminated
            } else {
                OptionState::Locked
            };
        }
    }

    /// One second of countdown. Expiry locks the question like a wrong answer
    /// that marks nothing but the correct option.
    pub fn tick(&mut self) -> Tick {
        if !self.countdown_live || self.phase != Phase::Active {
            return Tick::Stopped;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.expire();
            Tick::Expired
        } else {
            Tick::Running(self.time_left)
        }
    }

    /// Time ran out on the current question.
    pub fn expire(&mut self) {
        let Ok(question) = self.open_question() else {
            return;
        };
        let correct_index = question.correct;
        self.countdown_live = false;
        self.time_left = 0;
        self.lock(None, correct_index);
        self.status = QuestionStatus::Expired;
        log::debug!("question {} expired", self.index);
    }

    fn ensure_active(&self) -> Result<(), ActionError> {
        if self.phase == Phase::Active { Ok(()) } else { Err(ActionError::NotActive) }
    }

    /// Exhaustion is reported even on an answered question.
    pub fn use_hint<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<HintOutcome, ActionError> {
        self.ensure_active()?;
        if self.hints_remaining == 0 {
            return Ok(HintOutcome::Exhausted);
        }
        let correct = self.open_question()?.correct;
        let candidates: Vec<usize> = self
            .options
            .iter()
            .enumerate()
            .filter(|(i, s)| *i != correct && s.is_interactive())
            .map(|(i, _)| i)
            .collect();
        let Some(&victim) = candidates.choose(rng) else {
            return Ok(HintOutcome::NothingToEliminate);
        };
        self.options[victim] = OptionState::Eliminated;
        self.hints_remaining -= 1;
        Ok(HintOutcome::Eliminated(victim))
    }

    pub fn use_skip(&mut self) -> Result<SkipOutcome, ActionError> {
        self.ensure_active()?;
        if self.skips_remaining == 0 {
            return Ok(SkipOutcome::Exhausted);
        }
        self.open_question()?;
        self.skips_remaining -= 1;
        self.countdown_live = false;
        log::debug!("question {} skipped", self.index);
        Ok(SkipOutcome::Skipped(self.next()))
    }

    /// Show the "next" button once the post-answer delay has passed. Returns
    /// false when the question is still open.
    pub fn reveal_advance(&mut self) -> bool {
        if self.phase == Phase::Active && self.status != QuestionStatus::Open {
            self.advance_visible = true;
        }
        self.advance_visible
    }

    /// Move past a locked question. Accepted once per question.
    pub fn advance(&mut self) -> Result<Step, ActionError> {
        if self.phase != Phase::Active {
            return Err(ActionError::NotActive);
        }
        if self.status == QuestionStatus::Open {
            return Err(ActionError::NotAnswered);
        }
        Ok(self.next())
    }

    fn next(&mut self) -> Step {
        self.elapsed_seconds += self.rules.question_seconds.saturating_sub(self.time_left);
        self.index += 1;
        if self.index >= self.round.len() {
            self.finish()
        } else {
            self.present();
            Step::Question(self.index)
        }
    }

    fn finish(&mut self) -> Step {
        self.phase = Phase::Finished;
        self.countdown_live = false;
        self.advance_visible = false;
        self.options.clear();
        let summary = self.summary();
        log::info!(
            "round finished: {}/{} correct ({}%), {} points",
            summary.correct,
            summary.questions,
            summary.percent,
            summary.score
        );
        Step::Finished(summary)
    }

    /// Back to the start screen, abandoning any round in progress.
    pub fn go_home(&mut self) {
        self.countdown_live = false;
        self.advance_visible = false;
        if self.phase != Phase::Loading {
            self.phase = Phase::Idle;
        }
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            difficulty: self.difficulty,
            questions: self.round.len(),
            correct: self.correct_count,
            score: self.score,
            percent: percent_of(self.correct_count, self.round.len()),
            hints_used: self.rules.hints_per_round - self.hints_remaining,
            elapsed_seconds: self.elapsed_seconds,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Active => self.round.get(self.index),
            _ => None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn round_len(&self) -> usize {
        self.round.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn hints_remaining(&self) -> u32 {
        self.hints_remaining
    }

    pub fn skips_remaining(&self) -> u32 {
        self.skips_remaining
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn question_seconds(&self) -> u32 {
        self.rules.question_seconds
    }

    pub fn countdown_live(&self) -> bool {
        self.countdown_live
    }

    pub fn options(&self) -> &[OptionState] {
        &self.options
    }

    pub fn status(&self) -> QuestionStatus {
        self.status
    }

    pub fn advance_visible(&self) -> bool {
        self.advance_visible
    }

    /// Progress bar fill, 0..=100.
    pub fn progress_percent(&self) -> f64 {
        match self.phase {
            Phase::Finished => 100.0,
            _ if self.round.is_empty() => 0.0,
            _ => self.index as f64 / self.round.len() as f64 * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(tag: &str, correct: usize) -> Question {
        Question {
            text: tag.to_string(),
            image: None,
            answers: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
            difficulty: Difficulty::Easy,
        }
    }

    fn started(n: usize) -> (GameSession, StdRng) {
        let bank: Vec<Question> = (0..n).map(|i| question(&format!("q{i}"), i % 4)).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let mut s = GameSession::new(GameConfig::default(), Difficulty::Easy);
        s.mark_loaded();
        assert_eq!(s.start(&bank, &mut rng), RoundStart::Started { questions: n.min(10) });
        (s, rng)
    }

    fn correct_of(s: &GameSession) -> usize {
        s.current_question().unwrap().correct
    }

    #[test]
    fn start_resets_and_presents_first_question() {
        let (s, _) = started(12);
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.round_len(), 10);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.time_left(), 30);
        assert!(s.countdown_live());
        assert_eq!(s.hints_remaining(), 3);
        assert_eq!(s.skips_remaining(), 2);
        assert!(s.options().iter().all(|o| o.is_interactive()));
        assert!(!s.advance_visible());
    }

    #[test]
    fn empty_bank_stays_idle() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = GameSession::new(GameConfig::default(), Difficulty::Hard);
        s.mark_loaded();
        assert_eq!(s.start(&[], &mut rng), RoundStart::Empty);
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.current_question().is_none());
    }

    #[test]
    fn correct_answer_scores_and_locks() {
        let (mut s, _) = started(3);
        let right = correct_of(&s);
        let out = s.select_answer(right).unwrap();
        assert!(out.correct);
        assert_eq!(out.points_awarded, 10);
        assert_eq!(s.score(), 10);
        assert_eq!(s.correct_count(), 1);
        assert!(!s.countdown_live());
        assert_eq!(s.options()[right], OptionState::Correct);
        assert!(s.options().iter().all(|o| !o.is_interactive()));
        assert_eq!(s.select_answer(right), Err(ActionError::AlreadyAnswered));
        assert_eq!(s.score(), 10);
    }

    #[test]
    fn wrong_answer_marks_both_options() {
        let (mut s, _) = started(3);
        let right = correct_of(&s);
        let wrong = (right + 1) % 4;
        let out = s.select_answer(wrong).unwrap();
        assert!(!out.correct);
        assert_eq!(out.correct_index, right);
        assert_eq!(s.score(), 0);
        assert_eq!(s.options()[wrong], OptionState::Incorrect);
        assert_eq!(s.options()[right], OptionState::Correct);
    }

    #[test]
    fn out_of_range_choice_is_rejected() {
        let (mut s, _) = started(2);
        assert_eq!(s.select_answer(9), Err(ActionError::NoSuchOption(9)));
        assert_eq!(s.status(), QuestionStatus::Open);
    }

    #[test]
    fn expiry_matches_wrong_answer_without_marking_a_choice() {
        let (mut s, _) = started(2);
        let right = correct_of(&s);
        for remaining in (1..30).rev() {
            assert_eq!(s.tick(), Tick::Running(remaining));
        }
        assert_eq!(s.tick(), Tick::Expired);
        assert_eq!(s.status(), QuestionStatus::Expired);
        assert_eq!(s.score(), 0);
        assert_eq!(s.tick(), Tick::Stopped);
        assert!(s.options().iter().all(|o| !o.is_interactive()));
        assert_eq!(s.options()[right], OptionState::Correct);
        assert!(!s.options().contains(&OptionState::Incorrect));
        assert!(s.reveal_advance());
    }

    #[test]
    fn advance_only_once_per_question() {
        let (mut s, _) = started(3);
        assert_eq!(s.advance(), Err(ActionError::NotAnswered));
        s.select_answer(0).unwrap();
        assert_eq!(s.advance(), Ok(Step::Question(1)));
        assert_eq!(s.advance(), Err(ActionError::NotAnswered));
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn elapsed_time_counts_used_seconds() {
        let (mut s, _) = started(2);
        for _ in 0..7 {
            s.tick();
        }
        s.select_answer(0).unwrap();
        // ticks after the lock do nothing
        assert_eq!(s.tick(), Tick::Stopped);
        s.advance().unwrap();
        assert_eq!(s.elapsed_seconds(), 7);
    }

    #[test]
    fn hint_removes_one_wrong_option() {
        let (mut s, mut rng) = started(2);
        let right = correct_of(&s);
        let HintOutcome::Eliminated(gone) = s.use_hint(&mut rng).unwrap() else {
            panic!("expected an elimination");
        };
        assert_ne!(gone, right);
        assert_eq!(s.options()[gone], OptionState::Eliminated);
        assert_eq!(s.hints_remaining(), 2);
        assert_eq!(s.select_answer(gone), Err(ActionError::OptionDisabled(gone)));
    }

    #[test]
    fn exhausted_hints_leave_options_alone() {
        let (mut s, mut rng) = started(2);
        for _ in 0..3 {
            assert!(matches!(s.use_hint(&mut rng), Ok(HintOutcome::Eliminated(_))));
        }
        // three wrong options are gone, so the next question is needed
        s.select_answer(correct_of(&s)).unwrap();
        s.advance().unwrap();
        let before = s.options().to_vec();
        assert_eq!(s.use_hint(&mut rng), Ok(HintOutcome::Exhausted));
        assert_eq!(s.options(), before.as_slice());
        assert_eq!(s.hints_remaining(), 0);
    }

    #[test]
    fn hint_not_spent_when_nothing_left_to_remove() {
        let bank = vec![Question {
            text: "two".into(),
            image: None,
            answers: vec!["yes".into(), "no".into()],
            correct: 0,
            difficulty: Difficulty::Easy,
        }];
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = GameSession::new(GameConfig::default(), Difficulty::Easy);
        s.start(&bank, &mut rng);
        assert_eq!(s.use_hint(&mut rng), Ok(HintOutcome::Eliminated(1)));
        assert_eq!(s.use_hint(&mut rng), Ok(HintOutcome::NothingToEliminate));
        assert_eq!(s.hints_remaining(), 2);
    }

    #[test]
    fn hint_rejected_after_answer() {
        let (mut s, mut rng) = started(2);
        s.select_answer(0).unwrap();
        assert_eq!(s.use_hint(&mut rng), Err(ActionError::AlreadyAnswered));
        assert_eq!(s.hints_remaining(), 3);
    }

    #[test]
    fn exhaustion_is_reported_on_an_answered_question() {
        let rules = GameConfig { hints_per_round: 0, skips_per_round: 0, ..GameConfig::default() };
        let bank: Vec<Question> = (0..3).map(|i| question(&format!("q{i}"), 1)).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = GameSession::new(rules, Difficulty::Easy);
        s.mark_loaded();
        s.start(&bank, &mut rng);
        s.select_answer(0).unwrap();
        assert_eq!(s.use_hint(&mut rng), Ok(HintOutcome::Exhausted));
        assert_eq!(s.use_skip(), Ok(SkipOutcome::Exhausted));
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn hint_and_skip_outside_a_round_are_rejected() {
        let mut s = GameSession::new(GameConfig::default(), Difficulty::Easy);
        s.mark_loaded();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(s.use_hint(&mut rng), Err(ActionError::NotActive));
        assert_eq!(s.use_skip(), Err(ActionError::NotActive));
    }

    #[derive(Default)]
    struct Buzzer(std::cell::RefCell<Vec<Haptic>>);

    impl EmbeddingHost for Buzzer {
        fn haptic(&self, signal: Haptic) {
            self.0.borrow_mut().push(signal);
        }
    }

    #[test]
    fn answers_buzz_the_host() {
        let (mut s, _) = started(3);
        let host = Buzzer::default();
        let right = correct_of(&s);
        assert!(s.answer(right, &host).unwrap().correct);
        assert_eq!(s.answer(right, &host), Err(ActionError::AlreadyAnswered));
        s.advance().unwrap();
        let wrong = (correct_of(&s) + 1) % 4;
        assert!(!s.answer(wrong, &host).unwrap().correct);
        assert_eq!(*host.0.borrow(), vec![Haptic::Success, Haptic::Error]);
    }

    #[test]
    fn skip_advances_without_scoring_until_exhausted() {
        let (mut s, _) = started(5);
        assert_eq!(s.use_skip(), Ok(SkipOutcome::Skipped(Step::Question(1))));
        assert_eq!(s.use_skip(), Ok(SkipOutcome::Skipped(Step::Question(2))));
        assert_eq!(s.use_skip(), Ok(SkipOutcome::Exhausted));
        assert_eq!(s.current_index(), 2);
        assert_eq!(s.score(), 0);
        assert_eq!(s.correct_count(), 0);
    }

    #[test]
    fn skipping_the_last_question_finishes() {
        let (mut s, _) = started(1);
        let Ok(SkipOutcome::Skipped(Step::Finished(summary))) = s.use_skip() else {
            panic!("expected the round to finish");
        };
        assert_eq!(summary.questions, 1);
        assert_eq!(summary.percent, 0);
        assert_eq!(s.phase(), Phase::Finished);
    }

    #[test]
    fn full_round_summary() {
        let (mut s, _) = started(10);
        let mut last = None;
        for i in 0..10 {
            let right = correct_of(&s);
            let pick = if i < 8 { right } else { (right + 1) % 4 };
            s.select_answer(pick).unwrap();
            s.reveal_advance();
            last = Some(s.advance().unwrap());
        }
        let Some(Step::Finished(summary)) = last else {
            panic!("round should be finished");
        };
        assert_eq!(summary.correct, 8);
        assert_eq!(summary.score, 80);
        assert_eq!(summary.percent, 80);
        assert_eq!(s.phase(), Phase::Finished);
        assert_eq!(s.progress_percent(), 100.0);
        assert_eq!(s.advance(), Err(ActionError::NotActive));
        s.go_home();
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(1, 8), 13);
        assert_eq!(percent_of(0, 0), 0);
        assert_eq!(percent_of(10, 10), 100);
    }
}
