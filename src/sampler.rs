//! Round sampling: prefer the chosen difficulty, pad from the rest of the bank.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::question::{Difficulty, Question};

/// Pick up to `target` questions for a round.
///
/// Matching questions come first; when there are fewer than `target` of them
/// the remainder is drawn at random from off-tier questions. The final order is
/// a uniform shuffle. A bank smaller than `target` yields a shorter round.
pub fn sample_round<R: Rng + ?Sized>(
    bank: &[Question],
    difficulty: Difficulty,
    target: usize,
    rng: &mut R,
) -> Vec<Question> {
    let (mut pool, mut others): (Vec<&Question>, Vec<&Question>) =
        bank.iter().partition(|q| q.difficulty == difficulty);

    pool.shuffle(rng);
    if pool.len() < target {
        let missing = target - pool.len();
        others.shuffle(rng);
        pool.extend(others.into_iter().take(missing));
        pool.shuffle(rng);
        log::debug!(
            "backfilled {} round to {} questions",
            difficulty.as_str(),
            pool.len()
        );
    }
    pool.truncate(target);
    pool.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn q(tag: &str, difficulty: Difficulty) -> Question {
        Question {
            text: tag.to_string(),
            image: None,
            answers: vec!["a".into(), "b".into(), "c".into()],
            correct: 0,
            difficulty,
        }
    }

    fn bank(easy: usize, medium: usize, hard: usize) -> Vec<Question> {
        let mut out = Vec::new();
        out.extend((0..easy).map(|i| q(&format!("e{i}"), Difficulty::Easy)));
        out.extend((0..medium).map(|i| q(&format!("m{i}"), Difficulty::Medium)));
        out.extend((0..hard).map(|i| q(&format!("h{i}"), Difficulty::Hard)));
        out
    }

    #[test]
    fn full_tier_needs_no_backfill() {
        let mut rng = StdRng::seed_from_u64(7);
        let round = sample_round(&bank(14, 5, 5), Difficulty::Easy, 10, &mut rng);
        assert_eq!(round.len(), 10);
        assert!(round.iter().all(|q| q.difficulty == Difficulty::Easy));
    }

    #[test]
    fn short_tier_is_backfilled_to_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let round = sample_round(&bank(2, 6, 6), Difficulty::Hard, 10, &mut rng);
        assert_eq!(round.len(), 10);
        // every hard question made it in
        assert_eq!(round.iter().filter(|q| q.difficulty == Difficulty::Hard).count(), 6);
    }

    #[test]
    fn small_bank_gives_short_round() {
        let mut rng = StdRng::seed_from_u64(3);
        let round = sample_round(&bank(1, 0, 0), Difficulty::Easy, 10, &mut rng);
        assert_eq!(round.len(), 1);
        assert_eq!(round[0].text, "e0");

        let round = sample_round(&bank(0, 2, 1), Difficulty::Easy, 10, &mut rng);
        assert_eq!(round.len(), 3);
    }

    #[test]
    fn empty_bank_gives_empty_round() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sample_round(&[], Difficulty::Medium, 10, &mut rng).is_empty());
    }

    #[test]
    fn no_question_repeats() {
        let mut rng = StdRng::seed_from_u64(42);
        let round = sample_round(&bank(3, 4, 4), Difficulty::Medium, 10, &mut rng);
        let mut texts: Vec<_> = round.iter().map(|q| q.text.as_str()).collect();
        texts.sort_unstable();
        texts.dedup();
        assert_eq!(texts.len(), round.len());
    }
}
