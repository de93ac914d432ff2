use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use course_core::model::{Difficulty, QuestionBank, QuestionRecord};

/// Relative weights for drawing basic, intermediate and advanced questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyMix {
    pub basic: u32,
    pub intermediate: u32,
    pub advanced: u32,
}

impl Default for DifficultyMix {
    fn default() -> Self {
        Self {
            basic: 40,
            intermediate: 45,
            advanced: 15,
        }
    }
}

impl DifficultyMix {
    #[must_use]
    pub const fn new(basic: u32, intermediate: u32, advanced: u32) -> Self {
        Self {
            basic,
            intermediate,
            advanced,
        }
    }

    /// Split `count` across tiers: basic and intermediate are rounded, advanced
    /// takes the remainder.
    ///
    /// A mix whose weights sum to zero puts everything in the advanced tier.
    #[must_use]
    pub fn split(&self, count: usize) -> [(Difficulty, usize); 3] {
        let total =
            u128::from(self.basic) + u128::from(self.intermediate) + u128::from(self.advanced);
        let share = |weight: u32| -> usize {
            if total == 0 {
                return 0;
            }
            // Widened so huge counts cannot overflow; rounds half up.
            let count = count as u128;
            let rounded = (2 * count * u128::from(weight) + total) / (2 * total);
            usize::try_from(rounded).unwrap_or(usize::MAX)
        };
        let basic = share(self.basic).min(count);
        let intermediate = share(self.intermediate).min(count - basic);
        let advanced = count - basic - intermediate;
        [
            (Difficulty::Basic, basic),
            (Difficulty::Intermediate, intermediate),
            (Difficulty::Advanced, advanced),
        ]
    }
}

/// Draw up to `count` distinct questions from `bank` following `mix`.
///
/// - Each difficulty tier is shuffled and truncated to its share.
/// - Shortfalls (a tier with too few questions, or untagged questions) are
///   filled from the rest of the bank in random order.
/// - The final list is shuffled.
///
/// Returns fewer than `count` questions only when the bank is smaller.
pub fn sample_questions<R: Rng + ?Sized>(
    bank: &QuestionBank,
    count: usize,
    mix: DifficultyMix,
    rng: &mut R,
) -> Vec<QuestionRecord> {
    let mut picked: Vec<usize> = Vec::with_capacity(count.min(bank.len()));
    let mut taken = HashSet::new();

    for (difficulty, share) in mix.split(count) {
        let mut tier: Vec<usize> = bank
            .iter()
            .enumerate()
            .filter(|(_, question)| question.difficulty() == Some(difficulty))
            .map(|(index, _)| index)
            .collect();
        tier.shuffle(rng);
        for index in tier.into_iter().take(share) {
            taken.insert(index);
            picked.push(index);
        }
    }

    if picked.len() < count {
        let mut rest: Vec<usize> = (0..bank.len()).filter(|index| !taken.contains(index)).collect();
        rest.shuffle(rng);
        let missing = count - picked.len();
        picked.extend(rest.into_iter().take(missing));
    }

    picked.shuffle(rng);
    picked
        .into_iter()
        .filter_map(|index| bank.get(index).cloned())
        .collect()
}
