use rand::seq::SliceRandom;
use screenbudget_common::Tier;

/// One curated challenge template: question, answer, and the minutes it
/// pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankEntry {
    pub question: &'static str,
    pub answer: i64,
    pub reward_minutes: i64,
}

const EASY: &[BankEntry] = &[
    BankEntry { question: "7 + 8 = ?", answer: 15, reward_minutes: 5 },
    BankEntry { question: "15 - 6 = ?", answer: 9, reward_minutes: 5 },
    BankEntry { question: "4 × 3 = ?", answer: 12, reward_minutes: 6 },
    BankEntry { question: "18 ÷ 6 = ?", answer: 3, reward_minutes: 6 },
    BankEntry { question: "9 + 7 = ?", answer: 16, reward_minutes: 5 },
    BankEntry { question: "20 - 11 = ?", answer: 9, reward_minutes: 5 },
];

const MEDIUM: &[BankEntry] = &[
    BankEntry { question: "23 + 47 = ?", answer: 70, reward_minutes: 8 },
    BankEntry { question: "84 - 29 = ?", answer: 55, reward_minutes: 8 },
    BankEntry { question: "12 × 7 = ?", answer: 84, reward_minutes: 9 },
    BankEntry { question: "144 ÷ 12 = ?", answer: 12, reward_minutes: 9 },
    BankEntry { question: "38 + 56 = ?", answer: 94, reward_minutes: 8 },
    BankEntry { question: "100 - 67 = ?", answer: 33, reward_minutes: 8 },
];

const HARD: &[BankEntry] = &[
    BankEntry { question: "156 + 289 = ?", answer: 445, reward_minutes: 12 },
    BankEntry { question: "500 - 247 = ?", answer: 253, reward_minutes: 12 },
    BankEntry { question: "23 × 18 = ?", answer: 414, reward_minutes: 15 },
    BankEntry { question: "2880 ÷ 24 = ?", answer: 120, reward_minutes: 15 },
    BankEntry { question: "347 + 678 = ?", answer: 1025, reward_minutes: 12 },
    BankEntry { question: "1000 - 456 = ?", answer: 544, reward_minutes: 12 },
];

fn pool(tier: Tier) -> &'static [BankEntry] {
    match tier {
        Tier::Easy => EASY,
        Tier::Medium => MEDIUM,
        Tier::Hard => HARD,
    }
}

/// Draw one entry uniformly at random for the tier. The canonical offline
/// fallback: never fails, never calls out.
pub fn draw(tier: Tier) -> BankEntry {
    let entries = pool(tier);
    *entries.choose(&mut rand::thread_rng()).expect("bank pools are non-empty")
}

/// Documented reward range per tier, used by validation and tests.
pub fn reward_range(tier: Tier) -> (i64, i64) {
    match tier {
        Tier::Easy => (5, 6),
        Tier::Medium => (8, 9),
        Tier::Hard => (12, 15),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    #[test]
    fn pools_have_at_least_six_entries() {
        for tier in TIERS {
            assert!(pool(tier).len() >= 6, "{} pool too small", tier);
        }
    }

    #[test]
    fn pools_cover_all_four_operations() {
        for tier in TIERS {
            for op in ["+", "-", "×", "÷"] {
                assert!(
                    pool(tier).iter().any(|e| e.question.contains(op)),
                    "{} pool missing {}",
                    tier,
                    op
                );
            }
        }
    }

    #[test]
    fn rewards_stay_in_documented_range() {
        for tier in TIERS {
            let (lo, hi) = reward_range(tier);
            for _ in 0..50 {
                let entry = draw(tier);
                assert!(
                    entry.reward_minutes >= lo && entry.reward_minutes <= hi,
                    "{} reward {} outside {}..={}",
                    tier,
                    entry.reward_minutes,
                    lo,
                    hi
                );
            }
        }
    }

    #[test]
    fn answers_match_their_questions() {
        // Spot-check the arithmetic so a typo in the pool cannot ship.
        assert!(EASY.iter().any(|e| e.question == "7 + 8 = ?" && e.answer == 15));
        assert!(MEDIUM.iter().any(|e| e.question == "144 ÷ 12 = ?" && e.answer == 12));
        assert!(HARD.iter().any(|e| e.question == "23 × 18 = ?" && e.answer == 414));
    }
}
