use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

/// Points awarded for any correct answer before bonuses.
pub const BASE_POINTS: u32 = 100;

/// Bonus points per second left on the clock.
pub const TIME_BONUS_PER_SECOND: u32 = 2;

/// Smallest base for which every difficulty step still raises the rounded score.
///
/// Below this, medium and easy can round to the same value.
pub const MIN_BASE_POINTS: u32 = 3;

/// Difficulty multiplier expressed in tenths (1.0, 1.2, 1.5).
///
/// Working in tenths keeps round-half-up exact.
#[must_use]
pub fn multiplier_tenths(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 10,
        Difficulty::Medium => 12,
        Difficulty::Hard => 15,
    }
}

/// Computes points for a correct answer.
///
/// `points = round_half_up((base + seconds_left * bonus) * multiplier)`
///
/// # Examples
///
/// ```
/// # use trivia_core::scoring::ScoringPolicy;
/// # use trivia_core::model::Difficulty;
/// let policy = ScoringPolicy::default();
/// assert_eq!(policy.compute(10, Difficulty::Easy), 120);
/// assert_eq!(policy.compute(30, Difficulty::Hard), 240);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoringPolicy {
    base_points: u32,
    time_bonus_per_second: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_points: BASE_POINTS,
            time_bonus_per_second: TIME_BONUS_PER_SECOND,
        }
    }
}

impl ScoringPolicy {
    /// Builds a custom policy.
    ///
    /// Harder questions only pay strictly more when `base_points` is at least
    /// [`MIN_BASE_POINTS`]; configuration input is checked against that in
    /// `GameSettingsDraft::validate`.
    #[must_use]
    pub fn new(base_points: u32, time_bonus_per_second: u32) -> Self {
        Self {
            base_points,
            time_bonus_per_second,
        }
    }

    #[must_use]
    pub fn base_points(&self) -> u32 {
        self.base_points
    }

    #[must_use]
    pub fn time_bonus_per_second(&self) -> u32 {
        self.time_bonus_per_second
    }

    #[must_use]
    pub fn compute(&self, time_remaining: u32, difficulty: Difficulty) -> u32 {
        let raw = u64::from(self.base_points).saturating_add(
            u64::from(time_remaining).saturating_mul(u64::from(self.time_bonus_per_second)),
        );
        let tenths = raw.saturating_mul(u64::from(multiplier_tenths(difficulty)));
        u32::try_from(tenths.saturating_add(5) / 10).unwrap_or(u32::MAX)
    }
}

/// Points under the standard policy.
#[must_use]
pub fn compute(time_remaining: u32, difficulty: Difficulty) -> u32 {
    ScoringPolicy::default().compute(time_remaining, difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn easy_answer_with_ten_seconds_left() {
        assert_eq!(compute(10, Difficulty::Easy), 120);
    }

    #[test]
    fn multipliers_apply_to_base_and_bonus() {
        assert_eq!(compute(0, Difficulty::Easy), 100);
        assert_eq!(compute(0, Difficulty::Medium), 120);
        assert_eq!(compute(0, Difficulty::Hard), 150);
        assert_eq!(compute(30, Difficulty::Medium), 192);
    }

    #[test]
    fn halves_round_up() {
        // (1 + 0) * 1.5 = 1.5
        let policy = ScoringPolicy::new(1, 0);
        assert_eq!(policy.compute(0, Difficulty::Hard), 2);
        // (1 + 1) * 1.2 = 2.4
        let policy = ScoringPolicy::new(1, 1);
        assert_eq!(policy.compute(1, Difficulty::Medium), 2);
    }

    #[test]
    fn huge_inputs_saturate() {
        let policy = ScoringPolicy::new(u32::MAX, u32::MAX);
        assert_eq!(policy.compute(u32::MAX, Difficulty::Hard), u32::MAX);
    }

    proptest! {
        #[test]
        fn monotone_in_time_remaining(t in 0u32..30) {
            for difficulty in Difficulty::ALL {
                prop_assert!(compute(t, difficulty) <= compute(t + 1, difficulty));
            }
        }

        #[test]
        fn harder_questions_pay_more(t in 0u32..=30) {
            prop_assert!(compute(t, Difficulty::Hard) > compute(t, Difficulty::Medium));
            prop_assert!(compute(t, Difficulty::Medium) > compute(t, Difficulty::Easy));
        }

        #[test]
        fn difficulty_order_holds_from_min_base(
            base in MIN_BASE_POINTS..100_000,
            bonus in 0u32..100,
            t in 0u32..=300,
        ) {
            let policy = ScoringPolicy::new(base, bonus);
            prop_assert!(policy.compute(t, Difficulty::Hard) > policy.compute(t, Difficulty::Medium));
            prop_assert!(policy.compute(t, Difficulty::Medium) > policy.compute(t, Difficulty::Easy));
        }
    }
}
