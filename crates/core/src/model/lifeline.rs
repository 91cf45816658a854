use serde::{Deserialize, Serialize};
use std::fmt;

/// One-shot aids a player can spend during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifeline {
    /// Hides two incorrect options.
    FiftyFifty,
    /// Reveals the question's hint text.
    Hint,
    /// Moves on without scoring or penalty.
    Skip,
}

impl Lifeline {
    pub const ALL: [Lifeline; 3] = [Lifeline::FiftyFifty, Lifeline::Hint, Lifeline::Skip];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Lifeline::FiftyFifty => "fifty_fifty",
            Lifeline::Hint => "hint",
            Lifeline::Skip => "skip",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Lifeline::FiftyFifty => 0b001,
            Lifeline::Hint => 0b010,
            Lifeline::Skip => 0b100,
        }
    }
}

impl fmt::Display for Lifeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of lifelines spent so far. Entries are never removed during a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LifelineSet(u8);

impl LifelineSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, lifeline: Lifeline) -> bool {
        self.0 & lifeline.bit() != 0
    }

    /// Returns `false` if the lifeline was already present.
    pub fn insert(&mut self, lifeline: Lifeline) -> bool {
        let fresh = !self.contains(lifeline);
        self.0 |= lifeline.bit();
        fresh
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Lifeline> + '_ {
        Lifeline::ALL.into_iter().filter(|l| self.contains(*l))
    }

    /// Lifelines still available to the player.
    pub fn remaining(&self) -> impl Iterator<Item = Lifeline> + '_ {
        Lifeline::ALL.into_iter().filter(|l| !self.contains(*l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_first_use_only() {
        let mut set = LifelineSet::new();
        assert!(set.is_empty());
        assert!(set.insert(Lifeline::Hint));
        assert!(!set.insert(Lifeline::Hint));
        assert!(set.contains(Lifeline::Hint));
        assert!(!set.contains(Lifeline::Skip));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remaining_excludes_used() {
        let mut set = LifelineSet::new();
        set.insert(Lifeline::FiftyFifty);
        set.insert(Lifeline::Skip);
        assert_eq!(set.remaining().collect::<Vec<_>>(), vec![Lifeline::Hint]);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Lifeline::FiftyFifty, Lifeline::Skip]
        );
    }
}
