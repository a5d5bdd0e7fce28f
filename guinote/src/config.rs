use serde::{Deserialize, Serialize};

/// Rule variant knobs, fixed at engine construction.
///
/// There is deliberately no `Default` impl: whether suit-following is
/// enforced during the draw phase differs between Guiñote tables, so the
/// caller has to say which variant is being played. Vueltas (after the deck
/// runs out) are always strict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Enforce suit-following during the draw phase (not only in vueltas).
    pub strict_suit_following: bool,
    /// Cumulative score a team needs for victory, checked at round
    /// boundaries only.
    pub winning_threshold: u32,
    /// Bonus credited to the team that wins the final trick of a round.
    pub last_trick_bonus: u32,
}

impl GameConfig {
    /// The documented Guiñote baseline: 101 points to win, 10 for the last
    /// trick ("diez de últimas").
    pub fn new(strict_suit_following: bool) -> Self {
        Self {
            strict_suit_following,
            winning_threshold: 101,
            last_trick_bonus: 10,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.winning_threshold == 0 {
            return Err(InvalidConfig::ZeroWinningThreshold);
        }
        Ok(())
    }
}

/// The error type for [`GameConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidConfig {
    ZeroWinningThreshold,
}

impl std::error::Error for InvalidConfig {}

impl std::fmt::Display for InvalidConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidConfig::ZeroWinningThreshold => {
                write!(f, "The winning threshold must be at least 1")
            }
        }
    }
}
