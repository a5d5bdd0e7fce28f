use crate::{Card, Move, PlayerId, Suit, TeamId};

/// The error type for proposing a move.
///
/// Always recoverable: the state is left untouched and the reason is
/// surfaced to whoever proposed the move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidMove {
    /// The game is not in the playing phase.
    NotPlaying,
    NotYourTurn { player: PlayerId },
    CardNotInHand { card: Card },
    /// Holding the led suit forces playing it.
    MustFollowSuit { lead: Suit },
    /// Void in the led suit but holding trump forces playing trump.
    MustPlayTrump { trump: Suit },
    /// The team already sang this suit this round.
    CanteAlreadyDeclared { suit: Suit },
    /// Rey + Sota of the suit are not both in hand.
    CanteCardsMissing { suit: Suit },
    /// Cantes and the trump-7 exchange are only available right after the
    /// player's own team took a trick.
    NotAfterWonTrick,
    /// Cantes and the trump-7 exchange happen before leading, not mid-trick.
    NotAtTrickStart,
    TrumpSevenNotInHand,
    /// The draw pile is exhausted, so the revealed trump card is gone.
    ExchangeWindowClosed,
}

impl std::error::Error for InvalidMove {}

impl std::fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidMove::NotPlaying => write!(f, "No moves are accepted in this phase"),
            InvalidMove::NotYourTurn { player } => {
                write!(f, "It is not player {}'s turn", player)
            }
            InvalidMove::CardNotInHand { card } => {
                write!(f, "Tried to play {}, which is not in the player's hand", card)
            }
            InvalidMove::MustFollowSuit { lead } => {
                write!(f, "A card of the led suit ({:?}) must be played", lead)
            }
            InvalidMove::MustPlayTrump { trump } => {
                write!(f, "Void in the led suit, so a trump ({:?}) must be played", trump)
            }
            InvalidMove::CanteAlreadyDeclared { suit } => {
                write!(f, "The team already declared a cante in {:?} this round", suit)
            }
            InvalidMove::CanteCardsMissing { suit } => {
                write!(f, "A cante in {:?} needs both the Rey and the Sota in hand", suit)
            }
            InvalidMove::NotAfterWonTrick => {
                write!(f, "Only allowed right after the player's team won a trick")
            }
            InvalidMove::NotAtTrickStart => {
                write!(f, "Only allowed before leading the next trick")
            }
            InvalidMove::TrumpSevenNotInHand => {
                write!(f, "The trump 7 is not in the player's hand")
            }
            InvalidMove::ExchangeWindowClosed => {
                write!(f, "The draw pile is exhausted, the trump card can no longer be exchanged")
            }
        }
    }
}

/// The error type for a structurally broken [`GameState`](crate::GameState).
///
/// Fatal for that state instance: the engine refuses to proceed and the
/// owner should request a fresh authoritative snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorruptState {
    /// A card appears in zero or in more than one of: a hand, the deck,
    /// the current trick, a captured pile.
    CardPartitionViolated { card: Card },
    /// `current_turn` points at a seat with no cards while playing.
    EmptyHandOnTurn { player: PlayerId },
    OversizedTrick { len: usize },
    /// The revealed trump card disagrees with the trump suit.
    TrumpCardMismatch,
    /// Cards are only ever drawn four at a time, so a reachable draw pile
    /// holds a multiple of 4 cards.
    UnbalancedDeck { len: usize },
    /// Hands shrink in lockstep; seats that already played to the current
    /// trick hold one card less than those still to play.
    UnevenHands { sizes: [usize; 4] },
    /// A team score the captured cards and declared cantes cannot explain.
    InconsistentScore { team: TeamId },
    /// A snapshot that could not be decoded at all.
    Undecodable { reason: String },
    /// The validator and a selector disagree about legality; structurally
    /// impossible unless the state is broken.
    NoLegalMoves { player: PlayerId },
}

impl std::error::Error for CorruptState {}

impl std::fmt::Display for CorruptState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorruptState::CardPartitionViolated { card } => {
                write!(f, "Card {} is not in exactly one place", card)
            }
            CorruptState::EmptyHandOnTurn { player } => {
                write!(f, "Player {} is on turn with an empty hand", player)
            }
            CorruptState::OversizedTrick { len } => {
                write!(f, "The current trick holds {} plays", len)
            }
            CorruptState::TrumpCardMismatch => {
                write!(f, "The revealed trump card is not of the trump suit")
            }
            CorruptState::UnbalancedDeck { len } => {
                write!(f, "The draw pile holds {} cards, not a multiple of 4", len)
            }
            CorruptState::UnevenHands { sizes } => {
                write!(f, "Hand sizes {:?} are inconsistent with the current trick", sizes)
            }
            CorruptState::InconsistentScore { team } => {
                write!(f, "Team {}'s score does not match its captured cards and cantes", team)
            }
            CorruptState::Undecodable { reason } => {
                write!(f, "The snapshot could not be decoded: {}", reason)
            }
            CorruptState::NoLegalMoves { player } => {
                write!(f, "No legal move exists for player {}", player)
            }
        }
    }
}

/// The error type for applying an authoritative move during reconciliation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// An authoritative move does not validate against the local confirmed
    /// state. All optimistic predictions have been discarded.
    IllegalReplay { mv: Move, reason: InvalidMove },
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::IllegalReplay { reason, .. } => Some(reason),
        }
    }
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::IllegalReplay { mv, .. } => {
                write!(f, "Authoritative move {:?} does not apply to the confirmed state", mv)
            }
        }
    }
}
