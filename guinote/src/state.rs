use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::{full_deck, Card, CardsSet, CorruptState, Difficulty, GameConfig, InvalidConfig, Suit};

/// Seat number, `0..4`. Seats 0 and 2 form team 0, seats 1 and 3 team 1.
pub type PlayerId = u8;

/// Team number, `0` or `1`.
pub type TeamId = u8;

pub fn team_of(player: PlayerId) -> TeamId {
    player % 2
}

pub fn next_player(player: PlayerId) -> PlayerId {
    (player + 1) % 4
}

/// Who produces moves for a seat. The engine validates all moves the same
/// way regardless of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    Human,
    Ai(Difficulty),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub hand: Vec<Card>,
    pub controller: Controller,
}

/// A marriage declared this round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cante {
    pub suit: Suit,
    /// 40 for the trump suit, 20 otherwise.
    pub points: u32,
    pub by: PlayerId,
    /// The declaring team's trick count at declaration time. A cante whose
    /// team wins no further trick is forfeited at round settlement.
    pub tricks_won_at_declaration: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub players: [PlayerId; 2],
    /// Points accumulated this round: captured trick points plus cante
    /// points. Cante points stay provisional until round settlement.
    pub score: u32,
    pub cantes: Vec<Cante>,
}

impl Team {
    pub fn cante_points(&self) -> u32 {
        self.cantes.iter().map(|c| c.points).sum()
    }

    pub fn has_cante(&self, suit: Suit) -> bool {
        self.cantes.iter().any(|c| c.suit == suit)
    }
}

/// The in-progress trick: up to 4 played cards, in play order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    pub plays: Vec<(PlayerId, Card)>,
}

impl Trick {
    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|&(_, card)| card.suit)
    }

    pub fn points(&self) -> u32 {
        self.plays.iter().map(|&(_, card)| card.points()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.plays.iter().map(|&(_, card)| card)
    }
}

/// Round/game phase. Mutually exclusive and exhaustive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Between rounds: the previous round is settled, the next deal has not
    /// happened yet. [`GameState::start_round`] leaves this phase.
    Dealing,
    Playing,
    /// A team crossed the winning threshold at a round boundary.
    Finished { winner: TeamId },
    /// The session was abandoned or retired without a winner.
    GameOver,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Finished { .. } | Phase::GameOver)
    }
}

/// Per-player count of declared cantes over the whole game, for the
/// end-of-game settlement record. Never reset between rounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanteTally {
    pub veintes: u32,
    pub cuarentas: u32,
}

/// The canonical game state.
///
/// Created by [`GameState::deal`], mutated exclusively through validated
/// move application ([`crate::apply`]), retired once [`Phase::is_terminal`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: Phase,
    pub players: [Player; 4],
    pub teams: [Team; 2],
    pub trump_suit: Suit,
    /// The revealed trump card. Sits at the bottom of `deck` and is drawn
    /// last; [`Move::Cambiar7`](crate::Move) swaps it for the trump 7.
    pub trump_card: Card,
    pub current_turn: PlayerId,
    pub current_trick: Trick,
    /// Remaining draw pile. Cards are drawn from the back; index 0 is the
    /// face-up trump card.
    pub deck: Vec<Card>,
    pub last_trick_winner: Option<PlayerId>,
    /// Cards captured in resolved tricks this round, per team.
    pub captured: [CardsSet; 2],
    pub tricks_won: [u32; 2],
    /// Settled scores accumulated over completed rounds, per team.
    pub game_scores: [u32; 2],
    /// 1-based round counter.
    pub round_no: u32,
    pub cante_tally: [CanteTally; 4],
}

impl GameState {
    /// Start a fresh game: validate the config, shuffle, deal 6 cards to
    /// each seat and reveal the trump card.
    pub fn deal(
        config: GameConfig,
        controllers: [Controller; 4],
        rng: &mut StdRng,
    ) -> Result<Self, InvalidConfig> {
        config.validate()?;
        let players = controllers.map(|controller| Player {
            id: 0, // fixed up below
            hand: Vec::with_capacity(6),
            controller,
        });
        let mut state = Self {
            config,
            phase: Phase::Dealing,
            players,
            teams: [
                Team {
                    players: [0, 2],
                    score: 0,
                    cantes: Vec::new(),
                },
                Team {
                    players: [1, 3],
                    score: 0,
                    cantes: Vec::new(),
                },
            ],
            trump_suit: Suit::Oros,
            trump_card: crate::card!("Ao"),
            current_turn: 0,
            current_trick: Trick::default(),
            deck: Vec::new(),
            last_trick_winner: None,
            captured: [CardsSet::new(), CardsSet::new()],
            tricks_won: [0, 0],
            game_scores: [0, 0],
            round_no: 0,
            cante_tally: [CanteTally::default(); 4],
        };
        for (seat, player) in state.players.iter_mut().enumerate() {
            player.id = seat as PlayerId;
        }
        state.start_round(rng);
        Ok(state)
    }

    /// Shuffle and deal the next round. Only meaningful in [`Phase::Dealing`];
    /// calling it in any other phase is a no-op.
    pub fn start_round(&mut self, rng: &mut StdRng) {
        if self.phase != Phase::Dealing {
            return;
        }
        self.round_no += 1;

        let mut deck = full_deck();
        deck.shuffle(rng);
        for player in self.players.iter_mut() {
            player.hand = deck.split_off(deck.len() - 6);
        }
        // Reveal the trump: flip the top card face up and slide it under
        // the draw pile, where it is drawn last.
        let trump_card = deck.pop().expect("deck holds 16 cards after dealing");
        deck.insert(0, trump_card);

        self.trump_suit = trump_card.suit;
        self.trump_card = trump_card;
        self.deck = deck;
        for team in self.teams.iter_mut() {
            team.score = 0;
            team.cantes.clear();
        }
        self.captured = [CardsSet::new(), CardsSet::new()];
        self.tricks_won = [0, 0];
        self.current_trick = Trick::default();
        self.last_trick_winner = None;
        self.current_turn = ((self.round_no - 1) % 4) as PlayerId;
        self.phase = Phase::Playing;
    }

    pub fn hand_of(&self, player: PlayerId) -> &[Card] {
        &self.players[player as usize].hand
    }

    /// Vueltas: the second half of the round, after the draw pile (trump
    /// card included) has been picked up. Suit-following is always strict
    /// here.
    pub fn in_vueltas(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn must_follow_suit(&self) -> bool {
        self.config.strict_suit_following || self.in_vueltas()
    }

    /// Check the structural invariants that every accepted transition must
    /// preserve. Violation is fatal for this state instance.
    pub fn check_invariants(&self) -> Result<(), CorruptState> {
        if self.current_trick.len() > 4 {
            return Err(CorruptState::OversizedTrick {
                len: self.current_trick.len(),
            });
        }
        if self.trump_card.suit != self.trump_suit {
            return Err(CorruptState::TrumpCardMismatch);
        }

        // Card partition: every card in exactly one of hands, deck, the
        // current trick, or a captured pile.
        let mut counts = [0u8; 40];
        let all_cards = self
            .players
            .iter()
            .flat_map(|p| p.hand.iter().copied())
            .chain(self.deck.iter().copied())
            .chain(self.current_trick.cards())
            .chain(self.captured[0])
            .chain(self.captured[1]);
        for card in all_cards {
            counts[card.to_index() as usize] += 1;
        }
        for (idx, &count) in counts.iter().enumerate() {
            if count != 1 {
                return Err(CorruptState::CardPartitionViolated {
                    card: Card::from_index(idx as u8),
                });
            }
        }

        // Reachability: cards are drawn four at a time, so a partition-valid
        // deck of the wrong length still cannot come from legal play.
        if self.deck.len() % 4 != 0 {
            return Err(CorruptState::UnbalancedDeck {
                len: self.deck.len(),
            });
        }
        // Hands shrink in lockstep; a seat that already played to the
        // current trick holds one card less.
        let mut sizes = [0usize; 4];
        for (seat, player) in self.players.iter().enumerate() {
            let played = self
                .current_trick
                .plays
                .iter()
                .any(|&(p, _)| p as usize == seat);
            sizes[seat] = player.hand.len() + usize::from(played);
        }
        if sizes.iter().any(|&size| size != sizes[0]) {
            return Err(CorruptState::UnevenHands { sizes });
        }
        // Team scores are derived state: captured card points plus declared
        // cante points, nothing else.
        for (team_id, team) in self.teams.iter().enumerate() {
            let captured_points: u32 = self.captured[team_id]
                .into_iter()
                .map(|card| card.points())
                .sum();
            if team.score != captured_points + team.cante_points() {
                return Err(CorruptState::InconsistentScore {
                    team: team_id as TeamId,
                });
            }
        }

        if self.phase == Phase::Playing && self.hand_of(self.current_turn).is_empty() {
            return Err(CorruptState::EmptyHandOnTurn {
                player: self.current_turn,
            });
        }
        Ok(())
    }

    /// Serialize for the transport collaborator. Lossless; see
    /// [`GameState::from_json`].
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("GameState serialization cannot fail")
    }

    /// Deserialize a snapshot, re-checking structural invariants. A
    /// snapshot that does not decode or does not uphold the invariants is
    /// refused.
    pub fn from_json(json: &str) -> Result<Self, CorruptState> {
        let state: GameState = serde_json::from_str(json).map_err(|err| {
            CorruptState::Undecodable {
                reason: err.to_string(),
            }
        })?;
        state.config.validate().map_err(|err| CorruptState::Undecodable {
            reason: err.to_string(),
        })?;
        state.check_invariants()?;
        Ok(state)
    }
}
