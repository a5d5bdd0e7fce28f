use serde::{Deserialize, Serialize};

use crate::{
    next_player, team_of, Cante, Card, CardValue, GameState, InvalidMove, Phase, PlayerId, Suit,
    Trick, SUITS,
};

/// A proposed state transition. Every actor, whether human input or the AI
/// selector, goes through the same [`validate`]/[`apply`] pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Move {
    PlayCard { player: PlayerId, card: Card },
    Cantar { player: PlayerId, suit: Suit },
    Cambiar7 { player: PlayerId },
}

impl Move {
    pub fn player(&self) -> PlayerId {
        match *self {
            Move::PlayCard { player, .. } => player,
            Move::Cantar { player, .. } => player,
            Move::Cambiar7 { player } => player,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Move::PlayCard { player, card } => write!(f, "player {} plays {}", player, card),
            Move::Cantar { player, suit } => write!(f, "player {} sings {:?}", player, suit),
            Move::Cambiar7 { player } => write!(f, "player {} exchanges the trump 7", player),
        }
    }
}

/// The normalized record of an accepted move, used for replay and
/// reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMove {
    pub mv: Move,
    /// Points credited by this move: the trick total when it resolved a
    /// trick, the cante value for a declaration, 0 otherwise.
    pub points: u32,
    pub trick_winner: Option<PlayerId>,
    pub phase_after: Phase,
}

/// Decide whether `mv` is legal in `state` without touching the state.
pub fn validate(state: &GameState, mv: &Move) -> Result<(), InvalidMove> {
    if state.phase != Phase::Playing {
        return Err(InvalidMove::NotPlaying);
    }
    let player = mv.player();
    if player != state.current_turn {
        return Err(InvalidMove::NotYourTurn { player });
    }
    match *mv {
        Move::PlayCard { card, .. } => validate_play(state, player, card),
        Move::Cantar { suit, .. } => validate_cante(state, player, suit),
        Move::Cambiar7 { .. } => validate_exchange(state, player),
    }
}

fn validate_play(state: &GameState, player: PlayerId, card: Card) -> Result<(), InvalidMove> {
    let hand = state.hand_of(player);
    if !hand.contains(&card) {
        return Err(InvalidMove::CardNotInHand { card });
    }
    let lead = match state.current_trick.lead_suit() {
        Some(lead) => lead,
        None => return Ok(()), // leading: any card
    };
    if !state.must_follow_suit() {
        return Ok(());
    }
    if hand.iter().any(|c| c.suit == lead) {
        if card.suit != lead {
            return Err(InvalidMove::MustFollowSuit { lead });
        }
        return Ok(());
    }
    let trump = state.trump_suit;
    if hand.iter().any(|c| c.suit == trump) && card.suit != trump {
        return Err(InvalidMove::MustPlayTrump { trump });
    }
    Ok(())
}

fn validate_trick_boundary(state: &GameState, player: PlayerId) -> Result<(), InvalidMove> {
    if !state.current_trick.is_empty() {
        return Err(InvalidMove::NotAtTrickStart);
    }
    match state.last_trick_winner {
        Some(winner) if team_of(winner) == team_of(player) => Ok(()),
        _ => Err(InvalidMove::NotAfterWonTrick),
    }
}

fn validate_cante(state: &GameState, player: PlayerId, suit: Suit) -> Result<(), InvalidMove> {
    validate_trick_boundary(state, player)?;
    if state.teams[team_of(player) as usize].has_cante(suit) {
        return Err(InvalidMove::CanteAlreadyDeclared { suit });
    }
    let hand = state.hand_of(player);
    let holds = |value| hand.contains(&Card { suit, value });
    if !holds(CardValue::Rey) || !holds(CardValue::Sota) {
        return Err(InvalidMove::CanteCardsMissing { suit });
    }
    Ok(())
}

fn validate_exchange(state: &GameState, player: PlayerId) -> Result<(), InvalidMove> {
    validate_trick_boundary(state, player)?;
    if state.deck.is_empty() {
        return Err(InvalidMove::ExchangeWindowClosed);
    }
    let seven = Card {
        suit: state.trump_suit,
        value: CardValue::Siete,
    };
    if !state.hand_of(player).contains(&seven) {
        return Err(InvalidMove::TrumpSevenNotInHand);
    }
    Ok(())
}

/// All moves the current player may make. The AI selector draws from this
/// set, so it can never bypass the legality contract.
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    if state.phase != Phase::Playing {
        return Vec::new();
    }
    let player = state.current_turn;
    let mut candidates: Vec<Move> = state
        .hand_of(player)
        .iter()
        .map(|&card| Move::PlayCard { player, card })
        .collect();
    for suit in SUITS {
        candidates.push(Move::Cantar { player, suit });
    }
    candidates.push(Move::Cambiar7 { player });
    candidates.retain(|mv| validate(state, mv).is_ok());
    candidates
}

/// The winner of a complete trick: the seat whose card ranks highest
/// relative to the led suit and the trump suit.
pub fn trick_winner(trick: &Trick, trump: Suit) -> Option<PlayerId> {
    let lead = trick.lead_suit()?;
    trick
        .plays
        .iter()
        .max_by_key(|&&(_, card)| card.rank_in_trick(lead, trump))
        .map(|&(player, _)| player)
}

/// Validate and apply a move atomically. On error the state is unchanged.
pub fn apply(state: &mut GameState, mv: Move) -> Result<AppliedMove, InvalidMove> {
    validate(state, &mv)?;
    Ok(match mv {
        Move::PlayCard { player, card } => apply_play(state, player, card),
        Move::Cantar { player, suit } => apply_cante(state, player, suit),
        Move::Cambiar7 { player } => apply_exchange(state, player),
    })
}

fn remove_from_hand(state: &mut GameState, player: PlayerId, card: Card) -> Card {
    let hand = &mut state.players[player as usize].hand;
    let pos = hand
        .iter()
        .position(|&c| c == card)
        .expect("validated: card is in hand");
    hand.remove(pos)
}

fn apply_play(state: &mut GameState, player: PlayerId, card: Card) -> AppliedMove {
    let card = remove_from_hand(state, player, card);
    state.current_trick.plays.push((player, card));

    if state.current_trick.len() < 4 {
        state.current_turn = next_player(player);
        return AppliedMove {
            mv: Move::PlayCard { player, card },
            points: 0,
            trick_winner: None,
            phase_after: state.phase,
        };
    }

    // Fourth card: resolve the trick.
    let winner =
        trick_winner(&state.current_trick, state.trump_suit).expect("trick has four plays");
    let team = team_of(winner) as usize;
    let points = state.current_trick.points();
    state.teams[team].score += points;
    state.tricks_won[team] += 1;
    for trick_card in state.current_trick.cards().collect::<Vec<_>>() {
        state.captured[team] = state.captured[team].insert(trick_card);
    }
    state.current_trick = Trick::default();
    state.last_trick_winner = Some(winner);
    state.current_turn = winner;

    // Draw phase, trick winner first. The face-up trump card sits at the
    // bottom and goes to the last drawer.
    if !state.deck.is_empty() {
        for offset in 0..4 {
            let drawer = (winner + offset) % 4;
            let drawn = state.deck.pop().expect("deck size is a multiple of 4");
            state.players[drawer as usize].hand.push(drawn);
        }
    }

    if state.players.iter().all(|p| p.hand.is_empty()) {
        settle_round(state, winner);
    }

    AppliedMove {
        mv: Move::PlayCard { player, card },
        points,
        trick_winner: Some(winner),
        phase_after: state.phase,
    }
}

fn apply_cante(state: &mut GameState, player: PlayerId, suit: Suit) -> AppliedMove {
    let points = if suit == state.trump_suit { 40 } else { 20 };
    let team = team_of(player) as usize;
    state.teams[team].cantes.push(Cante {
        suit,
        points,
        by: player,
        tricks_won_at_declaration: state.tricks_won[team],
    });
    state.teams[team].score += points;
    let tally = &mut state.cante_tally[player as usize];
    if points == 40 {
        tally.cuarentas += 1;
    } else {
        tally.veintes += 1;
    }
    AppliedMove {
        mv: Move::Cantar { player, suit },
        points,
        trick_winner: None,
        phase_after: state.phase,
    }
}

fn apply_exchange(state: &mut GameState, player: PlayerId) -> AppliedMove {
    let seven = Card {
        suit: state.trump_suit,
        value: CardValue::Siete,
    };
    let seven = remove_from_hand(state, player, seven);
    let revealed = state.deck[0];
    state.players[player as usize].hand.push(revealed);
    state.deck[0] = seven;
    state.trump_card = seven;
    AppliedMove {
        mv: Move::Cambiar7 { player },
        points: 0,
        trick_winner: None,
        phase_after: state.phase,
    }
}

/// Round settlement, run when the last trick of a round resolves.
///
/// Cante points were credited provisionally at declaration time; a team
/// that won no trick after declaring forfeits them here. The last trick
/// carries a fixed bonus. Victory is evaluated only at this boundary;
/// an exact tie at or above the threshold continues with another round.
fn settle_round(state: &mut GameState, last_trick_winner: PlayerId) {
    for team_id in 0..2usize {
        let team = &state.teams[team_id];
        let forfeited: u32 = team
            .cantes
            .iter()
            .filter(|c| state.tricks_won[team_id] <= c.tricks_won_at_declaration)
            .map(|c| c.points)
            .sum();
        let mut settled = team.score - forfeited;
        if team_id == team_of(last_trick_winner) as usize {
            settled += state.config.last_trick_bonus;
        }
        state.game_scores[team_id] += settled;
    }

    let threshold = state.config.winning_threshold;
    let [score_0, score_1] = state.game_scores;
    state.phase = if score_0 >= threshold && score_0 > score_1 {
        Phase::Finished { winner: 0 }
    } else if score_1 >= threshold && score_1 > score_0 {
        Phase::Finished { winner: 1 }
    } else {
        // Nobody crossed the threshold, or both did with equal totals:
        // the game continues with another deal.
        Phase::Dealing
    };
}
