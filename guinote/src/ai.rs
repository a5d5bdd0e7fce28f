use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::{legal_moves, Card, CardsSet, CorruptState, GameState, Move};

/// The closed set of AI strengths. Dispatch is an exhaustive match, so a
/// new difficulty cannot be added without writing its policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Propose a move for the seat currently on turn. Pure: the state is never
/// mutated, and the result is deterministic under a seeded rng.
///
/// The proposal is drawn from [`legal_moves`], so it flows through the same
/// validator as any other actor. An empty legal-move set means the
/// validator and this selector disagree about legality, which is fatal.
pub fn select_move(
    state: &GameState,
    difficulty: Difficulty,
    rng: &mut StdRng,
) -> Result<Move, CorruptState> {
    let legal = legal_moves(state);
    if legal.is_empty() {
        return Err(CorruptState::NoLegalMoves {
            player: state.current_turn,
        });
    }
    let mv = match difficulty {
        Difficulty::Easy => *legal.choose(rng).expect("legal moves are non-empty"),
        Difficulty::Medium => greedy(state, &legal, rng),
        Difficulty::Hard => expert(state, &legal, rng),
    };
    Ok(mv)
}

/// Does `card` outrank every card played to the current trick so far?
fn beats_trick_so_far(state: &GameState, card: Card) -> bool {
    let lead = state.current_trick.lead_suit().unwrap_or(card.suit);
    let trump = state.trump_suit;
    state
        .current_trick
        .cards()
        .all(|played| card.rank_in_trick(lead, trump) > played.rank_in_trick(lead, trump))
}

/// Immediate point capture if `card` is played right now: the trick total
/// when this card closes and wins the trick, otherwise the (negative) point
/// value the card itself puts at risk.
fn immediate_value(state: &GameState, card: Card) -> i32 {
    let closes_trick = state.current_trick.len() == 3;
    if closes_trick && beats_trick_so_far(state, card) {
        (state.current_trick.points() + card.points()) as i32
    } else {
        -(card.points() as i32)
    }
}

fn best_by<F: Fn(Card) -> i32>(legal: &[Move], rng: &mut StdRng, score: F) -> Move {
    let mut top_choices: Vec<Move> = Vec::new();
    let mut top_score = i32::MIN;
    for &mv in legal {
        let Move::PlayCard { card, .. } = mv else { continue };
        let value = score(card);
        match value.cmp(&top_score) {
            std::cmp::Ordering::Less => {}
            std::cmp::Ordering::Equal => top_choices.push(mv),
            std::cmp::Ordering::Greater => {
                top_choices = vec![mv];
                top_score = value;
            }
        }
    }
    *top_choices
        .choose(rng)
        .expect("a playable card always exists while playing")
}

/// Medium: maximize immediate trick point capture, nothing else.
fn greedy(state: &GameState, legal: &[Move], rng: &mut StdRng) -> Move {
    best_by(legal, rng, |card| immediate_value(state, card))
}

/// Hard: take cantes and the trump-7 exchange whenever they are on offer,
/// and use the cards already seen this round to judge whether a play can
/// still be beaten before spending points on it.
fn expert(state: &GameState, legal: &[Move], rng: &mut StdRng) -> Move {
    if let Some(&cante) = legal
        .iter()
        .filter(|mv| matches!(mv, Move::Cantar { .. }))
        .max_by_key(|mv| match mv {
            Move::Cantar { suit, .. } if *suit == state.trump_suit => 40,
            _ => 20,
        })
    {
        return cante;
    }
    if let Some(&exchange) = legal.iter().find(|mv| matches!(mv, Move::Cambiar7 { .. })) {
        return exchange;
    }

    let unseen = unseen_cards(state);
    let trump = state.trump_suit;
    best_by(legal, rng, |card| {
        let lead = state.current_trick.lead_suit().unwrap_or(card.suit);
        let rank = card.rank_in_trick(lead, trump);
        let unbeatable = unseen
            .into_iter()
            .all(|other| other.rank_in_trick(lead, trump) < rank);
        if state.current_trick.len() == 3 {
            immediate_value(state, card)
        } else if beats_trick_so_far(state, card) && unbeatable {
            // Nothing still out can take this trick away from us.
            (state.current_trick.points() + card.points()) as i32 + 1
        } else {
            -(card.points() as i32)
        }
    })
}

/// Cards the player on turn has not yet seen: everything outside their own
/// hand, the current trick, the captured piles, and the face-up trump card.
fn unseen_cards(state: &GameState) -> CardsSet {
    let mut seen = state.captured[0] | state.captured[1];
    for card in state.current_trick.cards() {
        seen = seen.insert(card);
    }
    for &card in state.hand_of(state.current_turn) {
        seen = seen.insert(card);
    }
    if !state.deck.is_empty() {
        seen = seen.insert(state.trump_card);
    }
    !seen
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::arbitrary::rigged_state;
    use crate::{apply, card, validate, Phase, Suit};

    #[test]
    fn easy_is_forced_when_one_card_is_legal() {
        // Strict following, copas led, and exactly one copas in hand: the
        // seeded randomness must not matter.
        let mut state = rigged_state(
            [
                &[card!("2c"), card!("Ae"), card!("Re")],
                &[card!("3c"), card!("4c"), card!("5c")],
                &[card!("6c"), card!("7c"), card!("Sc")],
                &[card!("Ab"), card!("2b"), card!("3b")],
            ],
            card!("Ao"),
            1,
            true,
        );
        apply(&mut state, Move::PlayCard { player: 1, card: card!("3c") }).unwrap();
        apply(&mut state, Move::PlayCard { player: 2, card: card!("6c") }).unwrap();
        apply(&mut state, Move::PlayCard { player: 3, card: card!("Ab") }).unwrap();
        assert_eq!(state.current_turn, 0);
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mv = select_move(&state, Difficulty::Easy, &mut rng).unwrap();
            assert_eq!(mv, Move::PlayCard { player: 0, card: card!("2c") });
        }
    }

    #[test]
    fn medium_takes_the_points_when_closing_a_trick() {
        let mut state = rigged_state(
            [
                &[card!("Ac"), card!("2b")],
                &[card!("3c"), card!("4b")],
                &[card!("Cc"), card!("5b")],
                &[card!("Rc"), card!("2e")],
            ],
            card!("Ao"),
            1,
            false,
        );
        apply(&mut state, Move::PlayCard { player: 1, card: card!("3c") }).unwrap();
        apply(&mut state, Move::PlayCard { player: 2, card: card!("Cc") }).unwrap();
        apply(&mut state, Move::PlayCard { player: 3, card: card!("Rc") }).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let mv = select_move(&state, Difficulty::Medium, &mut rng).unwrap();
        // The As de copas wins Caballo + Rey; discarding the 2 de bastos
        // would hand those 7 points away.
        assert_eq!(mv, Move::PlayCard { player: 0, card: card!("Ac") });
    }

    #[test]
    fn hard_sings_a_cuarenta_when_it_may() {
        let mut state = rigged_state(
            [
                &[card!("Ro"), card!("So"), card!("2b")],
                &[card!("3c"), card!("4c"), card!("5e")],
                &[card!("6c"), card!("7c"), card!("6e")],
                &[card!("2e"), card!("3e"), card!("4e")],
            ],
            card!("Ao"),
            0,
            false,
        );
        state.last_trick_winner = Some(2); // partner of seat 0
        let mut rng = StdRng::seed_from_u64(1);
        let mv = select_move(&state, Difficulty::Hard, &mut rng).unwrap();
        assert_eq!(mv, Move::Cantar { player: 0, suit: Suit::Oros });
    }

    #[test]
    fn every_policy_proposes_only_legal_moves() {
        for seed in 0..10u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = crate::arbitrary::random_playout(seed, 12);
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                if state.phase != Phase::Playing {
                    break;
                }
                let mv = select_move(&state, difficulty, &mut rng).unwrap();
                validate(&state, &mv).unwrap();
                apply(&mut state, mv).unwrap();
            }
        }
    }
}
