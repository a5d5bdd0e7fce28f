use quickcheck::Arbitrary;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{
    apply, full_deck, select_move, Card, CardValue, CardsSet, Controller, Difficulty, GameConfig,
    GameState, Phase, PlayerId, Suit, Trick, SUITS, VALUES,
};

impl quickcheck::Arbitrary for Suit {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&SUITS).unwrap()
    }
}

impl quickcheck::Arbitrary for CardValue {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&VALUES).unwrap()
    }
}

impl quickcheck::Arbitrary for Card {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self {
            suit: Suit::arbitrary(g),
            value: CardValue::arbitrary(g),
        }
    }
}

/// A complete trick: four distinct cards played by seats 0..4, plus a trump
/// suit.
#[derive(Clone, Debug)]
pub(crate) struct ArbitraryTrick {
    pub trick: Trick,
    pub trump: Suit,
}

impl quickcheck::Arbitrary for ArbitraryTrick {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut cards = CardsSet::new();
        while cards.len() < 4 {
            cards = cards.insert(Card::arbitrary(g));
        }
        let mut plays: Vec<(PlayerId, Card)> = cards
            .into_iter()
            .enumerate()
            .map(|(seat, card)| (seat as PlayerId, card))
            .collect();
        // The bitset iterates in index order; rotate so the lead varies.
        plays.rotate_left((u8::arbitrary(g) % 4) as usize);
        for (seat, play) in plays.iter_mut().enumerate() {
            play.0 = seat as PlayerId;
        }
        ArbitraryTrick {
            trick: Trick { plays },
            trump: Suit::arbitrary(g),
        }
    }
}

/// A playout recipe for property tests over reachable states.
#[derive(Clone, Debug)]
pub(crate) struct Playout {
    pub seed: u64,
    pub steps: usize,
}

impl quickcheck::Arbitrary for Playout {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Playout {
            seed: u64::arbitrary(g),
            steps: usize::arbitrary(g) % 60,
        }
    }
}

/// Deal a fresh game and advance it by `steps` random legal moves. Every
/// state this produces was reached exclusively through validated move
/// application.
pub(crate) fn random_playout(seed: u64, steps: usize) -> GameState {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::deal(
        GameConfig::new(false),
        [Controller::Ai(Difficulty::Easy); 4],
        &mut rng,
    )
    .expect("baseline config is valid");
    for _ in 0..steps {
        match state.phase {
            Phase::Playing => {
                let mv = select_move(&state, Difficulty::Easy, &mut rng)
                    .expect("a legal move exists while playing");
                apply(&mut state, mv).expect("selected moves are legal");
            }
            Phase::Dealing => state.start_round(&mut rng),
            _ => break,
        }
    }
    state
}

/// Build a mid-round state with fixed hands for scenario tests.
///
/// All cards not named in a hand form the draw pile, with `trump_card` face
/// up at the bottom, so the card partition invariant holds.
pub(crate) fn rigged_state(
    hands: [&[Card]; 4],
    trump_card: Card,
    turn: PlayerId,
    strict_suit_following: bool,
) -> GameState {
    let mut rng = StdRng::seed_from_u64(0);
    let mut state = GameState::deal(
        GameConfig::new(strict_suit_following),
        [Controller::Human; 4],
        &mut rng,
    )
    .expect("baseline config is valid");

    let in_hands: CardsSet = hands.iter().flat_map(|h| h.iter().copied()).collect();
    assert_eq!(
        in_hands.len() as usize,
        hands.iter().map(|h| h.len()).sum::<usize>(),
        "rigged hands must not share cards"
    );
    assert!(!in_hands.contains(trump_card), "trump card cannot be in a hand");

    let mut deck: Vec<Card> = full_deck()
        .into_iter()
        .filter(|&c| !in_hands.contains(c) && c != trump_card)
        .collect();
    deck.insert(0, trump_card);

    for (seat, hand) in hands.iter().enumerate() {
        state.players[seat].hand = hand.to_vec();
    }
    state.deck = deck;
    state.trump_card = trump_card;
    state.trump_suit = trump_card.suit;
    state.current_turn = turn;
    state.current_trick = Trick::default();
    state.last_trick_winner = None;
    state.captured = [CardsSet::new(), CardsSet::new()];
    state.tricks_won = [0, 0];
    for team in state.teams.iter_mut() {
        team.score = 0;
        team.cantes.clear();
    }
    state.check_invariants().expect("rigged state is structurally valid");
    state
}
