use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A playing card from the 40-card Spanish deck used in Guiñote.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub value: CardValue,
}

/// The suit of a [card](Card).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Suit {
    Oros,
    Copas,
    Espadas,
    Bastos,
}

/// The value of a [card](Card).
///
/// Variants are declared in ascending trick strength, so the derived [`Ord`]
/// is the within-suit ranking: As > Rey > Caballo > Sota > 7 > 6 > ... > 2.
/// The deck has no 8s or 9s.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum CardValue {
    #[serde(rename = "2")]
    Dos,
    #[serde(rename = "3")]
    Tres,
    #[serde(rename = "4")]
    Cuatro,
    #[serde(rename = "5")]
    Cinco,
    #[serde(rename = "6")]
    Seis,
    #[serde(rename = "7")]
    Siete,
    #[serde(rename = "sota")]
    Sota,
    #[serde(rename = "caballo")]
    Caballo,
    #[serde(rename = "rey")]
    Rey,
    #[serde(rename = "as")]
    As,
}

pub const SUITS: [Suit; 4] = [Suit::Oros, Suit::Copas, Suit::Espadas, Suit::Bastos];

pub const VALUES: [CardValue; 10] = [
    CardValue::Dos,
    CardValue::Tres,
    CardValue::Cuatro,
    CardValue::Cinco,
    CardValue::Seis,
    CardValue::Siete,
    CardValue::Sota,
    CardValue::Caballo,
    CardValue::Rey,
    CardValue::As,
];

impl CardValue {
    /// The printed number on the card (1-7, 10, 11, 12).
    pub fn numeric(self) -> u8 {
        match self {
            CardValue::As => 1,
            CardValue::Dos => 2,
            CardValue::Tres => 3,
            CardValue::Cuatro => 4,
            CardValue::Cinco => 5,
            CardValue::Seis => 6,
            CardValue::Siete => 7,
            CardValue::Sota => 10,
            CardValue::Caballo => 11,
            CardValue::Rey => 12,
        }
    }

    /// Point value counted when the card is captured in a trick.
    pub fn points(self) -> u32 {
        match self {
            CardValue::As => 11,
            CardValue::Rey => 4,
            CardValue::Caballo => 3,
            CardValue::Sota => 2,
            _ => 0,
        }
    }

    /// Within-suit trick strength, 0 (Dos) to 9 (As).
    pub fn strength(self) -> u8 {
        self as u8
    }
}

impl Card {
    pub fn points(self) -> u32 {
        self.value.points()
    }

    /// Total order of this card within one trick.
    ///
    /// Any trump beats any non-trump, any card of the led suit beats any
    /// off-suit discard, and within a band the fixed strength table decides.
    pub fn rank_in_trick(self, lead: Suit, trump: Suit) -> u8 {
        let band = if self.suit == trump {
            20
        } else if self.suit == lead {
            10
        } else {
            0
        };
        band + self.value.strength()
    }

    /// Dense index in `0..40`, used by [`CardsSet`](crate::CardsSet).
    pub fn to_index(self) -> u8 {
        (self.suit as u8) * 10 + self.value.strength()
    }

    pub fn from_index(index: u8) -> Card {
        debug_assert!(index < 40);
        Card {
            suit: SUITS[(index / 10) as usize],
            value: VALUES[(index % 10) as usize],
        }
    }
}

/// All 40 cards, in index order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(40);
    for &suit in &SUITS {
        for &value in &VALUES {
            deck.push(Card { suit, value });
        }
    }
    deck
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value_char = match self.value {
            CardValue::As => 'A',
            CardValue::Sota => 'S',
            CardValue::Caballo => 'C',
            CardValue::Rey => 'R',
            other => (b'0' + other.numeric()) as char,
        };
        let suit_char = match self.suit {
            Suit::Oros => 'o',
            Suit::Copas => 'c',
            Suit::Espadas => 'e',
            Suit::Bastos => 'b',
        };
        write!(f, "{}{}", value_char, suit_char)
    }
}

/// The error type for the [`FromStr`] instance of [`Card`].
#[derive(Clone, Copy, Debug)]
pub enum CardFromStrErr {
    LessThanTwoChars,
    MoreThanTwoChars,
    InvalidValue,
    InvalidSuit,
}

impl FromStr for Card {
    type Err = CardFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let value_char = chars.next().ok_or(CardFromStrErr::LessThanTwoChars)?;
        let suit_char = chars.next().ok_or(CardFromStrErr::LessThanTwoChars)?;
        if chars.next().is_some() {
            return Err(CardFromStrErr::MoreThanTwoChars);
        }
        let value = match value_char {
            'A' | '1' => CardValue::As,
            '2' => CardValue::Dos,
            '3' => CardValue::Tres,
            '4' => CardValue::Cuatro,
            '5' => CardValue::Cinco,
            '6' => CardValue::Seis,
            '7' => CardValue::Siete,
            'S' => CardValue::Sota,
            'C' => CardValue::Caballo,
            'R' => CardValue::Rey,
            _ => return Err(CardFromStrErr::InvalidValue),
        };
        let suit = match suit_char {
            'o' => Suit::Oros,
            'c' => Suit::Copas,
            'e' => Suit::Espadas,
            'b' => Suit::Bastos,
            _ => return Err(CardFromStrErr::InvalidSuit),
        };
        Ok(Card { suit, value })
    }
}

/// Shorthand for creating cards from a two-character string.
///
/// The first character is the value (`A`, `2`-`7`, `S`, `C`, `R`), the second
/// is the suit (`o`, `c`, `e`, `b`).
///
/// This macro is just calling the [`FromStr`] instance of [`Card`].
/// ```
/// # use guinote::{card, Card, CardValue, Suit};
/// assert_eq!(
///     card!("Ro"),
///     Card { value: CardValue::Rey, suit: Suit::Oros }
/// );
/// ```
#[macro_export]
macro_rules! card {
    ($vs:literal) => {
        <$crate::Card as std::str::FromStr>::from_str($vs)
            .expect("Invalid card code given to card! macro")
    };
}
// The import is for using the macro in other modules, see https://stackoverflow.com/a/31749071/1726797
#[allow(unused_imports)]
pub(crate) use card;
