use std::iter::FusedIterator;

use crate::Card;

/// A compact set of [`Card`]s.
///
/// Allows intersection/union/xor with other such sets via bitwise ops.
/// Also implements [`IntoIterator`], so it can be converted into e.g.
/// a vector with `Vec::from_iter(cards_set)`.
///
/// ```
/// use guinote::{card, CardsSet};
/// let mut set = CardsSet::new();
/// // This is an immutable data type, so functions like `insert` return a new `CardsSet`.
/// set = set.insert(card!("7c"));
/// set = set.insert(card!("7c"));  // Inserting a second time has no effect
/// set = set.insert(card!("2c"));
/// assert_eq!(Vec::from_iter(set), vec![card!("2c"), card!("7c")]);
/// ```
///
/// # Note on immutability
///
/// This is an immutable type, so its "mutating" methods return a
/// new value instead of really mutating in-place (except for `std::ops::BitXxxAssign` trait methods).
/// It is also [`Copy`], so a value is not consumed by methods with `self` receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardsSet {
    // Only the low 40 bits are used.
    pub(crate) bits: u64,
}

const VALID_BITS: u64 = (1u64 << 40) - 1;

impl CardsSet {
    /// Creates a new, empty set.
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    /// The set of all 40 cards.
    pub fn full() -> Self {
        Self { bits: VALID_BITS }
    }

    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub fn contains(self, card: Card) -> bool {
        (self.bits & (1u64 << card.to_index())) != 0
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn insert(self, card: Card) -> Self {
        Self {
            bits: self.bits | (1u64 << card.to_index()),
        }
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn remove(self, card: Card) -> Self {
        Self {
            bits: self.bits & !(1u64 << card.to_index()),
        }
    }
}

impl std::ops::BitAnd for CardsSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl std::ops::BitOr for CardsSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl std::ops::BitXor for CardsSet {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits ^ rhs.bits,
        }
    }
}

impl std::ops::BitAndAssign for CardsSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits &= rhs.bits;
    }
}

impl std::ops::BitOrAssign for CardsSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl std::ops::BitXorAssign for CardsSet {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.bits ^= rhs.bits;
    }
}

impl std::ops::Not for CardsSet {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self {
            bits: !self.bits & VALID_BITS,
        }
    }
}

impl Default for CardsSet {
    fn default() -> Self {
        Self { bits: 0 }
    }
}

impl FromIterator<Card> for CardsSet {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        let mut bits = 0;
        for card in iter {
            bits |= 1u64 << card.to_index();
        }
        Self { bits }
    }
}

impl IntoIterator for CardsSet {
    type Item = Card;

    type IntoIter = CardsSetIter;

    fn into_iter(self) -> Self::IntoIter {
        CardsSetIter { bits: self.bits }
    }
}

impl serde::Serialize for CardsSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.into_iter())
    }
}

impl<'de> serde::Deserialize<'de> for CardsSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cards = Vec::<Card>::deserialize(deserializer)?;
        Ok(CardsSet::from_iter(cards))
    }
}

/// Iterator for a [`CardsSet`] that returns cards by ascending index.
#[derive(Clone, Copy, Debug)]
pub struct CardsSetIter {
    bits: u64,
}

impl Iterator for CardsSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            None
        } else {
            // The number of trailing zeros is the card index
            let card_idx: u8 = self.bits.trailing_zeros().try_into().unwrap();
            // Clear the flag corresponding to this card index
            self.bits ^= 1u64 << card_idx;

            Some(Card::from_index(card_idx))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bits.count_ones() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for CardsSetIter {
    fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }
}

impl FusedIterator for CardsSetIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::full_deck;

    #[test]
    fn full_set_matches_deck() {
        assert_eq!(CardsSet::from_iter(full_deck()), CardsSet::full());
        assert_eq!(CardsSet::full().len(), 40);
    }

    #[test]
    fn complement_partitions_the_deck() {
        let oros: CardsSet = full_deck()
            .into_iter()
            .filter(|c| c.suit == crate::Suit::Oros)
            .collect();
        assert_eq!(oros.len(), 10);
        assert_eq!((!oros).len(), 30);
        assert_eq!(oros | !oros, CardsSet::full());
        assert!((oros & !oros).is_empty());
    }
}
