use crate::model::card::Card;
use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign, Sub};
use serde::{Deserialize, Serialize};

/// A set of physical cards backed by a 52-bit mask.
///
/// Iteration is always in card order (rank, then suit), which keeps every
/// enumeration built on top of it deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Card>", into = "Vec<Card>")]
pub struct CardSet(u64);

const FULL_MASK: u64 = (1u64 << Card::COUNT) - 1;

impl CardSet {
    pub const EMPTY: CardSet = CardSet(0);

    pub const fn full() -> Self {
        CardSet(FULL_MASK)
    }

    pub const fn from_bits(bits: u64) -> Self {
        CardSet(bits & FULL_MASK)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn single(card: Card) -> Self {
        CardSet(1u64 << card.id())
    }

    pub fn insert(&mut self, card: Card) -> bool {
        let fresh = !self.contains(card);
        self.0 |= 1u64 << card.id();
        fresh
    }

    pub fn remove(&mut self, card: Card) -> bool {
        let present = self.contains(card);
        self.0 &= !(1u64 << card.id());
        present
    }

    pub const fn contains(self, card: Card) -> bool {
        self.0 & (1u64 << card.id()) != 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn union(self, other: CardSet) -> CardSet {
        CardSet(self.0 | other.0)
    }

    pub const fn intersection(self, other: CardSet) -> CardSet {
        CardSet(self.0 & other.0)
    }

    pub const fn difference(self, other: CardSet) -> CardSet {
        CardSet(self.0 & !other.0)
    }

    pub const fn complement(self) -> CardSet {
        CardSet(!self.0 & FULL_MASK)
    }

    pub const fn is_subset(self, other: CardSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub const fn is_disjoint(self, other: CardSet) -> bool {
        self.0 & other.0 == 0
    }

    pub fn with(self, card: Card) -> CardSet {
        self.union(CardSet::single(card))
    }

    pub fn without(self, card: Card) -> CardSet {
        self.difference(CardSet::single(card))
    }

    pub fn first(self) -> Option<Card> {
        self.iter().next()
    }

    pub fn last(self) -> Option<Card> {
        self.iter().next_back()
    }

    pub fn iter(self) -> Iter {
        Iter { bits: self.0 }
    }

    pub fn points(self) -> u32 {
        self.iter().map(|card| card.points() as u32).sum()
    }

    pub fn count_aces(self) -> usize {
        self.iter().filter(|card| card.is_ace()).count()
    }

    /// Every non-empty subset of this set, in no particular order.
    pub fn submasks(self) -> Submasks {
        Submasks {
            full: self.0,
            next: self.0,
            done: self.0 == 0,
        }
    }

    pub fn to_vec(self) -> Vec<Card> {
        self.iter().collect()
    }
}

pub struct Iter {
    bits: u64,
}

impl Iterator for Iter {
    type Item = Card;

    fn next(&mut self) -> Option<Card> {
        if self.bits == 0 {
            return None;
        }
        let id = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Card::from_id(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Iter {
    fn next_back(&mut self) -> Option<Card> {
        if self.bits == 0 {
            return None;
        }
        let id = 63 - self.bits.leading_zeros() as usize;
        self.bits &= !(1u64 << id);
        Card::from_id(id)
    }
}

impl ExactSizeIterator for Iter {}

pub struct Submasks {
    full: u64,
    next: u64,
    done: bool,
}

impl Iterator for Submasks {
    type Item = CardSet;

    fn next(&mut self) -> Option<CardSet> {
        if self.done {
            return None;
        }
        let current = self.next;
        self.next = current.wrapping_sub(1) & self.full;
        if self.next == 0 {
            self.done = true;
        }
        Some(CardSet(current))
    }
}

impl IntoIterator for CardSet {
    type Item = Card;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardSet::EMPTY;
        for card in iter {
            set.insert(card);
        }
        set
    }
}

impl Extend<Card> for CardSet {
    fn extend<I: IntoIterator<Item = Card>>(&mut self, iter: I) {
        for card in iter {
            self.insert(card);
        }
    }
}

impl From<Vec<Card>> for CardSet {
    fn from(cards: Vec<Card>) -> Self {
        cards.into_iter().collect()
    }
}

impl From<CardSet> for Vec<Card> {
    fn from(set: CardSet) -> Self {
        set.to_vec()
    }
}

impl BitOr for CardSet {
    type Output = CardSet;

    fn bitor(self, rhs: CardSet) -> CardSet {
        self.union(rhs)
    }
}

impl BitOrAssign for CardSet {
    fn bitor_assign(&mut self, rhs: CardSet) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CardSet {
    type Output = CardSet;

    fn bitand(self, rhs: CardSet) -> CardSet {
        self.intersection(rhs)
    }
}

impl Sub for CardSet {
    type Output = CardSet;

    fn sub(self, rhs: CardSet) -> CardSet {
        self.difference(rhs)
    }
}

impl fmt::Display for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (position, card) in self.iter().enumerate() {
            if position > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        f.write_str("]")
    }
}
