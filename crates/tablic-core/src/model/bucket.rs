use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::pattern::CardPattern;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;

/// Canonical strategic class of a card.
///
/// Suit never matters in play except for the two point-carrying cards, so
/// the two of clubs and the ten of diamonds get buckets of their own and the
/// remaining cards are grouped by rank. Cards in the same bucket are
/// interchangeable for search and inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bucket(u8);

impl Bucket {
    pub const COUNT: usize = 15;
    pub const CLUB_TWO: Bucket = Bucket(13);
    pub const DIAMOND_TEN: Bucket = Bucket(14);

    pub fn of(card: Card) -> Self {
        if card.is_club_two() {
            Self::CLUB_TWO
        } else if card.is_diamond_ten() {
            Self::DIAMOND_TEN
        } else {
            Bucket(card.rank.index() as u8)
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Bucket(index as u8))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Bucket> {
        (0..Self::COUNT as u8).map(Bucket)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn rank(self) -> Rank {
        match self {
            Self::CLUB_TWO => Rank::Two,
            Self::DIAMOND_TEN => Rank::Ten,
            Bucket(index) => Rank::ORDERED[index as usize],
        }
    }

    /// Physical cards belonging to this bucket.
    pub fn instances(self) -> CardSet {
        match self {
            Self::CLUB_TWO => CardSet::single(Card::new(Rank::Two, Suit::Clubs)),
            Self::DIAMOND_TEN => CardSet::single(Card::new(Rank::Ten, Suit::Diamonds)),
            _ => {
                let rank = self.rank();
                Suit::ALL
                    .iter()
                    .map(|&suit| Card::new(rank, suit))
                    .filter(|&card| Bucket::of(card) == self)
                    .collect()
            }
        }
    }

    pub fn pattern(self) -> CardPattern {
        match self {
            Self::CLUB_TWO | Self::DIAMOND_TEN => match self.instances().first() {
                Some(card) => CardPattern::exact(card),
                None => CardPattern::rank(self.rank()),
            },
            _ => CardPattern::rank(self.rank()),
        }
    }

    /// Highest card of this bucket that is still in `pool`.
    pub fn representative(self, pool: CardSet) -> Option<Card> {
        self.instances().intersection(pool).last()
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern())
    }
}

/// Canonical shape of a card set: how many cards it holds per bucket.
/// Two moves with equal prototypes play identically.
pub fn prototype(cards: CardSet) -> [u8; Bucket::COUNT] {
    let mut counts = [0u8; Bucket::COUNT];
    for card in cards {
        counts[Bucket::of(card).index()] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::{Bucket, prototype};
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    #[test]
    fn distinguished_cards_have_their_own_buckets() {
        assert_eq!(Bucket::of(card("2C")), Bucket::CLUB_TWO);
        assert_eq!(Bucket::of(card("10D")), Bucket::DIAMOND_TEN);
        assert_eq!(Bucket::of(card("2H")), Bucket::of(card("2S")));
        assert_ne!(Bucket::of(card("2H")), Bucket::CLUB_TWO);
        assert_eq!(Bucket::of(card("AH")).index(), 0);
        assert_eq!(Bucket::of(card("KC")).index(), 12);
    }

    #[test]
    fn instances_partition_the_deck() {
        let mut union = CardSet::EMPTY;
        let mut total = 0;
        for bucket in Bucket::all() {
            let instances = bucket.instances();
            assert!(instances.is_disjoint(union));
            assert!(instances.iter().all(|c| Bucket::of(c) == bucket));
            total += instances.len();
            union |= instances;
        }
        assert_eq!(total, 52);
        assert_eq!(union, CardSet::full());
        assert_eq!(Bucket::of(card("2D")).instances().len(), 3);
        assert_eq!(Bucket::CLUB_TWO.instances().len(), 1);
    }

    #[test]
    fn representative_prefers_highest_suit_in_pool() {
        let pool: CardSet = ["7H", "7D", "8S"].iter().map(|t| card(t)).collect();
        let seven = Bucket::of(card("7S"));
        assert_eq!(seven.representative(pool), Some(card("7D")));
        assert_eq!(Bucket::DIAMOND_TEN.representative(pool), None);
    }

    #[test]
    fn prototypes_ignore_interchangeable_suits() {
        let left: CardSet = ["3H", "4S"].iter().map(|t| card(t)).collect();
        let right: CardSet = ["3D", "4C"].iter().map(|t| card(t)).collect();
        assert_eq!(prototype(left), prototype(right));
        let club: CardSet = ["2C"].iter().map(|t| card(t)).collect();
        let heart: CardSet = ["2H"].iter().map(|t| card(t)).collect();
        assert_ne!(prototype(club), prototype(heart));
    }

    #[test]
    fn display_shows_pattern() {
        assert_eq!(Bucket::CLUB_TWO.to_string(), "2C");
        assert_eq!(Bucket::of(card("QH")).to_string(), "Q*");
    }
}
