use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;

/// A partially specified card. Patterns describe groups of interchangeable
/// cards; they never stand in for a physical card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CardPattern {
    pub rank: Option<Rank>,
    pub suit: Option<Suit>,
}

impl CardPattern {
    pub const ANY: CardPattern = CardPattern {
        rank: None,
        suit: None,
    };

    pub const fn rank(rank: Rank) -> Self {
        Self {
            rank: Some(rank),
            suit: None,
        }
    }

    pub const fn exact(card: Card) -> Self {
        Self {
            rank: Some(card.rank),
            suit: Some(card.suit),
        }
    }

    pub fn matches(self, card: Card) -> bool {
        self.rank.is_none_or(|rank| rank == card.rank)
            && self.suit.is_none_or(|suit| suit == card.suit)
    }
}

impl fmt::Display for CardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            Some(rank) => write!(f, "{rank}")?,
            None => f.write_str("*")?,
        }
        match self.suit {
            Some(suit) => write!(f, "{suit}"),
            None => f.write_str("*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CardPattern;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn rank_pattern_matches_every_suit() {
        let pattern = CardPattern::rank(Rank::Seven);
        for suit in Suit::ALL {
            assert!(pattern.matches(Card::new(Rank::Seven, suit)));
        }
        assert!(!pattern.matches(Card::new(Rank::Eight, Suit::Hearts)));
        assert_eq!(pattern.to_string(), "7*");
    }

    #[test]
    fn exact_pattern_matches_one_card() {
        let card = Card::new(Rank::Ten, Suit::Diamonds);
        let pattern = CardPattern::exact(card);
        assert!(pattern.matches(card));
        assert!(!pattern.matches(Card::new(Rank::Ten, Suit::Clubs)));
        assert!(CardPattern::ANY.matches(card));
    }
}
