use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A physical card. Ordering is rank first, then suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const COUNT: usize = 52;

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Dense id in `0..52` that preserves card ordering.
    pub const fn id(self) -> usize {
        self.rank.index() * 4 + self.suit.index()
    }

    pub const fn from_id(id: usize) -> Option<Self> {
        let rank = match Rank::from_index(id / 4) {
            Some(rank) => rank,
            None => return None,
        };
        match Suit::from_index(id % 4) {
            Some(suit) => Some(Self::new(rank, suit)),
            None => None,
        }
    }

    pub const fn is_club_two(self) -> bool {
        matches!(self.rank, Rank::Two) && matches!(self.suit, Suit::Clubs)
    }

    pub const fn is_diamond_ten(self) -> bool {
        matches!(self.rank, Rank::Ten) && matches!(self.suit, Suit::Diamonds)
    }

    pub const fn is_ace(self) -> bool {
        self.rank.is_ace()
    }

    pub const fn points(self) -> u8 {
        if self.is_diamond_ten() {
            2
        } else if self.is_club_two() {
            1
        } else {
            match self.rank {
                Rank::Ace | Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 1,
                _ => 0,
            }
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    #[error("card text is empty")]
    Empty,
    #[error("unknown suit symbol in '{0}'")]
    Suit(String),
    #[error("unknown rank in '{0}'")]
    Rank(String),
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        let mut chars = text.chars();
        let symbol = chars.next_back().ok_or(ParseCardError::Empty)?;
        let suit = Suit::from_symbol(symbol).ok_or_else(|| ParseCardError::Suit(text.into()))?;
        let rank_text = chars.as_str();
        let rank = match rank_text.to_ascii_uppercase().as_str() {
            "A" => Some(Rank::Ace),
            "J" => Some(Rank::Jack),
            "Q" => Some(Rank::Queen),
            "K" => Some(Rank::King),
            digits => digits.parse::<u8>().ok().and_then(Rank::from_value),
        }
        .ok_or_else(|| ParseCardError::Rank(text.into()))?;
        Ok(Card::new(rank, suit))
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

impl TryFrom<String> for Card {
    type Error = ParseCardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
