use crate::model::card::Card;
use crate::model::card_set::CardSet;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A card played from hand together with the table cards it takes.
/// An empty capture lays the card down on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub card: Card,
    pub captured: CardSet,
}

impl Move {
    pub const fn new(card: Card, captured: CardSet) -> Self {
        Self { card, captured }
    }

    pub const fn lay_down(card: Card) -> Self {
        Self {
            card,
            captured: CardSet::EMPTY,
        }
    }

    pub const fn is_capture(self) -> bool {
        !self.captured.is_empty()
    }

    /// Cards that land in the mover's pile; empty for a lay-down.
    pub fn taken(self) -> CardSet {
        if self.is_capture() {
            self.captured.with(self.card)
        } else {
            CardSet::EMPTY
        }
    }

    /// Whether this move empties `table`.
    pub fn clears(self, table: CardSet) -> bool {
        self.is_capture() && self.captured == table
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_capture() {
            write!(f, "{} takes {}", self.card, self.captured)
        } else {
            write!(f, "{} down", self.card)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    #[test]
    fn lay_down_takes_nothing() {
        let mv = Move::lay_down(card("7H"));
        assert!(!mv.is_capture());
        assert!(mv.taken().is_empty());
        assert_eq!(mv.to_string(), "7H down");
    }

    #[test]
    fn capture_takes_played_card_too() {
        let table: CardSet = [card("3S"), card("4D")].into_iter().collect();
        let mv = Move::new(card("7H"), table);
        assert_eq!(mv.taken().len(), 3);
        assert!(mv.clears(table));
        assert!(!mv.clears(table.with(card("KS"))));
        assert_eq!(mv.to_string(), "7H takes [3S 4D]");
    }
}
