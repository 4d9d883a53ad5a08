use crate::game::error::IllegalMove;
use crate::game::result::MatchResult;
use crate::model::card_set::CardSet;
use crate::model::play::Move;

/// How a move request relates to earlier attempts this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retry {
    First,
    /// The previous move was illegal.
    Again,
    /// The previous move was illegal for these reasons.
    WithReasons(Vec<IllegalMove>),
}

impl Retry {
    pub fn is_retry(&self) -> bool {
        !matches!(self, Retry::First)
    }
}

/// A move as one observer sees it, delivered before the move takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEvent {
    pub seat: usize,
    /// The observer's own hand (for logs: the mover's hand).
    pub hand: CardSet,
    /// Table before the move.
    pub table: CardSet,
    pub mv: Move,
}

/// A seat at the table. Strategies implement this; the runner drives it.
pub trait Player {
    fn name(&self) -> &str;

    /// Whether retries should carry the failed checks.
    fn wants_reason(&self) -> bool {
        false
    }

    fn on_player_count(&mut self, _seat: usize, _names: &[String]) {}

    fn on_new_deal(&mut self, _hand: CardSet, _table: CardSet) {}

    /// Called for every move, the player's own included.
    fn on_move(&mut self, _event: &MoveEvent) {}

    fn on_match_result(&mut self, _result: &MatchResult) {}

    fn decide_move(&mut self, hand: CardSet, table: CardSet, retry: &Retry) -> Move;
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn wants_reason(&self) -> bool {
        (**self).wants_reason()
    }

    fn on_player_count(&mut self, seat: usize, names: &[String]) {
        (**self).on_player_count(seat, names)
    }

    fn on_new_deal(&mut self, hand: CardSet, table: CardSet) {
        (**self).on_new_deal(hand, table)
    }

    fn on_move(&mut self, event: &MoveEvent) {
        (**self).on_move(event)
    }

    fn on_match_result(&mut self, result: &MatchResult) {
        (**self).on_match_result(result)
    }

    fn decide_move(&mut self, hand: CardSet, table: CardSet, retry: &Retry) -> Move {
        (**self).decide_move(hand, table, retry)
    }
}
