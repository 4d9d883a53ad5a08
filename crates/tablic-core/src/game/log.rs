use crate::game::player::MoveEvent;
use crate::game::result::MatchResult;
use crate::model::card_set::CardSet;

/// Observer of a match for recording purposes. Every hook is optional.
pub trait MatchLog {
    fn on_new_match(&mut self, _names: &[String]) {}

    fn on_new_deal(&mut self, _hands: &[CardSet], _table: CardSet) {}

    /// Called once per accepted move, before it takes effect. `hand` on the
    /// event is the mover's hand.
    fn record_move(&mut self, _event: &MoveEvent) {}

    fn on_match_end(&mut self, _result: &MatchResult) {}
}

/// Records one entry per move through a translation closure. Returning
/// `None` from the closure skips the move.
pub struct MoveLog<T, F>
where
    F: FnMut(&MoveEvent) -> Option<T>,
{
    translate: F,
    entries: Vec<T>,
    matches: usize,
}

impl<T, F> MoveLog<T, F>
where
    F: FnMut(&MoveEvent) -> Option<T>,
{
    pub fn new(translate: F) -> Self {
        Self {
            translate,
            entries: Vec::new(),
            matches: 0,
        }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.entries)
    }

    pub fn matches_seen(&self) -> usize {
        self.matches
    }
}

impl<T, F> MatchLog for MoveLog<T, F>
where
    F: FnMut(&MoveEvent) -> Option<T>,
{
    fn on_new_match(&mut self, _names: &[String]) {
        self.matches += 1;
    }

    fn record_move(&mut self, event: &MoveEvent) {
        if let Some(entry) = (self.translate)(event) {
            self.entries.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchLog, MoveLog};
    use crate::game::player::MoveEvent;
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;
    use crate::model::play::Move;

    fn event(seat: usize, card: &str) -> MoveEvent {
        let card: Card = card.parse().unwrap();
        MoveEvent {
            seat,
            hand: CardSet::single(card),
            table: CardSet::EMPTY,
            mv: Move::lay_down(card),
        }
    }

    #[test]
    fn translator_can_veto_entries() {
        let mut log = MoveLog::new(|event: &MoveEvent| {
            (event.seat == 0).then(|| event.mv.card.to_string())
        });
        log.on_new_match(&["a".into(), "b".into()]);
        log.record_move(&event(0, "7H"));
        log.record_move(&event(1, "8H"));
        log.record_move(&event(0, "9H"));
        assert_eq!(log.entries(), ["7H", "9H"]);
        assert_eq!(log.matches_seen(), 1);
        assert_eq!(log.drain().len(), 2);
        assert!(log.entries().is_empty());
    }
}
