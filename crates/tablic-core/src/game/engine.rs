use crate::capture::is_legal_capture;
use crate::game::error::{EngineError, IllegalMove, SetupError};
use crate::game::result::{MatchResult, PlayerResult};
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::deck::Deck;
use crate::model::play::Move;
use crate::model::rules::{DEALT_CARDS, HAND_SIZE, INITIAL_TABLE, MIN_PLAYERS};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Dealing,
    AwaitingMove,
    RoundBoundary,
    Settling,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    pub name: String,
    pub hand: CardSet,
    pub captured: CardSet,
    pub table_clears: u32,
    pub strict_max: bool,
}

impl PlayerSlot {
    fn new(name: String) -> Self {
        Self {
            name,
            hand: CardSet::EMPTY,
            captured: CardSet::EMPTY,
            table_clears: 0,
            strict_max: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Cards moved to the mover's pile, played card included.
    pub taken: CardSet,
    pub table_cleared: bool,
    /// Every hand is empty after this move.
    pub deal_over: bool,
}

/// Authoritative state of one match.
///
/// The state only moves forward through [`Phase`]: `start` lays out the
/// table, `deal` hands out cards, `apply_move` is called once per turn in
/// seat order, and `settle` closes the match once the deck and hands run dry.
#[derive(Debug, Clone)]
pub struct TablicState {
    players: Vec<PlayerSlot>,
    deck: Deck,
    table: CardSet,
    phase: Phase,
    to_move: usize,
    last_capturer: Option<usize>,
    deals: usize,
    result: Option<MatchResult>,
}

impl TablicState {
    pub fn new<I, S>(names: I, deck: Deck) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let players: Vec<PlayerSlot> = names
            .into_iter()
            .map(|name| PlayerSlot::new(name.into()))
            .collect();
        if players.len() < MIN_PLAYERS {
            return Err(SetupError::TooFewPlayers {
                min: MIN_PLAYERS,
                actual: players.len(),
            });
        }
        if DEALT_CARDS % players.len() != 0 {
            return Err(SetupError::UnevenDeal {
                cards: DEALT_CARDS,
                players: players.len(),
            });
        }
        if deck.len() != Card::COUNT || deck.as_set() != CardSet::full() {
            return Err(SetupError::IncompleteDeck(deck.as_set().len()));
        }
        Ok(Self {
            players,
            deck,
            table: CardSet::EMPTY,
            phase: Phase::NotStarted,
            to_move: 0,
            last_capturer: None,
            deals: 0,
            result: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|slot| slot.name.clone()).collect()
    }

    pub fn slot(&self, seat: usize) -> Option<&PlayerSlot> {
        self.players.get(seat)
    }

    pub fn hand(&self, seat: usize) -> CardSet {
        self.players
            .get(seat)
            .map(|slot| slot.hand)
            .unwrap_or(CardSet::EMPTY)
    }

    pub fn hands(&self) -> Vec<CardSet> {
        self.players.iter().map(|slot| slot.hand).collect()
    }

    pub fn table(&self) -> CardSet {
        self.table
    }

    pub fn to_move(&self) -> usize {
        self.to_move
    }

    pub fn last_capturer(&self) -> Option<usize> {
        self.last_capturer
    }

    pub fn undealt(&self) -> usize {
        self.deck.len()
    }

    pub fn deals_played(&self) -> usize {
        self.deals
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// Union of every card location and the total number of cards held
    /// across them. A consistent state yields the full deck and 52.
    pub fn card_census(&self) -> (CardSet, usize) {
        let mut union = self.table | self.deck.as_set();
        let mut total = self.table.len() + self.deck.len();
        for slot in &self.players {
            union |= slot.hand | slot.captured;
            total += slot.hand.len() + slot.captured.len();
        }
        (union, total)
    }

    fn expect_phase(&self, allowed: &[Phase]) -> Result<(), EngineError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(EngineError::WrongPhase { actual: self.phase })
        }
    }

    /// Lays the initial cards face up on the table.
    pub fn start(&mut self) -> Result<CardSet, EngineError> {
        self.expect_phase(&[Phase::NotStarted])?;
        for _ in 0..INITIAL_TABLE {
            if let Some(card) = self.deck.draw() {
                self.table.insert(card);
            }
        }
        self.phase = Phase::Dealing;
        debug!(target: "tablic_core::engine", table = %self.table, "match started");
        Ok(self.table)
    }

    /// Deals up to a full hand to every player, one card per player per pass.
    pub fn deal(&mut self) -> Result<(), EngineError> {
        self.expect_phase(&[Phase::Dealing, Phase::RoundBoundary])?;
        for _ in 0..HAND_SIZE {
            for slot in &mut self.players {
                if let Some(card) = self.deck.draw() {
                    slot.hand.insert(card);
                }
            }
        }
        self.deals += 1;
        self.to_move = 0;
        self.phase = Phase::AwaitingMove;
        debug!(
            target: "tablic_core::engine",
            deal = self.deals,
            undealt = self.deck.len(),
            "cards dealt"
        );
        Ok(())
    }

    /// Every legality check `mv` fails for `seat`, or `Ok` if it is legal.
    pub fn check_move(&self, seat: usize, mv: &Move) -> Result<(), Vec<IllegalMove>> {
        let hand = self.hand(seat);
        let mut reasons = Vec::new();
        if !hand.contains(mv.card) {
            reasons.push(IllegalMove::CardNotInHand(mv.card));
        }
        if !mv.captured.is_subset(self.table) {
            reasons.push(IllegalMove::NotOnTable(mv.captured - self.table));
        }
        // The sum is judged on the part of the capture that is on the table.
        let on_table = mv.captured & self.table;
        if !is_legal_capture(mv.card.rank, on_table) {
            reasons.push(IllegalMove::SumMismatch {
                rank: mv.card.rank,
                captured: on_table,
            });
        }
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(reasons)
        }
    }

    pub fn apply_move(&mut self, seat: usize, mv: Move) -> Result<MoveOutcome, EngineError> {
        self.expect_phase(&[Phase::AwaitingMove])?;
        if seat >= self.players.len() {
            return Err(EngineError::UnknownSeat(seat));
        }
        if seat != self.to_move {
            return Err(EngineError::OutOfTurn {
                expected: self.to_move,
                actual: seat,
            });
        }
        self.check_move(seat, &mv).map_err(EngineError::Illegal)?;

        let taken = mv.taken();
        let table_cleared = mv.clears(self.table);
        let slot = &mut self.players[seat];
        slot.hand.remove(mv.card);
        if mv.is_capture() {
            self.table = self.table - mv.captured;
            slot.captured |= taken;
            if table_cleared {
                slot.table_clears += 1;
            }
            self.last_capturer = Some(seat);
        } else {
            self.table.insert(mv.card);
        }
        debug!(
            target: "tablic_core::engine",
            seat,
            mv = %mv,
            table = %self.table,
            table_cleared,
            "move applied"
        );

        self.to_move = (seat + 1) % self.players.len();
        let deal_over = self.players.iter().all(|slot| slot.hand.is_empty());
        if deal_over {
            self.phase = if self.deck.is_empty() {
                Phase::Settling
            } else {
                Phase::RoundBoundary
            };
        }
        Ok(MoveOutcome {
            taken,
            table_cleared,
            deal_over,
        })
    }

    /// Hands leftover table cards to the last capturer and awards the
    /// strict-maximum bonus, then freezes the result.
    pub fn settle(&mut self) -> Result<MatchResult, EngineError> {
        self.expect_phase(&[Phase::Settling])?;
        if let Some(seat) = self.last_capturer {
            self.players[seat].captured |= self.table;
            self.table = CardSet::EMPTY;
        }

        let counts: Vec<usize> = self.players.iter().map(|slot| slot.captured.len()).collect();
        if let Some(&best) = counts.iter().max() {
            let leaders: Vec<usize> = (0..counts.len()).filter(|&seat| counts[seat] == best).collect();
            if let [leader] = leaders.as_slice() {
                self.players[*leader].strict_max = true;
            }
        }

        let result = MatchResult {
            players: self
                .players
                .iter()
                .map(|slot| PlayerResult {
                    name: slot.name.clone(),
                    captured_points: slot.captured.points(),
                    table_bonus_count: slot.table_clears,
                    strict_max: slot.strict_max,
                    card_count: slot.captured.len(),
                })
                .collect(),
        };
        self.phase = Phase::Finished;
        debug!(
            target: "tablic_core::engine",
            scores = ?result.settled_scores(),
            "match settled"
        );
        self.result = Some(result.clone());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{Phase, TablicState};
    use crate::game::error::{EngineError, IllegalMove, SetupError};
    use crate::model::card_set::CardSet;
    use crate::model::deck::Deck;
    use crate::model::play::Move;

    fn started(seed: u64) -> TablicState {
        let mut state = TablicState::new(["north", "south"], Deck::shuffled_with_seed(seed)).unwrap();
        state.start().unwrap();
        state.deal().unwrap();
        state
    }

    #[test]
    fn rejects_bad_player_counts() {
        assert_eq!(
            TablicState::new(["solo"], Deck::standard()).unwrap_err(),
            SetupError::TooFewPlayers { min: 2, actual: 1 }
        );
        assert_eq!(
            TablicState::new(["a", "b", "c", "d", "e"], Deck::standard()).unwrap_err(),
            SetupError::UnevenDeal { cards: 48, players: 5 }
        );
        assert!(TablicState::new(["a", "b", "c", "d"], Deck::standard()).is_ok());
    }

    #[test]
    fn rejects_short_decks() {
        let cards = Deck::standard().cards()[1..].to_vec();
        assert_eq!(
            TablicState::new(["a", "b"], Deck::from_cards(cards)).unwrap_err(),
            SetupError::IncompleteDeck(51)
        );
    }

    #[test]
    fn start_and_deal_lay_out_cards() {
        let state = started(5);
        assert_eq!(state.table().len(), 4);
        assert_eq!(state.hand(0).len(), 6);
        assert_eq!(state.hand(1).len(), 6);
        assert_eq!(state.undealt(), 36);
        assert_eq!(state.phase(), Phase::AwaitingMove);
        let (union, total) = state.card_census();
        assert_eq!(union, CardSet::full());
        assert_eq!(total, 52);
    }

    #[test]
    fn dealing_twice_without_playing_fails() {
        let mut state = started(5);
        assert!(matches!(state.deal(), Err(EngineError::WrongPhase { .. })));
    }

    #[test]
    fn out_of_turn_moves_are_refused() {
        let mut state = started(6);
        let card = state.hand(1).first().unwrap();
        assert_eq!(
            state.apply_move(1, Move::lay_down(card)),
            Err(EngineError::OutOfTurn { expected: 0, actual: 1 })
        );
    }

    #[test]
    fn illegal_moves_report_every_failed_check() {
        let state = started(7);
        let foreign = state.hand(1).first().unwrap();
        let mv = Move::new(foreign, CardSet::single(foreign));
        let reasons = state.check_move(0, &mv).unwrap_err();
        assert_eq!(reasons.len(), 2);
        assert!(matches!(reasons[0], IllegalMove::CardNotInHand(_)));
        assert!(matches!(reasons[1], IllegalMove::NotOnTable(_)));
    }

    #[test]
    fn lay_down_moves_card_to_table() {
        let mut state = started(8);
        let card = state.hand(0).first().unwrap();
        let outcome = state.apply_move(0, Move::lay_down(card)).unwrap();
        assert!(outcome.taken.is_empty());
        assert!(!outcome.table_cleared);
        assert!(state.table().contains(card));
        assert!(!state.hand(0).contains(card));
        assert_eq!(state.to_move(), 1);
        assert_eq!(state.last_capturer(), None);
    }

    #[test]
    fn settling_requires_the_settling_phase() {
        let mut state = started(9);
        assert!(matches!(state.settle(), Err(EngineError::WrongPhase { .. })));
    }

    fn settling_with(piles: [&[&str]; 2], table: &[&str], last: Option<usize>) -> TablicState {
        let mut state = TablicState::new(["north", "south"], Deck::standard()).unwrap();
        for (slot, pile) in state.players.iter_mut().zip(piles) {
            slot.captured = pile.iter().map(|t| t.parse::<crate::model::card::Card>().unwrap()).collect();
        }
        state.table = table.iter().map(|t| t.parse::<crate::model::card::Card>().unwrap()).collect();
        state.last_capturer = last;
        state.phase = Phase::Settling;
        state
    }

    #[test]
    fn tied_card_counts_award_no_bonus() {
        let mut state = settling_with([&["AH", "KS", "3C"], &["QH", "10D", "2C"]], &[], Some(1));
        let result = state.settle().unwrap();
        assert!(result.players.iter().all(|p| !p.strict_max));
        assert_eq!(result.players[0].card_count, 3);
        assert_eq!(result.players[1].captured_points, 4);
        assert_eq!(state.phase(), Phase::Finished);
        assert!(state.result().is_some());
    }

    #[test]
    fn leftover_table_goes_to_last_capturer() {
        let mut state = settling_with([&["AH", "KS", "3C"], &["QH", "10D", "2C"]], &["JD"], Some(1));
        let result = state.settle().unwrap();
        assert!(result.players[1].strict_max);
        assert!(!result.players[0].strict_max);
        assert_eq!(result.players[1].card_count, 4);
        assert_eq!(result.players[1].settled_score(), 5 + 3);
        assert!(state.table().is_empty());
    }

    #[test]
    fn leftover_table_stays_without_any_capture() {
        let mut state = settling_with([&[], &[]], &["JD", "5S"], None);
        let result = state.settle().unwrap();
        assert!(result.players.iter().all(|p| !p.strict_max && p.card_count == 0));
        assert_eq!(state.table().len(), 2);
    }
}
