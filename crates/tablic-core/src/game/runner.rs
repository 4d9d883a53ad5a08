use crate::game::engine::{Phase, TablicState};
use crate::game::error::MatchError;
use crate::game::log::MatchLog;
use crate::game::player::{MoveEvent, Player, Retry};
use crate::game::result::MatchResult;
use crate::model::deck::Deck;
use tracing::{debug, warn};

/// Drives one match between seated players.
///
/// Players are polled in seat order and re-polled until they produce a legal
/// move. Every player and every log sees each move before it is applied.
/// Re-polling is unbounded unless a cap is set with
/// [`MatchRunner::with_max_attempts`].
pub struct MatchRunner {
    max_attempts: Option<usize>,
}

impl Default for MatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchRunner {
    pub fn new() -> Self {
        Self { max_attempts: None }
    }

    /// Caps the illegal moves tolerated from one player in a single turn.
    /// Hitting the cap ends the match with
    /// [`MatchError::TooManyIllegalMoves`].
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    pub fn run<P: Player>(
        &self,
        players: &mut [P],
        logs: &mut [&mut dyn MatchLog],
        deck: Deck,
    ) -> Result<MatchResult, MatchError> {
        let names: Vec<String> = players.iter().map(|p| p.name().to_string()).collect();
        let mut state = TablicState::new(names.iter().cloned(), deck)?;

        for (seat, player) in players.iter_mut().enumerate() {
            player.on_player_count(seat, &names);
        }
        for log in logs.iter_mut() {
            log.on_new_match(&names);
        }

        state.start()?;
        while matches!(state.phase(), Phase::Dealing | Phase::RoundBoundary) {
            state.deal()?;
            let table = state.table();
            for (seat, player) in players.iter_mut().enumerate() {
                player.on_new_deal(state.hand(seat), table);
            }
            let hands = state.hands();
            for log in logs.iter_mut() {
                log.on_new_deal(&hands, table);
            }
            while state.phase() == Phase::AwaitingMove {
                self.play_turn(&mut state, players, logs)?;
            }
        }

        let result = state.settle()?;
        for player in players.iter_mut() {
            player.on_match_result(&result);
        }
        for log in logs.iter_mut() {
            log.on_match_end(&result);
        }
        Ok(result)
    }

    fn play_turn<P: Player>(
        &self,
        state: &mut TablicState,
        players: &mut [P],
        logs: &mut [&mut dyn MatchLog],
    ) -> Result<(), MatchError> {
        let seat = state.to_move();
        let hand = state.hand(seat);
        let table = state.table();

        let mut retry = Retry::First;
        let mut attempts = 0;
        let mv = loop {
            let player = &mut players[seat];
            let mv = player.decide_move(hand, table, &retry);
            match state.check_move(seat, &mv) {
                Ok(()) => break mv,
                Err(reasons) => {
                    attempts += 1;
                    warn!(
                        target: "tablic_core::runner",
                        seat,
                        player = player.name(),
                        mv = %mv,
                        attempts,
                        "illegal move rejected"
                    );
                    if self.max_attempts.is_some_and(|max| attempts >= max) {
                        return Err(MatchError::TooManyIllegalMoves {
                            seat,
                            name: player.name().to_string(),
                            attempts,
                        });
                    }
                    retry = if player.wants_reason() {
                        Retry::WithReasons(reasons)
                    } else {
                        Retry::Again
                    };
                }
            }
        };

        let event = MoveEvent {
            seat,
            hand,
            table,
            mv,
        };
        for log in logs.iter_mut() {
            log.record_move(&event);
        }
        for (observer, player) in players.iter_mut().enumerate() {
            player.on_move(&MoveEvent {
                hand: state.hand(observer),
                ..event
            });
        }
        let outcome = state.apply_move(seat, mv)?;
        debug!(
            target: "tablic_core::runner",
            seat,
            taken = outcome.taken.len(),
            cleared = outcome.table_cleared,
            "turn complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MatchRunner;
    use crate::game::error::MatchError;
    use crate::game::player::{Player, Retry};
    use crate::model::card_set::CardSet;
    use crate::model::deck::Deck;
    use crate::model::play::Move;

    struct Stubborn;

    impl Player for Stubborn {
        fn name(&self) -> &str {
            "stubborn"
        }

        fn decide_move(&mut self, hand: CardSet, _table: CardSet, _retry: &Retry) -> Move {
            let card = hand.first().unwrap();
            Move::new(card, CardSet::single(card))
        }
    }

    #[test]
    fn gives_up_on_players_that_never_move_legally() {
        let mut players = vec![Stubborn, Stubborn];
        let err = MatchRunner::new()
            .with_max_attempts(3)
            .run(&mut players, &mut [], Deck::shuffled_with_seed(1))
            .unwrap_err();
        assert!(matches!(
            err,
            MatchError::TooManyIllegalMoves { seat: 0, attempts: 3, .. }
        ));
    }

    /// Lays down a card it does not hold for a fixed number of attempts per
    /// turn, then plays its lowest card.
    struct Slow {
        mistakes_per_turn: usize,
        attempts: usize,
        total_mistakes: usize,
    }

    impl Player for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        fn decide_move(&mut self, hand: CardSet, table: CardSet, retry: &Retry) -> Move {
            if matches!(retry, Retry::First) {
                self.attempts = 0;
            }
            if self.attempts < self.mistakes_per_turn {
                self.attempts += 1;
                self.total_mistakes += 1;
                let outside = (CardSet::full() - hand - table).first().unwrap();
                return Move::lay_down(outside);
            }
            Move::lay_down(hand.first().unwrap())
        }
    }

    #[test]
    fn keeps_polling_until_a_legal_move_arrives() {
        let mut players: Vec<Slow> = [100, 0]
            .into_iter()
            .map(|mistakes_per_turn| Slow {
                mistakes_per_turn,
                attempts: 0,
                total_mistakes: 0,
            })
            .collect();
        let result = MatchRunner::new()
            .run(&mut players, &mut [], Deck::shuffled_with_seed(2))
            .unwrap();
        assert_eq!(result.players.len(), 2);
        assert_eq!(players[0].total_mistakes, 24 * 100);
        assert_eq!(players[1].total_mistakes, 0);
    }

    #[test]
    fn refuses_uneven_tables_before_polling() {
        let mut players = vec![Stubborn, Stubborn, Stubborn, Stubborn, Stubborn];
        let err = MatchRunner::new()
            .run(&mut players, &mut [], Deck::standard())
            .unwrap_err();
        assert!(matches!(err, MatchError::Setup(_)));
    }
}
