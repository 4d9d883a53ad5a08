use crate::bot::fallback_move;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tablic_core::capture::CaptureMap;
use tablic_core::game::{Player, Retry};
use tablic_core::model::card_set::CardSet;
use tablic_core::model::play::Move;

/// Picks a uniformly random card and then a random legal capture for it.
pub struct RandomPlayer {
    name: String,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide_move(&mut self, hand: CardSet, table: CardSet, _retry: &Retry) -> Move {
        let cards = hand.to_vec();
        let Some(&card) = cards.choose(&mut self.rng) else {
            return fallback_move(hand);
        };
        let captures = CaptureMap::new(table).captures(card.rank);
        let captured = captures
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(CardSet::EMPTY);
        Move::new(card, captured)
    }
}
