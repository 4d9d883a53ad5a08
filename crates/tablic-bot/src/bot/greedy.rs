use crate::bot::equivalent_card;
use crate::bot::fallback_move;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tablic_core::game::{Player, Retry};
use tablic_core::model::card_set::CardSet;
use tablic_core::model::play::Move;
use tablic_core::ranking::best_move;

/// Plays the top-ranked move every turn.
pub struct GreedyPlayer {
    name: String,
    rng: StdRng,
}

impl GreedyPlayer {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for GreedyPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide_move(&mut self, hand: CardSet, table: CardSet, _retry: &Retry) -> Move {
        match best_move(hand, table) {
            Some(ranked) => Move::new(
                equivalent_card(hand, ranked.mv.card, &mut self.rng),
                ranked.mv.captured,
            ),
            None => fallback_move(hand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GreedyPlayer;
    use tablic_core::game::{Player, Retry};
    use tablic_core::model::bucket::Bucket;
    use tablic_core::model::card::Card;
    use tablic_core::model::card_set::CardSet;
    use tablic_core::model::play::Move;

    fn cards(texts: &[&str]) -> CardSet {
        texts.iter().map(|t| t.parse::<Card>().unwrap()).collect()
    }

    #[test]
    fn takes_the_best_capture() {
        let mut player = GreedyPlayer::new("greedy", 1);
        let table = cards(&["10D", "3S"]);
        let mv = player.decide_move(cards(&["10S", "3H", "7C"]), table, &Retry::First);
        assert_eq!(mv, Move::new("10S".parse().unwrap(), cards(&["10D"])));
    }

    #[test]
    fn equivalent_cards_are_interchangeable() {
        let table = cards(&["9D"]);
        let hand = cards(&["9H", "9S", "2C"]);
        let mut seen = CardSet::EMPTY;
        for seed in 0..32 {
            let mut player = GreedyPlayer::new("greedy", seed);
            let mv = player.decide_move(hand, table, &Retry::First);
            assert_eq!(Bucket::of(mv.card), Bucket::of("9H".parse().unwrap()));
            assert_eq!(mv.captured, table);
            seen.insert(mv.card);
        }
        assert_eq!(seen, cards(&["9H", "9S"]));
    }
}
