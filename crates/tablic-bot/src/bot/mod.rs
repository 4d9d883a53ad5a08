mod greedy;
mod minimax;
mod params;
mod random;
mod search;

pub use greedy::GreedyPlayer;
pub use minimax::MinimaxPlayer;
pub use params::SearchConfig;
pub use random::RandomPlayer;
pub use search::{Evaluation, SearchError, SearchInput, SearchOutcome, SearchStats, evaluate, search};

use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tablic_core::game::Player;
use tablic_core::model::bucket::Bucket;
use tablic_core::model::card::Card;
use tablic_core::model::card_set::CardSet;
use tablic_core::model::play::Move;
use tablic_core::model::rank::Rank;
use tablic_core::model::suit::Suit;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    Random,
    Greedy,
    #[default]
    Minimax,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bot kind `{0}` (expected random, greedy or minimax)")]
pub struct UnknownDifficulty(pub String);

impl BotDifficulty {
    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotDifficulty> = OnceLock::new();
        *CACHED.get_or_init(|| match std::env::var("TABLIC_BOT_DIFFICULTY") {
            Ok(raw) => Self::from_name(&raw).unwrap_or_default(),
            Err(_) => BotDifficulty::default(),
        })
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "random" | "easy" => Some(BotDifficulty::Random),
            "greedy" | "normal" => Some(BotDifficulty::Greedy),
            "minimax" | "hard" | "search" => Some(BotDifficulty::Minimax),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::Random => "random",
            BotDifficulty::Greedy => "greedy",
            BotDifficulty::Minimax => "minimax",
        }
    }

    /// Seats a new bot of this kind.
    pub fn build(self, name: impl Into<String>, seed: u64, config: SearchConfig) -> Box<dyn Player> {
        match self {
            BotDifficulty::Random => Box::new(RandomPlayer::new(name, seed)),
            BotDifficulty::Greedy => Box::new(GreedyPlayer::new(name, seed)),
            BotDifficulty::Minimax => Box::new(MinimaxPlayer::new(name, seed, config)),
        }
    }
}

impl FromStr for BotDifficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Swaps `card` for a random hand card of the same bucket. Cards in one
/// bucket play identically, so this only hides which one was held.
pub(crate) fn equivalent_card<R: Rng + ?Sized>(hand: CardSet, card: Card, rng: &mut R) -> Card {
    let options = (Bucket::of(card).instances() & hand).to_vec();
    options.choose(rng).copied().unwrap_or(card)
}

/// Lays down the lowest hand card. Only reached when a strategy has no
/// candidate of its own; an empty hand is never polled by the runner.
pub(crate) fn fallback_move(hand: CardSet) -> Move {
    Move::lay_down(hand.first().unwrap_or(Card::new(Rank::Two, Suit::Clubs)))
}
