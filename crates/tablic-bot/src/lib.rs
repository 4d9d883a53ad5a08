pub mod bot;

pub use bot::{
    BotDifficulty, Evaluation, GreedyPlayer, MinimaxPlayer, RandomPlayer, SearchConfig,
    SearchError, SearchInput, SearchOutcome, SearchStats, UnknownDifficulty,
};
