use crate::game::engine::Phase;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::rank::Rank;
use thiserror::Error;

/// Reasons a match cannot be set up. Reported before any state exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("a match needs at least {min} players, got {actual}")]
    TooFewPlayers { min: usize, actual: usize },
    #[error("{cards} cards cannot be dealt evenly to {players} players")]
    UnevenDeal { cards: usize, players: usize },
    #[error("deck must hold all 52 distinct cards, got {0}")]
    IncompleteDeck(usize),
}

/// One failed legality check on a proposed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("{0} is not in hand")]
    CardNotInHand(Card),
    #[error("{0} is not on the table")]
    NotOnTable(CardSet),
    #[error("{captured} does not split into groups summing to {rank}")]
    SumMismatch { rank: Rank, captured: CardSet },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("operation not allowed in phase {actual:?}")]
    WrongPhase { actual: Phase },
    #[error("seat {actual} moved but seat {expected} is to play")]
    OutOfTurn { expected: usize, actual: usize },
    #[error("no seat {0} at this table")]
    UnknownSeat(usize),
    #[error("illegal move: {}", format_reasons(.0))]
    Illegal(Vec<IllegalMove>),
}

/// Failure while running a whole match with players attached.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("player {name} at seat {seat} produced {attempts} illegal moves in a row")]
    TooManyIllegalMoves {
        seat: usize,
        name: String,
        attempts: usize,
    },
}

pub(crate) fn format_reasons(reasons: &[IllegalMove]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
