//! Fixed table rules.

/// Cards dealt to each player per deal.
pub const HAND_SIZE: usize = 6;

/// Cards placed face up before the first deal.
pub const INITIAL_TABLE: usize = 4;

/// Points for each capture that empties the table.
pub const TABLE_BONUS: u32 = 1;

/// Points for holding strictly the most captured cards at the end.
pub const MAX_BONUS: u32 = 3;

/// Cards shared out to the players over the whole match.
pub const DEALT_CARDS: usize = crate::model::card::Card::COUNT - INITIAL_TABLE;

pub const MIN_PLAYERS: usize = 2;
