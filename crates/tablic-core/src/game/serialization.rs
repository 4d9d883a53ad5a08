use super::engine::{Phase, TablicState};
use crate::model::card::Card;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatSnapshot {
    pub name: String,
    pub hand_size: usize,
    pub captured_points: u32,
    pub captured_cards: usize,
    pub table_clears: u32,
}

/// Public, read-only view of a match. Hidden hands are reduced to their size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshot {
    pub phase: Phase,
    pub deals_played: usize,
    pub undealt: usize,
    pub to_move: usize,
    pub last_capturer: Option<usize>,
    pub table: Vec<Card>,
    pub seats: Vec<SeatSnapshot>,
}

impl MatchSnapshot {
    pub fn capture(state: &TablicState) -> Self {
        let seats = (0..state.player_count())
            .filter_map(|seat| state.slot(seat))
            .map(|slot| SeatSnapshot {
                name: slot.name.clone(),
                hand_size: slot.hand.len(),
                captured_points: slot.captured.points(),
                captured_cards: slot.captured.len(),
                table_clears: slot.table_clears,
            })
            .collect();
        MatchSnapshot {
            phase: state.phase(),
            deals_played: state.deals_played(),
            undealt: state.undealt(),
            to_move: state.to_move(),
            last_capturer: state.last_capturer(),
            table: state.table().to_vec(),
            seats,
        }
    }

    pub fn to_json(state: &TablicState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
