use crate::model::rules::{MAX_BONUS, TABLE_BONUS};
use serde::{Deserialize, Serialize};

/// Final standing of one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub name: String,
    pub captured_points: u32,
    pub table_bonus_count: u32,
    pub strict_max: bool,
    pub card_count: usize,
}

impl PlayerResult {
    pub fn settled_score(&self) -> u32 {
        self.captured_points
            + self.table_bonus_count * TABLE_BONUS
            + self.strict_max as u32 * MAX_BONUS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub players: Vec<PlayerResult>,
}

impl MatchResult {
    pub fn settled_scores(&self) -> Vec<u32> {
        self.players.iter().map(PlayerResult::settled_score).collect()
    }

    /// Seats sharing the highest settled score.
    pub fn winners(&self) -> Vec<usize> {
        let scores = self.settled_scores();
        let Some(&best) = scores.iter().max() else {
            return Vec::new();
        };
        scores
            .iter()
            .enumerate()
            .filter(|(_, score)| **score == best)
            .map(|(seat, _)| seat)
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchResult, PlayerResult};

    fn player(name: &str, points: u32, clears: u32, strict_max: bool) -> PlayerResult {
        PlayerResult {
            name: name.into(),
            captured_points: points,
            table_bonus_count: clears,
            strict_max,
            card_count: 0,
        }
    }

    #[test]
    fn settled_score_adds_bonuses() {
        assert_eq!(player("a", 10, 2, true).settled_score(), 15);
        assert_eq!(player("b", 10, 0, false).settled_score(), 10);
    }

    #[test]
    fn winners_include_ties() {
        let result = MatchResult {
            players: vec![player("a", 11, 0, false), player("b", 8, 0, true), player("c", 3, 0, false)],
        };
        assert_eq!(result.winners(), vec![0, 1]);
        let json = result.to_json().unwrap();
        assert!(json.contains("\"strict_max\": true"));
    }
}
