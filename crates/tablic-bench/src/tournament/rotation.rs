/// Seat orders for successive matches: every match shifts the configured
/// players one seat to the left, so each player leads equally often.
pub struct SeatRotation {
    players: usize,
}

impl SeatRotation {
    pub fn new(players: usize) -> Self {
        Self { players }
    }

    /// Player index sitting in each seat for `match_index`.
    pub fn seating(&self, match_index: usize) -> Vec<usize> {
        if self.players == 0 {
            return Vec::new();
        }
        let shift = match_index % self.players;
        (0..self.players)
            .map(|seat| (seat + shift) % self.players)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_uses_configured_order() {
        assert_eq!(SeatRotation::new(4).seating(0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn every_player_leads_once_per_cycle() {
        let rotation = SeatRotation::new(4);
        let leaders: Vec<usize> = (0..4).map(|m| rotation.seating(m)[0]).collect();
        assert_eq!(leaders, vec![0, 1, 2, 3]);
        assert_eq!(rotation.seating(5), rotation.seating(1));
    }

    #[test]
    fn empty_table_has_no_seats() {
        assert!(SeatRotation::new(0).seating(3).is_empty());
    }
}
