use crate::capture::CaptureMap;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::play::Move;
use crate::model::rank::Rank;
use crate::model::rules::TABLE_BONUS;
use core::cmp::Ordering;

/// A legal move annotated with the features the greedy order sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMove {
    pub mv: Move,
    pub table_clear: bool,
    /// Points taken, or minus the played card's points for a lay-down.
    pub value: i32,
    pub captured_count: u8,
    pub diamond_ten: i8,
    pub club_two: i8,
    pub aces: i8,
}

impl RankedMove {
    pub fn new(mv: Move, table: CardSet) -> Self {
        let card = mv.card;
        if mv.is_capture() {
            let taken = mv.taken();
            Self {
                mv,
                table_clear: mv.clears(table),
                value: taken.points() as i32,
                captured_count: mv.captured.len() as u8,
                diamond_ten: taken.iter().any(Card::is_diamond_ten) as i8,
                club_two: taken.iter().any(Card::is_club_two) as i8,
                aces: taken.count_aces() as i8,
            }
        } else {
            Self {
                mv,
                table_clear: false,
                value: -(card.points() as i32),
                captured_count: 0,
                diamond_ten: -(card.is_diamond_ten() as i8),
                club_two: -(card.is_club_two() as i8),
                aces: -(card.is_ace() as i8),
            }
        }
    }

    /// Points this move banks immediately, table bonus included.
    /// Lay-downs bank nothing.
    pub fn score(&self) -> i32 {
        if self.mv.is_capture() {
            self.value + self.table_clear as i32 * TABLE_BONUS as i32
        } else {
            0
        }
    }

    fn low_rank_preference(&self) -> u8 {
        Rank::MAX_VALUE - self.mv.card.rank.value()
    }
}

impl Ord for RankedMove {
    fn cmp(&self, other: &Self) -> Ordering {
        self.table_clear
            .cmp(&other.table_clear)
            .then(self.value.cmp(&other.value))
            .then(self.captured_count.cmp(&other.captured_count))
            .then(self.diamond_ten.cmp(&other.diamond_ten))
            .then(self.club_two.cmp(&other.club_two))
            .then(self.aces.cmp(&other.aces))
            .then(self.low_rank_preference().cmp(&other.low_rank_preference()))
            .then(self.mv.card.cmp(&other.mv.card))
            .then_with(|| self.mv.captured.iter().rev().cmp(other.mv.captured.iter().rev()))
    }
}

impl PartialOrd for RankedMove {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every legal move for `hand` on `table`, best first.
pub fn rank_moves(hand: CardSet, table: CardSet) -> Vec<RankedMove> {
    let map = CaptureMap::new(table);
    let mut per_rank: [Option<Vec<CardSet>>; Rank::ORDERED.len()] = Default::default();
    let mut moves = Vec::new();
    for card in hand {
        let captures = per_rank[card.rank.index()].get_or_insert_with(|| map.captures(card.rank));
        for &captured in captures.iter() {
            moves.push(RankedMove::new(Move::new(card, captured), table));
        }
    }
    moves.sort_by(|a, b| b.cmp(a));
    moves
}

/// The greedy choice: the first move in ranked order.
pub fn best_move(hand: CardSet, table: CardSet) -> Option<RankedMove> {
    rank_moves(hand, table).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::{RankedMove, best_move, rank_moves};
    use crate::capture::is_legal_capture;
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;
    use crate::model::play::Move;

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    fn cards(texts: &[&str]) -> CardSet {
        texts.iter().map(|t| card(t)).collect()
    }

    #[test]
    fn every_hand_card_can_be_laid_down() {
        let hand = cards(&["KS", "2H", "9D"]);
        let moves = rank_moves(hand, cards(&["QC"]));
        for held in hand {
            assert!(moves.iter().any(|m| m.mv == Move::lay_down(held)));
        }
        assert!(moves.iter().all(|m| is_legal_capture(m.mv.card.rank, m.mv.captured)));
    }

    #[test]
    fn table_clear_outranks_points() {
        let table = cards(&["3S", "4D"]);
        let hand = cards(&["7H", "4H"]);
        let best = best_move(hand, table).unwrap();
        assert!(best.table_clear);
        assert_eq!(best.mv, Move::new(card("7H"), table));
    }

    #[test]
    fn captures_outrank_lay_downs() {
        let table = cards(&["5S", "KD"]);
        let hand = cards(&["5H", "AC"]);
        let moves = rank_moves(hand, table);
        assert_eq!(moves[0].mv, Move::new(card("5H"), cards(&["5S"])));
        let last = moves.last().unwrap();
        assert_eq!(last.mv, Move::lay_down(card("AC")));
        assert_eq!(last.value, -1);
        assert_eq!(last.aces, -1);
    }

    #[test]
    fn distinguished_cards_flagged_both_ways() {
        let table = cards(&["10D"]);
        let ranked = RankedMove::new(Move::new(card("10S"), table), table);
        assert_eq!(ranked.diamond_ten, 1);
        assert_eq!(ranked.value, 3);
        assert_eq!(ranked.score(), 4);
        let laid = RankedMove::new(Move::lay_down(card("2C")), table);
        assert_eq!(laid.club_two, -1);
        assert_eq!(laid.value, -1);
        assert_eq!(laid.score(), 0);
    }

    #[test]
    fn order_is_total_and_repeatable() {
        let hand = cards(&["7H", "7S", "AC", "2C", "QD", "10D"]);
        let table = cards(&["3S", "4D", "AH", "2H", "5C", "6C"]);
        let first = rank_moves(hand, table);
        let second = rank_moves(hand, table);
        assert_eq!(first, second);
        for pair in first.windows(2) {
            assert!(pair[0] > pair[1], "{:?} vs {:?}", pair[0].mv, pair[1].mv);
        }
    }

    #[test]
    fn lower_rank_preferred_on_equal_value() {
        let table = cards(&["4S", "8D"]);
        let hand = cards(&["4H", "8H"]);
        let moves = rank_moves(hand, table);
        assert_eq!(moves[0].mv.card, card("4H"));
    }
}
