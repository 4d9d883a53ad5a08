use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::rank::Rank;

/// Totals reachable by a selection of cards, as a bit per total in `0..=14`.
///
/// Each ace contributes 1 or 11. Totals past the highest rank can never be
/// captured and are dropped as soon as they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SumSet(u16);

const SUM_MASK: u32 = (1 << (Rank::MAX_VALUE as u32 + 1)) - 1;

impl SumSet {
    /// Totals of the empty selection.
    pub const ZERO: SumSet = SumSet(1);

    pub fn add(self, card: Card) -> SumSet {
        let totals = self.0 as u32;
        let shifted = if card.is_ace() {
            (totals << 1) | (totals << 11)
        } else {
            totals << card.rank.value()
        };
        SumSet((shifted & SUM_MASK) as u16)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, total: u8) -> bool {
        total <= Rank::MAX_VALUE && self.0 & (1 << total) != 0
    }

    pub fn totals(self) -> impl Iterator<Item = u8> {
        (0..=Rank::MAX_VALUE).filter(move |&total| self.contains(total))
    }

    /// Whether some total equals the rank's value (11 counts for the ace).
    pub fn reaches(self, rank: Rank) -> bool {
        self.contains(rank.value()) || (rank.is_ace() && self.contains(11))
    }

    /// Ranks this selection can capture, ascending and without repeats.
    pub fn ranks(self) -> impl Iterator<Item = Rank> {
        Rank::ORDERED
            .into_iter()
            .filter(move |&rank| self.reaches(rank))
    }
}

pub fn subset_sums(cards: CardSet) -> SumSet {
    cards.iter().fold(SumSet::ZERO, SumSet::add)
}

#[cfg(test)]
mod tests {
    use super::{SumSet, subset_sums};
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;
    use crate::model::rank::Rank;

    fn cards(texts: &[&str]) -> CardSet {
        texts.iter().map(|t| t.parse::<Card>().unwrap()).collect()
    }

    #[test]
    fn lone_ace_is_one_or_eleven() {
        let sums = subset_sums(cards(&["AH"]));
        assert_eq!(sums.totals().collect::<Vec<_>>(), vec![1, 11]);
        assert_eq!(sums.ranks().collect::<Vec<_>>(), vec![Rank::Ace]);
    }

    #[test]
    fn two_aces_sum_to_two_or_twelve() {
        let sums = subset_sums(cards(&["AH", "AS"]));
        assert_eq!(sums.totals().collect::<Vec<_>>(), vec![2, 12]);
        assert_eq!(sums.ranks().collect::<Vec<_>>(), vec![Rank::Two, Rank::Jack]);
    }

    #[test]
    fn ace_keeps_only_the_value_that_fits() {
        let sums = subset_sums(cards(&["AH", "5S"]));
        assert_eq!(sums.totals().collect::<Vec<_>>(), vec![6]);
        let sums = subset_sums(cards(&["AH", "3S"]));
        assert_eq!(sums.totals().collect::<Vec<_>>(), vec![4, 14]);
    }

    #[test]
    fn totals_above_fourteen_vanish() {
        assert!(subset_sums(cards(&["KH", "2S"])).is_empty());
        assert!(subset_sums(cards(&["9H", "6S"])).is_empty());
        assert!(!subset_sums(cards(&["9H", "5S"])).is_empty());
    }

    #[test]
    fn eleven_reaches_the_ace() {
        let sums = subset_sums(cards(&["5H", "6S"]));
        assert!(sums.reaches(Rank::Ace));
        assert_eq!(sums.ranks().collect::<Vec<_>>(), vec![Rank::Ace]);
    }

    #[test]
    fn empty_selection_only_totals_zero() {
        assert_eq!(subset_sums(CardSet::EMPTY), SumSet::ZERO);
        assert_eq!(SumSet::ZERO.ranks().count(), 0);
    }
}
