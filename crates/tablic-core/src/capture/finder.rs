use crate::capture::sums::{SumSet, subset_sums};
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::rank::Rank;
use std::collections::HashSet;

/// Every subset of a table grouped by the rank it sums to.
///
/// A subset is registered once under each rank its sum set reaches, so a
/// subset holding an ace can appear under two ranks.
#[derive(Debug, Clone, Default)]
pub struct CaptureMap {
    table: CardSet,
    families: [Vec<CardSet>; Rank::ORDERED.len()],
}

impl CaptureMap {
    pub fn new(table: CardSet) -> Self {
        let cards = table.to_vec();
        let mut map = CaptureMap {
            table,
            families: Default::default(),
        };
        map.collect(&cards, 0, CardSet::EMPTY, SumSet::ZERO);
        map
    }

    fn collect(&mut self, cards: &[Card], start: usize, chosen: CardSet, sums: SumSet) {
        for (offset, &card) in cards[start..].iter().enumerate() {
            let next = sums.add(card);
            if next.is_empty() {
                // Cards ascend in value, so every later card overflows too.
                break;
            }
            let chosen = chosen.with(card);
            for rank in next.ranks() {
                self.families[rank.index()].push(chosen);
            }
            self.collect(cards, start + offset + 1, chosen, next);
        }
    }

    pub fn table(&self) -> CardSet {
        self.table
    }

    /// Subsets of the table summing to `rank`.
    pub fn family(&self, rank: Rank) -> &[CardSet] {
        &self.families[rank.index()]
    }

    /// Ranks with at least one subset summing to them.
    pub fn ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        Rank::ORDERED
            .into_iter()
            .filter(|rank| !self.families[rank.index()].is_empty())
    }

    /// Every legal capture for a card of `rank`, the empty lay-down included.
    pub fn captures(&self, rank: Rank) -> Vec<CardSet> {
        disjoint_unions(self.family(rank))
    }
}

/// Closure of pairwise-disjoint unions over `family`, seeded with the empty
/// set. Members keep the order in which they were first formed.
pub fn disjoint_unions(family: &[CardSet]) -> Vec<CardSet> {
    let mut closure = vec![CardSet::EMPTY];
    let mut known: HashSet<CardSet> = HashSet::from([CardSet::EMPTY]);
    for &subset in family {
        let formed = closure.len();
        for index in 0..formed {
            let base = closure[index];
            if base.is_disjoint(subset) {
                let union = base | subset;
                if known.insert(union) {
                    closure.push(union);
                }
            }
        }
    }
    closure
}

/// Whether `captured` can be taken by a card of `rank`: it must split into
/// groups that each sum to the rank. Empty captures are always legal.
pub fn is_legal_capture(rank: Rank, captured: CardSet) -> bool {
    let Some(anchor) = captured.first() else {
        return true;
    };
    let rest = captured.without(anchor);
    if subset_sums(CardSet::single(anchor)).reaches(rank) && is_legal_capture(rank, rest) {
        return true;
    }
    rest.submasks().any(|partners| {
        let group = partners.with(anchor);
        subset_sums(group).reaches(rank) && is_legal_capture(rank, captured - group)
    })
}
