//! Closed-world inference over opponents' hidden hands.

use crate::model::bucket::Bucket;
use crate::model::card_set::CardSet;
use crate::model::play::Move;
use crate::model::rules::{DEALT_CARDS, HAND_SIZE, TABLE_BONUS};
use crate::ranking::rank_moves;
use tracing::trace;

/// What one opponent is believed to lack, per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpponentBelief {
    certain_absent: [bool; Bucket::COUNT],
    probable_absent: [i8; Bucket::COUNT],
}

impl OpponentBelief {
    const fn new() -> Self {
        Self {
            certain_absent: [false; Bucket::COUNT],
            probable_absent: [0; Bucket::COUNT],
        }
    }

    /// Every instance of the bucket has been seen; never reverts.
    pub fn is_certain_absent(&self, bucket: Bucket) -> bool {
        self.certain_absent[bucket.index()]
    }

    /// Positive evidence counter says the bucket is probably not held.
    pub fn is_probably_absent(&self, bucket: Bucket) -> bool {
        self.probable_absent[bucket.index()] > 0
    }

    pub fn counter(&self, bucket: Bucket) -> i8 {
        self.probable_absent[bucket.index()]
    }

    fn is_plausible(&self, bucket: Bucket) -> bool {
        !self.is_certain_absent(bucket) && !self.is_probably_absent(bucket)
    }
}

/// Tracks seen cards and per-opponent absence beliefs from one seat's
/// point of view.
///
/// The inference rule assumes opponents play greedily: when an opponent
/// passes over a move worth more than the one it made, the card that move
/// needed is probably not in its hand. The tracker is allowed to be wrong and
/// corrects itself when a contradicting card is played.
#[derive(Debug, Clone)]
pub struct BeliefTracker {
    perspective: usize,
    seen: CardSet,
    undealt: usize,
    beliefs: Vec<OpponentBelief>,
}

impl BeliefTracker {
    pub fn new(perspective: usize, players: usize) -> Self {
        Self {
            perspective,
            seen: CardSet::EMPTY,
            undealt: DEALT_CARDS,
            beliefs: vec![OpponentBelief::new(); players],
        }
    }

    pub fn perspective(&self) -> usize {
        self.perspective
    }

    pub fn players(&self) -> usize {
        self.beliefs.len()
    }

    /// Cards known to be out of every opponent's hand: own hand, table,
    /// and every card played so far.
    pub fn seen(&self) -> CardSet {
        self.seen
    }

    /// Cards still in the deck, not yet dealt to anyone.
    pub fn undealt(&self) -> usize {
        self.undealt
    }

    pub fn deals_remain(&self) -> bool {
        self.undealt > 0
    }

    pub fn belief(&self, seat: usize) -> Option<&OpponentBelief> {
        self.beliefs.get(seat)
    }

    pub fn on_new_deal(&mut self, hand: CardSet, table: CardSet) {
        self.seen |= hand | table;
        self.undealt = self
            .undealt
            .saturating_sub(self.beliefs.len() * hand.len());
        for belief in &mut self.beliefs {
            belief.probable_absent = [0; Bucket::COUNT];
        }
        self.refresh_certain();
    }

    /// Folds a move into the belief state. `table` is the table the mover
    /// saw before playing.
    pub fn observe(&mut self, seat: usize, table: CardSet, mv: &Move) {
        let played = Bucket::of(mv.card);
        let opponent = seat != self.perspective && seat < self.beliefs.len();
        if opponent {
            self.beliefs[seat].probable_absent[played.index()] = 0;
            if self.deals_remain() {
                self.infer_passed_moves(seat, table, mv);
            }
        }

        self.seen |= mv.captured.with(mv.card);
        self.refresh_certain();

        if opponent && self.deals_remain() {
            self.grant_last_instance(mv);
        }
    }

    fn infer_passed_moves(&mut self, seat: usize, table: CardSet, mv: &Move) {
        let played = Bucket::of(mv.card);
        let made = if mv.is_capture() {
            mv.taken().points() as i32 + mv.clears(table) as i32 * TABLE_BONUS as i32
        } else {
            0
        };
        let hand = self.probable_hand(seat);
        let belief = &mut self.beliefs[seat];
        for candidate in rank_moves(hand, table) {
            if candidate.score() <= made {
                continue;
            }
            let bucket = Bucket::of(candidate.mv.card);
            if bucket == played {
                continue;
            }
            let counter = &mut belief.probable_absent[bucket.index()];
            *counter = counter.saturating_add(1);
            trace!(
                target: "tablic_core::belief",
                seat,
                bucket = %bucket,
                counter = *counter,
                "passed over a better move"
            );
        }
    }

    /// With one instance of a rank left unseen somebody must hold it, so
    /// earlier evidence against holding it is discounted for a whole deal.
    fn grant_last_instance(&mut self, mv: &Move) {
        let rank = mv.card.rank;
        let unseen: CardSet = Bucket::all()
            .filter(|bucket| bucket.rank() == rank)
            .map(Bucket::instances)
            .fold(CardSet::EMPTY, |acc, cards| acc | cards)
            .difference(self.seen);
        if unseen.len() != 1 {
            return;
        }
        let Some(last) = unseen.first() else {
            return;
        };
        let bucket = Bucket::of(last);
        for (seat, belief) in self.beliefs.iter_mut().enumerate() {
            if seat != self.perspective {
                belief.probable_absent[bucket.index()] = -(HAND_SIZE as i8);
            }
        }
    }

    fn refresh_certain(&mut self) {
        for bucket in Bucket::all() {
            if bucket.instances().is_subset(self.seen) {
                for belief in &mut self.beliefs {
                    belief.certain_absent[bucket.index()] = true;
                }
            }
        }
    }

    /// One representative unseen card per bucket the opponent plausibly
    /// holds.
    pub fn probable_hand(&self, seat: usize) -> CardSet {
        self.probable_hand_given(seat, CardSet::EMPTY)
    }

    /// Like [`probable_hand`](Self::probable_hand), treating `extra_seen` as
    /// seen too. Search uses this for cards played along a line.
    pub fn probable_hand_given(&self, seat: usize, extra_seen: CardSet) -> CardSet {
        let Some(belief) = self.beliefs.get(seat) else {
            return CardSet::EMPTY;
        };
        let pool = (self.seen | extra_seen).complement();
        Bucket::all()
            .filter(|&bucket| belief.is_plausible(bucket))
            .filter_map(|bucket| bucket.representative(pool))
            .collect()
    }

    /// One representative per bucket with an unseen card, ignoring
    /// absence evidence.
    pub fn unseen_representatives(&self, extra_seen: CardSet) -> CardSet {
        let pool = (self.seen | extra_seen).complement();
        Bucket::all()
            .filter_map(|bucket| bucket.representative(pool))
            .collect()
    }
}
