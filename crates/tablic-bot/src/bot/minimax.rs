use crate::bot::params::SearchConfig;
use crate::bot::search::{SearchInput, SearchStats, search};
use crate::bot::{equivalent_card, fallback_move};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tablic_core::belief::BeliefTracker;
use tablic_core::game::{MoveEvent, Player, Retry};
use tablic_core::model::card_set::CardSet;
use tablic_core::model::play::Move;
use tablic_core::model::rules::TABLE_BONUS;
use tablic_core::ranking::best_move;
use tracing::error;

/// Searches a few rounds ahead against the opponents' probable hands.
///
/// The player keeps its own view of the match: banked points and card counts
/// per seat, the last capturer, and a belief tracker fed from every move.
pub struct MinimaxPlayer {
    name: String,
    seat: usize,
    config: SearchConfig,
    tracker: BeliefTracker,
    points: Vec<i32>,
    cards: Vec<i32>,
    cards_left: Vec<usize>,
    last_capturer: Option<usize>,
    rng: StdRng,
    last_stats: Option<SearchStats>,
}

impl MinimaxPlayer {
    pub fn new(name: impl Into<String>, seed: u64, config: SearchConfig) -> Self {
        Self {
            name: name.into(),
            seat: 0,
            config,
            tracker: BeliefTracker::new(0, 2),
            points: Vec::new(),
            cards: Vec::new(),
            cards_left: Vec::new(),
            last_capturer: None,
            rng: StdRng::seed_from_u64(seed),
            last_stats: None,
        }
    }

    pub fn tracker(&self) -> &BeliefTracker {
        &self.tracker
    }

    /// Statistics of the most recent search, if one ran.
    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last_stats.as_ref()
    }

    pub fn points(&self) -> &[i32] {
        &self.points
    }

    fn greedy(&self, hand: CardSet, table: CardSet) -> Move {
        best_move(hand, table)
            .map(|ranked| ranked.mv)
            .unwrap_or_else(|| fallback_move(hand))
    }
}

impl Player for MinimaxPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_player_count(&mut self, seat: usize, names: &[String]) {
        let players = names.len();
        self.seat = seat;
        self.tracker = BeliefTracker::new(seat, players);
        self.points = vec![0; players];
        self.cards = vec![0; players];
        self.cards_left = vec![0; players];
        self.last_capturer = None;
        self.last_stats = None;
    }

    fn on_new_deal(&mut self, hand: CardSet, table: CardSet) {
        self.tracker.on_new_deal(hand, table);
        self.cards_left.iter_mut().for_each(|left| *left = hand.len());
    }

    fn on_move(&mut self, event: &MoveEvent) {
        let MoveEvent { seat, table, mv, .. } = *event;
        if seat >= self.points.len() {
            return;
        }
        self.tracker.observe(seat, table, &mv);
        if mv.is_capture() {
            let taken = mv.taken();
            self.points[seat] += taken.points() as i32;
            if mv.clears(table) {
                self.points[seat] += TABLE_BONUS as i32;
            }
            self.cards[seat] += taken.len() as i32;
            self.last_capturer = Some(seat);
        }
        self.cards_left[seat] = self.cards_left[seat].saturating_sub(1);
    }

    fn decide_move(&mut self, hand: CardSet, table: CardSet, retry: &Retry) -> Move {
        // A rejected search move means our view drifted; the greedy move is
        // computed from the real hand and table only.
        let planned = if retry.is_retry() || self.points.is_empty() {
            self.greedy(hand, table)
        } else {
            let input = SearchInput {
                seat: self.seat,
                hand,
                table,
                tracker: &self.tracker,
                points: &self.points,
                cards: &self.cards,
                cards_left: &self.cards_left,
                last_capturer: self.last_capturer,
            };
            match search(&input, &self.config) {
                Ok(outcome) => {
                    let first = outcome.line.first().copied();
                    self.last_stats = Some(outcome.stats);
                    first.unwrap_or_else(|| fallback_move(hand))
                }
                Err(err) => {
                    error!(
                        target: "tablic_bot::minimax",
                        player = %self.name,
                        seat = self.seat,
                        error = %err,
                        "search failed; playing the greedy move"
                    );
                    self.greedy(hand, table)
                }
            }
        };
        Move::new(equivalent_card(hand, planned.card, &mut self.rng), planned.captured)
    }
}
