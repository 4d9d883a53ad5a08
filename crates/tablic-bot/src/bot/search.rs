//! Depth- and time-bounded alpha-beta search over the rest of a deal.
//!
//! The searcher knows its own hand exactly and plays opponents from the
//! hands the belief tracker considers probable. Every opponent is assumed to
//! minimise the searcher's standing.

use crate::bot::params::SearchConfig;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tablic_core::belief::BeliefTracker;
use tablic_core::model::bucket::{Bucket, prototype};
use tablic_core::model::card_set::CardSet;
use tablic_core::model::play::Move;
use tablic_core::model::rules::{HAND_SIZE, MAX_BONUS, TABLE_BONUS};
use tablic_core::ranking::rank_moves;
use thiserror::Error;
use tracing::debug;

/// Searcher's standing: its totals minus each opponent's, summed. Compared
/// points first, then captured cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Evaluation {
    pub points: i32,
    pub cards: i32,
}

impl Evaluation {
    pub const MIN: Evaluation = Evaluation {
        points: i32::MIN,
        cards: i32::MIN,
    };
    pub const MAX: Evaluation = Evaluation {
        points: i32::MAX,
        cards: i32::MAX,
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: usize,
    pub leaves: usize,
    pub cutoffs: usize,
    pub horizon_cutoffs: usize,
    pub elapsed: Duration,
    pub timed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Planned moves, one per upcoming turn; the first is the one to play.
    pub line: Vec<Move>,
    pub eval: Evaluation,
    pub stats: SearchStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no candidate move for hand {hand} on table {table}")]
    NoCandidateMove { hand: CardSet, table: CardSet },
    #[error("match view is inconsistent: {0}")]
    InconsistentView(&'static str),
}

/// Public facts about the match at the searcher's turn.
#[derive(Debug, Clone, Copy)]
pub struct SearchInput<'a> {
    pub seat: usize,
    pub hand: CardSet,
    pub table: CardSet,
    pub tracker: &'a BeliefTracker,
    /// Banked points per seat, table bonuses included.
    pub points: &'a [i32],
    /// Captured card counts per seat.
    pub cards: &'a [i32],
    /// Cards each seat still has to play in the current deal.
    pub cards_left: &'a [usize],
    pub last_capturer: Option<usize>,
}

struct Budget {
    start: Instant,
    cap: Duration,
    step_cap: Option<usize>,
    steps: usize,
    exhausted: bool,
}

impl Budget {
    fn new(config: &SearchConfig) -> Self {
        Self {
            start: Instant::now(),
            cap: config.time_cap(),
            step_cap: config.step_cap,
            steps: 0,
            exhausted: false,
        }
    }

    fn tick(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    fn exhausted(&mut self) -> bool {
        if !self.exhausted {
            self.exhausted = match self.step_cap {
                Some(cap) => self.steps >= cap,
                None => self.start.elapsed() >= self.cap,
            };
        }
        self.exhausted
    }
}

struct Node {
    hand: CardSet,
    table: CardSet,
    /// Opponent cards played along the current line.
    played: CardSet,
    points: Vec<i32>,
    cards: Vec<i32>,
    cards_left: Vec<usize>,
    last_capturer: Option<usize>,
}

struct Undo {
    hand: CardSet,
    table: CardSet,
    played: CardSet,
    points: i32,
    cards: i32,
    cards_left: usize,
    last_capturer: Option<usize>,
}

impl Node {
    fn play(&mut self, seat: usize, me: usize, mv: &Move) -> Undo {
        let undo = Undo {
            hand: self.hand,
            table: self.table,
            played: self.played,
            points: self.points[seat],
            cards: self.cards[seat],
            cards_left: self.cards_left[seat],
            last_capturer: self.last_capturer,
        };
        if seat == me {
            self.hand.remove(mv.card);
        } else {
            self.played.insert(mv.card);
        }
        self.cards_left[seat] = self.cards_left[seat].saturating_sub(1);
        if mv.is_capture() {
            let taken = mv.taken();
            let bonus = if mv.clears(self.table) { TABLE_BONUS } else { 0 };
            self.points[seat] += (taken.points() + bonus) as i32;
            self.cards[seat] += taken.len() as i32;
            self.table = self.table - mv.captured;
            self.last_capturer = Some(seat);
        } else {
            self.table.insert(mv.card);
        }
        undo
    }

    fn undo(&mut self, seat: usize, undo: Undo) {
        self.hand = undo.hand;
        self.table = undo.table;
        self.played = undo.played;
        self.points[seat] = undo.points;
        self.cards[seat] = undo.cards;
        self.cards_left[seat] = undo.cards_left;
        self.last_capturer = undo.last_capturer;
    }
}

/// Principal line of a subtree. Moves are stored deepest first.
struct Line {
    eval: Evaluation,
    moves: Vec<Move>,
}

struct Searcher<'a> {
    me: usize,
    players: usize,
    final_deal: bool,
    horizon_cutoff: bool,
    tracker: &'a BeliefTracker,
    budget: Budget,
    stats: SearchStats,
}

impl Searcher<'_> {
    fn visit(
        &mut self,
        node: &mut Node,
        to_move: usize,
        depth: usize,
        mut alpha: Evaluation,
        mut beta: Evaluation,
        root: bool,
    ) -> Line {
        self.stats.nodes += 1;
        self.budget.tick();
        if !root && self.budget.exhausted() {
            self.stats.timed_out = true;
            return self.leaf(node);
        }
        if depth == 0 || node.cards_left[to_move] == 0 {
            return self.leaf(node);
        }

        let hand = self.hand_for(node, to_move);
        let next = (to_move + 1) % self.players;
        let child_depth = if next == 0 { depth - 1 } else { depth };
        let children_are_leaves = self.horizon_cutoff
            && !self.final_deal
            && (child_depth == 0 || node.cards_left[next] == 0);
        let maximizing = to_move == self.me;
        let most_cards = 1 + node.table.len() as i32;

        let mut explored = HashSet::new();
        let mut best: Option<Line> = None;
        let mut best_gain = (i32::MIN, i32::MIN);
        for ranked in rank_moves(hand, node.table) {
            let shape = (Bucket::of(ranked.mv.card), prototype(ranked.mv.captured));
            if !explored.insert(shape) {
                continue;
            }
            // Leaf evaluations rise with the mover's immediate gain, and
            // ranked order caps what any later non-clearing move can gain.
            if children_are_leaves
                && best.is_some()
                && !ranked.table_clear
                && best_gain >= (ranked.value.max(0), most_cards)
            {
                self.stats.horizon_cutoffs += 1;
                break;
            }

            let undo = node.play(to_move, self.me, &ranked.mv);
            let mut child = self.visit(node, next, child_depth, alpha, beta, false);
            node.undo(to_move, undo);
            child.moves.push(ranked.mv);

            let replace = match &best {
                None => true,
                Some(current) if child.moves.len() < current.moves.len() => {
                    // A shorter line means the clock ran out below; keep
                    // the deepest resolved line.
                    break;
                }
                Some(current) if child.moves.len() > current.moves.len() => true,
                Some(current) if maximizing => child.eval > current.eval,
                Some(current) => child.eval < current.eval,
            };
            if replace {
                best_gain = (ranked.score(), ranked.mv.taken().len() as i32);
                best = Some(child);
            }

            if let Some(current) = &best {
                if maximizing {
                    alpha = alpha.max(current.eval);
                } else {
                    beta = beta.min(current.eval);
                }
            }
            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        match best {
            Some(line) => line,
            None => self.leaf(node),
        }
    }

    fn hand_for(&self, node: &Node, seat: usize) -> CardSet {
        if seat == self.me {
            return node.hand;
        }
        let probable = self.tracker.probable_hand_given(seat, node.played);
        if probable.is_empty() {
            self.tracker.unseen_representatives(node.played)
        } else {
            probable
        }
    }

    fn leaf(&mut self, node: &Node) -> Line {
        self.stats.leaves += 1;
        let end = self.final_deal && node.cards_left.iter().all(|&left| left == 0);
        Line {
            eval: evaluate(
                &node.points,
                &node.cards,
                node.table,
                node.last_capturer,
                self.me,
                end,
            ),
            moves: Vec::new(),
        }
    }
}

/// Static value of a position for `me`. At the end of the match the
/// leftover table and the strict-maximum bonus are settled first.
pub fn evaluate(
    points: &[i32],
    cards: &[i32],
    table: CardSet,
    last_capturer: Option<usize>,
    me: usize,
    end_of_match: bool,
) -> Evaluation {
    let mut points = points.to_vec();
    let mut cards = cards.to_vec();
    if end_of_match {
        if let Some(seat) = last_capturer {
            points[seat] += table.points() as i32;
            cards[seat] += table.len() as i32;
        }
        if let Some(&most) = cards.iter().max() {
            let mut leaders = cards.iter().enumerate().filter(|(_, count)| **count == most);
            if let (Some((leader, _)), None) = (leaders.next(), leaders.next()) {
                points[leader] += MAX_BONUS as i32;
            }
        }
    }
    let players = points.len() as i32;
    Evaluation {
        points: players * points[me] - points.iter().sum::<i32>(),
        cards: players * cards[me] - cards.iter().sum::<i32>(),
    }
}

pub fn search(input: &SearchInput<'_>, config: &SearchConfig) -> Result<SearchOutcome, SearchError> {
    let players = input.tracker.players();
    if input.seat >= players {
        return Err(SearchError::InconsistentView("seat outside the table"));
    }
    if input.points.len() != players
        || input.cards.len() != players
        || input.cards_left.len() != players
    {
        return Err(SearchError::InconsistentView("per-seat tallies disagree with player count"));
    }
    if input.hand.is_empty() {
        return Err(SearchError::NoCandidateMove {
            hand: input.hand,
            table: input.table,
        });
    }

    let final_deal = !input.tracker.deals_remain();
    let depth = if final_deal {
        HAND_SIZE
    } else {
        config.depth_rounds.max(1)
    };
    let mut cards_left = input.cards_left.to_vec();
    cards_left[input.seat] = input.hand.len();
    let mut node = Node {
        hand: input.hand,
        table: input.table,
        played: CardSet::EMPTY,
        points: input.points.to_vec(),
        cards: input.cards.to_vec(),
        cards_left,
        last_capturer: input.last_capturer,
    };
    let mut searcher = Searcher {
        me: input.seat,
        players,
        final_deal,
        horizon_cutoff: config.horizon_cutoff,
        tracker: input.tracker,
        budget: Budget::new(config),
        stats: SearchStats::default(),
    };

    let line = searcher.visit(&mut node, input.seat, depth, Evaluation::MIN, Evaluation::MAX, true);
    let mut stats = searcher.stats;
    stats.elapsed = searcher.budget.start.elapsed();
    if line.moves.is_empty() {
        return Err(SearchError::NoCandidateMove {
            hand: input.hand,
            table: input.table,
        });
    }
    let mut moves = line.moves;
    moves.reverse();
    debug!(
        target: "tablic_bot::search",
        seat = input.seat,
        depth,
        final_deal,
        line = moves.len(),
        nodes = stats.nodes,
        cutoffs = stats.cutoffs,
        horizon_cutoffs = stats.horizon_cutoffs,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        timed_out = stats.timed_out,
        "search finished"
    );
    Ok(SearchOutcome {
        line: moves,
        eval: line.eval,
        stats,
    })
}
