mod rotation;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tablic_bot::{BotDifficulty, SearchConfig};
use tablic_core::game::{
    MatchError, MatchLog, MatchResult, MatchRunner, MoveEvent, MoveLog, Player, Retry,
};
use tablic_core::model::card::Card;
use tablic_core::model::card_set::CardSet;
use tablic_core::model::deck::Deck;
use tablic_core::model::play::Move;
use tablic_core::model::rules::MIN_PLAYERS;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, PlayerConfig, PlayerKind, ResolvedOutputs};
use crate::logging;

pub use rotation::SeatRotation;

/// Primary entry point for running a series of matches.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    players: Vec<PlayerBlueprint>,
    rotation: SeatRotation,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub matches_played: usize,
    pub rows_written: usize,
    pub moves_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub moves_path: Option<PathBuf>,
    pub telemetry_path: Option<PathBuf>,
    pub standings: Vec<Standing>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let players = PlayerBlueprint::from_configs(&config.players)?;

        if players.len() < MIN_PLAYERS {
            return Err(RunnerError::SeatCount {
                min: MIN_PLAYERS,
                found: players.len(),
            });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            rotation: SeatRotation::new(players.len()),
            config,
            outputs,
            players,
        })
    }

    /// Play every match, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        if let Some(path) = self.outputs.moves_jsonl.as_ref() {
            ensure_parent(path.parent())?;
        }

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut moves_writer = match self.outputs.moves_jsonl.as_ref() {
            Some(path) => Some(BufWriter::new(File::create(path)?)),
            None => None,
        };
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut standings = Standings::new(&self.players);
        let mut rows_written = 0usize;
        let mut moves_written = 0usize;

        for match_index in 0..self.config.matches.count {
            let deck_seed = rng.next_u64();
            let outcome = self.play_match(match_index, deck_seed)?;
            standings.record(&outcome);
            rows_written +=
                write_match_rows(&mut writer, &self.config.run_id, match_index, deck_seed, &outcome)?;
            if let Some(moves_writer) = moves_writer.as_mut() {
                for row in &outcome.moves {
                    serde_json::to_writer(&mut *moves_writer, row)?;
                    moves_writer.write_all(b"\n")?;
                    moves_written += 1;
                }
            }
        }

        writer.flush()?;
        if let Some(moves_writer) = moves_writer.as_mut() {
            moves_writer.flush()?;
        }

        standings.write_markdown(&self.outputs.summary_md, &self.config)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| logging::telemetry_path(&self.outputs));

        Ok(RunSummary {
            matches_played: self.config.matches.count,
            rows_written,
            moves_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            moves_path: self.outputs.moves_jsonl.clone(),
            telemetry_path,
            standings: standings.players,
        })
    }

    fn play_match(&self, match_index: usize, deck_seed: u64) -> Result<MatchOutcome, RunnerError> {
        let seating = self.rotation.seating(match_index);
        let mut seats = Vec::with_capacity(seating.len());
        for (seat, player_index) in seating.iter().copied().enumerate() {
            let blueprint = self
                .players
                .get(player_index)
                .ok_or(RunnerError::InvalidSeating { seat, player_index })?;
            seats.push(TimedSeat::new(player_index, blueprint, deck_seed));
        }
        let names: Vec<String> = seats.iter().map(|seat| seat.name().to_string()).collect();

        let record_moves = self.outputs.moves_jsonl.is_some();
        let run_id = self.config.run_id.clone();
        let row_names = names.clone();
        let mut move_log = MoveLog::new(move |event: &MoveEvent| {
            record_moves.then(|| MoveRow {
                run_id: run_id.clone(),
                match_index,
                seat: event.seat,
                player: row_names.get(event.seat).cloned().unwrap_or_default(),
                card: event.mv.card,
                captured: event.mv.captured,
                table: event.table,
                table_cleared: event.mv.clears(event.table),
            })
        });
        let mut telemetry = MoveTelemetry {
            enabled: self.logging_enabled,
            run_id: &self.config.run_id,
            match_index,
            names: &names,
        };

        let result = {
            let mut logs: [&mut dyn MatchLog; 2] = [&mut move_log, &mut telemetry];
            MatchRunner::new().run(&mut seats, &mut logs, Deck::shuffled_with_seed(deck_seed))?
        };

        let winners = result.winners();
        let seat_results = seats
            .into_iter()
            .zip(result.players.iter())
            .enumerate()
            .map(|(seat, (timed, standing))| SeatResult {
                player_index: timed.player_index,
                kind: timed.kind,
                seat,
                name: standing.name.clone(),
                captured_points: standing.captured_points,
                table_clears: standing.table_bonus_count,
                strict_max: standing.strict_max,
                cards: standing.card_count,
                settled_score: standing.settled_score(),
                won: winners.len() == 1 && winners.contains(&seat),
                tied: winners.len() > 1 && winners.contains(&seat),
                metrics: timed.metrics.finalize(),
            })
            .collect();

        Ok(MatchOutcome {
            seating: names,
            seat_results,
            moves: move_log.drain(),
            result,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_match_rows(
    writer: &mut BufWriter<File>,
    run_id: &str,
    match_index: usize,
    deck_seed: u64,
    outcome: &MatchOutcome,
) -> Result<usize, RunnerError> {
    let match_id = format!("M{match_index:05}");

    let mut rows_written = 0usize;
    for seat_result in &outcome.seat_results {
        let row = MatchLogRow {
            run_id: run_id.to_string(),
            match_id: match_id.clone(),
            match_index,
            deck_seed,
            seat: seat_result.seat,
            player: seat_result.name.clone(),
            kind: seat_result.kind,
            seating: outcome.seating.clone(),
            captured_points: seat_result.captured_points,
            table_clears: seat_result.table_clears,
            strict_max: seat_result.strict_max,
            cards: seat_result.cards,
            settled_score: seat_result.settled_score,
            won: seat_result.won,
            tied: seat_result.tied,
            speed_ms_turn: seat_result.metrics.avg_ms_per_decision,
            decisions: seat_result.metrics.decisions,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

/// Emits one structured event per move when structured logging is on.
struct MoveTelemetry<'a> {
    enabled: bool,
    run_id: &'a str,
    match_index: usize,
    names: &'a [String],
}

impl MatchLog for MoveTelemetry<'_> {
    fn record_move(&mut self, event: &MoveEvent) {
        if !self.enabled || !tracing::enabled!(Level::INFO) {
            return;
        }
        let player = self.names.get(event.seat).map(String::as_str).unwrap_or("?");
        event!(
            target: "tablic_bench::move",
            Level::INFO,
            run_id = %self.run_id,
            match_index = self.match_index as u32,
            seat = event.seat as u32,
            player,
            card = %event.mv.card,
            captured = %event.mv.captured,
            table = %event.table,
            cleared = event.mv.clears(event.table)
        );
    }

    fn on_match_end(&mut self, result: &MatchResult) {
        if !self.enabled {
            return;
        }
        event!(
            target: "tablic_bench::match",
            Level::INFO,
            run_id = %self.run_id,
            match_index = self.match_index as u32,
            scores = ?result.settled_scores(),
            winners = ?result.winners()
        );
    }
}

/// A seated bot plus its decision timings.
struct TimedSeat {
    player_index: usize,
    kind: PlayerKind,
    inner: Box<dyn Player>,
    metrics: DecisionMetrics,
}

impl TimedSeat {
    fn new(player_index: usize, blueprint: &PlayerBlueprint, deck_seed: u64) -> Self {
        Self {
            player_index,
            kind: blueprint.kind,
            inner: blueprint.spawn(player_index, deck_seed),
            metrics: DecisionMetrics::default(),
        }
    }
}

impl Player for TimedSeat {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn wants_reason(&self) -> bool {
        self.inner.wants_reason()
    }

    fn on_player_count(&mut self, seat: usize, names: &[String]) {
        self.inner.on_player_count(seat, names);
    }

    fn on_new_deal(&mut self, hand: CardSet, table: CardSet) {
        self.inner.on_new_deal(hand, table);
    }

    fn on_move(&mut self, event: &MoveEvent) {
        self.inner.on_move(event);
    }

    fn on_match_result(&mut self, result: &MatchResult) {
        self.inner.on_match_result(result);
    }

    fn decide_move(&mut self, hand: CardSet, table: CardSet, retry: &Retry) -> Move {
        let start = Instant::now();
        let mv = self.inner.decide_move(hand, table, retry);
        self.metrics.record(start.elapsed());
        mv
    }
}

pub struct MatchOutcome {
    pub seating: Vec<String>,
    pub seat_results: Vec<SeatResult>,
    pub moves: Vec<MoveRow>,
    pub result: MatchResult,
}

pub struct SeatResult {
    pub player_index: usize,
    pub kind: PlayerKind,
    pub seat: usize,
    pub name: String,
    pub captured_points: u32,
    pub table_clears: u32,
    pub strict_max: bool,
    pub cards: usize,
    pub settled_score: u32,
    pub won: bool,
    pub tied: bool,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.decisions += 1;
    }

    fn finalize(&self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct MatchLogRow {
    run_id: String,
    match_id: String,
    match_index: usize,
    deck_seed: u64,
    seat: usize,
    player: String,
    kind: PlayerKind,
    seating: Vec<String>,
    captured_points: u32,
    table_clears: u32,
    strict_max: bool,
    cards: usize,
    settled_score: u32,
    won: bool,
    tied: bool,
    speed_ms_turn: f64,
    decisions: u32,
}

/// One line of the optional move log.
#[derive(Debug, Clone, Serialize)]
pub struct MoveRow {
    pub run_id: String,
    pub match_index: usize,
    pub seat: usize,
    pub player: String,
    pub card: Card,
    pub captured: CardSet,
    pub table: CardSet,
    pub table_cleared: bool,
}

/// Running totals for one configured player across all matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub name: String,
    pub kind: PlayerKind,
    pub matches: usize,
    pub total_score: u64,
    pub wins: usize,
    pub ties: usize,
    pub table_clears: u64,
    pub strict_max: usize,
    pub decisions: u64,
    pub total_ms: f64,
}

impl Standing {
    pub fn average_score(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.total_score as f64 / self.matches as f64
        }
    }

    pub fn average_ms_per_decision(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.total_ms / self.decisions as f64
        }
    }
}

struct Standings {
    players: Vec<Standing>,
}

impl Standings {
    fn new(blueprints: &[PlayerBlueprint]) -> Self {
        let players = blueprints
            .iter()
            .map(|blueprint| Standing {
                name: blueprint.name.clone(),
                kind: blueprint.kind,
                matches: 0,
                total_score: 0,
                wins: 0,
                ties: 0,
                table_clears: 0,
                strict_max: 0,
                decisions: 0,
                total_ms: 0.0,
            })
            .collect();
        Self { players }
    }

    fn record(&mut self, outcome: &MatchOutcome) {
        for seat in &outcome.seat_results {
            let Some(standing) = self.players.get_mut(seat.player_index) else {
                continue;
            };
            standing.matches += 1;
            standing.total_score += u64::from(seat.settled_score);
            standing.wins += usize::from(seat.won);
            standing.ties += usize::from(seat.tied);
            standing.table_clears += u64::from(seat.table_clears);
            standing.strict_max += usize::from(seat.strict_max);
            standing.decisions += u64::from(seat.metrics.decisions);
            standing.total_ms += seat.metrics.total_ms;
        }
    }

    fn write_markdown(&self, path: &Path, config: &BenchmarkConfig) -> Result<(), RunnerError> {
        let mut rows = String::new();
        rows.push_str("# Tablic Match Summary\n\n");
        rows.push_str(&format!(
            "Run `{}`: {} matches, seed {}\n\n",
            config.run_id,
            config.matches.count,
            config
                .matches
                .seed
                .map(|seed| seed.to_string())
                .unwrap_or_else(|| "0 (default)".to_string())
        ));
        rows.push_str("| Player | Kind | Matches | Total score | Avg score | Wins | Ties | Win % | Table clears | Max bonus | Avg ms/decision |\n");
        rows.push_str("|--------|------|---------|-------------|-----------|------|------|-------|--------------|-----------|-----------------|\n");

        for standing in &self.players {
            let win_rate = if standing.matches == 0 {
                0.0
            } else {
                standing.wins as f64 / standing.matches as f64
            };
            rows.push_str(&format!(
                "| {name} | {kind:?} | {matches} | {total} | {avg:.2} | {wins} | {ties} | {win:.1}% | {clears} | {max} | {latency:.2} |\n",
                name = standing.name,
                kind = standing.kind,
                matches = standing.matches,
                total = standing.total_score,
                avg = standing.average_score(),
                wins = standing.wins,
                ties = standing.ties,
                win = win_rate * 100.0,
                clears = standing.table_clears,
                max = standing.strict_max,
                latency = standing.average_ms_per_decision(),
            ));
        }

        fs::write(path, rows)?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("match failed: {0}")]
    Match(#[from] MatchError),
    #[error("a match needs at least {min} players but found {found}")]
    SeatCount { min: usize, found: usize },
    #[error("seat {seat} references invalid player index {player_index}")]
    InvalidSeating { seat: usize, player_index: usize },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid parameter for player '{name}': {message}")]
    InvalidParam { name: String, message: String },
}

struct PlayerBlueprint {
    name: String,
    kind: PlayerKind,
    search: SearchConfig,
    seed: Option<u64>,
}

impl PlayerBlueprint {
    fn from_configs(configs: &[PlayerConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &PlayerConfig) -> Result<Self, AgentError> {
        let invalid = |message: String| AgentError::InvalidParam {
            name: config.name.clone(),
            message,
        };
        let mut search = SearchConfig::default();
        let mut seed = None;

        if !config.params.is_null() {
            let mapping = config
                .params
                .as_mapping()
                .ok_or_else(|| invalid("expected mapping for player params".to_string()))?;
            for (key, value) in mapping {
                let key = key
                    .as_str()
                    .ok_or_else(|| invalid("parameter names must be strings".to_string()))?;
                let number = value
                    .as_u64()
                    .ok_or_else(|| invalid(format!("{key} must be a non-negative integer")))?;
                match key {
                    "depth" => {
                        if number == 0 {
                            return Err(invalid("depth must be at least 1".to_string()));
                        }
                        search = search.with_depth(number as usize);
                    }
                    "time_ms" => search = search.with_time_cap_ms(number),
                    "steps" => search = search.with_step_cap(Some(number as usize)),
                    "seed" => seed = Some(number),
                    other => return Err(invalid(format!("unknown parameter '{other}'"))),
                }
            }
        }

        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            search,
            seed,
        })
    }

    fn difficulty(&self) -> BotDifficulty {
        match self.kind {
            PlayerKind::Random => BotDifficulty::Random,
            PlayerKind::Greedy => BotDifficulty::Greedy,
            PlayerKind::Minimax => BotDifficulty::Minimax,
        }
    }

    /// Bot seeds depend on the deck so replaying a match replays every choice.
    fn spawn(&self, player_index: usize, deck_seed: u64) -> Box<dyn Player> {
        let base = self.seed.unwrap_or(player_index as u64 + 1);
        let seed = deck_seed ^ base.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        self.difficulty().build(self.name.clone(), seed, self.search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_config(yaml: &str) -> PlayerConfig {
        serde_yaml::from_str(yaml).expect("player yaml")
    }

    #[test]
    fn params_configure_the_search() {
        let config = player_config("name: mini\nkind: minimax\nparams:\n  depth: 3\n  time_ms: 40\n  steps: 900\n  seed: 7\n");
        let blueprint = PlayerBlueprint::from_config(&config).expect("valid params");
        assert_eq!(blueprint.search.depth_rounds, 3);
        assert_eq!(blueprint.search.time_cap_ms, 40);
        assert_eq!(blueprint.search.step_cap, Some(900));
        assert_eq!(blueprint.seed, Some(7));
        assert_eq!(blueprint.difficulty(), BotDifficulty::Minimax);
    }

    #[test]
    fn unknown_params_are_rejected() {
        let config = player_config("name: g\nkind: greedy\nparams:\n  style: bold\n");
        assert!(matches!(
            PlayerBlueprint::from_config(&config),
            Err(AgentError::InvalidParam { .. })
        ));
        let config = player_config("name: g\nkind: greedy\nparams:\n  depth: 0\n");
        assert!(PlayerBlueprint::from_config(&config).is_err());
    }

    #[test]
    fn spawned_bots_carry_configured_names() {
        let config = player_config("name: lucky\nkind: random\n");
        let blueprint = PlayerBlueprint::from_config(&config).expect("valid");
        assert_eq!(blueprint.spawn(0, 42).name(), "lucky");
    }

    #[test]
    fn standings_accumulate_seat_results() {
        let config = player_config("name: lucky\nkind: random\n");
        let blueprint = PlayerBlueprint::from_config(&config).expect("valid");
        let mut standings = Standings::new(std::slice::from_ref(&blueprint));
        let seat = |score: u32, won: bool| SeatResult {
            player_index: 0,
            kind: PlayerKind::Random,
            seat: 0,
            name: "lucky".to_string(),
            captured_points: score,
            table_clears: 1,
            strict_max: won,
            cards: 20,
            settled_score: score,
            won,
            tied: false,
            metrics: DecisionSummary {
                decisions: 24,
                avg_ms_per_decision: 0.5,
                total_ms: 12.0,
            },
        };
        for (score, won) in [(10, true), (4, false)] {
            standings.record(&MatchOutcome {
                seating: vec!["lucky".to_string()],
                seat_results: vec![seat(score, won)],
                moves: Vec::new(),
                result: MatchResult { players: Vec::new() },
            });
        }
        let standing = &standings.players[0];
        assert_eq!(standing.matches, 2);
        assert_eq!(standing.total_score, 14);
        assert_eq!(standing.wins, 1);
        assert_eq!(standing.table_clears, 2);
        assert!((standing.average_score() - 7.0).abs() < f64::EPSILON);
        assert!((standing.average_ms_per_decision() - 0.5).abs() < 1e-9);
    }
}
