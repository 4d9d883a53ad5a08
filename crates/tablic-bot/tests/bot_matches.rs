use tablic_bot::{BotDifficulty, GreedyPlayer, MinimaxPlayer, RandomPlayer, SearchConfig};
use tablic_core::game::{MatchLog, MatchRunner, MoveEvent, MoveLog, Player};
use tablic_core::model::deck::Deck;

fn quick_search() -> SearchConfig {
    SearchConfig::default().with_depth(1).with_step_cap(Some(300))
}

#[test]
fn mixed_table_plays_a_full_match() {
    let mut players: Vec<Box<dyn Player>> = vec![
        Box::new(RandomPlayer::new("random", 1)),
        Box::new(GreedyPlayer::new("greedy", 2)),
        Box::new(MinimaxPlayer::new("minimax", 3, quick_search())),
        Box::new(GreedyPlayer::new("greedy_2", 4)),
    ];
    let mut moves = MoveLog::new(|event: &MoveEvent| Some(event.seat));
    let result = {
        let mut logs: [&mut dyn MatchLog; 1] = [&mut moves];
        MatchRunner::new()
            .with_max_attempts(1)
            .run(&mut players, &mut logs, Deck::shuffled_with_seed(17))
            .expect("bots never play illegal moves")
    };

    assert_eq!(moves.entries().len(), 48);
    let cards: usize = result.players.iter().map(|p| p.card_count).sum();
    let points: u32 = result.players.iter().map(|p| p.captured_points).sum();
    if cards > 0 {
        assert_eq!(cards, 52);
        assert_eq!(points, 22);
    }
    assert!(result.players.iter().filter(|p| p.strict_max).count() <= 1);
}

#[test]
fn minimax_heads_up_is_reproducible() {
    let play = || {
        let mut players = vec![
            BotDifficulty::Minimax.build("left", 5, quick_search()),
            BotDifficulty::Greedy.build("right", 6, quick_search()),
        ];
        let mut moves = MoveLog::new(|event: &MoveEvent| Some(event.mv));
        let result = {
            let mut logs: [&mut dyn MatchLog; 1] = [&mut moves];
            MatchRunner::new()
                .with_max_attempts(1)
                .run(&mut players, &mut logs, Deck::shuffled_with_seed(99))
                .expect("match completes")
        };
        (result, moves.drain())
    };

    let (first_result, first_moves) = play();
    let (second_result, second_moves) = play();
    assert_eq!(first_moves.len(), 48);
    assert_eq!(first_moves, second_moves);
    assert_eq!(first_result, second_result);
}

#[test]
fn every_difficulty_finishes_heads_up() {
    for (seed, kind) in [BotDifficulty::Random, BotDifficulty::Greedy, BotDifficulty::Minimax]
        .into_iter()
        .enumerate()
    {
        let mut players = vec![
            kind.build("first", seed as u64, quick_search()),
            kind.build("second", seed as u64 + 10, quick_search()),
        ];
        let result = MatchRunner::new()
            .run(&mut players, &mut [], Deck::shuffled_with_seed(seed as u64))
            .expect("match completes");
        assert_eq!(result.players.len(), 2);
        assert_eq!(result.players[0].name, "first");
    }
}
