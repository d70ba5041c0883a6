//! Whole games, from dealing roles to a win

use super::super::deck::TOTAL_POLICIES;
use super::super::control;
use super::super::engine::RoundEnd;
use super::super::{Announcement, GameOptions, Phase, PowerTable, RoundEngine};
use super::test_utils::*;
use crate::bots::RandomBots;
use crate::error::GameError;

#[tokio::test]
async fn test_first_round_with_unanimous_votes() {
    let mut state = started_game(5, SEED);
    let players = ScriptedPlayers::new();
    let broadcast = RecordingBroadcast::new();

    let mut engine = engine(&mut state, &players, &broadcast);
    let RoundEnd::Continue(government) = engine.election_round().await.unwrap() else {
        panic!("game should go on");
    };
    engine.legislative_session(&government).await.unwrap();
    assert_eq!(engine.phase(), Phase::LegislativeSession);
    drop(engine);

    assert_eq!(state.election_tracker(), 0);
    assert_eq!(state.board().total(), 1);
    assert_eq!(state.total_policies(), TOTAL_POLICIES);
}

#[tokio::test]
async fn test_scripted_games_finish() {
    for num_players in 5..=10 {
        let mut state = lobby(num_players);
        let players = ScriptedPlayers::new();
        let broadcast = RecordingBroadcast::new();

        let mut engine = engine(&mut state, &players, &broadcast);
        let result = engine.run().await.unwrap();
        assert!(matches!(engine.phase(), Phase::GameOver(outcome) if outcome == result.outcome));
        drop(engine);

        assert_eq!(result.roles.len(), num_players);
        assert_eq!(result.seed, SEED);
        assert_eq!(result.winner, result.outcome.winner());
        assert_eq!(state.total_policies(), TOTAL_POLICIES);

        let announcements = broadcast.announcements();
        assert!(matches!(announcements.first(), Some(Announcement::GameStarted { .. })));
        assert!(matches!(announcements.last(), Some(Announcement::GameOver { .. })));
        assert_eq!(players.notices().len(), num_players);
    }
}

#[tokio::test]
async fn test_random_games_finish() {
    for seed in 0..30 {
        let num_players = 5 + (seed as usize % 6);
        let mut state = lobby(num_players);
        let bots = RandomBots::new(seed);
        let broadcast = RecordingBroadcast::new();
        let (control, signals) = control::channel();

        let result = RoundEngine::new(&mut state, &bots, &broadcast, signals, GameOptions::default(), seed)
            .run()
            .await;
        drop(control);

        let result = result.unwrap_or_else(|err| panic!("seed {seed}: {err}"));
        assert_eq!(result.roles.len(), num_players);
        assert_eq!(state.total_policies(), TOTAL_POLICIES, "seed {seed}");
    }
}

#[tokio::test]
async fn test_game_without_powers() {
    let mut state = lobby(7);
    let players = ScriptedPlayers::new();
    let broadcast = RecordingBroadcast::new();
    let opts = GameOptions {
        powers: Some(PowerTable::empty()),
        ..GameOptions::default()
    };

    let (mut engine, _control) = engine_with(&mut state, &players, &broadcast, opts);
    engine.run().await.unwrap();
    drop(engine);

    assert_eq!(
        broadcast.count(|a| matches!(a, Announcement::ExecutivePower { .. })),
        0
    );
}

#[tokio::test]
async fn test_engine_runs_once() {
    let mut state = lobby(5);
    let players = ScriptedPlayers::new();
    let broadcast = RecordingBroadcast::new();

    let mut engine = engine(&mut state, &players, &broadcast);
    engine.run().await.unwrap();
    assert!(matches!(engine.run().await, Err(GameError::InvalidAction)));
}
