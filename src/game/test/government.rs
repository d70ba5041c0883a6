//! Government formation and voting tests

use super::super::engine::RoundEnd;
use super::super::government::Government;
use super::super::party::Party::*;
use super::super::player::Role;
use super::super::votes::Votes;
use super::super::{Announcement, Prompt, WinCondition};
use super::test_utils::*;

#[test]
fn test_strict_majority() {
    let mut votes = Votes::new(4);
    votes.vote(player(0), true);
    votes.vote(player(1), true);
    votes.vote(player(2), false);
    votes.vote(player(3), false);
    assert!(!votes.passed());

    let mut votes = Votes::new(5);
    for i in 0..3 {
        votes.vote(player(i), true);
    }
    assert!(votes.passed());
}

#[test]
fn test_only_first_vote_counts() {
    let mut votes = Votes::new(3);
    votes.vote(player(0), false);
    votes.vote(player(0), true);
    assert_eq!(votes.yes(), 0);
    assert_eq!(votes.votes().len(), 1);
    assert!(votes.has_cast(&player(0)));
}

#[test]
fn test_term_limits_with_seven_alive() {
    let mut state = started_game(7, SEED);
    elect(&mut state, 1, 2);
    let eligible = state.eligible_chancellors(&player(0));
    assert_eq!(eligible, vec![player(3), player(4), player(5), player(6)]);
}

#[test]
fn test_term_limits_with_six_alive() {
    let mut state = started_game(7, SEED);
    elect(&mut state, 1, 2);
    state.players.get_mut(&player(6)).unwrap().alive = false;

    // Only the last chancellor is term-limited once six players remain
    let eligible = state.eligible_chancellors(&player(0));
    assert_eq!(eligible, vec![player(1), player(3), player(4), player(5)]);
}

#[test]
fn test_term_limits_lifted() {
    let mut state = started_game(5, SEED);
    elect(&mut state, 1, 2);
    state.reset_term_limits();
    assert_eq!(state.eligible_chancellors(&player(0)).len(), 4);
}

#[test]
fn test_rotation_skips_dead_and_wraps() {
    let mut state = started_game(5, SEED);
    state.players.get_mut(&player(1)).unwrap().alive = false;

    assert_eq!(state.next_presidential_candidate(None), Some(0));
    assert_eq!(state.next_presidential_candidate(Some(0)), Some(2));
    assert_eq!(state.next_presidential_candidate(Some(4)), Some(0));
}

#[test]
fn test_special_election_keeps_rotation() {
    let mut state = started_game(5, SEED);
    assert_eq!(state.take_presidential_candidate(), Some((player(0), false)));

    state.call_special_election(player(3));
    assert_eq!(state.take_presidential_candidate(), Some((player(3), true)));
    assert_eq!(state.take_presidential_candidate(), Some((player(1), false)));
}

#[test]
fn test_removal_keeps_rotation() {
    let mut state = started_game(6, SEED);
    state.presidential_turn = Some(2);

    state.remove_player(&player(1));
    assert_eq!(state.take_presidential_candidate(), Some((player(3), false)));

    state.remove_player(&player(5));
    assert_eq!(state.take_presidential_candidate(), Some((player(4), false)));
}

#[tokio::test]
async fn test_successful_election() {
    let mut state = started_game(5, SEED);
    let players = ScriptedPlayers::new();
    let broadcast = RecordingBroadcast::new();

    let result = engine(&mut state, &players, &broadcast).election_round().await.unwrap();
    let government = Government {
        president: player(0),
        chancellor: player(1),
    };
    assert_eq!(result, RoundEnd::Continue(government.clone()));
    assert_eq!(state.election_tracker(), 0);
    assert_eq!(state.last_government(), Some(&government));
    assert_eq!(state.president(), Some(&player(0)));
    assert_eq!(state.chancellor(), Some(&player(1)));
}

#[tokio::test]
async fn test_votes_reported_in_request_order() {
    let mut state = started_game(5, SEED);
    let players = ScriptedPlayers::new()
        .with_delay("P0", 30)
        .with_delay("P1", 20)
        .with_delay("P2", 10)
        .with_votes(|voter, _| voter.as_str() != "P3");
    let broadcast = RecordingBroadcast::new();

    engine(&mut state, &players, &broadcast).election_round().await.unwrap();

    let expected = vec![
        (player(0), true),
        (player(1), true),
        (player(2), true),
        (player(3), false),
        (player(4), true),
    ];
    assert!(broadcast.contains(&Announcement::ElectionResult {
        votes: expected,
        passed: true,
        election_tracker: 0,
    }));
}

#[tokio::test]
async fn test_tied_vote_fails() {
    let mut state = started_game(5, SEED);
    state.players.get_mut(&player(4)).unwrap().alive = false;
    let players = ScriptedPlayers::new().with_votes(|voter, prompt| match prompt {
        Prompt::Vote { president, .. } if president.as_str() == "P0" => matches!(voter.as_str(), "P0" | "P1"),
        _ => true,
    });
    let broadcast = RecordingBroadcast::new();

    let result = engine(&mut state, &players, &broadcast).election_round().await.unwrap();

    // Two of four living players is not a majority
    assert_eq!(
        broadcast.count(|a| matches!(a, Announcement::ElectionResult { passed: false, election_tracker: 1, .. })),
        1
    );
    let RoundEnd::Continue(government) = result else {
        panic!("game should go on");
    };
    assert_eq!(government.president, player(1));
    assert_eq!(state.election_tracker(), 0);
    assert!(!players.was_prompted("P4", |p| matches!(p, Prompt::Vote { .. })));
}

#[tokio::test]
async fn test_chaos_after_three_failed_elections() {
    let mut state = started_game(5, SEED);
    state.board.liberal_cards = 4;
    stack_deck(&mut state, &[Liberal]);
    elect(&mut state, 4, 1);
    let players = ScriptedPlayers::new().with_votes(|_, prompt| match prompt {
        Prompt::Vote { president, .. } => president.as_str() == "P3",
        _ => true,
    });
    let broadcast = RecordingBroadcast::new();

    let result = engine(&mut state, &players, &broadcast).election_round().await.unwrap();

    assert!(broadcast.contains(&Announcement::Chaos { policy: Liberal }));
    // Chaos never checks the tracks
    assert_eq!(state.board().liberal_cards, 5);
    assert!(!broadcast.announcements().iter().any(|a| matches!(a, Announcement::GameOver { .. })));

    let RoundEnd::Continue(government) = result else {
        panic!("game should go on");
    };
    assert_eq!(government.president, player(3));
    assert_eq!(state.election_tracker(), 0);

    // Term limits were lifted by the chaos
    assert!(!nomination_options(&players, "P0").contains(&"P1".to_string()));
    assert!(nomination_options(&players, "P3").contains(&"P1".to_string()));
}

fn nomination_options(players: &ScriptedPlayers, president: &str) -> Vec<String> {
    players
        .prompts_for(president)
        .into_iter()
        .find(|(prompt, _)| *prompt == Prompt::NominateChancellor)
        .map(|(_, options)| options)
        .unwrap()
}

#[tokio::test]
async fn test_hitler_elected_chancellor_wins() {
    let mut state = started_game(5, SEED);
    set_roles(&mut state, &[Role::Liberal, Role::Hitler, Role::Fascist, Role::Liberal, Role::Liberal]);
    state.board.fascist_cards = 3;
    let players = ScriptedPlayers::new();
    let broadcast = RecordingBroadcast::new();

    let result = engine(&mut state, &players, &broadcast).election_round().await.unwrap();
    assert_eq!(result, RoundEnd::GameOver(WinCondition::HitlerChancellor));
}

#[tokio::test]
async fn test_hitler_elected_early_is_harmless() {
    let mut state = started_game(5, SEED);
    set_roles(&mut state, &[Role::Liberal, Role::Hitler, Role::Fascist, Role::Liberal, Role::Liberal]);
    state.board.fascist_cards = 2;
    let players = ScriptedPlayers::new();
    let broadcast = RecordingBroadcast::new();

    let result = engine(&mut state, &players, &broadcast).election_round().await.unwrap();
    assert!(matches!(result, RoundEnd::Continue(_)));
    assert_eq!(broadcast.count(|a| matches!(a, Announcement::NotHitler { .. })), 0);
}

#[tokio::test]
async fn test_chancellor_confirmed_not_hitler() {
    let mut state = started_game(5, SEED);
    set_roles(&mut state, &[Role::Hitler, Role::Liberal, Role::Fascist, Role::Liberal, Role::Liberal]);
    state.board.fascist_cards = 3;
    let players = ScriptedPlayers::new();
    let broadcast = RecordingBroadcast::new();

    engine(&mut state, &players, &broadcast).election_round().await.unwrap();
    assert!(broadcast.contains(&Announcement::NotHitler { player: player(1) }));
    assert!(state.players().get(&player(1)).unwrap().not_hitler);
}
