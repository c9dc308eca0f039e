
use game_core::{SessionError, SubmitOutcome};
use game_runner::DriverError;
use game_types::{ClientMessage, GamePhase, MistakeKind, ServerMessage};
use std::time::Duration;
use test_helpers::*;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_start_announces_first_turn() {
    let mut setup = TestSessionSetup::started(&["Alice", "Bob", "Carol"]).await;

    let messages = setup.drain();
    assert!(matches!(
        messages[0],
        ServerMessage::SessionStarted { ref players, .. } if players.len() == 3
    ));
    assert_eq!(
        messages[1],
        ServerMessage::TurnChanged {
            current_player_index: 0,
            time_remaining: 5,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_clock_runs_out_and_passes_the_turn() {
    let mut setup = TestSessionSetup::started(&["Alice", "Bob", "Carol"]).await;
    setup.drain();

    sleep(Duration::from_millis(5500)).await;
    let messages = setup.drain();

    let ticks: Vec<u32> = messages
        .iter()
        .filter_map(|m| match m {
            ServerMessage::TimerTicked { time_remaining } => Some(*time_remaining),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![4, 3, 2, 1]);

    assert!(messages.iter().any(|m| matches!(
        m,
        ServerMessage::MistakeMade {
            kind: MistakeKind::Timeout,
            lives_remaining: 2,
            ..
        }
    )));
    assert_eq!(
        messages.last(),
        Some(&ServerMessage::TurnChanged {
            current_player_index: 1,
            time_remaining: 5,
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_accepted_word_restarts_the_clock() {
    let mut setup = TestSessionSetup::started(&["Alice", "Bob", "Carol"]).await;

    sleep(Duration::from_millis(3500)).await;
    let outcome = setup.handle.submit_word("Apple").await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
    setup.drain();

    // Bob gets a full five seconds from the moment Alice answered.
    sleep(Duration::from_millis(4600)).await;
    let messages = setup.drain();
    assert_eq!(
        count_matching(&messages, |m| matches!(m, ServerMessage::MistakeMade { .. })),
        0
    );
    assert_eq!(
        count_matching(&messages, |m| matches!(m, ServerMessage::TimerTicked { .. })),
        4
    );

    sleep(Duration::from_millis(500)).await;
    let messages = setup.drain();
    assert_eq!(
        count_matching(&messages, |m| matches!(m, ServerMessage::MistakeMade { .. })),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeouts_alone_finish_the_game() {
    let mut setup = TestSessionSetup::started(&["A", "B", "C"]).await;

    // Eight five-second timeouts: A and B three times each, C twice.
    sleep(Duration::from_secs(45)).await;
    let messages = setup.drain();

    assert_eq!(
        count_matching(&messages, |m| matches!(m, ServerMessage::SessionFinished { .. })),
        1
    );
    assert_eq!(
        count_matching(&messages, |m| matches!(m, ServerMessage::PlayerEliminated { .. })),
        2
    );
    match messages.last() {
        Some(ServerMessage::SessionFinished {
            leaderboard,
            winner,
        }) => {
            assert_eq!(winner.as_ref().map(|p| p.name.as_str()), Some("C"));
            let ranked: Vec<(&str, u32)> = leaderboard
                .iter()
                .map(|e| (e.player_name.as_str(), e.score))
                .collect();
            assert_eq!(ranked, vec![("C", 3), ("B", 2), ("A", 1)]);
        }
        other => panic!("Expected SessionFinished, got {:?}", other),
    }

    // No tick after the end.
    sleep(Duration::from_secs(10)).await;
    assert!(setup.drain().is_empty());

    let state = setup.handle.snapshot().await.unwrap();
    assert_eq!(state.game_phase, GamePhase::Finished);
    assert!(!state.is_game_active);

    let stored = setup.leaderboard.get_leaderboard(10).await;
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].player_name, "C");
    assert_eq!(stored[0].game_id, state.session_id);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_timer_expiry() {
    let setup = TestSessionSetup::started(&["A", "B", "C"]).await;

    let outcome = setup.handle.timer_expired().await.unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Mistake {
            lives_remaining: 2,
            eliminated: false,
            ..
        }
    ));

    let state = setup.handle.snapshot().await.unwrap();
    assert_eq!(state.current_player, 1);
    assert_eq!(state.time_remaining, 5);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_start_is_reported() {
    let mut setup = TestSessionSetup::new();

    let result = setup
        .handle
        .start_session(settings_for(2), vec!["A".to_string(), "B".to_string()])
        .await;
    assert!(matches!(
        result,
        Err(DriverError::Session(SessionError::InvalidConfiguration(_)))
    ));

    sleep(Duration::from_secs(10)).await;
    assert!(setup.drain().is_empty());
    assert_eq!(
        setup.handle.snapshot().await.unwrap().game_phase,
        GamePhase::Setup
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_the_clock_and_records_nothing() {
    let mut setup = TestSessionSetup::started(&["A", "B", "C"]).await;
    setup.drain();

    setup.handle.cancel_session().await.unwrap();
    sleep(Duration::from_secs(10)).await;

    let messages = setup.drain();
    assert_eq!(messages, vec![ServerMessage::SessionCancelled]);
    assert!(setup.leaderboard.entries().await.is_empty());

    let second = setup.handle.cancel_session().await;
    assert!(matches!(
        second,
        Err(DriverError::Session(SessionError::NotInPhase { .. }))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_routes_client_messages() {
    let mut setup = TestSessionSetup::new();

    let reply = setup
        .handle
        .dispatch(ClientMessage::StartSession {
            settings: settings_for(3),
            player_names: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        })
        .await
        .unwrap();
    assert!(reply.is_none());

    setup
        .handle
        .dispatch(ClientMessage::UpdateDraft {
            text: "ban".to_string(),
        })
        .await
        .unwrap();

    match setup.handle.dispatch(ClientMessage::RequestState).await {
        Ok(Some(ServerMessage::StateSnapshot { state })) => {
            assert_eq!(state.current_word, "ban");
            assert!(state.is_game_active);
        }
        other => panic!("Expected a snapshot, got {:?}", other),
    }

    setup
        .handle
        .dispatch(ClientMessage::SubmitWord {
            text: "banana".to_string(),
        })
        .await
        .unwrap();
    setup
        .handle
        .dispatch(ClientMessage::CancelSession)
        .await
        .unwrap();
    let first_id = setup.handle.snapshot().await.unwrap().session_id;
    setup.drain();

    setup.handle.dispatch(ClientMessage::Rematch).await.unwrap();
    let state = setup.handle.snapshot().await.unwrap();
    assert_ne!(state.session_id, first_id);
    assert_eq!(state.game_phase, GamePhase::Playing);
    assert!(state.used_words.is_empty());
    assert!(matches!(
        setup.drain().first(),
        Some(ServerMessage::SessionStarted { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_task_stops_when_handles_are_dropped() {
    let setup = TestSessionSetup::started(&["A", "B", "C"]).await;
    let TestSessionSetup { handle, task, .. } = setup;

    let spare = handle.clone();
    drop(handle);
    assert!(!spare.is_closed());
    drop(spare);

    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_rematch_before_any_game_keeps_task_alive() {
    let mut setup = TestSessionSetup::new();

    setup.handle.cancel_session().await.unwrap();
    let result = setup.handle.rematch().await;
    assert!(matches!(
        result,
        Err(DriverError::Session(SessionError::InvalidConfiguration(_)))
    ));

    sleep(Duration::from_secs(10)).await;
    assert_eq!(setup.drain(), vec![ServerMessage::SessionCancelled]);
    assert!(!setup.handle.is_closed());

    let state = setup.handle.snapshot().await.unwrap();
    assert_eq!(state.game_phase, GamePhase::Finished);
    assert!(!state.is_game_active);
}
