use anyhow::{Context, Result};
use game_core::WordBank;
use game_types::{Player, ServerMessage};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};

use game_runner::{Config, LeaderboardRepository, spawn_session};

const LEADERBOARD_SIZE: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Frankenstein Brain Clash...");

    let config = Config::from_env().context("Failed to read configuration")?;

    let word_bank = match &config.words_file {
        Some(path) => {
            info!("Loading categories from {}", path.display());
            Arc::new(load_word_bank(path).await?)
        }
        None => Arc::new(WordBank::standard()),
    };

    let leaderboard = Arc::new(match &config.leaderboard_path {
        Some(path) => LeaderboardRepository::open(path).await?,
        None => LeaderboardRepository::new_in_memory(),
    });
    match leaderboard.path() {
        Some(path) => info!("Leaderboard stored at {}", path.display()),
        None => info!("Leaderboard kept in memory only"),
    }

    let preferences = leaderboard.app_settings().await;
    info!(
        "Preferences: music {}, vibration {}",
        on_off(preferences.music),
        on_off(preferences.vibration)
    );

    let (handle, mut notifications, task) =
        spawn_session(config.driver_options(), word_bank, leaderboard.clone());

    handle
        .start_session(config.settings(), config.players.clone())
        .await
        .context("Failed to start session")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut players: Vec<Player> = Vec::new();

    loop {
        tokio::select! {
            message = notifications.recv() => {
                let Some(message) = message else { break };
                if render(&message, &mut players) {
                    break;
                }
            }
            line = lines.next_line(), if input_open => {
                match line.context("Failed to read input")? {
                    Some(text) => {
                        if let Err(e) = handle.submit_word(&text).await {
                            warn!("Submission rejected: {}", e);
                        }
                    }
                    None => {
                        info!("Input closed, cancelling session");
                        input_open = false;
                        let _ = handle.cancel_session().await;
                    }
                }
            }
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, cancelling session");
                let _ = handle.cancel_session().await;
            }
        }
    }

    drop(handle);
    if let Err(e) = task.await {
        warn!("Session task ended abnormally: {}", e);
    }

    let top = leaderboard.get_leaderboard(LEADERBOARD_SIZE).await;
    if !top.is_empty() {
        println!("\nLeaderboard");
        for (position, entry) in top.iter().enumerate() {
            println!("{:>2}. {:<12} {:>3}", position + 1, entry.player_name, entry.score);
        }
    }

    Ok(())
}

async fn load_word_bank(path: &Path) -> Result<WordBank> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    WordBank::from_category_list(&text)
        .with_context(|| format!("Failed to load categories from {}", path.display()))
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn player_name(players: &[Player], id: uuid::Uuid) -> &str {
    players
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.as_str())
        .unwrap_or("?")
}

/// Print one notification. Returns true once the game is over.
fn render(message: &ServerMessage, players: &mut Vec<Player>) -> bool {
    match message {
        ServerMessage::SessionStarted {
            players: roster,
            category,
            ..
        } => {
            *players = roster.clone();
            println!("Category: {}", category);
            false
        }
        ServerMessage::TurnChanged {
            current_player_index,
            time_remaining,
        } => {
            let name = players
                .get(*current_player_index)
                .map(|p| p.name.as_str())
                .unwrap_or("?");
            println!("{}'s turn ({}s)", name, time_remaining);
            false
        }
        ServerMessage::TimerTicked { .. } => false,
        ServerMessage::WordAccepted {
            player_id,
            word,
            points,
        } => {
            println!("{} said '{}' (+{})", player_name(players, *player_id), word, points);
            false
        }
        ServerMessage::MistakeMade {
            player_id,
            kind,
            lives_remaining,
        } => {
            println!(
                "{} made a mistake ({:?}), {} lives left",
                player_name(players, *player_id),
                kind,
                lives_remaining
            );
            false
        }
        ServerMessage::PlayerEliminated { player_id } => {
            println!("{} is out!", player_name(players, *player_id));
            false
        }
        ServerMessage::SessionFinished { winner, .. } => {
            match winner {
                Some(player) => println!("{} wins!", player.name),
                None => println!("Game over"),
            }
            true
        }
        ServerMessage::SessionCancelled => {
            println!("Game cancelled");
            true
        }
        ServerMessage::StateSnapshot { .. } => false,
        ServerMessage::Aborted { error } => {
            println!("Game aborted: {:?}", error);
            true
        }
    }
}
