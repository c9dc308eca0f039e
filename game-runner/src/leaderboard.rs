use anyhow::{Context, Result};
use game_types::{AppSettings, LeaderboardEntry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Everything kept between games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub app_settings: AppSettings,
}

/// Leaderboard and app settings, optionally mirrored to a JSON file.
#[derive(Debug)]
pub struct LeaderboardRepository {
    path: Option<PathBuf>,
    state: RwLock<PersistedState>,
}

impl LeaderboardRepository {
    pub fn new_in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(PersistedState::default()),
        }
    }

    /// Open a file-backed repository. A missing file starts empty.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let state = if fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check {}", path.display()))?
        {
            let raw = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            PersistedState::default()
        };

        info!(
            "Loaded {} leaderboard entries from {}",
            state.leaderboard.len(),
            path.display()
        );

        Ok(Self {
            path: Some(path),
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn append(&self, entries: &[LeaderboardEntry]) -> Result<()> {
        let mut state = self.state.write().await;
        state.leaderboard.extend_from_slice(entries);
        debug!("Leaderboard now holds {} entries", state.leaderboard.len());
        self.persist(&state).await
    }

    /// All entries in insertion order.
    pub async fn entries(&self) -> Vec<LeaderboardEntry> {
        self.state.read().await.leaderboard.clone()
    }

    /// Best scores first; entries with equal scores keep insertion order.
    pub async fn get_leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries = self.entries().await;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        entries
    }

    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.write().await;
        state.leaderboard.clear();
        self.persist(&state).await
    }

    pub async fn app_settings(&self) -> AppSettings {
        self.state.read().await.app_settings
    }

    pub async fn update_app_settings(&self, settings: AppSettings) -> Result<()> {
        let mut state = self.state.write().await;
        state.app_settings = settings;
        self.persist(&state).await
    }

    async fn persist(&self, state: &PersistedState) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(state).context("Failed to serialize leaderboard")?;
        fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: name.to_string(),
            score,
            date: "2026-10-19T12:00:00+00:00".to_string(),
            game_id: Uuid::nil(),
        }
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("brain-clash-{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_leaderboard_orders_by_score() {
        let repo = LeaderboardRepository::new_in_memory();
        assert!(repo.path().is_none());
        repo.append(&[entry("A", 1), entry("B", 3)]).await.unwrap();
        repo.append(&[entry("C", 3), entry("D", 2)]).await.unwrap();

        let top: Vec<String> = repo
            .get_leaderboard(3)
            .await
            .into_iter()
            .map(|e| e.player_name)
            .collect();
        assert_eq!(top, vec!["B", "C", "D"]);
        assert_eq!(repo.entries().await.len(), 4);

        repo.clear().await.unwrap();
        assert!(repo.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_file_backed_state_survives_reopen() {
        let path = temp_path();

        let repo = LeaderboardRepository::open(&path).await.unwrap();
        assert_eq!(repo.path(), Some(path.as_path()));
        assert!(repo.entries().await.is_empty());
        repo.append(&[entry("Igor", 2)]).await.unwrap();
        repo.update_app_settings(AppSettings {
            music: false,
            vibration: true,
        })
        .await
        .unwrap();

        let reopened = LeaderboardRepository::open(&path).await.unwrap();
        assert_eq!(reopened.entries().await, vec![entry("Igor", 2)]);
        assert!(!reopened.app_settings().await.music);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let path = temp_path();
        std::fs::write(&path, "not json").unwrap();

        let err = LeaderboardRepository::open(&path).await.err().unwrap();
        assert!(err.to_string().contains("Failed to parse"));

        let _ = std::fs::remove_file(&path);
    }
}
