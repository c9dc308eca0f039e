use anyhow::{Context, Result, anyhow, bail};
use game_core::WORD_POINTS;
use game_types::{Difficulty, GameSettings};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::session_driver::DriverOptions;

const DEFAULT_PLAYERS: &str = "Alice,Bob,Carol";
const DEFAULT_COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub players: Vec<String>,
    pub difficulty: Difficulty,
    pub timer_seconds: u32,
    pub categories: Vec<String>,
    pub word_points: u32,
    pub rng_seed: Option<u64>,
    pub leaderboard_path: Option<PathBuf>,
    pub words_file: Option<PathBuf>,
    pub command_buffer: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let players = split_list(
            lookup("CLASH_PLAYERS")
                .as_deref()
                .unwrap_or(DEFAULT_PLAYERS),
        );
        let categories = split_list(lookup("CLASH_CATEGORIES").as_deref().unwrap_or(""));

        let command_buffer = parse_or(&lookup, "CLASH_COMMAND_BUFFER", DEFAULT_COMMAND_BUFFER)?;
        if command_buffer == 0 {
            bail!("Invalid CLASH_COMMAND_BUFFER: must be at least 1");
        }

        Ok(Self {
            players,
            difficulty: parse_or(&lookup, "CLASH_DIFFICULTY", Difficulty::Easy)?,
            timer_seconds: parse_or(&lookup, "CLASH_TIMER_SECONDS", 5)?,
            categories,
            word_points: parse_or(&lookup, "CLASH_WORD_POINTS", WORD_POINTS)?,
            rng_seed: lookup("CLASH_RNG_SEED")
                .map(|value| parse_value::<u64>("CLASH_RNG_SEED", &value))
                .transpose()?,
            leaderboard_path: lookup("CLASH_LEADERBOARD_PATH")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            words_file: lookup("CLASH_WORDS_FILE")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            command_buffer,
        })
    }

    pub fn settings(&self) -> GameSettings {
        GameSettings {
            number_of_players: self.players.len(),
            difficulty: self.difficulty,
            timer_seconds: self.timer_seconds,
            categories: self.categories.clone(),
        }
    }

    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            rng_seed: self.rng_seed,
            word_points: self.word_points,
            command_buffer: self.command_buffer,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow!("{}", e))
        .with_context(|| format!("Invalid {}: '{}'", key, value))
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => parse_value(key, &value),
        None => Ok(default),
    }
}
