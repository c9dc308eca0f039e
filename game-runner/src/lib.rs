pub mod config;
pub mod leaderboard;
pub mod session_driver;

pub use config::Config;
pub use leaderboard::{LeaderboardRepository, PersistedState};
pub use session_driver::{
    DriverError, DriverOptions, NotificationForwarder, SessionHandle, spawn_session,
};
