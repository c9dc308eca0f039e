pub mod elimination;
pub mod error;
pub mod game_events;
pub mod registry;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod turn;
pub mod word_bank;

// Re-export main components
pub use elimination::*;
pub use error::*;
pub use game_events::*;
pub use registry::*;
pub use rng::*;
pub use scoring::*;
pub use session::*;
pub use turn::*;
pub use word_bank::*;
