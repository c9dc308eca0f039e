use game_core::{GameEvent, GameEventHandler, GameRng, GameSession, WordBank};
use game_types::{GameSettings, Player};
use std::sync::{Arc, Mutex};

pub const TEST_SEED: u64 = 42;

/// A tiny word bank with one category per difficulty
pub fn create_test_bank() -> Arc<WordBank> {
    let list = "\
# test categories
[Fruits: Easy]
apple
banana
cherry

[Rivers: Medium]
nile
amazon

[Elements: Hard]
argon
xenon
";
    Arc::new(WordBank::from_category_list(list).unwrap())
}

pub fn create_test_settings(player_count: usize) -> GameSettings {
    GameSettings {
        number_of_players: player_count,
        ..GameSettings::default()
    }
}

/// Creates a session in setup with an event collector attached
pub fn create_test_session() -> (GameSession, EventCollector) {
    let collector = EventCollector::new();
    let mut session = GameSession::new(create_test_bank(), GameRng::new(TEST_SEED));
    session.add_handler(Box::new(collector.clone()));
    (session, collector)
}

/// Creates a session that is already playing with the given players
pub fn create_started_session(names: &[&str]) -> (GameSession, EventCollector) {
    let (mut session, collector) = create_test_session();
    session
        .start(create_test_settings(names.len()), names)
        .expect("session should start");
    (session, collector)
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn last_event(&self) -> Option<GameEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn count(&self, check_fn: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Helper to get player by name
pub fn get_player_by_name<'a>(session: &'a GameSession, name: &str) -> Option<&'a Player> {
    session.players().iter().find(|p| p.name == name)
}

/// Lets the current player's clock run out
pub fn time_out(session: &mut GameSession) {
    session.on_timer_expired().expect("timeout should apply");
}
