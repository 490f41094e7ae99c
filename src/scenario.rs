//! Builtin probe scenarios
//!
//! Each scenario is one of the old hand-maintained test scripts, transcribed
//! into step records. All of them are parameterized by a [`Profile`] so the
//! same scenario can run against different accounts.

use rand::Rng;
use serde_json::json;

use crate::script::{Script, Step};

/// Account and character identity a scenario runs as
#[derive(Debug, Clone)]
pub struct Profile {
    pub username: String,
    pub password: String,
    pub email: String,
    pub character: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            username: "oipo".to_string(),
            password: "test".to_string(),
            email: "test@test.nl".to_string(),
            character: "oipo3".to_string(),
        }
    }
}

impl Profile {
    /// Append a random hex suffix to the username and character name so
    /// repeated runs against the same server don't collide on registration
    pub fn with_unique_suffix(mut self) -> Self {
        let mut bytes = [0u8; 4];
        rand::rng().fill(&mut bytes);
        let suffix = hex::encode(bytes);
        self.username = format!("{}{}", self.username, suffix);
        self.character = format!("{}{}", self.character, suffix);
        self
    }

    fn register(&self) -> serde_json::Value {
        json!({
            "type": "Auth:register",
            "username": self.username,
            "password": self.password,
            "email": self.email,
        })
    }

    fn login(&self) -> serde_json::Value {
        json!({
            "type": "Auth:login",
            "username": self.username,
            "password": self.password,
        })
    }

    fn create_character(&self, name: &str) -> serde_json::Value {
        json!({
            "type": "Game:create_character",
            "slot": 0,
            "name": name,
            "gender": "test",
            "allegiance": "Pirates",
            "baseclass": "Mage",
        })
    }

    fn play_character(&self) -> serde_json::Value {
        json!({"type": "Game:play_character", "name": self.character})
    }
}

/// Names accepted by [`by_name`], in help-text order
pub const NAMES: &[&str] = &["signup", "play", "character-names", "motd", "legacy-register"];

/// Look up a builtin scenario
pub fn by_name(name: &str, profile: &Profile) -> Option<Script> {
    match name {
        "signup" => Some(signup(profile)),
        "play" => Some(play(profile)),
        "character-names" => Some(character_names(profile)),
        "motd" => Some(motd(profile)),
        "legacy-register" => Some(legacy_register(profile)),
        _ => None,
    }
}

/// Register (falling back to login), create a character (falling back to
/// playing an existing one), then watch the server push events
pub fn signup(p: &Profile) -> Script {
    Script::new(vec![
        Step::send_expect(p.register(), p.login()),
        Step::send_expect(p.create_character(&p.character), p.play_character()),
        Step::Drain,
    ])
}

/// Enter the world and fire off a move and a chat line without waiting for
/// replies to either
pub fn play(p: &Profile) -> Script {
    Script::new(vec![
        Step::send_expect(p.register(), p.login()),
        Step::send_check(p.play_character()),
        Step::send_only(json!({"type": "Game:move", "x": 12, "y": 12})),
        Step::send_only(json!({"type": "Chat:send", "content": "hello from mudprobe"})),
        Step::Drain,
    ])
}

/// Throw hostile character names at creation and print whatever comes back.
/// Rejections are the point here, so nothing is checked.
pub fn character_names(p: &Profile) -> Script {
    let mut steps = vec![Step::send_expect(p.register(), p.login())];
    for name in ["漢", "o1po", "oi po", p.character.as_str(), "бipб"] {
        steps.push(Step::send_print(p.create_character(name)));
    }
    Script::new(steps)
}

/// Set the message of the day (needs a moderator account server-side)
pub fn motd(p: &Profile) -> Script {
    Script::new(vec![
        Step::send_expect(p.register(), p.login()),
        Step::send_only(json!({"type": "Moderator:motd", "motd": "probe was here"})),
        Step::Drain,
    ])
}

/// Poke the pre-namespacing bare `register` action old servers still answer
pub fn legacy_register(p: &Profile) -> Script {
    Script::new(vec![
        Step::send_print(json!({
            "type": "register",
            "username": p.username,
            "password": p.password,
            "email": p.email,
        })),
        Step::Drain,
    ])
}
