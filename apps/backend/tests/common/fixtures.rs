//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Password used for every user created by [`super::TestContext::create_test_user`].
pub const PASSWORD: &str = "correct horse battery staple";

/// Cheapest bcrypt cost, so tests don't spend their time hashing.
pub const PASSWORD_HASH_COST: u32 = 4;

/// Practice text for the step at `position`.
pub fn sample_text(position: usize) -> String {
    const TEXTS: [&str; 3] = ["asdf jkl;", "the quick brown fox", "pack my box"];
    TEXTS[position % TEXTS.len()].to_string()
}

/// Create a registration or login request body.
pub fn credentials(username: &str, password: &str) -> serde_json::Value {
    json!({ "username": username, "password": password })
}

/// Create a lesson request body.
pub fn lesson_request(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": "Created over HTTP",
        "language": "en"
    })
}

/// Create a step result request body. Absent values are left out of the JSON.
pub fn step_result_request(
    percentage: Option<i32>,
    status: Option<&str>,
    wpm: Option<i32>,
    timing: Option<i32>,
) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    if let Some(p) = percentage {
        obj.insert("percentage".to_string(), json!(p));
    }
    if let Some(s) = status {
        obj.insert("status".to_string(), json!(s));
    }
    if let Some(w) = wpm {
        obj.insert("wpm".to_string(), json!(w));
    }
    if let Some(t) = timing {
        obj.insert("timing".to_string(), json!(t));
    }
    serde_json::Value::Object(obj)
}

/// Generate a unique username to avoid collisions.
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

/// Generate a unique lesson name.
pub fn unique_lesson_name(prefix: &str) -> String {
    format!("{} {}", prefix, &Uuid::new_v4().to_string()[..8])
}
