// src/types/user.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Account record as returned at login. Extra backend fields survive a
/// store/load cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Avatar letter shown in the navigation bar.
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('U')
    }
}

/// `null` reads as an empty string; numbers and other scalars are stringified.
fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Persisted login: the bearer token plus the user it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}
