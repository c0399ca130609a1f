use std::collections::HashMap;

/// username -> plaintext password. Passwords are deliberately not
/// hashed; this is a toy backend for local use.
pub type Users = HashMap<String, String>;

/// Seed used when no users.json exists yet.
pub fn defaults() -> Users {
    HashMap::from([("admin".to_string(), "123".to_string())])
}
