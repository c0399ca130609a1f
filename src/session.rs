use std::collections::HashMap;

use rand::rngs::OsRng;
use rand::RngCore;

/// In-memory bearer-token registry. Never persisted - a restart empties
/// it and every client has to log in again.
pub struct Sessions {
    tokens: HashMap<String, String>,
}

impl Sessions {
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
        }
    }

    /// A user may hold several live tokens at once; issuing never
    /// revokes earlier ones.
    pub fn issue(&mut self, username: &str) -> String {
        let token = generate_token();
        self.tokens.insert(token.clone(), username.to_string());
        token
    }

    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }

    pub fn revoke(&mut self, token: &str) {
        self.tokens.remove(token);
    }
}

/// 256 bits from the OS rng, hex encoded so the token is cookie- and
/// url-safe. Collisions are negligible at this size; no uniqueness
/// check is made.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);

    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
