use std::collections::HashSet;
use std::sync::Mutex;

use uuid::Uuid;

/// In-memory one-time token store. A token is valid for exactly one
/// mutating request; consuming it removes it.
#[derive(Default)]
pub struct TokenStore {
    tokens: Mutex<HashSet<String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens
            .lock()
            .expect("token store lock poisoned")
            .insert(token.clone());
        token
    }

    /// Returns true when the token existed. The token is removed on the
    /// first successful lookup, so a replay always fails.
    pub fn consume(&self, token: &str) -> bool {
        self.tokens
            .lock()
            .expect("token store lock poisoned")
            .remove(token)
    }
}
