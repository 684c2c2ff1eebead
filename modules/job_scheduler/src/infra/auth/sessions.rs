use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::contract::model::User;
use crate::domain::ports::SessionStore;

/// Process-local sessions keyed by random UUID tokens. Lost on restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, User>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn open(&self, user: User) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.write().insert(token.clone(), user);
        token
    }

    fn current(&self, token: &str) -> Option<User> {
        self.sessions.read().get(token).cloned()
    }

    fn clear(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }
}
