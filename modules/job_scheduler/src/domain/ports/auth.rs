use async_trait::async_trait;

use crate::contract::model::User;

/// Validates a credential pair.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `Ok(None)` when the email is unknown or the password does not match.
    async fn authenticate(&self, email: &str, password: &str) -> anyhow::Result<Option<User>>;
}

/// Keeps signed-in sessions keyed by an opaque token.
pub trait SessionStore: Send + Sync {
    /// Start a session for `user` and return its token.
    fn open(&self, user: User) -> String;

    fn current(&self, token: &str) -> Option<User>;

    /// Returns whether a session was removed.
    fn clear(&self, token: &str) -> bool;
}
