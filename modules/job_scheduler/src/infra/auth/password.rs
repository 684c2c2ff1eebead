use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use tracing::debug;

use crate::contract::model::User;
use crate::domain::ports::Authenticator;
use crate::domain::repo::JobsRepository;

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))
}

/// `false` for a wrong password and for a hash that cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Checks credentials against the Argon2 hashes kept with each user.
pub struct PasswordAuthenticator {
    repo: Arc<dyn JobsRepository>,
}

impl PasswordAuthenticator {
    pub fn new(repo: Arc<dyn JobsRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl Authenticator for PasswordAuthenticator {
    async fn authenticate(&self, email: &str, password: &str) -> anyhow::Result<Option<User>> {
        let Some(credentials) = self.repo.find_credentials(email.trim()).await? else {
            debug!("Unknown email");
            return Ok(None);
        };

        let hash = credentials.password_hash;
        let candidate = password.to_string();
        // CPU-bound
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("password check aborted: {e}"))?;

        Ok(matches.then_some(credentials.user))
    }
}
