use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::contract::model::{Session, User};
use crate::domain::error::DomainError;
use crate::domain::ports::{Authenticator, SessionStore};

/// Sign-in gate in front of the scheduling service.
#[derive(Clone)]
pub struct SessionService {
    authenticator: Arc<dyn Authenticator>,
    sessions: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(authenticator: Arc<dyn Authenticator>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            authenticator,
            sessions,
        }
    }

    #[instrument(name = "job_scheduler.session.login", skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let user = self
            .authenticator
            .authenticate(email, password)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;

        match user {
            Some(user) => {
                let token = self.sessions.open(user.clone());
                info!(uid = %user.uid, role = user.role.as_str(), "Signed in");
                Ok(Session { token, user })
            }
            None => {
                warn!("Rejected sign-in");
                Err(DomainError::unauthenticated())
            }
        }
    }

    /// The user behind `token`, if the session is still open.
    pub fn current(&self, token: &str) -> Result<User, DomainError> {
        self.sessions
            .current(token)
            .ok_or_else(DomainError::unauthenticated)
    }

    #[instrument(name = "job_scheduler.session.logout", skip_all)]
    pub fn logout(&self, token: &str) -> Result<(), DomainError> {
        if self.sessions.clear(token) {
            info!("Signed out");
            Ok(())
        } else {
            Err(DomainError::unauthenticated())
        }
    }
}
