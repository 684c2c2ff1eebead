use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

use crate::api::rest::error::map_domain_error;
use crate::api::rest::problem::ProblemResponse;
use crate::contract::model::User;
use crate::domain::error::DomainError;
use crate::domain::session::SessionService;

/// The signed-in user behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user: User,
    pub token: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let instance = parts.uri.path().to_string();
        let sessions = parts
            .extensions
            .get::<Arc<SessionService>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("SessionService extension missing");
                map_domain_error(&DomainError::database("session store unavailable"), &instance)
            })?;

        let token = bearer_token(parts)
            .ok_or_else(|| map_domain_error(&DomainError::unauthenticated(), &instance))?
            .to_string();

        let user = sessions
            .current(&token)
            .map_err(|e| map_domain_error(&e, &instance))?;

        Ok(Viewer { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut req = Request::builder().uri("/jobs");
        if let Some(h) = header {
            req = req.header(AUTHORIZATION, h);
        }
        req.body(()).unwrap().into_parts().0
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc123"))), Some("abc123"));
        assert_eq!(bearer_token(&parts(Some("bearer abc123"))), Some("abc123"));
        assert_eq!(bearer_token(&parts(Some("Basic abc123"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }
}
