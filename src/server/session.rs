//! Session cookie extraction

use crate::auth::{SessionClaims, token_from_cookie_header};
use crate::server::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use std::convert::Infallible;

/// The caller's session, if the request carries a valid one
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<SessionClaims>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(token_from_cookie_header)
            .and_then(|token| match state.sessions().verify(token) {
                Ok(claims) => Some(claims),
                Err(e) => {
                    log::debug!("Ignoring session cookie: {}", e);
                    None
                }
            });

        Ok(CurrentSession(claims))
    }
}
