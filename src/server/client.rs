//! Client session extractor
//!
//! Requests are tied to a [`ClientSession`] through the `billed_session`
//! cookie. A request without a known cookie works on a throwaway session;
//! it is only registered, and the cookie issued, once a login succeeds
//! ([`Client::register`]). Logging out forgets it ([`Client::end`]).

use super::state::{AppState, ClientHandle, ClientSession, SessionRegistry};
use crate::core::error::BilledError;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "billed_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CookieChange {
    Issue,
    Expire,
}

pub struct Client {
    pub id: Uuid,
    handle: ClientHandle,
    sessions: SessionRegistry,
    registered: bool,
    cookie: Option<CookieChange>,
}

impl Client {
    /// Client for the session named by the request cookies, or a throwaway one
    pub fn resolve(headers: &HeaderMap, sessions: &SessionRegistry) -> Result<Self, BilledError> {
        if let Some(id) = session_id(headers) {
            if let Some(handle) = sessions.get(&id)? {
                return Ok(Self {
                    id,
                    handle,
                    sessions: sessions.clone(),
                    registered: true,
                    cookie: None,
                });
            }
            tracing::debug!(session_id = %id, "unknown session cookie");
        }

        Ok(Self {
            id: Uuid::new_v4(),
            handle: ClientSession::handle(),
            sessions: sessions.clone(),
            registered: false,
            cookie: None,
        })
    }

    /// Wait for this client's previous requests, then hold its session
    pub async fn lock(&self) -> OwnedMutexGuard<ClientSession> {
        self.handle.clone().lock_owned().await
    }

    /// Keep the session past this request and hand out its cookie
    pub fn register(&mut self) -> Result<(), BilledError> {
        if !self.registered {
            self.sessions.insert(self.id, self.handle.clone())?;
            self.registered = true;
            self.cookie = Some(CookieChange::Issue);
        }
        Ok(())
    }

    /// Forget the session and expire its cookie
    pub fn end(&mut self) -> Result<(), BilledError> {
        if self.registered {
            self.sessions.remove(&self.id)?;
            self.registered = false;
            self.cookie = Some(CookieChange::Expire);
        }
        Ok(())
    }

    /// Attach the cookie change, if any, to the response
    pub fn finish(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        let cookie = match self.cookie {
            Some(CookieChange::Issue) => format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, self.id
            ),
            Some(CookieChange::Expire) => format!(
                "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
                SESSION_COOKIE
            ),
            None => return response,
        };
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "invalid session cookie"),
        }
        response
    }
}

impl FromRequestParts<AppState> for Client {
    type Rejection = BilledError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Self::resolve(&parts.headers, &state.sessions)
    }
}

/// Session id carried by the request cookies, if well-formed
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
}
