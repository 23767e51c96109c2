//! Caller identity and session-change notification.
//!
//! Token issuance happens upstream; the gateway forwards the resolved identity as
//! `x-user-id` / `x-user-role` headers and handlers receive it as an extractor argument.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Company,
    Freelancer,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Company => "company",
            Role::Freelancer => "freelancer",
        }
    }
}

impl FromStr for Role {
    type Err = SessionRejection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "company" => Ok(Role::Company),
            "freelancer" | "user" => Ok(Role::Freelancer),
            other => Err(SessionRejection::UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity claims handed over by the external token issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn from_headers(headers: &HeaderMap) -> Result<Self, SessionRejection> {
        let user_id = header_value(headers, USER_ID_HEADER)?;
        let role = header_value(headers, USER_ROLE_HEADER)?.parse()?;
        Ok(Self { user_id, role })
    }
}

fn header_value(headers: &HeaderMap, name: &'static str) -> Result<String, SessionRejection> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(SessionRejection::MissingHeader(name))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Identity::from_headers(&parts.headers)
    }
}

/// Extractor that only admits admin identities.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        if !identity.is_admin() {
            return Err(SessionRejection::Forbidden(identity.role));
        }
        Ok(AdminIdentity(identity))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionRejection {
    #[error("missing {0} header")]
    MissingHeader(&'static str),
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    #[error("role '{0}' may not perform admin actions")]
    Forbidden(Role),
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let status = match self {
            SessionRejection::MissingHeader(_) | SessionRejection::UnknownRole(_) => {
                StatusCode::UNAUTHORIZED
            }
            SessionRejection::Forbidden(_) => StatusCode::FORBIDDEN,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Callback invoked with the new identity (or `None` after sign-out).
pub type SessionListener = Box<dyn Fn(Option<&Identity>) + Send + Sync>;

/// Holds the current session and tells registered listeners when it changes.
///
/// Listeners are fixed at construction; there is no process-wide event bus.
pub struct SessionNotifier {
    current: Mutex<Option<Identity>>,
    listeners: Vec<SessionListener>,
}

impl SessionNotifier {
    pub fn new(listeners: Vec<SessionListener>) -> Self {
        Self {
            current: Mutex::new(None),
            listeners,
        }
    }

    pub fn current(&self) -> Option<Identity> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sign_in(&self, identity: Identity) {
        self.replace(Some(identity));
    }

    pub fn sign_out(&self) {
        self.replace(None);
    }

    fn replace(&self, next: Option<Identity>) {
        let snapshot = {
            let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            *guard = next;
            guard.clone()
        };

        tracing::debug!(
            user_id = snapshot.as_ref().map(|identity| identity.user_id.as_str()),
            listeners = self.listeners.len(),
            "session changed"
        );

        for listener in &self.listeners {
            listener(snapshot.as_ref());
        }
    }
}

impl fmt::Debug for SessionNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionNotifier")
            .field("current", &self.current())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
