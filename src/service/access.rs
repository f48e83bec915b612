//! Role-based access extractors.
//!
//! Authentication happens upstream; the authenticating gateway forwards
//! the caller's role in the `X-User-Role` header. Each role maps to a
//! fixed capability set, and handlers demand a capability through an
//! extractor:
//!
//! ```ignore
//! async fn edit(CanWrite(role): CanWrite) -> StatusCode { StatusCode::OK }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::routes::{ApiError, ErrorResponse};

/// Header carrying the caller's role.
pub const ROLE_HEADER: &str = "x-user-role";

/// Something a role may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Read topics, histories, trees and paths.
    ReadTopics,
    /// Create topics and append versions.
    WriteTopics,
}

/// Caller role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access.
    Admin,
    /// Read and write topics.
    Editor,
    /// Read-only access.
    Viewer,
}

/// A role header value that names no known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl Role {
    /// Capabilities granted to this role.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::Admin | Self::Editor => &[Capability::ReadTopics, Capability::WriteTopics],
            Self::Viewer => &[Capability::ReadTopics],
        }
    }

    /// Whether this role grants `capability`.
    pub fn allows(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Editor => write!(f, "editor"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

/// Check the request's role against a required capability.
pub fn authorize(parts: &Parts, capability: Capability) -> Result<Role, ApiError> {
    let raw = parts
        .headers
        .get(ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("UNAUTHENTICATED", "Missing caller role")),
            )
        })?;

    let role: Role = raw.parse().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("UNAUTHENTICATED", "Unknown caller role").with_details(raw)),
        )
    })?;

    if !role.allows(capability) {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new(
                "FORBIDDEN",
                format!("Role {} lacks {:?}", role, capability),
            )),
        ));
    }
    Ok(role)
}

/// Requires [`Capability::ReadTopics`].
pub struct CanRead(pub Role);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CanRead {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, Capability::ReadTopics).map(CanRead)
    }
}

/// Requires [`Capability::WriteTopics`].
pub struct CanWrite(pub Role);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CanWrite {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, Capability::WriteTopics).map(CanWrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_role(role: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/topics");
        if let Some(role) = role {
            builder = builder.header(ROLE_HEADER, role);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_capability_sets() {
        assert!(Role::Admin.allows(Capability::WriteTopics));
        assert!(Role::Editor.allows(Capability::WriteTopics));
        assert!(Role::Viewer.allows(Capability::ReadTopics));
        assert!(!Role::Viewer.allows(Capability::WriteTopics));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" viewer ".parse::<Role>(), Ok(Role::Viewer));
        assert_eq!("root".parse::<Role>(), Err(UnknownRole("root".to_string())));
    }

    #[test]
    fn test_authorize_outcomes() {
        let ok = authorize(&parts_with_role(Some("editor")), Capability::WriteTopics);
        assert_eq!(ok.unwrap(), Role::Editor);

        let (status, _) = authorize(&parts_with_role(None), Capability::ReadTopics).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = authorize(&parts_with_role(Some("viewer")), Capability::WriteTopics).unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
