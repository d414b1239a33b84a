//! Role-based request guards.
//!
//! Callers identify themselves with the `x-role` and `x-actor` headers
//! (the gateway in front of this service authenticates and injects them).
//! Handlers declare which roles may call them via [`Caller::require`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::fmt;
use std::str::FromStr;

use super::error::AppError;

/// Caller role, from least to most privileged.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    Learner,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "learner" => Ok(Role::Learner),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Authenticated caller extracted from request headers.
#[derive(Debug, Clone)]
pub struct Caller {
    pub role: Role,
    /// Actor recorded in audit metadata. Defaults to the role name when the
    /// gateway does not forward a user identifier.
    pub actor: String,
}

impl Caller {
    /// Reject the request unless the caller holds one of `allowed`.
    pub fn require(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            return Ok(());
        }
        let wanted: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
        Err(AppError::Forbidden(format!(
            "Role '{}' may not call this endpoint (requires one of: {})",
            self.role,
            wanted.join(", ")
        )))
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role_header = parts
            .headers
            .get("x-role")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::BadRequest("Missing x-role header".to_string()))?;

        let role = role_header
            .parse::<Role>()
            .map_err(AppError::BadRequest)?;

        let actor = parts
            .headers
            .get("x-actor")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.to_string())
            .unwrap_or_else(|| role.as_str().to_string());

        Ok(Caller { role, actor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Instructor".parse::<Role>().unwrap(), Role::Instructor);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_require() {
        let caller = Caller {
            role: Role::Learner,
            actor: "learner-1".to_string(),
        };
        assert!(caller.require(&[Role::Learner, Role::Admin]).is_ok());
        assert!(caller.require(&[Role::Instructor]).is_err());
    }
}
