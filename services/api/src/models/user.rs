//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User role, parsed once at the boundary and stored as its canonical string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Owner,
    Tenant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Tenant => "Tenant",
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
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "tenant" => Ok(Role::Tenant),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// User entity
///
/// Deliberately not serializable: responses go through [`UserResponse`] or
/// [`ProfileResponse`] so the password hash can never reach the wire.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub experience: Option<i32>,
    pub organization: Option<String>,
    pub about_org: Option<String>,
    pub skills: Option<String>,
    pub portfolio_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload (password still in the clear; hashed by the
/// repository on insert)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Registration request body
///
/// Every field is optional at the serde level so presence failures surface
/// as the documented validation error rather than a body-rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub role: Option<String>,
}

/// Login request body; either identifier works
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Profile update request body
///
/// email/password/role are declared only so a request carrying them can be
/// rejected explicitly; they are never written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub experience: Option<i32>,
    pub organization: Option<String>,
    pub about_org: Option<String>,
    pub skills: Option<String>,
    pub portfolio_url: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UpdateProfileRequest {
    /// True when the request carries a field that is not allowed to change.
    pub fn has_immutable_fields(&self) -> bool {
        self.email.is_some() || self.password.is_some() || self.role.is_some()
    }
}

/// Allow-listed profile fields actually applied by the repository
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub experience: Option<i32>,
    pub organization: Option<String>,
    pub about_org: Option<String>,
    pub skills: Option<String>,
    pub portfolio_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.city.is_none()
            && self.experience.is_none()
            && self.organization.is_none()
            && self.about_org.is_none()
            && self.skills.is_none()
            && self.portfolio_url.is_none()
    }
}

/// Public user fields returned by registration and login
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Full profile returned by `/me` and profile updates
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub experience: Option<i32>,
    pub organization: Option<String>,
    pub about_org: Option<String>,
    pub skills: Option<String>,
    pub portfolio_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            role: user.role,
            age: user.age,
            gender: user.gender,
            city: user.city,
            experience: user.experience,
            organization: user.organization,
            about_org: user.about_org,
            skills: user.skills,
            portfolio_url: user.portfolio_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("owner".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!("OWNER".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!(" Tenant ".parse::<Role>().unwrap(), Role::Tenant);
        assert!("landlord".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_canonically() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"Owner\"");
        assert_eq!(serde_json::to_string(&Role::Tenant).unwrap(), "\"Tenant\"");
    }

    #[test]
    fn profile_update_empty_detection() {
        let update = ProfileUpdate::default();
        assert!(update.is_empty());

        let update = ProfileUpdate {
            city: Some("Pune".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
