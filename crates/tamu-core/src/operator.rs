// Operator (admin user) domain types
//
// Operators exist only to authenticate the admin surface; the password hash
// never leaves the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::is_valid_email;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Operator role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum OperatorRole {
    Admin,
    Superadmin,
}

impl std::fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorRole::Admin => write!(f, "admin"),
            OperatorRole::Superadmin => write!(f, "superadmin"),
        }
    }
}

impl From<&str> for OperatorRole {
    fn from(s: &str) -> Self {
        match s {
            "superadmin" => OperatorRole::Superadmin,
            _ => OperatorRole::Admin,
        }
    }
}

/// An operator account, as exposed over the API (no credentials).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Operator {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: OperatorRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_email(&self.email) {
            return Err(ValidationError::new("email", "must be a valid address"));
        }
        if self.password.len() < 6 {
            return Err(ValidationError::new(
                "password",
                "must be at least 6 characters",
            ));
        }
        Ok(())
    }
}

/// Request to create a new operator (superadmin only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<OperatorRole>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_len = self.name.trim().len();
        if !(2..=255).contains(&name_len) {
            return Err(ValidationError::new(
                "name",
                "must be between 2 and 255 characters",
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::new("email", "must be a valid address"));
        }
        if self.password.len() < 6 {
            return Err(ValidationError::new(
                "password",
                "must be at least 6 characters",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_rejects_short_password() {
        let req = LoginRequest {
            email: "admin@kampus.ac.id".into(),
            password: "12345".into(),
        };
        assert_eq!(req.validate().unwrap_err().field, "password");
    }

    #[test]
    fn role_defaults_to_admin() {
        assert_eq!(OperatorRole::from("nonsense"), OperatorRole::Admin);
        assert_eq!(OperatorRole::from("superadmin"), OperatorRole::Superadmin);
    }
}
