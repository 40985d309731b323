// JWT issuing and verification (HS256)

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use tamu_core::{Operator, OperatorRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Operator id
    pub sub: i64,
    pub email: String,
    pub role: OperatorRole,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    pub fn issue(&self, operator: &Operator) -> Result<String> {
        let claims = Claims {
            sub: operator.id,
            email: operator.email.clone(),
            role: operator.role,
            exp: (Utc::now() + Duration::hours(self.expiry_hours)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).context("encode jwt")
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .context("verify jwt")?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator() -> Operator {
        Operator {
            id: 1,
            name: "Admin".into(),
            email: "admin@kampus.ac.id".into(),
            role: OperatorRole::Superadmin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let jwt = JwtService::new("test-secret", 24);
        let token = jwt.issue(&operator()).unwrap();
        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.email, "admin@kampus.ac.id");
        assert_eq!(claims.role, OperatorRole::Superadmin);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = JwtService::new("secret-a", 24).issue(&operator()).unwrap();
        assert!(JwtService::new("secret-b", 24).verify(&token).is_err());
    }
}
