// Bearer-token extractor for protected routes

use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use tamu_core::OperatorRole;

use crate::auth::jwt::{Claims, JwtService};
use crate::error::ApiError;

/// The authenticated operator, extracted from the Authorization header.
///
/// Add as a handler argument to require auth; call `require_superadmin` for
/// role-gated routes.
pub struct AuthOperator(pub Claims);

impl AuthOperator {
    pub fn require_superadmin(&self) -> Result<(), ApiError> {
        if self.0.role != OperatorRole::Superadmin {
            return Err(ApiError::Forbidden(
                "only a superadmin may perform this action".to_string(),
            ));
        }
        Ok(())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthOperator {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jwt = parts
            .extensions
            .get::<Arc<JwtService>>()
            .ok_or_else(|| ApiError::Internal(anyhow!("jwt service extension missing")))?
            .clone();

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let claims = jwt.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            ApiError::Unauthorized
        })?;

        Ok(AuthOperator(claims))
    }
}
