// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase access-token authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie set by the Supabase auth helpers.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// Audience Supabase puts on tokens of signed-in users.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (Supabase user ID)
    pub sub: String,
    /// Audience ("authenticated")
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Middleware that requires a valid Supabase access token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) => token.to_string(),
            None => return Err(AppError::Unauthorized),
        }
    };

    let user_id = verify_token(&token, &state.config.jwt_secret).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        AppError::InvalidToken
    })?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// Validate a token and return its subject.
pub fn verify_token(token: &str, secret: &[u8]) -> anyhow::Result<String> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

    let token_data = decode::<Claims>(token, &key, &validation)?;
    let sub = token_data.claims.sub.trim();
    if sub.is_empty() {
        anyhow::bail!("token has empty subject");
    }
    Ok(sub.to_string())
}

/// Create an access token shaped like Supabase's (tests and local tooling).
pub fn create_jwt(user_id: &str, secret: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        aud: AUTHENTICATED_AUDIENCE.to_string(),
        iat: now,
        exp: now + 60 * 60, // 1 hour, like Supabase
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_jwt_secret_32_bytes_minimum";

    #[test]
    fn test_jwt_roundtrip() {
        let token = create_jwt("0b6f-user", SECRET).unwrap();
        assert_eq!(verify_token(&token, SECRET).unwrap(), "0b6f-user");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_jwt("u1", SECRET).unwrap();
        assert!(verify_token(&token, b"another_secret_entirely_32_bytes").is_err());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let claims = Claims {
            sub: "u1".to_string(),
            aud: "anon".to_string(),
            iat: 1,
            exp: usize::MAX / 2,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(verify_token(&token, SECRET).is_err());
    }
}
