//! JWT access and refresh tokens
//!
//! Both token kinds are HS256 JWTs with the same claim set; they differ only
//! in lifetime. The token id (`jti`) of a refresh token doubles as the
//! session row's primary key.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;
use crate::config::AuthConfig;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Username the token was issued to
    pub sub: String,
    /// Token id; for refresh tokens this is also the session id
    pub jti: String,
    pub iss: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn token_id(&self) -> Result<Uuid, AuthError> {
        self.jti.parse().map_err(|_| AuthError::InvalidToken)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp as i64, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Issues and verifies HS256 tokens for one secret + issuer pair
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    issuer: String,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            issuer: config.issuer.clone(),
        }
    }

    /// Create a token for `username` valid for `ttl_secs` seconds
    pub fn create_token(&self, username: &str, ttl_secs: i64) -> Result<(String, Claims), AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp() as usize,
            exp: (now.timestamp() + ttl_secs) as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok((token, claims))
    }

    /// Verify signature, expiry, and issuer
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AuthError::InvalidToken)?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new(&AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            issuer: "minibank-test".to_string(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 86400,
        })
    }

    #[test]
    fn test_create_and_verify_roundtrip() {
        let service = test_service();
        let (token, claims) = service.create_token("alice", 900).unwrap();

        let verified = service.verify_token(&token).unwrap();
        assert_eq!(verified.sub, "alice");
        assert_eq!(verified.jti, claims.jti);
        assert_eq!(verified.iss, "minibank-test");
        assert!(verified.exp > verified.iat);
    }

    #[test]
    fn test_token_id_is_uuid() {
        let service = test_service();
        let (_, claims) = service.create_token("alice", 900).unwrap();
        claims.token_id().unwrap();
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = test_service();
        // Past expiry beyond the default validation leeway
        let (token, _) = service.create_token("alice", -120).unwrap();
        let err = service.verify_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = test_service();
        let (token, _) = service.create_token("alice", 900).unwrap();

        let other = TokenService::new(&AuthConfig {
            jwt_secret: "different-secret".to_string(),
            issuer: "minibank-test".to_string(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 86400,
        });
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let service = test_service();
        let (token, _) = service.create_token("alice", 900).unwrap();

        let other = TokenService::new(&AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            issuer: "someone-else".to_string(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 86400,
        });
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_expires_at_matches_ttl() {
        let service = test_service();
        let before = Utc::now().timestamp();
        let (_, claims) = service.create_token("alice", 900).unwrap();
        let exp = claims.expires_at().timestamp();
        assert!(exp >= before + 900 && exp <= before + 902);
    }
}
