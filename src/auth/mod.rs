pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user's id
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Fails when `now + expiry_hours` can't be represented
    pub fn new(user_id: Uuid, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                JwtError::TokenGeneration(format!("token lifetime of {} hours is out of range", expiry_hours))
            })?;

        Ok(Self {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }

    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidSubject(self.sub.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("Invalid token subject: {0}")]
    InvalidSubject(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Sign a session token for `user_id`
pub fn generate_jwt(user_id: Uuid, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let claims = Claims::new(user_id, security.jwt_expiry_hours)?;
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the claims
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn token_round_trips_user_id() {
        let security = AppConfig::development().security;
        let user_id = Uuid::new_v4();

        let token = generate_jwt(user_id, &security).unwrap();
        let claims = validate_jwt(&token, &security).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let security = AppConfig::development().security;
        let mut other = security.clone();
        other.jwt_secret = "another-secret".to_string();

        let token = generate_jwt(Uuid::new_v4(), &other).unwrap();
        assert!(matches!(
            validate_jwt(&token, &security),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let security = AppConfig::development().security;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(security.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_jwt(&token, &security).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let security = AppConfig::production().security;
        assert!(matches!(
            generate_jwt(Uuid::new_v4(), &security),
            Err(JwtError::InvalidSecret)
        ));
    }

    #[test]
    fn huge_expiry_is_an_error_not_a_panic() {
        let mut security = AppConfig::development().security;

        security.jwt_expiry_hours = u64::MAX;
        assert!(matches!(
            generate_jwt(Uuid::new_v4(), &security),
            Err(JwtError::TokenGeneration(_))
        ));

        security.jwt_expiry_hours = 3_000_000_000_000_000;
        assert!(matches!(
            generate_jwt(Uuid::new_v4(), &security),
            Err(JwtError::TokenGeneration(_))
        ));
    }

    #[test]
    fn expiry_is_counted_in_hours() {
        let claims = Claims::new(Uuid::new_v4(), 4).unwrap();
        assert_eq!(claims.exp - claims.iat, 4 * 3600);
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let claims = Claims {
            sub: "admin".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(matches!(claims.user_id(), Err(JwtError::InvalidSubject(_))));
    }
}
