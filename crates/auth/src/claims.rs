use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::{DomainError, UserId};

/// Token claims model (transport-agnostic).
///
/// `role` stays a raw string here: it is only trusted after
/// [`crate::Principal::from_claims`] has checked it against the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id of the caller.
    pub sub: UserId,

    /// Username at the time the token was issued.
    pub name: String,

    pub role: String,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<TokenValidationError> for DomainError {
    fn from(err: TokenValidationError) -> Self {
        DomainError::bad_request(err.to_string())
    }
}

/// Check the claim time window against `now`.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

/// Turns a bearer token into validated claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError>;
}

/// HMAC-SHA256 token verification with a shared secret.
///
/// Only verifies; issuing tokens is someone else's job.
#[derive(Clone)]
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry lives in `expires_at`, checked by `validate_claims`.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256JwtValidator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256JwtValidator").finish_non_exhaustive()
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";

    fn claims_at(now: DateTime<Utc>) -> Claims {
        Claims {
            sub: UserId::new(3),
            name: "alex".to_string(),
            role: "customer".to_string(),
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::minutes(10),
        }
    }

    fn mint(claims: &Claims, secret: &[u8]) -> String {
        jsonwebtoken::encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn time_window_checks() {
        let now = Utc::now();
        let ok = claims_at(now);
        assert!(validate_claims(&ok, now).is_ok());

        let expired = Claims {
            expires_at: now,
            ..ok.clone()
        };
        assert_eq!(validate_claims(&expired, now), Err(TokenValidationError::Expired));

        let future = Claims {
            issued_at: now + Duration::minutes(1),
            ..ok.clone()
        };
        assert_eq!(validate_claims(&future, now), Err(TokenValidationError::NotYetValid));

        let inverted = Claims {
            expires_at: ok.issued_at,
            ..ok
        };
        assert_eq!(
            validate_claims(&inverted, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn hs256_accepts_signed_token() {
        let now = Utc::now();
        let claims = claims_at(now);
        let token = mint(&claims, SECRET);

        let decoded = Hs256JwtValidator::new(SECRET).validate(&token, now).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn hs256_rejects_wrong_secret_and_garbage() {
        let now = Utc::now();
        let token = mint(&claims_at(now), b"other-secret");
        let validator = Hs256JwtValidator::new(SECRET);

        assert!(matches!(
            validator.validate(&token, now),
            Err(TokenValidationError::Malformed(_))
        ));
        assert!(matches!(
            validator.validate("not.a.token", now),
            Err(TokenValidationError::Malformed(_))
        ));
    }

    #[test]
    fn hs256_rejects_expired_token() {
        let now = Utc::now();
        let token = mint(&claims_at(now), SECRET);
        let later = now + Duration::hours(1);
        assert_eq!(
            Hs256JwtValidator::new(SECRET).validate(&token, later),
            Err(TokenValidationError::Expired)
        );
    }
}
