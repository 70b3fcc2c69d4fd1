use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    crypto, decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{config::JwtConfig, error::AppError, state::AppState};

/// JWT payload. `sub` carries the user's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            // A foreign issuer or audience means the token was not minted here.
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// Signing and verification keys built once from [`JwtConfig`].
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64) * 60),
        }
    }

    pub fn issue(&self, email: &str) -> Result<String, AppError> {
        self.issue_at(email, OffsetDateTime::now_utc())
    }

    pub(crate) fn issue_at(&self, email: &str, now: OffsetDateTime) -> Result<String, AppError> {
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: email.to_string(),
            iat: now.unix_timestamp().max(0) as usize,
            exp: exp.unix_timestamp().max(0) as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Token(e.to_string()))?;
        debug!(email = %email, "jwt signed");
        Ok(token)
    }

    /// Returns the subject email of a valid, unexpired token.
    ///
    /// Anything that is not three non-empty dot-separated segments is
    /// `Malformed`. Otherwise the HMAC over `header.payload` is checked
    /// before either segment is decoded, so any altered byte is reported
    /// as `InvalidSignature`.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(TokenError::Malformed);
        }
        let (message, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
        let signed =
            crypto::verify(signature, message.as_bytes(), &self.decoding, Algorithm::HS256)
                .map_err(|_| TokenError::InvalidSignature)?;
        if !signed {
            return Err(TokenError::InvalidSignature);
        }

        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        // Valid only while now < exp.
        let now = OffsetDateTime::now_utc().unix_timestamp().max(0) as usize;
        if now >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        debug!(email = %data.claims.sub, "jwt verified");
        Ok(data.claims.sub)
    }
}
