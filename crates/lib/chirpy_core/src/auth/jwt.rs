//! JWT access token generation and verification.
//!
//! Access tokens are HS256-signed, not encrypted: the claims are readable by
//! anyone holding the token, only forgery is prevented. There is no revocation
//! list; a token stays valid until its embedded expiry.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Access token lifetime: 1 hour.
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 60 * 60;

/// Current claim layout. Tokens carrying any other version are rejected.
pub const CLAIMS_VERSION: u32 = 1;

/// The only accepted signing algorithm. Never taken from the token header.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Default access token lifetime as a `Duration`.
pub fn access_token_ttl() -> Duration {
    Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS)
}

/// Generate a signed access token for `user_id`, valid for `ttl`.
pub fn issue_access_token(
    user_id: Uuid,
    secret: &[u8],
    ttl: Duration,
) -> Result<String, AuthError> {
    issue_access_token_at(user_id, secret, ttl, Utc::now())
}

/// Generate a signed access token as if issued at `now`.
pub fn issue_access_token_at(
    user_id: Uuid,
    secret: &[u8],
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Internal("empty JWT secret".into()));
    }
    let exp = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::Internal("ttl out of range".into()))?;
    let claims = TokenClaims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
        ver: CLAIMS_VERSION,
    };
    encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
}

/// Verify an access token, returning the embedded user ID.
pub fn verify_access_token(token: &str, secret: &[u8]) -> Result<Uuid, AuthError> {
    verify_access_token_at(token, secret, Utc::now())
}

/// Verify an access token against the instant `now`.
///
/// Signature first, then claim shape, then expiry. Expiry has one-second
/// granularity: `exp` is a whole unix second and the token is rejected once
/// `now` is past it, with no leeway.
pub fn verify_access_token_at(
    token: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(ALGORITHM);
    // Expiry is checked below against `now` rather than the wall clock.
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(map_jwt_error)?
        .claims;

    if claims.ver != CLAIMS_VERSION {
        return Err(AuthError::Malformed(format!(
            "unsupported claims version {}",
            claims.ver
        )));
    }
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AuthError::Malformed("subject is not a user id".into()))?;

    if now.timestamp() > claims.exp {
        return Err(AuthError::Expired);
    }
    Ok(user_id)
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AuthError {
    match e.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Malformed(e.to_string()),
    }
}

/// Resolve the JWT secret: env var `JWT_SECRET` → `SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    let path = jwt_secret_path();
    match load_or_create_secret(&path) {
        Ok(secret) => secret,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not persist JWT secret, using an ephemeral one");
            generate_secret()
        }
    }
}

/// Read the secret stored at `path`, generating and persisting one if the
/// file is missing or empty.
pub fn load_or_create_secret(path: &Path) -> std::io::Result<String> {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }
    let secret = generate_secret();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &secret)?;
    info!(path = %path.display(), "generated new JWT secret");
    Ok(secret)
}

fn generate_secret() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chirpy")
        .join("jwt-secret")
}
