//! Password hashing via bcrypt.

use super::AuthError;

/// bcrypt cost factor. Fixed; callers cannot lower it.
const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt (cost 10, random salt).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::HashingFailure(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
///
/// Returns [`AuthError::CredentialMismatch`] when the password does not match
/// and [`AuthError::HashingFailure`] when `hash` is not a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    match bcrypt::verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::CredentialMismatch),
        Err(e) => Err(AuthError::HashingFailure(format!("bcrypt verify: {e}"))),
    }
}
