//! Authentication and ownership checks.
//!
//! Reads are open, creation needs an identity, mutation of an existing
//! resource needs an identity that owns it.

use tracing::debug;
use uuid::Uuid;

use super::AuthError;
use super::bearer::extract_bearer;
use super::jwt::verify_access_token;
use super::store::OwnershipLookup;

/// Resolve the user behind an `Authorization` header value.
///
/// Any failure, in extraction or verification, becomes `Unauthenticated`
/// carrying the underlying reason.
pub fn authenticate(header: Option<&str>, secret: &[u8]) -> Result<Uuid, AuthError> {
    extract_bearer(header)
        .and_then(|token| verify_access_token(token, secret))
        .map_err(|e| {
            debug!(reason = %e, "authentication failed");
            AuthError::Unauthenticated(e.to_string())
        })
}

/// Allow only when the authenticated user owns the resource.
pub fn authorize_ownership(user_id: Uuid, owner_id: Uuid) -> Result<(), AuthError> {
    if user_id == owner_id {
        Ok(())
    } else {
        Err(AuthError::Forbidden("resource does not belong to user".into()))
    }
}

/// Look up the owner of `resource_id` and require it to be `user_id`.
pub async fn authorize_mutation<L>(
    lookup: &L,
    user_id: Uuid,
    resource_id: Uuid,
) -> Result<(), AuthError>
where
    L: OwnershipLookup + ?Sized,
{
    let owner = lookup.owner_of(resource_id).await?;
    authorize_ownership(user_id, owner)
}

/// Check the privileged API key presented in an `Authorization` header.
///
/// Plain equality against the configured key; user access tokens are never
/// accepted here. An empty configured key rejects every request.
pub fn verify_api_key(header: Option<&str>, configured: &str) -> Result<(), AuthError> {
    let presented = extract_bearer(header).map_err(|e| AuthError::Unauthenticated(e.to_string()))?;
    if configured.is_empty() || presented != configured {
        return Err(AuthError::Unauthenticated("invalid API key".into()));
    }
    Ok(())
}
