//! Identity resolution and document visibility.

use crate::database::models::{Document, User};
use crate::database::Database;
use crate::session::SessionCache;

/// Resolve an opaque session token to its user.
///
/// Returns `None` for a missing or expired token, and also when the cached
/// user id no longer has a backing row (the account may have been removed
/// since the session was issued); that race is handled here rather than
/// surfaced as an error.
pub async fn resolve_user(
    token: Option<&str>,
    sessions: &SessionCache,
    db: &Database,
) -> Result<Option<User>, sqlx::Error> {
    let Some(token) = token else {
        return Ok(None);
    };
    let Some(user_id) = sessions.get(token) else {
        return Ok(None);
    };
    User::find(user_id, db).await
}

/// Whether `requester` may view `document`.
///
/// Public documents are visible to everyone, private ones only to their
/// owner. Callers must report a `false` here exactly like a missing
/// document, so private documents don't leak their existence.
pub fn can_view(document: &Document, requester: Option<&User>) -> bool {
    document.is_public
        || requester
            .map(|user| user.id == document.user_id)
            .unwrap_or(false)
}
