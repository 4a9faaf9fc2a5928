//! Admin gate for the populate actions
//!
//! Requests arrive through an authenticating front proxy that names the
//! signed-in user in the `x-forwarded-user` header. The populate actions
//! additionally require that user to be a registered admin with a complete
//! profile.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::state::AppContext;

/// Header the front proxy fills with the signed-in username
pub const FORWARDED_USER_HEADER: &str = "x-forwarded-user";

/// Admin middleware - gates the /admin/* routes
/// Use with axum::middleware::from_fn_with_state
pub async fn require_admin(
    State(ctx): State<AppContext>,
    request: Request,
    next: Next,
) -> Response {
    // A missing or empty header means nobody is signed in. Lookups use
    // the lowercased form the users table stores.
    let username = match request
        .headers()
        .get(FORWARDED_USER_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(username) if !username.is_empty() => username.to_lowercase(),
        _ => {
            warn!("Rejected admin request without a forwarded user");
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "Authentication required",
                    "code": "UNAUTHORIZED"
                })),
            )
                .into_response();
        }
    };

    match ctx.db.users().find_by_username(&username).await {
        Ok(Some(user)) if user.is_admin() && user.has_complete_profile() => next.run(request).await,
        Ok(Some(_)) => {
            warn!(username = %username, "Rejected user without admin role and complete profile");
            (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({
                    "error": "Admin with a complete profile required",
                    "code": "FORBIDDEN"
                })),
            )
                .into_response()
        }
        Ok(None) => {
            warn!(username = %username, "Rejected unknown user");
            (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({
                    "error": "Unknown user",
                    "code": "FORBIDDEN"
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "User lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "User lookup failed",
                    "code": "INTERNAL"
                })),
            )
                .into_response()
        }
    }
}
