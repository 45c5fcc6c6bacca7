//! List users handler

use axum::{extract::State, Json};
use userdir_types::{ListUsersResponse, UserResponse};

use crate::{ApiError, AppState};

/// List all users
///
/// Enumerates every record in the user namespace. Order follows the store's
/// scan order.
///
/// # Response (200 OK)
/// ```json
/// {
///   "users": [
///     { "id": 1, "name": "alpha" },
///     { "id": 2, "name": "bravo" }
///   ]
/// }
/// ```
///
/// # Errors
/// - 500 Internal Server Error: Storage operation or record decoding failed
#[tracing::instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let users = state.repository.list_all().await?;

    tracing::debug!(count = users.len(), "Listed users");

    let response =
        ListUsersResponse { users: users.into_iter().map(UserResponse::from).collect() };

    Ok(Json(response))
}
