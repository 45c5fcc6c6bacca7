//! Get user handler

use axum::{
    extract::{Path, State},
    Json,
};
use userdir_types::UserResponse;

use crate::{validation, ApiError, AppState};

/// Get a user by external identifier
///
/// # Path Parameters
/// - `id`: External user identifier (the part after `users:` in the storage
///   key)
///
/// # Response (200 OK)
/// ```json
/// {
///   "id": 1,
///   "name": "alpha"
/// }
/// ```
///
/// # Errors
/// - 400 Bad Request: Malformed identifier
/// - 404 Not Found: No record stored under the identifier
/// - 500 Internal Server Error: Storage operation or record decoding failed
#[tracing::instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    validation::validate_user_id(&id)?;

    let user = state
        .repository
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user with id={} was not found", id)))?;

    tracing::debug!(user_id = user.id, user_name = %user.name, "User retrieved");

    Ok(Json(user.into()))
}
