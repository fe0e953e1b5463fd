use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{ClearNotificationRequest, MatchedProfilesResponse};
use crate::state::AppState;
use axum::http::StatusCode;
use axum::{
    Json,
    extract::{Path, State},
};
use match_engine::store::StoreError;
use tracing::warn;
use types::ids::UserId;
use types::profile::UserProfile;

/// Point profile lookup.
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<UserId>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.profiles.fetch(&id).await?;
    Ok(Json(profile))
}

/// The full profiles of everyone the user has matched with.
pub async fn get_matches(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<UserId>,
) -> Result<Json<MatchedProfilesResponse>, AppError> {
    if user.user_id != id {
        return Err(AppError::Unauthorized(
            "Cannot list another user's matches".into(),
        ));
    }

    let profile = state.profiles.fetch(&id).await?;
    let matches = state.profiles.fetch_many(&profile.matches).await?;

    Ok(Json(MatchedProfilesResponse { matches }))
}

/// Drop one sender's unseen-message marker (read receipt).
pub async fn clear_notification(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ClearNotificationRequest>,
) -> Result<StatusCode, AppError> {
    if user.user_id != payload.user_id {
        return Err(AppError::Unauthorized(
            "Cannot clear another user's notifications".into(),
        ));
    }

    state
        .profiles
        .remove_pending_notification(&payload.user_id, &payload.sender_id)
        .await?;

    Ok(StatusCode::OK)
}

/// Delete an account and scrub it from every matched peer.
///
/// One record at a time: conversations both ways, then the peer's
/// `matches` and `pending_notifications` entries, then the profile
/// itself. A peer that vanished mid-walk is skipped, any other store
/// failure aborts and surfaces.
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    if user.user_id != id {
        return Err(AppError::Unauthorized(
            "Cannot delete another user's account".into(),
        ));
    }

    let profile = state.profiles.fetch(&id).await?;

    for peer in &profile.matches {
        state.messages.purge_conversation(&id, peer).await?;
        state.messages.purge_conversation(peer, &id).await?;

        match state.profiles.remove_match(peer, &id).await {
            Ok(()) => {
                state.profiles.remove_pending_notification(peer, &id).await?;
            }
            Err(StoreError::NotFound(_)) => {
                warn!(%peer, "matched peer already gone during account deletion");
            }
            Err(err) => return Err(err.into()),
        }
    }

    state.profiles.delete_profile(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
