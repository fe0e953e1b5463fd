use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{DecisionRequest, InterestResponse};
use crate::rate_limit::Surface;
use crate::state::AppState;
use axum::http::StatusCode;
use axum::{Json, extract::State};

fn validate(user: &AuthenticatedUser, payload: &DecisionRequest) -> Result<(), AppError> {
    if user.user_id != payload.user_id {
        return Err(AppError::Unauthorized(
            "Cannot record a decision for another user".into(),
        ));
    }
    if payload.user_id == payload.target_id {
        return Err(AppError::BadRequest("Cannot decide on yourself".into()));
    }
    Ok(())
}

/// Record a right-swipe. Responds with whether it completed a match.
pub async fn record_interest(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<InterestResponse>, AppError> {
    state.rate_limiter.check(&user.user_id, Surface::Decision)?;
    validate(&user, &payload)?;

    let matched = state
        .swipes
        .record_interest(&payload.user_id, &payload.target_id)
        .await?;

    Ok(Json(InterestResponse { matched }))
}

/// Record a left-swipe.
pub async fn record_rejection(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<DecisionRequest>,
) -> Result<StatusCode, AppError> {
    state.rate_limiter.check(&user.user_id, Surface::Decision)?;
    validate(&user, &payload)?;

    state
        .swipes
        .record_rejection(&payload.user_id, &payload.target_id)
        .await?;

    Ok(StatusCode::OK)
}
