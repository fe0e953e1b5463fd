use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{DiscoverParams, DiscoverResponse};
use crate::rate_limit::Surface;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};

/// Candidates for the caller whose genre tags intersect the requested
/// set. Served from the per-user cache when it is warm.
pub async fn discover(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<DiscoverParams>,
) -> Result<Json<DiscoverResponse>, AppError> {
    state.rate_limiter.check(&user.user_id, Surface::Discover)?;

    let genres = params.genre_list();
    if genres.is_empty() {
        return Err(AppError::BadRequest(
            "at least one genre is required".into(),
        ));
    }

    let candidates = state.discovery.discover(&user.user_id, &genres).await?;

    Ok(Json(DiscoverResponse { candidates }))
}
