use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{ConversationParams, ConversationResponse, SendMessageRequest};
use crate::rate_limit::Surface;
use crate::state::AppState;
use axum::http::StatusCode;
use axum::{
    Json,
    extract::{Query, State},
};
use types::message::Message;

/// One direction of a conversation, oldest first.
pub async fn get_conversation(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<ConversationParams>,
) -> Result<Json<ConversationResponse>, AppError> {
    state.rate_limiter.check(&user.user_id, Surface::Messages)?;
    if user.user_id != params.user_id {
        return Err(AppError::Unauthorized(
            "Cannot read another user's conversation".into(),
        ));
    }

    let messages = state
        .messages
        .conversation(&params.user_id, &params.other_id)
        .await?;

    Ok(Json(ConversationResponse { messages }))
}

/// Persist one message. Durability only — live routing happens on the
/// WebSocket path and neither waits for the other.
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    state.rate_limiter.check(&user.user_id, Surface::Messages)?;
    if user.user_id != payload.sender {
        return Err(AppError::Unauthorized(
            "Cannot send a message as another user".into(),
        ));
    }

    let message = Message::new(
        payload.sender,
        payload.recipient,
        payload.body,
        chrono::Utc::now().timestamp_millis(),
    );
    state.messages.append(&message).await?;

    Ok((StatusCode::CREATED, Json(message)))
}
