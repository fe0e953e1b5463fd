use crate::handlers::{decision, discovery, messages, profile, ws};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/discover", get(discovery::discover))
        .route("/swipes/interest", put(decision::record_interest))
        .route("/swipes/reject", put(decision::record_rejection))
        .route(
            "/users/{id}",
            get(profile::get_user).delete(profile::delete_user),
        )
        .route("/users/{id}/matches", get(profile::get_matches))
        .route("/notifications/clear", put(profile::clear_notification))
        .route(
            "/messages",
            get(messages::get_conversation).post(messages::send_message),
        )
        .route("/ws", get(ws::ws_handler));

    Router::new()
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
