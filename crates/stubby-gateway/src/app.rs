use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_link_handler, delete_link_handler, health_handler, list_links_handler,
    redirect_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the gateway router.
    ///
    /// `/health` is matched before `/{code}`, so a link registered under the
    /// code `health` cannot be reached through the redirect route.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/v1/links",
                post(create_link_handler).get(list_links_handler),
            )
            .route("/v1/links/{code}", delete(delete_link_handler))
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
