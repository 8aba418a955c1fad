use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let bookings = Router::new()
        .route(
            "/",
            post(handlers::bookings::create_booking).get(handlers::bookings::list_bookings),
        )
        .route(
            "/:id",
            get(handlers::bookings::get_booking).delete(handlers::bookings::delete_booking),
        );

    Router::new()
        .route("/", get(handlers::health::health))
        .nest("/bookings", bookings)
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
