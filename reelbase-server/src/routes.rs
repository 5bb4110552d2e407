use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{cast_members, categories, genres, videos};
use crate::state::AppState;

async fn health() -> axum::Json<Value> {
    axum::Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    // Video uploads carry the main file; the per-slot caps in the writer
    // are the real limit, not the framework default.
    let video_routes = Router::new()
        .route("/videos", get(videos::index).post(videos::store))
        .route(
            "/videos/{id}",
            get(videos::show).put(videos::update).delete(videos::destroy),
        )
        .route("/videos/{id}/restore", post(videos::restore))
        .layer(DefaultBodyLimit::disable());

    Router::new()
        .route("/health", get(health))
        .route(
            "/categories",
            get(categories::index).post(categories::store),
        )
        .route(
            "/categories/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::destroy),
        )
        .route("/categories/{id}/restore", post(categories::restore))
        .route("/genres", get(genres::index).post(genres::store))
        .route(
            "/genres/{id}",
            get(genres::show).put(genres::update).delete(genres::destroy),
        )
        .route("/genres/{id}/restore", post(genres::restore))
        .route(
            "/cast-members",
            get(cast_members::index).post(cast_members::store),
        )
        .route(
            "/cast-members/{id}",
            get(cast_members::show)
                .put(cast_members::update)
                .delete(cast_members::destroy),
        )
        .route("/cast-members/{id}/restore", post(cast_members::restore))
        .merge(video_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
