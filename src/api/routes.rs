use crate::api::handlers::{auth, chirps, healthz};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Request bodies are tiny JSON documents.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Routes under `/api`, before state is attached.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/healthz", get(healthz))
        .route("/users", post(auth::register))
        .route("/login", post(auth::login))
        // Refresh and revoke carry a refresh token, checked by the session service
        .route("/refresh", post(auth::refresh))
        .route("/revoke", post(auth::revoke))
        .route("/chirps", get(chirps::list_chirps))
        .route("/chirps/{chirp_id}", get(chirps::get_chirp));

    let protected_routes = Router::new()
        // Protected routes (access token required)
        .route("/chirps", post(chirps::create_chirp))
        .route("/chirps/{chirp_id}", delete(chirps::delete_chirp))
        .layer(middleware::from_fn_with_state(
            state,
            crate::auth::middleware::auth_middleware,
        ));

    public_routes.merge(protected_routes)
}

/// The complete application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
