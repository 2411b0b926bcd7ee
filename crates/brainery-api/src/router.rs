//! Route definitions for the Brainery HTTP API.
//!
//! Paths follow the browser client's existing URLs. The router receives
//! `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(auth_routes())
        .merge(account_routes())
        .merge(dashboard_routes())
        .merge(resource_routes())
        .merge(admin_routes())
        .merge(health_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::csrf::require_csrf,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Login, logout, registration, password reset
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/reset_password", post(handlers::auth::reset_password))
        .route("/register", post(handlers::register::register))
        .route("/check_email", post(handlers::register::check_email))
}

/// Current session
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::account::me))
        .route("/notices", get(handlers::account::notices))
}

/// Catalog and saved topics
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/subjects", get(handlers::dashboard::list_subjects))
        .route(
            "/dashboard/topics/{subject_id}",
            get(handlers::dashboard::list_topics),
        )
        .route("/dashboard/save_topic", post(handlers::dashboard::save_topic))
        .route(
            "/dashboard/saved_topics",
            get(handlers::dashboard::list_saved_topics),
        )
        .route("/dashboard/get_topic/{id}", get(handlers::dashboard::get_topic))
        .route(
            "/dashboard/update_topic/{id}",
            put(handlers::dashboard::update_topic),
        )
        .route(
            "/dashboard/delete_topic/{id}",
            delete(handlers::dashboard::delete_topic),
        )
}

/// Personal resources
fn resource_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/resources",
            get(handlers::resource::list_resources).post(handlers::resource::create_resource),
        )
        .route(
            "/resources/{id}",
            get(handlers::resource::get_resource)
                .put(handlers::resource::update_resource)
                .delete(handlers::resource::delete_resource),
        )
}

/// Admin console
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(handlers::admin::overview))
        .route("/admin/promote/{id}", post(handlers::admin::promote))
        .route("/admin/users/{id}", delete(handlers::admin::delete_user))
}

/// Health
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
