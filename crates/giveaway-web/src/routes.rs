//! Route definitions.

use crate::handlers;
use crate::session;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Create the application router. Static paths win over the `/{token}`
/// catch-all, so the admin routes are never shadowed.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home_page).post(handlers::register))
        .route("/admin", get(handlers::admin_login_page).post(handlers::admin_login))
        .route("/dashboard", get(handlers::dashboard))
        .route("/delete_user/{id}", post(handlers::delete_registrant))
        .route("/clear_database", post(handlers::clear_database))
        .route("/logout", post(handlers::logout))
        .route("/{token}", get(handlers::follow_link))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_middleware,
        ))
        // Registered after the session layer so probes don't mint sessions.
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
