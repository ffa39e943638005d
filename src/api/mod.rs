//! HTTP layer
//!
//! Routing, authentication middleware, and request/response mapping around
//! the ledger store. Registration, login, and token renewal are public;
//! account and transfer endpoints require a bearer access token.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/users", post(handlers::user::create_user))
        .route("/login", post(handlers::user::login))
        .route("/tokens/renew", post(handlers::user::renew_access_token));

    let protected = Router::new()
        .route(
            "/accounts",
            post(handlers::account::create_account).get(handlers::account::list_accounts),
        )
        .route("/accounts/{id}", get(handlers::account::get_account))
        .route("/transfers", post(handlers::transfer::create_transfer))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::bearer_auth,
        ));

    let api = Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state);

    Router::new().merge(api).merge(
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
    )
}
