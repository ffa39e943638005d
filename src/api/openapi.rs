//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `/docs`
//! - OpenAPI JSON: `/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::error::ErrorResponse;
use super::handlers::account::{CreateAccountRequest, ListAccountsQuery};
use super::handlers::transfer::TransferRequest;
use super::handlers::user::{
    CreateUserRequest, LoginRequest, LoginResponse, RenewAccessTokenRequest,
    RenewAccessTokenResponse, UserInfoResponse,
};
use crate::store::models::{Account, Entry, Transfer};
use crate::store::TransferTxResult;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "minibank API",
        version = "1.0.0",
        description = "A small banking backend: users, accounts, and atomic double-entry transfers.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::api::handlers::user::create_user,
        crate::api::handlers::user::login,
        crate::api::handlers::user::renew_access_token,
        crate::api::handlers::account::create_account,
        crate::api::handlers::account::get_account,
        crate::api::handlers::account::list_accounts,
        crate::api::handlers::transfer::create_transfer,
    ),
    components(schemas(
        Account,
        Entry,
        Transfer,
        TransferTxResult,
        TransferRequest,
        CreateAccountRequest,
        ListAccountsQuery,
        CreateUserRequest,
        UserInfoResponse,
        LoginRequest,
        LoginResponse,
        RenewAccessTokenRequest,
        RenewAccessTokenResponse,
        ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Registration, login, token renewal"),
        (name = "accounts", description = "Account management"),
        (name = "transfers", description = "Funds movement"),
    )
)]
pub struct ApiDoc;
