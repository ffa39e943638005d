//! Shared application state

use crate::auth::TokenService;
use crate::config::{AppConfig, AuthConfig};
use crate::store::Store;

/// Everything the handlers need, shared behind an `Arc`
pub struct AppState {
    pub store: Store,
    pub tokens: TokenService,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(store: Store, config: &AppConfig) -> Self {
        Self {
            store,
            tokens: TokenService::new(&config.auth),
            auth: config.auth.clone(),
        }
    }
}
