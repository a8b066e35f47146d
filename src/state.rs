// src/state.rs

use axum::extract::FromRef;

use crate::{backend::BackendClient, config::Config, grade_import::ImportLocks, utils::session::SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    pub sessions: SessionStore,
    pub imports: ImportLocks,
}

impl AppState {
    /// State with an empty session store.
    pub fn new(config: Config, backend: BackendClient) -> Self {
        Self {
            config,
            backend,
            sessions: SessionStore::default(),
            imports: ImportLocks::default(),
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for BackendClient {
    fn from_ref(state: &AppState) -> Self {
        state.backend.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for ImportLocks {
    fn from_ref(state: &AppState) -> Self {
        state.imports.clone()
    }
}
