//! Application state and sub-state extractors.
//!
//! AppState is split into domain sub-states so handlers can extract only what
//! they need via Axum's `FromRef` instead of taking the whole state.

use selleasy_core::Config;
use selleasy_db::ProductRepository;
use selleasy_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Database pool and the repositories built on it.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub products: ProductRepository,
}

/// Media storage backend plus the upload limits the create endpoint enforces.
#[derive(Clone)]
pub struct MediaConfig {
    pub storage: Arc<dyn Storage>,
    pub max_files: usize,
    pub max_file_size: usize,
}

/// Shared application state.
pub struct AppState {
    pub db: DbState,
    pub media: MediaConfig,
    pub config: Config,
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for MediaConfig {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.media.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
