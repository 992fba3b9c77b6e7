use crate::config::AppConfig;
use crate::shared::utils::DbPool;

/// Shared per-process state handed to every handler. The pool is opened
/// once in `main` and cloned cheaply; nothing else is mutable.
#[derive(Clone)]
pub struct AppState {
    pub conn: DbPool,
    pub config: AppConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("conn", &"DbPool")
            .field("config", &self.config)
            .finish()
    }
}
