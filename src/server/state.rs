//! Shared application state injected into every Axum handler.

use crate::app::App;
use crate::config::Config;
use std::sync::Arc;

pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no provider credential is configured.
    pub app: Option<Arc<App>>,
}

impl AppState {
    pub fn new(config: Arc<Config>, app: Option<App>) -> Self {
        Self {
            config,
            app: app.map(Arc::new),
        }
    }
}
