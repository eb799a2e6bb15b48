use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{Diagnostics, RepositoryConnector};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub connector: Arc<dyn RepositoryConnector>,
    pub diagnostics: Arc<dyn Diagnostics>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        connector: Arc<dyn RepositoryConnector>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            config,
            connector,
            diagnostics,
        }
    }
}
