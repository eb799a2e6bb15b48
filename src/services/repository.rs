use async_trait::async_trait;

use crate::domain::log::LogEntry;
use crate::domain::project::{Credentials, RepositoryLocation};
use crate::domain::revision::RevisionRange;
use crate::error::AppResult;

#[async_trait]
pub trait RepositoryConnector: Send + Sync {
    async fn connect(
        &self,
        location: &RepositoryLocation,
        credentials: &Credentials,
    ) -> AppResult<Box<dyn RepositorySession>>;
}

/// An authenticated handle on one repository location.
#[async_trait]
pub trait RepositorySession: Send + Sync {
    async fn latest_revision(&self) -> AppResult<u64>;

    /// Repository path of the connected location, e.g. `/web/trunk`.
    fn project_root(&self) -> &str;

    /// Entries in ascending revision order, changed paths included.
    async fn log_entries(&self, range: RevisionRange) -> AppResult<Vec<LogEntry>>;
}
