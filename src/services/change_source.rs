use async_trait::async_trait;

use crate::domain::change::ChangeSet;
use crate::domain::path::ExclusionConfig;
use crate::error::AppResult;

/// A version-control backend able to report the net changes of a project.
#[async_trait]
pub trait ChangeSource: Send + Sync {
    fn project_name(&self) -> &str;
    fn exclusions(&self) -> &ExclusionConfig;
    async fn query(&self, start_revision: i64) -> AppResult<ChangeSet>;
}
