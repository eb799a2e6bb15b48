use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::change::ChangeSet;
use crate::domain::path::{ExclusionConfig, is_excluded, trim_to_project_relative};
use crate::domain::project::{Credentials, ProjectContext, RepositoryLocation};
use crate::domain::revision::{RevisionRange, UNSPECIFIED_REVISION};
use crate::error::{AppError, AppResult};
use crate::services::{ChangeSource, DiagnosticEvent, Diagnostics, QueryStep, RepositoryConnector};
use crate::workflow::aggregate::aggregate_changes;

/// A change query bound to one project and repository location.
pub struct ChangeQuery {
    connector: Arc<dyn RepositoryConnector>,
    diagnostics: Arc<dyn Diagnostics>,
    project: ProjectContext,
    location: RepositoryLocation,
    credentials: Credentials,
    start_revision: i64,
    end_revision: i64,
    export_name: Option<String>,
}

impl ChangeQuery {
    pub fn new(
        ctx: &AppContext,
        project: ProjectContext,
        location: RepositoryLocation,
        credentials: Credentials,
        start_revision: i64,
        export_name: Option<String>,
    ) -> Self {
        Self {
            connector: Arc::clone(&ctx.connector),
            diagnostics: Arc::clone(&ctx.diagnostics),
            project,
            location,
            credentials,
            start_revision,
            end_revision: UNSPECIFIED_REVISION,
            export_name: export_name.filter(|name| !name.trim().is_empty()),
        }
    }

    pub fn with_end_revision(mut self, end_revision: i64) -> Self {
        self.end_revision = end_revision;
        self
    }

    pub async fn get(&self) -> AppResult<ChangeSet> {
        self.query(self.start_revision).await
    }

    fn report(&self, step: QueryStep, err: &AppError) {
        self.diagnostics.record(DiagnosticEvent::StepFailed {
            step,
            message: err.to_string(),
        });
    }
}

#[async_trait]
impl ChangeSource for ChangeQuery {
    fn project_name(&self) -> &str {
        self.export_name.as_deref().unwrap_or(&self.project.name)
    }

    fn exclusions(&self) -> &ExclusionConfig {
        &self.project.exclusions
    }

    async fn query(&self, start_revision: i64) -> AppResult<ChangeSet> {
        let project_name = self.project_name();
        info!(
            project = %project_name,
            location = %self.location,
            start_revision,
            end_revision = self.end_revision,
            "querying changes"
        );

        let session = self
            .connector
            .connect(&self.location, &self.credentials)
            .await
            .inspect_err(|err| self.report(QueryStep::Connect, err))?;

        let range = RevisionRange::resolve(start_revision, self.end_revision, || {
            session.latest_revision()
        })
        .await
        .inspect_err(|err| self.report(QueryStep::ResolveRange, err))?;
        debug!(%range, revisions = range.revision_count(), "resolved revision range");

        let entries = session
            .log_entries(range)
            .await
            .inspect_err(|err| self.report(QueryStep::FetchLog, err))?;

        let root_prefix = self
            .project
            .root_prefix
            .as_deref()
            .unwrap_or_else(|| session.project_root());
        debug!(entries = entries.len(), root_prefix, "folding log entries");

        // Rules are keyed by the configured project; the export name only shapes paths.
        let exclusions = self.exclusions();
        let relative = |path: &str| trim_to_project_relative(path, root_prefix, project_name);
        let changes = aggregate_changes(
            root_prefix,
            |path| is_excluded(&self.project.name, &relative(path), exclusions),
            &entries,
            self.diagnostics.as_ref(),
        )
        .map_paths(relative);

        info!(
            project = %project_name,
            %range,
            changed = changes.changed_files.len(),
            deleted = changes.deleted_files.len(),
            "change query finished"
        );
        Ok(changes)
    }
}
