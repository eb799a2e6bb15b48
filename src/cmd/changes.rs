use clap::ValueEnum;

use revsync::context::AppContext;
use revsync::domain::change::ChangeSet;
use revsync::domain::project::{Credentials, RepositoryLocation};
use revsync::error::{AppError, AppResult};
use revsync::workflow::changes::ChangeQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ChangesCommandArgs {
    pub project: Option<String>,
    pub url: Option<String>,
    pub from: i64,
    pub to: i64,
    pub export_name: Option<String>,
}

pub async fn run(ctx: &AppContext, args: ChangesCommandArgs) -> AppResult<ChangeSet> {
    let raw_url = args
        .url
        .or_else(|| ctx.config.repository_url.clone())
        .ok_or_else(|| AppError::Configuration("no repository URL configured".to_string()))?;
    let location = RepositoryLocation::parse(&raw_url)?;

    let project_name = args
        .project
        .or_else(|| location.last_segment())
        .ok_or_else(|| {
            AppError::Configuration(format!("cannot derive a project name from {location}"))
        })?;

    let credentials = Credentials::new(ctx.config.username.clone(), ctx.config.password.clone());
    let query = ChangeQuery::new(
        ctx,
        ctx.config.project_context(&project_name),
        location,
        credentials,
        args.from,
        args.export_name,
    )
    .with_end_revision(args.to);

    query.get().await
}

pub fn render(changes: &ChangeSet, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(changes)
            .map_err(|err| AppError::Configuration(format!("failed to encode result: {err}"))),
        OutputFormat::Text => {
            let lines = changes
                .changed_files
                .iter()
                .map(|path| format!("M {path}"))
                .chain(changes.deleted_files.iter().map(|path| format!("D {path}")))
                .collect::<Vec<_>>();
            Ok(lines.join("\n"))
        }
    }
}
