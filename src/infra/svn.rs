use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::log::{ChangeAction, ChangedPath, LogEntry, NodeKind};
use crate::domain::path::root_prefix_from_urls;
use crate::domain::project::{Credentials, RepositoryLocation};
use crate::domain::revision::RevisionRange;
use crate::error::{AppError, AppResult};
use crate::services::{RepositoryConnector, RepositorySession};

/// Error codes `svn` prints when credentials are refused.
const AUTH_ERROR_CODES: [&str; 3] = ["E170001", "E215004", "E175013"];

/// Talks to a Subversion server through the `svn` command-line client.
#[derive(Debug, Clone)]
pub struct SvnCli {
    binary: String,
}

struct CommandOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

impl SvnCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command_args(subcommand: &[&str], target: &str, credentials: &Credentials) -> Vec<String> {
        let mut args: Vec<String> = subcommand.iter().map(|arg| arg.to_string()).collect();
        args.extend(
            ["--xml", "--non-interactive", "--no-auth-cache"]
                .iter()
                .map(|arg| arg.to_string()),
        );
        if let Some(username) = credentials.username.as_deref().filter(|u| !u.is_empty()) {
            args.push("--username".to_string());
            args.push(username.to_string());
        }
        if credentials.password.is_some() {
            args.push("--password-from-stdin".to_string());
        }
        args.push(target.to_string());
        args
    }

    async fn execute(&self, args: Vec<String>, credentials: &Credentials) -> AppResult<CommandOutput> {
        debug!(binary = %self.binary, args = ?args, "running svn");
        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(if credentials.password.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                AppError::RepositoryConnect(format!("failed to launch {}: {err}", self.binary))
            })?;

        if let (Some(password), Some(mut stdin)) = (credentials.password.as_deref(), child.stdin.take()) {
            let written = async {
                stdin.write_all(password.as_bytes()).await?;
                stdin.write_all(b"\n").await
            }
            .await;
            match written {
                Ok(()) => {}
                // svn exited before reading stdin; its stderr says why.
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                    debug!(binary = %self.binary, "svn closed stdin before reading the password");
                }
                Err(err) => {
                    return Err(AppError::RepositoryConnect(format!(
                        "failed to pass credentials to {}: {err}",
                        self.binary
                    )));
                }
            }
        }

        let output = child.wait_with_output().await?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    async fn info(&self, target: &str, credentials: &Credentials) -> AppResult<InfoEntry> {
        let args = Self::command_args(&["info", "-r", "HEAD"], target, credentials);
        let output = self.execute(args, credentials).await?;
        if !output.success {
            return Err(classify_connect_failure(&output.stderr));
        }
        parse_info(&output.stdout)
    }
}

#[async_trait]
impl RepositoryConnector for SvnCli {
    async fn connect(
        &self,
        location: &RepositoryLocation,
        credentials: &Credentials,
    ) -> AppResult<Box<dyn RepositorySession>> {
        let info = self.info(location.as_str(), credentials).await?;
        let project_root = root_prefix_from_urls(&info.url, &info.repository.root)?;
        debug!(
            root = %info.repository.root,
            project_root = %project_root,
            head = info.revision,
            "connected to repository"
        );

        Ok(Box::new(SvnSession {
            cli: self.clone(),
            location: location.as_str().to_string(),
            credentials: credentials.clone(),
            project_root,
        }))
    }
}

struct SvnSession {
    cli: SvnCli,
    location: String,
    credentials: Credentials,
    project_root: String,
}

#[async_trait]
impl RepositorySession for SvnSession {
    async fn latest_revision(&self) -> AppResult<u64> {
        let info = self.cli.info(&self.location, &self.credentials).await?;
        Ok(info.revision)
    }

    fn project_root(&self) -> &str {
        &self.project_root
    }

    async fn log_entries(&self, range: RevisionRange) -> AppResult<Vec<LogEntry>> {
        let revisions = range.to_string();
        let args = SvnCli::command_args(
            &log_subcommand(&revisions),
            &self.location,
            &self.credentials,
        );
        let output = self.cli.execute(args, &self.credentials).await.map_err(|err| {
            AppError::LogRetrieval(format!("failed to read history {range}: {err}"))
        })?;
        if !output.success {
            return Err(AppError::LogRetrieval(format!(
                "svn log {range} failed: {}",
                output.stderr
            )));
        }

        let mut entries = parse_log(&output.stdout)?;
        entries.sort_by_key(|entry| entry.revision);
        Ok(entries)
    }
}

/// History stops at the copy that created the project so branch ancestry stays out.
fn log_subcommand(revisions: &str) -> [&str; 5] {
    ["log", "--verbose", "--stop-on-copy", "-r", revisions]
}

fn classify_connect_failure(stderr: &str) -> AppError {
    if AUTH_ERROR_CODES.iter().any(|code| stderr.contains(code)) {
        AppError::Authentication(stderr.to_string())
    } else {
        AppError::RepositoryConnect(stderr.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct InfoDocument {
    #[serde(default)]
    entry: Vec<InfoEntry>,
}

#[derive(Debug, Deserialize)]
struct InfoEntry {
    #[serde(rename = "@revision")]
    revision: u64,
    url: String,
    repository: InfoRepository,
}

#[derive(Debug, Deserialize)]
struct InfoRepository {
    root: String,
}

fn parse_info(xml: &str) -> AppResult<InfoEntry> {
    let document: InfoDocument = quick_xml::de::from_str(xml)
        .map_err(|err| AppError::RepositoryConnect(format!("unreadable svn info output: {err}")))?;
    document
        .entry
        .into_iter()
        .next()
        .ok_or_else(|| AppError::RepositoryConnect("svn info returned no entry".to_string()))
}

#[derive(Debug, Deserialize)]
struct LogDocument {
    #[serde(default, rename = "logentry")]
    entries: Vec<LogEntryRecord>,
}

#[derive(Debug, Deserialize)]
struct LogEntryRecord {
    #[serde(rename = "@revision")]
    revision: u64,
    #[serde(default)]
    paths: Option<LogPaths>,
}

#[derive(Debug, Deserialize)]
struct LogPaths {
    #[serde(default, rename = "path")]
    items: Vec<LogPathRecord>,
}

#[derive(Debug, Deserialize)]
struct LogPathRecord {
    #[serde(rename = "@action")]
    action: String,
    #[serde(default, rename = "@kind")]
    kind: String,
    #[serde(rename = "$text")]
    path: String,
}

fn parse_log(xml: &str) -> AppResult<Vec<LogEntry>> {
    let document: LogDocument = quick_xml::de::from_str(xml)
        .map_err(|err| AppError::LogRetrieval(format!("unreadable svn log output: {err}")))?;

    document
        .entries
        .into_iter()
        .map(|record| {
            let changed_paths = record
                .paths
                .map(|paths| paths.items)
                .unwrap_or_default()
                .into_iter()
                .map(|item| {
                    let action = ChangeAction::from_str(&item.action).ok_or_else(|| {
                        AppError::LogRetrieval(format!(
                            "unknown action '{}' for {} in r{}",
                            item.action, item.path, record.revision
                        ))
                    })?;
                    Ok(ChangedPath::new(item.path, action, NodeKind::from_str(&item.kind)))
                })
                .collect::<AppResult<Vec<_>>>()?;

            if changed_paths.is_empty() {
                warn!(revision = record.revision, "log entry carries no changed paths");
            }
            Ok(LogEntry::new(record.revision, changed_paths))
        })
        .collect()
}
