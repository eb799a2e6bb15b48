//! In-memory collaborators for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::log::LogEntry;
use crate::domain::project::{Credentials, RepositoryLocation};
use crate::domain::revision::RevisionRange;
use crate::error::{AppError, AppResult};
use crate::services::{DiagnosticEvent, Diagnostics, RepositoryConnector, RepositorySession};

#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    events: Arc<Mutex<Vec<DiagnosticEvent>>>,
}

impl RecordingDiagnostics {
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn record(&self, event: DiagnosticEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Connect,
    Authenticate,
    Latest,
    Log,
}

/// Serves a fixed history; records the ranges it was asked for.
#[derive(Debug, Clone)]
pub struct FakeRepository {
    pub project_root: String,
    pub latest: u64,
    pub entries: Vec<LogEntry>,
    pub failure: Option<Failure>,
    pub requested: Arc<Mutex<Vec<RevisionRange>>>,
}

impl FakeRepository {
    pub fn new(project_root: &str, latest: u64, entries: Vec<LogEntry>) -> Self {
        Self {
            project_root: project_root.to_string(),
            latest,
            entries,
            failure: None,
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn requested_ranges(&self) -> Vec<RevisionRange> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryConnector for FakeRepository {
    async fn connect(
        &self,
        location: &RepositoryLocation,
        credentials: &Credentials,
    ) -> AppResult<Box<dyn RepositorySession>> {
        match self.failure {
            Some(Failure::Connect) => Err(AppError::RepositoryConnect(format!(
                "unable to connect to {location}"
            ))),
            Some(Failure::Authenticate) => Err(AppError::Authentication(format!(
                "credentials rejected for {:?}",
                credentials.username
            ))),
            _ => Ok(Box::new(self.clone())),
        }
    }
}

#[async_trait]
impl RepositorySession for FakeRepository {
    async fn latest_revision(&self) -> AppResult<u64> {
        match self.failure {
            Some(Failure::Latest) => Err(AppError::RepositoryConnect("connection dropped".to_string())),
            _ => Ok(self.latest),
        }
    }

    fn project_root(&self) -> &str {
        &self.project_root
    }

    async fn log_entries(&self, range: RevisionRange) -> AppResult<Vec<LogEntry>> {
        self.requested.lock().unwrap().push(range);
        if self.failure == Some(Failure::Log) {
            return Err(AppError::LogRetrieval("stream interrupted".to_string()));
        }
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.revision >= range.start && entry.revision <= range.end)
            .cloned()
            .collect())
    }
}
