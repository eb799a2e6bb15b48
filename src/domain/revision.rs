use std::fmt;
use std::future::Future;

use crate::error::{AppError, AppResult};

/// Sentinel accepted wherever a revision may be left open.
pub const UNSPECIFIED_REVISION: i64 = -1;

/// Inclusive window of revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionRange {
    pub start: u64,
    pub end: u64,
}

impl RevisionRange {
    /// Resolves a requested window: a negative start means the first revision,
    /// a negative end means whatever `latest` reports. `latest` is only called
    /// when the end is open.
    pub async fn resolve<F, Fut>(start: i64, end: i64, latest: F) -> AppResult<Self>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<u64>>,
    {
        let start = if start < 0 { 1 } else { start as u64 };
        let end = if end < 0 {
            latest().await.map_err(|err| {
                AppError::RevisionRange(format!("failed to look up latest revision: {err}"))
            })?
        } else {
            end as u64
        };

        if start > end {
            return Err(AppError::RevisionRange(format!(
                "start revision {start} is after end revision {end}"
            )));
        }

        Ok(Self { start, end })
    }

    pub fn revision_count(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
