use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStep {
    Connect,
    ResolveRange,
    FetchLog,
}

impl QueryStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStep::Connect => "connect",
            QueryStep::ResolveRange => "resolve-range",
            QueryStep::FetchLog => "fetch-log",
        }
    }
}

impl fmt::Display for QueryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A path deleted earlier in the window came back.
    PathRevived { path: String, revision: u64 },
    StepFailed { step: QueryStep, message: String },
}

/// Fire-and-forget sink; must not block or fail.
pub trait Diagnostics: Send + Sync {
    fn record(&self, event: DiagnosticEvent);
}
