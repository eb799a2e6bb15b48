use tracing::{error, warn};

use crate::services::{DiagnosticEvent, Diagnostics};

/// Forwards diagnostics to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::PathRevived { path, revision } => warn!(
                event = "path.revived",
                %path,
                revision,
                "path was deleted and restored within the revision window"
            ),
            DiagnosticEvent::StepFailed { step, message } => error!(
                event = "query.step_failed",
                %step,
                error = %message,
                "change query failed"
            ),
        }
    }
}
