pub mod change_source;
pub mod diagnostics;
pub mod repository;

pub use change_source::ChangeSource;
pub use diagnostics::{DiagnosticEvent, Diagnostics, QueryStep};
pub use repository::{RepositoryConnector, RepositorySession};
