pub mod change;
pub mod log;
pub mod path;
pub mod project;
pub mod revision;
