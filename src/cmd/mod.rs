pub mod changes;
pub mod config;
