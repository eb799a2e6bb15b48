//! Net change sets of a Subversion project over a revision window.
//!
//! [`workflow::changes::ChangeQuery`] connects to the repository, resolves the
//! requested window, folds the log with [`workflow::aggregate::aggregate_changes`]
//! and returns the files a deployment has to copy or remove.

pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;
pub mod telemetry;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;
