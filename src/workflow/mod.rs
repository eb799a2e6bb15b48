pub mod aggregate;
pub mod changes;
