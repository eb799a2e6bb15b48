pub mod diagnostics;
pub mod svn;
