//! Reporting utilities: scientific-notation markup, the LaTeX density table,
//! and the human-readable run summary.

pub mod format;

pub use format::*;
