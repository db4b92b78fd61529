//! Figure rendering.
//!
//! - box statistics (`stats`)
//! - axis label variants (`label`)
//! - SVG box plot (`boxplot`)

pub mod boxplot;
pub mod label;
pub mod stats;

pub use boxplot::*;
pub use label::*;
pub use stats::*;
