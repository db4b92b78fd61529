//! Tier statistics: partition -> aggregate -> volume -> density.
//!
//! Each stage is a plain function over immutable inputs so it can be tested
//! on its own. `compute_density_report` strings them together.

pub mod aggregate;
pub mod metrics;
pub mod partition;
pub mod volume;

pub use aggregate::*;
pub use metrics::*;
pub use partition::*;
pub use volume::*;
