//! Synthetic survey data.

pub mod synth;

pub use synth::*;
