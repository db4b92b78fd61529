//! `ness-dpr` library crate.
//!
//! The binary (`ness`) is a thin wrapper around this library so that:
//!
//! - the density pipeline is testable without spawning processes
//! - the catalog writer and synthetic-data generator are reusable on their own

pub mod app;
pub mod catalog;
pub mod cli;
pub mod data;
pub mod density;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
