//! Shared vocabulary for the vigie site-safety registry.
//!
//! Nothing in this crate performs I/O beyond reading configuration.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
