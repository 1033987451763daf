//! HTTP surface of the vigie access-control service.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
