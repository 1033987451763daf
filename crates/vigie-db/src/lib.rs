//! Postgres persistence for principals, the site containment tree, part
//! ownership and the four per-level grant tables.

pub mod db;
pub mod error;
pub mod model;
