//! Hierarchical authorization for the site → building → level → part tree.

pub mod auth;
pub mod error;
