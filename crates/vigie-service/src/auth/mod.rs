//! Authentication and authorization flow.
//!
//! ## Module Organization
//!
//! - `admin`: Grant and ownership administration, gated on write access
//! - `authenticate`: Principal resolution (single user, basic auth, proxy)
//! - `capability`: Role capability table (implicit-allow predicates per role)
//! - `depot`: Helpers for storing and extracting authorization context in Salvo depots
//! - `directory`: Identity & role provider interface
//! - `grant`: Grant store interface, one keyed collection per hierarchy level
//! - `guard`: Request guards (existence check, then decision)
//! - `hierarchy`: Containment tree accessor interface and the ancestor walk
//! - `memory`: In-memory adapters for every store interface
//! - `ownership`: Part ownership mutation interface
//! - `password`: Password hashing and verification with Argon2
//! - `postgres`: Diesel-backed adapters for every store interface
//! - `resolver`: The ordered decision chain
//! - `seed`: JSON seed loading for the memory backend
//! - `service`: `AccessControl`, the bundle of stores handed to handlers

pub mod admin;
pub mod authenticate;
pub mod capability;
pub mod depot;
pub mod directory;
pub mod grant;
pub mod guard;
pub mod hierarchy;
pub mod memory;
pub mod ownership;
pub mod password;
pub mod postgres;
pub mod resolver;
pub mod seed;
pub mod service;

pub use admin::Admin;
pub use capability::Capabilities;
pub use depot::{DepotPrincipal, get_access_control_from_depot, get_principal_from_depot};
pub use directory::{PrincipalDirectory, StoredPrincipal};
pub use grant::GrantStore;
pub use guard::{Guard, deny_message};
pub use hierarchy::HierarchyAccessor;
pub use ownership::OwnershipStore;
pub use resolver::{AccessSummary, Decision, MatchedRule, Resolver};
pub use seed::{Seed, SeedReport};
pub use service::AccessControl;
