use diesel::prelude::*;

/// A grant tuple read from any of the four per-level grant tables.
///
/// `node_id` refers to a site, building, level or part depending on the
/// table it was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable)]
pub struct GrantRow {
    pub principal_id: uuid::Uuid,
    pub node_id: uuid::Uuid,
    pub can_read: bool,
    pub can_write: bool,
}
