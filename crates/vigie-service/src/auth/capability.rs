//! Role capability table.
//!
//! Roles are a closed enum; every role-dependent shortcut the resolver takes
//! is read from this table rather than compared against role strings.

use vigie_core::types::{NodeKind, Operation, Role};

/// Implicit-allow predicates granted by a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Allow every operation on every node without consulting the tree.
    pub universal: bool,
    /// Allow through part ownership (see [`ownership_allows`]).
    pub ownership_shortcut: bool,
}

impl Capabilities {
    pub const NONE: Self = Self {
        universal: false,
        ownership_shortcut: false,
    };

    /// Looks up the capabilities of a role. A principal without a role has none.
    #[must_use]
    pub const fn for_role(role: Option<Role>) -> Self {
        match role {
            Some(Role::SuperAdmin) => Self {
                universal: true,
                ownership_shortcut: false,
            },
            Some(Role::UserEntreprise) => Self {
                universal: false,
                ownership_shortcut: true,
            },
            Some(
                Role::Admin
                | Role::ClientAdmin
                | Role::User
                | Role::Viewer
                | Role::UserIntervenant,
            )
            | None => Self::NONE,
        }
    }
}

/// Whether ownership can satisfy `op` on a node of this kind.
///
/// A part owner may read and write the part. Owning any part of a site only
/// lets the owner read the site. Buildings and levels carry no ownership.
#[must_use]
pub const fn ownership_allows(kind: NodeKind, op: Operation) -> bool {
    matches!(
        (kind, op),
        (NodeKind::Part, _) | (NodeKind::Site, Operation::Read)
    )
}
