//! Domain types shared by every layer.
//!
//! The containment tree is Site → Building → Level → Part. Each non-site node
//! has exactly one parent; a site is always reached in at most three hops.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Coarse-grained capability class assigned to a principal.
///
/// A principal carries at most one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    SuperAdmin,
    Admin,
    ClientAdmin,
    User,
    Viewer,
    UserEntreprise,
    UserIntervenant,
}

impl Role {
    pub const ALL: [Self; 7] = [
        Self::SuperAdmin,
        Self::Admin,
        Self::ClientAdmin,
        Self::User,
        Self::Viewer,
        Self::UserEntreprise,
        Self::UserIntervenant,
    ];

    /// Returns the stored string representation of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super-admin",
            Self::Admin => "admin",
            Self::ClientAdmin => "client-admin",
            Self::User => "user",
            Self::Viewer => "viewer",
            Self::UserEntreprise => "user-entreprise",
            Self::UserIntervenant => "user-intervenant",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CoreError::ParseError(format!("unknown role `{s}`")))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested operation on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl FromStr for Operation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            other => Err(CoreError::ParseError(format!("unknown operation `{other}`"))),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level of a node in the containment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Site,
    Building,
    Level,
    Part,
}

impl NodeKind {
    pub const ALL: [Self; 4] = [Self::Site, Self::Building, Self::Level, Self::Part];

    /// Kind of the direct parent, `None` for the root.
    #[must_use]
    pub const fn parent_kind(self) -> Option<Self> {
        match self {
            Self::Site => None,
            Self::Building => Some(Self::Site),
            Self::Level => Some(Self::Building),
            Self::Part => Some(Self::Level),
        }
    }

    /// Distance from the site level (a site is 0, a part is 3).
    #[must_use]
    pub const fn depth(self) -> usize {
        match self {
            Self::Site => 0,
            Self::Building => 1,
            Self::Level => 2,
            Self::Part => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Building => "building",
            Self::Level => "level",
            Self::Part => "part",
        }
    }

    /// Returns the route segment for this kind.
    #[must_use]
    pub const fn as_path_segment(self) -> &'static str {
        match self {
            Self::Site => crate::constants::SITE_ROUTE_COMPONENT,
            Self::Building => crate::constants::BUILDING_ROUTE_COMPONENT,
            Self::Level => crate::constants::LEVEL_ROUTE_COMPONENT,
            Self::Part => crate::constants::PART_ROUTE_COMPONENT,
        }
    }

    /// Parse a route segment into a node kind.
    #[must_use]
    pub fn from_path_segment(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_path_segment() == s)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reference to one node of the containment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub kind: NodeKind,
    pub id: uuid::Uuid,
}

impl NodeRef {
    #[must_use]
    pub const fn new(kind: NodeKind, id: uuid::Uuid) -> Self {
        Self { kind, id }
    }

    #[must_use]
    pub const fn site(id: uuid::Uuid) -> Self {
        Self::new(NodeKind::Site, id)
    }

    #[must_use]
    pub const fn building(id: uuid::Uuid) -> Self {
        Self::new(NodeKind::Building, id)
    }

    #[must_use]
    pub const fn level(id: uuid::Uuid) -> Self {
        Self::new(NodeKind::Level, id)
    }

    #[must_use]
    pub const fn part(id: uuid::Uuid) -> Self {
        Self::new(NodeKind::Part, id)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// An authenticated user as seen by authorization.
///
/// `organization` is informational and never consulted by decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: uuid::Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub organization: Option<String>,
}

/// Explicit access record for one principal on one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub principal_id: uuid::Uuid,
    pub node: NodeRef,
    pub can_read: bool,
    pub can_write: bool,
}

impl Grant {
    /// Whether this grant's flag for `op` is set.
    #[must_use]
    pub const fn allows(&self, op: Operation) -> bool {
        match op {
            Operation::Read => self.can_read,
            Operation::Write => self.can_write,
        }
    }

    /// A grant with neither flag set is equivalent to no grant.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.can_read && !self.can_write
    }
}
