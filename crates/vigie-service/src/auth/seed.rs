//! JSON seed for the memory backend.
//!
//! A seed file lists principals, the containment tree and grants. Nodes are
//! inserted top-down, so a building naming an unknown site (or a grant on an
//! unknown node) fails the whole load.

use std::{path::Path, sync::Arc};

use serde::Deserialize;
use vigie_core::types::{NodeKind, NodeRef, Principal, Role};

use crate::error::{ServiceError, ServiceResult};

use super::{
    grant::GrantStore,
    hierarchy::HierarchyAccessor,
    memory::{MemoryDirectory, MemoryGrantStore, MemoryHierarchy},
    service::AccessControl,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Seed {
    #[serde(default)]
    pub principals: Vec<PrincipalSeed>,
    #[serde(default)]
    pub sites: Vec<SiteSeed>,
    #[serde(default)]
    pub buildings: Vec<ChildSeed>,
    #[serde(default)]
    pub levels: Vec<ChildSeed>,
    #[serde(default)]
    pub parts: Vec<PartSeed>,
    #[serde(default)]
    pub grants: Vec<GrantSeed>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrincipalSeed {
    pub id: uuid::Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub organization: Option<String>,
    /// Argon2 PHC string, as produced by `hash_password`.
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSeed {
    pub id: uuid::Uuid,
    pub client: Option<uuid::Uuid>,
}

/// A building (parent is a site) or a level (parent is a building).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChildSeed {
    pub id: uuid::Uuid,
    pub parent: uuid::Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartSeed {
    pub id: uuid::Uuid,
    pub level: uuid::Uuid,
    pub owner: Option<uuid::Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantSeed {
    pub principal_id: uuid::Uuid,
    pub kind: NodeKind,
    pub node_id: uuid::Uuid,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
}

/// Counts of what a seed inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub principals: usize,
    pub nodes: usize,
    pub grants: usize,
}

impl Seed {
    /// ## Errors
    /// Returns `InvalidConfiguration` if the text is not a valid seed document.
    pub fn from_json(raw: &str) -> ServiceResult<Self> {
        serde_json::from_str(raw)
            .map_err(|err| ServiceError::InvalidConfiguration(format!("invalid seed: {err}")))
    }

    /// ## Errors
    /// Returns `InvalidConfiguration` if the file cannot be read or parsed.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn read(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await.map_err(|err| {
            ServiceError::InvalidConfiguration(format!(
                "cannot read seed {}: {err}",
                path.as_ref().display()
            ))
        })?;
        Self::from_json(&raw)
    }

    /// ## Summary
    /// Inserts everything into the given stores, parents before children.
    ///
    /// ## Errors
    /// Returns `NotFound` for a node whose parent is missing, or for a grant
    /// on a node that does not exist.
    #[tracing::instrument(skip_all)]
    pub async fn apply(
        &self,
        grants: &MemoryGrantStore,
        tree: &MemoryHierarchy,
        directory: &MemoryDirectory,
    ) -> ServiceResult<SeedReport> {
        for seed in &self.principals {
            let principal = Principal {
                id: seed.id,
                email: seed.email.clone(),
                display_name: seed.display_name.clone(),
                role: seed.role,
                organization: seed.organization.clone(),
            };
            directory.insert(principal, seed.password_hash.clone()).await;
        }

        for site in &self.sites {
            tree.add_site(site.id, site.client).await;
        }
        for building in &self.buildings {
            tree.add_building(building.id, building.parent).await?;
        }
        for level in &self.levels {
            tree.add_level(level.id, level.parent).await?;
        }
        for part in &self.parts {
            tree.add_part(part.id, part.level, part.owner).await?;
        }

        for grant in &self.grants {
            let node = NodeRef::new(grant.kind, grant.node_id);
            if !tree.exists(node).await? {
                return Err(ServiceError::NotFound(node.to_string()));
            }
            grants
                .upsert(grant.principal_id, node, grant.read, grant.write)
                .await?;
        }

        let report = SeedReport {
            principals: self.principals.len(),
            nodes: self.sites.len() + self.buildings.len() + self.levels.len() + self.parts.len(),
            grants: self.grants.len(),
        };
        tracing::debug!(?report, "Seed applied");
        Ok(report)
    }

    /// ## Summary
    /// Builds a memory-backed [`AccessControl`] holding exactly this seed.
    ///
    /// ## Errors
    /// Same as [`Seed::apply`].
    pub async fn into_access_control(self) -> ServiceResult<(AccessControl, SeedReport)> {
        let grants = Arc::new(MemoryGrantStore::new());
        let tree = Arc::new(MemoryHierarchy::new());
        let directory = Arc::new(MemoryDirectory::new());

        let report = self.apply(&grants, &tree, &directory).await?;
        Ok((AccessControl::memory(grants, tree, directory), report))
    }
}
