//! In-memory adapters.
//!
//! These back the `memory` storage backend and the test suites. The grant
//! store keeps one map per hierarchy level, mirroring the four grant tables.

use std::collections::HashMap;

use salvo::async_trait;
use tokio::sync::RwLock;
use vigie_core::types::{Grant, NodeKind, NodeRef, Principal, Role};

use crate::error::{ServiceError, ServiceResult};

use super::{
    directory::{PrincipalDirectory, StoredPrincipal},
    grant::GrantStore,
    hierarchy::HierarchyAccessor,
    ownership::OwnershipStore,
};

type GrantMap = HashMap<(uuid::Uuid, uuid::Uuid), (bool, bool)>;

#[derive(Debug, Default)]
struct GrantCollections {
    site: GrantMap,
    building: GrantMap,
    level: GrantMap,
    part: GrantMap,
}

impl GrantCollections {
    fn for_kind(&self, kind: NodeKind) -> &GrantMap {
        match kind {
            NodeKind::Site => &self.site,
            NodeKind::Building => &self.building,
            NodeKind::Level => &self.level,
            NodeKind::Part => &self.part,
        }
    }

    fn for_kind_mut(&mut self, kind: NodeKind) -> &mut GrantMap {
        match kind {
            NodeKind::Site => &mut self.site,
            NodeKind::Building => &mut self.building,
            NodeKind::Level => &mut self.level,
            NodeKind::Part => &mut self.part,
        }
    }
}

/// Grant store holding four independent per-level maps.
#[derive(Debug, Default)]
pub struct MemoryGrantStore {
    collections: RwLock<GrantCollections>,
}

impl MemoryGrantStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    async fn upsert(
        &self,
        principal_id: uuid::Uuid,
        node: NodeRef,
        can_read: bool,
        can_write: bool,
    ) -> ServiceResult<()> {
        let mut collections = self.collections.write().await;
        let map = collections.for_kind_mut(node.kind);
        if can_read || can_write {
            map.insert((principal_id, node.id), (can_read, can_write));
        } else {
            map.remove(&(principal_id, node.id));
        }
        Ok(())
    }

    async fn get(&self, principal_id: uuid::Uuid, node: NodeRef) -> ServiceResult<Option<Grant>> {
        let collections = self.collections.read().await;
        Ok(collections
            .for_kind(node.kind)
            .get(&(principal_id, node.id))
            .map(|&(can_read, can_write)| Grant {
                principal_id,
                node,
                can_read,
                can_write,
            })
            .filter(|grant| !grant.is_empty()))
    }

    async fn revoke(&self, principal_id: uuid::Uuid, node: NodeRef) -> ServiceResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .for_kind_mut(node.kind)
            .remove(&(principal_id, node.id))
            .is_some())
    }

    async fn delete_all_for_node(&self, node: NodeRef) -> ServiceResult<usize> {
        let mut collections = self.collections.write().await;
        let map = collections.for_kind_mut(node.kind);
        let before = map.len();
        map.retain(|&(_, node_id), _| node_id != node.id);
        Ok(before - map.len())
    }

    async fn list_for_node(&self, node: NodeRef) -> ServiceResult<Vec<Grant>> {
        let collections = self.collections.read().await;
        let mut grants: Vec<Grant> = collections
            .for_kind(node.kind)
            .iter()
            .filter(|&(&(_, node_id), _)| node_id == node.id)
            .map(|(&(principal_id, _), &(can_read, can_write))| Grant {
                principal_id,
                node,
                can_read,
                can_write,
            })
            .collect();
        grants.sort_by_key(|grant| grant.principal_id);
        Ok(grants)
    }
}

#[derive(Debug, Default)]
struct Tree {
    /// site id → client id
    sites: HashMap<uuid::Uuid, Option<uuid::Uuid>>,
    /// building id → site id
    buildings: HashMap<uuid::Uuid, uuid::Uuid>,
    /// level id → building id
    levels: HashMap<uuid::Uuid, uuid::Uuid>,
    /// part id → (level id, owner id)
    parts: HashMap<uuid::Uuid, (uuid::Uuid, Option<uuid::Uuid>)>,
}

impl Tree {
    fn contains(&self, node: NodeRef) -> bool {
        match node.kind {
            NodeKind::Site => self.sites.contains_key(&node.id),
            NodeKind::Building => self.buildings.contains_key(&node.id),
            NodeKind::Level => self.levels.contains_key(&node.id),
            NodeKind::Part => self.parts.contains_key(&node.id),
        }
    }
}

/// Containment tree with part ownership.
///
/// Insertion methods refuse orphans so the tree always terminates at a site.
#[derive(Debug, Default)]
pub struct MemoryHierarchy {
    tree: RwLock<Tree>,
}

impl MemoryHierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_site(&self, site_id: uuid::Uuid, client_id: Option<uuid::Uuid>) {
        self.tree.write().await.sites.insert(site_id, client_id);
    }

    /// ## Errors
    /// Returns `NotFound` if the site does not exist.
    pub async fn add_building(
        &self,
        building_id: uuid::Uuid,
        site_id: uuid::Uuid,
    ) -> ServiceResult<()> {
        let mut tree = self.tree.write().await;
        if !tree.sites.contains_key(&site_id) {
            return Err(not_found(NodeRef::site(site_id)));
        }
        tree.buildings.insert(building_id, site_id);
        Ok(())
    }

    /// ## Errors
    /// Returns `NotFound` if the building does not exist.
    pub async fn add_level(
        &self,
        level_id: uuid::Uuid,
        building_id: uuid::Uuid,
    ) -> ServiceResult<()> {
        let mut tree = self.tree.write().await;
        if !tree.buildings.contains_key(&building_id) {
            return Err(not_found(NodeRef::building(building_id)));
        }
        tree.levels.insert(level_id, building_id);
        Ok(())
    }

    /// ## Errors
    /// Returns `NotFound` if the level does not exist.
    pub async fn add_part(
        &self,
        part_id: uuid::Uuid,
        level_id: uuid::Uuid,
        owner_id: Option<uuid::Uuid>,
    ) -> ServiceResult<()> {
        let mut tree = self.tree.write().await;
        if !tree.levels.contains_key(&level_id) {
            return Err(not_found(NodeRef::level(level_id)));
        }
        tree.parts.insert(part_id, (level_id, owner_id));
        Ok(())
    }

    /// Removes a part; its ownership goes with it.
    pub async fn remove_part(&self, part_id: uuid::Uuid) -> bool {
        self.tree.write().await.parts.remove(&part_id).is_some()
    }

    pub async fn set_site_client(&self, site_id: uuid::Uuid, client_id: Option<uuid::Uuid>) {
        if let Some(client) = self.tree.write().await.sites.get_mut(&site_id) {
            *client = client_id;
        }
    }
}

fn not_found(node: NodeRef) -> ServiceError {
    ServiceError::NotFound(node.to_string())
}

#[async_trait]
impl HierarchyAccessor for MemoryHierarchy {
    async fn exists(&self, node: NodeRef) -> ServiceResult<bool> {
        Ok(self.tree.read().await.contains(node))
    }

    async fn parent_of(&self, node: NodeRef) -> ServiceResult<Option<NodeRef>> {
        let tree = self.tree.read().await;
        let parent = match node.kind {
            NodeKind::Site => return Ok(None),
            NodeKind::Building => tree.buildings.get(&node.id).copied().map(NodeRef::site),
            NodeKind::Level => tree.levels.get(&node.id).copied().map(NodeRef::building),
            NodeKind::Part => tree
                .parts
                .get(&node.id)
                .map(|&(level_id, _)| NodeRef::level(level_id)),
        };
        parent.map(Some).ok_or_else(|| not_found(node))
    }

    async fn exists_owned_part_under(
        &self,
        site_id: uuid::Uuid,
        principal_id: uuid::Uuid,
    ) -> ServiceResult<bool> {
        let tree = self.tree.read().await;
        Ok(tree.parts.values().any(|&(level_id, owner_id)| {
            owner_id == Some(principal_id)
                && tree
                    .levels
                    .get(&level_id)
                    .and_then(|building_id| tree.buildings.get(building_id))
                    .is_some_and(|&site| site == site_id)
        }))
    }

    async fn site_client(&self, site_id: uuid::Uuid) -> ServiceResult<Option<uuid::Uuid>> {
        self.tree
            .read()
            .await
            .sites
            .get(&site_id)
            .copied()
            .ok_or_else(|| not_found(NodeRef::site(site_id)))
    }

    async fn part_owner(&self, part_id: uuid::Uuid) -> ServiceResult<Option<uuid::Uuid>> {
        self.tree
            .read()
            .await
            .parts
            .get(&part_id)
            .map(|&(_, owner_id)| owner_id)
            .ok_or_else(|| not_found(NodeRef::part(part_id)))
    }
}

#[async_trait]
impl OwnershipStore for MemoryHierarchy {
    async fn set_owner(
        &self,
        part_ids: &[uuid::Uuid],
        owner_id: Option<uuid::Uuid>,
    ) -> ServiceResult<usize> {
        let mut tree = self.tree.write().await;
        let mut updated = 0;
        for part_id in part_ids {
            if let Some((_, owner)) = tree.parts.get_mut(part_id) {
                *owner = owner_id;
                updated += 1;
            }
        }
        Ok(updated)
    }
}

/// Principal directory keyed by id, with an email index.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    principals: RwLock<HashMap<uuid::Uuid, StoredPrincipal>>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a principal.
    pub async fn insert(&self, principal: Principal, password_hash: Option<String>) {
        self.principals.write().await.insert(
            principal.id,
            StoredPrincipal {
                principal,
                password_hash,
            },
        );
    }
}

#[async_trait]
impl PrincipalDirectory for MemoryDirectory {
    async fn find_by_id(&self, id: uuid::Uuid) -> ServiceResult<Option<Principal>> {
        Ok(self
            .principals
            .read()
            .await
            .get(&id)
            .map(|stored| stored.principal.clone()))
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<StoredPrincipal>> {
        Ok(self
            .principals
            .read()
            .await
            .values()
            .find(|stored| stored.principal.email == email)
            .cloned())
    }

    async fn ensure_principal(
        &self,
        email: &str,
        display_name: &str,
        role: Option<Role>,
    ) -> ServiceResult<Principal> {
        let mut principals = self.principals.write().await;
        if let Some(existing) = principals.values().find(|s| s.principal.email == email) {
            return Ok(existing.principal.clone());
        }

        let principal = Principal {
            id: uuid::Uuid::now_v7(),
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
            role,
            organization: None,
        };
        principals.insert(
            principal.id,
            StoredPrincipal {
                principal: principal.clone(),
                password_hash: None,
            },
        );
        Ok(principal)
    }
}
