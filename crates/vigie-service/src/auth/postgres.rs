//! Diesel-backed adapters for the store interfaces.
//!
//! Every call checks a connection out of the injected provider; lookups made
//! during one decision are not wrapped in a transaction.

use std::sync::Arc;

use salvo::async_trait;
use vigie_core::types::{Grant, NodeKind, NodeRef, Principal, Role};
use vigie_db::{
    db::{
        DbProvider,
        enums::DbRole,
        query::{grant, hierarchy, ownership, principal},
    },
    model::{grant::GrantRow, principal::NewPrincipal},
};

use crate::error::{ServiceError, ServiceResult};

use super::{
    directory::{PrincipalDirectory, StoredPrincipal},
    grant::GrantStore,
    hierarchy::HierarchyAccessor,
    ownership::OwnershipStore,
};

pub type SharedProvider = Arc<dyn DbProvider + Send + Sync>;

fn to_grant(row: GrantRow, kind: NodeKind) -> Grant {
    Grant {
        principal_id: row.principal_id,
        node: NodeRef::new(kind, row.node_id),
        can_read: row.can_read,
        can_write: row.can_write,
    }
}

/// Grant store over the `site_grant`, `building_grant`, `level_grant` and
/// `part_grant` tables.
#[derive(Clone)]
pub struct PgGrantStore {
    provider: SharedProvider,
}

impl PgGrantStore {
    #[must_use]
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl GrantStore for PgGrantStore {
    #[tracing::instrument(skip(self))]
    async fn upsert(
        &self,
        principal_id: uuid::Uuid,
        node: NodeRef,
        can_read: bool,
        can_write: bool,
    ) -> ServiceResult<()> {
        if !can_read && !can_write {
            self.revoke(principal_id, node).await?;
            return Ok(());
        }

        let mut conn = self.provider.get_connection().await?;
        match node.kind {
            NodeKind::Site => {
                grant::site::upsert(&mut conn, principal_id, node.id, can_read, can_write).await?;
            }
            NodeKind::Building => {
                grant::building::upsert(&mut conn, principal_id, node.id, can_read, can_write)
                    .await?;
            }
            NodeKind::Level => {
                grant::level::upsert(&mut conn, principal_id, node.id, can_read, can_write).await?;
            }
            NodeKind::Part => {
                grant::part::upsert(&mut conn, principal_id, node.id, can_read, can_write).await?;
            }
        }
        Ok(())
    }

    async fn get(&self, principal_id: uuid::Uuid, node: NodeRef) -> ServiceResult<Option<Grant>> {
        let mut conn = self.provider.get_connection().await?;
        let row = match node.kind {
            NodeKind::Site => grant::site::get(&mut conn, principal_id, node.id).await?,
            NodeKind::Building => grant::building::get(&mut conn, principal_id, node.id).await?,
            NodeKind::Level => grant::level::get(&mut conn, principal_id, node.id).await?,
            NodeKind::Part => grant::part::get(&mut conn, principal_id, node.id).await?,
        };
        Ok(row
            .map(|row| to_grant(row, node.kind))
            .filter(|g| !g.is_empty()))
    }

    #[tracing::instrument(skip(self))]
    async fn revoke(&self, principal_id: uuid::Uuid, node: NodeRef) -> ServiceResult<bool> {
        let mut conn = self.provider.get_connection().await?;
        let removed = match node.kind {
            NodeKind::Site => grant::site::delete(&mut conn, principal_id, node.id).await?,
            NodeKind::Building => grant::building::delete(&mut conn, principal_id, node.id).await?,
            NodeKind::Level => grant::level::delete(&mut conn, principal_id, node.id).await?,
            NodeKind::Part => grant::part::delete(&mut conn, principal_id, node.id).await?,
        };
        Ok(removed > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_all_for_node(&self, node: NodeRef) -> ServiceResult<usize> {
        let mut conn = self.provider.get_connection().await?;
        Ok(match node.kind {
            NodeKind::Site => grant::site::delete_all_for_node(&mut conn, node.id).await?,
            NodeKind::Building => grant::building::delete_all_for_node(&mut conn, node.id).await?,
            NodeKind::Level => grant::level::delete_all_for_node(&mut conn, node.id).await?,
            NodeKind::Part => grant::part::delete_all_for_node(&mut conn, node.id).await?,
        })
    }

    async fn list_for_node(&self, node: NodeRef) -> ServiceResult<Vec<Grant>> {
        let mut conn = self.provider.get_connection().await?;
        let rows = match node.kind {
            NodeKind::Site => grant::site::list_for_node(&mut conn, node.id).await?,
            NodeKind::Building => grant::building::list_for_node(&mut conn, node.id).await?,
            NodeKind::Level => grant::level::list_for_node(&mut conn, node.id).await?,
            NodeKind::Part => grant::part::list_for_node(&mut conn, node.id).await?,
        };
        Ok(rows
            .into_iter()
            .map(|row| to_grant(row, node.kind))
            .filter(|g| !g.is_empty())
            .collect())
    }
}

/// Containment tree accessor and ownership writer over the entity tables.
#[derive(Clone)]
pub struct PgHierarchy {
    provider: SharedProvider,
}

impl PgHierarchy {
    #[must_use]
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }
}

fn not_found(node: NodeRef) -> ServiceError {
    ServiceError::NotFound(node.to_string())
}

#[async_trait]
impl HierarchyAccessor for PgHierarchy {
    async fn exists(&self, node: NodeRef) -> ServiceResult<bool> {
        let mut conn = self.provider.get_connection().await?;
        Ok(match node.kind {
            NodeKind::Site => hierarchy::site_exists(&mut conn, node.id).await?,
            NodeKind::Building => hierarchy::building_site(&mut conn, node.id)
                .await?
                .is_some(),
            NodeKind::Level => hierarchy::level_building(&mut conn, node.id)
                .await?
                .is_some(),
            NodeKind::Part => hierarchy::part_level(&mut conn, node.id).await?.is_some(),
        })
    }

    async fn parent_of(&self, node: NodeRef) -> ServiceResult<Option<NodeRef>> {
        let mut conn = self.provider.get_connection().await?;
        let parent = match node.kind {
            NodeKind::Site => return Ok(None),
            NodeKind::Building => hierarchy::building_site(&mut conn, node.id)
                .await?
                .map(NodeRef::site),
            NodeKind::Level => hierarchy::level_building(&mut conn, node.id)
                .await?
                .map(NodeRef::building),
            NodeKind::Part => hierarchy::part_level(&mut conn, node.id)
                .await?
                .map(NodeRef::level),
        };
        parent.map(Some).ok_or_else(|| not_found(node))
    }

    async fn exists_owned_part_under(
        &self,
        site_id: uuid::Uuid,
        principal_id: uuid::Uuid,
    ) -> ServiceResult<bool> {
        let mut conn = self.provider.get_connection().await?;
        Ok(hierarchy::owned_part_exists_under_site(&mut conn, site_id, principal_id).await?)
    }

    async fn site_client(&self, site_id: uuid::Uuid) -> ServiceResult<Option<uuid::Uuid>> {
        let mut conn = self.provider.get_connection().await?;
        hierarchy::site_client(&mut conn, site_id)
            .await?
            .ok_or_else(|| not_found(NodeRef::site(site_id)))
    }

    async fn part_owner(&self, part_id: uuid::Uuid) -> ServiceResult<Option<uuid::Uuid>> {
        let mut conn = self.provider.get_connection().await?;
        hierarchy::part_owner(&mut conn, part_id)
            .await?
            .ok_or_else(|| not_found(NodeRef::part(part_id)))
    }
}

#[async_trait]
impl OwnershipStore for PgHierarchy {
    #[tracing::instrument(skip(self), fields(part_count = part_ids.len()))]
    async fn set_owner(
        &self,
        part_ids: &[uuid::Uuid],
        owner_id: Option<uuid::Uuid>,
    ) -> ServiceResult<usize> {
        let mut conn = self.provider.get_connection().await?;
        Ok(ownership::set_owner(&mut conn, part_ids, owner_id).await?)
    }
}

/// Principal directory over the `principal` table.
#[derive(Clone)]
pub struct PgDirectory {
    provider: SharedProvider,
}

impl PgDirectory {
    #[must_use]
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PrincipalDirectory for PgDirectory {
    async fn find_by_id(&self, id: uuid::Uuid) -> ServiceResult<Option<Principal>> {
        let mut conn = self.provider.get_connection().await?;
        Ok(principal::find_by_id(&mut conn, id).await?.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<StoredPrincipal>> {
        let mut conn = self.provider.get_connection().await?;
        Ok(principal::find_by_email(&mut conn, email)
            .await?
            .map(|mut row| StoredPrincipal {
                password_hash: row.password_hash.take(),
                principal: row.into(),
            }))
    }

    #[tracing::instrument(skip(self))]
    async fn ensure_principal(
        &self,
        email: &str,
        display_name: &str,
        role: Option<Role>,
    ) -> ServiceResult<Principal> {
        let mut conn = self.provider.get_connection().await?;

        if let Some(row) = principal::find_by_email(&mut conn, email).await? {
            tracing::debug!(principal_id = %row.id, "Principal already exists");
            return Ok(row.into());
        }

        let new_principal = NewPrincipal {
            id: uuid::Uuid::now_v7(),
            email,
            display_name: Some(display_name),
            role: role.map(DbRole::from),
            organization: None,
            password_hash: None,
        };
        let row = principal::insert(&mut conn, &new_principal).await?;

        tracing::info!(principal_id = %row.id, email = %row.email, "Principal created");

        Ok(row.into())
    }
}
