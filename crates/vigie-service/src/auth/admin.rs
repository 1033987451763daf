//! Grant and ownership administration.
//!
//! Every mutation first passes the write guard of the node it touches.

use vigie_core::types::{Grant, NodeKind, NodeRef, Operation, Principal};

use crate::error::{ServiceError, ServiceResult};

use super::service::AccessControl;

pub struct Admin<'a> {
    access: &'a AccessControl,
}

impl<'a> Admin<'a> {
    #[must_use]
    pub const fn new(access: &'a AccessControl) -> Self {
        Self { access }
    }

    async fn require_write(&self, actor: &Principal, node: NodeRef) -> ServiceResult<()> {
        self.access
            .guard(node.kind)
            .require(Some(actor), node.id, Operation::Write)
            .await
    }

    async fn require_principal(&self, principal_id: uuid::Uuid) -> ServiceResult<()> {
        if self
            .access
            .directory()
            .find_by_id(principal_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound(format!("principal:{principal_id}")));
        }
        Ok(())
    }

    /// Create or replace the grant of `principal_id` on `node`.
    ///
    /// Returns the stored grant, or `None` when neither flag is set (which
    /// removes any existing grant).
    ///
    /// ## Errors
    ///
    /// Guard errors for the actor, `NotFound` for an unknown principal, and
    /// store failures.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn set_grant(
        &self,
        actor: &Principal,
        node: NodeRef,
        principal_id: uuid::Uuid,
        can_read: bool,
        can_write: bool,
    ) -> ServiceResult<Option<Grant>> {
        self.require_write(actor, node).await?;
        self.require_principal(principal_id).await?;

        let grants = self.access.grants();
        grants
            .upsert(principal_id, node, can_read, can_write)
            .await?;

        tracing::info!("Grant stored");

        grants.get(principal_id, node).await
    }

    /// Remove the grant of `principal_id` on `node`. Returns whether one existed.
    ///
    /// ## Errors
    ///
    /// Guard errors for the actor and store failures.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn revoke_grant(
        &self,
        actor: &Principal,
        node: NodeRef,
        principal_id: uuid::Uuid,
    ) -> ServiceResult<bool> {
        self.require_write(actor, node).await?;

        let revoked = self.access.grants().revoke(principal_id, node).await?;

        tracing::info!(revoked, "Grant revoked");

        Ok(revoked)
    }

    /// List the grants on `node`.
    ///
    /// ## Errors
    ///
    /// Guard errors for the actor and store failures.
    pub async fn list_grants(&self, actor: &Principal, node: NodeRef) -> ServiceResult<Vec<Grant>> {
        self.require_write(actor, node).await?;
        self.access.grants().list_for_node(node).await
    }

    /// Make `owner_id` the owner of the part.
    ///
    /// ## Errors
    ///
    /// Guard errors for the actor, `NotFound` for an unknown owner, and store
    /// failures.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn assign_owner(
        &self,
        actor: &Principal,
        part_id: uuid::Uuid,
        owner_id: uuid::Uuid,
    ) -> ServiceResult<()> {
        self.bulk_assign_owner(actor, &[part_id], owner_id)
            .await
            .map(|_| ())
    }

    /// Clear the owner of the part.
    ///
    /// ## Errors
    ///
    /// Guard errors for the actor and store failures.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn unassign_owner(&self, actor: &Principal, part_id: uuid::Uuid) -> ServiceResult<()> {
        self.require_write(actor, NodeRef::part(part_id)).await?;
        self.access.ownership().set_owner(&[part_id], None).await?;

        tracing::info!("Part owner cleared");

        Ok(())
    }

    /// Make `owner_id` the owner of every listed part.
    ///
    /// All parts must pass the write guard before any of them is updated.
    /// Returns the number of parts updated.
    ///
    /// ## Errors
    ///
    /// `ValidationError` for an empty list, guard errors for the actor on any
    /// part, `NotFound` for an unknown owner, and store failures.
    #[tracing::instrument(skip(self, actor, part_ids), fields(
        actor_id = %actor.id,
        part_count = part_ids.len()
    ))]
    pub async fn bulk_assign_owner(
        &self,
        actor: &Principal,
        part_ids: &[uuid::Uuid],
        owner_id: uuid::Uuid,
    ) -> ServiceResult<usize> {
        let mut part_ids = part_ids.to_vec();
        part_ids.sort_unstable();
        part_ids.dedup();

        if part_ids.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one part is required".to_string(),
            ));
        }

        let guard = self.access.guard(NodeKind::Part);
        futures::future::try_join_all(
            part_ids
                .iter()
                .map(|&part_id| guard.require(Some(actor), part_id, Operation::Write)),
        )
        .await?;
        self.require_principal(owner_id).await?;

        let updated = self
            .access
            .ownership()
            .set_owner(&part_ids, Some(owner_id))
            .await?;

        tracing::info!(updated, "Part owner assigned");

        Ok(updated)
    }

    /// Drop every grant attached to a node that the registry has deleted.
    ///
    /// ## Errors
    ///
    /// Store failures.
    #[tracing::instrument(skip(self))]
    pub async fn forget_node(&self, node: NodeRef) -> ServiceResult<usize> {
        let removed = self.access.grants().delete_all_for_node(node).await?;

        tracing::info!(removed, "Grants removed for deleted node");

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;
    use vigie_core::types::Role;

    use super::*;
    use crate::auth::{
        hierarchy::HierarchyAccessor,
        memory::{MemoryDirectory, MemoryGrantStore, MemoryHierarchy},
    };

    struct Fixture {
        access: AccessControl,
        tree: Arc<MemoryHierarchy>,
        directory: Arc<MemoryDirectory>,
        site: Uuid,
        level: Uuid,
        parts: [Uuid; 2],
    }

    async fn fixture() -> Fixture {
        let grants = Arc::new(MemoryGrantStore::new());
        let tree = Arc::new(MemoryHierarchy::new());
        let directory = Arc::new(MemoryDirectory::new());

        let (site, building, level) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
        let parts = [Uuid::now_v7(), Uuid::now_v7()];
        tree.add_site(site, None).await;
        tree.add_building(building, site).await.unwrap();
        tree.add_level(level, building).await.unwrap();
        for part in parts {
            tree.add_part(part, level, None).await.unwrap();
        }

        Fixture {
            access: AccessControl::memory(grants, tree.clone(), directory.clone()),
            tree,
            directory,
            site,
            level,
            parts,
        }
    }

    async fn register(directory: &MemoryDirectory, role: Option<Role>) -> Principal {
        let principal = Principal {
            id: Uuid::now_v7(),
            email: format!("{}@example.org", Uuid::now_v7()),
            display_name: None,
            role,
            organization: None,
        };
        directory.insert(principal.clone(), None).await;
        principal
    }

    #[test_log::test(tokio::test)]
    async fn set_grant_requires_write_on_the_node() {
        let fx = fixture().await;
        let actor = register(&fx.directory, Some(Role::User)).await;
        let target = register(&fx.directory, Some(Role::Viewer)).await;
        let site = NodeRef::site(fx.site);

        let denied = fx
            .access
            .admin()
            .set_grant(&actor, site, target.id, true, false)
            .await;
        assert!(matches!(denied, Err(ServiceError::AuthorizationError(_))));

        let root = register(&fx.directory, Some(Role::SuperAdmin)).await;
        fx.access
            .admin()
            .set_grant(&root, site, actor.id, false, true)
            .await
            .unwrap();

        let stored = fx
            .access
            .admin()
            .set_grant(&actor, site, target.id, true, false)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.can_read);
        assert!(!stored.can_write);
    }

    #[test_log::test(tokio::test)]
    async fn empty_grant_removes_the_tuple() {
        let fx = fixture().await;
        let root = register(&fx.directory, Some(Role::SuperAdmin)).await;
        let target = register(&fx.directory, Some(Role::User)).await;
        let level = NodeRef::level(fx.level);
        let admin = fx.access.admin();

        admin
            .set_grant(&root, level, target.id, true, true)
            .await
            .unwrap();
        let cleared = admin
            .set_grant(&root, level, target.id, false, false)
            .await
            .unwrap();

        assert_eq!(cleared, None);
        assert!(admin.list_grants(&root, level).await.unwrap().is_empty());
        assert!(!admin.revoke_grant(&root, level, target.id).await.unwrap());
    }

    #[test_log::test(tokio::test)]
    async fn unknown_node_or_principal_is_not_found() {
        let fx = fixture().await;
        let root = register(&fx.directory, Some(Role::SuperAdmin)).await;
        let admin = fx.access.admin();

        let missing_node = admin
            .set_grant(&root, NodeRef::building(Uuid::now_v7()), root.id, true, false)
            .await;
        assert!(matches!(missing_node, Err(ServiceError::NotFound(_))));

        let missing_principal = admin
            .set_grant(&root, NodeRef::site(fx.site), Uuid::now_v7(), true, false)
            .await;
        assert!(matches!(missing_principal, Err(ServiceError::NotFound(_))));
    }

    #[test_log::test(tokio::test)]
    async fn bulk_assignment_is_all_or_nothing() {
        let fx = fixture().await;
        let actor = register(&fx.directory, Some(Role::User)).await;
        let owner = register(&fx.directory, Some(Role::UserEntreprise)).await;
        let root = register(&fx.directory, Some(Role::SuperAdmin)).await;
        let admin = fx.access.admin();

        admin
            .set_grant(&root, NodeRef::part(fx.parts[0]), actor.id, true, true)
            .await
            .unwrap();

        let denied = admin.bulk_assign_owner(&actor, &fx.parts, owner.id).await;
        assert!(matches!(denied, Err(ServiceError::AuthorizationError(_))));
        for part in fx.parts {
            assert_eq!(fx.tree.part_owner(part).await.unwrap(), None);
        }

        admin
            .set_grant(&root, NodeRef::level(fx.level), actor.id, false, true)
            .await
            .unwrap();
        let updated = admin
            .bulk_assign_owner(&actor, &[fx.parts[0], fx.parts[1], fx.parts[0]], owner.id)
            .await
            .unwrap();
        assert_eq!(updated, 2);
        for part in fx.parts {
            assert_eq!(fx.tree.part_owner(part).await.unwrap(), Some(owner.id));
        }
    }

    #[test_log::test(tokio::test)]
    async fn bulk_assignment_rejects_empty_list() {
        let fx = fixture().await;
        let root = register(&fx.directory, Some(Role::SuperAdmin)).await;

        let result = fx.access.admin().bulk_assign_owner(&root, &[], root.id).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test_log::test(tokio::test)]
    async fn owner_gains_and_loses_access_with_assignment() {
        let fx = fixture().await;
        let root = register(&fx.directory, Some(Role::SuperAdmin)).await;
        let owner = register(&fx.directory, Some(Role::UserEntreprise)).await;
        let admin = fx.access.admin();
        let site = NodeRef::site(fx.site);

        admin.assign_owner(&root, fx.parts[1], owner.id).await.unwrap();
        let summary = fx.access.resolver().access_summary(&owner, site).await.unwrap();
        assert!(summary.read);
        assert!(!summary.write);

        admin.unassign_owner(&root, fx.parts[1]).await.unwrap();
        let summary = fx.access.resolver().access_summary(&owner, site).await.unwrap();
        assert!(!summary.read);
    }

    #[test_log::test(tokio::test)]
    async fn forget_node_drops_its_grants() {
        let fx = fixture().await;
        let root = register(&fx.directory, Some(Role::SuperAdmin)).await;
        let alice = register(&fx.directory, Some(Role::User)).await;
        let bob = register(&fx.directory, Some(Role::User)).await;
        let part = NodeRef::part(fx.parts[0]);
        let admin = fx.access.admin();

        admin.set_grant(&root, part, alice.id, true, false).await.unwrap();
        admin.set_grant(&root, part, bob.id, true, true).await.unwrap();

        assert_eq!(admin.forget_node(part).await.unwrap(), 2);
        assert!(admin.list_grants(&root, part).await.unwrap().is_empty());
    }
}
