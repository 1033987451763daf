//! Containment tree accessor.
//!
//! The tree is a rooted forest: Part → Level → Building → Site. The accessor
//! is read-only; it reports `NotFound` for unknown nodes so callers can
//! answer 404 before authorization runs.

use salvo::async_trait;
use vigie_core::{constants::MAX_ANCESTOR_HOPS, types::NodeRef};

use crate::error::{ServiceError, ServiceResult};

#[async_trait]
pub trait HierarchyAccessor: Send + Sync {
    /// Returns whether the node exists.
    async fn exists(&self, node: NodeRef) -> ServiceResult<bool>;

    /// Returns the direct parent of the node, `None` for a site.
    ///
    /// ## Errors
    /// Returns `NotFound` if a non-site node does not exist.
    async fn parent_of(&self, node: NodeRef) -> ServiceResult<Option<NodeRef>>;

    /// Returns whether `principal_id` owns at least one part in any building
    /// of the site.
    async fn exists_owned_part_under(
        &self,
        site_id: uuid::Uuid,
        principal_id: uuid::Uuid,
    ) -> ServiceResult<bool>;

    /// Returns the client associated with the site, if any.
    ///
    /// ## Errors
    /// Returns `NotFound` if the site does not exist.
    async fn site_client(&self, site_id: uuid::Uuid) -> ServiceResult<Option<uuid::Uuid>>;

    /// Returns the owner of the part, if any.
    ///
    /// ## Errors
    /// Returns `NotFound` if the part does not exist.
    async fn part_owner(&self, part_id: uuid::Uuid) -> ServiceResult<Option<uuid::Uuid>>;

    /// Returns every ancestor of the node, nearest first.
    ///
    /// ## Errors
    /// Returns `NotFound` if the node does not exist, or `InvariantViolation`
    /// if the parent chain does not climb strictly towards a site.
    async fn ancestors_of(&self, node: NodeRef) -> ServiceResult<Vec<NodeRef>> {
        let mut ancestors = Vec::with_capacity(node.kind.depth());
        let mut current = node;

        while let Some(parent) = self.parent_of(current).await? {
            if Some(parent.kind) != current.kind.parent_kind()
                || ancestors.len() >= MAX_ANCESTOR_HOPS
            {
                return Err(ServiceError::InvariantViolation(
                    "containment chain does not terminate at a site",
                ));
            }
            ancestors.push(parent);
            current = parent;
        }

        Ok(ancestors)
    }
}
