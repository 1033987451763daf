//! Grant store interface.
//!
//! Each hierarchy level has its own keyed collection; the `kind` of the
//! [`NodeRef`] selects which one an operation touches. No operation joins
//! across levels.

use salvo::async_trait;
use vigie_core::types::{Grant, NodeRef};

use crate::error::ServiceResult;

#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Stores `(principal, node, can_read, can_write)`, replacing any existing
    /// tuple for the pair. Storing neither flag removes the tuple.
    async fn upsert(
        &self,
        principal_id: uuid::Uuid,
        node: NodeRef,
        can_read: bool,
        can_write: bool,
    ) -> ServiceResult<()>;

    /// Returns the grant for the pair. Never returns a grant with neither flag set.
    async fn get(&self, principal_id: uuid::Uuid, node: NodeRef) -> ServiceResult<Option<Grant>>;

    /// Removes the grant for the pair. Returns whether one existed.
    async fn revoke(&self, principal_id: uuid::Uuid, node: NodeRef) -> ServiceResult<bool>;

    /// Removes every grant on the node. Returns the number removed.
    async fn delete_all_for_node(&self, node: NodeRef) -> ServiceResult<usize>;

    /// Lists every grant on the node.
    async fn list_for_node(&self, node: NodeRef) -> ServiceResult<Vec<Grant>>;
}
