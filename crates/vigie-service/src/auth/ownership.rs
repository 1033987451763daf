use salvo::async_trait;

use crate::error::ServiceResult;

/// Part ownership mutations.
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    /// Sets (or clears, with `None`) the owner of every listed part. Returns
    /// the number of parts updated.
    async fn set_owner(
        &self,
        part_ids: &[uuid::Uuid],
        owner_id: Option<uuid::Uuid>,
    ) -> ServiceResult<usize>;
}
