//! Identity & role provider interface.

use salvo::async_trait;
use vigie_core::types::{Principal, Role};

use crate::error::ServiceResult;

/// A principal together with its stored credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPrincipal {
    pub principal: Principal,
    pub password_hash: Option<String>,
}

#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    async fn find_by_id(&self, id: uuid::Uuid) -> ServiceResult<Option<Principal>>;

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<StoredPrincipal>>;

    /// Returns the principal with this email, creating it with the given name
    /// and role when it does not exist yet.
    async fn ensure_principal(
        &self,
        email: &str,
        display_name: &str,
        role: Option<Role>,
    ) -> ServiceResult<Principal>;
}
