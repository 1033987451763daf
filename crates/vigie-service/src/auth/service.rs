//! Authorization service for centralized access control.
//!
//! `AccessControl` bundles the resolver with the stores it reads and the
//! stores administrative operations write. Handlers obtain it from the depot.

use std::sync::Arc;

use vigie_core::types::NodeKind;

use super::{
    admin::Admin,
    directory::PrincipalDirectory,
    grant::GrantStore,
    guard::Guard,
    hierarchy::HierarchyAccessor,
    memory::{MemoryDirectory, MemoryGrantStore, MemoryHierarchy},
    ownership::OwnershipStore,
    postgres::{PgDirectory, PgGrantStore, PgHierarchy, SharedProvider},
    resolver::Resolver,
};

pub struct AccessControl {
    resolver: Resolver,
    grants: Arc<dyn GrantStore>,
    directory: Arc<dyn PrincipalDirectory>,
    ownership: Arc<dyn OwnershipStore>,
}

impl AccessControl {
    #[must_use]
    pub fn new(
        grants: Arc<dyn GrantStore>,
        hierarchy: Arc<dyn HierarchyAccessor>,
        directory: Arc<dyn PrincipalDirectory>,
        ownership: Arc<dyn OwnershipStore>,
    ) -> Self {
        Self {
            resolver: Resolver::new(grants.clone(), hierarchy),
            grants,
            directory,
            ownership,
        }
    }

    /// Build an access control layer over Postgres.
    #[must_use]
    pub fn postgres(provider: SharedProvider) -> Self {
        let tree = Arc::new(PgHierarchy::new(provider.clone()));
        Self::new(
            Arc::new(PgGrantStore::new(provider.clone())),
            tree.clone(),
            Arc::new(PgDirectory::new(provider)),
            tree,
        )
    }

    /// Build an access control layer over in-memory stores.
    #[must_use]
    pub fn memory(
        grants: Arc<MemoryGrantStore>,
        tree: Arc<MemoryHierarchy>,
        directory: Arc<MemoryDirectory>,
    ) -> Self {
        Self::new(grants, tree.clone(), directory, tree)
    }

    #[must_use]
    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    #[must_use]
    pub const fn guard(&self, kind: NodeKind) -> Guard<'_> {
        Guard::new(kind, &self.resolver)
    }

    #[must_use]
    pub const fn admin(&self) -> Admin<'_> {
        Admin::new(self)
    }

    #[must_use]
    pub fn grants(&self) -> &dyn GrantStore {
        self.grants.as_ref()
    }

    #[must_use]
    pub fn directory(&self) -> &dyn PrincipalDirectory {
        self.directory.as_ref()
    }

    #[must_use]
    pub fn ownership(&self) -> &dyn OwnershipStore {
        self.ownership.as_ref()
    }
}
