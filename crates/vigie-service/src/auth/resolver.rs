//! The authorization decision chain.
//!
//! Rules are evaluated in a fixed order and the first one that allows wins:
//!
//! 1. universal role (super-admin)
//! 2. ownership (user-entreprise; part read/write, site read)
//! 3. client association (sites only)
//! 4. explicit grant on the node itself
//! 5. explicit grants on each ancestor, nearest first
//! 6. deny
//!
//! No rule can turn an earlier allow into a deny, and read and write are
//! decided independently.

use std::sync::Arc;

use serde::Serialize;
use vigie_core::types::{NodeKind, NodeRef, Operation, Principal};

use crate::error::{ServiceError, ServiceResult};

use super::{
    capability::{Capabilities, ownership_allows},
    grant::GrantStore,
    hierarchy::HierarchyAccessor,
};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    /// Returns `true` if access is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Convert to a `Result`, returning `Err(ServiceError::AuthorizationError)` if denied.
    ///
    /// ## Errors
    ///
    /// Returns `AuthorizationError` carrying `message` if access is denied.
    pub fn require(self, message: impl FnOnce() -> String) -> ServiceResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(ServiceError::AuthorizationError(message())),
        }
    }
}

/// The rule that allowed a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedRule {
    Universal,
    Ownership,
    ClientAssociation,
    DirectGrant,
    InheritedGrant(NodeKind),
}

/// Read and write decisions for one node, computed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessSummary {
    pub read: bool,
    pub write: bool,
}

/// Decides whether a principal may read or write a node.
///
/// The resolver is stateless; it only reads from the grant store and the
/// hierarchy accessor, and several lookups within one decision may observe
/// different committed states.
pub struct Resolver {
    grants: Arc<dyn GrantStore>,
    hierarchy: Arc<dyn HierarchyAccessor>,
}

impl Resolver {
    #[must_use]
    pub fn new(grants: Arc<dyn GrantStore>, hierarchy: Arc<dyn HierarchyAccessor>) -> Self {
        Self { grants, hierarchy }
    }

    #[must_use]
    pub fn hierarchy(&self) -> &dyn HierarchyAccessor {
        self.hierarchy.as_ref()
    }

    /// Decide `op` on `node` for `principal`.
    ///
    /// The node must exist; existence is checked by the caller.
    ///
    /// ## Errors
    ///
    /// Propagates store and accessor failures. A denial is not an error.
    #[tracing::instrument(skip(self, principal), fields(
        principal_id = %principal.id,
        role = ?principal.role,
        node = %node,
        op = %op
    ))]
    pub async fn decide(
        &self,
        principal: &Principal,
        node: NodeRef,
        op: Operation,
    ) -> ServiceResult<Decision> {
        match self.explain(principal, node, op).await? {
            Some(rule) => {
                tracing::debug!(rule = ?rule, "Authorization granted");
                Ok(Decision::Allow)
            }
            None => {
                tracing::debug!("Authorization denied");
                Ok(Decision::Deny)
            }
        }
    }

    /// Run the decision chain and report which rule allowed, if any.
    ///
    /// ## Errors
    ///
    /// Propagates store and accessor failures.
    pub async fn explain(
        &self,
        principal: &Principal,
        node: NodeRef,
        op: Operation,
    ) -> ServiceResult<Option<MatchedRule>> {
        let capabilities = Capabilities::for_role(principal.role);

        if capabilities.universal {
            return Ok(Some(MatchedRule::Universal));
        }

        if capabilities.ownership_shortcut
            && ownership_allows(node.kind, op)
            && self.owns(principal, node).await?
        {
            return Ok(Some(MatchedRule::Ownership));
        }

        if node.kind == NodeKind::Site
            && self.hierarchy.site_client(node.id).await? == Some(principal.id)
        {
            return Ok(Some(MatchedRule::ClientAssociation));
        }

        self.grant_walk(principal.id, node, op).await
    }

    /// Decide read and write on the node.
    ///
    /// ## Errors
    ///
    /// Propagates store and accessor failures.
    pub async fn access_summary(
        &self,
        principal: &Principal,
        node: NodeRef,
    ) -> ServiceResult<AccessSummary> {
        let read = self.decide(principal, node, Operation::Read).await?;
        let write = self.decide(principal, node, Operation::Write).await?;
        Ok(AccessSummary {
            read: read.is_allowed(),
            write: write.is_allowed(),
        })
    }

    async fn owns(&self, principal: &Principal, node: NodeRef) -> ServiceResult<bool> {
        match node.kind {
            NodeKind::Site => {
                self.hierarchy
                    .exists_owned_part_under(node.id, principal.id)
                    .await
            }
            NodeKind::Part => Ok(self.hierarchy.part_owner(node.id).await? == Some(principal.id)),
            NodeKind::Building | NodeKind::Level => Ok(false),
        }
    }

    /// Look for a grant allowing `op` on the node, then on each ancestor.
    async fn grant_walk(
        &self,
        principal_id: uuid::Uuid,
        node: NodeRef,
        op: Operation,
    ) -> ServiceResult<Option<MatchedRule>> {
        if self.grant_allows(principal_id, node, op).await? {
            return Ok(Some(MatchedRule::DirectGrant));
        }

        for ancestor in self.hierarchy.ancestors_of(node).await? {
            if self.grant_allows(principal_id, ancestor, op).await? {
                return Ok(Some(MatchedRule::InheritedGrant(ancestor.kind)));
            }
        }

        Ok(None)
    }

    async fn grant_allows(
        &self,
        principal_id: uuid::Uuid,
        node: NodeRef,
        op: Operation,
    ) -> ServiceResult<bool> {
        let grant = self.grants.get(principal_id, node).await?;

        tracing::trace!(node = %node, grant = ?grant, "Grant lookup");

        Ok(grant.is_some_and(|g| g.allows(op)))
    }
}
