//! Request guards.
//!
//! A guard is bound to one hierarchy level. It checks that the target node
//! exists before asking the resolver, so an unknown node yields `NotFound`
//! rather than a denial.

use vigie_core::types::{NodeKind, NodeRef, Operation, Principal, Role};

use crate::error::{ServiceError, ServiceResult};

use super::resolver::{AccessSummary, Decision, Resolver};

pub struct Guard<'a> {
    kind: NodeKind,
    resolver: &'a Resolver,
}

impl<'a> Guard<'a> {
    #[must_use]
    pub const fn new(kind: NodeKind, resolver: &'a Resolver) -> Self {
        Self { kind, resolver }
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Decide `op` on the node with this id.
    ///
    /// ## Errors
    ///
    /// - `NotAuthenticated` if no principal is supplied.
    /// - `NotFound` if the node does not exist.
    /// - Store failures are propagated.
    pub async fn check(
        &self,
        principal: Option<&Principal>,
        node_id: uuid::Uuid,
        op: Operation,
    ) -> ServiceResult<Decision> {
        let principal = principal.ok_or(ServiceError::NotAuthenticated)?;
        let node = self.existing(node_id).await?;

        self.resolver.decide(principal, node, op).await
    }

    /// Read and write decisions on the node with this id.
    ///
    /// ## Errors
    ///
    /// Same as [`Guard::check`].
    pub async fn summary(
        &self,
        principal: Option<&Principal>,
        node_id: uuid::Uuid,
    ) -> ServiceResult<AccessSummary> {
        let principal = principal.ok_or(ServiceError::NotAuthenticated)?;
        let node = self.existing(node_id).await?;

        self.resolver.access_summary(principal, node).await
    }

    async fn existing(&self, node_id: uuid::Uuid) -> ServiceResult<NodeRef> {
        let node = NodeRef::new(self.kind, node_id);
        if self.resolver.hierarchy().exists(node).await? {
            Ok(node)
        } else {
            Err(ServiceError::NotFound(node.to_string()))
        }
    }

    /// Like [`Guard::check`], but a denial becomes `AuthorizationError`.
    ///
    /// ## Errors
    ///
    /// Everything [`Guard::check`] returns, plus `AuthorizationError` with a
    /// fixed message when access is denied.
    pub async fn require(
        &self,
        principal: Option<&Principal>,
        node_id: uuid::Uuid,
        op: Operation,
    ) -> ServiceResult<()> {
        let decision = self.check(principal, node_id, op).await?;
        let role = principal.and_then(|p| p.role);
        decision.require(|| deny_message(role, self.kind, op))
    }
}

/// The message shown on a denial.
///
/// It depends only on the role, the node kind and the operation, never on
/// which grants exist.
#[must_use]
pub fn deny_message(role: Option<Role>, kind: NodeKind, op: Operation) -> String {
    let verb = match op {
        Operation::Read => "view",
        Operation::Write => "modify",
    };

    match (role, op) {
        (None, _) => {
            format!("Your account has no role assigned and cannot {verb} this {kind}")
        }
        (Some(Role::Viewer), Operation::Write) => {
            format!("Your account has read-only access and cannot {verb} this {kind}")
        }
        _ => format!("You are not allowed to {verb} this {kind}"),
    }
}
