//! Guarded routes on the containment tree.
//!
//! Every route is addressed as `/{kind}/{id}/...` where `kind` is one of the
//! route segments `sites`, `buildings`, `levels` or `parts`.

use salvo::{Depot, Request, Router};
use uuid::Uuid;

use vigie_core::types::{NodeKind, NodeRef, Principal};
use vigie_service::{auth::get_principal_from_depot, error::ServiceError};

use crate::error::{AppError, AppResult};

mod access;
mod authorize;
mod grants;
mod owner;

#[must_use]
pub fn routes() -> Router {
    Router::new().push(owner::routes()).push(
        Router::with_path("{kind}/{id}")
            .push(access::routes())
            .push(authorize::routes())
            .push(grants::routes()),
    )
}

fn path_param(req: &Request, name: &str) -> AppResult<String> {
    req.param::<String>(name)
        .ok_or_else(|| AppError::InvalidRequest(format!("Missing path parameter `{name}`")))
}

/// ## Summary
/// Parses an id taken from the path or a request body.
///
/// ## Errors
/// Returns `InvalidRequest` if the value is not a UUID.
pub fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_err| AppError::InvalidRequest(format!("Invalid {what} id")))
}

/// ## Summary
/// Extracts the node addressed by the `{kind}/{id}` path segments.
///
/// ## Errors
/// Returns `NotFound` for an unknown kind segment and `InvalidRequest` for a
/// malformed id.
fn node_from_request(req: &Request) -> AppResult<NodeRef> {
    let segment = path_param(req, "kind")?;
    let kind = NodeKind::from_path_segment(&segment)
        .ok_or_else(|| ServiceError::NotFound(format!("route /{segment}")))?;
    let id = parse_id(&path_param(req, "id")?, kind.as_str())?;
    Ok(NodeRef::new(kind, id))
}

fn require_principal(depot: &Depot) -> AppResult<&Principal> {
    Ok(get_principal_from_depot(depot)?)
}
