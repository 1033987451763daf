use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Deserialize;

use vigie_core::types::Grant;
use vigie_service::auth::get_access_control_from_depot;

use crate::error::{AppError, AppResult};

use super::{node_from_request, parse_id, path_param, require_principal};

/// ## Summary
/// Grant upsert request payload
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub can_read: bool,
    pub can_write: bool,
}

/// ## Summary
/// GET /{kind}/{id}/grants - List the grants attached to the node.
#[handler]
async fn list_grants(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match list(req, depot).await {
        Ok(grants) => res.render(Json(grants)),
        Err(err) => err.render(res),
    }
}

async fn list(req: &Request, depot: &Depot) -> AppResult<Vec<Grant>> {
    let actor = require_principal(depot)?;
    let node = node_from_request(req)?;
    let access = get_access_control_from_depot(depot)?;

    Ok(access.admin().list_grants(actor, node).await?)
}

/// ## Summary
/// PUT /{kind}/{id}/grants/{principal_id} - Create or replace a grant.
///
/// Answers 200 with the stored grant, or 204 when both flags are false and
/// the grant was removed.
#[handler]
async fn put_grant(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match upsert(req, depot).await {
        Ok(Some(grant)) => res.render(Json(grant)),
        Ok(None) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => err.render(res),
    }
}

async fn upsert(req: &mut Request, depot: &Depot) -> AppResult<Option<Grant>> {
    let actor = require_principal(depot)?;
    let node = node_from_request(req)?;
    let principal_id = parse_id(&path_param(req, "principal_id")?, "principal")?;

    let body: GrantRequest = req.parse_json().await.map_err(|e| {
        tracing::debug!(error = ?e, "Failed to parse grant request");
        AppError::InvalidRequest("Invalid request body".to_string())
    })?;

    let access = get_access_control_from_depot(depot)?;
    Ok(access
        .admin()
        .set_grant(actor, node, principal_id, body.can_read, body.can_write)
        .await?)
}

/// ## Summary
/// DELETE /{kind}/{id}/grants/{principal_id} - Revoke a grant. Idempotent.
#[handler]
async fn delete_grant(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match revoke(req, depot).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => err.render(res),
    }
}

async fn revoke(req: &Request, depot: &Depot) -> AppResult<()> {
    let actor = require_principal(depot)?;
    let node = node_from_request(req)?;
    let principal_id = parse_id(&path_param(req, "principal_id")?, "principal")?;
    let access = get_access_control_from_depot(depot)?;

    access.admin().revoke_grant(actor, node, principal_id).await?;
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("grants")
        .get(list_grants)
        .push(
            Router::with_path("{principal_id}")
                .put(put_grant)
                .delete(delete_grant),
        )
}
