use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vigie_core::constants::PART_ROUTE_COMPONENT;
use vigie_service::auth::get_access_control_from_depot;

use crate::error::{AppError, AppResult};

use super::{parse_id, path_param, require_principal};

/// ## Summary
/// Single part owner request payload
#[derive(Debug, Deserialize)]
pub struct OwnerRequest {
    pub owner_id: Uuid,
}

/// ## Summary
/// Bulk owner assignment request payload
#[derive(Debug, Deserialize)]
pub struct BulkOwnerRequest {
    pub part_ids: Vec<Uuid>,
    pub owner_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct BulkOwnerResponse {
    pub updated: usize,
}

async fn parse_body<T: for<'de> Deserialize<'de>>(req: &mut Request) -> AppResult<T> {
    req.parse_json().await.map_err(|e| {
        tracing::debug!(error = ?e, "Failed to parse owner request");
        AppError::InvalidRequest("Invalid request body".to_string())
    })
}

/// ## Summary
/// PUT /parts/{id}/owner - Make a principal the owner of the part.
#[handler]
async fn assign_owner(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match assign(req, depot).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => err.render(res),
    }
}

async fn assign(req: &mut Request, depot: &Depot) -> AppResult<()> {
    let actor = require_principal(depot)?;
    let part_id = parse_id(&path_param(req, "id")?, "part")?;
    let body: OwnerRequest = parse_body(req).await?;
    let access = get_access_control_from_depot(depot)?;

    access
        .admin()
        .assign_owner(actor, part_id, body.owner_id)
        .await?;
    Ok(())
}

/// ## Summary
/// DELETE /parts/{id}/owner - Clear the owner of the part.
#[handler]
async fn unassign_owner(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match unassign(req, depot).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => err.render(res),
    }
}

async fn unassign(req: &Request, depot: &Depot) -> AppResult<()> {
    let actor = require_principal(depot)?;
    let part_id = parse_id(&path_param(req, "id")?, "part")?;
    let access = get_access_control_from_depot(depot)?;

    access.admin().unassign_owner(actor, part_id).await?;
    Ok(())
}

/// ## Summary
/// POST /parts/owner - Assign one owner to several parts at once.
///
/// Nothing is updated unless the caller may write every listed part.
#[handler]
async fn bulk_assign_owner(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match bulk_assign(req, depot).await {
        Ok(updated) => res.render(Json(BulkOwnerResponse { updated })),
        Err(err) => err.render(res),
    }
}

async fn bulk_assign(req: &mut Request, depot: &Depot) -> AppResult<usize> {
    let actor = require_principal(depot)?;
    let body: BulkOwnerRequest = parse_body(req).await?;
    let access = get_access_control_from_depot(depot)?;

    Ok(access
        .admin()
        .bulk_assign_owner(actor, &body.part_ids, body.owner_id)
        .await?)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(PART_ROUTE_COMPONENT)
        .push(Router::with_path("owner").post(bulk_assign_owner))
        .push(
            Router::with_path("{id}/owner")
                .put(assign_owner)
                .delete(unassign_owner),
        )
}
