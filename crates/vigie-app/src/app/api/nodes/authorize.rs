use salvo::{Depot, Request, Response, Router, handler, http::StatusCode};

use vigie_core::types::Operation;
use vigie_service::auth::get_access_control_from_depot;

use crate::error::AppResult;

use super::{node_from_request, path_param, require_principal};

/// ## Summary
/// GET /{kind}/{id}/authorize/{op} - 204 when the caller may perform `op`,
/// 403 with a fixed message otherwise.
#[handler]
async fn authorize(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match check(req, depot).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => err.render(res),
    }
}

async fn check(req: &Request, depot: &Depot) -> AppResult<()> {
    let principal = require_principal(depot)?;
    let node = node_from_request(req)?;
    let op: Operation = path_param(req, "op")?.parse()?;
    let access = get_access_control_from_depot(depot)?;

    access
        .guard(node.kind)
        .require(Some(principal), node.id, op)
        .await?;
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("authorize/{op}").get(authorize)
}
