use salvo::{Depot, Request, Response, Router, handler, writing::Json};

use vigie_service::auth::{AccessSummary, get_access_control_from_depot};

use crate::error::AppResult;

use super::{node_from_request, require_principal};

/// ## Summary
/// GET /{kind}/{id}/access - Read and write decisions for the caller.
///
/// ## Errors
/// 401 without a principal, 400 for a malformed id, 404 for an unknown node.
#[handler]
async fn access(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match summarize(req, depot).await {
        Ok(summary) => res.render(Json(summary)),
        Err(err) => err.render(res),
    }
}

async fn summarize(req: &Request, depot: &Depot) -> AppResult<AccessSummary> {
    let principal = require_principal(depot)?;
    let node = node_from_request(req)?;
    let control = get_access_control_from_depot(depot)?;

    Ok(control
        .guard(node.kind)
        .summary(Some(principal), node.id)
        .await?)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("access").get(access)
}
