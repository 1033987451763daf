use salvo::{Depot, Response, Router, handler, writing::Json};

use vigie_service::auth::get_principal_from_depot;

use crate::error::AppError;

/// ## Summary
/// Returns the authenticated principal as JSON.
/// The principal is retrieved from the depot set by the `AuthMiddleware`.
#[handler]
async fn whoami(depot: &Depot, res: &mut Response) {
    match get_principal_from_depot(depot) {
        Ok(principal) => res.render(Json(principal.clone())),
        Err(err) => AppError::from(err).render(res),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("whoami").get(whoami)
}
