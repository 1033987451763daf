mod app_specific;
mod nodes;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

pub use vigie_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, BUILDING_ROUTE_PREFIX, LEVEL_ROUTE_PREFIX,
    PART_ROUTE_PREFIX, SITE_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the main API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .hoop(AuthMiddleware)
        .push(app_specific::routes())
        .push(nodes::routes())
}
