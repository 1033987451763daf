use salvo::Depot;
use tracing::error;

use crate::config::get_config_from_depot;
use vigie_service::{
    auth::{
        DepotPrincipal, authenticate::authenticate, depot::depot_keys,
        get_access_control_from_depot,
    },
    error::ServiceError,
};

/// ## Summary
/// Middleware handler for authentication.
///
/// Resolves the request's principal with the configured method and stores it
/// in the depot. Requests that carry no valid credentials continue as
/// anonymous; handlers that need a principal answer 401 themselves.
pub struct AuthMiddleware;

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        if req.method() == salvo::http::Method::OPTIONS {
            depot.insert(depot_keys::AUTHENTICATED_PRINCIPAL, DepotPrincipal::Anonymous);
            return;
        }

        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let access = match get_access_control_from_depot(depot) {
            Ok(access) => access,
            Err(e) => {
                error!(error = ?e, "Failed to get access control from depot");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        match authenticate(req.headers(), access.directory(), &config).await {
            Ok(principal) => {
                tracing::debug!(
                    principal_id = %principal.id,
                    role = ?principal.role,
                    "Principal authenticated"
                );
                depot.insert(
                    depot_keys::AUTHENTICATED_PRINCIPAL,
                    DepotPrincipal::Authenticated(principal),
                );
            }
            Err(ServiceError::NotAuthenticated | ServiceError::InvalidConfiguration(_)) => {
                tracing::debug!("Request not authenticated, continuing as anonymous");
                depot.insert(depot_keys::AUTHENTICATED_PRINCIPAL, DepotPrincipal::Anonymous);
            }
            Err(service_err) => {
                error!(error = ?service_err, "Authentication failed with error");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                res.body("Internal Server Error");
                ctrl.skip_rest();
            }
        }
    }
}
