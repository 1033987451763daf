//! Depot helpers for extracting authorization context from Salvo requests.

use std::sync::Arc;

use salvo::async_trait;
use vigie_core::{error::CoreError, types::Principal};

use crate::error::{ServiceError, ServiceResult};

use super::service::AccessControl;

pub mod depot_keys {
    pub const AUTHENTICATED_PRINCIPAL: &str = "__authenticated_principal";
}

/// What the authentication middleware left in the depot.
#[derive(Debug, Clone)]
pub enum DepotPrincipal {
    Authenticated(Principal),
    Anonymous,
}

/// Get the authenticated principal from the depot.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if no principal is found in the depot or if the
/// request is anonymous.
pub fn get_principal_from_depot(depot: &salvo::Depot) -> ServiceResult<&Principal> {
    let depot_principal = depot
        .get::<DepotPrincipal>(depot_keys::AUTHENTICATED_PRINCIPAL)
        .map_err(|_e| ServiceError::NotAuthenticated)?;

    match depot_principal {
        DepotPrincipal::Authenticated(principal) => Ok(principal),
        DepotPrincipal::Anonymous => Err(ServiceError::NotAuthenticated),
    }
}

/// Injects the shared [`AccessControl`] into every request's depot.
pub struct AccessControlHandler {
    pub access: Arc<AccessControl>,
}

#[async_trait]
impl salvo::Handler for AccessControlHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.access));
    }
}

/// ## Summary
/// Retrieves the access control layer from the depot.
///
/// ## Errors
/// Returns an error if no access control layer was injected.
pub fn get_access_control_from_depot(depot: &salvo::Depot) -> ServiceResult<Arc<AccessControl>> {
    depot
        .obtain::<Arc<AccessControl>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Access control not found in depot").into())
}
