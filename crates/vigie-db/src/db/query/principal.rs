use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::{connection::DbConnection, schema::principal};
use crate::error::DbResult;
use crate::model::principal::{NewPrincipal, PrincipalRow};

/// ## Summary
/// Loads a principal by id.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn find_by_id(
    conn: &mut DbConnection<'_>,
    principal_id: uuid::Uuid,
) -> DbResult<Option<PrincipalRow>> {
    Ok(principal::table
        .find(principal_id)
        .select(PrincipalRow::as_select())
        .first::<PrincipalRow>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Loads a principal by email.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn find_by_email(
    conn: &mut DbConnection<'_>,
    email: &str,
) -> DbResult<Option<PrincipalRow>> {
    Ok(principal::table
        .filter(principal::email.eq(email))
        .select(PrincipalRow::as_select())
        .first::<PrincipalRow>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Inserts a principal and returns the stored row.
///
/// ## Errors
/// Returns an error if the insert fails (for example on a duplicate email).
pub async fn insert(
    conn: &mut DbConnection<'_>,
    new_principal: &NewPrincipal<'_>,
) -> DbResult<PrincipalRow> {
    Ok(diesel::insert_into(principal::table)
        .values(new_principal)
        .returning(PrincipalRow::as_returning())
        .get_result::<PrincipalRow>(conn)
        .await?)
}
