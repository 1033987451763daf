//! Read-only lookups over the containment tree.

use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::{
    connection::DbConnection,
    schema::{building, level, part, site},
};
use crate::error::DbResult;

/// ## Summary
/// Returns whether a site with this id exists.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn site_exists(conn: &mut DbConnection<'_>, site_id: uuid::Uuid) -> DbResult<bool> {
    Ok(diesel::select(exists(site::table.find(site_id)))
        .get_result::<bool>(conn)
        .await?)
}

/// ## Summary
/// Returns the site owning the building, or `None` if the building does not exist.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn building_site(
    conn: &mut DbConnection<'_>,
    building_id: uuid::Uuid,
) -> DbResult<Option<uuid::Uuid>> {
    Ok(building::table
        .find(building_id)
        .select(building::site_id)
        .first::<uuid::Uuid>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Returns the building containing the level, or `None` if the level does not exist.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn level_building(
    conn: &mut DbConnection<'_>,
    level_id: uuid::Uuid,
) -> DbResult<Option<uuid::Uuid>> {
    Ok(level::table
        .find(level_id)
        .select(level::building_id)
        .first::<uuid::Uuid>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Returns the level containing the part, or `None` if the part does not exist.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn part_level(
    conn: &mut DbConnection<'_>,
    part_id: uuid::Uuid,
) -> DbResult<Option<uuid::Uuid>> {
    Ok(part::table
        .find(part_id)
        .select(part::level_id)
        .first::<uuid::Uuid>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Returns the client association of a site.
///
/// The outer `Option` is `None` when the site does not exist.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn site_client(
    conn: &mut DbConnection<'_>,
    site_id: uuid::Uuid,
) -> DbResult<Option<Option<uuid::Uuid>>> {
    Ok(site::table
        .find(site_id)
        .select(site::client_id)
        .first::<Option<uuid::Uuid>>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Returns the owner of a part.
///
/// The outer `Option` is `None` when the part does not exist.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn part_owner(
    conn: &mut DbConnection<'_>,
    part_id: uuid::Uuid,
) -> DbResult<Option<Option<uuid::Uuid>>> {
    Ok(part::table
        .find(part_id)
        .select(part::owner_id)
        .first::<Option<uuid::Uuid>>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Returns whether the principal owns at least one part in any building of the site.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn owned_part_exists_under_site(
    conn: &mut DbConnection<'_>,
    site_id: uuid::Uuid,
    principal_id: uuid::Uuid,
) -> DbResult<bool> {
    Ok(diesel::select(exists(
        part::table
            .inner_join(level::table.inner_join(building::table))
            .filter(building::site_id.eq(site_id))
            .filter(part::owner_id.eq(principal_id)),
    ))
    .get_result::<bool>(conn)
    .await?)
}
