//! Part ownership mutations.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::{connection::DbConnection, schema::part};
use crate::error::DbResult;

/// ## Summary
/// Sets (or clears, with `None`) the owner of every listed part.
///
/// Returns the number of parts updated; unknown ids are ignored.
///
/// ## Errors
/// Returns an error if the statement fails.
pub async fn set_owner(
    conn: &mut DbConnection<'_>,
    part_ids: &[uuid::Uuid],
    owner_id: Option<uuid::Uuid>,
) -> DbResult<usize> {
    Ok(diesel::update(part::table.filter(part::id.eq_any(part_ids)))
        .set((
            part::owner_id.eq(owner_id),
            part::updated_at.eq(chrono::Utc::now()),
        ))
        .execute(conn)
        .await?)
}
