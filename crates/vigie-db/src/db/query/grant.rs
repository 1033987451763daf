//! Per-level grant queries.
//!
//! The four grant tables share a shape but stay separate; each gets an
//! identical query module so callers pick the table by hierarchy level.

macro_rules! grant_table_queries {
    ($module:ident, $table:ident, $node_col:ident) => {
        pub mod $module {
            use diesel::prelude::*;
            use diesel_async::RunQueryDsl;

            use crate::db::{connection::DbConnection, schema::$table};
            use crate::error::DbResult;
            use crate::model::grant::GrantRow;

            /// ## Summary
            /// Loads the grant tuple for `(principal_id, node_id)`, if any.
            ///
            /// ## Errors
            /// Returns an error if the query fails.
            pub async fn get(
                conn: &mut DbConnection<'_>,
                principal_id: uuid::Uuid,
                node_id: uuid::Uuid,
            ) -> DbResult<Option<GrantRow>> {
                Ok($table::table
                    .filter($table::principal_id.eq(principal_id))
                    .filter($table::$node_col.eq(node_id))
                    .select((
                        $table::principal_id,
                        $table::$node_col,
                        $table::can_read,
                        $table::can_write,
                    ))
                    .first::<GrantRow>(conn)
                    .await
                    .optional()?)
            }

            /// ## Summary
            /// Inserts the grant tuple, replacing any existing one for the pair.
            ///
            /// ## Errors
            /// Returns an error if the statement fails (including unknown node or principal).
            pub async fn upsert(
                conn: &mut DbConnection<'_>,
                principal_id: uuid::Uuid,
                node_id: uuid::Uuid,
                can_read: bool,
                can_write: bool,
            ) -> DbResult<()> {
                let now = chrono::Utc::now();
                let _row_count = diesel::insert_into($table::table)
                    .values((
                        $table::principal_id.eq(principal_id),
                        $table::$node_col.eq(node_id),
                        $table::can_read.eq(can_read),
                        $table::can_write.eq(can_write),
                        $table::updated_at.eq(now),
                    ))
                    .on_conflict(($table::principal_id, $table::$node_col))
                    .do_update()
                    .set((
                        $table::can_read.eq(can_read),
                        $table::can_write.eq(can_write),
                        $table::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;
                Ok(())
            }

            /// ## Summary
            /// Deletes the grant tuple for the pair. Returns the number of rows removed.
            ///
            /// ## Errors
            /// Returns an error if the statement fails.
            pub async fn delete(
                conn: &mut DbConnection<'_>,
                principal_id: uuid::Uuid,
                node_id: uuid::Uuid,
            ) -> DbResult<usize> {
                Ok(diesel::delete(
                    $table::table
                        .filter($table::principal_id.eq(principal_id))
                        .filter($table::$node_col.eq(node_id)),
                )
                .execute(conn)
                .await?)
            }

            /// ## Summary
            /// Deletes every grant attached to the node.
            ///
            /// ## Errors
            /// Returns an error if the statement fails.
            pub async fn delete_all_for_node(
                conn: &mut DbConnection<'_>,
                node_id: uuid::Uuid,
            ) -> DbResult<usize> {
                Ok(
                    diesel::delete($table::table.filter($table::$node_col.eq(node_id)))
                        .execute(conn)
                        .await?,
                )
            }

            /// ## Summary
            /// Lists every grant attached to the node, ordered by principal.
            ///
            /// ## Errors
            /// Returns an error if the query fails.
            pub async fn list_for_node(
                conn: &mut DbConnection<'_>,
                node_id: uuid::Uuid,
            ) -> DbResult<Vec<GrantRow>> {
                Ok($table::table
                    .filter($table::$node_col.eq(node_id))
                    .order($table::principal_id.asc())
                    .select((
                        $table::principal_id,
                        $table::$node_col,
                        $table::can_read,
                        $table::can_write,
                    ))
                    .load::<GrantRow>(conn)
                    .await?)
            }
        }
    };
}

grant_table_queries!(site, site_grant, site_id);
grant_table_queries!(building, building_grant, building_id);
grant_table_queries!(level, level_grant, level_id);
grant_table_queries!(part, part_grant, part_id);
