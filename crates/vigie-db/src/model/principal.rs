use diesel::{pg::Pg, prelude::*};

use crate::db::{enums::DbRole, schema};

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::principal)]
#[diesel(check_for_backend(Pg))]
pub struct PrincipalRow {
    pub id: uuid::Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Option<DbRole>,
    pub organization: Option<String>,
    pub password_hash: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<PrincipalRow> for vigie_core::types::Principal {
    fn from(row: PrincipalRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            role: row.role.map(Into::into),
            organization: row.organization,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::principal)]
pub struct NewPrincipal<'a> {
    pub id: uuid::Uuid,
    pub email: &'a str,
    pub display_name: Option<&'a str>,
    pub role: Option<DbRole>,
    pub organization: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}
