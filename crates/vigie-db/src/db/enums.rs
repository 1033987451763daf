//! Database enum types with Diesel serialization.
//!
//! Enums are stored as text guarded by a CHECK constraint. Each wrapper
//! implements `ToSql` and `FromSql` so rows never carry raw role strings.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::io::Write;

use vigie_core::types::Role;

/// Principal role column.
///
/// Maps to `principal.role` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub struct DbRole(pub Role);

impl ToSql<Text, Pg> for DbRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.0.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for DbRole {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let raw = std::str::from_utf8(bytes.as_bytes())?;
        raw.parse::<Role>()
            .map(Self)
            .map_err(|_err| "Unrecognized enum variant".into())
    }
}

impl From<Role> for DbRole {
    fn from(role: Role) -> Self {
        Self(role)
    }
}

impl From<DbRole> for Role {
    fn from(role: DbRole) -> Self {
        role.0
    }
}
