use sqlx::FromRow;

/// A registered account as stored in the `users` table.
///
/// Rows are provisioned by an external administrative process; this service
/// has no registration endpoint and never mutates or deletes users. The
/// email is the token subject and is unique at the store. The password hash
/// is opaque and is never serialized into a response.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub hashed_password: String,
}
