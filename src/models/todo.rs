use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents a to-do entity as stored in the database and returned by the
/// API. Every row is owned by exactly one user and is visible only through
/// its owner.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Todo {
    /// Unique identifier for the to-do.
    pub id: i32,
    /// The title of the to-do.
    pub title: String,
    /// An optional description.
    pub description: Option<String>,
    /// Completion flag; freely togglable by the owner in either direction.
    pub completed: bool,
    /// Identifier of the owning user. Always set from the authenticated
    /// principal, never from the request body.
    pub owner_id: i32,
}

/// Input structure for creating or fully replacing a to-do.
/// Contains validation rules for its fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// The title of the to-do.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Completion flag; omitted means false.
    #[serde(default)]
    pub completed: bool,
}

/// Query parameters for listing to-dos (offset/limit pagination).
#[derive(Debug, Deserialize)]
pub struct TodoQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}
