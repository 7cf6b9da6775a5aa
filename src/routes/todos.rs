use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Todo, TodoInput, TodoQuery},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

const DEFAULT_LIMIT: i64 = 100;

/// Creates a new to-do for the authenticated user.
///
/// The owner is always the authenticated principal; the request body cannot
/// supply an owner id. `completed` defaults to false when omitted.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Todo` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `422 Unprocessable Entity`: If input validation on `TodoInput` fails.
#[post("/")]
pub async fn create_todo(
    pool: web::Data<PgPool>,
    todo_data: web::Json<TodoInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    // Validate input
    todo_data.validate()?;

    let todo = sqlx::query_as::<_, Todo>(
        "INSERT INTO todos (title, description, completed, owner_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, title, description, completed, owner_id",
    )
    .bind(&todo_data.title)
    .bind(&todo_data.description)
    .bind(todo_data.completed)
    .bind(user.0.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(todo))
}

/// Retrieves the authenticated user's to-dos.
///
/// Supports offset/limit pagination via the `skip` and `limit` query
/// parameters (defaults 0 and 100). Results are ordered by id ascending for
/// determinism.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Todo` objects owned by the user.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
#[get("/")]
pub async fn list_todos(
    pool: web::Data<PgPool>,
    query_params: web::Query<TodoQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let skip = query_params.skip.unwrap_or(0).max(0);
    let limit = query_params.limit.unwrap_or(DEFAULT_LIMIT).max(0);

    let todos = sqlx::query_as::<_, Todo>(
        "SELECT id, title, description, completed, owner_id
         FROM todos WHERE owner_id = $1
         ORDER BY id ASC
         LIMIT $2 OFFSET $3",
    )
    .bind(user.0.id)
    .bind(limit)
    .bind(skip)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(todos))
}

/// Retrieves a single to-do by id.
///
/// The lookup is scoped to the authenticated user, so an id that does not
/// exist and an id owned by another user both yield the same 404.
///
/// ## Responses:
/// - `200 OK`: Returns the `Todo` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: If the to-do is absent or owned by another user.
#[get("/{id}")]
pub async fn get_todo(
    pool: web::Data<PgPool>,
    todo_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todo = sqlx::query_as::<_, Todo>(
        "SELECT id, title, description, completed, owner_id
         FROM todos WHERE id = $1 AND owner_id = $2",
    )
    .bind(todo_id.into_inner())
    .bind(user.0.id)
    .fetch_optional(&**pool)
    .await?;

    match todo {
        Some(todo) => Ok(HttpResponse::Ok().json(todo)),
        None => Err(AppError::NotFound("To-do not found".into())),
    }
}

/// Fully replaces a to-do's title, description, and completed flag.
///
/// Uses the same ownership-scoped predicate as `get_todo`; a foreign-owned id
/// is indistinguishable from an absent one.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Todo` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: If the to-do is absent or owned by another user.
/// - `422 Unprocessable Entity`: If input validation on `TodoInput` fails.
#[put("/{id}")]
pub async fn update_todo(
    pool: web::Data<PgPool>,
    todo_id: web::Path<i32>,
    todo_data: web::Json<TodoInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let todo = sqlx::query_as::<_, Todo>(
        "UPDATE todos
         SET title = $1, description = $2, completed = $3
         WHERE id = $4 AND owner_id = $5
         RETURNING id, title, description, completed, owner_id",
    )
    .bind(&todo_data.title)
    .bind(&todo_data.description)
    .bind(todo_data.completed)
    .bind(todo_id.into_inner())
    .bind(user.0.id)
    .fetch_optional(&**pool)
    .await?;

    match todo {
        Some(todo) => Ok(HttpResponse::Ok().json(todo)),
        None => Err(AppError::NotFound("To-do not found".into())),
    }
}

/// Deletes a to-do by id.
///
/// ## Responses:
/// - `200 OK`: Returns a confirmation message.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: If the to-do is absent or owned by another user.
#[delete("/{id}")]
pub async fn delete_todo(
    pool: web::Data<PgPool>,
    todo_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
        .bind(todo_id.into_inner())
        .bind(user.0.id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("To-do not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "To-do deleted"
    })))
}
