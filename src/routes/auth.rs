use crate::{
    auth::{verify_password, LoginRequest, TokenResponse, TokenService},
    error::AppError,
    models::User,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;

/// Issue an access token
///
/// Authenticates a user from OAuth2 password-grant form fields (`username`
/// holds the email) and returns a bearer token. An unknown email and a wrong
/// password produce the identical 401 so account existence is never leaked.
#[post("/token")]
pub async fn issue_token(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    form: web::Form<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Get user from database
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, hashed_password FROM users WHERE email = $1",
    )
    .bind(&form.username)
    .fetch_optional(&**pool)
    .await?;

    let user = match user {
        Some(user) => user,
        None => return Err(AppError::Unauthorized("Incorrect email or password".into())),
    };

    // Verify password on the blocking thread pool; bcrypt is deliberately
    // slow and must not stall an async worker.
    let form = form.into_inner();
    let hashed_password = user.hashed_password.clone();
    let password_matches = web::block(move || verify_password(&form.password, &hashed_password))
        .await
        .map_err(|e| {
            AppError::InternalServerError(format!("Password verification task failed: {}", e))
        })?;

    if !password_matches {
        return Err(AppError::Unauthorized("Incorrect email or password".into()));
    }

    let token = tokens.issue(&user.email)?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}
