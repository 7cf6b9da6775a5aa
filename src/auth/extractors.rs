use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;

use crate::auth::token::Claims;
use crate::error::AppError;
use crate::models::User;

/// Resolves the authenticated user for the current request.
///
/// This extractor is intended for routes protected by `AuthMiddleware`, which
/// validates the bearer token and inserts the decoded claims into request
/// extensions. The extractor then looks the subject email up in the users
/// table and yields the full `User` row.
///
/// Missing claims and an unresolvable subject both fail with the same generic
/// 401: a token whose user has since been deleted is indistinguishable from a
/// bad token, so account existence is never leaked. Handlers must trust only
/// the returned user's `id` as the authenticated principal and never accept a
/// caller-supplied owner id.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError is converted into ActixError via ResponseError
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let pool = req.app_data::<web::Data<PgPool>>().cloned();

        Box::pin(async move {
            let claims = claims.ok_or_else(|| {
                // Only reachable if AuthMiddleware did not run on this route;
                // responding with 401 is the safe default.
                AppError::Unauthorized("Could not validate credentials".into())
            })?;
            let pool = pool.ok_or_else(|| {
                AppError::InternalServerError("Database pool is not configured".into())
            })?;

            let user = sqlx::query_as::<_, User>(
                "SELECT id, email, hashed_password FROM users WHERE email = $1",
            )
            .bind(&claims.sub)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".into()))?;

            Ok(AuthenticatedUser(user))
        })
    }
}
