use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenService;
use crate::error::AppError;

/// Bearer-token gate for protected scopes.
///
/// Extracts the token from the `Authorization` header, validates it against
/// the shared [`TokenService`], and inserts the decoded claims into request
/// extensions for the `AuthenticatedUser` extractor to resolve. Wrap this
/// around the scopes that require authentication; unauthenticated routes
/// (`/auth/token`, `/health`) live outside it.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let bearer = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let claims = match bearer {
            Some(token) => {
                let tokens = match req.app_data::<web::Data<TokenService>>() {
                    Some(tokens) => tokens,
                    None => {
                        let app_err = AppError::InternalServerError(
                            "Token service is not configured".into(),
                        );
                        return Box::pin(async move { Err(app_err.into()) });
                    }
                };
                match tokens.validate(token) {
                    Ok(claims) => claims,
                    Err(token_err) => {
                        // The cause stays in the logs; the response is generic.
                        log::debug!("rejected bearer token: {}", token_err);
                        let app_err: AppError = token_err.into();
                        return Box::pin(async move { Err(app_err.into()) });
                    }
                }
            }
            None => {
                let app_err = AppError::Unauthorized("Could not validate credentials".into());
                return Box::pin(async move { Err(app_err.into()) });
            }
        };

        req.extensions_mut().insert(claims);
        let fut = self.service.call(req);
        Box::pin(fut)
    }
}
