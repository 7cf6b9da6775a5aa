use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use dotenv::dotenv;
use jsonwebtoken::Algorithm;
use sqlx::PgPool;
use todo_api::auth::{hash_password, TokenResponse, TokenService};
use todo_api::routes;

const TEST_JWT_SECRET: &str = "integration-test-secret";

fn test_token_service() -> TokenService {
    TokenService::new(TEST_JWT_SECRET, Algorithm::HS256, 30)
}

async fn connect() -> PgPool {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    ensure_schema(&pool).await;
    pool
}

async fn ensure_schema(pool: &PgPool) {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id              SERIAL PRIMARY KEY,
            email           TEXT NOT NULL UNIQUE,
            hashed_password TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create users table");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS todos (
            id          SERIAL PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT,
            completed   BOOLEAN NOT NULL DEFAULT FALSE,
            owner_id    INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create todos table");
}

async fn cleanup_user(pool: &PgPool, email: &str) {
    // todos cascade on user deletion
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

/// Seeds a user row directly; registration is handled by an external
/// administrative process, not by this API.
async fn create_user(pool: &PgPool, email: &str, password: &str) -> i32 {
    let hashed = hash_password(password).expect("Failed to hash password");
    let (id,): (i32,) =
        sqlx::query_as("INSERT INTO users (email, hashed_password) VALUES ($1, $2) RETURNING id")
            .bind(email)
            .bind(hashed)
            .fetch_one(pool)
            .await
            .expect("Failed to seed test user");
    id
}

#[actix_rt::test]
async fn test_login_returns_bearer_token() {
    let pool = connect().await;

    let email = "login_user@example.com";
    let password = "PasswordLogin123!";
    cleanup_user(&pool, email).await;
    create_user(&pool, email, password).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(test_token_service()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_form(&[("username", email), ("password", password)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body_bytes = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body_bytes)
    );

    let token_response: TokenResponse =
        serde_json::from_slice(&body_bytes).expect("Failed to parse login response JSON");
    assert_eq!(token_response.token_type, "bearer");
    assert!(
        !token_response.access_token.is_empty(),
        "Token should be a non-empty string"
    );

    // The issued token must authenticate a protected route.
    let req_list = test::TestRequest::get()
        .uri("/todos/")
        .append_header((
            header::AUTHORIZATION,
            format!("Bearer {}", token_response.access_token),
        ))
        .to_request();
    let resp_list = test::call_service(&app, req_list).await;
    assert_eq!(resp_list.status(), actix_web::http::StatusCode::OK);

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let pool = connect().await;

    let email = "login_failures@example.com";
    let password = "PasswordFailures123!";
    cleanup_user(&pool, email).await;
    create_user(&pool, email, password).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(test_token_service()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    // Wrong password for an existing account
    let req_wrong_password = test::TestRequest::post()
        .uri("/auth/token")
        .set_form(&[("username", email), ("password", "not-the-password")])
        .to_request();
    let resp_wrong_password = test::call_service(&app, req_wrong_password).await;
    let status_wrong_password = resp_wrong_password.status();
    let body_wrong_password = test::read_body(resp_wrong_password).await;

    // Unknown email
    let req_unknown_email = test::TestRequest::post()
        .uri("/auth/token")
        .set_form(&[
            ("username", "no_such_user@example.com"),
            ("password", password),
        ])
        .to_request();
    let resp_unknown_email = test::call_service(&app, req_unknown_email).await;
    let status_unknown_email = resp_unknown_email.status();
    let body_unknown_email = test::read_body(resp_unknown_email).await;

    assert_eq!(
        status_wrong_password,
        actix_web::http::StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status_unknown_email,
        actix_web::http::StatusCode::UNAUTHORIZED
    );
    // Same status, same body: the response must not reveal whether the email
    // exists.
    assert_eq!(body_wrong_password, body_unknown_email);

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_expired_token_is_rejected() {
    let pool = connect().await;

    let email = "expired_token@example.com";
    let password = "PasswordExpired123!";
    cleanup_user(&pool, email).await;
    create_user(&pool, email, password).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(test_token_service()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    // Signed with the app's secret but already expired (well past the
    // validation leeway).
    let expired_issuer = TokenService::new(TEST_JWT_SECRET, Algorithm::HS256, -120);
    let expired_token = expired_issuer.issue(email).expect("Failed to issue token");

    let req = test::TestRequest::get()
        .uri("/todos/")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", expired_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_foreign_and_garbage_tokens_are_rejected() {
    let pool = connect().await;

    let email = "foreign_token@example.com";
    cleanup_user(&pool, email).await;
    create_user(&pool, email, "PasswordForeign123!").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(test_token_service()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    // Valid-looking token signed with a different secret
    let foreign_issuer = TokenService::new("some-other-secret", Algorithm::HS256, 30);
    let foreign_token = foreign_issuer.issue(email).expect("Failed to issue token");

    let req_foreign = test::TestRequest::get()
        .uri("/todos/")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", foreign_token)))
        .to_request();
    let resp_foreign = test::call_service(&app, req_foreign).await;
    assert_eq!(
        resp_foreign.status(),
        actix_web::http::StatusCode::UNAUTHORIZED
    );

    // Structurally invalid token
    let req_garbage = test::TestRequest::get()
        .uri("/todos/")
        .append_header((header::AUTHORIZATION, "Bearer not.a.token"))
        .to_request();
    let resp_garbage = test::call_service(&app, req_garbage).await;
    assert_eq!(
        resp_garbage.status(),
        actix_web::http::StatusCode::UNAUTHORIZED
    );

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_token_for_deleted_user_is_rejected() {
    let pool = connect().await;

    let email = "deleted_user@example.com";
    let password = "PasswordDeleted123!";
    cleanup_user(&pool, email).await;
    create_user(&pool, email, password).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(test_token_service()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    let token = test_token_service()
        .issue(email)
        .expect("Failed to issue token");

    // Remove the account after issuance; the still-valid token must no
    // longer resolve, with the same generic 401 as any bad token.
    cleanup_user(&pool, email).await;

    let req = test::TestRequest::get()
        .uri("/todos/")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}
