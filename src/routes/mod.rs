pub mod auth;
pub mod health;
pub mod todos;

use actix_web::web;

use crate::auth::AuthMiddleware;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(web::scope("/auth").service(auth::issue_token))
        .service(
            web::scope("/todos")
                .wrap(AuthMiddleware)
                .service(todos::create_todo)
                .service(todos::list_todos)
                .service(todos::get_todo)
                .service(todos::update_todo)
                .service(todos::delete_todo),
        );
}
