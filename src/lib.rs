#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "This crate contains the authentication boundary (password hashing, token"]
#![doc = "issuance and validation, the auth middleware and extractor), the domain"]
#![doc = "models, routing configuration, and error handling for the Todo API."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the"]
#![doc = "application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
