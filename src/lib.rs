#![doc = "The `tasknest` library crate."]
#![doc = ""]
#![doc = "This crate contains the core business logic, domain models, authentication"]
#![doc = "mechanisms, persistence gateway, notification gateway, routing configuration,"]
#![doc = "and error handling for the TaskNest application. It is used by the main"]
#![doc = "binary (`main.rs`) to construct and run the application, and by the"]
#![doc = "integration tests to assemble the same application against an in-memory store."]

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
