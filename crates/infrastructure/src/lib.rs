//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod database;
mod postgres_authorization_repository;
mod postgres_user_repository;
mod store_error;

pub use database::{DatabaseConfig, MIGRATOR};
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_user_repository::PostgresUserRepository;
