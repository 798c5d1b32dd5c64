//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod user_service;

pub use authorization_service::{AuthorizationRepository, AuthorizationService};
pub use user_service::{NewUser, UserRepository, UserService, UserUpdate};
