//! Users module - account records used by authentication.

mod users_model;
mod users_service;
mod users_traits;

pub use users_model::{normalize_email, validate_email, NewUser, User};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
