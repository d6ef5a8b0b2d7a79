use crate::errors::Result;
use crate::users::users_model::{NewUser, User};
use async_trait::async_trait;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn insert_user(&self, user: User) -> Result<User>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn register(&self, new_user: NewUser) -> Result<User>;
}
