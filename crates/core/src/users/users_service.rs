use crate::errors::{Error, Result};
use crate::users::users_model::{normalize_email, validate_email, NewUser, User};
use crate::users::users_traits::{UserRepositoryTrait, UserServiceTrait};
use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

pub struct UserService<T: UserRepositoryTrait> {
    user_repo: Arc<T>,
}

impl<T: UserRepositoryTrait> UserService<T> {
    pub fn new(user_repo: Arc<T>) -> Self {
        UserService { user_repo }
    }
}

#[async_trait]
impl<T: UserRepositoryTrait + Send + Sync> UserServiceTrait for UserService<T> {
    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo.find_user_by_email(&normalize_email(email))
    }

    async fn register(&self, new_user: NewUser) -> Result<User> {
        validate_email(&new_user.email)?;
        let email = normalize_email(&new_user.email);
        if self.user_repo.find_user_by_email(&email)?.is_some() {
            return Err(Error::Conflict("Email is already registered".to_string()));
        }
        let user = self
            .user_repo
            .insert_user(User {
                id: Uuid::new_v4().to_string(),
                email,
                password_hash: new_user.password_hash,
                created_at: Utc::now().naive_utc(),
            })
            .await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }
}
