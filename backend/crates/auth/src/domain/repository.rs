//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::{email::Email, user_role::UserRole};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user
    async fn create(&self, user: NewUser) -> AuthResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Find user by (normalized) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if an email is registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Update mutable columns of an existing user
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// All users, newest first
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Change a user's role; returns the updated user if it exists
    async fn update_role(&self, user_id: UserId, role: UserRole) -> AuthResult<Option<User>>;

    /// Delete a user and every vendor record that depends on it, atomically
    ///
    /// Returns `false` when the user does not exist.
    async fn delete_cascade(&self, user_id: UserId) -> AuthResult<bool>;
}
