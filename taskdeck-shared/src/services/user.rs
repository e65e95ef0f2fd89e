/// User service
///
/// Signup, profile reads, updates, and account deletion. The service
/// pre-checks for a duplicate email before inserting (the unique constraint
/// still backstops the race) and hashes passwords off the async runtime's
/// worker threads via `spawn_blocking` - bcrypt at cost 8 is cheap but
/// still CPU work. Reads never expose the stored hash.
///
/// Note the delete quirk: any failure there reports NotFound rather than
/// an internal error, unlike the other services.
use sqlx::PgPool;
use tracing::{error, warn};

use crate::auth::password;
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::pagination::{offset, Page};
use crate::services::{ServiceError, ServiceResult};

/// Input for signing up a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,

    /// Plaintext password; hashed before it reaches the store
    pub password: String,
}

/// Input for updating a user
///
/// A supplied password is re-hashed before persisting.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

impl UserService {
    /// Creates a new user service over the given pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Signs up a new user
    ///
    /// Pipeline: reject a taken email → hash the password (cost factor 8)
    /// → insert.
    pub async fn create(&self, data: NewUser) -> ServiceResult<User> {
        if User::find_by_email(&self.db, &data.email).await?.is_some() {
            warn!(email = %data.email, "User with email {} already exists", data.email);
            return Err(ServiceError::BusinessRule(
                "There is already a user with this email".to_string(),
            ));
        }

        let password_hash = hash_blocking(data.password).await?;

        let user = User::create(
            &self.db,
            CreateUser {
                name: data.name,
                email: data.email,
                password_hash,
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            ServiceError::from(e)
        })?;

        Ok(user)
    }

    /// Fetches a user by id
    ///
    /// The returned struct never serializes its password hash.
    pub async fn detail(&self, user_id: i32) -> ServiceResult<User> {
        let user = User::find_by_id(&self.db, user_id).await?.ok_or_else(|| {
            error!(user_id, "User with ID {} not found", user_id);
            ServiceError::NotFound(format!("User with ID {} not found", user_id))
        })?;

        Ok(user)
    }

    /// Updates a user's profile and/or credentials
    pub async fn update(&self, user_id: i32, changes: UserChanges) -> ServiceResult<User> {
        let password_hash = match changes.password {
            Some(password) => Some(hash_blocking(password).await?),
            None => None,
        };

        let user = User::update(
            &self.db,
            user_id,
            UpdateUser {
                name: changes.name,
                email: changes.email,
                password_hash,
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to update user info: {}", e);
            ServiceError::from(e)
        })?
        .ok_or_else(|| {
            error!(user_id, "User with ID {} not found", user_id);
            ServiceError::NotFound(format!("User with ID {} not found", user_id))
        })?;

        Ok(user)
    }

    /// Deletes a user
    ///
    /// Owned projects, memberships, and created tasks cascade away. Any
    /// store failure here is reported as NotFound (kept behavior, see
    /// module docs).
    pub async fn delete(&self, user_id: i32) -> ServiceResult<()> {
        let deleted = User::delete(&self.db, user_id).await.map_err(|e| {
            error!(user_id, "Could not find user with ID {} to delete: {}", user_id, e);
            ServiceError::NotFound(format!("Could not find user with ID {} to delete", user_id))
        })?;

        if !deleted {
            error!(user_id, "Could not find user with ID {} to delete", user_id);
            return Err(ServiceError::NotFound(format!(
                "Could not find user with ID {} to delete",
                user_id
            )));
        }

        Ok(())
    }

    /// Lists users one page at a time
    pub async fn find_all(&self, page: i64, size: i64) -> ServiceResult<Page<User>> {
        let skip = offset(page, size);

        let (users, total) =
            tokio::try_join!(User::list(&self.db, size, skip), User::count(&self.db))?;

        Ok(Page::new(users, total, page, size))
    }
}

/// Hashes a password on the blocking thread pool
async fn hash_blocking(password: String) -> ServiceResult<String> {
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| ServiceError::Internal(format!("Hashing task failed: {}", e)))??;

    Ok(hash)
}
