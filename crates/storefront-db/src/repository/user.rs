//! # User Repository
//!
//! The user directory the order lifecycle consults when placing orders.
//! Identity and authentication live outside this core; rows here are the
//! minimal directory surface (`resolveUser`).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use storefront_core::User;

const USER_COLUMNS: &str = "id, email, first_name, last_name, created_at";

/// Repository for the user directory.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a directory entry.
    pub async fn insert(&self, email: &str, first_name: &str, last_name: &str) -> DbResult<User> {
        let user = User {
            id: new_id(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            created_at: Utc::now(),
        };

        debug!(id = %user.id, email = %email, "Inserting user");

        sqlx::query(
            "INSERT INTO users (id, email, first_name, last_name, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Resolves a user by id.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - Unknown id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");

        let user: Option<User> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Lists all directory entries.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY email");

        let users: Vec<User> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(users)
    }
}
