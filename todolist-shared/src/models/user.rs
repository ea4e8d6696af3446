/// User model and database operations
///
/// A user owns zero or more tasks. Users are created and replaced through the
/// API; they are never deleted by it, but a deleted row detaches its tasks
/// (`tasks.user_id` is set to NULL) rather than removing them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     email VARCHAR(100) NOT NULL,
///     password VARCHAR(100) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use todolist_shared::models::user::{User, CreateUser};
/// use todolist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "Ada".to_string(),
///     email: "ada@example.com".to_string(),
///     password: "hunter2".to_string(),
///     created_at: None,
/// }).await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use validator::Validate;

use super::task::Task;
use super::WireKeys;

/// User model representing an account that owns tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Server-assigned identifier, never reused
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Password, stored as an opaque string
    pub password: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// Tasks owned by this user
    ///
    /// Only populated by listing operations; not a column.
    #[sqlx(skip)]
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Payload for creating a new user
///
/// Absent fields decode to their zero value and are then rejected by
/// validation, so a user can never reach the database without a name, email
/// or password.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "email must be 1-100 characters"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "password must be 1-100 characters"))]
    pub password: String,

    /// Creation time; the database stamps `NOW()` when absent
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for replacing an existing user
///
/// This is a full-record replacement: every field is overwritten with the
/// supplied value. `created_at` is the only exception and keeps its stored
/// value when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateUser {
    #[validate(range(min = 1, message = "id is required"))]
    pub id: i64,

    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "email must be 1-100 characters"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "password must be 1-100 characters"))]
    pub password: String,

    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Inserts a new user and returns the stored row
    ///
    /// # Errors
    ///
    /// Returns an error if a column constraint is violated or the database is
    /// unreachable
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, created_at)
            VALUES ($1, $2, $3, COALESCE($4, NOW()))
            RETURNING id, name, email, password, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password)
        .bind(data.created_at)
        .fetch_one(executor)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists all users in insertion order
    ///
    /// The `tasks` field of each user is left empty; see
    /// [`Task::group_by_user`] for resolving ownership.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Replaces every field of an existing user
    ///
    /// # Returns
    ///
    /// The replaced user, or None if no user has that ID. Nothing is inserted
    /// for an unknown ID.
    pub async fn replace<'e, E>(executor: E, data: UpdateUser) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                password = $4,
                created_at = COALESCE($5, created_at)
            WHERE id = $1
            RETURNING id, name, email, password, created_at
            "#,
        )
        .bind(data.id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.password)
        .bind(data.created_at)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a user by ID
    ///
    /// Not exposed over HTTP. Owned tasks survive with their `user_id` cleared.
    ///
    /// # Returns
    ///
    /// True if a user was deleted, false if none had that ID
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl WireKeys for CreateUser {
    fn wire_key(_field: &str) -> Option<&'static str> {
        None
    }
}

impl WireKeys for UpdateUser {
    fn wire_key(_field: &str) -> Option<&'static str> {
        None
    }
}
