/// Persistence gateway
///
/// `TodoStore` is the single seam between request handlers and storage. The
/// server injects a [`PgStore`] through its application state; tests inject
/// an in-memory implementation.
///
/// Every operation maps to one storage statement, or to one transaction when
/// a task and its tag links are written together, so a failed call never
/// leaves a partial write behind.
///
/// # Update policy
///
/// `update_*` requires the identifier to exist and returns
/// [`StoreError::NotFound`] otherwise; an update never inserts.
///
/// # Example
///
/// ```no_run
/// use todolist_shared::models::CreateTag;
/// use todolist_shared::store::{PgStore, TodoStore};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = PgStore::new(pool);
/// let tag = store.create_tag(CreateTag { name: "Urgent".to_string() }).await?;
/// println!("Created tag {}", tag.id);
/// # Ok(())
/// # }
/// ```

mod postgres;

pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CreateTag, CreateTask, CreateUser, Tag, Task, UpdateTask, UpdateUser, User};

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update named an identifier that does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The database rejected the write (foreign key, unique, check)
    #[error("Constraint {constraint} violated: {message}")]
    Constraint { constraint: String, message: String },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(constraint) = db_err.constraint() {
                return StoreError::Constraint {
                    constraint: constraint.to_string(),
                    message: db_err.message().to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Create/read/update/delete operations for users, tasks and tags
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Inserts a user; `created_at` defaults to the current time
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// All users in insertion order, each with its tasks resolved
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Replaces an existing user
    async fn update_user(&self, data: UpdateUser) -> StoreResult<User>;

    /// Inserts a task, creating inline tags and linking all referenced tags
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// All tasks in insertion order, each with its tags resolved
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Replaces an existing task and its tag set
    async fn update_task(&self, data: UpdateTask) -> StoreResult<Task>;

    /// Deletes a task if present; deleting an unknown ID is not an error
    async fn delete_task(&self, id: i64) -> StoreResult<()>;

    /// Inserts a tag
    async fn create_tag(&self, data: CreateTag) -> StoreResult<Tag>;

    /// Verifies the backing storage is reachable
    async fn ping(&self) -> StoreResult<()>;
}
