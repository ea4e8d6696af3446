/// Task model and database operations
///
/// A task belongs to one user and carries any number of tags through the
/// `task_tags` join table. `status` and `priority` are free text; no workflow
/// is attached to them.
///
/// # Wire format
///
/// Tasks use capitalised keys (`ID`, `Title`, `Description`, `Status`,
/// `Priority`, `Deadline`, `UserID`, `Tags`). Request payloads also accept the
/// snake_case spelling of every key.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title TEXT NOT NULL DEFAULT '',
///     description TEXT NOT NULL DEFAULT '',
///     status TEXT NOT NULL DEFAULT '',
///     priority TEXT NOT NULL DEFAULT '',
///     deadline TIMESTAMPTZ,
///     user_id BIGINT REFERENCES users(id) ON UPDATE CASCADE ON DELETE SET NULL
/// );
///
/// CREATE TABLE task_tags (
///     task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     tag_id BIGINT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
///     PRIMARY KEY (task_id, tag_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use todolist_shared::models::task::{Task, CreateTask};
/// use todolist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::insert(&pool, &CreateTask {
///     title: "Buy milk".to_string(),
///     user_id: 1,
///     ..Default::default()
/// }).await?;
///
/// Task::link_tags(&pool, task.id, &[3, 4]).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::collections::HashMap;
use validator::Validate;

use super::tag::{Tag, TagAssignment, TagRef};
use super::user::User;
use super::{capitalised_key, WireKeys};

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Status")]
    pub status: String,

    #[serde(rename = "Priority")]
    pub priority: String,

    #[serde(rename = "Deadline")]
    pub deadline: Option<DateTime<Utc>>,

    /// Owning user; None once the owner has been deleted
    #[serde(rename = "UserID")]
    pub user_id: Option<i64>,

    /// Tags linked through `task_tags`, ordered by tag ID
    #[sqlx(skip)]
    #[serde(rename = "Tags", default)]
    pub tags: Vec<Tag>,
}

/// Payload for creating a task
///
/// `Tags` may reference existing tags by `ID` or introduce new ones by `Name`;
/// new tags are created in the same transaction as the task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateTask {
    #[serde(rename = "Title", alias = "title")]
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,

    #[serde(rename = "Description", alias = "description")]
    pub description: String,

    #[serde(rename = "Status", alias = "status")]
    pub status: String,

    #[serde(rename = "Priority", alias = "priority")]
    pub priority: String,

    #[serde(rename = "Deadline", alias = "deadline")]
    pub deadline: Option<DateTime<Utc>>,

    #[serde(rename = "UserID", alias = "user_id")]
    #[validate(range(min = 1, message = "UserID is required"))]
    pub user_id: i64,

    #[serde(rename = "Tags", alias = "tags")]
    #[validate(nested)]
    pub tags: Vec<TagRef>,
}

/// Payload for replacing a task
///
/// Full-record replacement, including the tag set: tags missing from `Tags`
/// are unlinked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateTask {
    #[serde(rename = "ID", alias = "id")]
    #[validate(range(min = 1, message = "ID is required"))]
    pub id: i64,

    #[serde(rename = "Title", alias = "title")]
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,

    #[serde(rename = "Description", alias = "description")]
    pub description: String,

    #[serde(rename = "Status", alias = "status")]
    pub status: String,

    #[serde(rename = "Priority", alias = "priority")]
    pub priority: String,

    #[serde(rename = "Deadline", alias = "deadline")]
    pub deadline: Option<DateTime<Utc>>,

    #[serde(rename = "UserID", alias = "user_id")]
    #[validate(range(min = 1, message = "UserID is required"))]
    pub user_id: i64,

    #[serde(rename = "Tags", alias = "tags")]
    #[validate(nested)]
    pub tags: Vec<TagRef>,
}

impl Task {
    /// Inserts the task row only; tags are linked separately
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if `user_id` names no user
    pub async fn insert<'e, E>(executor: E, data: &CreateTask) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, deadline, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, status, priority, deadline, user_id
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.status)
        .bind(&data.priority)
        .bind(data.deadline)
        .bind(data.user_id)
        .fetch_one(executor)
        .await
    }

    /// Overwrites every column of an existing task
    ///
    /// # Returns
    ///
    /// The replaced row, or None if no task has that ID
    pub async fn replace<'e, E>(executor: E, data: &UpdateTask) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                status = $4,
                priority = $5,
                deadline = $6,
                user_id = $7
            WHERE id = $1
            RETURNING id, title, description, status, priority, deadline, user_id
            "#,
        )
        .bind(data.id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.status)
        .bind(&data.priority)
        .bind(data.deadline)
        .bind(data.user_id)
        .fetch_optional(executor)
        .await
    }

    /// Lists all tasks in insertion order, without tags
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, deadline, user_id
            FROM tasks
            ORDER BY id
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Deletes a task by ID; its join rows cascade
    ///
    /// # Returns
    ///
    /// True if a task was deleted, false if none had that ID
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Links tags to a task, ignoring pairs that are already linked
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if any tag ID names no tag
    pub async fn link_tags<'e, E>(executor: E, task_id: i64, tag_ids: &[i64]) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO task_tags (task_id, tag_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(task_id)
        .bind(tag_ids)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Removes every tag link of a task
    pub async fn unlink_all_tags<'e, E>(executor: E, task_id: i64) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM task_tags WHERE task_id = $1")
            .bind(task_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Distributes join-table assignments onto their tasks
    pub fn attach_tags(tasks: &mut [Task], assignments: Vec<TagAssignment>) {
        let mut by_task: HashMap<i64, Vec<Tag>> = HashMap::new();
        for assignment in assignments {
            by_task
                .entry(assignment.task_id)
                .or_default()
                .push(assignment.tag);
        }

        for task in tasks.iter_mut() {
            if let Some(tags) = by_task.remove(&task.id) {
                task.tags = tags;
            }
        }
    }

    /// Moves each task into the `tasks` list of its owning user
    ///
    /// Tasks whose owner is gone (or not in `users`) are dropped from the
    /// result.
    pub fn group_by_user(users: &mut [User], tasks: Vec<Task>) {
        let mut by_user: HashMap<i64, Vec<Task>> = HashMap::new();
        for task in tasks {
            if let Some(user_id) = task.user_id {
                by_user.entry(user_id).or_default().push(task);
            }
        }

        for user in users.iter_mut() {
            if let Some(tasks) = by_user.remove(&user.id) {
                user.tasks = tasks;
            }
        }
    }
}

impl WireKeys for CreateTask {
    fn wire_key(field: &str) -> Option<&'static str> {
        capitalised_key(field)
    }
}

impl WireKeys for UpdateTask {
    fn wire_key(field: &str) -> Option<&'static str> {
        capitalised_key(field)
    }
}
