/// PostgreSQL implementation of [`TodoStore`]

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use super::{StoreError, StoreResult, TodoStore};
use crate::models::{
    CreateTag, CreateTask, CreateUser, Tag, TagRef, Task, UpdateTask, UpdateUser, User,
};

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for shutdown and maintenance tasks
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Loads all tasks with their tags
    async fn tasks_with_tags(&self) -> Result<Vec<Task>, sqlx::Error> {
        let mut tasks = Task::list(&self.pool).await?;
        let assignments = Tag::list_assignments(&self.pool).await?;
        Task::attach_tags(&mut tasks, assignments);
        Ok(tasks)
    }
}

/// Turns tag references into tag IDs, creating tags that have no ID yet
async fn resolve_tag_refs(conn: &mut PgConnection, refs: &[TagRef]) -> Result<Vec<i64>, sqlx::Error> {
    let mut tag_ids = Vec::with_capacity(refs.len());
    for tag_ref in refs {
        if tag_ref.id > 0 {
            tag_ids.push(tag_ref.id);
        } else {
            let tag = Tag::create(
                &mut *conn,
                CreateTag {
                    name: tag_ref.name.clone(),
                },
            )
            .await?;
            debug!(tag_id = tag.id, "Created inline tag");
            tag_ids.push(tag.id);
        }
    }
    Ok(tag_ids)
}

#[async_trait]
impl TodoStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let user = User::create(&self.pool, data).await?;
        debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut users = User::list(&self.pool).await?;
        let tasks = self.tasks_with_tags().await?;
        Task::group_by_user(&mut users, tasks);
        Ok(users)
    }

    async fn update_user(&self, data: UpdateUser) -> StoreResult<User> {
        let id = data.id;
        let user = User::replace(&self.pool, data)
            .await?
            .ok_or(StoreError::NotFound { entity: "user", id })?;
        debug!(user_id = user.id, "Replaced user");
        Ok(user)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tx = self.pool.begin().await?;

        let mut task = Task::insert(&mut *tx, &data).await?;
        let tag_ids = resolve_tag_refs(&mut *tx, &data.tags).await?;
        Task::link_tags(&mut *tx, task.id, &tag_ids).await?;
        task.tags = Tag::list_for_task(&mut *tx, task.id).await?;

        tx.commit().await?;

        debug!(task_id = task.id, tags = task.tags.len(), "Inserted task");
        Ok(task)
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks_with_tags().await?)
    }

    async fn update_task(&self, data: UpdateTask) -> StoreResult<Task> {
        let mut tx = self.pool.begin().await?;

        let Some(mut task) = Task::replace(&mut *tx, &data).await? else {
            return Err(StoreError::NotFound {
                entity: "task",
                id: data.id,
            });
        };

        Task::unlink_all_tags(&mut *tx, task.id).await?;
        let tag_ids = resolve_tag_refs(&mut *tx, &data.tags).await?;
        Task::link_tags(&mut *tx, task.id, &tag_ids).await?;
        task.tags = Tag::list_for_task(&mut *tx, task.id).await?;

        tx.commit().await?;

        debug!(task_id = task.id, tags = task.tags.len(), "Replaced task");
        Ok(task)
    }

    async fn delete_task(&self, id: i64) -> StoreResult<()> {
        let deleted = Task::delete(&self.pool, id).await?;
        debug!(task_id = id, deleted, "Deleted task");
        Ok(())
    }

    async fn create_tag(&self, data: CreateTag) -> StoreResult<Tag> {
        let tag = Tag::create(&self.pool, data).await?;
        debug!(tag_id = tag.id, "Inserted tag");
        Ok(tag)
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }
}
