/// Tag model and database operations
///
/// ```sql
/// CREATE TABLE tags (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use validator::{Validate, ValidationError};

use super::{capitalised_key, WireKeys};

/// Tag model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "Name")]
    pub name: String,
}

/// Payload for creating a tag
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateTag {
    #[serde(rename = "Name", alias = "name")]
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// A tag as referenced from a task payload
///
/// A non-zero `ID` links an existing tag (its `Name` is ignored); otherwise a
/// new tag named `Name` is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_tag_ref"))]
pub struct TagRef {
    #[serde(rename = "ID", alias = "id")]
    pub id: i64,

    #[serde(rename = "Name", alias = "name")]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,
}

fn validate_tag_ref(tag: &TagRef) -> Result<(), ValidationError> {
    if tag.id < 0 || (tag.id == 0 && tag.name.is_empty()) {
        let mut error = ValidationError::new("tag_reference");
        error.message = Some("a tag needs either an ID or a Name".into());
        return Err(error);
    }
    Ok(())
}

/// One row of `task_tags` joined with its tag
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagAssignment {
    pub task_id: i64,

    #[sqlx(flatten)]
    pub tag: Tag,
}

impl Tag {
    /// Inserts a new tag
    pub async fn create<'e, E>(executor: E, data: CreateTag) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(data.name)
        .fetch_one(executor)
        .await
    }

    /// Lists the tags linked to one task, ordered by tag ID
    pub async fn list_for_task<'e, E>(executor: E, task_id: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name
            FROM task_tags tt
            JOIN tags t ON t.id = tt.tag_id
            WHERE tt.task_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(task_id)
        .fetch_all(executor)
        .await
    }

    /// Lists every task-tag pairing, ordered by task then tag
    pub async fn list_assignments<'e, E>(executor: E) -> Result<Vec<TagAssignment>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, TagAssignment>(
            r#"
            SELECT tt.task_id, t.id, t.name
            FROM task_tags tt
            JOIN tags t ON t.id = tt.tag_id
            ORDER BY tt.task_id, t.id
            "#,
        )
        .fetch_all(executor)
        .await
    }
}

impl WireKeys for CreateTag {
    fn wire_key(field: &str) -> Option<&'static str> {
        capitalised_key(field)
    }
}
