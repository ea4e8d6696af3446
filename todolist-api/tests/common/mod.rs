//! Common test utilities for router tests
//!
//! This module provides shared infrastructure for tests that drive the HTTP
//! surface without a database:
//! - `MemoryStore`, an in-memory `TodoStore` that enforces the same
//!   referential rules as the PostgreSQL schema
//! - `TestContext`, which wires the store into the real router
//! - Request and body helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard,
};
use todolist_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig},
};
use todolist_shared::models::{
    CreateTag, CreateTask, CreateUser, Tag, TagRef, Task, UpdateTask, UpdateUser, User,
};
use todolist_shared::store::{StoreError, StoreResult, TodoStore};
use tower::ServiceExt;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    tags: Vec<Tag>,
    task_tags: Vec<(i64, i64)>,
    next_user_id: i64,
    next_task_id: i64,
    next_tag_id: i64,
}

impl Tables {
    fn check_user(&self, user_id: i64) -> StoreResult<()> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(StoreError::Constraint {
                constraint: "tasks_user_id_fkey".to_string(),
                message: format!("Key (user_id)=({}) is not present in table \"users\"", user_id),
            })
        }
    }

    fn check_tag_refs(&self, refs: &[TagRef]) -> StoreResult<()> {
        for tag_ref in refs.iter().filter(|r| r.id > 0) {
            if !self.tags.iter().any(|t| t.id == tag_ref.id) {
                return Err(StoreError::Constraint {
                    constraint: "task_tags_tag_id_fkey".to_string(),
                    message: format!("Key (tag_id)=({}) is not present in table \"tags\"", tag_ref.id),
                });
            }
        }
        Ok(())
    }

    fn insert_tag(&mut self, name: String) -> Tag {
        self.next_tag_id += 1;
        let tag = Tag {
            id: self.next_tag_id,
            name,
        };
        self.tags.push(tag.clone());
        tag
    }

    fn link(&mut self, task_id: i64, refs: &[TagRef]) {
        for tag_ref in refs {
            let tag_id = if tag_ref.id > 0 {
                tag_ref.id
            } else {
                self.insert_tag(tag_ref.name.clone()).id
            };
            if !self.task_tags.contains(&(task_id, tag_id)) {
                self.task_tags.push((task_id, tag_id));
            }
        }
    }

    fn tags_for(&self, task_id: i64) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .task_tags
            .iter()
            .filter(|(t, _)| *t == task_id)
            .filter_map(|(_, tag_id)| self.tags.iter().find(|tag| tag.id == *tag_id).cloned())
            .collect();
        tags.sort_by_key(|tag| tag.id);
        tags
    }

    fn task_with_tags(&self, task: &Task) -> Task {
        Task {
            tags: self.tags_for(task.id),
            ..task.clone()
        }
    }
}

/// In-memory store used in place of PostgreSQL
///
/// Writes are checked before anything is changed, so a rejected call leaves
/// the tables untouched, like a rolled-back transaction.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Makes `ping` fail, as if the database were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Removes a user and detaches its tasks
    pub fn delete_user(&self, id: i64) {
        let mut tables = self.tables();
        tables.users.retain(|u| u.id != id);
        for task in tables.tasks.iter_mut().filter(|t| t.user_id == Some(id)) {
            task.user_id = None;
        }
    }

    pub fn task_count(&self) -> usize {
        self.tables().tasks.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tables().tags.len()
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables();
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            name: data.name,
            email: data.email,
            password: data.password,
            created_at: data.created_at.unwrap_or_else(Utc::now),
            tasks: Vec::new(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables();
        let users = tables
            .users
            .iter()
            .map(|user| User {
                tasks: tables
                    .tasks
                    .iter()
                    .filter(|t| t.user_id == Some(user.id))
                    .map(|t| tables.task_with_tags(t))
                    .collect(),
                ..user.clone()
            })
            .collect();
        Ok(users)
    }

    async fn update_user(&self, data: UpdateUser) -> StoreResult<User> {
        let mut tables = self.tables();
        let Some(user) = tables.users.iter_mut().find(|u| u.id == data.id) else {
            return Err(StoreError::NotFound {
                entity: "user",
                id: data.id,
            });
        };

        user.name = data.name;
        user.email = data.email;
        user.password = data.password;
        if let Some(created_at) = data.created_at {
            user.created_at = created_at;
        }
        Ok(user.clone())
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tables = self.tables();
        tables.check_user(data.user_id)?;
        tables.check_tag_refs(&data.tags)?;

        tables.next_task_id += 1;
        let task = Task {
            id: tables.next_task_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            deadline: data.deadline,
            user_id: Some(data.user_id),
            tags: Vec::new(),
        };
        tables.tasks.push(task.clone());
        tables.link(task.id, &data.tags);

        Ok(tables.task_with_tags(&task))
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let tables = self.tables();
        Ok(tables.tasks.iter().map(|t| tables.task_with_tags(t)).collect())
    }

    async fn update_task(&self, data: UpdateTask) -> StoreResult<Task> {
        let mut tables = self.tables();
        if !tables.tasks.iter().any(|t| t.id == data.id) {
            return Err(StoreError::NotFound {
                entity: "task",
                id: data.id,
            });
        }
        tables.check_user(data.user_id)?;
        tables.check_tag_refs(&data.tags)?;

        let task = Task {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            deadline: data.deadline,
            user_id: Some(data.user_id),
            tags: Vec::new(),
        };
        if let Some(slot) = tables.tasks.iter_mut().find(|t| t.id == data.id) {
            *slot = task.clone();
        }
        tables.task_tags.retain(|(task_id, _)| *task_id != data.id);
        tables.link(task.id, &data.tags);

        Ok(tables.task_with_tags(&task))
    }

    async fn delete_task(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables();
        tables.tasks.retain(|t| t.id != id);
        tables.task_tags.retain(|(task_id, _)| *task_id != id);
        Ok(())
    }

    async fn create_tag(&self, data: CreateTag) -> StoreResult<Tag> {
        Ok(self.tables().insert_tag(data.name))
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

/// Test context containing the router and the store behind it
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    /// Creates a router over an empty in-memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let state = AppState::new(store.clone(), test_config());
        Self {
            app: build_router(state),
            store,
        }
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends a JSON request and returns the status and decoded body
    pub async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Sends a bodiless request and returns the status and decoded body
    pub async fn call(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Creates a user and returns its ID
    pub async fn seed_user(&self, name: &str) -> i64 {
        let (status, body) = self
            .json(
                "POST",
                "/users",
                serde_json::json!({
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase()),
                    "password": "secret",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed user failed: {}", body);
        body["id"].as_i64().unwrap()
    }
}

/// Configuration with fixed values, independent of the environment
pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgres://postgres@localhost:5432/todolist_test".to_string(),
            max_connections: 1,
            timezone: "UTC".to_string(),
        },
    }
}

/// Reads a response body as JSON (`Null` for an empty body)
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}
