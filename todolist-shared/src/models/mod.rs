/// Domain models for Todolist
///
/// Each model pairs a row type with the request payloads that create or
/// replace it, and the SQL that persists it.
///
/// # Models
///
/// - `user`: Accounts that own tasks (one-to-many)
/// - `task`: To-do items, linked to tags through `task_tags`
/// - `tag`: Labels shared between tasks (many-to-many)
///
/// Payload types derive `validator::Validate`; they must pass validation
/// before they are handed to the store.

pub mod tag;
pub mod task;
pub mod user;

pub use tag::{CreateTag, Tag, TagRef};
pub use task::{CreateTask, Task, UpdateTask};
pub use user::{CreateUser, UpdateUser, User};

/// JSON keys of a request payload, for reporting validation errors
///
/// Validation errors are keyed by struct field; this maps a field back to
/// the key a client sends. Fields whose key equals their name need no entry.
pub trait WireKeys {
    fn wire_key(field: &str) -> Option<&'static str>;
}

/// Capitalised keys shared by task and tag payloads
pub(crate) fn capitalised_key(field: &str) -> Option<&'static str> {
    match field {
        "id" => Some("ID"),
        "title" => Some("Title"),
        "description" => Some("Description"),
        "status" => Some("Status"),
        "priority" => Some("Priority"),
        "deadline" => Some("Deadline"),
        "user_id" => Some("UserID"),
        "tags" => Some("Tags"),
        "name" => Some("Name"),
        _ => None,
    }
}
