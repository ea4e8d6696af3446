/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Create, list and replace users
/// - `tasks`: Create, list, replace and delete tasks
/// - `tags`: Create tags

pub mod health;
pub mod tags;
pub mod tasks;
pub mod users;
