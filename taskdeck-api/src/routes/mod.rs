/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, tokens, password change
/// - `tasks`: Task CRUD, bulk clear, reorder, assignment
/// - `subtasks`: Checklist items nested under a task
/// - `profile`: Profile view and edit
/// - `analytics`: Aggregate task counts
/// - `reminders`: Due-reminder scan trigger
/// - `admin`: User management (admin role)

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod health;
pub mod profile;
pub mod reminders;
pub mod subtasks;
pub mod tasks;
