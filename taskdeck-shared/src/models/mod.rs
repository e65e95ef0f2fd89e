/// Database models
///
/// Each model owns its table's queries: plain structs mapped with
/// `sqlx::FromRow` plus async CRUD methods taking an executor. Business
/// rules (membership checks, lifecycle locks, tag invariants) live one
/// level up in [`crate::services`]; nothing here authorizes anything.
///
/// # Models
///
/// - `user`: accounts with unique emails and bcrypt password hashes
/// - `project`: owned containers for tasks
/// - `membership`: user ↔ project access join
/// - `tag`: global, reusable task labels
/// - `task`: board cards with the Pending/InProgress/Done lifecycle
/// - `task_tag`: task ↔ tag join

pub mod membership;
pub mod project;
pub mod tag;
pub mod task;
pub mod task_tag;
pub mod user;
