/// Task service
///
/// Orchestrates the task lifecycle. Every mutating operation runs the same
/// check order - task/project existence, then project membership, then the
/// completed-task lock - before anything is written, and multi-row writes
/// (task + tag links, field update + tag reconciliation, tag unlink +
/// delete) run inside one transaction so a failure mid-way rolls back
/// cleanly.
///
/// Tag lists are validated up front: every requested id must resolve to an
/// existing tag or the whole operation fails without touching a row. The
/// lookups fire concurrently since they are independent reads.
use futures::future::try_join_all;
use sqlx::PgPool;
use std::collections::BTreeSet;
use tracing::error;

use crate::auth::authorization::require_membership;
use crate::models::project::Project;
use crate::models::tag::Tag;
use crate::models::task::{CreateTask, Task, TaskStatus, TaskWithTags, UpdateTask};
use crate::models::task_tag::TaskTag;
use crate::pagination::{offset, Page};
use crate::services::{ServiceError, ServiceResult};

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub project_id: i32,

    /// Tags to attach; must name at least one existing tag
    pub tags: Vec<i32>,
}

/// Input for updating a task
///
/// `None` fields are left untouched; `tags: None` means "don't touch the
/// tag set at all", while `Some(vec![])` is rejected.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub tags: Option<Vec<i32>>,
}

/// Additions and removals needed to turn one tag set into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDiff {
    pub to_add: Vec<i32>,
    pub to_remove: Vec<i32>,
}

/// Computes the set difference between a task's current tags and the
/// requested ones
///
/// `to_add` holds requested ids not currently linked, `to_remove` the
/// current ids no longer requested. Both come back sorted; duplicates in
/// the inputs collapse.
pub fn tag_diff(current: &[i32], requested: &[i32]) -> TagDiff {
    let current: BTreeSet<i32> = current.iter().copied().collect();
    let requested: BTreeSet<i32> = requested.iter().copied().collect();

    TagDiff {
        to_add: requested.difference(&current).copied().collect(),
        to_remove: current.difference(&requested).copied().collect(),
    }
}

/// Task service
#[derive(Clone)]
pub struct TaskService {
    db: PgPool,
}

impl TaskService {
    /// Creates a new task service over the given pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Creates a task in a project on behalf of `acting_user_id`
    ///
    /// Pipeline: project must exist → acting user must be a member → status
    /// must not be `Done` (tasks cannot be born completed) → at least one
    /// tag, all resolvable → insert the task and its tag links in one
    /// transaction.
    pub async fn create(&self, data: NewTask, acting_user_id: i32) -> ServiceResult<Task> {
        let project = Project::find_by_id(&self.db, data.project_id)
            .await?
            .ok_or_else(|| {
                error!(project_id = data.project_id, "Project not found");
                ServiceError::NotFound("Project not found".to_string())
            })?;

        require_membership(&self.db, project.id, acting_user_id, "create tasks").await?;

        if data.status.is_locked() {
            error!("Tasks cannot be created as completed");
            return Err(ServiceError::BusinessRule(
                "Tasks cannot be created as completed".to_string(),
            ));
        }

        if data.tags.is_empty() {
            error!("Tasks must have tags");
            return Err(ServiceError::BusinessRule("Tasks must have tags".to_string()));
        }

        self.ensure_tags_exist(&data.tags).await?;

        let mut tx = self.db.begin().await?;

        let task = Task::create(
            &mut *tx,
            CreateTask {
                title: data.title,
                description: data.description,
                status: data.status,
                project_id: data.project_id,
                created_by: acting_user_id,
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to create task: {}", e);
            ServiceError::from(e)
        })?;

        for tag_id in dedup(&data.tags) {
            TaskTag::link(&mut *tx, task.id, tag_id).await.map_err(|e| {
                error!("Failed to create task: {}", e);
                ServiceError::from(e)
            })?;
        }

        tx.commit().await?;

        Ok(task)
    }

    /// Fetches a task together with its tags
    pub async fn detail(&self, task_id: i32) -> ServiceResult<TaskWithTags> {
        let task = Task::find_by_id(&self.db, task_id).await?.ok_or_else(|| {
            error!(task_id, "Task not found");
            ServiceError::NotFound("Task not found".to_string())
        })?;

        let tags = Tag::list_for_task(&self.db, task_id).await?;

        Ok(TaskWithTags { task, tags })
    }

    /// Updates a task's fields and, if a tag list is supplied, reconciles
    /// its tag set
    ///
    /// Pipeline: task must exist → acting user must be a project member →
    /// current status must not be `Done` → a supplied tag list must be
    /// non-empty and fully resolvable → apply field updates and the tag
    /// diff in one transaction. Returns the updated task; tag changes are a
    /// side effect, re-fetch via [`Self::detail`] to observe them.
    pub async fn update(
        &self,
        task_id: i32,
        changes: TaskChanges,
        acting_user_id: i32,
    ) -> ServiceResult<Task> {
        let task = Task::find_by_id(&self.db, task_id).await?.ok_or_else(|| {
            error!(task_id, "Task not found");
            ServiceError::NotFound("Task not found".to_string())
        })?;

        require_membership(&self.db, task.project_id, acting_user_id, "update tasks").await?;

        if task.status.is_locked() {
            error!(task_id, "Completed tasks cannot be edited");
            return Err(ServiceError::BusinessRule(
                "Completed tasks cannot be edited".to_string(),
            ));
        }

        if let Some(tags) = &changes.tags {
            if tags.is_empty() {
                error!("Tasks must have tags");
                return Err(ServiceError::BusinessRule("Tasks must have tags".to_string()));
            }
            self.ensure_tags_exist(tags).await?;
        }

        let mut tx = self.db.begin().await?;

        let updated = Task::update(
            &mut *tx,
            task_id,
            UpdateTask {
                title: changes.title,
                description: changes.description,
                status: changes.status,
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to update task: {}", e);
            ServiceError::from(e)
        })?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

        if let Some(requested) = changes.tags {
            let current = TaskTag::tag_ids(&mut *tx, task_id).await?;
            let diff = tag_diff(&current, &requested);

            for tag_id in diff.to_add {
                TaskTag::link(&mut *tx, task_id, tag_id).await.map_err(|e| {
                    error!("Failed to update task: {}", e);
                    ServiceError::from(e)
                })?;
            }
            for tag_id in diff.to_remove {
                TaskTag::unlink(&mut *tx, task_id, tag_id)
                    .await
                    .map_err(|e| {
                        error!("Failed to update task: {}", e);
                        ServiceError::from(e)
                    })?;
            }
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// Deletes a task
    ///
    /// Pipeline: task must exist → acting user must be a project member →
    /// status must not be `Done` → delete tag links, then the task, in one
    /// transaction (links first because of the foreign key).
    pub async fn delete(&self, task_id: i32, acting_user_id: i32) -> ServiceResult<()> {
        let task = Task::find_by_id(&self.db, task_id).await?.ok_or_else(|| {
            error!(task_id, "Task not found");
            ServiceError::NotFound("Task not found".to_string())
        })?;

        require_membership(&self.db, task.project_id, acting_user_id, "delete tasks").await?;

        if task.status.is_locked() {
            error!(task_id, "Completed tasks cannot be deleted");
            return Err(ServiceError::BusinessRule(
                "Completed tasks cannot be deleted".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        TaskTag::delete_for_task(&mut *tx, task_id)
            .await
            .map_err(|e| {
                error!("Failed to delete task: {}", e);
                ServiceError::from(e)
            })?;

        Task::delete(&mut *tx, task_id).await.map_err(|e| {
            error!("Failed to delete task: {}", e);
            ServiceError::from(e)
        })?;

        tx.commit().await?;

        Ok(())
    }

    /// Lists tasks one page at a time, tags attached
    pub async fn find_all(&self, page: i64, size: i64) -> ServiceResult<Page<TaskWithTags>> {
        let skip = offset(page, size);

        let (tasks, total) =
            tokio::try_join!(Task::list(&self.db, size, skip), Task::count(&self.db))?;

        let tasks = self.attach_tags(tasks).await?;

        Ok(Page::new(tasks, total, page, size))
    }

    /// Lists every task of a project with tags attached, unpaginated
    ///
    /// Backs the board view. An unknown project yields an empty list, not
    /// an error; the project id is not validated here.
    pub async fn find_by_project(&self, project_id: i32) -> ServiceResult<Vec<TaskWithTags>> {
        let tasks = Task::list_by_project(&self.db, project_id).await?;

        self.attach_tags(tasks).await
    }

    /// Resolves each id to an existing tag, failing the whole operation if
    /// any is unknown
    ///
    /// Lookups are independent reads and fire concurrently.
    async fn ensure_tags_exist(&self, tag_ids: &[i32]) -> ServiceResult<()> {
        let lookups = tag_ids.iter().map(|id| Tag::find_by_id(&self.db, *id));
        let found = try_join_all(lookups).await?;

        for (tag_id, tag) in tag_ids.iter().zip(found) {
            if tag.is_none() {
                error!(tag_id, "No tag found with this id: {}", tag_id);
                return Err(ServiceError::NotFound(format!(
                    "No tag found with this id: {}",
                    tag_id
                )));
            }
        }

        Ok(())
    }

    /// Loads the tag list for each task, concurrently
    async fn attach_tags(&self, tasks: Vec<Task>) -> ServiceResult<Vec<TaskWithTags>> {
        let lookups = tasks.iter().map(|t| Tag::list_for_task(&self.db, t.id));
        let tag_lists = try_join_all(lookups).await?;

        Ok(tasks
            .into_iter()
            .zip(tag_lists)
            .map(|(task, tags)| TaskWithTags { task, tags })
            .collect())
    }
}

/// Collapses duplicate ids while keeping a deterministic order
fn dedup(ids: &[i32]) -> Vec<i32> {
    ids.iter().copied().collect::<BTreeSet<i32>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_diff_basic() {
        let diff = tag_diff(&[1, 2, 3], &[2, 3, 4]);
        assert_eq!(diff.to_add, vec![4]);
        assert_eq!(diff.to_remove, vec![1]);
    }

    #[test]
    fn test_tag_diff_no_changes() {
        let diff = tag_diff(&[1, 2], &[2, 1]);
        assert!(diff.to_add.is_empty());
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn test_tag_diff_from_empty() {
        let diff = tag_diff(&[], &[5, 6]);
        assert_eq!(diff.to_add, vec![5, 6]);
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn test_tag_diff_to_empty() {
        let diff = tag_diff(&[5, 6], &[]);
        assert!(diff.to_add.is_empty());
        assert_eq!(diff.to_remove, vec![5, 6]);
    }

    #[test]
    fn test_tag_diff_collapses_duplicates() {
        let diff = tag_diff(&[1, 1, 2], &[2, 2, 3, 3]);
        assert_eq!(diff.to_add, vec![3]);
        assert_eq!(diff.to_remove, vec![1]);
    }

    #[test]
    fn test_dedup_sorts_and_collapses() {
        assert_eq!(dedup(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
    }

    #[test]
    fn test_task_changes_default_touches_nothing() {
        let changes = TaskChanges::default();
        assert!(changes.title.is_none());
        assert!(changes.status.is_none());
        assert!(changes.tags.is_none());
    }

    // Pipeline behavior (membership gating, completed-task lock, atomic
    // create/update) is covered in tests/service_tests.rs.
}
