/// Project service
///
/// Orchestrates project CRUD and member management. Creating a project also
/// creates the owner's membership in the same transaction, so the invariant
/// "a project's membership set always includes the owner" holds from the
/// first commit onward. Adding and removing members is owner-only; the
/// duplicate-membership race between two concurrent add-member calls is
/// left to the store's unique constraint and translated into a business
/// error when it fires.
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::error;

use crate::auth::authorization::require_owner;
use crate::models::membership::{CreateMembership, ProjectMembership};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::Task;
use crate::models::user::User;
use crate::pagination::{offset, Page};
use crate::services::{ServiceError, ServiceResult};

/// Project detail with the derived task count
///
/// `tasks_count` is a read-time projection, not a stored column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,

    /// Number of tasks currently in the project
    pub tasks_count: i64,
}

/// Project service
#[derive(Clone)]
pub struct ProjectService {
    db: PgPool,
}

impl ProjectService {
    /// Creates a new project service over the given pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Creates a project owned by `owner_id`
    ///
    /// Pipeline: resolve the owner (NotFound otherwise), then insert the
    /// project and the owner's membership in one transaction.
    pub async fn create(&self, data: CreateProject) -> ServiceResult<Project> {
        let owner_id = data.owner_id;

        User::find_by_id(&self.db, owner_id).await?.ok_or_else(|| {
            error!(owner_id, "Could not find a user with id {}", owner_id);
            ServiceError::NotFound(format!("Could not find a user with id {}", owner_id))
        })?;

        let mut tx = self.db.begin().await?;

        let project = Project::create(&mut *tx, data).await?;

        ProjectMembership::create(
            &mut *tx,
            CreateMembership {
                user_id: owner_id,
                project_id: project.id,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Adds `user_id` to the project's members
    ///
    /// Pipeline: project must exist → acting user must be the owner →
    /// target user must exist → insert the membership. A concurrent
    /// duplicate insert is caught by the unique constraint and reported as
    /// a business error.
    pub async fn add_member(
        &self,
        project_id: i32,
        user_id: i32,
        acting_owner_id: i32,
    ) -> ServiceResult<ProjectMembership> {
        let project = Project::find_by_id(&self.db, project_id)
            .await?
            .ok_or_else(|| {
                error!(project_id, "Project not found");
                ServiceError::NotFound("Project not found".to_string())
            })?;

        require_owner(&project, acting_owner_id, "add members")?;

        User::find_by_id(&self.db, user_id).await?.ok_or_else(|| {
            error!(user_id, "User not found");
            ServiceError::NotFound("User not found".to_string())
        })?;

        let membership = ProjectMembership::create(
            &self.db,
            CreateMembership {
                user_id,
                project_id,
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to add member: {}", e);
            ServiceError::from(e)
        })?;

        Ok(membership)
    }

    /// Removes `member_id` from the project's members
    ///
    /// Pipeline: project must exist → acting user must be the owner → the
    /// membership row must exist → delete it.
    pub async fn remove_member(
        &self,
        project_id: i32,
        member_id: i32,
        acting_owner_id: i32,
    ) -> ServiceResult<()> {
        let project = Project::find_by_id(&self.db, project_id)
            .await?
            .ok_or_else(|| {
                error!(project_id, "Project not found");
                ServiceError::NotFound("Project not found".to_string())
            })?;

        require_owner(&project, acting_owner_id, "remove members")?;

        let membership = ProjectMembership::find(&self.db, project_id, member_id).await?;
        if membership.is_none() {
            error!(project_id, member_id, "Member not found in project");
            return Err(ServiceError::NotFound(
                "Member not found in project".to_string(),
            ));
        }

        ProjectMembership::delete(&self.db, project_id, member_id)
            .await
            .map_err(|e| {
                error!("Failed to remove member: {}", e);
                ServiceError::from(e)
            })?;

        Ok(())
    }

    /// Updates a project's name and/or description
    ///
    /// Absent fields are left untouched.
    pub async fn update(&self, project_id: i32, data: UpdateProject) -> ServiceResult<Project> {
        Project::find_by_id(&self.db, project_id)
            .await?
            .ok_or_else(|| {
                error!(project_id, "Project not found");
                ServiceError::NotFound("Project not found".to_string())
            })?;

        let project = Project::update(&self.db, project_id, data)
            .await
            .map_err(|e| {
                error!("Failed to update project: {}", e);
                ServiceError::from(e)
            })?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;

        Ok(project)
    }

    /// Lists projects one page at a time
    ///
    /// `page` and `size` arrive boundary-validated (`page >= 0`,
    /// `size > 0`).
    pub async fn find_all(&self, page: i64, size: i64) -> ServiceResult<Page<Project>> {
        let skip = offset(page, size);

        let (projects, total) = tokio::try_join!(
            Project::list(&self.db, size, skip),
            Project::count(&self.db)
        )?;

        Ok(Page::new(projects, total, page, size))
    }

    /// Fetches a project together with its derived task count
    pub async fn detail(&self, project_id: i32) -> ServiceResult<ProjectDetail> {
        let project = Project::find_by_id(&self.db, project_id)
            .await?
            .ok_or_else(|| {
                error!(project_id, "Project not found");
                ServiceError::NotFound("Project not found".to_string())
            })?;

        let tasks_count = Task::count_by_project(&self.db, project_id).await?;

        Ok(ProjectDetail {
            project,
            tasks_count,
        })
    }

    /// Deletes a project
    ///
    /// Dependent tasks, memberships, and tag links are removed by the
    /// schema's cascade rules.
    pub async fn delete(&self, project_id: i32) -> ServiceResult<()> {
        Project::find_by_id(&self.db, project_id)
            .await?
            .ok_or_else(|| {
                error!(project_id, "Project with id {} not found", project_id);
                ServiceError::NotFound(format!("Project with id {} not found", project_id))
            })?;

        Project::delete(&self.db, project_id).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_project_detail_serializes_tasks_count_alongside_project() {
        let detail = ProjectDetail {
            project: Project {
                id: 1,
                name: "Board".to_string(),
                description: String::new(),
                owner_id: 2,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            tasks_count: 4,
        };

        let json = serde_json::to_value(&detail).expect("serialize");
        assert_eq!(json["name"], "Board");
        assert_eq!(json["tasksCount"], 4);
    }

    // Pipeline behavior (owner membership on create, Forbidden add_member,
    // NotFound remove_member) is covered in tests/service_tests.rs.
}
