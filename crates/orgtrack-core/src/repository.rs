//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups by id are global here;
//! tenant scoping is layered on top by the service crate, except for
//! [`ProjectRepository::get_in_organization`] which the store can answer
//! in a single query.

use uuid::Uuid;

use crate::error::OrgtrackResult;
use crate::models::{
    comment::{Comment, CreateComment},
    organization::{CreateOrganization, Organization},
    project::{CreateProject, Project, UpdateProject},
    task::{CreateTask, Task, TaskTally, UpdateTask},
};

// ---------------------------------------------------------------------------
// Organization (root of the hierarchy)
// ---------------------------------------------------------------------------

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = OrgtrackResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgtrackResult<Organization>> + Send;
    fn get_by_slug(&self, slug: &str)
    -> impl Future<Output = OrgtrackResult<Organization>> + Send;
    /// Deleting an organization cascades to its projects, their tasks and
    /// the tasks' comments.
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgtrackResult<()>> + Send;
    /// All organizations, oldest first.
    fn list(&self) -> impl Future<Output = OrgtrackResult<Vec<Organization>>> + Send;
}

// ---------------------------------------------------------------------------
// Organization-owned records
// ---------------------------------------------------------------------------

pub trait ProjectRepository: Send + Sync {
    /// Fails with `Constraint` if the organization does not exist.
    fn create(&self, input: CreateProject) -> impl Future<Output = OrgtrackResult<Project>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgtrackResult<Project>> + Send;
    /// `NotFound` unless the project exists and belongs to the organization.
    fn get_in_organization(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = OrgtrackResult<Project>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProject,
    ) -> impl Future<Output = OrgtrackResult<Project>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgtrackResult<()>> + Send;
    fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = OrgtrackResult<Vec<Project>>> + Send;
}

pub trait TaskRepository: Send + Sync {
    /// Fails with `Constraint` if the project does not exist.
    fn create(&self, input: CreateTask) -> impl Future<Output = OrgtrackResult<Task>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgtrackResult<Task>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTask,
    ) -> impl Future<Output = OrgtrackResult<Task>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgtrackResult<()>> + Send;
    fn list_by_project(
        &self,
        project_id: Uuid,
    ) -> impl Future<Output = OrgtrackResult<Vec<Task>>> + Send;
    /// Total and completed task counts for a project, read live.
    fn tally_by_project(
        &self,
        project_id: Uuid,
    ) -> impl Future<Output = OrgtrackResult<TaskTally>> + Send;
}

pub trait CommentRepository: Send + Sync {
    /// Fails with `Constraint` if the task does not exist.
    fn create(&self, input: CreateComment) -> impl Future<Output = OrgtrackResult<Comment>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgtrackResult<Comment>> + Send;
    /// Comments on a task, oldest first.
    fn list_by_task(
        &self,
        task_id: Uuid,
    ) -> impl Future<Output = OrgtrackResult<Vec<Comment>>> + Send;
}

// ---------------------------------------------------------------------------
// Store bundle
// ---------------------------------------------------------------------------

/// One repository per entity kind, backed by the same store.
///
/// Services are generic over this trait so they carry no dependency on
/// a particular database crate.
pub trait Store: Clone + Send + Sync {
    type Organizations: OrganizationRepository;
    type Projects: ProjectRepository;
    type Tasks: TaskRepository;
    type Comments: CommentRepository;

    fn organizations(&self) -> &Self::Organizations;
    fn projects(&self) -> &Self::Projects;
    fn tasks(&self) -> &Self::Tasks;
    fn comments(&self) -> &Self::Comments;
}
