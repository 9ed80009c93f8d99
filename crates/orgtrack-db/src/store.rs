//! All four repositories over one SurrealDB handle.

use orgtrack_core::repository::Store;
use surrealdb::{Connection, Surreal};

use crate::repository::{
    SurrealCommentRepository, SurrealOrganizationRepository, SurrealProjectRepository,
    SurrealTaskRepository,
};

pub struct SurrealStore<C: Connection> {
    organizations: SurrealOrganizationRepository<C>,
    projects: SurrealProjectRepository<C>,
    tasks: SurrealTaskRepository<C>,
    comments: SurrealCommentRepository<C>,
}

// Written by hand: a derive would add a `C: Clone` bound.
impl<C: Connection> Clone for SurrealStore<C> {
    fn clone(&self) -> Self {
        Self {
            organizations: self.organizations.clone(),
            projects: self.projects.clone(),
            tasks: self.tasks.clone(),
            comments: self.comments.clone(),
        }
    }
}

impl<C: Connection> SurrealStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            organizations: SurrealOrganizationRepository::new(db.clone()),
            projects: SurrealProjectRepository::new(db.clone()),
            tasks: SurrealTaskRepository::new(db.clone()),
            comments: SurrealCommentRepository::new(db),
        }
    }
}

impl<C: Connection> Store for SurrealStore<C> {
    type Organizations = SurrealOrganizationRepository<C>;
    type Projects = SurrealProjectRepository<C>;
    type Tasks = SurrealTaskRepository<C>;
    type Comments = SurrealCommentRepository<C>;

    fn organizations(&self) -> &Self::Organizations {
        &self.organizations
    }

    fn projects(&self) -> &Self::Projects {
        &self.projects
    }

    fn tasks(&self) -> &Self::Tasks {
        &self.tasks
    }

    fn comments(&self) -> &Self::Comments {
        &self.comments
    }
}
