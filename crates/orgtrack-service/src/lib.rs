//! orgtrack Service — tenant-scoped queries and mutations over the
//! organization → project → task → comment hierarchy.
//!
//! Every read is bounded by an organization slug. Mutations validate
//! their inputs and scope before performing a single store write.

pub mod config;
pub mod error;
pub mod input;
pub mod mutation;
pub mod query;
pub mod scope;
pub mod stats;

pub use config::ServiceConfig;
pub use error::InputError;
pub use mutation::{
    CreateProjectInput, CreateTaskCommentInput, CreateTaskInput, MutationEngine,
    UpdateProjectInput, UpdateTaskInput, UpdateTaskStatusInput,
};
pub use query::{ProjectDetail, ProjectSummary, QueryFacade, TaskDetail};
pub use scope::ScopeResolver;
pub use stats::{AggregateCalculator, ProjectStats};

use orgtrack_core::repository::Store;

/// Query façade and mutation engine sharing one store.
pub struct Tracker<S: Store> {
    queries: QueryFacade<S>,
    mutations: MutationEngine<S>,
}

impl<S: Store> Tracker<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self {
            queries: QueryFacade::new(store.clone()),
            mutations: MutationEngine::new(store, config),
        }
    }

    pub fn queries(&self) -> &QueryFacade<S> {
        &self.queries
    }

    pub fn mutations(&self) -> &MutationEngine<S> {
        &self.mutations
    }
}
