//! Derived project fields computed on every read.

use orgtrack_core::error::OrgtrackResult;
use orgtrack_core::models::project::Project;
use orgtrack_core::models::task::{Task, TaskTally};
use orgtrack_core::repository::{Store, TaskRepository};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectStats {
    pub task_count: u64,
    pub completed_tasks: u64,
    /// Percentage of tasks that are DONE, in `[0.0, 100.0]`, two decimals.
    pub completion_rate: f64,
}

impl ProjectStats {
    pub fn from_tally(tally: TaskTally) -> Self {
        Self {
            task_count: tally.total,
            completed_tasks: tally.done,
            completion_rate: completion_rate(tally.done, tally.total),
        }
    }

    pub fn from_tasks(tasks: &[Task]) -> Self {
        let done = tasks.iter().filter(|t| t.status.is_done()).count() as u64;
        Self::from_tally(TaskTally {
            total: tasks.len() as u64,
            done,
        })
    }
}

/// `100 * completed / total` rounded to two decimals; `0.0` for no tasks.
pub fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = 100.0 * completed as f64 / total as f64;
    (percent * 100.0).round() / 100.0
}

/// Reads live task counts for projects. Nothing is cached.
#[derive(Clone)]
pub struct AggregateCalculator<S: Store> {
    store: S,
}

impl<S: Store> AggregateCalculator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn project_stats(&self, project: &Project) -> OrgtrackResult<ProjectStats> {
        let tally = self.store.tasks().tally_by_project(project.id).await?;
        Ok(ProjectStats::from_tally(tally))
    }
}
