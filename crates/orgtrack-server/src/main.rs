//! orgtrack Server — process bootstrap.
//!
//! Connects to SurrealDB, applies migrations, optionally provisions a
//! bootstrap organization and logs a per-organization project report.

use std::env;
use std::error::Error;

use orgtrack_core::models::organization::CreateOrganization;
use orgtrack_core::repository::{OrganizationRepository, Store};
use orgtrack_db::{DbConfig, DbManager, SurrealStore};
use orgtrack_service::{ServiceConfig, Tracker};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orgtrack=info"));
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Starting orgtrack...");

    if let Err(e) = run().await {
        error!(error = %e, "orgtrack failed");
        std::process::exit(1);
    }

    info!("orgtrack stopped.");
}

async fn run() -> Result<(), BoxError> {
    let db_config = DbConfig::from_env();
    let manager = DbManager::connect(&db_config).await?;
    orgtrack_db::run_migrations(manager.client()).await?;

    let store = SurrealStore::new(manager.client().clone());
    bootstrap_organization(&store).await?;

    let tracker = Tracker::new(store, ServiceConfig::default());
    for organization in tracker.queries().list_organizations().await? {
        let projects = tracker.queries().list_projects(&organization.slug).await?;
        info!(slug = %organization.slug, projects = projects.len(), "Organization");
        for summary in projects {
            info!(
                slug = %organization.slug,
                project_id = %summary.project.id,
                name = %summary.project.name,
                status = %summary.project.status,
                task_count = summary.stats.task_count,
                completed_tasks = summary.stats.completed_tasks,
                completion_rate = summary.stats.completion_rate,
                "Project"
            );
        }
    }

    Ok(())
}

/// Creates the organization named by `ORGTRACK_BOOTSTRAP_ORG_*` unless
/// its slug already exists.
async fn bootstrap_organization<S: Store>(store: &S) -> Result<(), BoxError> {
    let Ok(slug) = env::var("ORGTRACK_BOOTSTRAP_ORG_SLUG") else {
        return Ok(());
    };

    match store.organizations().get_by_slug(&slug).await {
        Ok(_) => {
            info!(slug = %slug, "Bootstrap organization already present");
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            let organization = store
                .organizations()
                .create(CreateOrganization {
                    name: env::var("ORGTRACK_BOOTSTRAP_ORG_NAME").unwrap_or_else(|_| slug.clone()),
                    contact_email: env::var("ORGTRACK_BOOTSTRAP_ORG_EMAIL").unwrap_or_default(),
                    slug,
                })
                .await?;
            info!(
                organization_id = %organization.id,
                slug = %organization.slug,
                "Bootstrap organization created"
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
