//! Integration tests for the mutation engine over an in-memory store.

use orgtrack_core::OrgtrackError;
use orgtrack_core::models::organization::CreateOrganization;
use orgtrack_core::models::status::{ProjectStatus, TaskStatus};
use orgtrack_core::repository::{OrganizationRepository, Store, TaskRepository};
use orgtrack_db::SurrealStore;
use orgtrack_service::{
    CreateProjectInput, CreateTaskCommentInput, CreateTaskInput, ServiceConfig, Tracker,
    UpdateProjectInput, UpdateTaskInput, UpdateTaskStatusInput,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Spin up in-memory DB, run migrations, create the `acme` and `other`
/// organizations.
async fn setup_with(config: ServiceConfig) -> (Tracker<SurrealStore<Db>>, SurrealStore<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    orgtrack_db::run_migrations(&db).await.unwrap();

    let store = SurrealStore::new(db);
    for slug in ["acme", "other"] {
        store
            .organizations()
            .create(CreateOrganization {
                name: slug.to_uppercase(),
                slug: slug.into(),
                contact_email: format!("ops@{slug}.test"),
            })
            .await
            .unwrap();
    }

    (Tracker::new(store.clone(), config), store)
}

async fn setup() -> (Tracker<SurrealStore<Db>>, SurrealStore<Db>) {
    setup_with(ServiceConfig::default()).await
}

fn new_project(slug: &str, name: &str) -> CreateProjectInput {
    CreateProjectInput {
        organization_slug: slug.into(),
        name: name.into(),
        ..Default::default()
    }
}

fn new_task(project_id: Uuid, slug: &str, title: &str) -> CreateTaskInput {
    CreateTaskInput {
        project_id: project_id.to_string(),
        organization_slug: slug.into(),
        title: title.into(),
        status: "TODO".into(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_project_applies_defaults() {
    let (tracker, _) = setup().await;

    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();

    assert_eq!(project.name, "Launch");
    assert_eq!(project.description, "");
    assert_eq!(project.status, ProjectStatus::Active);
    assert!(project.due_date.is_none());
}

#[tokio::test]
async fn create_project_parses_optional_fields() {
    let (tracker, _) = setup().await;

    let project = tracker
        .mutations()
        .create_project(CreateProjectInput {
            description: Some("Q3 launch".into()),
            status: Some("ON_HOLD".into()),
            due_date: Some("2030-09-30".into()),
            ..new_project("acme", "Launch")
        })
        .await
        .unwrap();

    assert_eq!(project.description, "Q3 launch");
    assert_eq!(project.status, ProjectStatus::OnHold);
    assert_eq!(project.due_date.unwrap().to_string(), "2030-09-30");
}

#[tokio::test]
async fn create_project_in_unknown_organization_is_not_found() {
    let (tracker, _) = setup().await;

    let err = tracker
        .mutations()
        .create_project(new_project("nobody", "Launch"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn create_project_rejects_bad_input() {
    let (tracker, _) = setup().await;
    let mutations = tracker.mutations();

    let cases = [
        new_project("acme", ""),
        new_project("acme", &"x".repeat(201)),
        new_project("", "Launch"),
        CreateProjectInput {
            status: Some("ARCHIVED".into()),
            ..new_project("acme", "Launch")
        },
        CreateProjectInput {
            due_date: Some("tomorrow".into()),
            ..new_project("acme", "Launch")
        },
    ];
    for input in cases {
        let err = mutations.create_project(input.clone()).await.unwrap_err();
        assert!(err.is_validation(), "{input:?} gave {err:?}");
    }

    let listed = tracker.queries().list_projects("acme").await.unwrap();
    assert!(listed.is_empty(), "no project may be written on failure");
}

#[tokio::test]
async fn update_project_patches_only_supplied_fields() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(CreateProjectInput {
            description: Some("keep".into()),
            due_date: Some("2030-01-01".into()),
            ..new_project("acme", "Launch")
        })
        .await
        .unwrap();

    let patch = UpdateProjectInput {
        project_id: project.id.to_string(),
        name: Some("Relaunch".into()),
        ..Default::default()
    };
    let updated = tracker
        .mutations()
        .update_project(patch.clone())
        .await
        .unwrap();

    assert_eq!(updated.name, "Relaunch");
    assert_eq!(updated.description, "keep");
    assert_eq!(updated.status, ProjectStatus::Active);
    assert_eq!(updated.due_date, project.due_date);

    let again = tracker.mutations().update_project(patch).await.unwrap();
    assert_eq!(again.name, updated.name);
    assert_eq!(again.description, updated.description);
    assert_eq!(again.due_date, updated.due_date);
}

#[tokio::test]
async fn update_project_can_clear_nullable_fields() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(CreateProjectInput {
            description: Some("old".into()),
            due_date: Some("2030-01-01".into()),
            ..new_project("acme", "Launch")
        })
        .await
        .unwrap();

    let updated = tracker
        .mutations()
        .update_project(UpdateProjectInput {
            project_id: project.id.to_string(),
            description: Some(Some(String::new())),
            due_date: Some(None),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.description, "");
    assert!(updated.due_date.is_none());
    assert_eq!(updated.name, "Launch");
}

#[tokio::test]
async fn update_project_with_wrong_organization_is_not_found() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();

    let err = tracker
        .mutations()
        .update_project(UpdateProjectInput {
            project_id: project.id.to_string(),
            organization_slug: Some("other".into()),
            name: Some("Hijacked".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let projects = tracker.queries().list_projects("acme").await.unwrap();
    assert_eq!(projects[0].project.name, "Launch");
}

#[tokio::test]
async fn update_scope_can_be_required() {
    let (tracker, _) = setup_with(ServiceConfig {
        require_update_scope: true,
        ..Default::default()
    })
    .await;
    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();

    let err = tracker
        .mutations()
        .update_project(UpdateProjectInput {
            project_id: project.id.to_string(),
            name: Some("Renamed".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let ok = tracker
        .mutations()
        .update_project(UpdateProjectInput {
            project_id: project.id.to_string(),
            organization_slug: Some("acme".into()),
            name: Some("Renamed".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ok.name, "Renamed");
}

#[tokio::test]
async fn update_project_rejects_malformed_id() {
    let (tracker, _) = setup().await;

    let err = tracker
        .mutations()
        .update_project(UpdateProjectInput {
            project_id: "17".into(),
            name: Some("x".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn update_unknown_project_is_not_found() {
    let (tracker, _) = setup().await;

    let err = tracker
        .mutations()
        .update_project(UpdateProjectInput {
            project_id: Uuid::new_v4().to_string(),
            name: Some("x".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_task_requires_status() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();

    let err = tracker
        .mutations()
        .create_task(CreateTaskInput {
            status: String::new(),
            ..new_task(project.id, "acme", "Write docs")
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = tracker
        .mutations()
        .create_task(CreateTaskInput {
            status: "BLOCKED".into(),
            ..new_task(project.id, "acme", "Write docs")
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn create_task_in_foreign_project_is_rejected_without_write() {
    let (tracker, store) = setup().await;
    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();

    let err = tracker
        .mutations()
        .create_task(new_task(project.id, "other", "Sneaky"))
        .await
        .unwrap_err();
    assert!(err.is_validation(), "expected validation error, got {err:?}");

    let tasks = store.tasks().list_by_project(project.id).await.unwrap();
    assert!(tasks.is_empty(), "no task may be created");
}

#[tokio::test]
async fn create_task_with_unknown_project_is_not_found() {
    let (tracker, _) = setup().await;

    let err = tracker
        .mutations()
        .create_task(new_task(Uuid::new_v4(), "acme", "Ghost"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn create_task_validates_assignee_and_due_date() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();

    let task = tracker
        .mutations()
        .create_task(CreateTaskInput {
            assignee_email: Some("dev@acme.test".into()),
            due_date: Some("2030-05-01T09:30:00Z".into()),
            ..new_task(project.id, "acme", "Write docs")
        })
        .await
        .unwrap();
    assert_eq!(task.assignee_email, "dev@acme.test");
    assert_eq!(task.description, "");
    assert!(task.due_date.is_some());

    let err = tracker
        .mutations()
        .create_task(CreateTaskInput {
            assignee_email: Some("not-an-email".into()),
            ..new_task(project.id, "acme", "Bad")
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = tracker
        .mutations()
        .create_task(CreateTaskInput {
            due_date: Some("2030-05-01".into()),
            ..new_task(project.id, "acme", "Bad")
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn update_task_patches_only_supplied_fields() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();
    let task = tracker
        .mutations()
        .create_task(CreateTaskInput {
            description: Some("draft".into()),
            assignee_email: Some("dev@acme.test".into()),
            ..new_task(project.id, "acme", "Write docs")
        })
        .await
        .unwrap();

    let updated = tracker
        .mutations()
        .update_task(UpdateTaskInput {
            task_id: task.id.to_string(),
            title: Some("Write better docs".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.title, "Write better docs");
    assert_eq!(updated.description, "draft");
    assert_eq!(updated.assignee_email, "dev@acme.test");
    assert_eq!(updated.status, TaskStatus::Todo);
    assert_eq!(updated.created_at, task.created_at);

    let unassigned = tracker
        .mutations()
        .update_task(UpdateTaskInput {
            task_id: task.id.to_string(),
            assignee_email: Some(None),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(unassigned.assignee_email, "");
    assert_eq!(unassigned.title, "Write better docs");
}

#[tokio::test]
async fn update_task_with_wrong_organization_is_not_found() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();
    let task = tracker
        .mutations()
        .create_task(new_task(project.id, "acme", "Write docs"))
        .await
        .unwrap();

    let err = tracker
        .mutations()
        .update_task_status(UpdateTaskStatusInput {
            task_id: task.id.to_string(),
            organization_slug: Some("other".into()),
            status: "DONE".into(),
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = tracker
        .mutations()
        .update_task(UpdateTaskInput {
            task_id: task.id.to_string(),
            organization_slug: Some("other".into()),
            title: Some("Hijacked".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn update_task_status_rejects_unknown_status() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();
    let task = tracker
        .mutations()
        .create_task(new_task(project.id, "acme", "Write docs"))
        .await
        .unwrap();

    let err = tracker
        .mutations()
        .update_task_status(UpdateTaskStatusInput {
            task_id: task.id.to_string(),
            status: "done".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, OrgtrackError::Validation { .. }));
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_comment_validates_input() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();
    let task = tracker
        .mutations()
        .create_task(new_task(project.id, "acme", "Write docs"))
        .await
        .unwrap();

    let base = CreateTaskCommentInput {
        task_id: task.id.to_string(),
        content: "lgtm".into(),
        author_email: "a@x.com".into(),
        ..Default::default()
    };

    for input in [
        CreateTaskCommentInput {
            content: "  ".into(),
            ..base.clone()
        },
        CreateTaskCommentInput {
            author_email: String::new(),
            ..base.clone()
        },
        CreateTaskCommentInput {
            author_email: "nobody".into(),
            ..base.clone()
        },
        CreateTaskCommentInput {
            task_id: "abc".into(),
            ..base.clone()
        },
    ] {
        let err = tracker
            .mutations()
            .create_task_comment(input)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    let comment = tracker.mutations().create_task_comment(base).await.unwrap();
    assert_eq!(comment.task_id, task.id);
}

#[tokio::test]
async fn comment_on_unknown_task_is_not_found() {
    let (tracker, _) = setup().await;

    let err = tracker
        .mutations()
        .create_task_comment(CreateTaskCommentInput {
            task_id: Uuid::new_v4().to_string(),
            content: "hello".into(),
            author_email: "a@x.com".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn scoped_comment_outside_organization_is_not_found() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(new_project("acme", "Launch"))
        .await
        .unwrap();
    let task = tracker
        .mutations()
        .create_task(new_task(project.id, "acme", "Write docs"))
        .await
        .unwrap();

    let err = tracker
        .mutations()
        .create_task_comment(CreateTaskCommentInput {
            task_id: task.id.to_string(),
            organization_slug: Some("other".into()),
            content: "sneaky".into(),
            author_email: "a@x.com".into(),
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let comments = tracker
        .queries()
        .list_task_comments(&task.id.to_string(), "acme")
        .await
        .unwrap();
    assert!(comments.is_empty());
}

#[test]
fn wire_inputs_deserialize_with_defaults() {
    let input: UpdateTaskInput = serde_json::from_str(
        r#"{"task_id": "00000000-0000-0000-0000-000000000000", "due_date": null}"#,
    )
    .unwrap();
    assert_eq!(input.due_date, Some(None));
    assert!(input.title.is_none());

    let input: CreateProjectInput =
        serde_json::from_str(r#"{"organization_slug": "acme", "name": "Launch"}"#).unwrap();
    assert!(input.status.is_none());
    assert!(input.description.is_none());
}

#[test]
fn explicit_null_is_distinct_from_absent() {
    let input: UpdateTaskInput = serde_json::from_str(
        r#"{"task_id": "x", "description": null, "assignee_email": null}"#,
    )
    .unwrap();
    assert_eq!(input.description, Some(None));
    assert_eq!(input.assignee_email, Some(None));

    let input: UpdateTaskInput = serde_json::from_str(r#"{"task_id": "x"}"#).unwrap();
    assert!(input.description.is_none());
    assert!(input.assignee_email.is_none());

    let input: UpdateProjectInput =
        serde_json::from_str(r#"{"project_id": "x", "description": null}"#).unwrap();
    assert_eq!(input.description, Some(None));
}

#[tokio::test]
async fn null_description_clears_the_field() {
    let (tracker, _) = setup().await;
    let project = tracker
        .mutations()
        .create_project(CreateProjectInput {
            description: Some("old".into()),
            ..new_project("acme", "Launch")
        })
        .await
        .unwrap();

    let patch: UpdateProjectInput = serde_json::from_str(&format!(
        r#"{{"project_id": "{}", "description": null}}"#,
        project.id
    ))
    .unwrap();
    let updated = tracker.mutations().update_project(patch).await.unwrap();
    assert_eq!(updated.description, "");
    assert_eq!(updated.name, "Launch");
}
