//! Mutations, invalidation and views through the high-level client

use serde_json::{json, Value};
use std::sync::Arc;
use taskboard_client::{CreateProjectInput, CreateTaskInput, ProjectStatus, TaskPriority, TaskStatus};
use taskboard_sdk::{
    MockGateway, Mutation, MutationOutcome, QueryKey, QueryStatus, SdkConfig, SdkError,
    TaskFilter, TaskboardClient, ViewParams,
};

fn setup(gateway: MockGateway) -> (TaskboardClient, Arc<MockGateway>) {
    let gateway = Arc::new(gateway);
    let client = TaskboardClient::new(gateway.clone(), SdkConfig::default());
    (client, gateway)
}

fn task_json(id: &str, status: &str, due: Option<&str>) -> Value {
    json!({
        "_id": id,
        "title": format!("Task {}", id),
        "status": status,
        "priority": "Medium",
        "dueDate": due,
        "project": {"_id": "p1", "title": "Launch"},
        "isArchived": false
    })
}

fn status_update() -> Mutation {
    Mutation::UpdateTaskStatus {
        task_id: "t1".into(),
        status: TaskStatus::Done,
    }
}

#[tokio::test]
async fn test_failed_mutation_leaves_cache_untouched() {
    let (client, gateway) = setup(MockGateway::new());
    client.cache().set(QueryKey::Task("t1".into()), json!({"title": "cached"}));
    gateway.set_mutation_failure(SdkError::Server {
        status: 403,
        message: "You are not a member of this project".into(),
    });

    let outcome = client.execute(status_update()).await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.message(), Some("You are not a member of this project"));
    let snapshot = client.cache().get(&QueryKey::Task("t1".into()));
    assert!(!snapshot.is_stale);
    assert_eq!(snapshot.data.unwrap()["title"], "cached");
}

#[tokio::test]
async fn test_status_update_invalidates_task_and_activity_only() {
    let (client, gateway) = setup(MockGateway::new());
    let cache = client.cache();
    for key in [
        QueryKey::Task("t1".into()),
        QueryKey::TaskActivity("t1".into()),
        QueryKey::Comments("t1".into()),
        QueryKey::Task("t2".into()),
        QueryKey::Project("p1".into()),
    ] {
        cache.set(key, json!({}));
    }
    gateway.set_mutation_response(task_json("t1", "Done", None));

    let outcome = client.execute(status_update()).await;
    assert!(outcome.is_success());

    assert!(cache.get(&QueryKey::Task("t1".into())).is_stale);
    assert!(cache.get(&QueryKey::TaskActivity("t1".into())).is_stale);
    assert!(!cache.get(&QueryKey::Comments("t1".into())).is_stale);
    assert!(!cache.get(&QueryKey::Task("t2".into())).is_stale);
    assert!(!cache.get(&QueryKey::Project("p1".into())).is_stale);
}

#[tokio::test]
async fn test_validation_failure_never_reaches_gateway() {
    let (client, gateway) = setup(MockGateway::new());

    let outcome = client
        .execute(Mutation::CreateTask {
            project_id: "p1".into(),
            input: CreateTaskInput {
                title: String::new(),
                description: None,
                status: TaskStatus::Todo,
                priority: TaskPriority::High,
                due_date: "2024-06-01".into(),
                assignees: vec![],
            },
        })
        .await;

    assert_eq!(gateway.mutation_count(), 0);
    match outcome {
        MutationOutcome::Failure {
            error: SdkError::Validation(errors),
            ..
        } => {
            assert_eq!(errors.field("title"), ["Task title is required"]);
            assert_eq!(errors.field("assignees"), ["At least one assignee is required"]);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_project_invalidates_workspace_family() {
    let (client, gateway) = setup(MockGateway::new());
    let cache = client.cache();
    for key in [
        QueryKey::Workspace("w1".into()),
        QueryKey::WorkspaceStats("w1".into()),
        QueryKey::WorkspaceDetails("w1".into()),
        QueryKey::Workspace("w2".into()),
        QueryKey::Workspaces,
    ] {
        cache.set(key, json!({}));
    }
    gateway.set_mutation_response(json!({"_id": "p9", "title": "Website", "workspace": "w1"}));

    let outcome = client
        .execute(Mutation::CreateProject {
            workspace_id: "w1".into(),
            input: CreateProjectInput {
                title: "Website".into(),
                description: None,
                status: ProjectStatus::Planning,
                start_date: "2024-01-01".into(),
                due_date: "2024-03-31".into(),
                members: vec![],
                tags: None,
            },
        })
        .await;
    assert!(outcome.is_success());

    assert!(cache.get(&QueryKey::Workspace("w1".into())).is_stale);
    assert!(cache.get(&QueryKey::WorkspaceStats("w1".into())).is_stale);
    assert!(cache.get(&QueryKey::WorkspaceDetails("w1".into())).is_stale);
    assert!(!cache.get(&QueryKey::Workspace("w2".into())).is_stale);
    assert!(!cache.get(&QueryKey::Workspaces).is_stale);
}

#[tokio::test]
async fn test_my_tasks_view_filters_and_sorts() {
    let tasks = json!([
        task_json("a", "To Do", Some("2024-01-03T00:00:00Z")),
        task_json("b", "Done", Some("2024-01-02T00:00:00Z")),
        task_json("c", "To Do", None),
        task_json("d", "To Do", Some("2024-01-01T00:00:00Z")),
    ]);
    let (client, gateway) =
        setup(MockGateway::new().with_response(QueryKey::MyTasks("u1".into()), tasks));

    let params = ViewParams {
        filter: TaskFilter::Todo,
        ..ViewParams::from_query("sort=asc").unwrap()
    };
    let view = client.my_tasks_view("u1", &params).await.unwrap();
    let ids: Vec<&str> = view.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["d", "c", "a"]);

    // Second view of the same key comes from the cache
    client.my_tasks_view("u1", &ViewParams::default()).await.unwrap();
    assert_eq!(gateway.fetch_count(&QueryKey::MyTasks("u1".into())), 1);
}

#[tokio::test]
async fn test_session_load_and_logout() {
    let (client, _gateway) = setup(MockGateway::new().with_response(
        QueryKey::User,
        json!({"_id": "u1", "name": "Ana", "email": "ana@example.com"}),
    ));
    client.cache().set(QueryKey::Workspaces, json!([]));

    let mut session = client.session();
    assert!(session.require_user().is_err());

    assert_eq!(session.load().await.unwrap().name, "Ana");
    assert!(session.is_authenticated());
    assert_eq!(session.enforcer().unwrap().user_id(), "u1");

    session.logout();
    assert!(!session.is_authenticated());
    assert!(client.cache().is_empty());
    assert_eq!(client.cache().get(&QueryKey::User).status, QueryStatus::Pending);
}
