mod support;

use result_admin_core::domain::StudentPayload;
use result_admin_core::filter::FilterMapping;
use result_admin_core::screens::StudentScreen;
use result_admin_core::{CrudWorkflow, Method, PortError, ReferenceCache, ReferenceKind};
use serde_json::json;
use support::{sessions, student, student_backend};

fn payload() -> StudentPayload {
    StudentPayload {
        name: "Rahim".to_string(),
        email: "rahim@uni.edu".to_string(),
        phone: None,
        department: "d-cse".to_string(),
        session: "s-2019".to_string(),
    }
}

#[tokio::test]
async fn later_loads_reuse_the_references_from_mount() {
    let backend = student_backend();
    let mut wf = CrudWorkflow::<StudentScreen>::new(backend.clone(), ReferenceCache::new());
    wf.mount().await.expect("mount");
    backend.reply(
        Method::Put,
        "/students/st1",
        json!({ "success": true, "student": student("st1", "Rahim", "2019331001", "d-cse") }),
    );

    let by_department: FilterMapping = [("department".to_string(), "d-cse".to_string())]
        .into_iter()
        .collect();
    wf.search(&by_department).await.expect("search");
    wf.update("st1", &payload()).await.expect("update");
    wf.refresh().await.expect("refresh");
    wf.fetch_all().await.expect("fetch");

    assert_eq!(backend.count(Method::Get, "/students"), 5);
    assert_eq!(backend.count(Method::Get, "/departments"), 1);
    assert_eq!(backend.count(Method::Get, "/sessions"), 1);
}

#[tokio::test]
async fn mounting_another_screen_refetches_shared_references() {
    let backend = student_backend();
    let cache = ReferenceCache::new();
    let mut first = CrudWorkflow::<StudentScreen>::new(backend.clone(), cache.clone());
    first.mount().await.expect("first mount");
    assert!(cache.contains(ReferenceKind::Departments).await);

    backend.reply(
        Method::Get,
        "/departments",
        json!({ "departments": [
            { "_id": "d-cse", "name": "Computer Science" },
            { "_id": "d-eee", "name": "Electrical Engineering" },
            { "_id": "d-mat", "name": "Mathematics" }
        ]}),
    );
    let mut second = CrudWorkflow::<StudentScreen>::new(backend.clone(), cache.clone());
    second.mount().await.expect("second mount");

    assert_eq!(backend.count(Method::Get, "/departments"), 2);
    assert_eq!(second.options(ReferenceKind::Departments).len(), 3);
    // The first screen keeps the snapshot of its own last load.
    assert_eq!(first.options(ReferenceKind::Departments).len(), 2);
}

#[tokio::test]
async fn failed_reference_load_is_not_cached() {
    let backend = student_backend();
    backend.fail(
        Method::Get,
        "/sessions",
        PortError::Transport("connection reset".to_string()),
    );
    let cache = ReferenceCache::new();
    let mut wf = CrudWorkflow::<StudentScreen>::new(backend.clone(), cache.clone());

    assert!(wf.mount().await.is_err());
    assert!(!cache.contains(ReferenceKind::Sessions).await);

    backend.reply(Method::Get, "/sessions", sessions());
    wf.fetch_all().await.expect("retry");

    assert!(cache.contains(ReferenceKind::Sessions).await);
    assert_eq!(wf.options(ReferenceKind::Sessions).len(), 2);
    assert_eq!(backend.count(Method::Get, "/sessions"), 2);
}
