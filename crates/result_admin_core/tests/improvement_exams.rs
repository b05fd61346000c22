mod support;

use result_admin_core::domain::ImprovementStatus;
use result_admin_core::filter::FilterMapping;
use result_admin_core::screens::ImprovementExamScreen;
use result_admin_core::{
    CrudWorkflow, FilterError, Method, ReferenceCache, ReferenceKind, Screen, TableView,
    WorkflowError,
};
use serde_json::{json, Value};
use std::sync::Arc;
use support::{sessions, FakeBackend};

fn exam(id: &str, status: &str, mark: Option<f64>) -> Value {
    json!({
        "_id": id,
        "student": { "_id": format!("st-{}", id), "name": format!("Student {}", id), "email": "s@uni.edu", "registrationNumber": format!("2019{}", id) },
        "course": { "_id": "c1", "code": "CSE101", "title": "Structured Programming", "credit": 3.0 },
        "session": { "_id": "s-2019", "name": "2019-20" },
        "status": status,
        "mark": mark
    })
}

fn exam_backend() -> Arc<FakeBackend> {
    let backend = FakeBackend::new();
    backend.reply(Method::Get, "/sessions", sessions());
    backend.reply(
        Method::Get,
        "/courses",
        json!({ "courses": [{ "_id": "c1", "code": "CSE101", "title": "Structured Programming" }] }),
    );
    backend.reply(
        Method::Get,
        "/students",
        json!({ "students": [{ "_id": "st-e1", "name": "Student e1", "registrationNumber": "2019e1" }] }),
    );
    backend.reply(
        Method::Get,
        "/improvement-exams",
        json!({ "improvementExams": [
            exam("e1", "pending", Some(35.0)),
            exam("e2", "in_progress", Some(55.0)),
            exam("e3", "completed", Some(72.0)),
            exam("e4", "pending", None),
            exam("e5", "archived", Some(90.0)),
        ]}),
    );
    backend
}

fn visible_ids(wf: &CrudWorkflow<ImprovementExamScreen>) -> Vec<String> {
    match wf.visible() {
        TableView::Rows(rows) => rows.iter().map(|e| e.id.clone()).collect(),
        TableView::Empty => Vec::new(),
    }
}

fn mapping(pairs: &[(&str, &str)]) -> FilterMapping {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn mark_range_filters_in_memory() {
    let backend = exam_backend();
    let mut wf = CrudWorkflow::<ImprovementExamScreen>::new(backend.clone(), ReferenceCache::new());
    wf.mount().await.expect("mount");
    backend.clear_calls();

    wf.search(&mapping(&[("minMark", "50"), ("maxMark", "75")]))
        .await
        .expect("search");

    assert_eq!(visible_ids(&wf), ["e2", "e3"]);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn non_numeric_bound_is_reported() {
    let backend = exam_backend();
    let mut wf = CrudWorkflow::<ImprovementExamScreen>::new(backend.clone(), ReferenceCache::new());
    wf.mount().await.expect("mount");

    let result = wf.search(&mapping(&[("minMark", "abc")])).await;

    assert!(matches!(
        result,
        Err(WorkflowError::Filter(FilterError::InvalidNumber { .. }))
    ));
    assert!(wf.error().is_some());
    assert_eq!(visible_ids(&wf).len(), 5);
}

#[tokio::test]
async fn status_is_a_server_side_filter() {
    let backend = exam_backend();
    let mut wf = CrudWorkflow::<ImprovementExamScreen>::new(backend.clone(), ReferenceCache::new());
    wf.mount().await.expect("mount");
    backend.clear_calls();

    wf.search(&mapping(&[("status", "pending")])).await.expect("search");

    let calls = backend.calls();
    let list = calls
        .iter()
        .find(|c| c.path == "/improvement-exams")
        .expect("list request");
    assert_eq!(list.query, vec![("status".to_string(), "pending".to_string())]);
}

#[tokio::test]
async fn unknown_status_surfaces_as_a_display_error() {
    let backend = exam_backend();
    let mut wf = CrudWorkflow::<ImprovementExamScreen>::new(backend.clone(), ReferenceCache::new());
    wf.mount().await.expect("mount");

    let archived = wf.find("e5").expect("loaded");
    assert_eq!(archived.status, ImprovementStatus::Invalid("archived".to_string()));
    let cells = ImprovementExamScreen::cells(archived);
    assert_eq!(cells[3], "Invalid status (archived)");
    assert_eq!(cells[5], "A+");

    let ungraded = ImprovementExamScreen::cells(wf.find("e4").expect("loaded"));
    assert_eq!(ungraded[4], "-");
}

#[tokio::test]
async fn student_options_include_the_registration_number() {
    let backend = exam_backend();
    let mut wf = CrudWorkflow::<ImprovementExamScreen>::new(backend.clone(), ReferenceCache::new());
    wf.mount().await.expect("mount");

    assert_eq!(
        wf.references().label(ReferenceKind::Students, "st-e1"),
        Some("Student e1 (2019e1)")
    );
    assert_eq!(
        wf.references().label(ReferenceKind::Courses, "c1"),
        Some("CSE101 - Structured Programming")
    );
}
