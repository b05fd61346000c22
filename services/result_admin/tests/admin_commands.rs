use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use result_admin_core::{PageSize, ReferenceKind, RemoteDataClient};
use result_admin_lib::adapters::HttpDataClient;
use result_admin_lib::cli::{ListArgs, ScreenName};
use result_admin_lib::commands::{AdminContext, ScreenAction};
use result_admin_lib::error::AdminError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Hits {
    deletes: AtomicUsize,
    lists: AtomicUsize,
}

fn student(id: &str, name: &str, dept: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@uni.edu", name.to_lowercase()),
        "registrationNumber": format!("2019331{}", &id[2..]),
        "department": { "_id": dept, "name": dept.to_uppercase() },
        "session": { "_id": "s-2019", "name": "2019-20" }
    })
}

async fn list_students(
    State(hits): State<Arc<Hits>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    hits.lists.fetch_add(1, Ordering::SeqCst);
    let all = vec![
        student("st001", "Rahim", "d-cse"),
        student("st002", "Karima", "d-cse"),
        student("st003", "Nadia", "d-eee"),
    ];
    let students: Vec<Value> = match params.get("department") {
        Some(dept) => all
            .into_iter()
            .filter(|s| s["department"]["_id"] == dept.as_str())
            .collect(),
        None => all,
    };
    Json(json!({ "success": true, "students": students }))
}

async fn create_student(Json(body): Json<Value>) -> Json<Value> {
    let name = body["name"].as_str().unwrap_or("New").to_string();
    Json(json!({
        "success": true,
        "student": student("st004", &name, "d-cse"),
        "initialPassword": "pw-123"
    }))
}

async fn delete_student(State(hits): State<Arc<Hits>>, Path(_id): Path<String>) -> Json<Value> {
    hits.deletes.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "success": true }))
}

async fn list_results(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let results = if params.get("student").map(String::as_str) == Some("st001") {
        json!([
            {
                "_id": "r1", "mark": 85.0,
                "student": { "_id": "st001", "name": "Rahim", "registrationNumber": "2019331001" },
                "course": { "_id": "c1", "code": "CSE101", "title": "Programming", "credit": 3.0 }
            },
            {
                "_id": "r2", "mark": 62.0,
                "student": { "_id": "st001", "name": "Rahim", "registrationNumber": "2019331001" },
                "course": { "_id": "c2", "code": "MAT101", "title": "Calculus", "credit": 1.5 }
            }
        ])
    } else {
        json!([])
    };
    Json(json!({ "success": true, "results": results }))
}

async fn start() -> (AdminContext, Arc<Hits>) {
    let hits = Arc::new(Hits::default());
    let app = Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/{id}", delete(delete_student))
        .route(
            "/departments",
            get(|| async {
                Json(json!({ "departments": [
                    { "_id": "d-cse", "name": "CSE" },
                    { "_id": "d-eee", "name": "EEE" }
                ]}))
            }),
        )
        .route(
            "/sessions",
            get(|| async { Json(json!({ "sessions": [{ "_id": "s-2019", "name": "2019-20" }] })) }),
        )
        .route(
            "/courses",
            get(|| async { Json(json!({ "courses": [{ "_id": "c1", "code": "CSE101", "title": "Programming" }] })) }),
        )
        .route("/results", get(list_results))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let client: Arc<dyn RemoteDataClient> = Arc::new(
        HttpDataClient::new(format!("http://{}", addr), Duration::from_secs(5)).expect("client"),
    );
    (AdminContext::new(client, PageSize::Ten), hits)
}

fn never_asked(_: &str) -> Result<bool, AdminError> {
    panic!("confirmation should not be requested");
}

#[tokio::test]
async fn list_renders_filtered_rows() {
    let (ctx, _) = start().await;
    let args = ListArgs {
        query: Some("kar".to_string()),
        filters: vec![("department".to_string(), "d-cse".to_string())],
        page: 1,
        page_size: None,
    };

    let output = ctx
        .run_screen(ScreenName::Students, ScreenAction::List(args), &never_asked)
        .await
        .expect("list");

    assert!(output.contains("Karima"));
    assert!(!output.contains("Rahim"));
    assert!(!output.contains("Nadia"));
}

#[tokio::test]
async fn unsupported_page_size_is_rejected() {
    let (ctx, _) = start().await;
    let args = ListArgs {
        page: 1,
        page_size: Some(7),
        ..ListArgs::default()
    };

    let err = ctx
        .run_screen(ScreenName::Students, ScreenAction::List(args), &never_asked)
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::PageSize(_)));
}

#[tokio::test]
async fn create_prints_the_initial_password_once() {
    let (ctx, _) = start().await;

    let output = ctx
        .run_screen(
            ScreenName::Students,
            ScreenAction::Create(
                json!({ "name": "Jamal", "email": "jamal@uni.edu", "department": "d-cse", "session": "s-2019" })
                    .to_string(),
            ),
            &never_asked,
        )
        .await
        .expect("create");

    assert!(output.contains("Created 2019331004"));
    assert!(output.contains("Initial password for 2019331004: pw-123"));
}

#[tokio::test]
async fn malformed_payload_never_reaches_the_backend() {
    let (ctx, hits) = start().await;

    let err = ctx
        .run_screen(
            ScreenName::Students,
            ScreenAction::Create("{ \"name\": ".to_string()),
            &never_asked,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::Json(_)));
    assert_eq!(hits.lists.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let (ctx, hits) = start().await;
    let decline = |_: &str| -> Result<bool, AdminError> { Ok(false) };

    let output = ctx
        .run_screen(
            ScreenName::Students,
            ScreenAction::Delete {
                id: "st002".to_string(),
                yes: false,
            },
            &decline,
        )
        .await
        .expect("delete flow");

    assert_eq!(output, "Cancelled.\n");
    assert_eq!(hits.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn confirmed_delete_removes_and_refreshes() {
    let (ctx, hits) = start().await;
    let accept = |prompt: &str| -> Result<bool, AdminError> {
        assert!(prompt.contains("2019331002"));
        Ok(true)
    };

    ctx.run_screen(
        ScreenName::Students,
        ScreenAction::Delete {
            id: "st002".to_string(),
            yes: false,
        },
        &accept,
    )
    .await
    .expect("delete");

    assert_eq!(hits.deletes.load(Ordering::SeqCst), 1);
    // Mount plus the refresh after the delete.
    assert_eq!(hits.lists.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unknown_id_is_reported() {
    let (ctx, _) = start().await;
    let err = ctx
        .run_screen(ScreenName::Students, ScreenAction::Show("nope".to_string()), &never_asked)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::NotFound { id, .. } if id == "nope"));
}

#[tokio::test]
async fn transcript_weights_grade_points_by_credit() {
    let (ctx, _) = start().await;

    let output = ctx.transcript("st001").await.expect("transcript");

    assert!(output.contains("Rahim (2019331001)"));
    assert!(output.contains("A+"));
    assert!(output.contains("CGPA 3.67 over 4.5 credits"));
}

#[tokio::test]
async fn options_list_reference_labels() {
    let (ctx, _) = start().await;
    let output = ctx.options(ReferenceKind::Courses).await.expect("options");
    assert!(output.contains("CSE101 - Programming"));
}
