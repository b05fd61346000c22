//! In-memory backend shared by the workflow integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use result_admin_core::domain::SessionSnapshot;
use result_admin_core::ports::{ApiRequest, Method, PortError, PortResult, RemoteDataClient, SessionStore};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Records every request and answers from queued replies per route.
/// The last remaining reply for a route is sticky.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<ApiRequest>>,
    routes: Mutex<HashMap<(Method, String), VecDeque<PortResult<Value>>>>,
    bearer: Mutex<Option<String>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Replaces every queued reply for the route with `body`.
    pub fn reply(&self, method: Method, path: &str, body: Value) {
        self.set(method, path, Ok(body));
    }

    pub fn fail(&self, method: Method, path: &str, err: PortError) {
        self.set(method, path, Err(err));
    }

    /// Queues `body` after the route's existing replies.
    pub fn enqueue(&self, method: Method, path: &str, body: Value) {
        self.routes
            .lock()
            .expect("routes lock")
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Ok(body));
    }

    fn set(&self, method: Method, path: &str, reply: PortResult<Value>) {
        self.routes
            .lock()
            .expect("routes lock")
            .insert((method, path.to_string()), VecDeque::from([reply]));
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("calls lock").clear();
    }

    pub fn bearer(&self) -> Option<String> {
        self.bearer.lock().expect("bearer lock").clone()
    }
}

#[async_trait]
impl RemoteDataClient for FakeBackend {
    async fn send(&self, request: ApiRequest) -> PortResult<Value> {
        let key = (request.method, request.path.clone());
        self.calls.lock().expect("calls lock").push(request);

        let mut routes = self.routes.lock().expect("routes lock");
        let Some(queue) = routes.get_mut(&key) else {
            return Err(PortError::Api {
                status: 404,
                message: format!("no route for {:?} {}", key.0, key.1),
            });
        };
        if queue.len() > 1 {
            queue.pop_front().expect("non-empty queue")
        } else {
            queue.front().cloned().expect("route has a reply")
        }
    }

    fn set_bearer(&self, token: Option<String>) {
        *self.bearer.lock().expect("bearer lock") = token;
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    pub snapshot: Mutex<Option<SessionSnapshot>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> PortResult<Option<SessionSnapshot>> {
        Ok(self.snapshot.lock().expect("store lock").clone())
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> PortResult<()> {
        *self.snapshot.lock().expect("store lock") = Some(snapshot.clone());
        Ok(())
    }

    async fn clear(&self) -> PortResult<()> {
        *self.snapshot.lock().expect("store lock") = None;
        Ok(())
    }
}

//=========================================================================================
// Fixtures
//=========================================================================================

pub fn departments() -> Value {
    json!({ "departments": [
        { "_id": "d-cse", "name": "Computer Science" },
        { "_id": "d-eee", "name": "Electrical Engineering" }
    ]})
}

pub fn sessions() -> Value {
    json!({ "sessions": [
        { "_id": "s-2019", "name": "2019-20" },
        { "_id": "s-2020", "name": "2020-21" }
    ]})
}

pub fn student(id: &str, name: &str, reg: &str, dept: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@uni.edu", name.to_lowercase()),
        "registrationNumber": reg,
        "department": { "_id": dept, "name": dept },
        "session": { "_id": "s-2019", "name": "2019-20" },
        "createdAt": "2024-01-10T08:00:00Z",
        "updatedAt": "2024-01-10T08:00:00Z"
    })
}

pub fn students(list: Vec<Value>) -> Value {
    json!({ "success": true, "students": list })
}

pub fn teacher(id: &str, name: &str, designation: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@uni.edu", id),
        "designation": designation,
        "department": { "_id": "d-cse", "name": "Computer Science" }
    })
}

pub fn teachers(list: Vec<Value>) -> Value {
    json!({ "success": true, "teachers": list })
}

/// A backend preloaded with three students and the student screen's references.
pub fn student_backend() -> Arc<FakeBackend> {
    let backend = FakeBackend::new();
    backend.reply(Method::Get, "/departments", departments());
    backend.reply(Method::Get, "/sessions", sessions());
    backend.reply(
        Method::Get,
        "/students",
        students(vec![
            student("st1", "Rahim", "2019331001", "d-cse"),
            student("st2", "Karima", "2019331002", "d-cse"),
            student("st3", "Nadia", "2019338003", "d-eee"),
        ]),
    );
    backend
}
