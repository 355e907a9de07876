//! In-process mock of the explanner backend's token and planning endpoints.
//!
//! Serves real HTTP on a loopback port so the client under test exercises
//! its full request path, with toggles for refresh failure and artificial
//! response latency.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use explanner_model::{
    Course, CourseDetail, CredentialPair, ErrorBody, LoginRequest, PlanRequest, PlanResponse,
    RefreshRequest,
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const USERNAME: &str = "staff01";
pub const PASSWORD: &str = "correct-horse";
pub const REJECTION_DETAIL: &str = "No active account found with the given credentials";

pub const ACCESS_TOKEN_LIFETIME_SECS: i64 = 1800;

#[derive(Serialize)]
struct MockClaims {
    sub: String,
    exp: i64,
    iat: i64,
    /// Monotonic issuance counter, so rotated tokens never compare equal.
    serial: u64,
}

/// Signs an access token the way the backend would.
pub fn encode_access_token(sub: &str, expires_in: i64, serial: u64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = MockClaims {
        sub: sub.to_string(),
        exp: now + expires_in,
        iat: now,
        serial,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"mock-backend-secret"),
    )
    .expect("encode jwt")
}

#[derive(Default)]
pub struct BackendState {
    login_count: AtomicUsize,
    refresh_count: AtomicUsize,
    fail_refresh: AtomicBool,
    refresh_delay_ms: AtomicU64,
    serial: AtomicU64,
    last_access: Mutex<Option<String>>,
}

impl BackendState {
    fn issue_pair(&self, sub: &str) -> CredentialPair {
        let serial = self.serial.fetch_add(1, Ordering::SeqCst) + 1;
        let access = encode_access_token(sub, ACCESS_TOKEN_LIFETIME_SECS, serial);
        *self.last_access.lock().unwrap() = Some(access.clone());
        CredentialPair {
            access,
            refresh: format!("refresh-{}", serial),
        }
    }

    fn bearer_ok(&self, headers: &HeaderMap) -> bool {
        let expected = self.last_access.lock().unwrap().clone();
        match (headers.get(header::AUTHORIZATION), expected) {
            (Some(value), Some(access)) => {
                value.to_str().ok() == Some(format!("Bearer {}", access).as_str())
            }
            _ => false,
        }
    }
}

pub struct MockBackend {
    base_url: String,
    state: Arc<BackendState>,
}

impl MockBackend {
    /// API root to hand to the client under test.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_count(&self) -> usize {
        self.state.login_count.load(Ordering::SeqCst)
    }

    pub fn refresh_count(&self) -> usize {
        self.state.refresh_count.load(Ordering::SeqCst)
    }

    /// Makes every subsequent refresh fail with a 401.
    pub fn set_fail_refresh(&self, fail: bool) {
        self.state.fail_refresh.store(fail, Ordering::SeqCst);
    }

    /// Delays refresh responses, for in-flight/stale-response scenarios.
    pub fn set_refresh_delay(&self, delay: Duration) {
        self.state
            .refresh_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// The most recently issued access token.
    pub fn current_access_token(&self) -> Option<String> {
        self.state.last_access.lock().unwrap().clone()
    }
}

fn unauthorized(detail: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            detail: Some(detail.to_string()),
        }),
    )
        .into_response()
}

async fn issue_token(
    State(state): State<Arc<BackendState>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    state.login_count.fetch_add(1, Ordering::SeqCst);
    if request.username == USERNAME && request.password == PASSWORD {
        (StatusCode::OK, Json(state.issue_pair(&request.username))).into_response()
    } else {
        unauthorized(REJECTION_DETAIL)
    }
}

async fn refresh_token(
    State(state): State<Arc<BackendState>>,
    Json(request): Json<RefreshRequest>,
) -> Response {
    state.refresh_count.fetch_add(1, Ordering::SeqCst);
    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if state.fail_refresh.load(Ordering::SeqCst) {
        return unauthorized("Token is invalid or expired");
    }
    if request.refresh.starts_with("refresh-") {
        (StatusCode::OK, Json(state.issue_pair(USERNAME))).into_response()
    } else {
        unauthorized("Token is invalid or expired")
    }
}

async fn list_courses(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.bearer_ok(&headers) {
        return unauthorized("Authentication credentials were not provided.");
    }
    Json(vec![Course {
        id: Some(1),
        title: "Compiler Construction".into(),
        code: "CSC401".into(),
        units: 3,
        num_students: 120,
        department: "Computer Science".into(),
        level: "400".into(),
    }])
    .into_response()
}

async fn create_course(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(mut course): Json<Course>,
) -> Response {
    if !state.bearer_ok(&headers) {
        return unauthorized("Authentication credentials were not provided.");
    }
    course.id = Some(7);
    (StatusCode::CREATED, Json(course)).into_response()
}

async fn process_timetable(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(request): Json<PlanRequest>,
) -> Response {
    if !state.bearer_ok(&headers) {
        return unauthorized("Authentication credentials were not provided.");
    }
    // The detail payloads must arrive as JSON-encoded strings.
    if serde_json::from_str::<Vec<CourseDetail>>(&request.course_details).is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                detail: Some("courseDetails is not a JSON string".into()),
            }),
        )
            .into_response();
    }
    Json(PlanResponse {
        data_dict: Some(serde_json::json!({ "title": request.title, "days": [] })),
    })
    .into_response()
}

/// Binds the mock backend to a loopback port and serves it for the rest of
/// the test.
pub async fn spawn_backend() -> MockBackend {
    let state = Arc::new(BackendState::default());
    let app = Router::new()
        .route("/api/token/", post(issue_token))
        .route("/api/token/refresh/", post(refresh_token))
        .route("/api/courses/", get(list_courses).post(create_course))
        .route("/api/process-time-table/", post(process_timetable))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock backend");
    });

    MockBackend {
        base_url: format!("http://{}/api", addr),
        state,
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
