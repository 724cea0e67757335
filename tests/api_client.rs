//! ApiClient against an in-process HTTP backend

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use job_board::core::{ApiClient, JobBoardApi};
use job_board::error::ClientError;
use job_board::types::{FilterField, ListingQuery, LoginRequest, ProfileUpdate, RemoteFilter};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
struct Seen {
    authorization: Option<String>,
    query: Option<String>,
    body: Option<Value>,
}

type Shared = Arc<Mutex<Vec<Seen>>>;

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn login(State(seen): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    seen.lock().unwrap().push(Seen {
        body: Some(body.clone()),
        ..Seen::default()
    });
    if body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "token": "tok-abc",
                "user": {"id": 1, "name": "Sari", "email": "sari@example.com"}
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Email atau password salah"})),
        )
    }
}

async fn jobs(
    State(seen): State<Shared>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    seen.lock().unwrap().push(Seen {
        authorization: bearer(&headers),
        query,
        ..Seen::default()
    });
    Json(json!({
        "success": true,
        "data": [
            {"id": "a1", "title": "Data Analyst Intern", "organization": "Acme",
             "employment_type": ["INTERN", "PART_TIME"], "remote_derived": false},
            {"id": "a2", "title": "Backend Intern", "organization": "Acme", "salary": "n/a"}
        ],
        "pagination": {"total": 12, "totalPages": 2}
    }))
}

async fn popular() -> Json<Value> {
    Json(json!({"success": true, "data": [{"title": "UI Intern", "source_domain": "kalibrr.com"}]}))
}

async fn organizations(State(seen): State<Shared>, headers: HeaderMap) -> Json<Value> {
    seen.lock().unwrap().push(Seen {
        authorization: bearer(&headers),
        ..Seen::default()
    });
    Json(json!({
        "success": true,
        "data": [{"organization": "Acme", "job_count": 7}, {"organization": "Globex", "job_count": 2}]
    }))
}

async fn profile(
    State(seen): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    seen.lock().unwrap().push(Seen {
        authorization: bearer(&headers),
        body: Some(body),
        ..Seen::default()
    });
    Json(json!({"success": true, "message": "Profile updated"}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "uptime": 42}))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>")
}

async fn spawn_backend() -> (String, Shared) {
    let seen: Shared = Arc::default();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(broken))
        .route("/api/job-board", get(jobs))
        .route("/api/job-board/popular", get(popular))
        .route("/api/job-board/organizations", get(organizations))
        .route("/api/users/profile", put(profile))
        .route("/api/health", get(health))
        .with_state(Arc::clone(&seen));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/", addr), seen)
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn listing_sends_bearer_and_query() {
    let (url, seen) = spawn_backend().await;
    let api = client(&url);
    assert!(!api.base_url().ends_with('/'));

    let mut query = ListingQuery::new(10);
    query.page = 2;
    query.filters.set(FilterField::Search, "data analyst".to_string());
    query
        .filters
        .set(FilterField::Remote, RemoteFilter::OnSite.as_param().to_string());

    let page = api.list_jobs("tok-abc", &query).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 12);
    assert_eq!(page.total_pages, 2);
    assert_eq!(
        page.items[0].employment_type.as_deref(),
        Some("INTERN,PART_TIME")
    );
    assert_eq!(page.items[1].extra.get("salary"), Some(&json!("n/a")));

    let recorded = seen.lock().unwrap()[0].clone();
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer tok-abc"));
    assert_eq!(
        recorded.query.as_deref(),
        Some("page=2&limit=10&search=data+analyst&remote=false")
    );
}

#[tokio::test]
async fn login_round_trip() {
    let (url, _seen) = spawn_backend().await;
    let api = client(&url);

    let payload = api
        .login(&LoginRequest {
            email: "sari@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(payload.token.as_deref(), Some("tok-abc"));
    assert_eq!(payload.user.unwrap().name, "Sari");
}

#[tokio::test]
async fn rejection_message_survives_error_status() {
    let (url, _seen) = spawn_backend().await;
    let api = client(&url);

    let err = api
        .login(&LoginRequest {
            email: "sari@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Rejected { message } => {
            assert_eq!(message.as_deref(), Some("Email atau password salah"))
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let (url, _seen) = spawn_backend().await;
    let api = client(&url);

    let err = api
        .register(&job_board::types::RegisterRequest {
            name: "Sari Dewi".to_string(),
            email: "sari@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn popular_and_organizations() {
    let (url, seen) = spawn_backend().await;
    let api = client(&url);

    let popular = api.popular_jobs().await.unwrap();
    assert_eq!(popular.len(), 1);
    assert_eq!(popular[0].source_label(), "kalibrr.com");

    let orgs = api.organizations("tok-abc").await.unwrap();
    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0].organization, "Acme");
    assert_eq!(orgs[0].job_count, 7);
    assert_eq!(
        seen.lock().unwrap()[0].authorization.as_deref(),
        Some("Bearer tok-abc")
    );
}

#[tokio::test]
async fn profile_update_omits_unset_passwords() {
    let (url, seen) = spawn_backend().await;
    let api = client(&url);

    api.update_profile(
        "tok-abc",
        &ProfileUpdate {
            name: "Sari Dewi".to_string(),
            email: "sari@example.com".to_string(),
            current_password: None,
            new_password: None,
        },
    )
    .await
    .unwrap();

    let recorded = seen.lock().unwrap()[0].clone();
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer tok-abc"));
    assert_eq!(
        recorded.body,
        Some(json!({"name": "Sari Dewi", "email": "sari@example.com"}))
    );
}

#[tokio::test]
async fn health_returns_raw_json() {
    let (url, _seen) = spawn_backend().await;
    let body = client(&url).health().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .popular_jobs()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {:?}", err);
}
