//! Test double for the repository-search API.
//!
//! Two routers: `app` serves a seeded record set with real query matching,
//! `canned` serves a scripted response sequence for exercising status codes,
//! malformed bodies, slow responses, and cancellation. Wire DTOs are defined
//! here independently of the client core; the core's integration tests catch
//! schema drift between the two.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// One repository record, serialized exactly as the wire format.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepoRecord {
    pub name: String,
    pub html_url: String,
}

/// Response envelope for `GET /search/repositories`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Option<Vec<RepoRecord>>,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

pub type Db = Arc<RwLock<Vec<RepoRecord>>>;

pub fn seed(records: Vec<RepoRecord>) -> Db {
    Arc::new(RwLock::new(records))
}

/// Router serving the seeded record set.
pub fn app(db: Db) -> Router {
    Router::new()
        .route("/search/repositories", get(search_repositories))
        .with_state(db)
}

async fn search_repositories(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let records = db.read().await;
    let terms: Vec<String> = params.q.split_whitespace().map(str::to_lowercase).collect();
    let items: Vec<RepoRecord> = records
        .iter()
        .filter(|record| {
            terms.is_empty() || {
                let name = record.name.to_lowercase();
                terms.iter().any(|term| name.contains(term))
            }
        })
        .cloned()
        .collect();
    Json(SearchResponse {
        total_count: items.len() as u64,
        incomplete_results: false,
        items: Some(items),
    })
}

/// A scripted response, served verbatim after `delay`.
#[derive(Clone, Debug)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl CannedResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(status: u16, body: &str, delay: Duration) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay,
        }
    }
}

type CannedState = Arc<(AtomicUsize, Vec<CannedResponse>)>;

/// Router serving `responses` in request order; the last one repeats.
pub fn canned(responses: Vec<CannedResponse>) -> Router {
    let state: CannedState = Arc::new((AtomicUsize::new(0), responses));
    Router::new()
        .route("/search/repositories", get(canned_response))
        .with_state(state)
}

async fn canned_response(State(state): State<CannedState>) -> (StatusCode, String) {
    let (counter, responses) = &*state;
    let Some(last) = responses.len().checked_sub(1) else {
        return (StatusCode::NOT_FOUND, String::new());
    };
    let index = counter.fetch_add(1, Ordering::SeqCst).min(last);
    let response = responses[index].clone();
    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, response.body)
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    serve(listener, app(db)).await
}
