//! End-to-end route tests against a live Postgres.
//!
//! Run with `DATABASE_URL=postgres://… cargo test -p api --features integration`.
//! Each test gets a fresh database with the workspace migrations applied and
//! `fixtures/jobs.sql` loaded (companies c1..c3, jobs j1, J2, j3).

#![cfg(feature = "integration")]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

async fn send(
    pool: &PgPool,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let resp = api::router(pool.clone())
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn titles(body: &Value) -> Vec<&str> {
    body["jobs"]
        .as_array()
        .expect("jobs array")
        .iter()
        .map(|j| j["title"].as_str().unwrap())
        .collect()
}

async fn first_job_id(pool: &PgPool) -> i64 {
    let (_, body) = send(pool, Method::GET, "/jobs", None).await;
    body["jobs"][0]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// POST /jobs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn post_creates_job(pool: PgPool) {
    let new_job = json!({
        "title": "j4",
        "salary": 400000,
        "equity": "0.5",
        "companyHandle": "c1",
    });
    let (status, body) = send(&pool, Method::POST, "/jobs", Some(new_job)).await;

    assert_eq!(status, StatusCode::CREATED);
    let job = &body["job"];
    assert!(job["id"].is_i64());
    assert_eq!(job["title"], "j4");
    assert_eq!(job["salary"], 400000);
    assert_eq!(job["equity"], "0.5");
    assert_eq!(job["companyHandle"], "c1");
}

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn post_for_unknown_company_is_internal_error(pool: PgPool) {
    let new_job = json!({ "title": "j4", "companyHandle": "nope" });
    let (status, body) = send(&pool, Method::POST, "/jobs", Some(new_job)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Internal Server Error");
}

// ---------------------------------------------------------------------------
// GET /jobs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn get_lists_all_jobs_by_id(pool: PgPool) {
    let (status, body) = send(&pool, Method::GET, "/jobs", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["j1", "J2", "j3"]);
    assert_eq!(body["jobs"][2]["equity"], "0.3");
}

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn get_applies_query_filters(pool: PgPool) {
    let (status, body) = send(&pool, Method::GET, "/jobs?title=J1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["j1"]);

    let (_, body) = send(&pool, Method::GET, "/jobs?hasEquity=true", None).await;
    assert_eq!(titles(&body), vec!["j3"]);

    let (_, body) = send(&pool, Method::GET, "/jobs?minSalary=95000", None).await;
    assert_eq!(titles(&body), vec!["j1"]);
}

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn blank_filters_list_everything(pool: PgPool) {
    let uri = "/jobs?minSalary=&title=&hasEquity=false";
    let (status, body) = send(&pool, Method::GET, uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["j1", "J2", "j3"]);
}

// ---------------------------------------------------------------------------
// GET /jobs/:id and /companies/:handle/jobs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn get_one_job(pool: PgPool) {
    let id = first_job_id(&pool).await;
    let (status, body) = send(&pool, Method::GET, &format!("/jobs/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "job": {
                "id": id,
                "title": "j1",
                "salary": 100000,
                "equity": "0",
                "companyHandle": "c1",
            }
        })
    );
}

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn get_missing_job_is_not_found(pool: PgPool) {
    let (status, body) = send(&pool, Method::GET, "/jobs/0", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": { "message": "No job: 0", "status": 404 } }));
}

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn company_jobs_listed(pool: PgPool) {
    let (status, body) = send(&pool, Method::GET, "/companies/c3/jobs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["j3"]);

    let (status, body) = send(&pool, Method::GET, "/companies/nope/jobs", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No jobs: nope");
}

// ---------------------------------------------------------------------------
// PATCH /jobs/:id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn patch_updates_supplied_fields(pool: PgPool) {
    let id = first_job_id(&pool).await;
    let uri = format!("/jobs/{id}");

    let rename = json!({ "title": "j1-new" });
    let (status, body) = send(&pool, Method::PATCH, &uri, Some(rename)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "j1-new");
    assert_eq!(body["job"]["salary"], 100000);

    let clear = json!({ "salary": null, "equity": null });
    let (status, body) = send(&pool, Method::PATCH, &uri, Some(clear)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "j1-new");
    assert_eq!(body["job"]["salary"], Value::Null);
    assert_eq!(body["job"]["equity"], Value::Null);
}

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn patch_missing_job_is_not_found(pool: PgPool) {
    let change = json!({ "title": "x" });
    let (status, body) = send(&pool, Method::PATCH, "/jobs/0", Some(change)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["status"], 404);
}

// ---------------------------------------------------------------------------
// DELETE /jobs/:id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations", fixtures("jobs"))]
async fn delete_then_delete_again(pool: PgPool) {
    let id = first_job_id(&pool).await;
    let uri = format!("/jobs/{id}");

    let (status, body) = send(&pool, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "deleted": id.to_string() }));

    let (status, body) = send(&pool, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], format!("No job: {id}"));

    let (status, _) = send(&pool, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
