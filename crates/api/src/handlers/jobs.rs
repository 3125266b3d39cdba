use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use super::AppState;
use crate::ApiError;
use db::models::{JobChanges, JobFilter, JobRow, NewJob};
use db::repository::jobs as job_repo;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobDto {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Body of `PATCH /jobs/{id}`. A key set to `null` clears the column.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateJobDto {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub equity: Option<Option<Decimal>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsQuery {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_salary: Option<i32>,
    pub has_equity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobBody {
    pub job: JobRow,
}

#[derive(Debug, Serialize)]
pub struct JobsBody {
    pub jobs: Vec<JobRow>,
}

#[derive(Debug, Serialize)]
pub struct DeletedBody {
    /// The id from the request path, echoed back as a string.
    pub deleted: String,
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key (`None`).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query-string integer where `?key=` counts as absent.
fn blank_as_none<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: FromStr,
    T::Err: fmt::Display,
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

fn check_salary(salary: Option<i32>) -> Result<(), ApiError> {
    match salary {
        Some(s) if s < 0 => Err(ApiError::BadRequest("salary must be >= 0".into())),
        _ => Ok(()),
    }
}

fn check_equity(equity: Option<Decimal>) -> Result<(), ApiError> {
    match equity {
        Some(e) if e < Decimal::ZERO || e > Decimal::ONE => Err(ApiError::BadRequest(
            "equity must be between 0 and 1".into(),
        )),
        _ => Ok(()),
    }
}

impl CreateJobDto {
    pub fn validate(self) -> Result<NewJob, ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".into()));
        }
        if self.company_handle.trim().is_empty() {
            return Err(ApiError::BadRequest("companyHandle must not be empty".into()));
        }
        check_salary(self.salary)?;
        check_equity(self.equity)?;

        Ok(NewJob {
            title: self.title,
            salary: self.salary,
            equity: self.equity,
            company_handle: self.company_handle,
        })
    }
}

impl UpdateJobDto {
    pub fn validate(self) -> Result<JobChanges, ApiError> {
        let title = match self.title {
            Some(None) => return Err(ApiError::BadRequest("title must not be null".into())),
            Some(Some(t)) if t.trim().is_empty() => {
                return Err(ApiError::BadRequest("title must not be empty".into()))
            }
            other => other.flatten(),
        };
        check_salary(self.salary.flatten())?;
        check_equity(self.equity.flatten())?;

        Ok(JobChanges {
            title,
            salary: self.salary,
            equity: self.equity,
        })
    }
}

impl From<ListJobsQuery> for JobFilter {
    fn from(query: ListJobsQuery) -> Self {
        Self {
            title: query.title,
            min_salary: query.min_salary,
            has_equity: query.has_equity.as_deref() == Some("true"),
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateJobDto>, JsonRejection>,
) -> Result<(StatusCode, Json<JobBody>), ApiError> {
    let Json(payload) = payload?;
    let new_job = payload.validate()?;

    let job = job_repo::create(&state.pool, &new_job).await?;
    Ok((StatusCode::CREATED, Json(JobBody { job })))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListJobsQuery>, QueryRejection>,
) -> Result<Json<JobsBody>, ApiError> {
    let Query(query) = query?;

    let jobs = job_repo::find_all(&state.pool, &query.into()).await?;
    Ok(Json(JobsBody { jobs }))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<JobBody>, ApiError> {
    let Path(id) = id?;

    let job = job_repo::get(&state.pool, id).await?;
    Ok(Json(JobBody { job }))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateJobDto>, JsonRejection>,
) -> Result<Json<JobBody>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let changes = payload.validate()?;

    let job = job_repo::update(&state.pool, id, changes).await?;
    Ok(Json(JobBody { job }))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeletedBody>, ApiError> {
    let Path(id) = id?;

    job_repo::remove(&state.pool, id).await?;
    Ok(Json(DeletedBody {
        deleted: id.to_string(),
    }))
}

pub async fn list_for_company(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<JobsBody>, ApiError> {
    let jobs = job_repo::find_by_company(&state.pool, &handle).await?;
    Ok(Json(JobsBody { jobs }))
}
