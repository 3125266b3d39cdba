//! Job CRUD operations.
//!
//! Every function takes any Postgres executor (a pool, a connection or a
//! transaction) and issues exactly one statement.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use crate::{
    models::{JobChanges, JobFilter, JobRow, JobValue, NewJob},
    sql::sql_for_partial_update,
    DbError,
};

const SELECT_JOBS: &str = "SELECT id, title, salary, equity, company_handle FROM jobs";

const RETURNING_JOB: &str = "RETURNING id, title, salary, equity, company_handle";

fn no_job(id: i32) -> DbError {
    DbError::NotFound(format!("No job: {id}"))
}

/// Insert a new job and return it with its generated id.
///
/// No duplicate check is made. An unknown `company_handle` surfaces as the
/// foreign key violation reported by Postgres.
#[instrument(skip(executor, job), fields(company = %job.company_handle))]
pub async fn create<'e, E>(executor: E, job: &NewJob) -> Result<JobRow, DbError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO jobs (title, salary, equity, company_handle) \
         VALUES ($1, $2, $3, $4) {RETURNING_JOB}"
    );

    let row = sqlx::query_as::<_, JobRow>(&sql)
        .bind(&job.title)
        .bind(job.salary)
        .bind(job.equity)
        .bind(&job.company_handle)
        .fetch_one(executor)
        .await?;

    Ok(row)
}

/// Build the listing query for `filters`.
///
/// Predicates are appended in a fixed order (title, salary, equity) and
/// bound in that same order. Without any predicate the rows are ordered
/// by id instead.
pub fn find_all_query(filters: &JobFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_JOBS);
    let mut clauses = 0;

    if let Some(pattern) = filters.title_pattern() {
        push_conjunction(&mut qb, &mut clauses);
        qb.push("title ILIKE ").push_bind(pattern);
    }

    if let Some(min_salary) = filters.salary_floor() {
        push_conjunction(&mut qb, &mut clauses);
        qb.push("salary >= ").push_bind(min_salary);
    }

    if filters.has_equity {
        push_conjunction(&mut qb, &mut clauses);
        qb.push("equity > ").push_bind(Decimal::ZERO);
    }

    if clauses == 0 {
        qb.push(" ORDER BY id");
    }

    qb
}

fn push_conjunction(qb: &mut QueryBuilder<'static, Postgres>, clauses: &mut usize) {
    qb.push(if *clauses == 0 { " WHERE " } else { " AND " });
    *clauses += 1;
}

/// List jobs matching every supplied filter.
#[instrument(skip(executor))]
pub async fn find_all<'e, E>(executor: E, filters: &JobFilter) -> Result<Vec<JobRow>, DbError>
where
    E: PgExecutor<'e>,
{
    let mut qb = find_all_query(filters);
    debug!(sql = qb.sql(), "listing jobs");

    let rows = qb.build_query_as::<JobRow>().fetch_all(executor).await?;

    Ok(rows)
}

/// Fetch a single job by its primary key.
#[instrument(skip(executor))]
pub async fn get<'e, E>(executor: E, id: i32) -> Result<JobRow, DbError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("{SELECT_JOBS} WHERE id = $1");

    let row = sqlx::query_as::<_, JobRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| no_job(id))?;

    Ok(row)
}

/// Return every job posted by the company with `handle`, ordered by id.
///
/// Returns `DbError::NotFound` if the company has no jobs.
#[instrument(skip(executor))]
pub async fn find_by_company<'e, E>(executor: E, handle: &str) -> Result<Vec<JobRow>, DbError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("{SELECT_JOBS} WHERE company_handle = $1 ORDER BY id");

    let rows = sqlx::query_as::<_, JobRow>(&sql)
        .bind(handle)
        .fetch_all(executor)
        .await?;

    if rows.is_empty() {
        return Err(DbError::NotFound(format!("No jobs: {handle}")));
    }

    Ok(rows)
}

/// Build the `UPDATE` statement for `changes` along with its `SET` values.
///
/// The job id binds to the placeholder following the last value.
pub fn update_statement(changes: JobChanges) -> Result<(String, Vec<JobValue>), DbError> {
    let update = sql_for_partial_update(changes.into_fields(), &HashMap::new())?;
    let sql = format!(
        "UPDATE jobs SET {} WHERE id = ${} {RETURNING_JOB}",
        update.set_cols,
        update.next_placeholder(),
    );
    Ok((sql, update.values))
}

fn bind_value<'q>(
    query: QueryAs<'q, Postgres, JobRow, PgArguments>,
    value: JobValue,
) -> QueryAs<'q, Postgres, JobRow, PgArguments> {
    match value {
        JobValue::Text(v) => query.bind(v),
        JobValue::Integer(v) => query.bind(v),
        JobValue::Numeric(v) => query.bind(v),
    }
}

/// Apply a partial update and return the updated job.
///
/// Only the supplied fields change; `Some(None)` writes `NULL`.
/// Returns `DbError::BadRequest` for an empty change set and
/// `DbError::NotFound` if no job has this id.
#[instrument(skip(executor, changes))]
pub async fn update<'e, E>(executor: E, id: i32, changes: JobChanges) -> Result<JobRow, DbError>
where
    E: PgExecutor<'e>,
{
    let (sql, values) = update_statement(changes)?;
    debug!(sql = %sql, "updating job");

    let mut query = sqlx::query_as::<_, JobRow>(&sql);
    for value in values {
        query = bind_value(query, value);
    }

    let row = query
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| no_job(id))?;

    Ok(row)
}

/// Permanently delete a job by its primary key.
///
/// Returns `DbError::NotFound` if no row was deleted.
#[instrument(skip(executor))]
pub async fn remove<'e, E>(executor: E, id: i32) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(no_job(id));
    }

    Ok(())
}
