//! Row structs and query inputs for the `jobs` table.
//!
//! These are *persistence* models — they carry no HTTP concerns.
//! Request DTOs and their validation live in the `api` crate.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// jobs
// ---------------------------------------------------------------------------

/// A persisted job row.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    /// Fraction of the company offered, in `[0, 1]`. Serialised as a string.
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Fields required to insert a job. The id is assigned by Postgres.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Optional predicates for listing jobs. Unset filters are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    /// Case-insensitive substring of the title. Empty means unset.
    pub title: Option<String>,
    /// Lower salary bound, inclusive. Zero means unset.
    pub min_salary: Option<i32>,
    /// Only jobs with equity above zero.
    pub has_equity: bool,
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        self.title_pattern().is_none() && self.salary_floor().is_none() && !self.has_equity
    }

    /// `%title%` for use with `ILIKE`, if a title filter is set.
    pub fn title_pattern(&self) -> Option<String> {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{t}%"))
    }

    pub fn salary_floor(&self) -> Option<i32> {
        self.min_salary.filter(|s| *s != 0)
    }
}

/// A partial update of a job. `None` leaves the column untouched;
/// `Some(None)` writes `NULL` for the nullable columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobChanges {
    pub title: Option<String>,
    pub salary: Option<Option<i32>>,
    pub equity: Option<Option<Decimal>>,
}

/// A typed value for one column of a job update.
#[derive(Debug, Clone, PartialEq)]
pub enum JobValue {
    Text(String),
    Integer(Option<i32>),
    Numeric(Option<Decimal>),
}

impl JobChanges {
    /// Supplied changes as `(column, value)` pairs, in column order.
    pub fn into_fields(self) -> Vec<(&'static str, JobValue)> {
        let mut fields = Vec::new();
        if let Some(title) = self.title {
            fields.push(("title", JobValue::Text(title)));
        }
        if let Some(salary) = self.salary {
            fields.push(("salary", JobValue::Integer(salary)));
        }
        if let Some(equity) = self.equity {
            fields.push(("equity", JobValue::Numeric(equity)));
        }
        fields
    }
}
