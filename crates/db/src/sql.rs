//! Generic helpers for building parameterised SQL.

use std::collections::HashMap;

use crate::DbError;

/// The `SET` clause of a partial update together with its bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate<V> {
    /// `"col_a"=$1, "col_b"=$2, …` in field order.
    pub set_cols: String,
    /// Values to bind, aligned with the placeholders in `set_cols`.
    pub values: Vec<V>,
}

impl<V> PartialUpdate<V> {
    /// Placeholder index for the first parameter after the `SET` values,
    /// typically the primary key in the `WHERE` clause.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Turn a set of field changes into a `SET` clause for an `UPDATE`.
///
/// `data` yields `(field, value)` pairs in the order they should appear.
/// `aliases` maps field names to column names; fields without an entry are
/// used as the column name unchanged.
///
/// Returns [`DbError::BadRequest`] if `data` is empty.
///
/// ```
/// use std::collections::HashMap;
/// use db::sql::sql_for_partial_update;
///
/// let aliases = HashMap::from([("firstName", "first_name")]);
/// let update = sql_for_partial_update([("firstName", "Aliya"), ("age", "32")], &aliases).unwrap();
/// assert_eq!(update.set_cols, r#""first_name"=$1, "age"=$2"#);
/// assert_eq!(update.values, vec!["Aliya", "32"]);
/// ```
pub fn sql_for_partial_update<K, V, I>(
    data: I,
    aliases: &HashMap<&str, &str>,
) -> Result<PartialUpdate<V>, DbError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
{
    let mut cols = Vec::new();
    let mut values = Vec::new();

    for (idx, (field, value)) in data.into_iter().enumerate() {
        let field = field.as_ref();
        let column = aliases.get(field).copied().unwrap_or(field);
        cols.push(format!("\"{column}\"=${}", idx + 1));
        values.push(value);
    }

    if cols.is_empty() {
        return Err(DbError::BadRequest("No data".into()));
    }

    Ok(PartialUpdate {
        set_cols: cols.join(", "),
        values,
    })
}
