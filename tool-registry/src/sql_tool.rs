//! Structured-query tool: runs SQL against the clinic's Postgres database.
//!
//! Read-style statements return the fetched rows serialized as JSON objects;
//! anything else is executed and acknowledged with the affected-row count.
//! Every failure is rendered as error text so the reasoning loop sees a string
//! observation either way.

use crate::Tool;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Column, PgPool, Row, TypeInfo};
use tracing::{info, instrument, warn};

const NAME: &str = "sql_query";
const DESCRIPTION: &str = "Execute SQL queries against the dental clinic's PostgreSQL database \
    (tables: patients, appointments). Input: a valid SQL query. Output: query results as JSON \
    rows, or a confirmation message for writes.";
const INPUT_CONTRACT: &str = "a single SQL statement in PostgreSQL syntax";

/// Tool wrapping a Postgres connection pool. Stateless with respect to the
/// conversation; safe to share across sessions.
#[derive(Clone)]
pub struct SqlQueryTool {
    pool: PgPool,
}

impl SqlQueryTool {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a lazy pool for the given connection URL. No connection is
    /// attempted until the first query, so startup does not require the
    /// database to be up.
    pub fn connect_lazy(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// True for statements that produce a result set.
    fn is_read_query(query: &str) -> bool {
        let head = query.trim_start().to_lowercase();
        head.starts_with("select") || head.starts_with("with") || head.starts_with("show")
    }

    async fn run(&self, query: &str) -> anyhow::Result<String> {
        if Self::is_read_query(query) {
            let rows = sqlx::query(query).fetch_all(&self.pool).await?;
            let serialized: Vec<Value> = rows.iter().map(row_to_json).collect();
            info!(rows = serialized.len(), "sql read query done");
            Ok(format!("Query results: {}", Value::Array(serialized)))
        } else {
            let result = sqlx::query(query).execute(&self.pool).await?;
            info!(rows_affected = result.rows_affected(), "sql write query done");
            Ok(format!(
                "Query executed successfully. Rows affected: {}",
                result.rows_affected()
            ))
        }
    }
}

#[async_trait]
impl Tool for SqlQueryTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn input_contract(&self) -> &str {
        INPUT_CONTRACT
    }

    #[instrument(skip(self, input))]
    async fn invoke(&self, input: &str) -> String {
        match self.run(input).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "sql query failed");
                format!("{NAME} error: {e}")
            }
        }
    }
}

/// Serializes one row as a JSON object keyed by column name. Columns are
/// decoded by Postgres type name; unsupported types render as `<TYPE>` so the
/// result is still readable text rather than a failure.
fn row_to_json(row: &PgRow) -> Value {
    let mut object = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = column_to_json(row, index, column.type_info().name());
        object.insert(column.name().to_string(), value);
    }
    Value::Object(object)
}

fn column_to_json(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "BOOL" => decode(row.try_get::<Option<bool>, _>(index)),
        "INT2" => decode(row.try_get::<Option<i16>, _>(index)),
        "INT4" => decode(row.try_get::<Option<i32>, _>(index)),
        "INT8" => decode(row.try_get::<Option<i64>, _>(index)),
        "FLOAT4" => decode(row.try_get::<Option<f32>, _>(index)),
        "FLOAT8" => decode(row.try_get::<Option<f64>, _>(index)),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => {
            decode(row.try_get::<Option<String>, _>(index))
        }
        "TIMESTAMP" => stringify(row.try_get::<Option<chrono::NaiveDateTime>, _>(index)),
        "TIMESTAMPTZ" => stringify(row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)),
        "DATE" => stringify(row.try_get::<Option<chrono::NaiveDate>, _>(index)),
        "TIME" => stringify(row.try_get::<Option<chrono::NaiveTime>, _>(index)),
        other => Value::String(format!("<{other}>")),
    }
}

fn decode<T: serde::Serialize>(result: Result<Option<T>, sqlx::Error>) -> Value {
    match result {
        Ok(Some(v)) => json!(v),
        Ok(None) => Value::Null,
        Err(e) => Value::String(format!("<decode error: {e}>")),
    }
}

fn stringify<T: ToString>(result: Result<Option<T>, sqlx::Error>) -> Value {
    match result {
        Ok(Some(v)) => Value::String(v.to_string()),
        Ok(None) => Value::Null,
        Err(e) => Value::String(format!("<decode error: {e}>")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: select/with/show are read-style regardless of case and leading
    /// whitespace; insert/update/delete are not.**
    #[test]
    fn read_query_classification() {
        assert!(SqlQueryTool::is_read_query("SELECT * FROM patients"));
        assert!(SqlQueryTool::is_read_query("  select 1"));
        assert!(SqlQueryTool::is_read_query(
            "WITH recent AS (SELECT 1) SELECT * FROM recent"
        ));
        assert!(SqlQueryTool::is_read_query("show tables"));

        assert!(!SqlQueryTool::is_read_query(
            "INSERT INTO patients (name) VALUES ('Ana')"
        ));
        assert!(!SqlQueryTool::is_read_query("UPDATE patients SET name = 'B'"));
        assert!(!SqlQueryTool::is_read_query("DELETE FROM appointments"));
    }
}
