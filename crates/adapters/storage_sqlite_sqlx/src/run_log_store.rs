//! `SQLite` implementation of [`RunLogStore`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use givehub_app::ports::RunLogStore;
use givehub_domain::error::GiveHubError;
use givehub_domain::id::{AutomationId, RunLogId};
use givehub_domain::run_log::{RunLog, RunStatus};
use givehub_domain::time::Timestamp;

use crate::error::StorageError;

struct Wrapper(RunLog);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let automation_id: String = row.try_get("automation_id")?;
        let status: String = row.try_get("status")?;
        let execution_time_ms: i64 = row.try_get("execution_time_ms")?;
        let details: Option<String> = row.try_get("details")?;
        let error: Option<String> = row.try_get("error")?;
        let input_json: String = row.try_get("input")?;
        let output_json: String = row.try_get("output")?;
        let metadata_json: String = row.try_get("metadata")?;
        let recorded_at: String = row.try_get("recorded_at")?;

        let id = RunLogId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let automation_id = AutomationId::from_str(&automation_id)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let status: RunStatus = serde_json::from_str(&format!("\"{status}\""))
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let input: serde_json::Value =
            serde_json::from_str(&input_json).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let output: serde_json::Value =
            serde_json::from_str(&output_json).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let metadata: serde_json::Value = serde_json::from_str(&metadata_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let recorded_at = chrono::DateTime::parse_from_rfc3339(&recorded_at)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(RunLog {
            id,
            automation_id,
            status,
            execution_time_ms: u64::try_from(execution_time_ms).unwrap_or_default(),
            details,
            error,
            input,
            output,
            metadata,
            recorded_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO automation_logs (id, automation_id, status, execution_time_ms, details, error, input, output, metadata, recorded_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_BY_AUTOMATION: &str = r"
    SELECT * FROM automation_logs WHERE automation_id = ? ORDER BY recorded_at DESC LIMIT ?
";

const DELETE_BEFORE: &str = "DELETE FROM automation_logs WHERE recorded_at < ?";

/// `SQLite`-backed run log store.
pub struct SqliteRunLogStore {
    pool: SqlitePool,
}

impl SqliteRunLogStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RunLogStore for SqliteRunLogStore {
    async fn append(&self, log: RunLog) -> Result<RunLog, GiveHubError> {
        let input_json = serde_json::to_string(&log.input).map_err(StorageError::from)?;
        let output_json = serde_json::to_string(&log.output).map_err(StorageError::from)?;
        let metadata_json = serde_json::to_string(&log.metadata).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(log.id.to_string())
            .bind(log.automation_id.to_string())
            .bind(log.status.as_str())
            .bind(i64::try_from(log.execution_time_ms).unwrap_or(i64::MAX))
            .bind(&log.details)
            .bind(&log.error)
            .bind(&input_json)
            .bind(&output_json)
            .bind(&metadata_json)
            .bind(log.recorded_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(log)
    }

    async fn find_by_automation(
        &self,
        automation_id: AutomationId,
        limit: usize,
    ) -> Result<Vec<RunLog>, GiveHubError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_AUTOMATION)
            .bind(automation_id.to_string())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn prune_older_than(&self, cutoff: Timestamp) -> Result<u64, GiveHubError> {
        let result = sqlx::query(DELETE_BEFORE)
            .bind(cutoff.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(result.rows_affected())
    }
}
