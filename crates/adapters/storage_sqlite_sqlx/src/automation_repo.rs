//! `SQLite` implementation of [`AutomationRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use givehub_app::ports::AutomationRepository;
use givehub_domain::automation::{Automation, AutomationConfig, AutomationKind, RunStats};
use givehub_domain::error::GiveHubError;
use givehub_domain::id::{AutomationId, ModuleId};
use givehub_domain::time::Timestamp;

use crate::error::StorageError;

struct Wrapper(Automation);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Automation> {
        value.map(|w| w.0)
    }
}

fn parse_timestamp(value: Option<String>) -> Result<Option<Timestamp>, sqlx::Error> {
    value
        .map(|s| {
            chrono::DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.to_utc())
                .map_err(|err| sqlx::Error::Decode(Box::new(err)))
        })
        .transpose()
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let description: Option<String> = row.try_get("description")?;
        let module_id: Option<String> = row.try_get("module_id")?;
        let config_json: String = row.try_get("config")?;
        let is_active: bool = row.try_get("is_active")?;
        let last_run: Option<String> = row.try_get("last_run")?;
        let next_run: Option<String> = row.try_get("next_run")?;
        let stats_json: String = row.try_get("stats")?;

        let id =
            AutomationId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let module_id = module_id
            .map(|s| ModuleId::from_str(&s).map_err(|err| sqlx::Error::Decode(Box::new(err))))
            .transpose()?;
        let config: AutomationConfig = serde_json::from_str(&config_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let stats: RunStats = serde_json::from_str(&stats_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Automation {
            id,
            name,
            description,
            module_id,
            config,
            is_active,
            last_run: parse_timestamp(last_run)?,
            next_run: parse_timestamp(next_run)?,
            stats,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO automations (id, name, description, module_id, kind, config, is_active, last_run, next_run, stats)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE: &str = r"
    UPDATE automations
    SET name = ?, description = ?, module_id = ?, kind = ?, config = ?, is_active = ?, last_run = ?, next_run = ?, stats = ?
    WHERE id = ?
";

const SELECT_BY_ID: &str = "SELECT * FROM automations WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM automations ORDER BY name";
const SELECT_ACTIVE_BY_KIND: &str =
    "SELECT * FROM automations WHERE kind = ? AND is_active = 1 ORDER BY name";
const DELETE: &str = "DELETE FROM automations WHERE id = ?";

/// `SQLite`-backed automation repository.
pub struct SqliteAutomationRepository {
    pool: SqlitePool,
}

impl SqliteAutomationRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AutomationRepository for SqliteAutomationRepository {
    async fn create(&self, automation: Automation) -> Result<Automation, GiveHubError> {
        let config_json = serde_json::to_string(&automation.config).map_err(StorageError::from)?;
        let stats_json = serde_json::to_string(&automation.stats).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(automation.id.to_string())
            .bind(&automation.name)
            .bind(&automation.description)
            .bind(automation.module_id.map(|id| id.to_string()))
            .bind(automation.kind().as_str())
            .bind(&config_json)
            .bind(automation.is_active)
            .bind(automation.last_run.map(|ts| ts.to_rfc3339()))
            .bind(automation.next_run.map(|ts| ts.to_rfc3339()))
            .bind(&stats_json)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(automation)
    }

    async fn get_by_id(&self, id: AutomationId) -> Result<Option<Automation>, GiveHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Automation>, GiveHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn load_active(&self, kind: AutomationKind) -> Result<Vec<Automation>, GiveHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ACTIVE_BY_KIND)
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, automation: Automation) -> Result<Automation, GiveHubError> {
        let config_json = serde_json::to_string(&automation.config).map_err(StorageError::from)?;
        let stats_json = serde_json::to_string(&automation.stats).map_err(StorageError::from)?;

        sqlx::query(UPDATE)
            .bind(&automation.name)
            .bind(&automation.description)
            .bind(automation.module_id.map(|id| id.to_string()))
            .bind(automation.kind().as_str())
            .bind(&config_json)
            .bind(automation.is_active)
            .bind(automation.last_run.map(|ts| ts.to_rfc3339()))
            .bind(automation.next_run.map(|ts| ts.to_rfc3339()))
            .bind(&stats_json)
            .bind(automation.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(automation)
    }

    async fn delete(&self, id: AutomationId) -> Result<(), GiveHubError> {
        sqlx::query(DELETE)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
