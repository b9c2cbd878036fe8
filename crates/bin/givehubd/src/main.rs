//! # givehubd — givehub automation daemon
//!
//! Composition root that wires all adapters together and runs the
//! scheduler.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Register the built-in action handlers and construct the scheduler
//! - Start schedule timers and the trigger dispatcher's bus subscription
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use givehub_adapter_actions::{HttpRequestHandler, WebhookHandler};
use givehub_adapter_storage_sqlite_sqlx::{
    Config as DbConfig, SqliteAutomationRepository, SqliteRunLogStore,
};
use givehub_app::action_executor::ActionExecutor;
use givehub_app::event_bus::InProcessEventBus;
use givehub_app::scheduler::Scheduler;
use givehub_app::trigger_dispatcher::TriggerDispatcher;
use givehub_domain::automation::ActionKind;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let automation_repo = Arc::new(SqliteAutomationRepository::new(pool.clone()));
    let run_log_store = Arc::new(SqliteRunLogStore::new(pool));

    // Built-in action handlers. The platform-bound handlers
    // (emailNotification, moduleFunction, createRecord, updateRecord)
    // are registered by the embedding application.
    let http_timeout = Duration::from_secs(config.actions.http_timeout_secs);
    let mut executor = ActionExecutor::new();
    executor.register(
        ActionKind::HttpRequest,
        Arc::new(HttpRequestHandler::new(http_timeout)),
    );
    executor.register(
        ActionKind::Webhook,
        Arc::new(WebhookHandler::new(http_timeout)),
    );

    // Scheduler
    let scheduler = Scheduler::new(
        Arc::clone(&automation_repo),
        Arc::clone(&run_log_store),
        executor,
    );
    let registered = scheduler.start().await?;

    // Event bus + trigger dispatch. External subsystems publish their
    // events through the bus handle.
    let event_bus = InProcessEventBus::new(config.events.capacity);
    let dispatcher = TriggerDispatcher::new(Arc::clone(&automation_repo), Arc::clone(&scheduler));
    let dispatcher_task = tokio::spawn(dispatcher.run(event_bus.subscribe()));

    tracing::info!(registered, "givehubd running, press ctrl-c to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    scheduler.shutdown();
    dispatcher_task.abort();

    Ok(())
}
