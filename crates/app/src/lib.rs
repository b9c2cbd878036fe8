//! # givehub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AutomationRepository` — persistence for automation definitions
//!   - `RunLogStore` — append-only persistence for run logs
//!   - `EventPublisher` — publish named system events
//!   - `ActionHandler` — one side-effecting callable per action type
//! - Provide the scheduling machinery:
//!   - `Scheduler` — boot registration, execution, next-run computation
//!   - `ScheduleRegistry` — live timer handles, replace/stop semantics
//!   - `TriggerDispatcher` — event subscription, condition gating, dispatch
//!   - `ActionExecutor` — typed dispatch to registered handlers
//!   - `RunLogger` — run records and rolling statistics
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `givehub-domain` only (plus `tokio::sync`/`tokio::time` for
//! channels and timers). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod action_executor;
pub mod event_bus;
pub mod ports;
pub mod run_logger;
pub mod schedule_registry;
pub mod scheduler;
pub mod services;
pub mod trigger_dispatcher;
