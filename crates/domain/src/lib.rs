//! # givehub-domain
//!
//! Pure domain model for the givehub automation core.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Automations** (schedule / trigger / webhook job definitions)
//! - Define **Conditions** (field/operator/value rules gating trigger automations)
//! - Define **Actions** (typed side-effecting steps within an automation run)
//! - Define **Run logs** (append-only execution records) and **run statistics**
//! - Parse and evaluate **cron expressions** for schedule automations
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod cron;
pub mod event;
pub mod run_log;
