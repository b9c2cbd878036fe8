//! Application services — use-case entry points for collaborators.

pub mod automation_service;

pub use automation_service::AutomationService;
