//! # givehub-adapter-actions
//!
//! Concrete [`ActionHandler`](givehub_app::ports::ActionHandler)
//! implementations for the HTTP-shaped action types:
//!
//! - `httpRequest` — an arbitrary HTTP call described by the action config
//! - `webhook` — delivery of the run's event payload to a fixed endpoint
//!
//! The remaining action types (`emailNotification`, `moduleFunction`,
//! `createRecord`, `updateRecord`) reach into platform subsystems and
//! are injected by the embedding application.

pub mod http_request;
pub mod webhook;

pub use http_request::HttpRequestHandler;
pub use webhook::WebhookHandler;
