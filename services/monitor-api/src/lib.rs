//! Monitoring dashboard API for a mosdns instance.
//!
//! Each inbound status request triggers a fresh scrape of the upstream
//! `/metrics` endpoint; the parsed snapshot is served as JSON. Admin plugin
//! requests are proxied through transparently, and a small file store keeps
//! at most one custom background image for the dashboard UI.

pub mod background;
pub mod config;
pub mod fetch;
pub mod handlers;
pub mod state;
