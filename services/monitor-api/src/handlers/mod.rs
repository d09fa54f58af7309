//! HTTP request handlers for the dashboard API.

pub mod background;
pub mod health;
pub mod proxy;
pub mod status;
