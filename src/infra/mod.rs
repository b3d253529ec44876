//! Infrastructure layer (adapters/implementations).
//!
//! IO-heavy integrations: the HTTP gateway to the tracking service and the
//! on-disk configuration.

pub mod api;
pub mod app_config;
