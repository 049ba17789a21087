//! Dukani Phone Shop Inventory & Sales System
//!
//! A Rust server for IMEI-tracked retail phone inventory: bulk stock
//! intake, device assignment to sellers, and atomic sale commitment with
//! receipt numbering, over a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
