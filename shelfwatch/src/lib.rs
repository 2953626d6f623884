//! Inventory and clock-in record service.
//!
//! Two resources, items and clock-in records, are exposed over HTTP with
//! create, read, filter, update and delete endpoints plus a per-email item
//! count. Storage goes through [`shelfwatch_core::store::DocumentStore`], backed
//! by MongoDB when a connection string is configured and by an in-memory store
//! otherwise.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use shelfwatch::{config::Config, db, http};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(db::connect_store(&config).await?);
//!     let app = http::router(http::AppState::new(store), &config.static_dir);
//!
//!     let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod telemetry;

