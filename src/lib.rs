//! TrueNAS Scale Data Sources
//!
//! Read-only data sources for an infrastructure-as-code host, backed by the
//! TrueNAS Scale 25.x WebSocket API.
//!
//! # Overview
//!
//! Each data source translates declared selectors (a pool name, a dataset
//! pool+path pair, a credential name, a dataset id for snapshot listing) into
//! a normalized state record the host stores in its state graph.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  Metadata/Schema   ┌─────────────┐   facade call   ┌──────────┐  JSON-RPC 2.0  ┌─────────┐
//! │   Host   │ ─────────────────► │ Data source │ ──────────────► │ Services │ ─────────────► │ TrueNAS │
//! │          │  Configure/Read    │  (adapter)  │                 │ Registry │   WebSocket    │  Scale  │
//! └──────────┘ ◄───────────────── └─────────────┘ ◄────────────── └──────────┘ ◄───────────── └─────────┘
//!                state | diagnostic      projection
//! ```
//!
//! # Modules
//!
//! - [`framework`] - host boundary: schemas, diagnostics, config decoding, [`framework::DataSource`]
//! - [`datasources`] - the five read adapters
//! - [`services`] - per-namespace facades, the registry, and fixture facades
//! - [`projection`] - pure vendor-to-schema mapping helpers
//! - [`truenas`] - WebSocket client and API type definitions
//! - [`provider`] - data source catalogue
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use truenas_provider::config::Config;
//! use truenas_provider::framework::{ConfigureRequest, ReadRequest};
//! use truenas_provider::provider::TrueNasProvider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     let provider = TrueNasProvider::new(config.provider.type_name.clone());
//!     let registry = Arc::new(provider.connect(&config.truenas));
//!
//!     let mut pool = provider.data_source("truenas_pool").expect("registered");
//!     pool.configure(ConfigureRequest::new(registry));
//!     let response = pool
//!         .read(ReadRequest::new(serde_json::json!({"name": "tank"})))
//!         .await;
//!     println!("{:?}", response.state);
//!     Ok(())
//! }
//! ```
//!
//! # Data Sources
//!
//! - `truenas_pool` - ZFS pool by name
//! - `truenas_dataset` - dataset by pool and path
//! - `truenas_cloudsync_credentials` - cloud credential by name
//! - `truenas_virt_config` - global virtualization settings
//! - `truenas_snapshots` - snapshots of a dataset, optionally recursive and glob-filtered

pub mod config;
pub mod datasources;
pub mod error;
pub mod framework;
pub mod projection;
pub mod provider;
pub mod services;
pub mod truenas;
