//! # Loan Tracker
//!
//! Terminal front end for tracking loan applications, customers and
//! referral partners against a JSON REST backend.
//!
//! ## Modules
//!
//! - [`api`]: REST client and the `Backend` seam
//! - [`models`]: Customer, Partner and Loan records
//! - [`store`]: application state owner (refresh, create-then-refresh)
//! - [`dashboard`]: funded-loan totals
//! - [`table`]: column-driven table rendering
//! - [`forms`]: entity drafts and input coercion
//! - [`nav`]: tab selection
//! - [`tui`]: ratatui front end
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use loan_tracker::{ApiClient, AppStore, ClientConfig, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::default())?;
//!     let store = AppStore::new(Arc::new(client), StoreConfig::default());
//!
//!     store.refresh().await?;
//!
//!     let totals = store.snapshot().totals();
//!     println!("{} funded loans", totals.funded_count);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod forms;
pub mod models;
pub mod nav;
pub mod store;
pub mod table;
pub mod tui;

pub use api::{ApiClient, ApiError, ApiResult, Backend, ClientConfig};

pub use models::{Customer, EntityKind, Loan, LoanStatus, Partner, RecordId};

pub use store::{AppState, AppStore, Banner, BannerKind, StoreConfig};

pub use dashboard::DashboardTotals;

pub use forms::{Draft, Form, FormError, Submission};

pub use nav::{Navigation, Tab};

pub use table::{Column, RenderedTable, TableRow, TableSpec};

pub use config::{Config, ConfigError, LoadReport, LoggingConfig};
