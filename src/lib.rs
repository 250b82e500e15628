pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::{toml_config::TomlConfig, ClientSettings};
pub use core::client::CrowdingQueryClient;
pub use core::render::{render_outcome, render_reading};
pub use core::session::{QuerySession, SessionEvent};
pub use domain::model::{describe_crowd_level, CrowdLevel, CrowdingReading, QueryRequest, RetryPolicy};
pub use domain::ports::{ConfigProvider, CrowdingSource};
pub use utils::error::{CrowdingError, Result};
