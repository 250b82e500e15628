pub mod client;
pub mod render;
pub mod response;
pub mod session;

pub use crate::domain::model::{CrowdLevel, CrowdingReading, QueryRequest, RetryPolicy};
pub use crate::domain::ports::{ConfigProvider, CrowdingSource};
pub use crate::utils::error::Result;
