use crate::domain::model::{CrowdingReading, QueryRequest, RetryPolicy};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    /// Scheme, host and port of the backend, e.g. `http://127.0.0.1:5001`.
    fn base_url(&self) -> String;
    fn retry_policy(&self) -> RetryPolicy;
    fn discard_stale(&self) -> bool;
}

/// 擁擠度資料來源：一次查詢對應一個結果，成功或四種失敗之一。
#[async_trait]
pub trait CrowdingSource: Send + Sync {
    async fn submit_query(&self, request: &QueryRequest) -> Result<CrowdingReading>;
}
