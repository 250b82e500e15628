use crate::core::response::interpret_body;
use crate::domain::model::{CrowdingReading, QueryRequest, RetryPolicy};
use crate::domain::ports::{ConfigProvider, CrowdingSource};
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const CROWDING_PATH: &str = "api/crowding";

/// 組出查詢網址：`{base}/api/crowding?line_id=..&line_number=..&line_carriage=..`
///
/// base 若帶有路徑前綴會保留，參數值交給 `url` 的預設編碼處理。
pub fn build_query_url(base_url: &str, request: &QueryRequest) -> Result<Url> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let mut url = base.join(CROWDING_PATH)?;
    url.query_pairs_mut().extend_pairs(request.query_pairs());
    Ok(url)
}

pub struct CrowdingQueryClient {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
}

impl CrowdingQueryClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client<C: ConfigProvider>(client: Client, config: &C) -> Self {
        Self {
            client,
            base_url: config.base_url(),
            policy: config.retry_policy(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn fetch_body(&self, url: &Url) -> Result<String> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            let timeout = self.policy.timeout_for_attempt(attempt);
            tracing::debug!(
                "Making API request to: {} (attempt {}/{}, timeout {:?})",
                url,
                attempt + 1,
                max_attempts,
                timeout
            );

            match self.send_once(url, timeout).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.policy.max_retries => {
                    tracing::warn!(
                        "🔁 Attempt {}/{} failed, retrying: {}",
                        attempt + 1,
                        max_attempts,
                        e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, url: &Url, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await?;
        tracing::debug!("API response status: {}", response.status());

        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl CrowdingSource for CrowdingQueryClient {
    async fn submit_query(&self, request: &QueryRequest) -> Result<CrowdingReading> {
        let url = build_query_url(&self.base_url, request)?;
        tracing::info!(
            "📡 Querying crowding for line {:?}, run {:?}, carriage {:?}",
            request.line_id,
            request.line_number,
            request.line_carriage
        );

        let body = self.fetch_body(&url).await?;
        tracing::debug!("Response body: {}", body);

        match interpret_body(&body) {
            Ok(reading) => {
                tracing::info!(
                    "✅ Carriage {} has {} passengers (level {})",
                    reading.line_carriage,
                    reading.person_num,
                    reading.crowd_level
                );
                Ok(reading)
            }
            Err(e) => {
                tracing::warn!("❌ Query did not return a reading: {}", e);
                Err(e)
            }
        }
    }
}
