use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

/// 使用者輸入的線路 / 車次 / 車廂三元組，原樣送出，不做任何驗證。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub line_id: String,
    pub line_number: String,
    pub line_carriage: String,
}

impl QueryRequest {
    pub fn new(
        line_id: impl Into<String>,
        line_number: impl Into<String>,
        line_carriage: impl Into<String>,
    ) -> Self {
        Self {
            line_id: line_id.into(),
            line_number: line_number.into(),
            line_carriage: line_carriage.into(),
        }
    }

    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("line_id", self.line_id.as_str()),
            ("line_number", self.line_number.as_str()),
            ("line_carriage", self.line_carriage.as_str()),
        ]
    }
}

/// 後端回傳的單節車廂擁擠度讀數。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrowdingReading {
    #[serde(deserialize_with = "string_or_integer")]
    pub line_id: String,
    #[serde(deserialize_with = "string_or_integer")]
    pub line_number: String,
    #[serde(deserialize_with = "string_or_integer")]
    pub line_carriage: String,
    pub person_num: i64,
    pub crowd_level: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl CrowdingReading {
    pub fn level(&self) -> CrowdLevel {
        CrowdLevel::from_code(self.crowd_level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrowdLevel {
    Light,
    Moderate,
    Crowded,
    Unknown(i64),
}

impl CrowdLevel {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => CrowdLevel::Light,
            1 => CrowdLevel::Moderate,
            2 => CrowdLevel::Crowded,
            other => CrowdLevel::Unknown(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CrowdLevel::Light => "light",
            CrowdLevel::Moderate => "moderate",
            CrowdLevel::Crowded => "crowded",
            CrowdLevel::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a raw crowding code to its display label. Every integer has one.
pub fn describe_crowd_level(level: i64) -> &'static str {
    CrowdLevel::from_code(level).label()
}

// 後端從資料庫直接輸出整數 ID，這裡兩種型別都接受
fn string_or_integer<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        UInt(u64),
    }

    match Raw::deserialize(deserializer) {
        Ok(Raw::Text(s)) => Ok(s),
        Ok(Raw::Int(n)) => Ok(n.to_string()),
        Ok(Raw::UInt(n)) => Ok(n.to_string()),
        Err(_) => Err(serde::de::Error::custom(
            "expected a string or an integer identifier",
        )),
    }
}

/// 單次嘗試的逾時上限
pub const MAX_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(600);

/// 單一固定的逾時 / 重試策略。
///
/// 每次失敗後下一次的逾時為 `timeout + timeout * backoff_multiplier`，
/// 線性成長，不加抖動。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_multiplier: f32,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, max_retries: u32, backoff_multiplier: f32) -> Self {
        Self {
            timeout,
            max_retries,
            backoff_multiplier,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Timeout for the given zero-based attempt, capped at [`MAX_ATTEMPT_TIMEOUT`].
    pub fn timeout_for_attempt(&self, attempt: u32) -> Duration {
        let factor = if self.backoff_multiplier.is_finite() {
            f64::from(self.backoff_multiplier.max(0.0))
        } else {
            0.0
        };

        let mut timeout = self.timeout.min(MAX_ATTEMPT_TIMEOUT);
        for _ in 0..attempt {
            if timeout >= MAX_ATTEMPT_TIMEOUT {
                break;
            }
            let growth = Duration::try_from_secs_f64(timeout.as_secs_f64() * factor)
                .unwrap_or(MAX_ATTEMPT_TIMEOUT);
            timeout = timeout.saturating_add(growth).min(MAX_ATTEMPT_TIMEOUT);
        }
        timeout
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(10_000), 1, 1.0)
    }
}
