use crate::domain::model::CrowdingReading;
use crate::utils::error::{CrowdingError, Result};
use serde::Deserialize;
use serde_json::Value;

pub const SUCCESS_STATUS: &str = "success";
pub const DEFAULT_ERROR_MESSAGE: &str = "unknown error";

/// 解析後端回應內容
///
/// 依序檢查：JSON 格式 → `status` 是否為 `"success"` → `data` 是否為 null →
/// `data` 是否能解碼為 [`CrowdingReading`]。每一步失敗都對應不同的錯誤類別。
pub fn interpret_body(body: &str) -> Result<CrowdingReading> {
    let json: Value = serde_json::from_str(body)?;

    let envelope = json.as_object().ok_or_else(|| CrowdingError::DecodeError {
        message: "expected a JSON object at the top level".to_string(),
    })?;

    if envelope.get("status").and_then(Value::as_str) != Some(SUCCESS_STATUS) {
        let message = match envelope.get("message") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => DEFAULT_ERROR_MESSAGE.to_string(),
            Some(other) => other.to_string(),
        };
        return Err(CrowdingError::ApplicationError { message });
    }

    // 缺少 data 與 data 為 null 視為同一種情況
    match envelope.get("data") {
        None | Some(Value::Null) => Err(CrowdingError::EmptyResult),
        Some(data) => Ok(CrowdingReading::deserialize(data)?),
    }
}
