use crate::domain::model::{describe_crowd_level, CrowdingReading};
use crate::utils::error::Result;

/// 查詢進行中顯示的提示文字
pub const QUERYING_PLACEHOLDER: &str = "Querying...";

pub fn render_reading(reading: &CrowdingReading) -> String {
    let mut lines = vec![
        format!("Line ID: {}", reading.line_id),
        format!("Run: {}", reading.line_number),
        format!("Carriage: {}", reading.line_carriage),
        format!("Passengers: {}", reading.person_num),
        format!("Crowding: {}", describe_crowd_level(reading.crowd_level)),
    ];

    if let Some(timestamp) = &reading.timestamp {
        lines.push(format!("Updated: {}", timestamp));
    }

    lines.join("\n")
}

/// 成功時顯示讀數，失敗時顯示錯誤本身 (已含類別前綴)
pub fn render_outcome(outcome: &Result<CrowdingReading>) -> String {
    match outcome {
        Ok(reading) => render_reading(reading),
        Err(e) => e.to_string(),
    }
}
