use crate::domain::model::QueryRequest;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "crowding-client")]
#[command(about = "Query the crowding level of a metro carriage")]
pub struct CliConfig {
    /// Line identifier
    #[arg(long)]
    pub line_id: Option<String>,

    /// Line/run number
    #[arg(long)]
    pub line_number: Option<String>,

    /// Carriage number
    #[arg(long)]
    pub carriage: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Backend host")]
    pub host: Option<String>,

    #[arg(long, help = "Backend port")]
    pub port: Option<u16>,

    #[arg(long, help = "Per-attempt timeout in milliseconds")]
    pub timeout_ms: Option<u64>,

    #[arg(long, help = "Retries after a timeout")]
    pub max_retries: Option<u32>,

    #[arg(long, help = "Linear timeout growth factor between attempts")]
    pub backoff_multiplier: Option<f32>,

    #[arg(long, help = "Render responses to superseded queries too")]
    pub keep_stale: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit log lines as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 有任一識別欄位時為單次查詢，其餘欄位以空字串送出；全部缺少時回傳 None
    pub fn request(&self) -> Option<QueryRequest> {
        if self.line_id.is_none() && self.line_number.is_none() && self.carriage.is_none() {
            return None;
        }

        Some(QueryRequest::new(
            self.line_id.clone().unwrap_or_default(),
            self.line_number.clone().unwrap_or_default(),
            self.carriage.clone().unwrap_or_default(),
        ))
    }
}
