use clap::Parser;
use crowding_client::app::{run_interactive, run_once};
use crowding_client::utils::error::ErrorCategory;
use crowding_client::utils::{logger, validation::Validate};
use crowding_client::{CliConfig, ClientSettings, ConfigProvider, CrowdingQueryClient, QuerySession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let settings = match ClientSettings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    tracing::info!("🚀 Using backend {}", settings.base_url());

    let client = CrowdingQueryClient::new(&settings);
    let (session, mut events) = QuerySession::new(client, settings.discard_stale());
    let mut stdout = std::io::stdout();

    match cli.request() {
        Some(request) => {
            let outcome = run_once(&session, &mut events, request, &mut stdout).await;
            if let Err(e) = outcome {
                tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                let exit_code = match e.category() {
                    ErrorCategory::EmptyResult => 2,
                    _ => 1,
                };
                std::process::exit(exit_code);
            }
        }
        None => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            run_interactive(&session, &mut events, input, &mut stdout).await?;
        }
    }

    Ok(())
}
