//! Luno Trades - Download do histórico de trades
//!
//! Busca os trades de cada token configurado, semana a semana, e acrescenta
//! o resultado em um CSV nomeado com o horário de início da execução.
//!
//! Uso:
//!   ./target/release/luno-trades
//!   RUST_LOG=debug ./target/release/luno-trades --env-file prod.env --output-dir data/

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use luno_trades::api_client::LUNO_API_URL;
use luno_trades::dates::{now_ms, validate_range};
use luno_trades::fetcher::output_filename;
use luno_trades::{logging, Config, LunoClient, TradeFetcher};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

// ============================================================================
// Argumentos de Linha de Comando
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "luno-trades", about = "Baixa o histórico de trades da Luno para CSV")]
struct Args {
    /// Arquivo com as variáveis de configuração
    #[arg(long, env = "LUNO_ENV_FILE", default_value = ".env")]
    env_file: PathBuf,

    /// Diretório onde o CSV é criado
    #[arg(long, env = "LUNO_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Endpoint de listagem de trades
    #[arg(long, env = "LUNO_BASE_URL", default_value = LUNO_API_URL)]
    base_url: String,
}

// ============================================================================
// Execução
// ============================================================================

async fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(&args.env_file)?;
    let range = validate_range(&config, now_ms())?;

    // Um único run_id por execução: todos os tokens vão para o mesmo arquivo
    let run_id = Utc::now().timestamp();
    let output_path = args.output_dir.join(output_filename(run_id));

    info!("Tokens: {:?} / {}", config.tokens, config.currency);
    info!("Intervalo: {} .. {}", range.start, range.end);
    info!("CSV: {}", output_path.display());

    let client = LunoClient::with_base_url(&args.base_url, &config.api_key, &config.api_secret)?;
    let fetcher = TradeFetcher::new(client, output_path);

    let summary = fetcher
        .run(&config.tokens, &config.currency, range)
        .await
        .with_context(|| {
            format!(
                "falha ao buscar trades (parcial em {})",
                fetcher.output_path().display()
            )
        })?;

    info!("=== Coleta Finalizada ===");
    info!(
        "{} tokens, {} janelas, {} trades salvos em {}",
        summary.tokens,
        summary.windows,
        summary.trades,
        fetcher.output_path().display()
    );

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}
