use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use qrispay::application::engine::PaymentEngine;
use qrispay::application::ledger::LedgerService;
use qrispay::config::{DEFAULT_MARK_LOCATOR, EngineConfig, ErrorCorrection, MAX_MARK_WIDTH_RATIO};
use qrispay::domain::ledger::LedgerAccount;
use qrispay::domain::ports::ImagePublisherBox;
use qrispay::infrastructure::http::{
    DEFAULT_LEDGER_URL, DEFAULT_TIMEOUT, DEFAULT_UPLOAD_URL, HttpImagePublisher, HttpLedgerClient,
};
use qrispay::infrastructure::local::{AnyMarkSource, DirectoryPublisher};
use qrispay::interfaces::json::response_writer::ResponseWriter;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Timeout for every outbound HTTP call, in seconds.
    #[arg(long, env = "QRISPAY_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a dynamic payment code for an amount.
    Create(CreateArgs),
    /// Show the most recent transaction in the merchant's mutation log.
    Status(LedgerArgs),
    /// Show the balance reported by the most recent transaction.
    Balance(LedgerArgs),
}

#[derive(Args)]
struct CreateArgs {
    /// Amount to embed in the payment code.
    #[arg(long)]
    amount: String,

    /// Static QRIS payload of the merchant.
    #[arg(long)]
    payload: String,

    /// Brand mark address, http(s) URL or file path.
    #[arg(long, env = "QRISPAY_MARK", default_value = DEFAULT_MARK_LOCATOR)]
    mark: String,

    /// Mark width as a fraction of the code width.
    #[arg(long, default_value_t = MAX_MARK_WIDTH_RATIO)]
    mark_ratio: f32,

    #[arg(long, value_enum, default_value_t = ErrorCorrection::High)]
    error_correction: ErrorCorrection,

    /// Pixels per module.
    #[arg(long, default_value_t = 8)]
    scale: u32,

    /// Quiet zone width, in modules.
    #[arg(long, default_value_t = 4)]
    quiet_zone: u32,

    /// Write images into this directory instead of uploading them.
    #[arg(long, env = "QRISPAY_PUBLISH_DIR")]
    publish_dir: Option<PathBuf>,

    /// Multipart image host receiving the rendered code.
    #[arg(long, env = "QRISPAY_UPLOAD_URL", default_value = DEFAULT_UPLOAD_URL)]
    upload_url: String,
}

#[derive(Args)]
struct LedgerArgs {
    #[arg(long)]
    merchant: String,

    #[arg(long)]
    key: String,

    /// Base address of the mutation log gateway.
    #[arg(long, env = "QRISPAY_LEDGER_URL", default_value = DEFAULT_LEDGER_URL)]
    ledger_url: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let timeout = Duration::from_secs(cli.timeout_secs);
    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());

    let succeeded = match cli.command {
        Command::Create(args) => {
            let config = EngineConfig {
                mark_locator: args.mark,
                mark_width_ratio: args.mark_ratio,
                error_correction: args.error_correction,
                module_scale: args.scale,
                quiet_zone: args.quiet_zone,
            };
            let publisher: ImagePublisherBox = match args.publish_dir {
                Some(dir) => Box::new(DirectoryPublisher::new(dir)),
                None => Box::new(HttpImagePublisher::new(args.upload_url, timeout)?),
            };
            let engine = PaymentEngine::new(
                config,
                Box::new(AnyMarkSource::new(timeout)?),
                publisher,
            )?;

            let outcome = engine
                .create_payment_from_text(&args.amount, &args.payload)
                .await;
            writer.write_outcome(&outcome).into_diagnostic()?;
            outcome.is_ok()
        }
        Command::Status(args) => {
            let service = LedgerService::new(Box::new(HttpLedgerClient::new(
                args.ledger_url,
                timeout,
            )?));
            let account = LedgerAccount::new(args.merchant, args.key);
            let outcome = service.latest_transaction(&account).await;
            writer.write_outcome(&outcome).into_diagnostic()?;
            outcome.is_ok()
        }
        Command::Balance(args) => {
            let service = LedgerService::new(Box::new(HttpLedgerClient::new(
                args.ledger_url,
                timeout,
            )?));
            let account = LedgerAccount::new(args.merchant, args.key);
            let outcome = service.balance(&account).await;
            writer.write_outcome(&outcome).into_diagnostic()?;
            outcome.is_ok()
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
