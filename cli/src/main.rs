//! kyc-batch: entry point for running a verification batch.

use anyhow::Context;
use clap::Parser;
use kyc_audit::{summarize_log, CsvAuditLog};
use kyc_batch::{BatchConfig, CsvRecordSource, Orchestrator};
use kyc_governor::SystemClock;
use kyc_provider::HttpProviderClient;
use kyc_types::ArtifactRef;
use kyc_utils::{init_logging, LogFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kyc-batch", about = "Rate-limited bulk identity verification")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "KYC_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "KYC_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "KYC_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Submit every record of the input sheet, appending to the audit log.
    Run(RunArgs),
    /// Summarise an existing audit log.
    Audit {
        /// Audit log to read (defaults to the configured one).
        #[arg(long, env = "KYC_AUDIT_LOG")]
        audit_log: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML, with the secret redacted.
    Config(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// CSV export of the input sheet.
    #[arg(long, env = "KYC_INPUT")]
    input: Option<PathBuf>,

    /// Audit log to append to.
    #[arg(long, env = "KYC_AUDIT_LOG")]
    audit_log: Option<PathBuf>,

    /// Artifact submitted as the document back when a record has none.
    #[arg(long, env = "KYC_FALLBACK_BACK")]
    fallback_back: Option<PathBuf>,

    /// Data rows to skip before the first submission (resume point).
    #[arg(long, env = "KYC_START_OFFSET")]
    start_offset: Option<u64>,

    /// Maximum number of rows to process in this run.
    #[arg(long, env = "KYC_LIMIT")]
    limit: Option<u64>,

    /// Provider API base URL.
    #[arg(long, env = "KYC_BASE_URL")]
    base_url: Option<String>,

    /// Client identifier for the credential exchange.
    #[arg(long, env = "KYC_CLIENT_ID")]
    client_id: Option<String>,

    /// Client secret for the credential exchange.
    #[arg(long, env = "KYC_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Workflow every session is opened against.
    #[arg(long, env = "KYC_FLOW_ID")]
    flow_id: Option<String>,
}

impl RunArgs {
    fn apply(self, config: &mut BatchConfig) {
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(audit_log) = self.audit_log {
            config.audit_log = audit_log;
        }
        if self.fallback_back.is_some() {
            config.fallback_back = self.fallback_back;
        }
        if let Some(offset) = self.start_offset {
            config.start_offset = offset;
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
        if let Some(base_url) = self.base_url {
            config.provider.base_url = base_url;
        }
        if let Some(client_id) = self.client_id {
            config.provider.client_id = client_id;
        }
        if let Some(client_secret) = self.client_secret {
            config.provider.client_secret = client_secret;
        }
        if let Some(flow_id) = self.flow_id {
            config.provider.flow_id = flow_id;
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<BatchConfig> {
    let mut config = match cli.config {
        Some(ref path) => BatchConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BatchConfig::default(),
    };
    if let Some(ref level) = cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

async fn run(config: BatchConfig) -> anyhow::Result<()> {
    config.validate()?;
    let fallback_back = config
        .fallback_back
        .clone()
        .map(ArtifactRef::new)
        .context("fallback_back is not set")?;

    tracing::info!(
        input = %config.input.display(),
        audit_log = %config.audit_log.display(),
        start_offset = config.start_offset,
        "starting batch against {} (spacing {}s, {} calls per {}s)",
        config.provider.base_url,
        config.governor.min_spacing_secs,
        config.governor.batch_calls,
        config.governor.batch_window_secs,
    );

    let mut source = CsvRecordSource::open(&config.input, config.start_offset)?;
    let provider = HttpProviderClient::new(config.provider.clone())?;
    let mut orchestrator = Orchestrator::new(
        provider,
        CsvAuditLog::new(&config.audit_log),
        SystemClock::new(),
        &config.governor,
        fallback_back,
    )?;

    let result = orchestrator
        .run(&mut source, config.start_offset, config.limit)
        .await;
    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(
                "batch aborted: {e}; entries already in {} are durable",
                config.audit_log.display()
            );
            return Err(e.into());
        }
    };

    println!("{summary}");
    tracing::info!(
        "to continue after this run, pass --start-offset {}",
        summary.next_offset
    );
    Ok(())
}

fn audit(path: PathBuf) -> anyhow::Result<()> {
    let summary =
        summarize_log(&path).with_context(|| format!("reading {}", path.display()))?;
    println!(
        "{}: {} rows, {} sessions opened",
        path.display(),
        summary.rows,
        summary.sessions_opened
    );
    for (category, count) in &summary.by_category {
        println!("  {category:<30} {count}");
    }
    Ok(())
}

fn print_config(mut config: BatchConfig) -> anyhow::Result<()> {
    if !config.provider.client_secret.is_empty() {
        config.provider.client_secret = "<redacted>".into();
    }
    print!("{}", config.to_toml_string()?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    init_logging(config.log_format, &config.log_level).map_err(anyhow::Error::msg)?;
    if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Run(args) => {
            args.apply(&mut config);
            run(config).await
        }
        Command::Audit { audit_log } => audit(audit_log.unwrap_or(config.audit_log)),
        Command::Config(args) => {
            args.apply(&mut config);
            print_config(config)
        }
    }
}
