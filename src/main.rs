use anyhow::{Context, Result};
use clap::{Parser, Subcommand, builder::TypedValueParser};
use serving_client::{
    ServingClient,
    client::{DEFAULT_BATCH_LIMIT, DEFAULT_TEXT_COLUMN},
    config::{self, Config, EndpointOverrides},
    input::{self, Rendered},
    payload::{NonFinitePolicy, example_payload},
    serving::{EndpointInvoker, InvocationResult, ReqwestTransport},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;

/// Send text, CSV rows or raw JSON to a model serving endpoint.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// YAML configuration file
    #[arg(long, env = "SERVING_CLIENT_CONFIG")]
    config: Option<PathBuf>,

    /// Workspace URL, e.g. https://dbc-1234.cloud.databricks.com
    #[arg(long, env = "DATABRICKS_HOST")]
    host: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Serving endpoint name
    #[arg(long, env = "DATABRICKS_ENDPOINT")]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// How NaN and infinite cells are encoded: sentinel, null or reject
    #[arg(long)]
    non_finite: Option<NonFinitePolicy>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the resolved host, endpoint and masked token
    Status,
    /// Send a single text value as a one-row frame
    Text {
        text: String,
        #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
        column: String,
    },
    /// Send one column of a CSV file
    Batch {
        csv: PathBuf,
        #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
        column: String,
        #[arg(long, default_value_t = DEFAULT_BATCH_LIMIT, value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
        limit: usize,
    },
    /// Print the first rows of a CSV file
    Preview {
        csv: PathBuf,
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },
    /// Send a raw JSON payload (from --json, --file or stdin)
    Raw {
        #[arg(long, conflicts_with = "file")]
        json: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print an example raw payload
    Example,
    /// Read inputs line by line
    Interactive,
}

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

fn init_tracing(cli: &Cli, config: &Config) -> Result<()> {
    // The flag overrides the config file; RUST_LOG overrides both
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logs.level.clone());

    validate_log_level(&log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!("Logging initialized with level: {}", log_level);
    Ok(())
}

fn build_client(cli: &Cli, mut config: Config) -> Result<ServingClient> {
    if let Some(timeout) = cli.timeout {
        config.client.timeout_secs = timeout;
    }
    if let Some(policy) = cli.non_finite {
        config.client.non_finite = policy;
    }

    let overrides = EndpointOverrides {
        host: cli.host.clone(),
        token: cli.token.clone(),
        name: cli.endpoint.clone(),
    };
    let target = config::resolve_target(&config.endpoint, &overrides)?;
    let transport = Arc::new(ReqwestTransport::new()?);
    let invoker = EndpointInvoker::new(transport, &config.client);
    Ok(ServingClient::new(invoker, target))
}

fn report(outcome: serving_client::Result<InvocationResult>) -> ExitCode {
    let rendered: Rendered = input::render_outcome(&outcome);
    if rendered.is_success() {
        println!("{rendered}");
        ExitCode::SUCCESS
    } else {
        eprintln!("{rendered}");
        ExitCode::FAILURE
    }
}

async fn read_raw_input(json: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(json) = json {
        return Ok(json);
    }
    if let Some(path) = file {
        return tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut buffer = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buffer)
        .await
        .context("Failed to read payload from stdin")?;
    Ok(buffer)
}

async fn run(cli: Cli, config: Config) -> Result<ExitCode> {
    match cli.command {
        Command::Example => {
            println!("{}", serde_json::to_string_pretty(&example_payload()?)?);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Preview { ref csv, rows } => {
            let table = input::load_csv(csv).await?;
            println!("{}", input::render_preview(&table, rows));
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let client = build_client(&cli, config)?;

    let code = match cli.command {
        Command::Status => {
            println!("{}", input::render_status(client.target()));
            ExitCode::SUCCESS
        }
        Command::Text { text, column } => report(client.send_text(&text, &column).await),
        Command::Batch { csv, column, limit } => {
            let outcome = match input::load_csv(&csv).await {
                Ok(table) => client.send_batch(&table, &column, limit).await,
                Err(e) => Err(e),
            };
            report(outcome)
        }
        Command::Raw { json, file } => {
            let text = read_raw_input(json, file).await?;
            report(client.send_raw(&text).await)
        }
        Command::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            let summary = input::run_interactive(&client, stdin, &mut stdout).await?;
            info!(
                "Interactive session finished: {} of {} attempts succeeded",
                summary.succeeded, summary.attempts
            );
            ExitCode::SUCCESS
        }
        Command::Example | Command::Preview { .. } => ExitCode::SUCCESS,
    };

    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration first (before logging setup)
    let config = match config::load(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&cli, &config) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
