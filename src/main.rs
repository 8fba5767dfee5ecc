use clap::{ArgAction, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod ingest;
mod llm;
mod summarize;

use config::{API_KEY_ENV, Config, Overrides, Settings};
use error::Error;
use llm::GroqClient;
use summarize::{Summarizer, SummaryOptions};

#[derive(Parser)]
#[command(name = "docsum")]
#[command(about = "Summarize a document in one plain-English paragraph using the Groq API")]
#[command(version)]
struct Cli {
    /// Document to summarize (text, HTML, PDF or DOCX)
    file: PathBuf,

    /// Groq model to use
    #[arg(long, env = "DOCSUM_MODEL")]
    model: Option<String>,

    /// Target reading level, e.g. "first grade" or "fifth grade"
    #[arg(long, env = "DOCSUM_READING_LEVEL")]
    reading_level: Option<String>,

    /// Summarize longer documents in parts of at most this many bytes (0 disables)
    #[arg(long, value_name = "N")]
    max_chunk_chars: Option<usize>,

    /// Request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Chat completions endpoint
    #[arg(long, env = "GROQ_API_URL", hide = true)]
    api_url: Option<String>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            model: self.model.clone(),
            reading_level: self.reading_level.clone(),
            max_chunk_chars: self.max_chunk_chars,
            timeout_secs: self.timeout_secs,
            api_url: self.api_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the key may come from the shell or config file
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => return report(&Error::Usage(e.to_string())),
        Err(e) => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

async fn run(cli: &Cli) -> Result<String, Error> {
    let config = Config::load().map_err(|e| Error::Configuration(format!("{e:#}")))?;

    let api_key = config
        .api_key(std::env::var(API_KEY_ENV).ok())
        .ok_or_else(|| {
            Error::Configuration(format!(
                "no Groq API key found. Set {} (a .env file works) or add groq_api_key to {}",
                API_KEY_ENV,
                Config::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "the config file".to_string())
            ))
        })?;

    let settings = Settings::resolve(&config, cli.overrides());
    tracing::debug!(?settings, "resolved settings");

    let spinner = create_spinner("Extracting text...");
    let content = ingest::extract_from_file(&cli.file);
    spinner.finish_and_clear();
    let content = content?;
    tracing::info!(source = %content.source, format = content.format.name(), "document loaded");

    let client = GroqClient::new(api_key, settings.model.clone())
        .with_api_url(settings.api_url.clone())
        .with_timeout(settings.timeout)?;

    let summarizer = Summarizer::new(
        &client,
        SummaryOptions {
            reading_level: settings.reading_level.clone(),
            max_chunk_chars: settings.max_chunk_chars,
        },
    );

    let spinner = create_spinner(&format!("Summarizing with {}...", client.model));
    let summary = summarizer.summarize(&content.text).await;
    spinner.finish_and_clear();

    Ok(summary?)
}

/// Print a diagnostic to stderr and pick the exit code for it
fn report(err: &Error) -> ExitCode {
    match err {
        // clap has already formatted the usage text
        Error::Usage(message) => eprint!("{}", message),
        _ => {
            eprintln!("{} {}", "Error:".red().bold(), err);

            let rendered = err.to_string();
            let mut source = std::error::Error::source(err);
            while let Some(cause) = source {
                let cause_text = cause.to_string();
                if !rendered.contains(&cause_text) {
                    eprintln!("  {} {}", "caused by:".dimmed(), cause_text);
                }
                source = cause.source();
            }
        }
    }
    err.exit_code()
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docsum={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Create a spinner for indeterminate progress; hidden when stderr is not a terminal
fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}
