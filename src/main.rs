use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use reservator::hunt::{HuntOutcome, Hunter, TokioSleeper};
use reservator::oci::{ComputeClient, OciProfile, default_config_file};

mod cli;
mod config;

use cli::Cli;
use config::Config;

/// Copies every log line to stderr and to the log file
struct TeeWriter {
    file: fs::File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reservator")
        .join("logs")
        .join("reservator.log")
}

fn setup_logging(cli: &Cli) -> Result<PathBuf> {
    let log_file = cli.log_file.clone().unwrap_or_else(default_log_file);

    if let Some(log_dir) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .context("Failed to open log file")?;

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.is_verbose() {
        builder.filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Debug);
    }
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })))
        .init();

    Ok(log_file)
}

fn build_client(config: &Config) -> Result<ComputeClient> {
    let config_file = config.oci.config_file.clone().unwrap_or_else(default_config_file);
    let profile = OciProfile::load(&config_file, &config.oci.profile)
        .context(format!("Failed to load OCI profile {}", config.oci.profile))?;

    info!(
        "Using OCI profile {} ({}) from {}",
        config.oci.profile,
        profile.region,
        config_file.display()
    );

    ComputeClient::from_profile(&profile, config.oci.endpoint.as_deref()).context("Failed to create compute client")
}

/// Console summary of a successful hunt; a stop was already logged
fn summary(outcome: &HuntOutcome) -> Option<String> {
    match outcome {
        HuntOutcome::Created { instance, attempts } => Some(format!(
            "{} {} ({}, {}) after {} attempt(s)",
            "Instance created:".green(),
            instance.id,
            instance.lifecycle_state,
            instance.display_name,
            attempts
        )),
        HuntOutcome::Stopped { .. } => None,
    }
}

/// Print the summary; both terminal states end the process normally
fn report(outcome: &HuntOutcome) -> Result<()> {
    if let Some(line) = summary(outcome) {
        println!("{}", line);
        println!("{}", "Check the OCI console for the public IP address".cyan());
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // .env first so it can also carry RUST_LOG
    let dotenv_path = dotenv::dotenv().ok();

    let cli = Cli::parse();

    let log_file = setup_logging(&cli).context("Failed to setup logging")?;
    info!("Logging initialized, writing to: {}", log_file.display());
    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config
        .apply_env(|key| std::env::var(key).ok())
        .context("Invalid configuration in environment")?;

    let client = build_client(&config)?;
    let request = config.launch_request();
    let hunter = Hunter::new(Arc::new(client), TokioSleeper, config.retry_policy());

    let outcome = hunter.run(&request).await;
    report(&outcome)
}
