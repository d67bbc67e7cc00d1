//! servicelogger - send OCM service logs
//!
//! CLI entry point.

use std::fs;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use eyre::{Context, Result};
use tracing::info;

use servicelogger::cli::{Cli, Command, SendArgs};
use servicelogger::config::{Config, SendConfig};
use servicelogger::confirm::{AssumeYes, Confirm, TerminalConfirm};
use servicelogger::delivery::{DeliveryCoordinator, OcmDeliveryClient};
use servicelogger::progress::{ProgressIndicator, Spinner};
use servicelogger::render::render_markdown;
use servicelogger::send::send_service_log;
use servicelogger::template::ServiceLogTemplate;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("servicelogger")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file, not stdout/stderr; stdout carries result lines
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("servicelogger.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Command::Send(args)) => cmd_send(&config, args).await,
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Read, render, confirm, and deliver a service log
async fn cmd_send(config: &Config, args: SendArgs) -> Result<()> {
    let send_config = SendConfig::resolve(&args, config)?;
    info!(
        base_url = %send_config.base_url,
        target_count = send_config.target_ids.len(),
        "send: resolved configuration"
    );

    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read service log from stdin")?;
    let notice = ServiceLogTemplate::from_json(&input).context("Failed to parse service log template")?;

    let styled = std::io::stdout().is_terminal();
    println!("{}", render_markdown(&notice.to_markdown(), styled));

    let confirm: Box<dyn Confirm> = if args.yes { Box::new(AssumeYes) } else { Box::new(TerminalConfirm) };

    let indicator: Arc<dyn ProgressIndicator> = if std::io::stderr().is_terminal() {
        Arc::new(Spinner::new("Sending service log"))
    } else {
        Arc::new(Spinner::hidden())
    };
    let client = Arc::new(OcmDeliveryClient::from_config(&send_config));
    let coordinator = DeliveryCoordinator::new(client, indicator);

    let Some(batch) = send_service_log(
        notice,
        &send_config.target_ids,
        confirm.as_ref(),
        &coordinator,
        &mut std::io::stderr(),
    )
    .await?
    else {
        return Ok(());
    };

    if batch.all_succeeded() {
        Ok(())
    } else {
        Err(eyre::eyre!(
            "{} of {} service log deliveries failed",
            batch.failed_count(),
            batch.len()
        ))
    }
}
