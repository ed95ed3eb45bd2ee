pub mod cli;
pub mod config;
pub mod controller;
pub mod mapping;
pub mod output;
#[cfg(test)]
mod testing;

use crate::cli::Cli;
use crate::config::Settings;
use crate::controller::{GilrsSource, ReadingSource};
use crate::mapping::engine::{enumerate_slots, select_slots, PollEngine};
use crate::mapping::SlotMapper;
use crate::output::{LogSink, OutputSink, RdevSink};
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup()?;

    let mut settings = Settings::load(cli.config.as_deref()).await?;
    apply_overrides(&mut settings, &cli);

    let mut source =
        GilrsSource::create().map_err(|e| eyre!("Failed to open controller backend: {}", e))?;

    let reports = enumerate_slots(&mut source);
    if cli.list {
        for report in &reports {
            let name = report.name.as_deref().unwrap_or("-");
            match &report.status {
                Ok(()) => println!("{}: {}", report.index, name),
                Err(e) => println!("{}: unavailable ({})", report.index, e),
            }
        }
        return Ok(());
    }

    let slots = select_slots(&mut source, &settings.controller.slots)?;
    let table = settings.action_table()?;
    let slot_settings = settings.slot_settings()?;
    info!(
        "Mapping slots {:?} with {} bindings, layers {:?}",
        slots,
        table.len(),
        slot_settings.modifiers.order()
    );

    let mappers = slots
        .iter()
        .map(|index| SlotMapper::new(*index, table.clone(), slot_settings.clone()))
        .collect();

    let sink: Box<dyn OutputSink> = if settings.output.dry_run {
        info!("Dry run, key events are only logged");
        Box::new(LogSink)
    } else {
        Box::new(RdevSink::new())
    };

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let source: Box<dyn ReadingSource> = Box::new(source);
    let engine = PollEngine::create(source, sink, mappers, settings.engine_settings())?;

    match engine.run_until_cancelled(cancel).await {
        Ok(stats) => {
            info!(
                "Stopped after {} ticks, {} actions, {} read errors",
                stats.ticks, stats.actions, stats.read_errors
            );
            Ok(())
        }
        Err(e) => {
            error!("Poll loop aborted: {}", e);
            Err(e.into())
        }
    }
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if !cli.controllers.is_empty() {
        settings.controller.slots = cli.controllers.clone();
    }
    if let Some(interval) = cli.poll_interval_ms {
        settings.controller.poll_interval_ms = interval;
    }
    if cli.dry_run {
        settings.output.dry_run = true;
    }
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, shutting down"),
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
        cancel.cancel();
    });
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    let level = match std::env::var("RUST_LOG").as_deref() {
        Ok("trace") => Level::TRACE,
        Ok("debug") => Level::DEBUG,
        Ok("warn") => Level::WARN,
        Ok("error") => Level::ERROR,
        _ => Level::INFO,
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_file_settings() {
        let mut settings = Settings::default();
        let cli = Cli::try_parse_from(["padscribe", "-c", "1", "-c", "3", "--poll-interval-ms", "8", "--dry-run"])
            .unwrap();

        apply_overrides(&mut settings, &cli);

        assert_eq!(settings.controller.slots, vec![1, 3]);
        assert_eq!(settings.controller.poll_interval_ms, 8);
        assert!(settings.output.dry_run);
    }

    #[test]
    fn file_slots_survive_without_flags() {
        let mut settings = Settings::default();
        settings.controller.slots = vec![2];
        let cli = Cli::try_parse_from(["padscribe"]).unwrap();

        apply_overrides(&mut settings, &cli);

        assert_eq!(settings.controller.slots, vec![2]);
        assert!(!settings.output.dry_run);
    }
}
