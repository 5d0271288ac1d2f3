use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io::{BufWriter, Write};
use xtrecent::app;
use xtrecent::cli::Cli;
use xtrecent::config::Settings;
use xtrecent::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    if cli.nothing_to_do() {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {e}");
        }
        std::process::exit(1);
    }

    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let guard = match init_logging(&settings.log_target, settings.log_level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &settings) {
        tracing::error!(error = ?e, "xtrecent failed");
        eprintln!("Error: {e:#}");
        drop(guard);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match cli.measure_hz {
        Some(samples) => app::run_measure_hz(settings, samples, &mut out)?,
        None => app::run_report(settings, &mut out)?,
    }
    out.flush()?;
    Ok(())
}
