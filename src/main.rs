use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use msi_props::{Error, PropertySet, check_path, report};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Print the Property table of a Windows Installer package.
#[derive(Debug, Parser)]
#[command(name = "msi-props", version, about, long_about = None)]
struct Cli {
    /// Path to the MSI file
    #[arg(default_value = "pokerok.msi")]
    msi_path: PathBuf,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const UNEXPECTED: u8 = 3;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), anyhow::Error> {
    let path = &cli.msi_path;
    check_path(path)?;

    let properties = PropertySet::from_path(path)?;
    if properties.is_empty() {
        return Err(Error::EmptyTable.into());
    }

    let mut out = io::stdout().lock();
    report::write_report(&mut out, &properties).context("writing report")?;
    out.flush().context("writing report")?;
    Ok(())
}

/// Prints the diagnostic for `err` and returns the exit code.
fn report_failure(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(Error::NotFound(path)) => {
            eprintln!("Файл \"{}\" не найден или не является файлом.", path.display());
        }
        Some(Error::EmptyTable) => {
            eprintln!("Таблица Property не найдена или не содержит записей.");
        }
        Some(e) => {
            eprintln!(
                "Ошибка при чтении файла MSI: таблица Property недоступна или файл поврежден."
            );
            eprintln!("Подробнее: {e}");
        }
        None => eprintln!("Непредвиденная ошибка: {err:#}"),
    }
    err.downcast_ref::<Error>()
        .map(Error::exit_code)
        .unwrap_or(UNEXPECTED)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(?cli, "starting");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "run failed");
            ExitCode::from(report_failure(&err))
        }
    }
}
