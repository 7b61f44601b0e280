use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use version_range::config::{DEFAULT_LOG_LEVEL, Manifest, data_dir, log_path};
use version_range::range::RangeSet;
use version_range::share::DEFAULT_SCOPE;

#[derive(Parser)]
#[command(name = "version-range")]
#[command(version, about = "Semantic version range matching for shared modules")]
struct Cli {
    /// Log filter, e.g. `debug` or `version_range=trace`
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Write logs to the data directory instead of stderr
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether VERSION satisfies RANGE (exit code 1 when it does not)
    Satisfies { version: String, range: String },

    /// Print RANGE desugared into plain comparators
    Expand { range: String },

    /// Resolve a shared module from a JSON manifest
    Resolve {
        /// Module name
        name: String,

        #[arg(long)]
        manifest: PathBuf,

        #[arg(long, default_value = DEFAULT_SCOPE)]
        scope: String,
    },
}

fn init_logging(level: &str, to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(level).with_context(|| format!("invalid log level {level}"))?;

    if !to_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    let dir = data_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory {}", dir.display()))?;
    let log_path = log_path();
    let file_name = log_path.file_name().context("log path has no file name")?;
    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_logging(&cli.log_level, cli.log_file)?;

    match cli.command {
        Command::Satisfies { version, range } => {
            let satisfied = version_range::satisfies(&version, &range);
            println!("{satisfied}");
            Ok(if satisfied {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Expand { range } => {
            let parsed = RangeSet::parse(&range)?;
            println!("{parsed}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Resolve {
            name,
            manifest,
            scope,
        } => {
            let manifest = Manifest::from_path(&manifest)?;
            let loader = manifest.build_loader()?;
            let module = loader
                .import_shared(&name, &scope)
                .with_context(|| format!("failed to resolve {name}"))?;
            println!("{module}");
            Ok(ExitCode::SUCCESS)
        }
    }
}
