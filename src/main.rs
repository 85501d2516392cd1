use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod assets;
mod cli;
mod config;
mod content;
mod emit;
mod error;
mod loader;
mod package;

use cli::Cli;
use config::Config;
use emit::GoFile;
use error::{exit_status_for, ExitStatus};

fn init_tracing(debug: bool) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    if debug {
        filter = filter.add_directive(tracing::Level::DEBUG.into());
    }

    // Only fails if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli(cli)?;
    debug!(?config, "configuration");

    let package = package::resolve_package(&config)?;
    let bytes = loader::load_input(&config.input)?;
    let content = content::parse(bytes, config.mode)
        .with_context(|| format!("could not embed {}", config.input.display()))?;

    let file = GoFile::new(&config, package, &content);
    file.write_to_path(&config.output)?;

    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        mode = %config.mode,
        declarations = file.declarations.len(),
        "generated"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(cli::normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version come through here too
            let status = if err.use_stderr() {
                ExitStatus::Argument
            } else {
                ExitStatus::Success
            };
            let _ = err.print();
            return status.into();
        }
    };

    init_tracing(cli.debug);

    match run(cli) {
        Ok(()) => ExitStatus::Success.into(),
        Err(err) => {
            eprintln!("go-include: {err:#}");
            let status = exit_status_for(&err);
            if status == ExitStatus::Usage {
                eprintln!("{}", Cli::command().render_usage());
            }
            status.into()
        }
    }
}
