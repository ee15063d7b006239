//! CLI entry point - the composition root.
//!
//! Loads `.env`, installs logging, bootstraps the cache and dispatches to a
//! handler. Errors carrying a [`CliError`] exit with its code.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use voxcache_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig::from_env(&cli.voice)?;
    let ctx = bootstrap(config).await?;

    match command {
        Commands::Key { text } => handlers::key::execute(&ctx, &text)?,
        Commands::Speak {
            text,
            output,
            chunk_size,
            repeat,
        } => handlers::speak::execute(&ctx, &text, &output, chunk_size, repeat).await?,
        Commands::Check { text } => handlers::check::execute(&ctx, &text).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}
