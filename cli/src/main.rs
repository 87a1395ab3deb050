mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;

use cli::{Cli, Commands};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_from(wild::args_os());

    let defaults = match &cli.defaults {
        Some(path) => Some(util::load_defaults(path)?),
        None => None,
    };

    match cli.command {
        Commands::Info(args) => commands::info(args, defaults.as_ref())?,
        Commands::Convert(args) => commands::convert(args, defaults.as_ref())?,
        Commands::Validate(args) => commands::validate(args, defaults.as_ref())?,
    };

    Ok(())
}
