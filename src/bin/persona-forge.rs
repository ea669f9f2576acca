//! Persona Forge CLI Binary

use anyhow::Context;
use clap::Parser;
use persona_forge::config::ConfigLoader;
use persona_forge::logging::init_logging;
use persona_forge::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let mut config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load config")?;
    cli.apply_logging_overrides(&mut config)?;
    cli.apply_store_overrides(&mut config);

    init_logging(Some(&config.logging)).context("Failed to initialize logging")?;

    let context = CliContext::new(config).context("Failed to open persona store")?;
    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
