mod cli;
mod commands;
mod domain;
mod logging;
mod persistence;
mod report;
mod store;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::Session;
use persistence::{ensure_data_dir, init_local_data_dir, log_dir};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        // Initialize local .habitual directory
        let data_dir = init_local_data_dir()?;
        println!("Initialized habitual directory: {}", data_dir.display());
        println!();
        println!("habitual will now use this local directory for tasks and habits.");
        return Ok(());
    }

    let data_dir = ensure_data_dir(cli.data_dir.as_deref())?;
    logging::init_logging(&cli.log_level, &log_dir(&data_dir))?;

    let mut session = Session::open(Some(&data_dir))?;
    let stdout = io::stdout();
    let result = commands::execute(&mut session, cli.command, &mut stdout.lock());

    // Queued writes land even when the command failed part way
    session.close();
    result
}
