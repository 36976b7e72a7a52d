use anyhow::Result;

use ladder_league::cli::Command;
use ladder_league::{handle_generate, handle_regenerate, handle_serve, handle_setup, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Setup => handle_setup(),
        Command::Serve { port } => handle_serve(*port),
        Command::Generate {
            cycle,
            start_date,
            duration_days,
        } => handle_generate(*cycle, start_date, *duration_days),
        Command::Regenerate { cycle } => handle_regenerate(*cycle),
    }
}
