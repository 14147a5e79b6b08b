use anyhow::Result;

use sportfish_tracker::cli::Command;
use sportfish_tracker::{handle_demo, handle_refresh, handle_serve, interpret};

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
        Command::Serve {
            port,
            tournament,
            demo,
        } => handle_serve(*port, tournament, *demo),
        Command::Refresh { tournament } => handle_refresh(tournament),
        Command::Demo { tournament } => handle_demo(tournament),
    }
}
