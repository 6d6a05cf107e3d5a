use anyhow::Result;

use startgg_power_rankings::cli::Command;
use startgg_power_rankings::{handle_compare, handle_rank, handle_roster, handle_serve, interpret};

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
        Command::Serve { port } => handle_serve(*port),
        Command::Compare {
            player1,
            player2,
            window,
        } => handle_compare(player1, player2, *window),
        Command::Rank { window } => handle_rank(*window),
        Command::Roster { command } => handle_roster(command),
    }
}
