use clap::{Parser, Subcommand};

use crate::domain::models::RecencyWindow;

#[derive(Parser, Debug)]
#[command(author, version, about = "start.gg power-rankings backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Compare two players head-to-head
    Compare {
        /// First player (user slug or gamer tag)
        player1: String,
        /// Second player (user slug or gamer tag)
        player2: String,
        /// Recency window: short, medium, long or all
        #[arg(short, long, default_value = "medium")]
        window: RecencyWindow,
    },
    /// Compute power rankings for the saved roster
    Rank {
        /// Recency window: short, medium, long or all
        #[arg(short, long, default_value = "medium")]
        window: RecencyWindow,
    },
    /// Manage the saved roster
    Roster {
        #[clap(subcommand)]
        command: RosterCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum RosterCommand {
    /// List roster players
    Show,
    /// Search for a player and add the best match
    Add { query: String },
    /// Remove a player by id
    Remove { id: String },
    /// Remove every player
    Clear,
    /// Seed the roster with the example players
    Demo,
}
