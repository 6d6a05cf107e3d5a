pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod fetchers;
pub mod http;
pub mod identity;
pub mod rate_limiter;
pub mod reconcile;
pub mod roster;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::{Command, RosterCommand};
use crate::config::settings::AppConfig;
use crate::domain::models::RecencyWindow;
use crate::services::compare::CompareService;
use crate::services::rankings::RankingsService;
use crate::services::roster_admin::RosterService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_compare(player1: &str, player2: &str, window: RecencyWindow) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = CompareService::new(AppConfig::new())?;
        service.run(player1, player2, window).await
    })
}

pub fn handle_rank(window: RecencyWindow) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = RankingsService::new(AppConfig::new())?;
        service.run(window).await
    })
}

pub fn handle_roster(command: &RosterCommand) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = RosterService::new(AppConfig::new())?;
        match command {
            RosterCommand::Show => service.show(),
            RosterCommand::Add { query } => service.add(query).await,
            RosterCommand::Remove { id } => service.remove(id),
            RosterCommand::Clear => service.clear(),
            RosterCommand::Demo => service.demo().await,
        }
    })
}
