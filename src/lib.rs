pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod feed;
pub mod hooks;
pub mod http;
pub mod identity;
pub mod images;
pub mod leaderboard;
pub mod pagination;
pub mod registry;
pub mod roster;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::{AppConfig, DataSource};
use crate::services::engine::TournamentEngine;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16, tournament: &str, demo: bool) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let source = if demo { DataSource::Demo } else { DataSource::Live };
        let config = AppConfig::new(source);
        let service = ServerService::new(port, tournament.to_string(), config);
        service.run().await
    })
}

pub fn handle_refresh(tournament: &str) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let engine = TournamentEngine::new(AppConfig::new(DataSource::Live))?;
        let counts = engine.refresh_all(tournament).await?;
        log::info!(
            "Refreshed {}: {} participants, {} events, {} leaderboard rows",
            tournament,
            counts.participants,
            counts.events,
            counts.leaderboard
        );
        Ok(())
    })
}

pub fn handle_demo(tournament: &str) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let engine = TournamentEngine::new(AppConfig::new(DataSource::Demo))?;
        let events = engine.build_demo_dataset(tournament).await?;
        log::info!("Built demo dataset with {} events for {}", events.len(), tournament);
        Ok(())
    })
}
