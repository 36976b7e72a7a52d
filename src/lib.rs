pub mod api;
pub mod availability;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod scheduling;
pub mod services;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

use crate::cli::Command;
use crate::config::settings::{self, AppConfig};
use crate::scheduling::locks::CycleLocks;
use crate::services::generation::{parse_start_date, GenerationService};
use crate::services::server::ServerService;

const CLI_ACTOR: &str = "cli";

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_setup() -> Result<()> {
    let pool = database::create_pool(&settings::database_path())?;
    let conn = database::get_connection(&pool)?;
    database::setup::init_database(&conn)
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_generate(cycle: i64, start_date: &str, duration_days: Option<i64>) -> Result<()> {
    let config = AppConfig::new();
    let start = parse_start_date(start_date)?;
    let duration = duration_days.unwrap_or(config.scheduling.default_tour_duration_days);

    let service = build_generation_service()?;
    let report = service.generate(cycle, start, duration, CLI_ACTOR)?;
    info!("Generated {} tours for cycle {}", report.tours_created, cycle);
    Ok(())
}

pub fn handle_regenerate(cycle: i64) -> Result<()> {
    let service = build_generation_service()?;
    let report = service.regenerate(cycle, CLI_ACTOR)?;
    info!(
        "Regenerated {} tours for cycle {}, preserved {} availability declarations ({} dropped)",
        report.tours_created,
        cycle,
        report.availability_preserved,
        report.drops.len()
    );
    Ok(())
}

fn build_generation_service() -> Result<GenerationService> {
    let pool = database::create_pool(&settings::database_path())?;
    Ok(GenerationService::new(pool, Arc::new(CycleLocks::new())))
}
