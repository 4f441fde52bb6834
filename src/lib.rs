pub mod cli;
pub mod closure;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod report;
pub mod services;
pub mod standings;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::{Command, MovementArg};
use crate::closure::{EntryUpdate, SeasonClosure};
use crate::config::settings::AppConfig;
use crate::database::{DbPool, groups, history, players};
use crate::report::Labels;
use crate::services::{ClosureService, ImportService, RankingService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_pool(config: &AppConfig) -> Result<DbPool> {
    database::create_pool(&config.database.path)
}

pub fn handle_init() -> Result<()> {
    let config = AppConfig::new();
    let pool = open_pool(&config)?;
    let conn = database::get_connection(&pool)?;
    database::setup::reset_database(&conn)?;
    println!("Initialised {}", config.database.path);
    Ok(())
}

pub fn handle_import(file: &Path) -> Result<()> {
    let config = AppConfig::new();
    let service = ImportService::new(open_pool(&config)?);
    let summary = service.import_file(file)?;
    println!("{}", report::import_summary(&summary));
    Ok(())
}

pub fn handle_recalculate(group_id: i32) -> Result<()> {
    let config = AppConfig::new();
    let service = RankingService::new(open_pool(&config)?);
    let ranking = service.recalculate_group(group_id)?;
    println!("Group {}: {} players ranked", group_id, ranking.len());
    Ok(())
}

pub fn handle_standings(group_id: i32) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_pool(&config)?;
    let table = RankingService::new(pool.clone()).group_table(group_id)?;

    let conn = database::get_connection(&pool)?;
    let group = groups::find_by_id(&conn, group_id)?
        .with_context(|| format!("Group {} not found", group_id))?;
    print!("{}", report::standings_table(&group, &table));
    Ok(())
}

fn print_closure(pool: &DbPool, closure: &SeasonClosure) -> Result<()> {
    let conn = database::get_connection(pool)?;
    let labels = Labels::load(&conn, closure.entries())?;
    print!("{}", report::closure_report(closure, &labels));
    Ok(())
}

pub fn handle_preview(season_id: i32) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_pool(&config)?;
    let closure = ClosureService::new(pool.clone(), config).preview(season_id)?;
    print_closure(&pool, &closure)
}

pub fn handle_show(season_id: i32, json: bool) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_pool(&config)?;
    let closure = ClosureService::new(pool.clone(), config)
        .get(season_id)?
        .with_context(|| format!("No closure exists for season {}", season_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&closure)?);
        return Ok(());
    }
    print_closure(&pool, &closure)
}

pub fn handle_move(
    season_id: i32,
    player_id: i32,
    movement: MovementArg,
    to_group_id: Option<i32>,
) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_pool(&config)?;
    let update = EntryUpdate {
        movement_type: movement.into(),
        to_group_id,
    };
    let draft =
        ClosureService::new(pool.clone(), config).update_entry(season_id, player_id, update)?;
    print_closure(&pool, &SeasonClosure::Draft(draft))
}

pub fn handle_add(
    season_id: i32,
    player_id: i32,
    from_group_id: i32,
    to_group_id: i32,
) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_pool(&config)?;
    let draft = ClosureService::new(pool.clone(), config).add_player(
        season_id,
        player_id,
        from_group_id,
        to_group_id,
    )?;
    print_closure(&pool, &SeasonClosure::Draft(draft))
}

pub fn handle_deactivate(season_id: i32, player_id: i32) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_pool(&config)?;
    let draft =
        ClosureService::new(pool.clone(), config).deactivate_player(season_id, player_id)?;
    print_closure(&pool, &SeasonClosure::Draft(draft))
}

pub fn handle_remove(season_id: i32, player_id: i32) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_pool(&config)?;
    let draft = ClosureService::new(pool.clone(), config).remove_player(season_id, player_id)?;
    print_closure(&pool, &SeasonClosure::Draft(draft))
}

pub fn handle_approve(season_id: i32) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_pool(&config)?;
    let approved = ClosureService::new(pool.clone(), config).approve(season_id)?;
    print_closure(&pool, &SeasonClosure::Approved(approved))
}

pub fn handle_history(player_id: i32) -> Result<()> {
    let config = AppConfig::new();
    let pool = open_pool(&config)?;
    let conn = database::get_connection(&pool)?;

    let player = players::find_by_id(&conn, player_id)?
        .with_context(|| format!("Player {} not found", player_id))?;
    let rows = history::list_by_player(&conn, player_id)?;
    print!("{}", report::history_report(&player.name, &rows));
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}
