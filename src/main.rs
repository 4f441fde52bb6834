use anyhow::Result;

use league_closure::cli::Command;
use league_closure::{
    handle_add, handle_approve, handle_completions, handle_deactivate, handle_history,
    handle_import, handle_init, handle_move, handle_preview, handle_recalculate, handle_remove,
    handle_show, handle_standings, interpret,
};

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
        Command::Init => handle_init(),
        Command::Import { file } => handle_import(file),
        Command::Recalculate { group } => handle_recalculate(*group),
        Command::Standings { group } => handle_standings(*group),
        Command::Preview { season } => handle_preview(*season),
        Command::Show { season, json } => handle_show(*season, *json),
        Command::Move {
            season,
            player,
            movement,
            to_group,
        } => handle_move(*season, *player, *movement, *to_group),
        Command::Add {
            season,
            player,
            from_group,
            to_group,
        } => handle_add(*season, *player, *from_group, *to_group),
        Command::Deactivate { season, player } => handle_deactivate(*season, *player),
        Command::Remove { season, player } => handle_remove(*season, *player),
        Command::Approve { season } => handle_approve(*season),
        Command::History { player } => handle_history(*player),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
