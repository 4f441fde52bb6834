use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::closure::MovementType;

#[derive(Parser, Debug)]
#[command(author, version, about = "league standings and season closure")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create an empty database (drops existing tables)
    Init,
    /// Load seasons, groups, players and matches from a JSON snapshot
    Import {
        /// Snapshot file
        file: PathBuf,
    },
    /// Recompute and store a group's ranking positions
    Recalculate {
        #[arg(short, long)]
        group: i32,
    },
    /// Print a group's standings table
    Standings {
        #[arg(short, long)]
        group: i32,
    },
    /// Compute (or recompute) the draft closure of a season
    Preview {
        #[arg(short, long)]
        season: i32,
    },
    /// Print a season's closure
    Show {
        #[arg(short, long)]
        season: i32,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Override a player's movement in the draft closure
    Move {
        #[arg(short, long)]
        season: i32,
        #[arg(short, long)]
        player: i32,
        #[arg(short, long, value_enum)]
        movement: MovementArg,
        /// Destination group (defaults to staying in the current one)
        #[arg(short, long)]
        to_group: Option<i32>,
    },
    /// Add an unranked player to the draft closure
    Add {
        #[arg(short, long)]
        season: i32,
        #[arg(short, long)]
        player: i32,
        #[arg(short, long)]
        from_group: i32,
        #[arg(short, long)]
        to_group: i32,
    },
    /// Mark a player as not continuing next season
    Deactivate {
        #[arg(short, long)]
        season: i32,
        #[arg(short, long)]
        player: i32,
    },
    /// Drop a player's entry from the draft closure
    Remove {
        #[arg(short, long)]
        season: i32,
        #[arg(short, long)]
        player: i32,
    },
    /// Apply the draft closure and lock it
    Approve {
        #[arg(short, long)]
        season: i32,
    },
    /// Print a player's movement history
    History {
        #[arg(short, long)]
        player: i32,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementArg {
    Promotion,
    Relegation,
    Stay,
}

impl From<MovementArg> for MovementType {
    fn from(arg: MovementArg) -> Self {
        match arg {
            MovementArg::Promotion => MovementType::Promotion,
            MovementArg::Relegation => MovementType::Relegation,
            MovementArg::Stay => MovementType::Stay,
        }
    }
}
