use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::lineup::DEFAULT_MAX_RESULTS;

#[derive(Parser, Debug)]
#[command(name = "lineup")]
#[command(about = "Build valid village league tennis lineups from a team roster.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the players sheet lives and which team to use
#[derive(Args, Debug, Clone)]
pub struct RosterArgs {
    /// CSV with team, player_name and player_rating columns
    #[arg(long, env = "LINEUP_ROSTER", default_value = "players_info.csv")]
    pub roster: PathBuf,

    /// Team to build a lineup for
    #[arg(long)]
    pub team: Option<String>,

    /// Team picked when --team is not given and the sheet has it
    #[arg(long, env = "LINEUP_DEFAULT_TEAM", default_value = "Wicklund")]
    pub default_team: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the teams found in the roster sheet
    #[command(alias = "t")]
    Teams {
        #[command(flatten)]
        roster: RosterArgs,
    },
    /// Show the eligible players and pairs for every slot
    #[command(alias = "c")]
    Candidates {
        #[command(flatten)]
        roster: RosterArgs,
    },
    /// Enumerate complete valid lineups
    #[command(alias = "s")]
    Solve {
        #[command(flatten)]
        roster: RosterArgs,

        /// Stop after this many lineups
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max: usize,

        /// Write the first lineup found to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the interactive lineup picker in the browser
    #[command(alias = "w")]
    Web {
        #[command(flatten)]
        roster: RosterArgs,

        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Cookie signing key, at least 64 bytes; random per run when unset
        #[arg(long, env = "SESSION_KEY", hide_env_values = true)]
        session_key: Option<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
