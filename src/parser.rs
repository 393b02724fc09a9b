use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{LineupError, Result};
use crate::lineup::{Player, Rating, Roster};

/// One row of the players sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Blank when the sheet leaves the team cell empty
    pub team: Option<String>,
    pub player: Player,
}

/// Loads the players sheet from a CSV file with `team`, `player_name` and
/// `player_rating` columns
pub fn load_players<P: AsRef<Path>>(csv_path: P) -> Result<Vec<PlayerRecord>> {
    let path = csv_path.as_ref();
    let file = std::fs::File::open(path)?;
    let records = read_players(file)?;
    info!("Loaded {} player(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Reads player rows from any CSV source.
///
/// Columns are located by header name, case-insensitively, falling back to
/// positions 0/1/2. Rows without a player name are skipped. A rating that
/// is not a half-point value fails the whole load.
pub fn read_players<R: Read>(source: R) -> Result<Vec<PlayerRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let find = |name: &str, fallback: usize| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .unwrap_or(fallback)
    };
    let team_col = find("team", 0);
    let name_col = find("player_name", 1);
    let rating_col = find("player_rating", 2);

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;

        let name = record.get(name_col).unwrap_or("").to_string();
        if name.is_empty() {
            warn!("Skipping row {}: no player name", row + 2);
            continue;
        }

        let rating: Rating = record.get(rating_col).unwrap_or("").parse()?;
        let team = record
            .get(team_col)
            .map(str::to_string)
            .filter(|t| !t.is_empty());

        records.push(PlayerRecord {
            team,
            player: Player::new(name, rating),
        });
    }

    Ok(records)
}

/// Distinct non-blank team names in order of first appearance
pub fn team_names(records: &[PlayerRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.team.as_deref())
        .filter(|team| seen.insert(*team))
        .map(str::to_string)
        .collect()
}

/// Picks `preferred` when the sheet has it, otherwise the first team
pub fn default_team<'a>(teams: &'a [String], preferred: &str) -> Option<&'a String> {
    teams
        .iter()
        .find(|t| t.as_str() == preferred)
        .or_else(|| teams.first())
}

/// Builds the roster for one team, keeping sheet order
pub fn roster_for_team(records: &[PlayerRecord], team: &str) -> Result<Roster> {
    let players: Vec<Player> = records
        .iter()
        .filter(|r| r.team.as_deref() == Some(team))
        .map(|r| r.player.clone())
        .collect();

    if players.is_empty() {
        return Err(LineupError::UnknownTeam(team.to_string()));
    }
    Roster::new(players)
}
