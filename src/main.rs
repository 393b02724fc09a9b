use actix_web::cookie::Key;
use log::{info, warn};

use tennis_lineup::config::{CommandLine, Commands, RosterArgs};
use tennis_lineup::display::{print_candidates, print_lineup, write_lineup_to_file};
use tennis_lineup::lineup::{
    enumerate_lineups, generate_candidates, is_capped, CandidateSet, Roster,
};
use tennis_lineup::parser::{default_team, load_players, roster_for_team, team_names};
use tennis_lineup::web;

/// Loads the sheet and resolves which team's roster to use
fn load_roster(args: &RosterArgs) -> Result<(String, Roster), Box<dyn std::error::Error>> {
    let records = load_players(&args.roster)?;
    let team = match &args.team {
        Some(team) => team.clone(),
        None => {
            let teams = team_names(&records);
            default_team(&teams, &args.default_team)
                .cloned()
                .ok_or("roster sheet has no teams")?
        }
    };
    let roster = roster_for_team(&records, &team)?;
    info!("Using team {} ({} players)", team, roster.len());
    Ok((team, roster))
}

fn session_key(configured: Option<&str>) -> Key {
    match configured {
        Some(secret) if secret.len() >= 64 => Key::from(secret.as_bytes()),
        Some(_) => {
            warn!("SESSION_KEY must be at least 64 bytes; using a random key");
            Key::generate()
        }
        None => Key::generate(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = CommandLine::parse_args();

    match cli.command {
        Commands::Teams { roster } => {
            let records = load_players(&roster.roster)?;
            for team in team_names(&records) {
                println!("{}", team);
            }
        }
        Commands::Candidates { roster } => {
            let (team, roster) = load_roster(&roster)?;
            let candidates = generate_candidates(&roster);
            print_candidates(&team, &candidates);
            report_empty_slots(&candidates);
        }
        Commands::Solve { roster, max, out } => {
            let (team, roster) = load_roster(&roster)?;
            let candidates = generate_candidates(&roster);
            report_empty_slots(&candidates);

            println!("\n=== Searching for valid lineups ===");
            let lineups = enumerate_lineups(&candidates, max);
            if is_capped(lineups.len(), max) {
                println!(
                    "Found {} lineups (stopped at the limit, there may be more)",
                    lineups.len()
                );
            } else {
                println!("Found {} lineup(s)", lineups.len());
            }

            if let Some(first) = lineups.first() {
                print_lineup(&team, first.assignment());
                if let Some(path) = out {
                    write_lineup_to_file(&team, first.assignment(), &path)?;
                    println!("Lineup saved to {}", path.display());
                }
            }
        }
        Commands::Web {
            roster,
            port,
            session_key: key,
        } => {
            let records = load_players(&roster.roster)?;
            let state = web::AppState::new(records, &roster.default_team);

            println!("Starting web server on port {}...", port);
            println!("Access the site at http://localhost:{}", port);

            web::start_server(port, state, session_key(key.as_deref())).await?;
        }
    }

    Ok(())
}

fn report_empty_slots(candidates: &CandidateSet) {
    let empty = candidates.empty_slots();
    if !empty.is_empty() {
        let labels: Vec<&str> = empty.iter().map(|s| s.label()).collect();
        println!("⚠️  No eligible options for: {}", labels.join(", "));
    }
}
