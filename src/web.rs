use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::http::{header, StatusCode};
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::LineupError;
use crate::export::export_lineup_csv;
use crate::lineup::{
    enumerate_lineups, generate_candidates, is_capped, Assignment, Candidate, CandidateSet, Lineup,
    Slot, DEFAULT_MAX_RESULTS,
};
use crate::parser::{default_team, roster_for_team, team_names, PlayerRecord};

const TEAM_KEY: &str = "team";
const LINEUP_KEY: &str = "lineup";

/// Upper bound on `/api/solve?max=` so one request cannot run unbounded
const MAX_WEB_RESULTS: usize = 1000;

/// Players sheet shared read-only by every session
pub struct AppState {
    pub records: Vec<PlayerRecord>,
    pub teams: Vec<String>,
    pub default_team: Option<String>,
}

impl AppState {
    pub fn new(records: Vec<PlayerRecord>, preferred_team: &str) -> Self {
        let teams = team_names(&records);
        let default_team = default_team(&teams, preferred_team).cloned();
        AppState {
            records,
            teams,
            default_team,
        }
    }

    fn candidates_for(&self, team: &str) -> Result<CandidateSet, LineupError> {
        let roster = roster_for_team(&self.records, team)?;
        Ok(generate_candidates(&roster))
    }
}

impl ResponseError for LineupError {
    fn status_code(&self) -> StatusCode {
        match self {
            LineupError::PlayerInUse { .. } => StatusCode::CONFLICT,
            LineupError::SlotKindMismatch { .. }
            | LineupError::UnknownSlot(_)
            | LineupError::UnknownCandidate { .. }
            | LineupError::MalformedCandidate(_)
            | LineupError::UnknownTeam(_)
            | LineupError::IncompleteLineup { .. } => StatusCode::BAD_REQUEST,
            LineupError::InvalidRating(_)
            | LineupError::DuplicatePlayer(_)
            | LineupError::Csv(_)
            | LineupError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({"success": false, "error": self.to_string()}))
    }
}

#[derive(Deserialize)]
pub struct TeamRequest {
    team: String,
}

#[derive(Deserialize)]
pub struct SelectRequest {
    slot: String,
    players: Vec<String>,
}

#[derive(Deserialize)]
pub struct SolveQuery {
    max: Option<usize>,
}

#[derive(Serialize)]
pub struct TeamsResponse {
    teams: Vec<String>,
    default_team: Option<String>,
    selected_team: Option<String>,
}

#[derive(Serialize)]
pub struct RoundView {
    slot: Slot,
    description: &'static str,
    selected: Option<Candidate>,
    options: Vec<Candidate>,
}

#[derive(Serialize)]
pub struct LineupResponse {
    team: String,
    rounds: Vec<RoundView>,
    assigned: usize,
    total: usize,
    progress: f64,
    complete: bool,
}

#[derive(Serialize)]
pub struct SolveResponse {
    team: String,
    count: usize,
    /// True when the cap was hit and more lineups may exist
    capped: bool,
    lineups: Vec<Lineup>,
}

fn session_team(session: &Session, state: &AppState) -> Result<String> {
    let stored: Option<String> = session.get(TEAM_KEY)?;
    stored
        .filter(|team| state.teams.contains(team))
        .or_else(|| state.default_team.clone())
        .ok_or_else(|| LineupError::UnknownTeam("(no teams loaded)".to_string()).into())
}

fn session_assignment(session: &Session) -> Result<Assignment> {
    Ok(session.get::<Assignment>(LINEUP_KEY)?.unwrap_or_default())
}

fn lineup_view(team: String, candidates: &CandidateSet, assignment: &Assignment) -> LineupResponse {
    let rounds = Slot::ALL
        .iter()
        .map(|&slot| RoundView {
            slot,
            description: slot.description(),
            selected: assignment.get(slot).cloned(),
            options: candidates
                .available(slot, assignment)
                .into_iter()
                .cloned()
                .collect(),
        })
        .collect();

    LineupResponse {
        team,
        rounds,
        assigned: assignment.assigned_count(),
        total: Slot::COUNT,
        progress: assignment.progress(),
        complete: assignment.is_complete(),
    }
}

async fn get_teams(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(TeamsResponse {
        teams: state.teams.clone(),
        default_team: state.default_team.clone(),
        selected_team: session_team(&session, &state).ok(),
    }))
}

// Switching teams starts a fresh lineup
async fn select_team(
    req: web::Json<TeamRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !state.teams.contains(&req.team) {
        return Err(LineupError::UnknownTeam(req.team.clone()).into());
    }
    session.insert(TEAM_KEY, &req.team)?;
    session.insert(LINEUP_KEY, Assignment::new())?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "team": req.team})))
}

async fn get_lineup(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let team = session_team(&session, &state)?;
    let candidates = state.candidates_for(&team)?;
    let assignment = session_assignment(&session)?;
    Ok(HttpResponse::Ok().json(lineup_view(team, &candidates, &assignment)))
}

async fn select(
    req: web::Json<SelectRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let slot: Slot = req.slot.parse()?;
    let team = session_team(&session, &state)?;
    let candidates = state.candidates_for(&team)?;
    let candidate = candidates.resolve(slot, &req.players)?;

    let mut assignment = session_assignment(&session)?;
    let action = assignment.toggle(slot, candidate).map_err(|e| {
        debug!("Rejected {:?} for {}: {}", req.players, slot, e);
        e
    })?;
    session.insert(LINEUP_KEY, &assignment)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "action": action})))
}

async fn clear_slot(slot: web::Path<String>, session: Session) -> Result<HttpResponse> {
    let slot: Slot = slot.parse()?;
    let mut assignment = session_assignment(&session)?;
    assignment.unassign(slot);
    session.insert(LINEUP_KEY, &assignment)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

async fn reset(session: Session) -> Result<HttpResponse> {
    session.insert(LINEUP_KEY, Assignment::new())?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

// CSV download, only offered once every slot is filled
async fn export_csv(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let team = session_team(&session, &state)?;
    let candidates = state.candidates_for(&team)?;
    let lineup = Lineup::validate(session_assignment(&session)?, &candidates)?;
    let mut body = Vec::new();
    export_lineup_csv(lineup.assignment(), &mut body)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"selected_lineup.csv\"",
        ))
        .body(body))
}

async fn solve(
    query: web::Query<SolveQuery>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let max = query.max.unwrap_or(DEFAULT_MAX_RESULTS).min(MAX_WEB_RESULTS);
    let team = session_team(&session, &state)?;
    let candidates = state.candidates_for(&team)?;
    let lineups = enumerate_lineups(&candidates, max);

    Ok(HttpResponse::Ok().json(SolveResponse {
        team,
        count: lineups.len(),
        capped: is_capped(lineups.len(), max),
        lineups,
    }))
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/teams", web::get().to(get_teams))
        .route("/api/team", web::post().to(select_team))
        .route("/api/lineup", web::get().to(get_lineup))
        .route("/api/select", web::post().to(select))
        .route("/api/clear/{slot}", web::post().to(clear_slot))
        .route("/api/reset", web::post().to(reset))
        .route("/api/export.csv", web::get().to(export_csv))
        .route("/api/solve", web::get().to(solve));
}

pub async fn start_server(port: u16, state: AppState, session_key: Key) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                session_key.clone(),
            ))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
