use actix_files::Files;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use chrono::Local;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{coerce_count, coerce_seed, TournamentConfig, MAX_PLAYERS};
use crate::export::schedule_to_csv;
use crate::parser::resolve_players;
use crate::schedule::{plan_tournament, player_assignments, Assignment, Player, TournamentPlan};

/// Session key holding the last schedule request of a visitor
const LAST_REQUEST_KEY: &str = "last_request";

/// Largest serialized request kept in the session cookie. Browsers drop
/// cookies over 4 KB and the encrypted value is about a third larger.
const SESSION_REQUEST_LIMIT: usize = 2048;

/// Largest accepted JSON body
const JSON_BODY_LIMIT: usize = 64 * 1024;

/// Shared server settings; schedules themselves are recomputed per request
pub struct AppState {
    pub defaults: TournamentConfig,
}

/// Body of a schedule request. Counts accept any JSON value and are coerced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub player_count: Option<Value>,
    #[serde(default)]
    pub groups: Option<Value>,
    #[serde(default)]
    pub boards: Option<Value>,
    #[serde(default)]
    pub rounds: Option<Value>,
    #[serde(default)]
    pub seed: Option<Value>,
}

impl ScheduleRequest {
    /// Player list and settings for this request, falling back to server
    /// defaults. Counts and the player list are capped at the `MAX_*` limits.
    pub fn resolve(&self, defaults: &TournamentConfig) -> (Vec<Player>, TournamentConfig) {
        let max_players = MAX_PLAYERS as usize;
        let count = match &self.player_count {
            Some(value) => (coerce_count(value) as usize).min(max_players),
            None => self.players.len().min(max_players),
        };
        let players = resolve_players(&self.players, Some(count));

        let pick = |value: &Option<Value>, fallback: u32| value.as_ref().map(coerce_count).unwrap_or(fallback);
        let config = TournamentConfig {
            group_count: pick(&self.groups, defaults.group_count),
            board_count: pick(&self.boards, defaults.board_count),
            round_count: pick(&self.rounds, defaults.round_count),
            shuffle_seed: self.seed.as_ref().and_then(coerce_seed).or(defaults.shuffle_seed),
        }
        .clamped();
        (players, config)
    }
}

#[derive(Serialize)]
pub struct PlayerRound {
    player: Player,
    #[serde(flatten)]
    assignment: Assignment,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    success: bool,
    plan: TournamentPlan,
    /// Per round, what every player does
    assignments: Vec<Vec<PlayerRound>>,
    /// Whether `GET /api/schedule/csv` can rebuild this schedule from the session
    session_export: bool,
}

impl ScheduleResponse {
    fn from_plan(plan: TournamentPlan, session_export: bool) -> Self {
        let assignments = player_assignments(&plan.players, &plan.schedule)
            .into_iter()
            .map(|round| {
                round
                    .into_iter()
                    .map(|(player, assignment)| PlayerRound { player, assignment })
                    .collect()
            })
            .collect();
        ScheduleResponse {
            success: true,
            plan,
            assignments,
            session_export,
        }
    }
}

/// Keeps the request in the session when it fits in a cookie and reports
/// whether it was kept
fn remember_request(session: &Session, request: &ScheduleRequest) -> Result<bool> {
    let size = serde_json::to_string(request)?.len();
    if size > SESSION_REQUEST_LIMIT {
        warn!("Schedule request of {} bytes is too large for the session cookie", size);
        session.remove(LAST_REQUEST_KEY);
        return Ok(false);
    }
    session.insert(LAST_REQUEST_KEY, request)?;
    Ok(true)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": format!("Invalid schedule request: {}", err)
    }));
    InternalError::from_response(err, response).into()
}

// Schedule generation endpoint
async fn create_schedule(
    req: web::Json<ScheduleRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let request = req.into_inner();
    let (players, config) = request.resolve(&state.defaults);
    let plan = plan_tournament(&players, &config);

    let session_export = remember_request(&session, &request)?;

    Ok(HttpResponse::Ok().json(ScheduleResponse::from_plan(plan, session_export)))
}

/// Rebuilds the schedule for `request` and renders it as a CSV download
fn csv_download(request: &ScheduleRequest, defaults: &TournamentConfig) -> HttpResponse {
    let (players, config) = request.resolve(defaults);
    let plan = plan_tournament(&players, &config);

    match schedule_to_csv(&plan.groups, &plan.schedule) {
        Ok(text) => {
            let filename = format!("schedule-{}.csv", Local::now().format("%Y%m%d-%H%M"));
            HttpResponse::Ok()
                .content_type("text/csv")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(text)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to export schedule: {}", e)
        })),
    }
}

// CSV export of the visitor's last schedule
async fn export_schedule_csv(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(request) = session.get::<ScheduleRequest>(LAST_REQUEST_KEY)? else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "No schedule generated yet"
        })));
    };
    Ok(csv_download(&request, &state.defaults))
}

// CSV export of the schedule described in the body
async fn export_posted_csv(req: web::Json<ScheduleRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(csv_download(&req, &state.defaults))
}

async fn get_defaults(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(&state.defaults))
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Page and API routes
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(json_error_handler),
    )
    .route("/", web::get().to(index))
    .route("/api/defaults", web::get().to(get_defaults))
    .route("/api/schedule", web::post().to(create_schedule))
    .route("/api/schedule/csv", web::get().to(export_schedule_csv))
    .route("/api/schedule/csv", web::post().to(export_posted_csv));
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

pub async fn start_server(port: u16, defaults: TournamentConfig) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState { defaults });
    let key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .wrap(session_middleware(key.clone()))
            .service(Files::new("/static", "static"))
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
