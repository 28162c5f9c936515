use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer, Responder, ResponseError};
use host::{apply_move, new_session};
use maze_core::{Direction, GameConfig, GameSnapshot, GameState, MoveOutcome};
use serde::{Deserialize, Serialize};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// JSON body limit; requests are tiny
const JSON_LIMIT: usize = 64 * 1024;

/// Most sessions held in memory at once
const MAX_SESSIONS: usize = 1024;

/// Live sessions keyed by id. The mutex serializes every move.
struct AppState {
    games: Mutex<HashMap<u64, GameState>>,
    next_id: AtomicU64,
    max_sessions: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_capacity(MAX_SESSIONS)
    }
}

impl AppState {
    fn with_capacity(max_sessions: usize) -> Self {
        Self {
            games: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            max_sessions,
        }
    }
}

// Request/Response types

#[derive(Debug, Deserialize)]
struct MoveRequest {
    direction: String,
}

#[derive(Debug, Serialize)]
struct CreateGameResponse {
    success: bool,
    game_id: u64,
    game: GameSnapshot,
}

#[derive(Debug, Serialize)]
struct GameResponse {
    success: bool,
    game: GameSnapshot,
}

#[derive(Debug, Serialize)]
struct MoveResponse {
    success: bool,
    outcome: MoveOutcome,
    game: GameSnapshot,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

// Error type
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    NotFound(u64),
    TooManySessions(usize),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "{}", msg),
            ApiError::NotFound(id) => write!(f, "No game with id {}", id),
            ApiError::TooManySessions(max) => write!(
                f,
                "Too many active games (max {}). Finish or delete one first",
                max
            ),
            ApiError::Internal(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManySessions(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            error: self.to_string(),
        })
    }
}

fn lock_games(
    state: &AppState,
) -> Result<std::sync::MutexGuard<'_, HashMap<u64, GameState>>, ApiError> {
    state.games.lock().map_err(|e| {
        tracing::error!("Session store lock poisoned: {}", e);
        ApiError::Internal("session store unavailable".into())
    })
}

/// Make room for one more session. When the store is full the oldest
/// ended session is dropped; if every session is still in progress the
/// request is refused.
fn reserve_slot(games: &mut HashMap<u64, GameState>, max_sessions: usize) -> Result<(), ApiError> {
    if games.len() < max_sessions {
        return Ok(());
    }

    let oldest_ended = games
        .iter()
        .filter(|(_, game)| !game.is_in_progress())
        .map(|(&id, _)| id)
        .min();

    match oldest_ended {
        Some(id) => {
            games.remove(&id);
            tracing::info!("Evicted ended game {} to make room", id);
            Ok(())
        }
        None => {
            tracing::warn!("Session store full ({} games in progress)", games.len());
            Err(ApiError::TooManySessions(max_sessions))
        }
    }
}

// API Handlers

/// POST /api/games
/// Start a new session; every config field is optional
async fn create_game(
    state: web::Data<AppState>,
    req: web::Json<GameConfig>,
) -> Result<HttpResponse, ApiError> {
    tracing::info!(
        "Received create-game request: {}x{}, seed {:?}",
        req.width,
        req.height,
        req.seed
    );

    let game = new_session(&req).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let snapshot = game.snapshot();

    let mut games = lock_games(&state)?;
    reserve_slot(&mut games, state.max_sessions)?;
    let game_id = state.next_id.fetch_add(1, Ordering::Relaxed) + 1;
    games.insert(game_id, game);
    drop(games);

    tracing::info!("Created game {}", game_id);
    Ok(HttpResponse::Created().json(CreateGameResponse {
        success: true,
        game_id,
        game: snapshot,
    }))
}

/// GET /api/games/{id}
async fn get_game(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let game_id = path.into_inner();
    let games = lock_games(&state)?;
    let game = games.get(&game_id).ok_or(ApiError::NotFound(game_id))?;

    Ok(HttpResponse::Ok().json(GameResponse {
        success: true,
        game: game.snapshot(),
    }))
}

/// POST /api/games/{id}/move
/// Apply one move. Blocked or off-grid moves still answer 200; the
/// outcome says what happened
async fn move_game(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    req: web::Json<MoveRequest>,
) -> Result<HttpResponse, ApiError> {
    let game_id = path.into_inner();
    let direction: Direction = req
        .direction
        .parse()
        .map_err(|e: maze_core::MazeError| ApiError::BadRequest(e.to_string()))?;

    let mut games = lock_games(&state)?;
    let game = games.get_mut(&game_id).ok_or(ApiError::NotFound(game_id))?;

    let outcome = apply_move(game, direction);

    Ok(HttpResponse::Ok().json(MoveResponse {
        success: true,
        outcome,
        game: game.snapshot(),
    }))
}

/// DELETE /api/games/{id}
async fn delete_game(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let game_id = path.into_inner();
    lock_games(&state)?
        .remove(&game_id)
        .ok_or(ApiError::NotFound(game_id))?;

    tracing::info!("Deleted game {}", game_id);
    Ok(HttpResponse::NoContent().finish())
}

/// GET /health
/// Health check endpoint
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "maze-api"
    }))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT).error_handler(|err, _req| {
        let message = err.to_string();
        ApiError::BadRequest(message).into()
    }))
    .route("/health", web::get().to(health))
    .route("/api/games", web::post().to(create_game))
    .route("/api/games/{id}", web::get().to(get_game))
    .route("/api/games/{id}", web::delete().to(delete_game))
    .route("/api/games/{id}/move", web::post().to(move_game));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Maze API Server");

    let bind_address =
        std::env::var("MAZE_API_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    tracing::info!("Binding to {}", bind_address);

    let state = web::Data::new(AppState::default());

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind(bind_address)?
    .run()
    .await
}
