use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use maze_core::{Direction, GameConfig, GameState, MoveOutcome, Position};
use serde::{Deserialize, Serialize};

/// Largest moves file `load_moves` will read (1 MB)
const MAX_MOVES_FILE_BYTES: usize = 1_000_000;

/// Largest number of moves `load_moves` will accept
pub const MAX_MOVES: usize = 10_000;

/// Maze size given on the command line as `<width>x<height>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl std::str::FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid size: '{}'. Must look like '16x10'", s);
        let lower = s.to_lowercase();
        let (w, h) = lower.split_once('x').ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;
        Ok(Size { width, height })
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parse a start cell given as `<x>,<y>`
pub fn parse_position(s: &str) -> Result<Position, String> {
    let invalid = || format!("Invalid position: '{}'. Must look like '0,0'", s);
    let (x, y) = s.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok(Position::new(x, y))
}

/// Result of replaying a move list against a freshly generated maze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    /// The seed the maze was generated from (None = entropy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,

    pub width: usize,
    pub height: usize,

    /// Moves that changed the player's position
    pub accepted: usize,

    /// Moves that hit a wall, the grid edge, or came after the finish
    pub rejected: usize,

    /// Same as `accepted`; the session's own step counter
    pub steps: usize,

    pub final_position: Position,

    /// Whether the end cell was reached
    pub finished: bool,

    /// One outcome per input move, in order
    pub outcomes: Vec<MoveOutcome>,
}

/// Start a new game session.
///
/// Validates the configuration and generates the maze. Sessions with a
/// seed are reproducible; without one the maze comes from OS entropy.
///
/// # Example
/// ```no_run
/// use host::new_session;
/// use maze_core::{Direction, GameConfig};
///
/// let mut game = new_session(&GameConfig::new(16, 10).with_seed(2918957128)).unwrap();
/// let outcome = game.move_player(Direction::Right);
/// println!("{:?} after {} steps", outcome, game.step_count());
/// ```
pub fn new_session(config: &GameConfig) -> Result<GameState, Box<dyn std::error::Error>> {
    if let Err(e) = config.validate() {
        tracing::warn!("Rejected game configuration: {}", e);
        return Err(e.into());
    }

    let game = GameState::new(config)?;

    match config.seed {
        Some(seed) => tracing::info!(
            "New {}x{} maze from seed {} (start ({}, {}), end ({}, {}))",
            config.width,
            config.height,
            seed,
            game.start().x,
            game.start().y,
            game.end().x,
            game.end().y
        ),
        None => tracing::info!(
            "New {}x{} maze from entropy (start ({}, {}), end ({}, {}))",
            config.width,
            config.height,
            game.start().x,
            game.start().y,
            game.end().x,
            game.end().y
        ),
    }

    if !game.is_in_progress() {
        tracing::info!("Start is the end cell; session is already complete");
    }

    Ok(game)
}

/// Apply one move to a session and log what happened.
pub fn apply_move(game: &mut GameState, direction: Direction) -> MoveOutcome {
    let outcome = game.move_player(direction);
    tracing::debug!(
        "Move {} -> {:?} at ({}, {})",
        direction,
        outcome,
        game.position().x,
        game.position().y
    );

    if outcome == MoveOutcome::Finished {
        let elapsed = game.elapsed_time().unwrap_or_default();
        tracing::info!(
            "Maze completed in {} steps ({:.2}s)",
            game.step_count(),
            elapsed.as_secs_f64()
        );
    }
    outcome
}

/// Replay `moves` in order against a fresh session built from `config`.
///
/// Rejected moves are recorded and skipped, never fatal. Given a seed the
/// result depends only on the configuration and the moves.
pub fn replay(
    config: &GameConfig,
    moves: &[Direction],
) -> Result<ReplayReport, Box<dyn std::error::Error>> {
    let mut game = new_session(config)?;
    tracing::info!("Replaying {} moves", moves.len());

    let outcomes: Vec<MoveOutcome> = moves
        .iter()
        .map(|&direction| apply_move(&mut game, direction))
        .collect();

    let accepted = outcomes.iter().filter(|o| o.moved()).count();

    Ok(ReplayReport {
        seed: config.seed,
        width: config.width,
        height: config.height,
        accepted,
        rejected: outcomes.len() - accepted,
        steps: game.step_count(),
        final_position: game.position(),
        finished: !game.is_in_progress(),
        outcomes,
    })
}

/// Draw the session as text.
///
/// `@` is the player, `.` a cell on the path walked so far, `E` the end.
pub fn render_ascii(game: &GameState) -> String {
    let grid = game.grid();
    let mut out = String::new();

    for y in 0..grid.height() {
        // Top edge of the row
        for x in 0..grid.width() {
            let open = grid.cell(x, y).map_or(false, |c| !c.has_wall(Direction::Up));
            out.push_str(if open { "+   " } else { "+---" });
        }
        out.push_str("+\n");

        // Cell contents with left walls
        for x in 0..grid.width() {
            let open = grid.cell(x, y).map_or(false, |c| !c.has_wall(Direction::Left));
            out.push(if open { ' ' } else { '|' });

            let here = Position::new(x, y);
            let mark = if game.position() == here {
                '@'
            } else if grid.is_end(x, y) {
                'E'
            } else if game.path().contains(&here) {
                '.'
            } else {
                ' '
            };
            let _ = write!(out, " {} ", mark);
        }
        let last = grid.width() - 1;
        let open = grid.cell(last, y).map_or(false, |c| !c.has_wall(Direction::Right));
        out.push(if open { ' ' } else { '|' });
        out.push('\n');
    }

    // Bottom edge
    let bottom = grid.height() - 1;
    for x in 0..grid.width() {
        let open = grid.cell(x, bottom).map_or(false, |c| !c.has_wall(Direction::Down));
        out.push_str(if open { "+   " } else { "+---" });
    }
    out.push_str("+\n");

    out
}

/// Load a moves file: a JSON array of direction names
/// (`"up"`, `"down"`, `"left"`, `"right"` or `"u"`, `"d"`, `"l"`, `"r"`).
pub fn load_moves(path: impl AsRef<Path>) -> Result<Vec<Direction>, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;

    // Validate file size (prevent loading huge files into memory)
    if json.len() > MAX_MOVES_FILE_BYTES {
        return Err("Moves file is too large (max 1MB)".into());
    }

    parse_moves(&json)
}

/// Parse the JSON body of a moves file.
pub fn parse_moves(json: &str) -> Result<Vec<Direction>, Box<dyn std::error::Error>> {
    let raw: Vec<String> = serde_json::from_str(json)?;

    // Validate moves count
    if raw.is_empty() {
        return Err("Moves array is empty".into());
    }

    if raw.len() > MAX_MOVES {
        return Err(format!("Too many moves: {} (max {})", raw.len(), MAX_MOVES).into());
    }

    let moves = raw
        .iter()
        .map(|s| s.parse::<Direction>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(moves)
}
