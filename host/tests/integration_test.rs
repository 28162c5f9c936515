use std::collections::{HashMap, HashSet, VecDeque};

use host::{load_moves, new_session, render_ascii, replay};
use maze_core::{Direction, GameConfig, GameStatus, Grid, MoveOutcome, Position};

/// The known maze seed for testing
const MAZE_SEED: u32 = 2918957128;

fn config() -> GameConfig {
    GameConfig::new(20, 20).with_seed(MAZE_SEED)
}

/// BFS solution from start to end
fn solve(grid: &Grid) -> Vec<Direction> {
    let (from, to) = (grid.start(), grid.end());
    let mut came_from: HashMap<Position, (Position, Direction)> = HashMap::new();
    let mut seen = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);

    while let Some(pos) = queue.pop_front() {
        if pos == to {
            break;
        }
        for dir in Direction::ALL {
            if let Some(next) = grid.step(pos, dir).filter(|_| grid.can_move(pos, dir)) {
                if seen.insert(next) {
                    came_from.insert(next, (pos, dir));
                    queue.push_back(next);
                }
            }
        }
    }

    let mut moves = Vec::new();
    let mut at = to;
    while at != from {
        let (prev, dir) = came_from[&at];
        moves.push(dir);
        at = prev;
    }
    moves.reverse();
    moves
}

fn solution() -> Vec<Direction> {
    let game = new_session(&config()).expect("Session creation failed");
    solve(game.grid())
}

#[test]
fn test_valid_bfs_solution() {
    let moves = solution();
    let report = replay(&config(), &moves).expect("Replay failed");

    assert!(report.finished, "BFS solution should reach the end");
    assert_eq!(report.steps, moves.len());
    assert_eq!(report.rejected, 0);
    assert_eq!(report.final_position, Position::new(19, 19));
    assert_eq!(report.outcomes.last(), Some(&MoveOutcome::Finished));
}

#[test]
fn test_empty_moves() {
    let report = replay(&config(), &[]).expect("Replay failed");

    assert!(!report.finished, "Empty moves should not finish");
    assert_eq!(report.steps, 0);
    assert_eq!(report.final_position, Position::new(0, 0));
}

#[test]
fn test_wrong_seed() {
    // Moves designed for a different maze
    let moves = solution();
    let report = replay(&GameConfig::new(20, 20).with_seed(12345), &moves).expect("Replay failed");

    assert!(!report.finished, "Solution for another maze should not finish");
    assert!(report.rejected > 0);
}

#[test]
fn test_partial_solution() {
    let moves = solution();
    let half = moves.len() / 2;
    let report = replay(&config(), &moves[..half]).expect("Replay failed");

    assert!(!report.finished, "Partial solution should not finish");
    assert_eq!(report.steps, half);
}

#[test]
fn test_moves_after_finish_are_rejected() {
    let mut moves = solution();
    let solved_len = moves.len();
    moves.extend([Direction::Up, Direction::Left, Direction::Up]);

    let report = replay(&config(), &moves).expect("Replay failed");
    assert!(report.finished);
    assert_eq!(report.steps, solved_len);
    assert_eq!(
        &report.outcomes[solved_len..],
        &[MoveOutcome::AlreadyEnded; 3]
    );
}

#[test]
fn test_step_count_matches_accepted_moves() {
    let moves: Vec<Direction> = (0..500).map(|i| Direction::ALL[(i * 13 + i / 7) % 4]).collect();
    let report = replay(&config(), &moves).expect("Replay failed");

    assert_eq!(report.accepted + report.rejected, moves.len());
    assert_eq!(report.steps, report.accepted);
}

#[test]
fn test_replay_is_deterministic() {
    let moves: Vec<Direction> = (0..300).map(|i| Direction::ALL[(i * 5 + i / 3) % 4]).collect();
    let first = replay(&config(), &moves).expect("Replay failed");
    let second = replay(&config(), &moves).expect("Replay failed");

    assert_eq!(first.outcomes, second.outcomes);
    assert_eq!(first.final_position, second.final_position);
}

#[test]
fn test_two_by_two_session() {
    let cfg = GameConfig::new(2, 2).with_seed(7);
    let mut game = new_session(&cfg).expect("Session creation failed");
    assert_eq!(game.grid().passages().len(), 3);

    for dir in solve(game.grid()) {
        game.move_player(dir);
    }
    assert_eq!(game.status(), GameStatus::Ended);
    assert_eq!(game.step_count(), 2);
}

#[test]
fn test_single_cell_session() {
    let game = new_session(&GameConfig::new(1, 1).with_seed(1)).expect("Session creation failed");
    assert_eq!(game.status(), GameStatus::Ended);
    assert_eq!(game.step_count(), 0);
    assert_eq!(render_ascii(&game), "+---+\n| @ |\n+---+\n");
}

#[test]
fn test_load_moves_file() {
    let path = std::env::temp_dir().join(format!("maze_moves_{}.json", std::process::id()));
    std::fs::write(&path, r#"["right", "down", "l", "U"]"#).unwrap();

    let moves = load_moves(&path).expect("Loading moves failed");
    std::fs::remove_file(&path).ok();

    assert_eq!(
        moves,
        vec![Direction::Right, Direction::Down, Direction::Left, Direction::Up]
    );
}

#[test]
fn test_load_moves_missing_file() {
    assert!(load_moves("/definitely/not/here/moves.json").is_err());
}
