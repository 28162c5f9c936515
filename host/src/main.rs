use host::{apply_move, load_moves, new_session, parse_position, render_ascii, replay, ReplayReport, Size};
use maze_core::{Direction, GameConfig, GameState, MoveOutcome, Position};
use std::env;
use std::io::{self, BufRead, Write};

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    // Parse CLI arguments
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "generate" => {
            let (positional, config) = parse_options(&args[2..]);
            let seed = match positional.first() {
                Some(s) => parse_seed(s),
                None => {
                    eprintln!("Usage: {} generate <seed> [--size <W>x<H>] [--start <X>,<Y>]", args[0]);
                    std::process::exit(1);
                }
            };

            generate_command(&config.with_seed(seed));
        }

        "replay" => {
            let (positional, config) = parse_options(&args[2..]);
            if positional.len() < 2 {
                eprintln!("Usage: {} replay <seed> <moves_file> [--size <W>x<H>] [--start <X>,<Y>] [--json]", args[0]);
                eprintln!("Error: Missing required arguments");
                std::process::exit(1);
            }

            let seed = parse_seed(&positional[0]);
            let json = args.iter().any(|a| a == "--json");

            replay_command(&config.with_seed(seed), &positional[1], json);
        }

        "play" => {
            let (positional, mut config) = parse_options(&args[2..]);
            if let Some(s) = positional.first() {
                config = config.with_seed(parse_seed(s));
            }

            play_command(&config);
        }

        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  generate <seed> [--size <W>x<H>] [--start <X>,<Y>]");
    eprintln!("      Generate a maze from a seed and print it");
    eprintln!();
    eprintln!("  replay <seed> <moves_file> [--size <W>x<H>] [--start <X>,<Y>] [--json]");
    eprintln!("      Replay a moves file against the maze for <seed>");
    eprintln!("      - moves_file: JSON array of directions, e.g. [\"right\", \"down\"]");
    eprintln!("      - --json: print the report as JSON");
    eprintln!();
    eprintln!("  play [seed] [--size <W>x<H>] [--start <X>,<Y>]");
    eprintln!("      Play interactively; type u/d/l/r (or up/down/left/right), q to quit");
    eprintln!("      Without a seed the maze is random");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --size   Maze size in cells. Default: 16x10");
    eprintln!("  --start  Start cell. Default: 0,0. The end is always the bottom-right cell");
    eprintln!();
    eprintln!("Set RUST_LOG=debug to log every move.");
}

/// Split option flags from positional arguments; exits on a malformed flag.
fn parse_options(args: &[String]) -> (Vec<String>, GameConfig) {
    let mut config = GameConfig::default();
    let mut positional = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--size" => {
                let value = require_value(iter.next(), "--size", "<W>x<H>");
                let size: Size = value.parse().unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                });
                config.width = size.width;
                config.height = size.height;
            }
            "--start" => {
                let value = require_value(iter.next(), "--start", "<X>,<Y>");
                config.start = parse_position(value).unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                });
            }
            "--json" => {}
            _ => positional.push(arg.clone()),
        }
    }

    (positional, config)
}

fn require_value<'a>(value: Option<&'a String>, flag: &str, shape: &str) -> &'a str {
    match value {
        Some(v) => v,
        None => {
            eprintln!("Error: {} requires a value ({})", flag, shape);
            std::process::exit(1);
        }
    }
}

fn parse_seed(s: &str) -> u32 {
    s.parse().unwrap_or_else(|_| {
        eprintln!("Error: Invalid maze seed '{}'. Must be a non-negative integer.", s);
        std::process::exit(1);
    })
}

fn open_session(config: &GameConfig) -> GameState {
    match new_session(config) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn generate_command(config: &GameConfig) {
    let game = open_session(config);

    println!("Maze {}x{}, seed {}", config.width, config.height, config.seed.unwrap_or_default());
    println!("  Start: ({}, {})", game.start().x, game.start().y);
    println!("  End:   ({}, {})", game.end().x, game.end().y);
    println!();
    print!("{}", render_ascii(&game));
}

fn replay_command(config: &GameConfig, moves_file: &str, json: bool) {
    let moves = match load_moves(moves_file) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error loading moves: {}", e);
            std::process::exit(1);
        }
    };

    let report = match replay(config, &moves) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error replaying moves: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error encoding report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print_report(&report, moves.len());
    }

    if !report.finished {
        std::process::exit(2);
    }
}

fn print_report(report: &ReplayReport, total: usize) {
    println!("Replay of {} moves on a {}x{} maze", total, report.width, report.height);
    println!("  Accepted: {}", report.accepted);
    println!("  Rejected: {}", report.rejected);
    println!("  Steps:    {}", report.steps);
    println!("  Final position: ({}, {})", report.final_position.x, report.final_position.y);
    println!("  Reached end: {}", if report.finished { "Yes" } else { "No" });
}

fn play_command(config: &GameConfig) {
    let mut game = open_session(config);
    let stdin = io::stdin();

    print!("{}", render_ascii(&game));
    if !game.is_in_progress() {
        println!("You start on the end cell. Nothing to solve.");
        return;
    }
    prompt(&game);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                std::process::exit(1);
            }
        };

        for token in line.split_whitespace() {
            if token.eq_ignore_ascii_case("q") || token.eq_ignore_ascii_case("quit") {
                println!("Gave up after {} steps.", game.step_count());
                return;
            }

            let direction: Direction = match token.parse() {
                Ok(d) => d,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };

            match apply_move(&mut game, direction) {
                MoveOutcome::Blocked => println!("A wall blocks the way {}.", direction),
                MoveOutcome::OutOfBounds => println!("That is the edge of the maze."),
                _ => {}
            }
        }

        print!("{}", render_ascii(&game));

        if !game.is_in_progress() {
            let elapsed = game.elapsed_time().unwrap_or_default();
            println!();
            println!("You reached the end!");
            println!("  Steps: {}", game.step_count());
            println!("  Time:  {:.2}s", elapsed.as_secs_f64());
            return;
        }

        prompt(&game);
    }
}

fn prompt(game: &GameState) {
    let Position { x, y } = game.position();
    print!("[{} steps, at ({}, {})] move> ", game.step_count(), x, y);
    let _ = io::stdout().flush();
}
