//! Pixfuse entry point
//!
//! Runs either game headless at the fixed tick rate with a simple autopilot
//! standing in for the player. Useful for soak runs and for checking that a
//! settings file produces a playable game.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use glam::Vec2;

use pixfuse::audio::LogAudio;
use pixfuse::consts::SIM_DT;
use pixfuse::{ArcadeWorld, Direction, Driver, GameCore, GameManager, JsonFileStore, Settings};

#[derive(Parser, Debug)]
#[command(name = "pixfuse")]
#[command(about = "Headless runner for the tile puzzle and the vertical shooter")]
struct Cli {
    /// Which game to run
    #[arg(long, value_enum, default_value_t = Mode::Puzzle)]
    mode: Mode,
    /// RNG seed; the same seed replays the same run
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Simulated seconds before giving up
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,
    /// Settings JSON; missing keys use defaults
    #[arg(long)]
    settings: Option<PathBuf>,
    /// High score file
    #[arg(long, default_value = "pixfuse_scores.json")]
    scores: PathBuf,
    /// Sleep between frames instead of running flat out
    #[arg(long)]
    realtime: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Puzzle,
    Arcade,
}

/// Preference order for puzzle moves: keep big tiles in the bottom-left
const PUZZLE_PREFERENCE: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::Up,
];

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    log::info!("Pixfuse starting: {:?} seed {}", cli.mode, cli.seed);

    let store = Box::new(JsonFileStore::open(cli.scores.clone()));
    let audio = Box::new(LogAudio::new());

    match cli.mode {
        Mode::Puzzle => {
            let core = GameManager::new(settings.puzzle, cli.seed);
            let driver = Driver::new(core, audio, store);
            run(driver, &cli, puzzle_autopilot);
        }
        Mode::Arcade => {
            let core = ArcadeWorld::new(settings.arcade, cli.seed);
            let driver = Driver::new(core, audio, store);
            run(driver, &cli, arcade_autopilot);
        }
    }
}

/// Frame loop shared by both modes
fn run<G: GameCore>(mut driver: Driver<G>, cli: &Cli, autopilot: fn(&G) -> Option<G::Input>) {
    let frames = (cli.seconds.max(0.0) / SIM_DT).ceil() as u64;

    for _ in 0..frames {
        if let Some(input) = autopilot(driver.core()) {
            driver.input(input);
        }
        driver.frame(SIM_DT);

        let core = driver.core();
        if core.is_game_over() || core.is_won() {
            break;
        }
        if cli.realtime {
            std::thread::sleep(Duration::from_millis(16));
        }
    }

    let core = driver.into_core();
    let outcome = if core.is_won() {
        "won"
    } else if core.is_game_over() {
        "game over"
    } else {
        "time up"
    };
    log::info!(
        "Run finished ({}): score {}, high score {}",
        outcome,
        core.score(),
        core.high_score()
    );
    println!("{} {}", core.score(), core.high_score());
}

/// Move once the board has settled, taking the first direction that changes it
fn puzzle_autopilot(game: &GameManager) -> Option<Direction> {
    let board = game.board();
    if !board.animations().is_empty() || !board.spawn_animations().is_empty() {
        return None;
    }
    PUZZLE_PREFERENCE
        .into_iter()
        .find(|&dir| board.clone().shift(dir).moved)
}

/// Track the lowest asteroid from below, staying near the bottom of the screen
fn arcade_autopilot(world: &ArcadeWorld) -> Option<Vec2> {
    let lowest = world
        .asteroids
        .iter()
        .filter(|a| a.pos.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;
    Some(Vec2::new(lowest.pos.x, world.ship.pos.y))
}
