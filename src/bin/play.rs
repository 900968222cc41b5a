use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tile_blast::lifecycle::{BoardController, BoardEvent, ClickOutcome, IgnoreReason};
use tile_blast::rng::RandomColors;
use tile_blast::visual::CommandLog;
use tile_blast::{BoardConfig, GridPos};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play tile blast in the terminal", long_about = None)]
struct Args {
    /// Path to a JSON board configuration
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Seed for tile colors; random if omitted
    #[clap(short, long)]
    seed: Option<u64>,

    /// Override the number of rows (x extent)
    #[clap(long)]
    rows: Option<usize>,

    /// Override the number of columns (y extent)
    #[clap(long)]
    columns: Option<usize>,

    /// Override the number of colors
    #[clap(long)]
    colors: Option<usize>,
}

fn load_config(args: &Args) -> Result<BoardConfig> {
    let mut config = match &args.config {
        Some(path) => BoardConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BoardConfig::default(),
    };
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(colors) = args.colors {
        config.colors = colors;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;

    let colors = match args.seed {
        Some(seed) => RandomColors::seeded(seed),
        None => RandomColors::from_entropy(),
    };
    let mut board = BoardController::new(config, colors, CommandLog::new())?;
    // The terminal has no animations, so every wait is skipped.
    board.run_until_idle();
    board.visuals_mut().drain();

    println!("Welcome to Tile Blast!");
    let mut turns = 0;

    loop {
        println!("---------------------");
        println!("Turns: {}, Reshuffles: {}", turns, board.reshuffles());
        println!("{}", board.grid());

        print!("Enter your move (x y), or 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let trimmed_input = input.trim();
        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        let parts: Vec<&str> = trimmed_input.split_whitespace().collect();
        let (x, y) = match parts.as_slice() {
            [x, y] => match (x.parse::<usize>(), y.parse::<usize>()) {
                (Ok(x), Ok(y)) => (x, y),
                _ => {
                    println!("Invalid input: Please enter numbers (e.g., '3 4') or 'q'.");
                    continue;
                }
            },
            _ => {
                println!("Invalid input format. Use 'x y' or 'q'.");
                continue;
            }
        };

        match board.handle(BoardEvent::TileClicked(GridPos::new(x, y))) {
            ClickOutcome::Blasted { size } => {
                turns += 1;
                board.run_until_idle();
                let summary = board.visuals().summary();
                board.visuals_mut().drain();
                println!(
                    "Blasted {} tile(s): {} fell, {} spawned, {} tier change(s).",
                    size,
                    summary.moved.saturating_sub(summary.spawned),
                    summary.spawned,
                    summary.tier_changes
                );
            }
            ClickOutcome::Ignored(IgnoreReason::NoTile) => {
                println!(
                    "Invalid coordinates: x must be below {} and y below {}.",
                    board.grid().rows(),
                    board.grid().columns()
                );
            }
            ClickOutcome::Ignored(IgnoreReason::TooSmall { size }) => {
                println!(
                    "Region of {} tile(s) at ({}, {}) is below the minimum of {}.",
                    size,
                    x,
                    y,
                    board.config().min_blast
                );
            }
            ClickOutcome::Ignored(IgnoreReason::Locked) => {
                board.run_until_idle();
            }
        }
    }

    Ok(())
}
