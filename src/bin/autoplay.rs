use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tile_blast::evaluator::largest_region;
use tile_blast::lifecycle::{BoardController, ClickOutcome};
use tile_blast::rng::RandomColors;
use tile_blast::visual::CommandLog;
use tile_blast::{BoardConfig, RewardTier};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play boards automatically by always blasting the largest region", long_about = None)]
struct Args {
    /// Number of boards to play
    #[clap(short, long, default_value_t = 20)]
    games: usize,

    /// Turns played on each board
    #[clap(short, long, default_value_t = 50)]
    turns: usize,

    /// Seed of the first board; board i uses seed + i
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Path to a JSON board configuration
    #[clap(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct GameStats {
    turns: usize,
    blasted: usize,
    reshuffles: usize,
    tiers: BTreeMap<RewardTier, usize>,
}

fn play_one(config: &BoardConfig, seed: u64, max_turns: usize) -> Result<GameStats> {
    let mut board = BoardController::new(config.clone(), RandomColors::seeded(seed), CommandLog::new())?;
    board.run_until_idle();

    let mut stats = GameStats::default();
    while stats.turns < max_turns {
        let Some(region) = largest_region(board.grid()) else {
            warn!("Board with seed {} has no region at all", seed);
            break;
        };
        let click = region[0];
        let tier = board.grid().get(click).map(|tile| tile.tier).unwrap_or_default();

        match board.click(click) {
            ClickOutcome::Blasted { size } => {
                debug!("Seed {} turn {}: blasted {} tile(s) at {}", seed, stats.turns, size, click);
                stats.turns += 1;
                stats.blasted += size;
                *stats.tiers.entry(tier).or_default() += 1;
            }
            ClickOutcome::Ignored(reason) => {
                warn!("Seed {} click at {} was ignored: {:?}\n{}", seed, click, reason, board.grid());
                break;
            }
        }
        board.run_until_idle();
        board.visuals_mut().drain();
    }
    stats.reshuffles = board.reshuffles();
    Ok(stats)
}

fn tier_histogram(tiers: &BTreeMap<RewardTier, usize>) -> String {
    tiers
        .iter()
        .map(|(tier, count)| format!("{:?}={}", tier, count))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BoardConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BoardConfig::default(),
    };
    config.validate()?;

    println!(
        "Autoplaying {} board(s) of {}x{} with {} colors, {} turns each...",
        args.games, config.rows, config.columns, config.colors, args.turns
    );

    let mut totals = GameStats::default();
    for game_idx in 0..args.games {
        let seed = args.seed + game_idx as u64;
        let stats = play_one(&config, seed, args.turns)?;
        println!(
            "  Board {:<3} (Seed: {:<4}) Turns: {:<4} Blasted: {:<6} Reshuffles: {:<3} Tiers: {}",
            game_idx,
            seed,
            stats.turns,
            stats.blasted,
            stats.reshuffles,
            tier_histogram(&stats.tiers)
        );

        totals.turns += stats.turns;
        totals.blasted += stats.blasted;
        totals.reshuffles += stats.reshuffles;
        for (tier, count) in stats.tiers {
            *totals.tiers.entry(tier).or_default() += count;
        }
    }

    println!("\n--- Autoplay Complete ---");
    if args.games == 0 || totals.turns == 0 {
        println!("No turns were played.");
        return Ok(());
    }
    println!("Total turns: {}", totals.turns);
    println!("Tiles blasted: {}", totals.blasted);
    println!(
        "Average tiles per turn: {:.2}",
        totals.blasted as f64 / totals.turns as f64
    );
    println!(
        "Average reshuffles per board: {:.2}",
        totals.reshuffles as f64 / args.games as f64
    );
    println!("\n--- Clicked Tile Tiers ---");
    for (tier, count) in &totals.tiers {
        println!("Tier {:<8}: {}", format!("{:?}", tier), count);
    }

    Ok(())
}
