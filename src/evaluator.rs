//! Match evaluation.
//!
//! Scans the board for straight runs of same-colored tiles, sizes the full
//! region behind every run with [`find_region`], and stamps each tile of that
//! region with the reward tier its size earns. Two passes run on every
//! evaluation: runs along `x` ("rows first") and runs along `y` ("columns
//! first"). Both always run because both assign tiers; a later seed overwrites
//! tiers an earlier one set.

use crate::config::{BoardConfig, TierThresholds};
use crate::grid::{Grid, GridPos, RewardTier};
use crate::region::find_region;

/// The parameters a match scan needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchRules {
    /// Length of the straight run that seeds a match.
    pub min_run: usize,
    pub thresholds: TierThresholds,
}

impl MatchRules {
    pub fn from_config(config: &BoardConfig) -> Self {
        MatchRules {
            min_run: config.min_blast,
            thresholds: config.thresholds,
        }
    }
}

/// Outcome of one evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Seed runs found by the rows-first pass.
    pub row_seeds: usize,
    /// Seed runs found by the columns-first pass.
    pub column_seeds: usize,
}

impl Evaluation {
    /// True if either pass found at least one seed run.
    pub fn any_match(&self) -> bool {
        self.row_seeds > 0 || self.column_seeds > 0
    }
}

/// Evaluates the whole board, rewriting every tile's tier.
///
/// All tiers are reset to [`RewardTier::Default`] first, so a tile that is no
/// longer part of a seeded region does not keep a stale tier. Running this
/// twice without touching the board in between yields the same tiers.
pub fn evaluate(grid: &mut Grid, rules: &MatchRules) -> Evaluation {
    for tile in grid.tiles_mut() {
        tile.tier = RewardTier::Default;
    }

    let row_seeds = scan_rows(grid, rules);
    let column_seeds = scan_columns(grid, rules);

    Evaluation {
        row_seeds,
        column_seeds,
    }
}

/// Rows-first pass: for each column `y`, checks every run of `min_run` slots along `x`.
///
/// Returns the number of seed runs found.
pub fn scan_rows(grid: &mut Grid, rules: &MatchRules) -> usize {
    if rules.min_run == 0 || grid.rows() < rules.min_run {
        return 0;
    }

    let mut seeds = 0;
    for y in 0..grid.columns() {
        for x in 0..=grid.rows() - rules.min_run {
            let start = GridPos::new(x, y);
            if is_run(grid, start, (1, 0), rules.min_run) {
                seeds += 1;
                apply_region_tier(grid, start, &rules.thresholds);
            }
        }
    }
    seeds
}

/// Columns-first pass: for each row `x`, checks every run of `min_run` slots along `y`.
///
/// Returns the number of seed runs found.
pub fn scan_columns(grid: &mut Grid, rules: &MatchRules) -> usize {
    if rules.min_run == 0 || grid.columns() < rules.min_run {
        return 0;
    }

    let mut seeds = 0;
    for x in 0..grid.rows() {
        for y in 0..=grid.columns() - rules.min_run {
            let start = GridPos::new(x, y);
            if is_run(grid, start, (0, 1), rules.min_run) {
                seeds += 1;
                apply_region_tier(grid, start, &rules.thresholds);
            }
        }
    }
    seeds
}

/// True if `len` slots from `start` along `step` are all occupied by one color.
fn is_run(grid: &Grid, start: GridPos, step: (usize, usize), len: usize) -> bool {
    let Some(color) = grid.get(start).map(|tile| tile.color) else {
        return false;
    };
    (1..len).all(|i| {
        let pos = GridPos::new(start.x + step.0 * i, start.y + step.1 * i);
        grid.get(pos).is_some_and(|tile| tile.color == color)
    })
}

/// Sizes the region behind a seed and stamps its tier on every member.
fn apply_region_tier(grid: &mut Grid, seed: GridPos, thresholds: &TierThresholds) {
    let region = find_region(grid, seed);
    let tier = thresholds.classify(region.len());
    for pos in region {
        if let Some(tile) = grid.get_mut(pos) {
            tile.tier = tier;
        }
    }
}

/// Finds the largest region on the board, if the board has any tile.
///
/// Ties go to the region discovered first in [`Grid::positions`] order.
pub fn largest_region(grid: &Grid) -> Option<Vec<GridPos>> {
    let mut visited = vec![false; grid.rows() * grid.columns()];
    let mut best: Option<Vec<GridPos>> = None;

    for pos in grid.positions() {
        if visited[pos.x * grid.columns() + pos.y] || grid.get(pos).is_none() {
            continue;
        }
        let region = find_region(grid, pos);
        for member in &region {
            visited[member.x * grid.columns() + member.y] = true;
        }
        if best.as_ref().map_or(true, |b| region.len() > b.len()) {
            best = Some(region);
        }
    }

    best
}
