//! Region discovery (flood fill).
//!
//! A region is the maximal set of same-colored tiles reachable from a seed by
//! orthogonal steps through occupied, in-bounds slots.

use crate::grid::{Grid, GridPos};

/// Neighbor order: left, right, up, down.
const NEIGHBORS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

/// Finds the connected same-colored region containing `seed`.
///
/// The traversal is iterative with a stack frontier: the most recently
/// discovered slot is expanded next, and neighbors are examined left, right,
/// up, down. A neighbor joins the frontier when it is occupied, has the
/// seed's color, and is not already in the result or the frontier.
///
/// # Returns
/// The region's coordinates in visit order, seed first. Returns an empty
/// vector if `seed` is out of bounds or vacant; otherwise the result holds at
/// least the seed itself.
///
/// # Examples
/// ```
/// use tile_blast::grid::GridPos;
/// use tile_blast::region::find_region;
/// use tile_blast::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&["RRG", "RBG"]).unwrap();
/// let region = find_region(&grid, GridPos::new(0, 0));
/// assert_eq!(region, vec![GridPos::new(0, 0), GridPos::new(0, 1), GridPos::new(1, 0)]);
/// ```
pub fn find_region(grid: &Grid, seed: GridPos) -> Vec<GridPos> {
    let color = match grid.get(seed) {
        Some(tile) => tile.color,
        None => return Vec::new(),
    };

    let columns = grid.columns();
    let index = |pos: GridPos| pos.x * columns + pos.y;

    // Slots already in the result or waiting in the frontier.
    let mut seen = vec![false; grid.rows() * columns];
    let mut frontier = vec![seed];
    let mut region = Vec::new();
    seen[index(seed)] = true;

    while let Some(current) = frontier.pop() {
        region.push(current);

        for (dx, dy) in NEIGHBORS {
            let Some(next) = current.offset(dx, dy) else {
                continue;
            };
            let matches = grid.get(next).is_some_and(|tile| tile.color == color);
            if matches && !seen[index(next)] {
                seen[index(next)] = true;
                frontier.push(next);
            }
        }
    }

    region
}
