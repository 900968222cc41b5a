//! Gravity: compacts each column after tiles are removed.

use crate::grid::{Grid, GridPos, TileId};

/// A tile that moved during compaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fall {
    pub id: TileId,
    pub from: GridPos,
    pub to: GridPos,
}

impl Fall {
    /// Number of slots the tile dropped.
    pub fn distance(&self) -> usize {
        self.from.y - self.to.y
    }
}

/// Applies gravity to every column (fixed `x`) independently.
///
/// Tiles slide toward `y = 0` to fill the empty slots below them, keeping
/// their relative order. Each tile falls by the number of empty slots
/// encountered beneath it. Slots vacated at the top stay empty for refill.
///
/// # Returns
/// One [`Fall`] per moved tile, ordered by column then by rising `y`.
///
/// # Examples
/// ```
/// use tile_blast::gravity::compact;
/// use tile_blast::grid::GridPos;
/// use tile_blast::utils::{grid_from_str_array, grid_to_strings};
///
/// let mut grid = grid_from_str_array(&["R.G.B"]).unwrap();
/// let falls = compact(&mut grid);
/// assert_eq!(grid_to_strings(&grid), vec!["RGB.."]);
/// assert_eq!(falls.len(), 2);
/// assert_eq!(falls[1].from, GridPos::new(0, 4));
/// assert_eq!(falls[1].to, GridPos::new(0, 2));
/// ```
pub fn compact(grid: &mut Grid) -> Vec<Fall> {
    let mut falls = Vec::new();

    for x in 0..grid.rows() {
        // Lowest slot that has not been filled yet.
        let mut landing = 0;
        for y in 0..grid.columns() {
            let from = GridPos::new(x, y);
            if grid.get(from).is_none() {
                continue;
            }
            if y != landing {
                let to = GridPos::new(x, landing);
                if let Some(tile) = grid.take(from) {
                    falls.push(Fall { id: tile.id, from, to });
                    grid.set(to, Some(tile));
                }
            }
            landing += 1;
        }
    }

    falls
}
