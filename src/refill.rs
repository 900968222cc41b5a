//! Refill: creates new tiles in every empty slot.

use crate::grid::{Grid, GridPos, Tile, TileIdAllocator};
use crate::rng::ColorSource;

/// A tile created by [`refill`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawned {
    pub tile: Tile,
    /// Slot heights above its final slot the tile should appear at before falling in.
    ///
    /// Counts the slots from the tile to the board top plus half a board height,
    /// so every new tile enters from above the visible board.
    pub drop_rows: usize,
}

/// Fills every empty slot with a new tile of a color drawn from `colors`.
///
/// Run after [`compact`](crate::gravity::compact), the empty slots are the
/// top of each column. On an empty grid this builds a complete board.
///
/// # Returns
/// The new tiles in slot order (`x` outer, `y` inner).
///
/// # Examples
/// ```
/// use tile_blast::grid::{Grid, TileIdAllocator};
/// use tile_blast::refill::refill;
/// use tile_blast::rng::RandomColors;
///
/// let mut grid = Grid::new(3, 3);
/// let spawned = refill(&mut grid, &mut RandomColors::seeded(1), 4, &mut TileIdAllocator::new());
/// assert_eq!(spawned.len(), 9);
/// assert!(grid.is_full());
/// ```
pub fn refill(
    grid: &mut Grid,
    colors: &mut impl ColorSource,
    color_count: usize,
    ids: &mut TileIdAllocator,
) -> Vec<Spawned> {
    let columns = grid.columns();
    let empty: Vec<GridPos> = grid
        .positions()
        .filter(|&pos| grid.get(pos).is_none())
        .collect();

    let mut spawned = Vec::with_capacity(empty.len());
    for pos in empty {
        let tile = Tile::new(ids.next_id(), colors.next_color(color_count));
        grid.set(pos, Some(tile));
        if let Some(&placed) = grid.get(pos) {
            spawned.push(Spawned {
                tile: placed,
                drop_rows: (columns - pos.y) + columns / 2,
            });
        }
    }

    spawned
}
