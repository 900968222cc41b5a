use crate::grid::{Color, Grid, GridPos, Tile, TileIdAllocator};

/// Parses an array of string slices into a `Grid`.
///
/// Each string slice is one row `x` (the first slice is `x = 0`), and each
/// character within it is the slot at column `y`, starting from the bottom
/// (`y = 0`). The grid gets `s.len()` rows and as many columns as the longest
/// string; shorter strings are padded with empty slots.
///
/// Valid characters are the color letters `R G B Y P O` and `.` for an empty
/// slot. Tiles receive ids `0, 1, 2, ...` in row-major order.
///
/// # Returns
/// * `Ok(Grid)` if parsing is successful.
/// * `Err(String)` if the input is empty or contains an unrecognized character.
///
/// # Examples
/// ```
/// use tile_blast::utils::grid_from_str_array;
/// use tile_blast::grid::{Color, GridPos};
///
/// let grid = grid_from_str_array(&["RG", "B."]).unwrap();
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.columns(), 2);
/// assert_eq!(grid.get(GridPos::new(0, 1)).map(|t| t.color), Some(Color::Green));
/// assert!(grid.get(GridPos::new(1, 1)).is_none());
///
/// assert!(grid_from_str_array(&["RXB"]).is_err());
/// ```
pub fn grid_from_str_array(s: &[&str]) -> Result<Grid, String> {
    let columns = s.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    if s.is_empty() || columns == 0 {
        return Err("Grid must have at least one row and one column".to_string());
    }

    let mut grid = Grid::new(s.len(), columns);
    let mut ids = TileIdAllocator::new();

    for (x, row_str) in s.iter().enumerate() {
        for (y, ch) in row_str.chars().enumerate() {
            if ch == '.' {
                continue;
            }
            let color = Color::from_char(ch).ok_or_else(|| {
                format!("Unrecognized character '{}' in row {} column {}", ch, x, y)
            })?;
            grid.set(GridPos::new(x, y), Some(Tile::new(ids.next_id(), color)));
        }
    }

    Ok(grid)
}

/// Inverse of [`grid_from_str_array`]: one string per row, one character per column.
pub fn grid_to_strings(grid: &Grid) -> Vec<String> {
    (0..grid.rows())
        .map(|x| {
            (0..grid.columns())
                .map(|y| {
                    grid.get(GridPos::new(x, y))
                        .map_or('.', |tile| tile.color.to_char())
                })
                .collect()
        })
        .collect()
}
