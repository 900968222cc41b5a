//! Board storage for the tile-blast puzzle.
//!
//! This module defines the data the rest of the engine works on:
//! - `Color`: the fixed palette a tile can be drawn from.
//! - `RewardTier`: the size class a tile's region was last evaluated into.
//! - `Tile`: an identity-bearing tile with its color, slot and tier.
//! - `Grid`: a fixed `rows x columns` array of slots, each empty or holding one tile.
//!
//! Coordinates are `GridPos { x, y }` with `x` in `0..rows` and `y` in `0..columns`.
//! `x` runs left to right and `y` runs bottom to top, so gravity pulls toward `y = 0`.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of colors in the palette. Configured color counts may not exceed this.
pub const MAX_COLORS: usize = 6;

/// The color of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// Represents a red tile.
    Red,
    /// Represents a green tile.
    Green,
    /// Represents a blue tile.
    Blue,
    /// Represents a yellow tile.
    Yellow,
    /// Represents a purple tile.
    Purple,
    /// Represents an orange tile.
    Orange,
}

impl Color {
    /// Every color, in palette order. A color count of `n` draws from the first `n`.
    pub const ALL: [Color; MAX_COLORS] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
    ];

    /// Returns the palette entry at `index`.
    ///
    /// # Panics
    /// Panics if `index >= MAX_COLORS`. Color counts are validated when the
    /// configuration is loaded, so an out-of-range index is a logic fault.
    pub fn from_index(index: usize) -> Color {
        match index {
            0 => Color::Red,
            1 => Color::Green,
            2 => Color::Blue,
            3 => Color::Yellow,
            4 => Color::Purple,
            5 => Color::Orange,
            _ => unreachable!("color index {index} out of range"),
        }
    }

    /// Position of this color in [`Color::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts the color to its character representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_blast::grid::Color;
    /// assert_eq!(Color::Red.to_char(), 'R');
    /// assert_eq!(Color::Orange.to_char(), 'O');
    /// ```
    pub fn to_char(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Purple => 'P',
            Color::Orange => 'O',
        }
    }

    /// Parses the character produced by [`Color::to_char`].
    pub fn from_char(c: char) -> Option<Color> {
        Color::ALL.into_iter().find(|color| color.to_char() == c)
    }

    /// Returns the ANSI background color code string for terminal output.
    fn to_ansi_color_code(self) -> &'static str {
        match self {
            Color::Red => "41",
            Color::Green => "42",
            Color::Yellow => "43",
            Color::Blue => "44",
            Color::Purple => "45",
            Color::Orange => "46",
        }
    }
}

/// Reward classification of a tile, by the size of the region it belongs to.
///
/// Ordered so that a larger region never yields a lower tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RewardTier {
    #[default]
    Default,
    A,
    B,
    C,
}

impl RewardTier {
    /// Glyph drawn on top of the tile color in terminal output.
    pub fn to_char(self) -> char {
        match self {
            RewardTier::Default => ' ',
            RewardTier::A => 'a',
            RewardTier::B => 'b',
            RewardTier::C => 'c',
        }
    }
}

/// A slot coordinate on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub const fn new(x: usize, y: usize) -> Self {
        GridPos { x, y }
    }

    /// Steps by `(dx, dy)`, returning `None` when the result would be negative.
    pub fn offset(self, dx: isize, dy: isize) -> Option<GridPos> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(GridPos { x, y })
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Stable identity of a tile, shared with the visual layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// Hands out fresh [`TileId`]s. Ids are never reused within one allocator.
#[derive(Clone, Debug, Default)]
pub struct TileIdAllocator {
    next: u64,
}

impl TileIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> TileId {
        let id = TileId(self.next);
        self.next += 1;
        id
    }
}

/// A colored tile sitting in one grid slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub color: Color,
    /// Always equal to the slot holding this tile; maintained by [`Grid::set`].
    pub pos: GridPos,
    pub tier: RewardTier,
}

impl Tile {
    pub fn new(id: TileId, color: Color) -> Self {
        Tile {
            id,
            color,
            pos: GridPos::new(0, 0),
            tier: RewardTier::Default,
        }
    }
}

/// The game board: a fixed `rows x columns` grid of slots.
///
/// Slots live in one contiguous vector indexed `x * columns + y`, so each
/// gravity column (fixed `x`) is a contiguous run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    slots: Vec<Option<Tile>>,
}

impl Grid {
    /// Creates a grid with every slot empty.
    ///
    /// # Examples
    /// ```
    /// use tile_blast::grid::{Grid, GridPos};
    /// let grid = Grid::new(3, 4);
    /// assert_eq!(grid.rows(), 3);
    /// assert!(grid.get(GridPos::new(0, 0)).is_none());
    /// ```
    pub fn new(rows: usize, columns: usize) -> Self {
        Grid {
            rows,
            columns,
            slots: vec![None; rows * columns],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x < self.rows && pos.y < self.columns
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        self.in_bounds(pos).then(|| pos.x * self.columns + pos.y)
    }

    /// Returns the tile at `pos`, or `None` for a vacant or out-of-bounds slot.
    pub fn get(&self, pos: GridPos) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.slots[i].as_ref())
    }

    /// Mutable access to the tile at `pos`. Same boundary policy as [`Grid::get`].
    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Tile> {
        let i = self.index(pos)?;
        self.slots[i].as_mut()
    }

    /// Assigns or clears the slot at `pos` and returns whatever it held before.
    ///
    /// The placed tile's `pos` is rewritten to `pos`. Writes outside the grid
    /// are dropped and return `None`.
    pub fn set(&mut self, pos: GridPos, tile: Option<Tile>) -> Option<Tile> {
        let i = self.index(pos)?;
        let tile = tile.map(|mut t| {
            t.pos = pos;
            t
        });
        std::mem::replace(&mut self.slots[i], tile)
    }

    /// Removes and returns the tile at `pos`.
    pub fn take(&mut self, pos: GridPos) -> Option<Tile> {
        self.set(pos, None)
    }

    /// All slot coordinates, column by column (`x` outer, `y` inner).
    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |x| (0..columns).map(move |y| GridPos::new(x, y)))
    }

    /// All tiles currently on the grid, in [`Grid::positions`] order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.slots.iter().flatten()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.slots.iter_mut().flatten()
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Renders the board for a terminal, top row first, with an optional highlighted slot.
    ///
    /// The header lists `x` indices and every line starts with its `y` index.
    /// Tiles are drawn as ANSI color blocks carrying their tier glyph; the
    /// highlighted slot shows `..` instead.
    pub fn to_string_with_highlight(&self, highlight: Option<GridPos>) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for x in 0..self.rows {
            output.push_str(&format!("{:<2}", x));
        }
        output.push('\n');

        for y in (0..self.columns).rev() {
            output.push_str(&format!("{:<3}", y));
            for x in 0..self.rows {
                let pos = GridPos::new(x, y);
                match self.get(pos) {
                    Some(tile) => {
                        let content = if highlight == Some(pos) {
                            "..".to_string()
                        } else {
                            format!("{} ", tile.tier.to_char())
                        };
                        output.push_str(&format!(
                            "\x1b[1;{}m{}\x1b[m",
                            tile.color.to_ansi_color_code(),
                            content
                        ));
                    }
                    None => output.push_str("  "),
                }
            }
            if y > 0 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}
