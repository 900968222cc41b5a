//! # Tile Blast Library
//!
//! This library provides the board logic of a tile-blast puzzle: a grid of
//! colored tiles where clicking a tile removes its whole same-colored region,
//! the columns above collapse, and new tiles drop in from the top. Rendering
//! and input plumbing stay with the host; the library only tells a visual
//! layer what happened to each tile.
//!
//! It is used by two binaries:
//! - `play`: Interactive gameplay on the command line.
//! - `autoplay`: Plays many boards automatically and reports turn statistics.
//!
//! ## Modules
//! - `config`: Board dimensions, blast rules, reward thresholds, layout and timings (`BoardConfig`).
//! - `grid`: Tiles (`Tile`, `Color`, `RewardTier`) and the slot grid (`Grid`).
//! - `region`: Flood fill over same-colored neighbors (`find_region`).
//! - `evaluator`: Match scanning and reward tier assignment (`evaluate`).
//! - `gravity`: Column compaction after removal (`compact`).
//! - `refill`: Creation of new tiles in empty slots (`refill`).
//! - `rng`: Seedable and scripted color sources (`ColorSource`).
//! - `visual`: The per-tile command boundary to the renderer (`TileVisuals`).
//! - `lifecycle`: The turn state machine tying everything together (`BoardController`).
//! - `utils`: Text fixtures for boards.

pub mod config;
pub mod evaluator;
pub mod gravity;
pub mod grid;
pub mod lifecycle;
pub mod refill;
pub mod region;
pub mod rng;
pub mod utils;
pub mod visual;

pub use config::{BoardConfig, ConfigError};
pub use grid::{Color, Grid, GridPos, RewardTier, Tile, TileId};
pub use lifecycle::{BoardController, BoardEvent, ClickOutcome, ControllerState, IgnoreReason, Phase};
