//! Board configuration.
//!
//! Everything here is fixed once a board controller is built: dimensions,
//! palette size, blast rules, reward thresholds, on-screen layout and the
//! animation timings that pace a turn. A configuration is checked by
//! [`BoardConfig::validate`] before any board is created, so a malformed
//! value surfaces at load time instead of mid-game.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::grid::{GridPos, MAX_COLORS, RewardTier};

/// Region sizes a tile's group must exceed to reach each reward tier.
///
/// A region of `size` tiles is tier C when `size > c`, else B when `size > b`,
/// else A when `size > a`, else Default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Default for TierThresholds {
    fn default() -> Self {
        TierThresholds { a: 4, b: 7, c: 9 }
    }
}

impl TierThresholds {
    /// Classifies a region size into its reward tier.
    ///
    /// # Examples
    /// ```
    /// use tile_blast::config::TierThresholds;
    /// use tile_blast::grid::RewardTier;
    ///
    /// let thresholds = TierThresholds { a: 4, b: 7, c: 9 };
    /// assert_eq!(thresholds.classify(4), RewardTier::Default);
    /// assert_eq!(thresholds.classify(5), RewardTier::A);
    /// assert_eq!(thresholds.classify(8), RewardTier::B);
    /// assert_eq!(thresholds.classify(10), RewardTier::C);
    /// ```
    pub fn classify(&self, size: usize) -> RewardTier {
        if size > self.c {
            RewardTier::C
        } else if size > self.b {
            RewardTier::B
        } else if size > self.a {
            RewardTier::A
        } else {
            RewardTier::Default
        }
    }
}

/// Where tiles sit in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Spacing between neighboring slots along each axis.
    pub tile_size: Vec2,
    /// World position of slot `(0, 0)`.
    pub origin: Vec2,
    /// Scale a tile shrinks to before it is destroyed, and grows from when created.
    pub min_scale: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            tile_size: Vec2::new(100.0, 100.0),
            origin: Vec2::ZERO,
            min_scale: 0.1,
        }
    }
}

impl Layout {
    /// World position of a slot.
    pub fn world_position(&self, pos: GridPos) -> Vec2 {
        Vec2::new(
            self.tile_size.x * pos.x as f32 + self.origin.x,
            self.tile_size.y * pos.y as f32 + self.origin.y,
        )
    }

    /// Position a refilled tile starts from, `drop_rows` slot heights above its final slot.
    pub fn spawn_position(&self, pos: GridPos, drop_rows: usize) -> Vec2 {
        self.world_position(pos) + Vec2::new(0.0, self.tile_size.y * drop_rows as f32)
    }

    /// Straight-line distance between two world positions.
    pub fn distance(&self, from: Vec2, to: Vec2) -> f32 {
        from.distance(to)
    }
}

/// Animation timings, in seconds unless noted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Grow-in time of tiles on an animated board rebuild.
    pub creation: f32,
    /// Shrink-out time of removed tiles, and the wait before compaction.
    pub removal: f32,
    /// Falling speed in world units per second.
    pub fall_speed: f32,
    /// Wait between compaction and refill.
    pub fall_wait: f32,
    /// Time between tearing down a dead board and building the next one.
    pub board_delay: f32,
    /// Wait between refill and re-evaluation.
    pub refill_wait: f32,
    /// Pause after an evaluation before input is accepted again.
    pub settle: f32,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            creation: 0.3,
            removal: 0.2,
            fall_speed: 1500.0,
            fall_wait: 0.4,
            board_delay: 1.0,
            refill_wait: 0.5,
            settle: 0.5,
        }
    }
}

impl Timings {
    /// Seconds a tile takes to travel `distance` world units.
    pub fn fall_duration(&self, distance: f32) -> f32 {
        distance / self.fall_speed
    }

    fn waits(&self) -> [(&'static str, f32); 6] {
        [
            ("creation", self.creation),
            ("removal", self.removal),
            ("fall_wait", self.fall_wait),
            ("board_delay", self.board_delay),
            ("refill_wait", self.refill_wait),
            ("settle", self.settle),
        ]
    }
}

/// Complete configuration of one board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of slots along `x`.
    pub rows: usize,
    /// Number of slots along `y`; gravity pulls toward `y = 0`.
    pub columns: usize,
    /// How many palette colors the board draws from.
    pub colors: usize,
    /// Smallest region a click may blast, and the run length that seeds a match.
    pub min_blast: usize,
    pub thresholds: TierThresholds,
    pub layout: Layout,
    pub timings: Timings,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            rows: 8,
            columns: 8,
            colors: 4,
            min_blast: 2,
            thresholds: TierThresholds::default(),
            layout: Layout::default(),
            timings: Timings::default(),
        }
    }
}

/// Errors raised while loading or validating a [`BoardConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(std::io::Error),
    /// The configuration text is not valid JSON for a `BoardConfig`.
    Parse(serde_json::Error),
    /// The values parsed but break a precondition.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(reason.into())
}

impl BoardConfig {
    /// Parses a JSON configuration and validates it. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every precondition the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(invalid(format!(
                "board must have at least one row and one column, got {}x{}",
                self.rows, self.columns
            )));
        }
        if !(1..=MAX_COLORS).contains(&self.colors) {
            return Err(invalid(format!(
                "color count must be between 1 and {MAX_COLORS}, got {}",
                self.colors
            )));
        }
        if self.min_blast < 2 {
            return Err(invalid(format!(
                "minimum blast size must be at least 2, got {}",
                self.min_blast
            )));
        }
        if self.rows < self.min_blast && self.columns < self.min_blast {
            return Err(invalid(format!(
                "a {}x{} board cannot hold a run of {} tiles",
                self.rows, self.columns, self.min_blast
            )));
        }

        let TierThresholds { a, b, c } = self.thresholds;
        if a > b || b > c {
            return Err(invalid(format!(
                "tier thresholds must be ascending, got a={a} b={b} c={c}"
            )));
        }

        for (name, value) in self.timings.waits() {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "timing `{name}` must be a non-negative number of seconds, got {value}"
                )));
            }
        }
        if !self.timings.fall_speed.is_finite() || self.timings.fall_speed <= 0.0 {
            return Err(invalid(format!(
                "fall speed must be positive, got {}",
                self.timings.fall_speed
            )));
        }

        let size = self.layout.tile_size;
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(invalid(format!("tile size must be positive, got {size}")));
        }
        if !(0.0..=1.0).contains(&self.layout.min_scale) {
            return Err(invalid(format!(
                "minimum tile scale must be within 0..=1, got {}",
                self.layout.min_scale
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_invalid(config: BoardConfig, fragment: &str) {
        match config.validate() {
            Err(ConfigError::Invalid(reason)) => {
                assert!(reason.contains(fragment), "unexpected reason: {reason}")
            }
            other => panic!("expected Invalid containing {fragment:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(BoardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        expect_invalid(BoardConfig { rows: 0, ..Default::default() }, "at least one row");
        expect_invalid(BoardConfig { columns: 0, ..Default::default() }, "at least one row");
    }

    #[test]
    fn test_rejects_color_count_out_of_range() {
        expect_invalid(BoardConfig { colors: 0, ..Default::default() }, "color count");
        expect_invalid(BoardConfig { colors: 7, ..Default::default() }, "color count");
        assert!(BoardConfig { colors: 6, ..Default::default() }.validate().is_ok());
    }

    #[test]
    fn test_rejects_small_blast() {
        expect_invalid(BoardConfig { min_blast: 1, ..Default::default() }, "at least 2");
    }

    #[test]
    fn test_rejects_board_too_small_for_runs() {
        let config = BoardConfig { rows: 2, columns: 2, min_blast: 3, ..Default::default() };
        expect_invalid(config, "cannot hold a run");
        let narrow = BoardConfig { rows: 1, columns: 3, min_blast: 3, ..Default::default() };
        assert!(narrow.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = BoardConfig {
            thresholds: TierThresholds { a: 5, b: 3, c: 9 },
            ..Default::default()
        };
        expect_invalid(config, "ascending");
        let config = BoardConfig {
            thresholds: TierThresholds { a: 1, b: 8, c: 7 },
            ..Default::default()
        };
        expect_invalid(config, "ascending");
    }

    #[test]
    fn test_rejects_bad_timings() {
        let mut config = BoardConfig::default();
        config.timings.fall_wait = -0.1;
        expect_invalid(config, "fall_wait");

        let mut config = BoardConfig::default();
        config.timings.settle = f32::NAN;
        expect_invalid(config, "settle");

        let mut config = BoardConfig::default();
        config.timings.fall_speed = 0.0;
        expect_invalid(config, "fall speed");
    }

    #[test]
    fn test_rejects_bad_layout() {
        let mut config = BoardConfig::default();
        config.layout.tile_size = Vec2::new(0.0, 10.0);
        expect_invalid(config, "tile size");

        let mut config = BoardConfig::default();
        config.layout.min_scale = 1.5;
        expect_invalid(config, "minimum tile scale");
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = BoardConfig::from_json_str(r#"{ "rows": 5, "columns": 6, "colors": 3 }"#)
            .unwrap();
        assert_eq!(config.rows, 5);
        assert_eq!(config.columns, 6);
        assert_eq!(config.colors, 3);
        assert_eq!(config.min_blast, 2);
        assert_eq!(config.timings, Timings::default());
    }

    #[test]
    fn test_from_json_nested_sections() {
        let text = r#"{
            "thresholds": { "a": 2, "b": 3, "c": 4 },
            "layout": { "tile_size": [50.0, 60.0], "origin": [-10.0, 5.0] },
            "timings": { "removal": 0.25 }
        }"#;
        let config = BoardConfig::from_json_str(text).unwrap();
        assert_eq!(config.thresholds, TierThresholds { a: 2, b: 3, c: 4 });
        assert_eq!(config.layout.tile_size, Vec2::new(50.0, 60.0));
        assert_eq!(config.layout.min_scale, Layout::default().min_scale);
        assert_eq!(config.timings.removal, 0.25);
        assert_eq!(config.timings.settle, Timings::default().settle);
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        let result = BoardConfig::from_json_str(r#"{ "colors": 9 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        let result = BoardConfig::from_json_str("{ rows: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = BoardConfig::load("/definitely/not/here/board.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_classify_boundaries() {
        let thresholds = TierThresholds { a: 2, b: 4, c: 6 };
        assert_eq!(thresholds.classify(1), RewardTier::Default);
        assert_eq!(thresholds.classify(2), RewardTier::Default);
        assert_eq!(thresholds.classify(3), RewardTier::A);
        assert_eq!(thresholds.classify(4), RewardTier::A);
        assert_eq!(thresholds.classify(5), RewardTier::B);
        assert_eq!(thresholds.classify(6), RewardTier::B);
        assert_eq!(thresholds.classify(7), RewardTier::C);
    }

    #[test]
    fn test_layout_positions() {
        let layout = Layout {
            tile_size: Vec2::new(10.0, 20.0),
            origin: Vec2::new(1.0, 2.0),
            min_scale: 0.1,
        };
        assert_eq!(layout.world_position(GridPos::new(0, 0)), Vec2::new(1.0, 2.0));
        assert_eq!(layout.world_position(GridPos::new(3, 2)), Vec2::new(31.0, 42.0));
        assert_eq!(layout.spawn_position(GridPos::new(3, 2), 4), Vec2::new(31.0, 122.0));
        let distance = layout.distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((distance - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_fall_duration() {
        let timings = Timings { fall_speed: 200.0, ..Default::default() };
        assert!((timings.fall_duration(100.0) - 0.5).abs() < 1e-6);
    }
}
