//! Board lifecycle: the turn state machine.
//!
//! `BoardController` owns the grid and drives every other component in a
//! fixed order. A click blasts a region, then timed phases run compaction,
//! refill and evaluation, each phase waiting for its animation before the
//! next mutation. When an evaluation finds no match anywhere, the board is
//! torn down and rebuilt from scratch.
//!
//! Time is supplied by the host through [`BoardController::advance`]; the
//! controller keeps exactly one pending wait while it is not idle, and input
//! is only accepted in [`ControllerState::Idle`].

use log::{debug, info, trace};

use crate::config::{BoardConfig, ConfigError};
use crate::evaluator::{evaluate, Evaluation, MatchRules};
use crate::gravity::compact;
use crate::grid::{Grid, GridPos, RewardTier, TileId, TileIdAllocator};
use crate::refill::refill;
use crate::region::find_region;
use crate::rng::ColorSource;
use crate::visual::TileVisuals;

/// A timed step of a turn or of a reshuffle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Blasted tiles are shrinking; compaction runs when the wait ends.
    Removing,
    /// Tiles are falling; refill runs when the wait ends.
    Falling,
    /// New tiles are dropping in; evaluation runs when the wait ends.
    Refilling,
    /// A dead board is shrinking away.
    TearingDown,
    /// Pause before the replacement board is built.
    Rebuilding,
}

/// Where the controller is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for a click. The only state that accepts input.
    Idle,
    /// An evaluation just ran; input reopens after the settle delay.
    Evaluating,
    /// A turn or reshuffle is in progress; input is locked.
    Resolving(Phase),
}

/// Input delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    TileClicked(GridPos),
}

/// Why a click changed nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The controller was not idle.
    Locked,
    /// The clicked slot is empty or off the board.
    NoTile,
    /// The clicked region is smaller than the minimum blast size.
    TooSmall { size: usize },
}

/// Result of a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The region was removed and a turn started.
    Blasted { size: usize },
    Ignored(IgnoreReason),
}

/// Owns one board and runs its turns.
pub struct BoardController<C, V> {
    config: BoardConfig,
    rules: MatchRules,
    grid: Grid,
    ids: TileIdAllocator,
    colors: C,
    visuals: V,
    state: ControllerState,
    /// Seconds left in the current phase. `None` exactly when idle.
    pending: Option<f32>,
    /// Tiles shrinking away, destroyed when the current wait ends.
    doomed: Vec<TileId>,
    last_evaluation: Evaluation,
    reshuffles: usize,
}

impl<C: ColorSource, V: TileVisuals> BoardController<C, V> {
    /// Validates `config`, builds the first board without animation and evaluates it.
    ///
    /// The controller starts idle, unless the first board has no match at
    /// all, in which case it is already tearing down for a reshuffle.
    pub fn new(config: BoardConfig, colors: C, visuals: V) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut controller = BoardController {
            rules: MatchRules::from_config(&config),
            grid: Grid::new(config.rows, config.columns),
            config,
            ids: TileIdAllocator::new(),
            colors,
            visuals,
            state: ControllerState::Evaluating,
            pending: None,
            doomed: Vec::new(),
            last_evaluation: Evaluation::default(),
            reshuffles: 0,
        };

        controller.build_board(false);
        if controller.evaluate_board().any_match() {
            controller.enter(ControllerState::Idle, None);
        } else {
            controller.begin_reshuffle();
        }

        Ok(controller)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn input_enabled(&self) -> bool {
        self.state == ControllerState::Idle
    }

    /// Seconds until the current phase ends, or `None` when idle.
    pub fn pending_wait(&self) -> Option<f32> {
        self.pending
    }

    /// The most recent evaluation result.
    pub fn last_evaluation(&self) -> Evaluation {
        self.last_evaluation
    }

    /// How many times a dead board has been replaced.
    pub fn reshuffles(&self) -> usize {
        self.reshuffles
    }

    pub fn visuals(&self) -> &V {
        &self.visuals
    }

    pub fn visuals_mut(&mut self) -> &mut V {
        &mut self.visuals
    }

    /// Dispatches a host event.
    pub fn handle(&mut self, event: BoardEvent) -> ClickOutcome {
        match event {
            BoardEvent::TileClicked(pos) => self.click(pos),
        }
    }

    /// Blasts the region under `pos` if the controller is idle and the region is big enough.
    pub fn click(&mut self, pos: GridPos) -> ClickOutcome {
        if !self.input_enabled() {
            trace!("click at {pos} ignored while {:?}", self.state);
            return ClickOutcome::Ignored(IgnoreReason::Locked);
        }

        let region = find_region(&self.grid, pos);
        if region.is_empty() {
            trace!("click at {pos} hit no tile");
            return ClickOutcome::Ignored(IgnoreReason::NoTile);
        }
        if region.len() < self.config.min_blast {
            trace!("click at {pos} found only {} tile(s)", region.len());
            return ClickOutcome::Ignored(IgnoreReason::TooSmall { size: region.len() });
        }

        let size = region.len();
        debug!("blasting {size} tile(s) from {pos}");
        for member in region {
            self.remove_animated(member);
        }
        self.enter(
            ControllerState::Resolving(Phase::Removing),
            Some(self.config.timings.removal),
        );

        ClickOutcome::Blasted { size }
    }

    /// Lets `dt` seconds pass, completing every phase whose wait runs out.
    ///
    /// Leftover time carries into the next phase, so a large `dt` can finish
    /// a whole turn in one call.
    pub fn advance(&mut self, dt: f32) {
        let mut budget = dt.max(0.0);
        while let Some(remaining) = self.pending {
            if budget < remaining {
                self.pending = Some(remaining - budget);
                return;
            }
            budget -= remaining;
            self.pending = None;
            self.finish_phase();
        }
    }

    /// Advances time until the controller is idle again.
    pub fn run_until_idle(&mut self) {
        while let Some(remaining) = self.pending {
            self.advance(remaining);
        }
    }

    fn enter(&mut self, state: ControllerState, wait: Option<f32>) {
        debug!("{:?} -> {:?}", self.state, state);
        self.state = state;
        self.pending = wait;
    }

    fn finish_phase(&mut self) {
        let timings = self.config.timings;
        match self.state {
            ControllerState::Resolving(Phase::Removing) => {
                self.destroy_doomed();
                self.drop_tiles();
                self.enter(
                    ControllerState::Resolving(Phase::Falling),
                    Some(timings.fall_wait),
                );
            }
            ControllerState::Resolving(Phase::Falling) => {
                self.refill_top();
                self.enter(
                    ControllerState::Resolving(Phase::Refilling),
                    Some(timings.refill_wait),
                );
            }
            ControllerState::Resolving(Phase::Refilling) => self.evaluate_and_settle(),
            ControllerState::Resolving(Phase::TearingDown) => {
                self.destroy_doomed();
                // The teardown animation already used part of the delay.
                let rest = (timings.board_delay - timings.removal).max(0.0);
                self.enter(ControllerState::Resolving(Phase::Rebuilding), Some(rest));
            }
            ControllerState::Resolving(Phase::Rebuilding) => {
                self.build_board(true);
                self.evaluate_and_settle();
            }
            ControllerState::Evaluating => self.enter(ControllerState::Idle, None),
            ControllerState::Idle => {}
        }
    }

    /// Replaces the grid with a fully random board.
    fn build_board(&mut self, animated: bool) {
        self.grid = Grid::new(self.config.rows, self.config.columns);
        let spawned = refill(
            &mut self.grid,
            &mut self.colors,
            self.config.colors,
            &mut self.ids,
        );

        let layout = self.config.layout;
        for tile in spawned.iter().map(|s| s.tile) {
            let position = layout.world_position(tile.pos);
            if animated {
                self.visuals
                    .spawn_at(tile.id, tile.color, position, layout.min_scale);
                self.visuals
                    .animate_scale_to(tile.id, 1.0, self.config.timings.creation);
            } else {
                self.visuals.spawn_at(tile.id, tile.color, position, 1.0);
            }
        }
        debug!("built {}x{} board", self.grid.rows(), self.grid.columns());
    }

    /// Runs the match evaluator and reports every tier that changed.
    fn evaluate_board(&mut self) -> Evaluation {
        let before: Vec<RewardTier> = self.grid.tiles().map(|t| t.tier).collect();
        let evaluation = evaluate(&mut self.grid, &self.rules);

        for (tile, old) in self.grid.tiles().zip(before) {
            if tile.tier != old {
                self.visuals.set_reward_tier(tile.id, tile.tier);
            }
        }

        debug!(
            "evaluation: {} row seed(s), {} column seed(s)",
            evaluation.row_seeds, evaluation.column_seeds
        );
        self.last_evaluation = evaluation;
        evaluation
    }

    fn evaluate_and_settle(&mut self) {
        if self.evaluate_board().any_match() {
            self.enter(ControllerState::Evaluating, Some(self.config.timings.settle));
        } else {
            self.begin_reshuffle();
        }
    }

    /// Clears a board that has no match left and schedules its replacement.
    fn begin_reshuffle(&mut self) {
        self.reshuffles += 1;
        info!("no match on the board, reshuffling (#{})", self.reshuffles);

        let positions: Vec<GridPos> = self.grid.positions().collect();
        for pos in positions {
            self.remove_animated(pos);
        }
        self.enter(
            ControllerState::Resolving(Phase::TearingDown),
            Some(self.config.timings.removal),
        );
    }

    /// Takes a tile off the grid and starts its shrink animation.
    fn remove_animated(&mut self, pos: GridPos) {
        if let Some(tile) = self.grid.take(pos) {
            self.visuals.animate_scale_to(
                tile.id,
                self.config.layout.min_scale,
                self.config.timings.removal,
            );
            self.doomed.push(tile.id);
        }
    }

    fn destroy_doomed(&mut self) {
        for id in self.doomed.drain(..) {
            self.visuals.destroy(id);
        }
    }

    fn drop_tiles(&mut self) {
        let layout = self.config.layout;
        let falls = compact(&mut self.grid);
        for fall in &falls {
            let from = layout.world_position(fall.from);
            let to = layout.world_position(fall.to);
            let duration = self.config.timings.fall_duration(layout.distance(from, to));
            self.visuals.animate_move_to(fall.id, to, duration);
        }
        debug!("{} tile(s) fell", falls.len());
    }

    fn refill_top(&mut self) {
        let layout = self.config.layout;
        let spawned = refill(
            &mut self.grid,
            &mut self.colors,
            self.config.colors,
            &mut self.ids,
        );
        for s in &spawned {
            let start = layout.spawn_position(s.tile.pos, s.drop_rows);
            let end = layout.world_position(s.tile.pos);
            let duration = self.config.timings.fall_duration(layout.distance(start, end));
            self.visuals.spawn_at(s.tile.id, s.tile.color, start, 1.0);
            self.visuals.animate_move_to(s.tile.id, end, duration);
        }
        debug!("refilled {} slot(s)", spawned.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Layout, Timings, TierThresholds};
    use crate::grid::Color;
    use crate::rng::{RandomColors, ScriptedColors};
    use crate::utils::grid_to_strings;
    use crate::visual::{CommandLog, VisualCommand};
    use glam::Vec2;

    fn test_config(rows: usize, columns: usize, colors: usize, min_blast: usize) -> BoardConfig {
        BoardConfig {
            rows,
            columns,
            colors,
            min_blast,
            thresholds: TierThresholds { a: 2, b: 4, c: 6 },
            layout: Layout {
                tile_size: Vec2::new(100.0, 100.0),
                origin: Vec2::ZERO,
                min_scale: 0.1,
            },
            timings: Timings {
                creation: 0.3,
                removal: 0.2,
                fall_speed: 1000.0,
                fall_wait: 0.4,
                board_delay: 1.0,
                refill_wait: 0.5,
                settle: 0.5,
            },
        }
    }

    fn scripted(
        config: BoardConfig,
        script: &str,
    ) -> BoardController<ScriptedColors, CommandLog> {
        let colors = ScriptedColors::from_chars(script).unwrap();
        BoardController::new(config, colors, CommandLog::new()).unwrap()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_new_builds_full_board_and_goes_idle() {
        let controller = BoardController::new(
            test_config(4, 4, 1, 2),
            RandomColors::seeded(1),
            CommandLog::new(),
        )
        .unwrap();

        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.input_enabled());
        assert_eq!(controller.pending_wait(), None);
        assert!(controller.grid().is_full());
        assert!(controller.grid().tiles().all(|t| t.tier == RewardTier::C));

        let summary = controller.visuals().summary();
        assert_eq!(summary.spawned, 16);
        assert_eq!(summary.tier_changes, 16);
        assert!(controller.visuals().commands().iter().all(|c| match c {
            VisualCommand::SpawnAt { scale, .. } => *scale == 1.0,
            _ => true,
        }));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = BoardController::new(
            test_config(0, 4, 1, 2),
            RandomColors::seeded(1),
            CommandLog::new(),
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_single_color_board_full_turn() {
        let mut controller = BoardController::new(
            test_config(4, 4, 1, 2),
            RandomColors::seeded(2),
            CommandLog::new(),
        )
        .unwrap();
        controller.visuals_mut().drain();

        assert_eq!(
            controller.click(GridPos::new(1, 2)),
            ClickOutcome::Blasted { size: 16 }
        );
        assert_eq!(controller.state(), ControllerState::Resolving(Phase::Removing));
        assert!(controller.grid().is_empty());
        let summary = controller.visuals().summary();
        assert_eq!(summary.scaled, 16);
        assert_eq!(summary.destroyed, 0, "tiles are destroyed after shrinking");

        controller.advance(0.2);
        assert_eq!(controller.state(), ControllerState::Resolving(Phase::Falling));
        assert_eq!(controller.visuals().summary().destroyed, 16);
        assert!(controller.grid().is_empty(), "nothing left to fall");

        controller.advance(0.4);
        assert_eq!(controller.state(), ControllerState::Resolving(Phase::Refilling));
        assert!(controller.grid().is_full());
        assert!(controller.grid().tiles().all(|t| t.color == Color::Red));

        controller.advance(0.5);
        assert_eq!(controller.state(), ControllerState::Evaluating);
        assert!(!controller.input_enabled());

        controller.advance(0.5);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.reshuffles(), 0);
    }

    #[test]
    fn test_clicks_ignored_while_locked() {
        let mut controller = BoardController::new(
            test_config(3, 3, 1, 2),
            RandomColors::seeded(3),
            CommandLog::new(),
        )
        .unwrap();
        assert!(matches!(
            controller.click(GridPos::new(0, 0)),
            ClickOutcome::Blasted { .. }
        ));

        controller.advance(0.1);
        assert_eq!(
            controller.click(GridPos::new(0, 0)),
            ClickOutcome::Ignored(IgnoreReason::Locked)
        );
        assert_eq!(controller.state(), ControllerState::Resolving(Phase::Removing));
        assert!(approx(controller.pending_wait().unwrap(), 0.1));

        controller.run_until_idle();
        assert!(controller.input_enabled());
    }

    #[test]
    fn test_advance_carries_leftover_time_across_phases() {
        let mut controller = BoardController::new(
            test_config(3, 3, 1, 2),
            RandomColors::seeded(4),
            CommandLog::new(),
        )
        .unwrap();
        controller.click(GridPos::new(2, 2));
        // 0.2 removal + 0.4 fall wait, then 0.1 into the refill wait.
        controller.advance(0.7);
        assert_eq!(controller.state(), ControllerState::Resolving(Phase::Refilling));
        assert!(approx(controller.pending_wait().unwrap(), 0.4));

        controller.advance(10.0);
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[test]
    fn test_three_by_three_run_blast() {
        //   x=0: R R R
        //   x=1: G B Y
        //   x=2: B Y G
        let mut controller = scripted(test_config(3, 3, 6, 3), "RRRGBYBYG");
        assert_eq!(
            grid_to_strings(controller.grid()),
            vec!["RRR", "GBY", "BYG"]
        );
        assert_eq!(controller.state(), ControllerState::Idle);
        for y in 0..3 {
            let tile = controller.grid().get(GridPos::new(0, y)).unwrap();
            assert_eq!(tile.tier, RewardTier::A);
        }

        assert_eq!(
            controller.click(GridPos::new(1, 0)),
            ClickOutcome::Ignored(IgnoreReason::TooSmall { size: 1 })
        );
        assert_eq!(controller.state(), ControllerState::Idle);

        assert_eq!(
            controller.click(GridPos::new(0, 1)),
            ClickOutcome::Blasted { size: 3 }
        );
        controller.run_until_idle();

        // The script wraps around, so the refilled row is red again.
        assert_eq!(
            grid_to_strings(controller.grid()),
            vec!["RRR", "GBY", "BYG"]
        );
        assert_eq!(controller.reshuffles(), 0);
    }

    #[test]
    fn test_click_on_missing_tile_is_ignored() {
        let mut controller = BoardController::new(
            test_config(2, 2, 1, 2),
            RandomColors::seeded(5),
            CommandLog::new(),
        )
        .unwrap();
        assert_eq!(
            controller.handle(BoardEvent::TileClicked(GridPos::new(5, 5))),
            ClickOutcome::Ignored(IgnoreReason::NoTile)
        );
        assert!(controller.input_enabled());
    }

    #[test]
    fn test_falls_and_refill_animations() {
        // One row of three: R R G, bottom to top.
        let mut controller = scripted(test_config(1, 3, 6, 2), "RRGBY");
        controller.visuals_mut().drain();
        let green = controller.grid().get(GridPos::new(0, 2)).unwrap().id;

        assert_eq!(
            controller.click(GridPos::new(0, 0)),
            ClickOutcome::Blasted { size: 2 }
        );
        controller.visuals_mut().drain();

        controller.advance(0.2);
        let commands = controller.visuals_mut().drain();
        let moves: Vec<_> = commands
            .iter()
            .filter_map(|c| match *c {
                VisualCommand::AnimateMoveTo { id, position, duration } => {
                    Some((id, position, duration))
                }
                _ => None,
            })
            .collect();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].0, green);
        assert_eq!(moves[0].1, Vec2::new(0.0, 0.0));
        assert!(approx(moves[0].2, 0.2), "200 units at 1000 units/s");
        assert_eq!(controller.grid().get(GridPos::new(0, 0)).map(|t| t.id), Some(green));

        controller.advance(0.4);
        let commands = controller.visuals_mut().drain();
        let spawns: Vec<_> = commands
            .iter()
            .filter_map(|c| match *c {
                VisualCommand::SpawnAt { color, position, .. } => Some((color, position)),
                _ => None,
            })
            .collect();
        // y = 1 starts (3 - 1) + 1 slots above its slot, y = 2 starts (3 - 2) + 1 above.
        assert_eq!(
            spawns,
            vec![
                (Color::Blue, Vec2::new(0.0, 400.0)),
                (Color::Yellow, Vec2::new(0.0, 400.0)),
            ]
        );
        assert_eq!(grid_to_strings(controller.grid()), vec!["GBY"]);

        // G B Y holds no pair, so evaluation triggers a reshuffle.
        controller.advance(0.5);
        assert_eq!(
            controller.state(),
            ControllerState::Resolving(Phase::TearingDown)
        );
        assert_eq!(controller.reshuffles(), 1);
        assert!(controller.grid().is_empty());

        controller.run_until_idle();
        assert_eq!(grid_to_strings(controller.grid()), vec!["RRG"]);
        assert!(controller.input_enabled());
    }

    #[test]
    fn test_dead_first_board_reshuffles() {
        // First board R G / G R has no pair; the next one is all red.
        let mut controller = scripted(test_config(2, 2, 2, 2), "RGGRRRRR");
        assert_eq!(controller.reshuffles(), 1);
        assert_eq!(
            controller.state(),
            ControllerState::Resolving(Phase::TearingDown)
        );
        assert!(!controller.input_enabled());
        assert_eq!(
            controller.click(GridPos::new(0, 0)),
            ClickOutcome::Ignored(IgnoreReason::Locked)
        );
        controller.visuals_mut().drain();

        controller.advance(0.2);
        assert_eq!(
            controller.state(),
            ControllerState::Resolving(Phase::Rebuilding)
        );
        assert_eq!(controller.visuals().summary().destroyed, 4);
        assert!(approx(controller.pending_wait().unwrap(), 0.8));

        controller.advance(0.9);
        assert_eq!(controller.state(), ControllerState::Evaluating);
        assert!(approx(controller.pending_wait().unwrap(), 0.4));
        assert_eq!(controller.grid().rows(), 2);
        assert_eq!(controller.grid().columns(), 2);
        assert!(controller.grid().is_full());
        assert_eq!(grid_to_strings(controller.grid()), vec!["RR", "RR"]);

        let summary = controller.visuals().summary();
        assert_eq!(summary.spawned, 4);
        assert!(controller.visuals().commands().iter().any(|c| matches!(
            c,
            VisualCommand::AnimateScaleTo { scale, duration, .. }
                if *scale == 1.0 && approx(*duration, 0.3)
        )));

        controller.advance(0.45);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.reshuffles(), 1);
    }

    #[test]
    fn test_tile_ids_stay_unique_across_turns() {
        let mut controller = BoardController::new(
            test_config(5, 5, 2, 2),
            RandomColors::seeded(11),
            CommandLog::new(),
        )
        .unwrap();
        let mut seen = std::collections::HashSet::new();
        for tile in controller.grid().tiles() {
            seen.insert(tile.id);
        }
        controller.visuals_mut().drain();
        for _ in 0..10 {
            let target = crate::evaluator::largest_region(controller.grid()).unwrap()[0];
            controller.click(target);
            controller.run_until_idle();
            for tile in controller.grid().tiles() {
                assert_eq!(controller.grid().get(tile.pos).map(|t| t.id), Some(tile.id));
            }
            let spawned: Vec<TileId> = controller
                .visuals_mut()
                .drain()
                .into_iter()
                .filter_map(|c| match c {
                    VisualCommand::SpawnAt { id, .. } => Some(id),
                    _ => None,
                })
                .collect();
            for id in spawned {
                assert!(seen.insert(id), "tile id {id:?} reused");
            }
        }
    }

    #[test]
    fn test_zero_dt_fires_zero_length_waits() {
        let mut config = test_config(2, 2, 1, 2);
        config.timings = Timings {
            creation: 0.0,
            removal: 0.0,
            fall_speed: 1.0,
            fall_wait: 0.0,
            board_delay: 0.0,
            refill_wait: 0.0,
            settle: 0.0,
        };
        let mut controller =
            BoardController::new(config, RandomColors::seeded(6), CommandLog::new()).unwrap();
        controller.click(GridPos::new(0, 0));
        controller.advance(0.0);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.grid().is_full());
    }
}
