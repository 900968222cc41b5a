//! The boundary to whatever draws the tiles.
//!
//! The engine never renders. It tells a [`TileVisuals`] implementation what
//! happened to each tile, keyed by [`TileId`], and the host turns those
//! commands into sprites, tweens or terminal output.

use glam::Vec2;

use crate::grid::{Color, RewardTier, TileId};

/// Receives per-tile presentation commands from the board controller.
pub trait TileVisuals {
    /// A new tile appears at `position` with the given starting `scale`.
    fn spawn_at(&mut self, id: TileId, color: Color, position: Vec2, scale: f32);

    /// The tile's reward tier changed; swap its icon.
    fn set_reward_tier(&mut self, id: TileId, tier: RewardTier);

    /// Tween the tile's scale to `scale` over `duration` seconds.
    fn animate_scale_to(&mut self, id: TileId, scale: f32, duration: f32);

    /// Tween the tile to `position` over `duration` seconds.
    fn animate_move_to(&mut self, id: TileId, position: Vec2, duration: f32);

    /// The tile is gone for good.
    fn destroy(&mut self, id: TileId);
}

/// One recorded call on [`TileVisuals`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VisualCommand {
    SpawnAt {
        id: TileId,
        color: Color,
        position: Vec2,
        scale: f32,
    },
    SetRewardTier {
        id: TileId,
        tier: RewardTier,
    },
    AnimateScaleTo {
        id: TileId,
        scale: f32,
        duration: f32,
    },
    AnimateMoveTo {
        id: TileId,
        position: Vec2,
        duration: f32,
    },
    Destroy {
        id: TileId,
    },
}

impl VisualCommand {
    /// The tile this command addresses.
    pub fn id(&self) -> TileId {
        match *self {
            VisualCommand::SpawnAt { id, .. }
            | VisualCommand::SetRewardTier { id, .. }
            | VisualCommand::AnimateScaleTo { id, .. }
            | VisualCommand::AnimateMoveTo { id, .. }
            | VisualCommand::Destroy { id } => id,
        }
    }
}

/// A [`TileVisuals`] that records every command in order.
#[derive(Clone, Debug, Default)]
pub struct CommandLog {
    commands: Vec<VisualCommand>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[VisualCommand] {
        &self.commands
    }

    /// Takes every command recorded so far, leaving the log empty.
    pub fn drain(&mut self) -> Vec<VisualCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Counts the recorded commands by kind.
    pub fn summary(&self) -> CommandSummary {
        let mut summary = CommandSummary::default();
        for command in &self.commands {
            match command {
                VisualCommand::SpawnAt { .. } => summary.spawned += 1,
                VisualCommand::SetRewardTier { .. } => summary.tier_changes += 1,
                VisualCommand::AnimateScaleTo { .. } => summary.scaled += 1,
                VisualCommand::AnimateMoveTo { .. } => summary.moved += 1,
                VisualCommand::Destroy { .. } => summary.destroyed += 1,
            }
        }
        summary
    }
}

impl TileVisuals for CommandLog {
    fn spawn_at(&mut self, id: TileId, color: Color, position: Vec2, scale: f32) {
        self.commands.push(VisualCommand::SpawnAt {
            id,
            color,
            position,
            scale,
        });
    }

    fn set_reward_tier(&mut self, id: TileId, tier: RewardTier) {
        self.commands.push(VisualCommand::SetRewardTier { id, tier });
    }

    fn animate_scale_to(&mut self, id: TileId, scale: f32, duration: f32) {
        self.commands.push(VisualCommand::AnimateScaleTo {
            id,
            scale,
            duration,
        });
    }

    fn animate_move_to(&mut self, id: TileId, position: Vec2, duration: f32) {
        self.commands.push(VisualCommand::AnimateMoveTo {
            id,
            position,
            duration,
        });
    }

    fn destroy(&mut self, id: TileId) {
        self.commands.push(VisualCommand::Destroy { id });
    }
}

/// Counts of recorded commands by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommandSummary {
    pub spawned: usize,
    pub tier_changes: usize,
    pub scaled: usize,
    pub moved: usize,
    pub destroyed: usize,
}
