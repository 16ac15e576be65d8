//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives here: the player, the meteor
//! pool, live bullets, the background scroll and the session record.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::background::ScrollingBackground;
use super::obstacle::{ObstaclePool, SlotId};
use super::player::{Facing, Player};
use super::projectile::{Projectile, Tint};
use super::rect::Rect;
use super::tick::TickInput;
use crate::config::GameConfig;

/// Per-frame context handed to every body's `update`
pub struct StepContext<'a> {
    pub config: &'a GameConfig,
    pub input: &'a TickInput,
    pub rng: &'a mut dyn RngCore,
}

/// Anything the orchestrator moves and draws each frame
pub trait Body {
    fn update(&mut self, ctx: &mut StepContext<'_>);
    fn bounding_box(&self) -> Rect;
    fn sprite(&self) -> SpriteKey;
}

/// Which image to draw for a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKey {
    Player(Facing),
    Meteor,
    Cheese,
    Bullet(Tint),
}

/// A body ready to be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub sprite: SpriteKey,
    pub rect: Rect,
}

/// Run state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Absorbing: nothing re-enters `Running`
    Terminated,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    LivesDepleted,
    QuitRequested,
}

/// Things that happened during a tick (for logging and tests)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ProjectileFired { id: u32 },
    ObstacleNeutralized { slot: SlotId, projectile: u32 },
    CollectibleCaught { slot: SlotId, lives: i32 },
    HazardHit { slot: SlotId, lives: i32 },
    Terminated { reason: TerminationReason },
}

/// The session record: run flag plus a mirror of the player's lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: GamePhase,
    pub lives: i32,
    pub reason: Option<TerminationReason>,
}

impl SessionState {
    pub fn new(lives: i32) -> Self {
        Self {
            phase: GamePhase::Running,
            lives,
            reason: None,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Running -> Terminated. Returns false if already terminated.
    pub fn terminate(&mut self, reason: TerminationReason) -> bool {
        if !self.is_running() {
            return false;
        }
        self.phase = GamePhase::Terminated;
        self.reason = Some(reason);
        true
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Simulation frame counter
    pub frame: u64,
    pub session: SessionState,
    pub player: Player,
    pub obstacles: ObstaclePool,
    /// Live bullets, in firing order
    pub projectiles: Vec<Projectile>,
    pub background: ScrollingBackground,
    /// Next projectile ID
    next_id: u32,
}

impl GameState {
    /// Fresh session: full lives, meteors scattered above the screen
    pub fn new(config: &GameConfig, rng: &mut dyn RngCore) -> Self {
        let player = Player::new(config);
        Self {
            frame: 0,
            session: SessionState::new(player.lives),
            player,
            obstacles: ObstaclePool::new(config, rng),
            projectiles: Vec::new(),
            background: ScrollingBackground::new(config),
            next_id: 1,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// Allocate a new projectile ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a bullet at the player's muzzle
    pub fn fire_projectile(&mut self, config: &GameConfig, rng: &mut dyn RngCore) -> u32 {
        let id = self.next_entity_id();
        let muzzle = self.player.muzzle();
        self.projectiles
            .push(Projectile::fire(id, muzzle, config, rng));
        id
    }

    /// All bodies in update/draw order: player, meteors, bullets
    pub fn bodies(&self) -> impl Iterator<Item = &dyn Body> {
        std::iter::once(&self.player as &dyn Body)
            .chain(self.obstacles.iter().map(|o| o as &dyn Body))
            .chain(self.projectiles.iter().map(|p| p as &dyn Body))
    }

    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut dyn Body> {
        std::iter::once(&mut self.player as &mut dyn Body)
            .chain(self.obstacles.iter_mut().map(|o| o as &mut dyn Body))
            .chain(self.projectiles.iter_mut().map(|p| p as &mut dyn Body))
    }

    /// Move every body one frame, then drop bullets that left the screen
    pub fn update_bodies(&mut self, ctx: &mut StepContext<'_>) {
        for body in self.bodies_mut() {
            body.update(ctx);
        }
        self.projectiles.retain(Projectile::is_on_screen);
    }

    /// Snapshot of what to draw, in z-order
    pub fn draw_list(&self) -> Vec<DrawItem> {
        self.bodies()
            .map(|body| DrawItem {
                sprite: body.sprite(),
                rect: body.bounding_box(),
            })
            .collect()
    }

    /// Copy the player's lives into the session record
    pub fn sync_lives(&mut self) {
        self.session.lives = self.player.lives;
    }
}
