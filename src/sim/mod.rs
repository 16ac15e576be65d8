//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, constants in pixels/frame
//! - Injected RNG only
//! - Stable iteration order (player, meteor slots by index, bullets by firing order)
//! - No rendering or platform dependencies

pub mod background;
pub mod collision;
pub mod obstacle;
pub mod player;
pub mod projectile;
pub mod rect;
pub mod state;
pub mod tick;

pub use background::ScrollingBackground;
pub use collision::{check_termination, resolve_collisions, resolve_player_hits, resolve_projectile_hits};
pub use obstacle::{Obstacle, ObstaclePool, ObstacleState, SlotId};
pub use player::{Facing, Player};
pub use projectile::{Projectile, Tint};
pub use rect::Rect;
pub use state::{
    Body, DrawItem, GameEvent, GamePhase, GameState, SessionState, SpriteKey, StepContext,
    TerminationReason,
};
pub use tick::{TickInput, tick};
