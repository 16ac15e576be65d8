//! Meteor Run - dodge falling meteors, shoot them into cheese, catch the cheese
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle lifecycle, collisions, game state)
//! - `config`: Immutable game configuration built once at startup
//! - `game`: Fixed-order frame orchestrator
//! - `renderer`: Immediate-mode draw pass (background, entities, HUD)
//! - `platform`: Input, display surface and frame pacing (terminal + headless)
//! - `assets` / `audio`: Sprite loading and background music

pub mod assets;
pub mod audio;
pub mod config;
pub mod game;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, GameConfig, Variant};
pub use game::{Game, GameError, RunSummary};

/// Game configuration constants
pub mod consts {
    /// Logical screen resolution
    pub const SCREEN_WIDTH: f32 = 1000.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Player sprite size (pixels)
    pub const PLAYER_WIDTH: f32 = 100.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    /// Horizontal speed (pixels/frame)
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Upward velocity applied when a jump starts (pixels/frame)
    pub const JUMP_IMPULSE: f32 = 15.0;
    /// Added to vertical velocity every airborne frame
    pub const GRAVITY: f32 = 1.0;

    /// Lives
    pub const START_LIVES: i32 = 10;
    pub const MAX_LIVES: i32 = 10;
    /// Lives lost per meteor hit
    pub const HAZARD_DAMAGE: i32 = 2;
    /// Lives restored per cheese caught
    pub const COLLECTIBLE_HEAL: i32 = 1;

    /// Meteor sprite size and fall speed
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const OBSTACLE_HEIGHT: f32 = 50.0;
    pub const FALL_SPEED: f32 = 5.0;

    /// Bullet sprite size and rise speed
    pub const PROJECTILE_WIDTH: f32 = 20.0;
    pub const PROJECTILE_HEIGHT: f32 = 30.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;

    /// Background scroll (pixels/frame)
    pub const SCROLL_SPEED: f32 = 2.0;

    /// Music volume (0.0 - 1.0)
    pub const MUSIC_VOLUME: f32 = 0.03;
    /// Pause before the first frame
    pub const START_DELAY_MS: u64 = 1000;
}
