//! Game configuration
//!
//! Built once at startup, validated, then passed by reference into every
//! component. Nothing reads screen size or speed constants from globals.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Smallest background tile accepted (pixels)
const MIN_TILE_HEIGHT: f32 = 1.0;

/// Game variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// 7 meteors, 60 fps
    #[default]
    Classic,
    /// 10 meteors, 80 fps
    Arcade,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Arcade => "Arcade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "arcade" => Some(Variant::Arcade),
            _ => None,
        }
    }

    /// Meteor pool size for this preset
    pub fn obstacle_count(&self) -> usize {
        match self {
            Variant::Classic => 7,
            Variant::Arcade => 10,
        }
    }

    /// Frame rate for this preset
    pub fn target_fps(&self) -> u32 {
        match self {
            Variant::Classic => 60,
            Variant::Arcade => 80,
        }
    }
}

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Sprite and music locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub background: PathBuf,
    pub player: PathBuf,
    pub player_left: PathBuf,
    pub player_right: PathBuf,
    pub meteor: PathBuf,
    pub cheese: PathBuf,
    pub bullet_red: PathBuf,
    pub bullet_green: PathBuf,
    /// Optional: the game runs silently without it
    pub music: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::in_dir("assets")
    }
}

impl AssetPaths {
    /// Standard file names under `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            background: dir.join("background.txt"),
            player: dir.join("player.txt"),
            player_left: dir.join("player_left.txt"),
            player_right: dir.join("player_right.txt"),
            meteor: dir.join("meteor.txt"),
            cheese: dir.join("cheese.txt"),
            bullet_red: dir.join("bullet_red.txt"),
            bullet_green: dir.join("bullet_green.txt"),
            music: dir.join("music").join("tune_1.mp3"),
        }
    }
}

/// Immutable game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Preset supplying pool size and frame rate unless overridden
    pub variant: Variant,

    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
    pub start_lives: i32,
    pub max_lives: i32,
    /// Lives lost per meteor hit. Applied once per overlapping meteor.
    pub hazard_damage: i32,
    pub collectible_heal: i32,

    // === Meteors ===
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub fall_speed: f32,
    /// Overrides the variant's pool size
    pub obstacle_count: Option<usize>,

    // === Bullets ===
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,

    // === Background ===
    pub scroll_speed: f32,
    pub tile_height: f32,

    // === Pacing ===
    /// Overrides the variant's frame rate
    pub target_fps: Option<u32>,
    pub start_delay_ms: u64,

    // === Audio ===
    pub music_volume: f32,

    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,

    pub assets: AssetPaths,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            jump_impulse: JUMP_IMPULSE,
            gravity: GRAVITY,
            start_lives: START_LIVES,
            max_lives: MAX_LIVES,
            hazard_damage: HAZARD_DAMAGE,
            collectible_heal: COLLECTIBLE_HEAL,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            fall_speed: FALL_SPEED,
            obstacle_count: None,

            projectile_width: PROJECTILE_WIDTH,
            projectile_height: PROJECTILE_HEIGHT,
            projectile_speed: PROJECTILE_SPEED,

            scroll_speed: SCROLL_SPEED,
            tile_height: SCREEN_HEIGHT,

            target_fps: None,
            start_delay_ms: START_DELAY_MS,

            music_volume: MUSIC_VOLUME,

            seed: None,

            assets: AssetPaths::default(),
        }
    }
}

impl GameConfig {
    /// Create a config from a variant preset
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the simulation cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return invalid(format!(
                "screen size {}x{} must be positive",
                self.screen_width, self.screen_height
            ));
        }
        if self.player_width > self.screen_width || self.player_height > self.screen_height {
            return invalid("player does not fit on screen".to_string());
        }
        if self.obstacle_width > self.screen_width {
            return invalid(format!(
                "obstacle width {} exceeds screen width {}",
                self.obstacle_width, self.screen_width
            ));
        }
        if self.max_lives < 1 || self.max_lives > MAX_LIVES {
            return invalid(format!("max_lives {} must be in 1..={}", self.max_lives, MAX_LIVES));
        }
        if self.start_lives < 1 || self.start_lives > self.max_lives {
            return invalid(format!(
                "start_lives {} must be in 1..={}",
                self.start_lives, self.max_lives
            ));
        }
        if !(0..=self.max_lives).contains(&self.hazard_damage) {
            return invalid(format!(
                "hazard_damage {} must be in 0..={}",
                self.hazard_damage, self.max_lives
            ));
        }
        if !(0..=self.max_lives).contains(&self.collectible_heal) {
            return invalid(format!(
                "collectible_heal {} must be in 0..={}",
                self.collectible_heal, self.max_lives
            ));
        }
        if self.pool_size() == 0 {
            return invalid("obstacle pool must not be empty".to_string());
        }
        if self.fps() == 0 {
            return invalid("target_fps must be positive".to_string());
        }
        if self.tile_height.is_nan() || self.tile_height < MIN_TILE_HEIGHT {
            return invalid(format!(
                "tile_height {} must be at least {}",
                self.tile_height, MIN_TILE_HEIGHT
            ));
        }
        if !(0.0..=1.0).contains(&self.music_volume) {
            return invalid(format!("music_volume {} must be in [0, 1]", self.music_volume));
        }
        Ok(())
    }

    /// Number of meteor slots
    pub fn pool_size(&self) -> usize {
        self.obstacle_count.unwrap_or(self.variant.obstacle_count())
    }

    /// Frames per second
    pub fn fps(&self) -> u32 {
        self.target_fps.unwrap_or(self.variant.target_fps())
    }

    /// Wall-clock length of one frame
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps().max(1) as f64)
    }

    /// The player's bottom edge rests on this line
    pub fn ground_line(&self) -> f32 {
        self.screen_height - self.player_height
    }

    /// Background tiles needed to cover the screen plus one spare
    pub fn tile_count(&self) -> usize {
        ((self.screen_height / self.tile_height).ceil() as usize).saturating_add(1)
    }

    /// Lowest lives value reachable in one frame (every meteor hits at once
    /// while the player is on a single life)
    pub fn min_reachable_lives(&self) -> i32 {
        let pool = i32::try_from(self.pool_size()).unwrap_or(i32::MAX);
        1i32.saturating_sub(self.hazard_damage.saturating_mul(pool))
    }
}
