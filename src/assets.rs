//! Sprite loading
//!
//! Sprites are plain-text art: each line is a row of cells, spaces are
//! transparent. A decoded `Image` is scaled to its on-screen logical size
//! and sampled nearest-neighbour by whichever surface draws it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::GameConfig;
use crate::sim::{Facing, SpriteKey, Tint};

/// 24-bit colour
pub type Rgb = (u8, u8, u8);

const TINT_BACKGROUND: Rgb = (40, 40, 90);
const TINT_PLAYER: Rgb = (230, 230, 230);
const TINT_METEOR: Rgb = (200, 110, 40);
const TINT_CHEESE: Rgb = (250, 210, 60);
const TINT_BULLET_RED: Rgb = (230, 50, 50);
const TINT_BULLET_GREEN: Rgb = (60, 220, 90);

/// Errors raised while loading required sprites
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("required asset missing: {path}")]
    Missing { path: PathBuf },
    #[error("failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset {path} contains no image data")]
    Empty { path: PathBuf },
}

/// A decoded sprite
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Logical width (pixels)
    pub width: u32,
    /// Logical height (pixels)
    pub height: u32,
    pub tint: Rgb,
    src_width: usize,
    src_height: usize,
    cells: Vec<char>,
}

impl Image {
    /// Decode text art. Short rows are padded with transparent cells.
    /// Returns `None` if there is nothing visible.
    pub fn from_text(text: &str) -> Option<Self> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();
        let src_width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let src_height = rows.len();
        if src_width == 0 || rows.iter().flatten().all(|c| *c == ' ') {
            return None;
        }

        let mut cells = Vec::with_capacity(src_width * src_height);
        for row in &rows {
            cells.extend(row.iter().copied());
            cells.extend(std::iter::repeat_n(' ', src_width - row.len()));
        }

        Some(Self {
            width: src_width as u32,
            height: src_height as u32,
            tint: (255, 255, 255),
            src_width,
            src_height,
            cells,
        })
    }

    /// Same art stretched to a new logical size
    pub fn scaled(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_tint(mut self, tint: Rgb) -> Self {
        self.tint = tint;
        self
    }

    /// Source grid size (columns, rows)
    pub fn source_size(&self) -> (usize, usize) {
        (self.src_width, self.src_height)
    }

    /// Nearest-neighbour sample at normalised coordinates in [0, 1).
    /// `None` means transparent.
    pub fn sample(&self, u: f32, v: f32) -> Option<char> {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        let col = ((u * self.src_width as f32) as usize).min(self.src_width - 1);
        let row = ((v * self.src_height as f32) as usize).min(self.src_height - 1);
        match self.cells[row * self.src_width + col] {
            ' ' => None,
            c => Some(c),
        }
    }
}

/// Source of decoded, scaled images
pub trait AssetLoader {
    fn load_image(&self, path: &Path, width: u32, height: u32) -> Result<Image, AssetError>;
}

/// Reads text-art sprites from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct TextArtLoader;

impl AssetLoader for TextArtLoader {
    fn load_image(&self, path: &Path, width: u32, height: u32) -> Result<Image, AssetError> {
        let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => AssetError::Missing {
                path: path.to_path_buf(),
            },
            _ => AssetError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let image = Image::from_text(&text).ok_or_else(|| AssetError::Empty {
            path: path.to_path_buf(),
        })?;
        log::debug!(
            "Loaded {} ({}x{} cells -> {}x{})",
            path.display(),
            image.src_width,
            image.src_height,
            width,
            height
        );
        Ok(image.scaled(width, height))
    }
}

/// Every sprite a session needs. All are required.
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub background: Image,
    pub player: Image,
    pub player_left: Image,
    pub player_right: Image,
    pub meteor: Image,
    pub cheese: Image,
    pub bullet_red: Image,
    pub bullet_green: Image,
}

impl SpriteSet {
    /// Load and scale every sprite; the first missing one aborts
    pub fn load(loader: &dyn AssetLoader, config: &GameConfig) -> Result<Self, AssetError> {
        let paths = &config.assets;
        let screen = (config.screen_width as u32, config.tile_height as u32);
        let player = (config.player_width as u32, config.player_height as u32);
        let obstacle = (config.obstacle_width as u32, config.obstacle_height as u32);
        let bullet = (
            config.projectile_width as u32,
            config.projectile_height as u32,
        );

        let load = |path: &Path, (w, h): (u32, u32), tint: Rgb| {
            loader
                .load_image(path, w, h)
                .map(|image| image.with_tint(tint))
        };

        let sprites = Self {
            background: load(&paths.background, screen, TINT_BACKGROUND)?,
            player: load(&paths.player, player, TINT_PLAYER)?,
            player_left: load(&paths.player_left, player, TINT_PLAYER)?,
            player_right: load(&paths.player_right, player, TINT_PLAYER)?,
            meteor: load(&paths.meteor, obstacle, TINT_METEOR)?,
            cheese: load(&paths.cheese, obstacle, TINT_CHEESE)?,
            bullet_red: load(&paths.bullet_red, bullet, TINT_BULLET_RED)?,
            bullet_green: load(&paths.bullet_green, bullet, TINT_BULLET_GREEN)?,
        };
        log::info!("Loaded 8 sprites");
        Ok(sprites)
    }

    /// Image for a body's current visual state
    pub fn image(&self, key: SpriteKey) -> &Image {
        match key {
            SpriteKey::Player(Facing::Neutral) => &self.player,
            SpriteKey::Player(Facing::Left) => &self.player_left,
            SpriteKey::Player(Facing::Right) => &self.player_right,
            SpriteKey::Meteor => &self.meteor,
            SpriteKey::Cheese => &self.cheese,
            SpriteKey::Bullet(Tint::Red) => &self.bullet_red,
            SpriteKey::Bullet(Tint::Green) => &self.bullet_green,
        }
    }
}
