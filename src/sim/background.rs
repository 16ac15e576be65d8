//! Vertically scrolling, tiled background
//!
//! Purely cosmetic: never touches physics or collisions.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollingBackground {
    /// Current scroll offset, kept within one tile height
    pub offset: f32,
    /// Pixels per frame
    pub speed: f32,
    pub tile_height: f32,
    pub tile_count: usize,
}

impl ScrollingBackground {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            offset: 0.0,
            speed: config.scroll_speed,
            tile_height: config.tile_height,
            tile_count: config.tile_count(),
        }
    }

    /// Advance one frame, wrapping to zero after a full tile
    pub fn update(&mut self) {
        self.offset += self.speed;
        if self.offset.abs() >= self.tile_height {
            self.offset = 0.0;
        }
    }

    /// Y coordinate of every tile to blit, top to bottom
    pub fn tile_positions(&self) -> impl Iterator<Item = f32> + '_ {
        (-1..self.tile_count as i32).map(move |i| i as f32 * self.tile_height + self.offset)
    }
}
