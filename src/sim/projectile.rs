//! Bullets fired upward from the player

use glam::Vec2;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Body, SpriteKey, StepContext};
use crate::config::GameConfig;

/// Bullet colour, picked when fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Red,
    Green,
}

/// A rising bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub rect: Rect,
    /// Upward speed (pixels/frame)
    pub speed: f32,
    pub tint: Tint,
}

impl Projectile {
    /// New bullet centred on the muzzle point
    pub fn fire(id: u32, muzzle: Vec2, config: &GameConfig, rng: &mut dyn RngCore) -> Self {
        let tint = if rng.random_bool(0.5) {
            Tint::Red
        } else {
            Tint::Green
        };
        Self {
            id,
            rect: Rect::from_center(
                muzzle,
                Vec2::new(config.projectile_width, config.projectile_height),
            ),
            speed: config.projectile_speed,
            tint,
        }
    }

    /// Still (partly) visible: bottom edge at or below the top of the screen
    #[inline]
    pub fn is_on_screen(&self) -> bool {
        self.rect.bottom() >= 0.0
    }
}

impl Body for Projectile {
    fn update(&mut self, _ctx: &mut StepContext<'_>) {
        self.rect.pos.y -= self.speed;
    }

    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteKey {
        SpriteKey::Bullet(self.tint)
    }
}
