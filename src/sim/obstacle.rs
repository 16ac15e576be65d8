//! Falling meteors and their fixed-capacity pool
//!
//! A meteor is either a `Hazard` (hurts the player) or `Neutralized` (cheese,
//! heals the player). Slots are never added or removed after the pool is
//! built: leaving the screen or touching the player recycles the slot in
//! place via `reset`.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Body, SpriteKey, StepContext};
use crate::config::GameConfig;

/// Meteor lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleState {
    #[default]
    Hazard,
    Neutralized,
}

/// Stable index of a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub usize);

/// A falling meteor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub slot: SlotId,
    pub rect: Rect,
    pub fall_speed: f32,
    pub state: ObstacleState,
    /// Times this slot has been recycled
    pub resets: u32,
}

impl Obstacle {
    /// Random position somewhere in the band above the screen
    pub fn spawn(slot: SlotId, config: &GameConfig, rng: &mut dyn RngCore) -> Self {
        let x = random_x(config, rng);
        let highest = -config.screen_height / 2.0 - config.obstacle_height;
        let y = rng.random_range(highest..=-config.obstacle_height);
        Self {
            slot,
            rect: Rect::new(x, y, config.obstacle_width, config.obstacle_height),
            fall_speed: config.fall_speed,
            state: ObstacleState::Hazard,
            resets: 0,
        }
    }

    #[inline]
    pub fn is_hazard(&self) -> bool {
        self.state == ObstacleState::Hazard
    }

    #[inline]
    pub fn is_neutralized(&self) -> bool {
        self.state == ObstacleState::Neutralized
    }

    /// Hazard -> Neutralized. Returns false if already neutralized.
    pub fn neutralize(&mut self) -> bool {
        if self.is_neutralized() {
            return false;
        }
        self.state = ObstacleState::Neutralized;
        true
    }

    /// Back above the screen at a new column, as a hazard again
    pub fn reset(&mut self, config: &GameConfig, rng: &mut dyn RngCore) {
        self.rect.set_bottom(0.0);
        self.rect.pos.x = random_x(config, rng);
        self.state = ObstacleState::Hazard;
        self.resets += 1;
    }

    /// Top edge has passed the bottom of the screen
    pub fn is_below_screen(&self, config: &GameConfig) -> bool {
        self.rect.top() > config.screen_height
    }
}

impl Body for Obstacle {
    fn update(&mut self, ctx: &mut StepContext<'_>) {
        self.rect.pos.y += self.fall_speed;
        if self.is_below_screen(ctx.config) {
            self.reset(ctx.config, ctx.rng);
        }
    }

    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteKey {
        match self.state {
            ObstacleState::Hazard => SpriteKey::Meteor,
            ObstacleState::Neutralized => SpriteKey::Cheese,
        }
    }
}

fn random_x(config: &GameConfig, rng: &mut dyn RngCore) -> f32 {
    let max_x = (config.screen_width - config.obstacle_width).max(0.0);
    rng.random_range(0.0..=max_x)
}

/// Fixed-size arena of meteor slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePool {
    slots: Vec<Obstacle>,
}

impl ObstaclePool {
    /// Fill every slot with a freshly spawned meteor
    pub fn new(config: &GameConfig, rng: &mut dyn RngCore) -> Self {
        let slots = (0..config.pool_size())
            .map(|i| Obstacle::spawn(SlotId(i), config, rng))
            .collect();
        Self { slots }
    }

    /// Build a pool from explicit meteors (slot ids are renumbered)
    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        let mut slots = obstacles;
        for (i, obstacle) in slots.iter_mut().enumerate() {
            obstacle.slot = SlotId(i);
        }
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: SlotId) -> Option<&Obstacle> {
        debug_assert!(slot.0 < self.slots.len(), "slot {} out of range", slot.0);
        self.slots.get(slot.0)
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut Obstacle> {
        debug_assert!(slot.0 < self.slots.len(), "slot {} out of range", slot.0);
        self.slots.get_mut(slot.0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Obstacle> {
        self.slots.iter_mut()
    }

    pub fn neutralized_count(&self) -> usize {
        self.slots.iter().filter(|o| o.is_neutralized()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_above_screen() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for i in 0..200 {
            let o = Obstacle::spawn(SlotId(i), &config, &mut rng);
            assert!(o.rect.bottom() <= 0.0);
            assert!(o.rect.top() >= -config.screen_height / 2.0 - config.obstacle_height);
            assert!(o.rect.left() >= 0.0);
            assert!(o.rect.right() <= config.screen_width);
            assert!(o.is_hazard());
        }
    }

    #[test]
    fn test_neutralize_once() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut o = Obstacle::spawn(SlotId(0), &config, &mut rng);
        assert!(o.neutralize());
        assert!(o.is_neutralized());
        assert!(!o.neutralize());
        assert_eq!(o.sprite(), SpriteKey::Cheese);
    }

    #[test]
    fn test_reset_restores_hazard_above_screen() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut o = Obstacle::spawn(SlotId(3), &config, &mut rng);
        o.rect.pos.y = 400.0;
        o.neutralize();
        o.reset(&config, &mut rng);
        assert!(o.is_hazard());
        assert_eq!(o.rect.bottom(), 0.0);
        assert_eq!(o.slot, SlotId(3));
        assert_eq!(o.resets, 1);
        assert_eq!(o.sprite(), SpriteKey::Meteor);
    }

    #[test]
    fn test_falls_and_wraps() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let input = crate::sim::TickInput::default();
        let mut o = Obstacle::spawn(SlotId(0), &config, &mut rng);
        o.rect.pos.y = 100.0;

        let mut ctx = StepContext {
            config: &config,
            input: &input,
            rng: &mut rng,
        };
        o.update(&mut ctx);
        assert_eq!(o.rect.top(), 105.0);

        o.rect.pos.y = config.screen_height - 2.0;
        o.neutralize();
        o.update(&mut ctx);
        assert!(o.is_hazard());
        assert_eq!(o.rect.bottom(), 0.0);
    }

    #[test]
    fn test_top_on_bottom_edge_is_not_reset() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut o = Obstacle::spawn(SlotId(0), &config, &mut rng);
        o.rect.pos.y = config.screen_height;
        assert!(!o.is_below_screen(&config));

        let input = crate::sim::TickInput::default();
        let mut ctx = StepContext {
            config: &config,
            input: &input,
            rng: &mut rng,
        };
        // Lands exactly on the edge: still in play
        o.rect.pos.y = config.screen_height - config.fall_speed;
        o.update(&mut ctx);
        assert_eq!(o.rect.top(), config.screen_height);
        assert_eq!(o.resets, 0);

        o.update(&mut ctx);
        assert_eq!(o.resets, 1);
        assert_eq!(o.rect.bottom(), 0.0);
    }

    #[test]
    fn test_pool_size_matches_config() {
        let config = GameConfig::for_variant(crate::config::Variant::Arcade);
        let mut rng = Pcg32::seed_from_u64(4);
        let pool = ObstaclePool::new(&config, &mut rng);
        assert_eq!(pool.len(), 10);
        for (i, o) in pool.iter().enumerate() {
            assert_eq!(o.slot, SlotId(i));
        }
        assert_eq!(pool.neutralized_count(), 0);
    }
}
