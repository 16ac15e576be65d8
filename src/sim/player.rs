//! Player physics: horizontal movement, jump arc, lives

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Body, SpriteKey, StepContext};
use super::tick::TickInput;
use crate::config::GameConfig;

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
    #[default]
    Neutral,
}

/// The player-controlled sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Vertical velocity (pixels/frame, negative = up)
    pub vel_y: f32,
    pub airborne: bool,
    /// May dip below zero on the frame the game ends
    pub lives: i32,
    pub facing: Facing,
}

impl Player {
    /// Standing on the ground line, horizontally centred
    pub fn new(config: &GameConfig) -> Self {
        let mut rect = Rect::new(
            (config.screen_width - config.player_width) / 2.0,
            0.0,
            config.player_width,
            config.player_height,
        );
        rect.set_bottom(config.ground_line());
        Self {
            rect,
            vel_y: 0.0,
            airborne: false,
            lives: config.start_lives,
            facing: Facing::Neutral,
        }
    }

    /// Left wins when both directions are held
    pub fn move_horizontal(&mut self, input: &TickInput, config: &GameConfig) {
        if input.left && self.rect.left() > 0.0 {
            self.rect.pos.x -= config.player_speed;
            self.facing = Facing::Left;
        } else if input.right && self.rect.right() < config.screen_width {
            self.rect.pos.x += config.player_speed;
            self.facing = Facing::Right;
        } else {
            self.facing = Facing::Neutral;
        }
        let max_x = config.screen_width - self.rect.size.x;
        self.rect.pos.x = self.rect.pos.x.clamp(0.0, max_x);
    }

    /// One impulse per ground contact; holding jump does nothing mid-air
    pub fn try_jump(&mut self, input: &TickInput, config: &GameConfig) {
        if input.jump && !self.airborne {
            self.airborne = true;
            self.vel_y = -config.jump_impulse;
        }
    }

    /// Integrate the jump arc and land on the ground line
    pub fn apply_gravity(&mut self, config: &GameConfig) {
        if !self.airborne {
            return;
        }
        self.vel_y += config.gravity;
        self.rect.pos.y += self.vel_y;
        let ground = config.ground_line();
        if self.rect.bottom() >= ground {
            self.rect.set_bottom(ground);
            self.airborne = false;
        }
    }

    /// Where bullets leave the sprite (top centre)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.rect.center_x(), self.rect.top())
    }

    /// Cheese caught: heal, clamped to the maximum
    pub fn heal(&mut self, amount: i32, max_lives: i32) {
        self.lives = (self.lives + amount).min(max_lives);
    }

    /// Meteor hit: no floor clamp
    pub fn damage(&mut self, amount: i32) {
        self.lives -= amount;
    }
}

impl Body for Player {
    fn update(&mut self, ctx: &mut StepContext<'_>) {
        self.move_horizontal(ctx.input, ctx.config);
        self.try_jump(ctx.input, ctx.config);
        self.apply_gravity(ctx.config);
    }

    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> SpriteKey {
        SpriteKey::Player(self.facing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(left: bool, right: bool, jump: bool) -> TickInput {
        TickInput {
            left,
            right,
            jump,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawn_on_ground() {
        let config = GameConfig::default();
        let player = Player::new(&config);
        assert_eq!(player.rect.bottom(), config.ground_line());
        assert_eq!(player.rect.left(), 450.0);
        assert_eq!(player.lives, 10);
        assert!(!player.airborne);
    }

    #[test]
    fn test_move_left_and_right() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);

        player.move_horizontal(&input(true, false, false), &config);
        assert_eq!(player.rect.left(), 445.0);
        assert_eq!(player.facing, Facing::Left);

        player.move_horizontal(&input(false, true, false), &config);
        assert_eq!(player.rect.left(), 450.0);
        assert_eq!(player.facing, Facing::Right);

        player.move_horizontal(&TickInput::default(), &config);
        assert_eq!(player.rect.left(), 450.0);
        assert_eq!(player.facing, Facing::Neutral);
    }

    #[test]
    fn test_left_wins_over_right() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        player.move_horizontal(&input(true, true, false), &config);
        assert_eq!(player.facing, Facing::Left);
        assert_eq!(player.rect.left(), 445.0);
    }

    #[test]
    fn test_stays_within_bounds() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);

        player.rect.pos.x = 2.0;
        player.move_horizontal(&input(true, false, false), &config);
        assert_eq!(player.rect.left(), 0.0);
        // Already at the edge: no move, neutral sprite
        player.move_horizontal(&input(true, false, false), &config);
        assert_eq!(player.rect.left(), 0.0);
        assert_eq!(player.facing, Facing::Neutral);

        player.rect.pos.x = config.screen_width - config.player_width - 1.0;
        player.move_horizontal(&input(false, true, false), &config);
        assert_eq!(player.rect.right(), config.screen_width);
    }

    #[test]
    fn test_blocked_left_falls_through_to_right() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        player.rect.pos.x = 0.0;
        // Left is held but blocked: right is checked next
        player.move_horizontal(&input(true, true, false), &config);
        assert_eq!(player.facing, Facing::Right);
        assert_eq!(player.rect.left(), config.player_speed);
    }

    #[test]
    fn test_jump_arc_lands_on_ground() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        let ground = config.ground_line();

        player.try_jump(&input(false, false, true), &config);
        assert!(player.airborne);
        assert_eq!(player.vel_y, -15.0);

        player.apply_gravity(&config);
        assert_eq!(player.vel_y, -14.0);
        assert_eq!(player.rect.bottom(), ground - 14.0);

        let mut frames = 1;
        while player.airborne {
            player.apply_gravity(&config);
            assert!(player.rect.bottom() <= ground);
            frames += 1;
            assert!(frames < 100, "jump never landed");
        }
        assert_eq!(player.rect.bottom(), ground);
        assert_eq!(frames, 29);
    }

    #[test]
    fn test_no_double_jump() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        let jump = input(false, false, true);

        player.try_jump(&jump, &config);
        player.apply_gravity(&config);
        player.apply_gravity(&config);
        let vel = player.vel_y;
        player.try_jump(&jump, &config);
        assert_eq!(player.vel_y, vel);
    }

    #[test]
    fn test_heal_clamps_damage_does_not() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);
        player.lives = 9;
        player.heal(1, 10);
        player.heal(1, 10);
        assert_eq!(player.lives, 10);
        player.lives = 1;
        player.damage(2);
        assert_eq!(player.lives, -1);
    }

    #[test]
    fn test_muzzle() {
        let config = GameConfig::default();
        let player = Player::new(&config);
        assert_eq!(player.muzzle(), Vec2::new(500.0, 600.0));
    }
}
