//! Fixed-order simulation tick
//!
//! One call advances the game exactly one frame:
//! fire -> background -> bodies -> collisions -> lives check.

use rand::RngCore;

use super::collision::resolve_collisions;
use super::state::{GameEvent, GameState, StepContext, TerminationReason};
use crate::config::GameConfig;

/// Input snapshot for a single tick (sampled fresh every frame)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move-left held
    pub left: bool,
    /// Move-right held
    pub right: bool,
    /// Jump held
    pub jump: bool,
    /// Fire pressed since the last sample (edge, not held)
    pub fire: bool,
    /// Quit requested
    pub quit: bool,
}

/// Advance the game state by one frame.
///
/// Returns what happened so the caller can log or react. Does nothing once
/// the session has terminated.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    config: &GameConfig,
    rng: &mut dyn RngCore,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if !state.is_running() {
        return events;
    }

    if input.quit {
        state.session.terminate(TerminationReason::QuitRequested);
        events.push(GameEvent::Terminated {
            reason: TerminationReason::QuitRequested,
        });
        return events;
    }

    state.frame += 1;

    if input.fire {
        let id = state.fire_projectile(config, rng);
        events.push(GameEvent::ProjectileFired { id });
    }

    state.background.update();

    let mut ctx = StepContext { config, input, rng };
    state.update_bodies(&mut ctx);

    resolve_collisions(state, config, ctx.rng, &mut events);

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::obstacle::{ObstaclePool, SlotId};
    use crate::sim::state::GamePhase;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn new_game(seed: u64) -> (GameConfig, GameState, Pcg32) {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(&config, &mut rng);
        (config, state, rng)
    }

    #[test]
    fn test_tick_advances_frame() {
        let (config, mut state, mut rng) = new_game(1);
        tick(&mut state, &TickInput::default(), &config, &mut rng);
        assert_eq!(state.frame, 1);
        assert_eq!(state.background.offset, SCROLL_SPEED);
    }

    #[test]
    fn test_fire_spawns_then_moves() {
        let (config, mut state, mut rng) = new_game(2);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, &config, &mut rng);
        assert!(events.contains(&GameEvent::ProjectileFired { id: 1 }));
        assert_eq!(state.projectiles.len(), 1);
        // Spawned at the muzzle (top 600, centred), then moved up once
        let p = &state.projectiles[0];
        assert_eq!(p.rect.top(), 600.0 - PROJECTILE_HEIGHT / 2.0 - PROJECTILE_SPEED);
        assert_eq!(p.rect.center_x(), 500.0);
    }

    #[test]
    fn test_quit_terminates_without_simulating() {
        let (config, mut state, mut rng) = new_game(3);
        let input = TickInput {
            quit: true,
            fire: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, &config, &mut rng);
        assert_eq!(state.session.phase, GamePhase::Terminated);
        assert_eq!(state.session.reason, Some(TerminationReason::QuitRequested));
        assert_eq!(state.frame, 0);
        assert!(state.projectiles.is_empty());
        assert_eq!(
            events,
            vec![GameEvent::Terminated {
                reason: TerminationReason::QuitRequested
            }]
        );
    }

    #[test]
    fn test_terminated_state_is_frozen() {
        let (config, mut state, mut rng) = new_game(4);
        state.session.terminate(TerminationReason::LivesDepleted);
        let before = state.obstacles.get(SlotId(0)).unwrap().rect;
        let events = tick(&mut state, &TickInput::default(), &config, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.frame, 0);
        assert_eq!(state.obstacles.get(SlotId(0)).unwrap().rect, before);
        assert!(!state.is_running());
    }

    #[test]
    fn test_collision_uses_moved_positions() {
        let (config, mut state, mut rng) = new_game(5);
        // Meteor just above the player; the fall this frame brings it into contact
        let mut pool: Vec<_> = state.obstacles.iter().cloned().collect();
        for (i, o) in pool.iter_mut().enumerate() {
            o.rect.pos = Vec2::new(i as f32 * 60.0, -500.0);
        }
        let player = state.player.rect;
        pool[0].rect.pos = Vec2::new(player.left(), player.top() - config.obstacle_height - 2.0);
        state.obstacles = ObstaclePool::from_obstacles(pool);

        let events = tick(&mut state, &TickInput::default(), &config, &mut rng);
        assert_eq!(state.player.lives, 8);
        assert!(events.iter().any(|e| matches!(e, GameEvent::HazardHit { .. })));
    }

    #[test]
    fn test_shoot_meteor_then_catch_cheese() {
        let (config, mut state, mut rng) = new_game(6);
        let player = state.player.rect;
        let mut pool: Vec<_> = state.obstacles.iter().cloned().collect();
        for (i, o) in pool.iter_mut().enumerate() {
            o.rect.pos = Vec2::new(i as f32 * 60.0, -500.0);
        }
        // Directly above the muzzle, clear of the player
        pool[0].rect.pos = Vec2::new(player.center_x() - 25.0, player.top() - 120.0);
        state.obstacles = ObstaclePool::from_obstacles(pool);
        state.player.lives = 7;

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, &config, &mut rng);
        let mut frames = 1;
        while !state.obstacles.get(SlotId(0)).unwrap().is_neutralized() {
            tick(&mut state, &TickInput::default(), &config, &mut rng);
            frames += 1;
            assert!(frames < 20, "bullet never hit");
        }
        assert!(state.projectiles.is_empty());

        while state.player.lives == 7 {
            tick(&mut state, &TickInput::default(), &config, &mut rng);
            frames += 1;
            assert!(frames < 60, "cheese never caught");
        }
        assert_eq!(state.player.lives, 8);
        assert!(state.obstacles.get(SlotId(0)).unwrap().is_hazard());
    }

    #[test]
    fn test_determinism() {
        let (config, mut state1, mut rng1) = new_game(99999);
        let (_, mut state2, mut rng2) = new_game(99999);

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                fire: true,
                jump: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..500 {
            for input in &inputs {
                tick(&mut state1, input, &config, &mut rng1);
                tick(&mut state2, input, &config, &mut rng2);
            }
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.player.lives, state2.player.lives);
        assert_eq!(state1.player.rect, state2.player.rect);
        assert_eq!(state1.projectiles.len(), state2.projectiles.len());
        for (a, b) in state1.obstacles.iter().zip(state2.obstacles.iter()) {
            assert_eq!(a.rect, b.rect);
            assert_eq!(a.state, b.state);
        }
    }
}
