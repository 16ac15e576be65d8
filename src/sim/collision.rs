//! Collision resolution
//!
//! Runs once per frame after every body has moved, in a fixed order:
//! bullets against meteors, then the player against meteors, then the
//! lives check. Every overlapping pair is handled; there is no
//! first-match-wins or one-hit-per-frame cap.

use rand::RngCore;

use super::obstacle::ObstaclePool;
use super::player::Player;
use super::projectile::Projectile;
use super::state::{GameEvent, GameState, TerminationReason};
use crate::config::GameConfig;

/// Bullets vs meteors.
///
/// A bullet overlapping any hazard neutralizes it and is consumed. One
/// bullet can neutralize several meteors in the same frame. Cheese is
/// inert: bullets pass through it.
pub fn resolve_projectile_hits(
    projectiles: &mut Vec<Projectile>,
    obstacles: &mut ObstaclePool,
    events: &mut Vec<GameEvent>,
) {
    projectiles.retain(|projectile| {
        let bullet = projectile.rect;
        let mut consumed = false;
        for obstacle in obstacles.iter_mut() {
            if obstacle.is_hazard() && bullet.overlaps(&obstacle.rect) {
                obstacle.neutralize();
                consumed = true;
                events.push(GameEvent::ObstacleNeutralized {
                    slot: obstacle.slot,
                    projectile: projectile.id,
                });
            }
        }
        !consumed
    });
}

/// Player vs meteors.
///
/// Cheese heals (clamped to the maximum), meteors hurt (no floor). Either
/// way the meteor is recycled above the screen. Each overlapping meteor
/// applies on its own, so several hits in one frame stack.
pub fn resolve_player_hits(
    player: &mut Player,
    obstacles: &mut ObstaclePool,
    config: &GameConfig,
    rng: &mut dyn RngCore,
    events: &mut Vec<GameEvent>,
) {
    let body = player.rect;
    for obstacle in obstacles.iter_mut() {
        if !body.overlaps(&obstacle.rect) {
            continue;
        }
        if obstacle.is_neutralized() {
            player.heal(config.collectible_heal, config.max_lives);
            events.push(GameEvent::CollectibleCaught {
                slot: obstacle.slot,
                lives: player.lives,
            });
        } else {
            player.damage(config.hazard_damage);
            events.push(GameEvent::HazardHit {
                slot: obstacle.slot,
                lives: player.lives,
            });
        }
        obstacle.reset(config, rng);
    }

    debug_assert!(player.lives <= config.max_lives, "lives above maximum");
    debug_assert!(
        player.lives >= config.min_reachable_lives(),
        "lives {} below reachable minimum",
        player.lives
    );
}

/// Lives check: ends the session the frame lives reach zero
pub fn check_termination(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.sync_lives();
    if state.session.lives <= 0 && state.session.terminate(TerminationReason::LivesDepleted) {
        events.push(GameEvent::Terminated {
            reason: TerminationReason::LivesDepleted,
        });
    }
}

/// Both collision passes followed by the lives check
pub fn resolve_collisions(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut dyn RngCore,
    events: &mut Vec<GameEvent>,
) {
    resolve_projectile_hits(&mut state.projectiles, &mut state.obstacles, events);
    resolve_player_hits(&mut state.player, &mut state.obstacles, config, rng, events);
    debug_assert_eq!(state.obstacles.len(), config.pool_size(), "meteor pool changed size");
    check_termination(state, events);
}
