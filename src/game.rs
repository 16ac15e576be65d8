//! Frame orchestrator
//!
//! Owns everything a session needs and drives the fixed-order loop:
//! poll input -> tick -> draw -> pace, until the session terminates.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::assets::{AssetError, AssetLoader, SpriteSet};
use crate::config::{ConfigError, GameConfig};
use crate::platform::{InputSource, Pacer, Surface};
use crate::renderer;
use crate::sim::{GameEvent, GameState, TerminationReason, tick};

/// Fatal errors that end a session
#[derive(Debug, Error)]
pub enum GameError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("platform I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames simulated (the quit frame is not counted)
    pub frames: u64,
    pub final_lives: i32,
    pub reason: TerminationReason,
    pub seed: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            TerminationReason::LivesDepleted => "out of lives",
            TerminationReason::QuitRequested => "quit",
        };
        write!(
            f,
            "Game over ({reason}) after {} frames with {} lives left [seed {}]",
            self.frames, self.final_lives, self.seed
        )
    }
}

/// A single play session
pub struct Game {
    config: GameConfig,
    state: GameState,
    rng: Pcg32,
    sprites: SpriteSet,
    seed: u64,
}

impl Game {
    /// Validate the config, load every sprite and lay out the opening state
    pub fn new(config: GameConfig, loader: &dyn AssetLoader) -> Result<Self, GameError> {
        config.validate()?;
        let sprites = SpriteSet::load(loader, &config)?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(&config, &mut rng);
        log::info!(
            "New game: variant {}, {} meteors, {} fps, seed {}",
            config.variant.as_str(),
            config.pool_size(),
            config.fps(),
            seed
        );

        Ok(Self {
            config,
            state,
            rng,
            sprites,
            seed,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run one frame: sample input, simulate, draw
    pub fn step(
        &mut self,
        input: &mut dyn InputSource,
        surface: &mut dyn Surface,
    ) -> Result<Vec<GameEvent>, GameError> {
        let snapshot = input.poll()?;
        let events = tick(&mut self.state, &snapshot, &self.config, &mut self.rng);
        for event in &events {
            match event {
                GameEvent::Terminated { reason } => {
                    log::info!("Frame {}: session terminated ({reason:?})", self.state.frame)
                }
                _ => log::debug!("Frame {}: {event:?}", self.state.frame),
            }
        }
        renderer::draw_frame(surface, &self.sprites, &self.state)?;
        Ok(events)
    }

    /// Loop until the session terminates
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        surface: &mut dyn Surface,
        pacer: &mut dyn Pacer,
    ) -> Result<RunSummary, GameError> {
        while self.state.is_running() {
            self.step(input, surface)?;
            pacer.wait_for_next_frame();
        }

        let summary = self.summary();
        log::info!("{summary}");
        Ok(summary)
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.state.frame,
            final_lives: self.state.player.lives,
            reason: self
                .state
                .session
                .reason
                .unwrap_or(TerminationReason::QuitRequested),
            seed: self.seed,
        }
    }
}
