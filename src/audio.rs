//! Background music
//!
//! Music is optional: a missing output device, a missing track or a track
//! that fails to decode is logged and the game carries on silently.
//! Playback needs the `music` feature (rodio); without it the game is silent.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::GameConfig;

/// Errors raised while starting a track
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio track missing: {path}")]
    Missing { path: PathBuf },
    #[error("failed to open audio track {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "music")]
    #[error("failed to decode audio track {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[cfg(feature = "music")]
    #[error("no audio output device: {0}")]
    NoDevice(#[from] rodio::StreamError),
    #[cfg(feature = "music")]
    #[error("failed to start playback: {0}")]
    Playback(#[from] rodio::PlayError),
}

/// Something that can loop one background track
pub trait AudioPlayer {
    /// Start `track` looping forever at `volume` (0.0 - 1.0)
    fn play_looping(&mut self, track: &Path, volume: f32) -> Result<(), AudioError>;
    fn stop(&mut self);
}

#[cfg_attr(not(feature = "music"), allow(dead_code))]
fn open_track(path: &Path) -> Result<BufReader<File>, AudioError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => AudioError::Missing {
            path: path.to_path_buf(),
        },
        _ => AudioError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(BufReader::new(file))
}

/// Open and decode a track without touching the output device
#[cfg(feature = "music")]
pub fn load_track(path: &Path) -> Result<rodio::Decoder<BufReader<File>>, AudioError> {
    rodio::Decoder::new(open_track(path)?).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Plays through the default output device
#[cfg(feature = "music")]
pub struct MusicPlayer {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
    sink: Option<rodio::Sink>,
}

#[cfg(feature = "music")]
impl MusicPlayer {
    /// Open the default output device
    pub fn try_default() -> Result<Self, AudioError> {
        let (stream, handle) = rodio::OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
        })
    }
}

#[cfg(feature = "music")]
impl AudioPlayer for MusicPlayer {
    fn play_looping(&mut self, track: &Path, volume: f32) -> Result<(), AudioError> {
        use rodio::Source;

        let source = load_track(track)?;
        let sink = rodio::Sink::try_new(&self.handle)?;
        sink.set_volume(volume.clamp(0.0, 1.0));
        sink.append(source.repeat_infinite());
        self.stop();
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            log::debug!("Music stopped");
        }
    }
}

/// Start the configured music. Never fails: returns whether music is playing.
pub fn start_background_music(player: &mut dyn AudioPlayer, config: &GameConfig) -> bool {
    let track = &config.assets.music;
    match player.play_looping(track, config.music_volume) {
        Ok(()) => {
            log::info!(
                "Playing {} at volume {:.2}",
                track.display(),
                config.music_volume
            );
            true
        }
        Err(e) => {
            log::warn!("{e}; continuing without music");
            false
        }
    }
}
