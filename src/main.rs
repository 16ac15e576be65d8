//! Meteor Run entry point
//!
//! Resolves the configuration, loads assets, then runs the game either in
//! the terminal or headless. The terminal is always restored before the
//! summary (or an error) is printed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use meteor_run::assets::TextArtLoader;
#[cfg(feature = "music")]
use meteor_run::audio::{AudioPlayer, MusicPlayer, start_background_music};
use meteor_run::platform::FramePacer;
use meteor_run::platform::headless::{RecordingSurface, ScriptedInput, Unpaced};
use meteor_run::platform::terminal::{TerminalInput, TerminalSession, TerminalSurface};
use meteor_run::sim::TickInput;
use meteor_run::{Game, GameConfig, GameError, RunSummary, Variant};

const TITLE: &str = "Meteor Run";

const USAGE: &str = "\
Usage: meteor-run [OPTIONS]

Options:
  --variant <classic|arcade>  Preset (meteor count and frame rate)
  --config <FILE>             JSON config file
  --seed <N>                  Fixed RNG seed
  --headless                  Run without a display
  --frames <N>                Frames to simulate when headless [default: 600]
  -h, --help                  Print this help

Keys: A/Left, D/Right move, W/Up jump, S/Down fire, Q/Esc quit";

#[derive(Debug, Default)]
struct CliArgs {
    variant: Option<Variant>,
    config: Option<PathBuf>,
    seed: Option<u64>,
    headless: bool,
    frames: Option<usize>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "--variant" => {
                let v = value("--variant")?;
                cli.variant =
                    Some(Variant::from_str(&v).ok_or_else(|| format!("unknown variant '{v}'"))?);
            }
            "--config" => cli.config = Some(PathBuf::from(value("--config")?)),
            "--seed" => {
                let v = value("--seed")?;
                cli.seed = Some(v.parse().map_err(|_| format!("invalid seed '{v}'"))?);
            }
            "--frames" => {
                let v = value("--frames")?;
                cli.frames = Some(v.parse().map_err(|_| format!("invalid frame count '{v}'"))?);
            }
            "--headless" => cli.headless = true,
            "-h" | "--help" => cli.help = true,
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }
    Ok(cli)
}

fn resolve_config(cli: &CliArgs) -> Result<GameConfig, GameError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(variant) = cli.variant {
        config.variant = variant;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &CliArgs) -> Result<RunSummary, GameError> {
    let config = resolve_config(cli)?;
    let mut game = Game::new(config, &TextArtLoader)?;

    if cli.headless {
        let frames = cli.frames.unwrap_or(600);
        let mut input = ScriptedInput::repeat(TickInput::default(), frames);
        return game.run(&mut input, &mut RecordingSurface::new(), &mut Unpaced::default());
    }

    #[cfg(feature = "music")]
    let mut music = match MusicPlayer::try_default() {
        Ok(mut player) => {
            start_background_music(&mut player, game.config());
            Some(player)
        }
        Err(e) => {
            log::warn!("{e}; continuing without music");
            None
        }
    };

    let mut session = TerminalSession::enter(TITLE)?;
    let result = run_terminal(&mut game);
    session.restore();
    #[cfg(feature = "music")]
    if let Some(player) = music.as_mut() {
        player.stop();
    }
    result
}

fn run_terminal(game: &mut Game) -> Result<RunSummary, GameError> {
    let config = game.config();
    let interval = config.frame_interval();
    let mut surface = TerminalSurface::new(config.screen_width, config.screen_height)?;
    std::thread::sleep(Duration::from_millis(config.start_delay_ms));
    // Pacing starts with the first frame, not before the delay
    let mut pacer = FramePacer::new(interval);
    let summary = game.run(&mut TerminalInput::new(), &mut surface, &mut pacer)?;
    if pacer.slow_frames() > 0 {
        log::warn!(
            "{} of {} frames overran the {:.2} ms budget",
            pacer.slow_frames(),
            summary.frames,
            interval.as_secs_f64() * 1000.0
        );
    }
    Ok(summary)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if cli.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("meteor-run: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full() {
        let cli = parse_args(args(&[
            "--variant", "arcade", "--seed", "7", "--headless", "--frames", "30",
        ]))
        .unwrap();
        assert_eq!(cli.variant, Some(Variant::Arcade));
        assert_eq!(cli.seed, Some(7));
        assert!(cli.headless);
        assert_eq!(cli.frames, Some(30));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&["--seed"])).is_err());
        assert!(parse_args(args(&["--seed", "x"])).is_err());
        assert!(parse_args(args(&["--variant", "turbo"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = CliArgs {
            variant: Some(Variant::Arcade),
            seed: Some(5),
            ..Default::default()
        };
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.pool_size(), 10);
        assert_eq!(config.fps(), 80);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_headless_run() {
        let cli = CliArgs {
            seed: Some(11),
            headless: true,
            frames: Some(20),
            ..Default::default()
        };
        let summary = run(&cli).unwrap();
        assert!(summary.frames <= 20);
        assert_eq!(summary.seed, 11);
    }
}
