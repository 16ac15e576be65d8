//! Platform abstraction layer
//!
//! The frame loop reaches the outside world only through these traits:
//! - Input (sampled once per frame)
//! - Display surface (blit, text, present)
//! - Frame pacing
//!
//! `terminal` is the interactive crossterm front-end, `headless` drives the
//! loop without a display.

pub mod headless;
pub mod terminal;

use std::io;
use std::time::{Duration, Instant};

use crate::assets::Image;
use crate::sim::TickInput;

/// Polled once per frame for a fresh snapshot of the logical actions
pub trait InputSource {
    fn poll(&mut self) -> io::Result<TickInput>;
}

/// Double-buffered drawing target at a fixed logical resolution
pub trait Surface {
    /// Clear the back buffer
    fn begin_frame(&mut self) -> io::Result<()>;
    /// Draw an image with its top-left corner at logical (x, y)
    fn blit(&mut self, image: &Image, x: f32, y: f32);
    /// Draw a line of text with its top-left corner at logical (x, y)
    fn draw_text(&mut self, text: &str, x: f32, y: f32);
    /// Flip the back buffer onto the display
    fn present(&mut self) -> io::Result<()>;
}

/// End-of-frame wait
pub trait Pacer {
    fn wait_for_next_frame(&mut self);
}

/// Time left to sleep so a frame lasts `interval`
pub fn compute_sleep(elapsed: Duration, interval: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Sleeps out the remainder of a fixed frame interval
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    frame_start: Instant,
    slow_frames: u64,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            frame_start: Instant::now(),
            slow_frames: 0,
        }
    }

    /// Frames whose work alone overran the interval
    pub fn slow_frames(&self) -> u64 {
        self.slow_frames
    }
}

impl Pacer for FramePacer {
    fn wait_for_next_frame(&mut self) {
        let elapsed = self.frame_start.elapsed();
        let sleep = compute_sleep(elapsed, self.interval);
        if sleep > Duration::ZERO {
            std::thread::sleep(sleep);
        } else {
            self.slow_frames += 1;
            // 1st, 2nd, 4th, 8th... so a struggling terminal is not flooded
            if self.slow_frames.is_power_of_two() {
                log::warn!(
                    "Slow frame #{}: {:.2} ms (budget {:.2} ms)",
                    self.slow_frames,
                    elapsed.as_secs_f64() * 1000.0,
                    self.interval.as_secs_f64() * 1000.0
                );
            }
        }
        self.frame_start = Instant::now();
    }
}
