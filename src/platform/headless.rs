//! Display-less platform: scripted input, a surface that records draw
//! calls, and a pacer that never sleeps. Used by tests and `--headless`.

use std::collections::VecDeque;
use std::io;

use super::{InputSource, Pacer, Surface};
use crate::assets::{Image, Rgb};
use crate::sim::TickInput;

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Blit {
        width: u32,
        height: u32,
        tint: Rgb,
        x: f32,
        y: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
    },
}

/// Keeps the draw calls of the last presented frame
#[derive(Debug, Default)]
pub struct RecordingSurface {
    back: Vec<DrawCall>,
    front: Vec<DrawCall>,
    presents: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls of the most recently presented frame
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.front
    }

    pub fn presents(&self) -> u64 {
        self.presents
    }

    /// Text drawn in the last presented frame
    pub fn last_text(&self) -> Option<&str> {
        self.front.iter().rev().find_map(|call| match call {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            DrawCall::Blit { .. } => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn begin_frame(&mut self) -> io::Result<()> {
        self.back.clear();
        Ok(())
    }

    fn blit(&mut self, image: &Image, x: f32, y: f32) {
        self.back.push(DrawCall::Blit {
            width: image.width,
            height: image.height,
            tint: image.tint,
            x,
            y,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        self.back.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn present(&mut self) -> io::Result<()> {
        std::mem::swap(&mut self.front, &mut self.back);
        self.presents += 1;
        Ok(())
    }
}

/// Plays back a fixed list of snapshots, then asks to quit
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<TickInput>,
    polls: u64,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            script: script.into_iter().collect(),
            polls: 0,
        }
    }

    /// The same snapshot for `frames` frames
    pub fn repeat(input: TickInput, frames: usize) -> Self {
        Self::new(std::iter::repeat_n(input, frames))
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> io::Result<TickInput> {
        self.polls += 1;
        Ok(self.script.pop_front().unwrap_or(TickInput {
            quit: true,
            ..Default::default()
        }))
    }
}

/// Runs frames back to back
#[derive(Debug, Default)]
pub struct Unpaced {
    pub waits: u64,
}

impl Pacer for Unpaced {
    fn wait_for_next_frame(&mut self) {
        self.waits += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_then_quit() {
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut input = ScriptedInput::new([fire, TickInput::default()]);
        assert_eq!(input.poll().unwrap(), fire);
        assert_eq!(input.poll().unwrap(), TickInput::default());
        assert!(input.poll().unwrap().quit);
        assert!(input.poll().unwrap().quit);
        assert_eq!(input.polls(), 4);
    }

    #[test]
    fn test_surface_keeps_presented_frame() {
        let image = Image::from_text("#").unwrap().scaled(10, 10);
        let mut surface = RecordingSurface::new();
        surface.begin_frame().unwrap();
        surface.blit(&image, 1.0, 2.0);
        surface.draw_text("hi", 0.0, 0.0);
        assert!(surface.last_frame().is_empty());
        surface.present().unwrap();
        assert_eq!(surface.last_frame().len(), 2);
        assert_eq!(surface.last_text(), Some("hi"));

        surface.begin_frame().unwrap();
        assert_eq!(surface.last_frame().len(), 2);
        assert_eq!(surface.presents(), 1);
    }
}
