//! Terminal front-end (crossterm)
//!
//! The 1000x800 logical screen is projected onto whatever size the terminal
//! currently has, re-measured every frame. Drawing goes into a cell back
//! buffer that `present` writes out in one flush.
//!
//! Key bindings: A/Left move left, D/Right move right, W/Up jump,
//! S/Down fire, Q/Esc/Ctrl-C quit.

use std::collections::HashMap;
use std::io::{self, BufWriter, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
};

use super::{InputSource, Surface};
use crate::assets::{Image, Rgb};
use crate::sim::TickInput;

const TEXT_COLOR: Rgb = (255, 255, 255);

/// A key counts as held if it was pressed or repeated within this many
/// frames. Covers terminals that never report key releases.
const HOLD_WINDOW: u64 = 6;

/// Raw mode + alternate screen for the lifetime of the value
pub struct TerminalSession {
    keyboard_enhanced: bool,
    restored: bool,
}

impl TerminalSession {
    pub fn enter(title: &str) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on, dropping the session undoes whatever succeeded
        let mut session = Self {
            keyboard_enhanced: false,
            restored: false,
        };
        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        out.execute(terminal::SetTitle(title))?;
        // Key-release events where the terminal supports them
        session.keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        log::debug!(
            "Terminal entered (key release events: {})",
            session.keyboard_enhanced
        );
        Ok(session)
    }

    /// Put the terminal back the way we found it
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        let mut out = stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(style::ResetColor);
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        self.restored = true;
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.restore();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Rgb,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: TEXT_COLOR,
};

/// Projects the logical screen onto terminal cells
pub struct TerminalSurface {
    out: BufWriter<Stdout>,
    logical: (f32, f32),
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl TerminalSurface {
    pub fn new(logical_width: f32, logical_height: f32) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_size(logical_width, logical_height, cols, rows))
    }

    fn with_size(logical_width: f32, logical_height: f32, cols: u16, rows: u16) -> Self {
        Self {
            out: BufWriter::new(stdout()),
            logical: (logical_width, logical_height),
            cols,
            rows,
            cells: vec![BLANK; cols as usize * rows as usize],
        }
    }

    #[cfg(test)]
    fn cell(&self, col: usize, row: usize) -> char {
        self.cells[row * self.cols as usize + col].ch
    }

    /// Logical pixels covered by one cell
    fn cell_size(&self) -> (f32, f32) {
        (
            self.logical.0 / self.cols.max(1) as f32,
            self.logical.1 / self.rows.max(1) as f32,
        )
    }

    fn put(&mut self, col: i64, row: i64, cell: Cell) {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = cell;
    }
}

impl Surface for TerminalSurface {
    fn begin_frame(&mut self) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        if (cols, rows) != (self.cols, self.rows) {
            self.cols = cols;
            self.rows = rows;
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        }
        self.cells.clear();
        self.cells.resize(cols as usize * rows as usize, BLANK);
        Ok(())
    }

    fn blit(&mut self, image: &Image, x: f32, y: f32) {
        let (cell_w, cell_h) = self.cell_size();
        let (w, h) = (image.width as f32, image.height as f32);
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let first_col = (x / cell_w).floor() as i64;
        let last_col = ((x + w) / cell_w).ceil() as i64;
        let first_row = (y / cell_h).floor() as i64;
        let last_row = ((y + h) / cell_h).ceil() as i64;

        for row in first_row.max(0)..last_row.min(self.rows as i64) {
            let v = ((row as f32 + 0.5) * cell_h - y) / h;
            for col in first_col.max(0)..last_col.min(self.cols as i64) {
                let u = ((col as f32 + 0.5) * cell_w - x) / w;
                if let Some(ch) = image.sample(u, v) {
                    self.put(col, row, Cell {
                        ch,
                        color: image.tint,
                    });
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        let (cell_w, cell_h) = self.cell_size();
        let col = (x / cell_w).floor() as i64;
        let row = (y / cell_h).floor() as i64;
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i64, row, Cell {
                ch,
                color: TEXT_COLOR,
            });
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let cols = self.cols as usize;
        let mut color: Option<Rgb> = None;
        let mut line = String::with_capacity(cols);

        for (row, cells) in self.cells.chunks(cols.max(1)).enumerate() {
            self.out.queue(cursor::MoveTo(0, row as u16))?;
            for cell in cells {
                if color != Some(cell.color) && cell.ch != ' ' {
                    if !line.is_empty() {
                        self.out.queue(Print(&line))?;
                        line.clear();
                    }
                    let (r, g, b) = cell.color;
                    self.out
                        .queue(style::SetForegroundColor(Color::Rgb { r, g, b }))?;
                    color = Some(cell.color);
                }
                line.push(cell.ch);
            }
            self.out.queue(Print(&line))?;
            line.clear();
        }

        self.out.flush()
    }
}

/// Polls crossterm events and tracks which keys are held
pub struct TerminalInput {
    last_seen: HashMap<KeyCode, u64>,
    frame: u64,
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            last_seen: HashMap::new(),
            frame: 0,
        }
    }

    fn held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| {
            self.last_seen
                .get(key)
                .is_some_and(|&seen| self.frame.saturating_sub(seen) <= HOLD_WINDOW)
        })
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> io::Result<TickInput> {
        self.frame += 1;
        let mut input = TickInput::default();

        while event::poll(Duration::ZERO)? {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            else {
                continue;
            };
            let code = normalize(code);
            match kind {
                KeyEventKind::Press => {
                    self.last_seen.insert(code, self.frame);
                    match code {
                        KeyCode::Char('s') | KeyCode::Down => input.fire = true,
                        KeyCode::Char('q') | KeyCode::Esc => input.quit = true,
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            input.quit = true
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    self.last_seen.insert(code, self.frame);
                }
                KeyEventKind::Release => {
                    self.last_seen.remove(&code);
                }
            }
        }

        input.left = self.held(&[KeyCode::Char('a'), KeyCode::Left]);
        input.right = self.held(&[KeyCode::Char('d'), KeyCode::Right]);
        input.jump = self.held(&[KeyCode::Char('w'), KeyCode::Up]);
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blit_projects_onto_cells() {
        // 100x80 logical on a 10x8 grid: one cell per 10x10 pixels
        let mut surface = TerminalSurface::with_size(100.0, 80.0, 10, 8);
        let image = Image::from_text("#").unwrap().scaled(20, 20);
        surface.blit(&image, 30.0, 40.0);

        assert_eq!(surface.cell(3, 4), '#');
        assert_eq!(surface.cell(4, 5), '#');
        assert_eq!(surface.cell(2, 4), ' ');
        assert_eq!(surface.cell(5, 4), ' ');
        assert_eq!(surface.cell(3, 6), ' ');
    }

    #[test]
    fn test_blit_clips_offscreen() {
        let mut surface = TerminalSurface::with_size(100.0, 80.0, 10, 8);
        let image = Image::from_text("#").unwrap().scaled(20, 20);
        surface.blit(&image, -10.0, -10.0);
        assert_eq!(surface.cell(0, 0), '#');
        assert_eq!(surface.cell(1, 1), ' ');
        surface.blit(&image, 500.0, 500.0);
    }

    #[test]
    fn test_transparent_cells_keep_background() {
        let mut surface = TerminalSurface::with_size(100.0, 80.0, 10, 8);
        let back = Image::from_text("..").unwrap().scaled(20, 10);
        let front = Image::from_text("# ").unwrap().scaled(20, 10);
        surface.blit(&back, 0.0, 0.0);
        surface.blit(&front, 0.0, 0.0);
        assert_eq!(surface.cell(0, 0), '#');
        assert_eq!(surface.cell(1, 0), '.');
    }

    #[test]
    fn test_text_truncated_at_edge() {
        let mut surface = TerminalSurface::with_size(100.0, 80.0, 10, 8);
        surface.draw_text("Lives: Ten Lives", 10.0, 10.0);
        assert_eq!(surface.cell(1, 1), 'L');
        assert_eq!(surface.cell(9, 1), 'e');
    }

    #[test]
    fn test_keys_normalized() {
        assert_eq!(normalize(KeyCode::Char('A')), KeyCode::Char('a'));
        assert_eq!(normalize(KeyCode::Left), KeyCode::Left);
    }

    #[test]
    fn test_hold_window_expires() {
        let mut input = TerminalInput::new();
        input.frame = 10;
        input.last_seen.insert(KeyCode::Left, 10);
        assert!(input.held(&[KeyCode::Char('a'), KeyCode::Left]));
        input.frame = 10 + HOLD_WINDOW;
        assert!(input.held(&[KeyCode::Left]));
        input.frame += 1;
        assert!(!input.held(&[KeyCode::Left]));
    }
}
