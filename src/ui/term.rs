/// Presentation layer: diff-based terminal painter for the GridBuffer.
///
/// How it works:
///   1. The grid is the frame — the raycaster already composed it
///   2. Compare each cell with the previous painted frame
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///
/// This eliminates flicker caused by full-screen redraws. The grid is
/// centered in the terminal and clipped when the terminal is smaller;
/// one row is reserved for the status line.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::render::grid::GridBuffer;

pub struct Term {
    writer: BufWriter<io::Stdout>,
    /// Previous painted frame, grid-sized. Invalid until the first
    /// paint and after any resize.
    back: Vec<char>,
    back_valid: bool,
    back_status: String,
    term_w: usize,
    term_h: usize,
}

impl Term {
    pub fn new() -> Self {
        Term {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            back: vec![],
            back_valid: false,
            back_status: String::new(),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            DisableMouseCapture,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Paint the grid (diffed against the previous paint) and the
    /// status line.
    pub fn draw(&mut self, grid: &GridBuffer, status: &str) -> io::Result<()> {
        // Detect terminal resize → full repaint
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.back_valid = false;
            queue!(self.writer, Clear(ClearType::All))?;
        }
        if self.back.len() != grid.width() * grid.height() {
            self.back = vec![' '; grid.width() * grid.height()];
            self.back_valid = false;
        }

        // Center the grid; reserve the bottom row for status.
        let view_h = self.term_h.saturating_sub(1);
        let rows = grid.height().min(view_h);
        let cols = grid.width().min(self.term_w);
        let off_x = (self.term_w.saturating_sub(grid.width())) / 2;
        let off_y = (view_h.saturating_sub(grid.height())) / 2;

        let full_repaint = !self.back_valid;
        let mut last_fg = Color::Reset;
        queue!(self.writer, SetForegroundColor(Color::Reset))?;

        for row in 0..rows {
            // Chain prints along a run of changed cells to avoid
            // re-positioning the cursor for every cell.
            let mut cursor_at: Option<usize> = None;
            for col in 0..cols {
                let ch = grid.get(row, col);
                let prev = self.back[row * grid.width() + col];
                if self.back_valid && ch == prev {
                    cursor_at = None;
                    continue;
                }

                if cursor_at != Some(col) {
                    queue!(
                        self.writer,
                        MoveTo((off_x + col) as u16, (off_y + row) as u16)
                    )?;
                }

                let fg = glyph_color(ch);
                if fg != last_fg {
                    queue!(self.writer, SetForegroundColor(fg))?;
                    last_fg = fg;
                }
                queue!(self.writer, Print(ch))?;
                cursor_at = Some(col + 1);

                self.back[row * grid.width() + col] = ch;
            }
        }
        self.back_valid = true;

        // ── Status line ──
        if full_repaint || status != self.back_status {
            let row = self.term_h.saturating_sub(1) as u16;
            let line: String = status.chars().take(self.term_w).collect();
            queue!(
                self.writer,
                MoveTo(0, row),
                Clear(ClearType::CurrentLine),
                SetForegroundColor(Color::DarkGrey),
                Print(&line)
            )?;
            self.back_status = status.to_string();
        }

        self.writer.flush()
    }
}

/// Foreground color per shade glyph: a grayscale ramp matching the
/// depth buckets, plus the minimap marks.
fn glyph_color(ch: char) -> Color {
    match ch {
        '█' => Color::Rgb { r: 235, g: 235, b: 235 },
        '▓' => Color::Rgb { r: 190, g: 190, b: 190 },
        '▒' => Color::Rgb { r: 140, g: 140, b: 140 },
        '░' => Color::Rgb { r: 95, g: 95, b: 95 },
        '·' => Color::Rgb { r: 70, g: 70, b: 70 },
        '#' => Color::Rgb { r: 200, g: 170, b: 60 },
        '@' => Color::Rgb { r: 80, g: 255, b: 80 },
        '+' => Color::Rgb { r: 255, g: 220, b: 50 },
        _ => Color::White,
    }
}
