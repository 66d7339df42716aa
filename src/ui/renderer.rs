/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Glyph)
///   2. Compare each glyph with `back` buffer (previous frame)
///   3. Only emit terminal commands for glyphs that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::cell::Cell;
use crate::sim::world::WorldState;

// ── Glyph: the unit of the back-buffer ──

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    /// Explicit dark background for all "empty" terminal cells, also used
    /// for `Clear` so inter-row gaps match.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Glyph::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Glyph { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Glyph::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, glyph: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = glyph;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Glyph::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Glyph::new(' ', Color::White, bg));
        }
    }
}

// ── Layout ──

/// Each maze cell is two terminal columns wide so cells look square.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
/// Maze is inset by one row below the HUD gap and one column from the edge.
const MAP_ROW: usize = 2;
const MAP_COL: usize = 1;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const PLAYER_FG: Color = Color::Rgb { r: 40, g: 110, b: 255 };

const HELP: &str = " Arrows/WASD:Move  R:Restart  Esc/Q:Quit  │  Pad: D-pad/Stick  Start  Select";

/// HUD line shown above the maze.
pub fn hud_text(world: &WorldState) -> String {
    format!(
        "Level: {} | Keys: {}/{} | Score: {}",
        world.player.level,
        world.player.keys_collected,
        world.params.required_keys,
        world.player.score,
    )
}

/// Block color for a maze cell.
pub fn cell_color(cell: Cell) -> Color {
    match cell {
        Cell::Wall => Color::DarkGrey,
        Cell::Path => Color::White,
        Cell::Key => Color::Yellow,
        Cell::Exit => Color::Green,
        Cell::Trap => Color::Red,
    }
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    enhanced_keys: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen. Returns whether the terminal
    /// reports key release events.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Glyph::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);

        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back differs from front everywhere.
        self.back.cells.fill(Glyph::INVALID);
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        compose(&mut self.front, world);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Glyph::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Glyph::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let glyph = self.front.get(x, y);
                if glyph == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if glyph.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(glyph.fg))?;
                    last_fg = glyph.fg;
                }
                if glyph.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(glyph.bg))?;
                    last_bg = glyph.bg;
                }

                queue!(self.writer, Print(glyph.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

fn compose(buf: &mut FrameBuffer, w: &WorldState) {
    // HUD row
    buf.fill_row(HUD_ROW, HUD_BG);
    buf.put_str(MAP_COL, HUD_ROW, &hud_text(w), Color::White, HUD_BG);

    // Maze: one colored block per cell, player drawn on top
    for (pos, cell) in w.maze.positions() {
        let col = MAP_COL + pos.x * CELL_W;
        let row = MAP_ROW + pos.y;
        let bg = cell_color(cell);
        if pos == w.player.pos {
            buf.set(col, row, Glyph::new('(', PLAYER_FG, bg));
            buf.set(col + 1, row, Glyph::new(')', PLAYER_FG, bg));
        } else {
            buf.set(col, row, Glyph::new(' ', Color::White, bg));
            buf.set(col + 1, row, Glyph::new(' ', Color::White, bg));
        }
    }

    // Message bar
    let msg_row = MAP_ROW + w.maze.height() + 1;
    if !w.message.is_empty() {
        buf.fill_row(msg_row, MSG_BG);
        buf.put_str(MAP_COL, msg_row, &w.message, Color::Black, MSG_BG);
    }

    // Help bar
    buf.put_str(0, msg_row + 2, HELP, Color::DarkGrey, Glyph::BASE_BG);
}

/// Screen column/row of a maze position.
#[cfg(test)]
fn screen_of(pos: crate::domain::grid::Pos) -> (usize, usize) {
    (MAP_COL + pos.x * CELL_W, MAP_ROW + pos.y)
}
