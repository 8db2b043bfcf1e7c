use capygotchi::alerts::{NOTICE_LEVEL, WARNING_LEVEL};
use capygotchi::model::{PetPhase, PetState, StatKind, STAT_MAX};
use crossterm::{
    cursor,
    event::{DisableFocusChange, EnableFocusChange},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableFocusChange,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            DisableFocusChange,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Writes only the cells that differ from the last frame.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = false;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if c.bold != last_bold {
                    let attr = if c.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = c.bold;
                }
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bold: bool) {
    for (i, ch) in s.chars().enumerate() {
        let Ok(dx) = u16::try_from(i) else { break };
        buf.set(
            x.saturating_add(dx),
            y,
            Cell {
                ch,
                fg,
                bg: Color::Black,
                bold,
            },
        );
    }
}

/// `[#######...]` with `width` slots.
pub(crate) fn stat_bar(value: u8, width: usize) -> String {
    let filled = (usize::from(value.min(STAT_MAX)) * width + 50) / 100;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    s.extend(std::iter::repeat('#').take(filled));
    s.extend(std::iter::repeat('.').take(width - filled));
    s.push(']');
    s
}

fn stat_color(value: u8, color: bool) -> Color {
    if !color {
        Color::White
    } else if value >= NOTICE_LEVEL {
        Color::Green
    } else if value >= WARNING_LEVEL {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn lowest_stat(st: &PetState) -> u8 {
    StatKind::ALL.iter().map(|&k| st.stat(k)).min().unwrap_or(0)
}

const CAPY_BODY: [&str; 5] = [
    "      ___________     ",
    "   __/           \\__ ",
    "  /  @              o)",
    "  \\__,            __/ ",
    "     |_|_|----|_|_|   ",
];

fn capy_eye(st: &PetState) -> char {
    match lowest_stat(st) {
        v if v >= NOTICE_LEVEL => '^',
        v if v >= WARNING_LEVEL => 'o',
        v if v > 0 => '-',
        _ => 'x',
    }
}

/// Capybara sprite centred on (cx, cy). `bob` lifts it one row.
pub(crate) fn draw_capybara(buf: &mut CellBuffer, st: &PetState, cx: u16, cy: u16, bob: bool) {
    let eye = capy_eye(st);
    let w = CAPY_BODY.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let h = CAPY_BODY.len() as u16;
    let left = cx.saturating_sub(w / 2);
    let top = cy.saturating_sub(h / 2).saturating_sub(u16::from(bob));
    let fur = Color::Rgb {
        r: 176,
        g: 124,
        b: 78,
    };
    for (row, line) in CAPY_BODY.iter().enumerate() {
        let line = line.replace('@', &eye.to_string());
        draw_text(buf, left, top + row as u16, &line, fur, false);
    }
}

/// Left panel: name, bars, coins, key help.
pub(crate) fn draw_panel(buf: &mut CellBuffer, st: &PetState, color: bool) {
    draw_text(buf, 2, 1, &st.name, Color::White, true);
    let status = match st.phase() {
        PetPhase::Active => "at home",
        PetPhase::RanAway => "ran away",
    };
    draw_text(buf, 2, 2, status, Color::DarkGrey, false);

    for (i, kind) in StatKind::ALL.iter().enumerate() {
        let v = st.stat(*kind);
        let y = 4 + i as u16 * 2;
        draw_text(buf, 2, y, kind.label(), Color::White, false);
        draw_text(
            buf,
            12,
            y,
            &format!("{} {:>3}", stat_bar(v, 10), v),
            stat_color(v, color),
            false,
        );
    }

    let coin_color = if color { Color::Yellow } else { Color::White };
    draw_text(buf, 2, 11, &format!("coins  {}", st.currency), coin_color, false);

    let keys = [
        "F feed   W water",
        "P pet    N rename",
        "H help   Q quit",
    ];
    for (i, k) in keys.iter().enumerate() {
        draw_text(buf, 2, 13 + i as u16, k, Color::DarkGrey, false);
    }
}

pub(crate) fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str) {
    let w = buf.w;
    let h = buf.h;

    let bw = w.saturating_sub(4).min(60);
    let bh = h.saturating_sub(4).min(14);
    if bw < 4 || bh < 4 {
        return;
    }

    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;
    let frame = |ch| Cell {
        ch,
        ..Cell::default()
    };

    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            let edge_x = x == x0 || x == x0 + bw - 1;
            let edge_y = y == y0 || y == y0 + bh - 1;
            let ch = match (edge_x, edge_y) {
                (true, true) => match (x == x0, y == y0) {
                    (true, true) => '┌',
                    (false, true) => '┐',
                    (true, false) => '└',
                    (false, false) => '┘',
                },
                (true, false) => '│',
                (false, true) => '─',
                (false, false) => ' ',
            };
            buf.set(x, y, frame(ch));
        }
    }

    draw_text(buf, x0 + 2, y0 + 1, title, Color::White, true);

    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        let clipped: String = line.chars().take(usize::from(bw - 4)).collect();
        draw_text(buf, x0 + 2, yy, &clipped, Color::White, false);
        yy += 1;
    }
}

/// One-line message along the bottom row.
pub(crate) fn draw_toast(buf: &mut CellBuffer, msg: &str) {
    let y = buf.h.saturating_sub(1);
    draw_text(buf, 2, y, msg, Color::Cyan, false);
}
