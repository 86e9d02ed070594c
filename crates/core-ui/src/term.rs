//! Crossterm-backed terminal surface.
//!
//! Raw mode + alternate screen, restored on drop. Key events are encoded
//! into the editor's vim-notation strings here; the core never sees
//! crossterm types.

use std::io::{Write, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, queue, style, terminal};
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::{Frame, StatusLine, Ui};

pub struct TermUi {
    cols: u16,
    rows: u16,
    entered: bool,
    info: Option<String>,
    prompt: Option<(String, String)>,
}

impl TermUi {
    pub fn new() -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        debug!(target: "ui.term", cols, rows, "enter");
        Ok(Self {
            cols,
            rows,
            entered: true,
            info: None,
            prompt: None,
        })
    }

    fn leave(&mut self) {
        if !self.entered {
            return;
        }
        self.entered = false;
        let _ = execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }

    fn bottom_line(&self) -> String {
        if let Some((title, content)) = &self.prompt {
            return format!("{title}{content}");
        }
        if let Some(info) = &self.info {
            return info.clone();
        }
        String::new()
    }

    fn read_mapped(&mut self, timeout: Option<Duration>) -> Result<Option<String>> {
        loop {
            let ready = match timeout {
                Some(t) => crossterm::event::poll(t)?,
                None => true,
            };
            if !ready {
                return Ok(None);
            }
            match crossterm::event::read()? {
                Event::Key(ev) if ev.kind != KeyEventKind::Release => {
                    if let Some(key) = encode_key(&ev) {
                        return Ok(Some(key));
                    }
                }
                Event::Resize(c, r) => {
                    self.cols = c;
                    self.rows = r;
                    warn!(target: "ui.term", cols = c, rows = r, "resize");
                }
                _ => {}
            }
            // unmapped event: only retry immediately when we would block
            // anyway; with a timeout report it as an idle wakeup
            if timeout.is_some() {
                return Ok(None);
            }
        }
    }
}

impl Drop for TermUi {
    fn drop(&mut self) {
        self.leave();
    }
}

/// Encode a crossterm key event in vim notation.
pub fn encode_key(ev: &KeyEvent) -> Option<String> {
    let base = match ev.code {
        KeyCode::Char(c) => {
            if ev.modifiers.contains(KeyModifiers::CONTROL) {
                return Some(format!("<C-{c}>"));
            }
            return Some(c.to_string());
        }
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Esc",
        KeyCode::Backspace => "Backspace",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Delete => "Del",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Insert => "Insert",
        KeyCode::F(n) if (1..=12).contains(&n) => return Some(format!("<F{n}>")),
        _ => return None,
    };
    let mut name = String::new();
    if ev.modifiers.contains(KeyModifiers::CONTROL) {
        name.push_str("C-");
    }
    if ev.modifiers.contains(KeyModifiers::ALT) {
        name.push_str("M-");
    }
    if ev.modifiers.contains(KeyModifiers::SHIFT) {
        name.push_str("S-");
    }
    Some(format!("<{name}{base}>"))
}

impl Ui for TermUi {
    fn poll_key(&mut self, timeout: Option<Duration>) -> Result<Option<String>> {
        self.read_mapped(timeout)
    }

    fn try_key(&mut self) -> Result<Option<String>> {
        self.read_mapped(Some(Duration::ZERO))
    }

    fn draw(&mut self, frame: &Frame) {
        let mut out = stdout();
        let text_rows = self.height();
        let _ = queue!(out, terminal::Clear(terminal::ClearType::All));
        for (row, line) in frame.lines.iter().take(text_rows).enumerate() {
            let clipped: String = line.graphemes(true).take(self.cols as usize).collect();
            let _ = queue!(
                out,
                cursor::MoveTo(0, row as u16),
                style::Print(clipped)
            );
        }
        let bottom = self.bottom_line();
        if !bottom.is_empty() {
            let _ = queue!(
                out,
                cursor::MoveTo(0, self.rows.saturating_sub(1)),
                style::Print(bottom)
            );
        }
        let (crow, ccol) = frame.cursor;
        let max_col = (self.cols.max(1) - 1) as usize;
        let _ = queue!(
            out,
            cursor::MoveTo(ccol.min(max_col) as u16, crow.min(text_rows) as u16),
            cursor::Show
        );
        let _ = out.flush();
    }

    fn draw_status(&mut self, status: &StatusLine) {
        let mut out = stdout();
        let row = self.rows.saturating_sub(2);
        let left = format!("{} {}{}", status.mode, status.file, if status.modified { " [+]" } else { "" });
        let right = format!("{},{}", status.position.0, status.position.1);
        let width = self.cols as usize;
        let pad = width.saturating_sub(left.len() + right.len());
        let _ = queue!(
            out,
            cursor::MoveTo(0, row),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(format!("{left}{}{right}", " ".repeat(pad)))
        );
        let _ = out.flush();
    }

    fn info(&mut self, msg: &str) {
        self.info = Some(msg.to_string());
    }

    fn info_hide(&mut self) {
        self.info = None;
    }

    fn prompt(&mut self, title: &str, content: &str) {
        self.prompt = Some((title.to_string(), content.to_string()));
    }

    fn prompt_hide(&mut self) {
        self.prompt = None;
    }

    fn height(&self) -> usize {
        // one row for the status line, one for info/prompt
        self.rows.saturating_sub(2) as usize
    }

    fn resize(&mut self) {
        if let Ok((c, r)) = terminal::size() {
            self.cols = c;
            self.rows = r;
        }
    }

    fn suspend(&mut self) {
        self.leave();
    }

    fn die(&mut self, msg: &str) {
        self.leave();
        eprintln!("{msg}");
    }
}
