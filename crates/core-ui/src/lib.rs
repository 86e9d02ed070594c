//! The rendering-surface collaborator.
//!
//! The editor core drives an object-safe [`Ui`]: it pushes fully composed
//! [`Frame`]s and status lines, and pulls keys (already encoded in vim
//! notation) out of it. Two implementations ship: [`term::TermUi`] on
//! crossterm for the real binary, and [`ScriptedUi`] for tests and
//! headless use, which replays a scripted key stream and records what the
//! editor asked it to display.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{Result, bail};

pub mod term;

/// One full redraw of the focused window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Visible lines, without terminators.
    pub lines: Vec<String>,
    /// 1-based buffer line number of `lines[0]`.
    pub first_lineno: usize,
    /// Cursor cell within the frame: (row, column).
    pub cursor: (usize, usize),
    /// Byte spans to highlight, as (row, start column, end column).
    pub selections: Vec<(usize, usize, usize)>,
}

/// Status line content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    /// Mode tag such as `--INSERT--`; empty in normal mode.
    pub mode: String,
    pub file: String,
    /// 1-based cursor line and column.
    pub position: (usize, usize),
    pub modified: bool,
}

pub trait Ui {
    /// Wait up to `timeout` (forever when `None`) for one key. `Ok(None)`
    /// means the timeout elapsed.
    fn poll_key(&mut self, timeout: Option<Duration>) -> Result<Option<String>>;

    /// Drain one key without blocking.
    fn try_key(&mut self) -> Result<Option<String>>;

    fn draw(&mut self, frame: &Frame);
    fn draw_status(&mut self, status: &StatusLine);

    /// One-line informational message, shown until [`Ui::info_hide`].
    fn info(&mut self, msg: &str);
    fn info_hide(&mut self);

    fn prompt(&mut self, title: &str, content: &str);
    fn prompt_hide(&mut self);

    /// Text rows available to a window.
    fn height(&self) -> usize;

    fn window_new(&mut self, _id: usize) {}
    fn window_free(&mut self, _id: usize) {}
    fn window_focus(&mut self, _id: usize) {}

    fn suspend(&mut self) {}
    fn resize(&mut self) {}

    /// Tear the surface down so a fatal message reaches the real terminal.
    fn die(&mut self, msg: &str);
}

/// Headless [`Ui`] replaying a scripted key sequence.
///
/// Keys are handed out one per poll. Once the script is exhausted,
/// `poll_key` reports a timeout a bounded number of times (driving idle
/// hooks) and then fails, so a runaway mainloop in a test aborts instead
/// of spinning.
pub struct ScriptedUi {
    keys: VecDeque<String>,
    idle_budget: usize,
    pub frames: Vec<Frame>,
    pub statuses: Vec<StatusLine>,
    pub infos: Vec<String>,
    pub prompts: Vec<(String, String)>,
    pub died: Option<String>,
    pub height: usize,
}

impl ScriptedUi {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            idle_budget: 4,
            frames: Vec::new(),
            statuses: Vec::new(),
            infos: Vec::new(),
            prompts: Vec::new(),
            died: None,
            height: 24,
        }
    }

    pub fn push_keys(&mut self, keys: &str) {
        self.keys.push_back(keys.to_string());
    }
}

impl Ui for ScriptedUi {
    fn poll_key(&mut self, _timeout: Option<Duration>) -> Result<Option<String>> {
        if let Some(k) = self.keys.pop_front() {
            return Ok(Some(k));
        }
        if self.idle_budget == 0 {
            bail!("scripted input exhausted");
        }
        self.idle_budget -= 1;
        Ok(None)
    }

    fn try_key(&mut self) -> Result<Option<String>> {
        Ok(self.keys.pop_front())
    }

    fn draw(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }

    fn draw_status(&mut self, status: &StatusLine) {
        self.statuses.push(status.clone());
    }

    fn info(&mut self, msg: &str) {
        self.infos.push(msg.to_string());
    }

    fn info_hide(&mut self) {}

    fn prompt(&mut self, title: &str, content: &str) {
        self.prompts.push((title.to_string(), content.to_string()));
    }

    fn prompt_hide(&mut self) {}

    fn height(&self) -> usize {
        self.height
    }

    fn die(&mut self, msg: &str) {
        self.died = Some(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_ui_hands_out_keys_then_idles() {
        let mut ui = ScriptedUi::new(["i", "hi", "<Esc>"]);
        assert_eq!(ui.poll_key(None).unwrap().as_deref(), Some("i"));
        assert_eq!(ui.poll_key(None).unwrap().as_deref(), Some("hi"));
        assert_eq!(ui.poll_key(None).unwrap().as_deref(), Some("<Esc>"));
        assert_eq!(ui.poll_key(None).unwrap(), None);
    }

    #[test]
    fn scripted_ui_fails_after_idle_budget() {
        let mut ui = ScriptedUi::new(Vec::<String>::new());
        while ui.poll_key(None).is_ok_and(|k| k.is_none()) {}
        assert!(ui.poll_key(None).is_err() || ui.idle_budget == 0);
    }
}
