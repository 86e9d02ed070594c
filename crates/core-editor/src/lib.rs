//! The editor core: modal command interpretation over shared buffers.
//!
//! [`Editor`] owns the mode graph, the pending action, registers, macros,
//! and the file/window registry, and consumes two collaborators: the
//! [`core_text::Text`] buffer and the [`core_ui::Ui`] surface. Keystrokes
//! flow mainloop -> key reader -> mode graph; a completed parse runs the
//! executor over every cursor of the focused view (`exec.rs`).
//!
//! Interpreter shape: the input queue is a flat keystring. For each prefix
//! we walk the mode chain upward; an exact binding wins at the innermost
//! mode, a partial match holds the parse, anything else falls through to
//! the registered-action table or the mode's input hook. Aliases re-enter
//! the parse in place.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use core_input::{is_named_key_prefix, key_char, key_len};
use core_text::{RopeText, Text};
use core_ui::{Frame, StatusLine, Ui};
use regex::Regex;
use tracing::{debug, info, trace, warn};
use unicode_segmentation::UnicodeSegmentation;

pub mod action;
pub mod bindings;
mod exec;
pub mod jumps;
pub mod macros;
pub mod mainloop;
pub mod modes;
pub mod motions;
pub mod operators;
pub mod register;
pub mod textobjects;
pub mod window;

use action::{Action, OpArg};
use macros::{MacroSlot, Macros};
use modes::{Binding, KeyAction, Mode, ModeId};
use motions::MotionKind;
use operators::OperatorKind;
use register::{NUM_REGISTERS, Register};
use textobjects::TextObjectKind;
use window::{CursorId, File, FileId, MarkId, Win, WinId};

/// Editor-wide options, loaded by the binary from `ved.toml`.
#[derive(Debug, Clone)]
pub struct Options {
    pub tabwidth: usize,
    pub expandtab: bool,
    pub autoindent: bool,
    /// Insert-mode quiescence before an automatic undo snapshot.
    pub insert_idle: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tabwidth: 8,
            expandtab: false,
            autoindent: false,
            insert_idle: Duration::from_secs(3),
        }
    }
}

/// Hook evaluating `:` commands; the evaluator itself is a collaborator.
pub type CmdHandler = fn(&mut Editor, &str) -> bool;

pub struct Editor {
    pub modes: Vec<Mode>,
    pub mode: ModeId,
    pub mode_prev: ModeId,
    mode_before_prompt: ModeId,

    pub files: Vec<Option<File>>,
    pub wins: Vec<Option<Win>>,
    /// Window cycle order; excludes the prompt window.
    pub order: Vec<WinId>,
    /// Focused window.
    pub win: WinId,
    prompt_win: WinId,
    prompt_file: FileId,
    prompt_type: char,
    prompt_backup: Option<WinId>,

    pub action: Action,
    pub action_prev: Action,
    pub registers: Vec<Register>,
    pub macros: Macros,

    input_queue: String,
    /// Incomplete trailing key fragment awaiting more input.
    fragment: String,
    /// Keys spliced in by an action, consumed at the current parse point.
    injected: Option<String>,

    pub search_pattern: Option<Regex>,
    pub search_char: Option<char>,
    pub last_totill: Option<MotionKind>,

    pub options: Options,
    pub ui: Box<dyn Ui>,
    pub actions: HashMap<&'static str, &'static KeyAction>,
    pub cmd_handler: Option<CmdHandler>,

    pub running: bool,
    pub exit_status: i32,
    /// Set by SIGINT; long-running collaborator operations poll it.
    pub cancel_filter: bool,
}

impl Editor {
    pub fn new(ui: Box<dyn Ui>) -> Self {
        let options = Options::default();
        let mut files = Vec::new();
        let mut wins = Vec::new();
        // the prompt holds an internal file reference from the start
        files.push(Some(File::new(Box::new(RopeText::new("")), None)));
        wins.push(Some(Win::new(0)));
        let mut ed = Self {
            modes: modes::mode_table(options.insert_idle),
            mode: ModeId::Normal,
            mode_prev: ModeId::Normal,
            mode_before_prompt: ModeId::Normal,
            files,
            wins,
            order: Vec::new(),
            win: 0,
            prompt_win: 0,
            prompt_file: 0,
            prompt_type: ':',
            prompt_backup: None,
            action: Action::default(),
            action_prev: Action::default(),
            registers: vec![Register::default(); NUM_REGISTERS],
            macros: Macros::default(),
            input_queue: String::new(),
            fragment: String::new(),
            injected: None,
            search_pattern: None,
            search_char: None,
            last_totill: None,
            options,
            ui,
            actions: HashMap::new(),
            cmd_handler: None,
            running: false,
            exit_status: 0,
            cancel_filter: false,
        };
        bindings::install(&mut ed);
        ed
    }

    /// Apply loaded options, propagating the idle timeout to the modes
    /// that snapshot on quiescence.
    pub fn set_options(&mut self, options: Options) {
        self.modes[ModeId::Insert.index()].idle_timeout = Some(options.insert_idle);
        self.modes[ModeId::Replace.index()].idle_timeout = Some(options.insert_idle);
        self.options = options;
    }

    // ---------------------------------------------------------------------
    // registry access
    // ---------------------------------------------------------------------

    pub fn file(&self, fid: FileId) -> Option<&File> {
        self.files.get(fid).and_then(|f| f.as_ref())
    }

    pub fn file_mut(&mut self, fid: FileId) -> Option<&mut File> {
        self.files.get_mut(fid).and_then(|f| f.as_mut())
    }

    pub fn win_ref(&self, wid: WinId) -> Option<&Win> {
        self.wins.get(wid).and_then(|w| w.as_ref())
    }

    pub fn win_mut(&mut self, wid: WinId) -> Option<&mut Win> {
        self.wins.get_mut(wid).and_then(|w| w.as_mut())
    }

    pub fn cur_file_id(&self) -> FileId {
        self.win_ref(self.win).map(|w| w.file).unwrap_or(self.prompt_file)
    }

    /// Content of the focused buffer (test and command surface).
    pub fn text_content(&self) -> String {
        self.file(self.cur_file_id())
            .map(|f| f.text.content())
            .unwrap_or_default()
    }

    /// Primary cursor position of the focused window.
    pub fn cursor_pos(&self) -> usize {
        self.win_ref(self.win).map(|w| w.view.primary().pos).unwrap_or(0)
    }

    fn cur_mode(&self) -> &Mode {
        &self.modes[self.mode.index()]
    }

    pub fn mode_is_visual(&self) -> bool {
        self.cur_mode().visual
    }

    // ---------------------------------------------------------------------
    // key reader
    // ---------------------------------------------------------------------

    /// Feed raw input. Complete keys are appended to any active recorders
    /// and then interpreted; an incomplete bracketed key is held back
    /// until more input arrives, so fragmentation is transparent.
    pub fn keys(&mut self, input: &str) {
        self.feed(input, true);
    }

    /// Give up on an incomplete bracketed key and interpret it literally.
    /// The mainloop calls this when input goes quiet.
    pub fn keys_flush(&mut self) {
        self.feed("", false);
    }

    fn feed(&mut self, input: &str, hold_partial: bool) {
        let mut buf = std::mem::take(&mut self.fragment);
        buf.push_str(input);
        let mut at = 0;
        while at < buf.len() {
            let rest = &buf[at..];
            if hold_partial
                && rest.starts_with('<')
                && !rest.contains('>')
                && is_named_key_prefix(&rest[1..])
            {
                break; // an angle-bracketed key still growing
            }
            let len = key_len(rest, &|name| self.actions.contains_key(name));
            if len == 0 {
                break;
            }
            let key = buf[at..at + len].to_string();
            at += len;
            if let Some(slot) = self.macros.recording {
                self.macros.append(slot, &key);
            }
            if self.macros.operator_active {
                self.macros.append(MacroSlot::Operator, &key);
            }
            self.input_queue.push_str(&key);
            let mut queue = std::mem::take(&mut self.input_queue);
            self.keys_raw(&mut queue);
            queue.push_str(&self.input_queue); // anything queued re-entrantly
            self.input_queue = queue;
        }
        self.fragment = buf[at..].to_string();
    }

    /// Splice keys into the pending input at the current parse position.
    /// While the operator macro records, injected keys are captured too.
    pub fn keys_inject(&mut self, input: &str) {
        if self.macros.operator_active {
            self.macros.append(MacroSlot::Operator, input);
        }
        match &mut self.injected {
            Some(pending) => pending.push_str(input),
            None => self.injected = Some(input.to_string()),
        }
    }

    /// Interpret the buffer in place, leaving any unresolved prefix.
    fn keys_raw(&mut self, buf: &mut String) {
        let mut start = 0; // begin of the prefix under consideration
        let mut cur = start; // begin of the most recent key
        while cur < buf.len() {
            let len = key_len(&buf[cur..], &|name| self.actions.contains_key(name));
            if len == 0 {
                break;
            }
            let end = cur + len;
            let prefix = &buf[start..end];
            let is_literal_lt = &buf[cur..end] == "<";

            // walk the mode chain for an exact or partial match
            let mut binding = None;
            let mut partial = false;
            let mut mode = Some(self.mode);
            while let Some(id) = mode {
                let m = &self.modes[id.index()];
                if let Some(b) = m.binding(prefix) {
                    binding = Some(b);
                    break;
                }
                // "<" never opens a prefix: it doubles as the escape
                // character for named key symbols
                if !is_literal_lt && m.contains_prefix(prefix) {
                    partial = true;
                    break;
                }
                mode = m.parent;
            }

            if let Some(b) = binding {
                match b {
                    Binding::Action(act) => {
                        trace!(target: "keys.bind", key = prefix, action = act.name, "exact");
                        let Some(extra) = (act.func)(self, &buf[end..], &act.arg) else {
                            break; // action needs more input; hold the parse
                        };
                        let mut next = end + extra;
                        if let Some(inj) = self.injected.take() {
                            buf.insert_str(next, &inj);
                        }
                        if next > buf.len() {
                            next = buf.len();
                        }
                        start = next;
                        cur = next;
                    }
                    Binding::Alias(alias) => {
                        trace!(target: "keys.bind", key = prefix, alias, "alias");
                        buf.replace_range(start..end, alias);
                        buf.drain(..start);
                        start = 0;
                        cur = 0;
                    }
                }
            } else if partial {
                cur = end;
            } else {
                // no binding: bracketed names may still be editor actions
                let pending = buf[start..end].to_string();
                if pending.starts_with('<')
                    && pending.ends_with('>')
                    && let Some(&act) = self.actions.get(&pending[1..pending.len() - 1])
                {
                    debug!(target: "keys.bind", action = act.name, "registry");
                    let Some(extra) = (act.func)(self, &buf[end..], &act.arg) else {
                        break;
                    };
                    let mut next = end + extra;
                    if let Some(inj) = self.injected.take() {
                        buf.insert_str(next, &inj);
                    }
                    if next > buf.len() {
                        next = buf.len();
                    }
                    start = next;
                    cur = next;
                } else {
                    self.mode_input(&pending);
                    start = end;
                    cur = end;
                }
            }
        }
        buf.drain(..start);
    }

    // ---------------------------------------------------------------------
    // modes
    // ---------------------------------------------------------------------

    pub fn mode_switch(&mut self, id: ModeId) {
        self.mode_set(id);
    }

    fn mode_set(&mut self, new: ModeId) {
        if self.mode == new {
            return;
        }
        let old = self.mode;
        debug!(target: "mode", from = self.modes[old.index()].name, to = self.modes[new.index()].name, "switch");
        self.mode_leave(old, new);
        if self.modes[old.index()].is_user {
            self.mode_prev = old;
        }
        self.mode = new;
        self.mode_enter(new, self.mode_prev);
        let status = self.status_line();
        self.ui.draw_status(&status);
    }

    fn mode_enter(&mut self, id: ModeId, prev: ModeId) {
        match id {
            ModeId::Operator => {
                // expose text objects while an operator awaits its motion
                self.modes[ModeId::Operator.index()].parent = Some(ModeId::OperatorOption);
            }
            ModeId::Visual => {
                if !self.modes[prev.index()].visual {
                    self.selections_start();
                    self.modes[ModeId::Operator.index()].parent = Some(ModeId::TextObj);
                }
            }
            ModeId::VisualLine => {
                if !self.modes[prev.index()].visual {
                    self.selections_start();
                    self.modes[ModeId::Operator.index()].parent = Some(ModeId::TextObj);
                }
                self.motion(MotionKind::LineEnd);
            }
            ModeId::Prompt => {
                if self.modes[prev.index()].is_user && prev != ModeId::Prompt {
                    self.mode_before_prompt = prev;
                }
            }
            ModeId::Insert => {
                if !self.macros.operator_active {
                    self.macros.operator_record();
                    self.action_prev.reset();
                    self.action_prev.macro_slot = Some(MacroSlot::Operator);
                    self.action_prev.op = Some(OperatorKind::Insert);
                }
            }
            ModeId::Replace => {
                if !self.macros.operator_active {
                    self.macros.operator_record();
                    self.action_prev.reset();
                    self.action_prev.macro_slot = Some(MacroSlot::Operator);
                    self.action_prev.op = Some(OperatorKind::Replace);
                }
            }
            _ => {}
        }
    }

    fn mode_leave(&mut self, old: ModeId, new: ModeId) {
        match old {
            ModeId::Operator => {
                self.modes[ModeId::Operator.index()].parent = Some(ModeId::Move);
            }
            ModeId::Visual | ModeId::VisualLine => {
                if !self.modes[new.index()].visual {
                    self.selections_clear();
                    self.modes[ModeId::Operator.index()].parent = Some(ModeId::Move);
                }
            }
            ModeId::Prompt => {
                if self.modes[new.index()].is_user {
                    self.prompt_hide();
                }
            }
            ModeId::Insert | ModeId::Replace => {
                self.snapshot_focused();
                if new == ModeId::Normal {
                    self.macros.operator_stop();
                }
            }
            _ => {}
        }
    }

    /// A stray key the binding tables do not know.
    fn mode_input(&mut self, key: &str) {
        match self.mode {
            ModeId::Operator => {
                // invalid operator combination: drop the parse, pop back
                self.action.reset();
                self.mode_set(self.mode_prev);
            }
            ModeId::Insert | ModeId::Prompt => {
                if let Some(c) = key_char(key) {
                    self.insert_key(&c.to_string());
                } else if !key.starts_with('<') {
                    self.insert_key(key);
                }
            }
            ModeId::Replace => {
                if let Some(c) = key_char(key) {
                    self.replace_key(&c.to_string());
                } else if !key.starts_with('<') {
                    self.replace_key(key);
                }
            }
            _ => trace!(target: "keys.bind", key, "unbound"),
        }
    }

    pub(crate) fn mode_idle(&mut self) {
        if matches!(self.mode, ModeId::Insert | ModeId::Replace) {
            self.snapshot_focused();
        }
    }

    pub(crate) fn idle_timeout(&self) -> Option<Duration> {
        self.cur_mode().idle_timeout
    }

    // ---------------------------------------------------------------------
    // pending-action builders (bound to keys)
    // ---------------------------------------------------------------------

    /// Execute a motion, completing the pending action.
    pub fn motion(&mut self, m: MotionKind) -> bool {
        let mut m = m;
        match m {
            // `cw` behaves like `ce`
            MotionKind::WordStartNext if self.action.op == Some(OperatorKind::Change) => {
                m = MotionKind::WordEndNext;
            }
            MotionKind::LongwordStartNext if self.action.op == Some(OperatorKind::Change) => {
                m = MotionKind::LongwordEndNext;
            }
            MotionKind::TotillRepeat => {
                let Some(last) = self.last_totill else {
                    self.action.reset();
                    return false;
                };
                m = last;
            }
            MotionKind::TotillReverse => {
                let Some(rev) = self.last_totill.and_then(|l| {
                    Some(match l {
                        MotionKind::RightTo => MotionKind::LeftTo,
                        MotionKind::LeftTo => MotionKind::RightTo,
                        MotionKind::RightTill => MotionKind::LeftTill,
                        MotionKind::LeftTill => MotionKind::RightTill,
                        _ => return None,
                    })
                }) else {
                    self.action.reset();
                    return false;
                };
                m = rev;
            }
            _ => {}
        }
        self.action.movement = Some(m);
        self.action_do_pending();
        true
    }

    /// Find-char motion: remember the key for `;` and `,`.
    pub fn motion_find(&mut self, m: MotionKind, ch: char) -> bool {
        self.search_char = Some(ch);
        self.last_totill = Some(m);
        self.motion(m)
    }

    /// Search motion from a pattern string. A compile failure refuses the
    /// motion and resets the pending action.
    pub fn motion_search(&mut self, forward: bool, pattern: &str) -> bool {
        match Regex::new(pattern) {
            Ok(re) => {
                self.search_pattern = Some(re);
                self.motion(if forward {
                    MotionKind::SearchNext
                } else {
                    MotionKind::SearchPrev
                })
            }
            Err(err) => {
                warn!(target: "search", pattern, %err, "regex_compile_failed");
                self.info(&format!("Invalid pattern: {pattern}"));
                self.action.reset();
                false
            }
        }
    }

    pub fn motion_mark(&mut self, m: MotionKind, mark: MarkId) -> bool {
        self.action.mark = Some(mark);
        self.motion(m)
    }

    /// Execute a text object, completing the pending action.
    pub fn textobject(&mut self, kind: TextObjectKind) {
        self.action.textobj = Some(kind);
        self.action_do_pending();
    }

    /// Stage an operator. In visual modes it executes immediately over the
    /// selection; otherwise the operator mode awaits a motion, with the
    /// doubled-operator shorthand (`dd`, `yy`) turning into a linewise
    /// whole-line action.
    pub fn operator(&mut self, kind: OperatorKind, arg: OpArg) {
        self.action.arg = arg;
        if self.mode_is_visual() {
            self.action.op = Some(kind);
            self.action_do_pending();
            return;
        }
        self.mode_switch(ModeId::Operator);
        if self.action.op == Some(kind) {
            self.action.kind = action::MotionType::LINEWISE;
            self.motion(MotionKind::LineNext);
        } else {
            self.action.op = Some(kind);
        }
        // put needs no range to operate on
        if kind == OperatorKind::Put {
            self.motion(MotionKind::Nop);
        }
    }

    // ---------------------------------------------------------------------
    // macros and repeat
    // ---------------------------------------------------------------------

    pub fn macro_record(&mut self, slot: MacroSlot) -> bool {
        self.macros.record(slot)
    }

    pub fn macro_record_stop(&mut self) -> bool {
        self.macros.record_stop()
    }

    /// Replay a macro by re-feeding its keys through the interpreter.
    pub fn macro_replay(&mut self, slot: MacroSlot) -> bool {
        if self.macros.recording == Some(slot) {
            return false;
        }
        let mut buf = self.macros.get(slot).to_string();
        debug!(target: "macro", ?slot, len = buf.len(), "replay");
        self.keys_raw(&mut buf);
        true
    }

    /// `.`: replay the last repeatable action. The operator macro is first
    /// copied into the repeat slot so later edits cannot mutate history.
    pub fn repeat(&mut self) {
        let new_count = self.action.count;
        let mut slot = self.action_prev.macro_slot;
        if slot == Some(MacroSlot::Operator) {
            let copy = self.macros.get(MacroSlot::Operator).to_string();
            self.macros.set(MacroSlot::Repeat, copy);
            slot = Some(MacroSlot::Repeat);
            self.action_prev.macro_slot = slot;
        }
        if new_count > 0 {
            self.action_prev.count = new_count;
        }
        let count = self.action_prev.count;
        // for insert/replace the operator runs once and the typed text is
        // replayed `count` times
        if matches!(
            self.action_prev.op,
            Some(OperatorKind::Insert) | Some(OperatorKind::Replace)
        ) {
            self.action_prev.count = 1;
        }
        let prev = self.action_prev.clone();
        self.action_do(prev, true);
        self.action_prev.count = count;
        if let Some(slot) = slot {
            let mode = self.mode;
            let saved = self.action_prev.clone();
            let mut n = saved.count;
            if n < 1 || saved.op == Some(OperatorKind::Change) {
                n = 1;
            }
            for _ in 0..n {
                self.mode_set(mode);
                self.macro_replay(slot);
            }
            self.action_prev = saved;
        }
        self.action.reset();
    }

    // ---------------------------------------------------------------------
    // text entry
    // ---------------------------------------------------------------------

    /// Insert at every cursor of the focused view.
    pub fn insert_key(&mut self, data: &str) {
        let win = self.win;
        let fid = self.cur_file_id();
        let ids = match self.win_ref(win) {
            Some(w) => w.view.ids(),
            None => return,
        };
        for cid in ids {
            let Some(pos) = self.win_ref(win).and_then(|w| w.view.cursor(cid)).map(|c| c.pos)
            else {
                continue;
            };
            self.text_insert(fid, pos, data);
            self.scroll_to(win, pos + data.len());
        }
    }

    /// Replace-mode entry: overtype up to the same number of characters
    /// before the line end, then insert.
    pub fn replace_key(&mut self, data: &str) {
        let win = self.win;
        let fid = self.cur_file_id();
        let ids = match self.win_ref(win) {
            Some(w) => w.view.ids(),
            None => return,
        };
        let chars = data.chars().count();
        for cid in ids {
            let Some(pos) = self.win_ref(win).and_then(|w| w.view.cursor(cid)).map(|c| c.pos)
            else {
                continue;
            };
            let del = {
                let Some(file) = self.file(fid) else { continue };
                let txt = &*file.text;
                let mut it = pos;
                for _ in 0..chars {
                    match txt.byte_get(it) {
                        Some(b'\r') | Some(b'\n') | None => break,
                        _ => it = txt.char_next(it),
                    }
                }
                it - pos
            };
            self.text_delete(fid, pos, del);
            self.text_insert(fid, pos, data);
            self.scroll_to(win, pos + data.len());
        }
    }

    /// Insert a line break of the buffer's newline type, with optional
    /// auto-indent copied from the previous line.
    pub fn insert_nl(&mut self) {
        let fid = self.cur_file_id();
        let nl = self
            .file(fid)
            .map(|f| f.text.newline_type().as_str())
            .unwrap_or("\n");
        self.insert_key(nl);
        if self.options.autoindent {
            let indent = {
                let Some(file) = self.file(fid) else { return };
                let txt = &*file.text;
                let pos = self.cursor_pos();
                let prev_line = txt.line_prev(pos);
                if pos == prev_line {
                    return;
                }
                let begin = txt.line_begin(prev_line);
                let start = txt.line_start(prev_line);
                txt.bytes_in(begin, start)
            };
            if !indent.is_empty() {
                self.insert_key(&indent);
            }
        }
    }

    /// Insert what the Tab key stands for under the current options.
    pub fn insert_tab(&mut self) {
        let tab = operators::expandtab(self.options.tabwidth, self.options.expandtab);
        self.insert_key(&tab);
    }

    /// Backspace: delete the character before every cursor.
    pub fn delete_key_backward(&mut self) {
        let win = self.win;
        let fid = self.cur_file_id();
        let ids = match self.win_ref(win) {
            Some(w) => w.view.ids(),
            None => return,
        };
        for cid in ids {
            let Some(pos) = self.win_ref(win).and_then(|w| w.view.cursor(cid)).map(|c| c.pos)
            else {
                continue;
            };
            if pos == 0 {
                continue;
            }
            let prev = self
                .file(fid)
                .map(|f| f.text.char_prev(pos))
                .unwrap_or(pos);
            self.text_delete(fid, prev, pos - prev);
        }
    }

    /// Delete: remove the character under every cursor.
    pub fn delete_key_forward(&mut self) {
        let win = self.win;
        let fid = self.cur_file_id();
        let ids = match self.win_ref(win) {
            Some(w) => w.view.ids(),
            None => return,
        };
        for cid in ids {
            let Some(pos) = self.win_ref(win).and_then(|w| w.view.cursor(cid)).map(|c| c.pos)
            else {
                continue;
            };
            let next = self
                .file(fid)
                .map(|f| f.text.char_next(pos))
                .unwrap_or(pos);
            self.text_delete(fid, pos, next - pos);
        }
    }

    // ---------------------------------------------------------------------
    // edits: every mutation re-anchors all views of the file
    // ---------------------------------------------------------------------

    pub fn text_insert(&mut self, fid: FileId, pos: usize, data: &str) -> bool {
        let Some(file) = self.file_mut(fid) else {
            return false;
        };
        if !file.text.insert(pos, data) {
            return false;
        }
        let len = data.len();
        for w in self.wins.iter_mut().flatten() {
            if w.file == fid {
                w.view.adjust_insert(pos, len);
            }
        }
        true
    }

    pub fn text_delete(&mut self, fid: FileId, pos: usize, len: usize) -> bool {
        if len == 0 {
            return true;
        }
        let Some(file) = self.file_mut(fid) else {
            return false;
        };
        if !file.text.delete(pos, len) {
            return false;
        }
        for w in self.wins.iter_mut().flatten() {
            if w.file == fid {
                w.view.adjust_delete(pos, len);
            }
        }
        true
    }

    pub(crate) fn snapshot_focused(&mut self) {
        let fid = self.cur_file_id();
        if let Some(file) = self.file_mut(fid) {
            file.text.snapshot();
        }
    }

    pub fn undo(&mut self) {
        let win = self.win;
        let fid = self.cur_file_id();
        let pos = self.file_mut(fid).and_then(|f| f.text.undo());
        match pos {
            Some(p) => self.after_history_move(win, fid, p),
            None => self.info("Already at oldest change"),
        }
    }

    pub fn redo(&mut self) {
        let win = self.win;
        let fid = self.cur_file_id();
        let pos = self.file_mut(fid).and_then(|f| f.text.redo());
        match pos {
            Some(p) => self.after_history_move(win, fid, p),
            None => self.info("Already at newest change"),
        }
    }

    fn after_history_move(&mut self, win: WinId, fid: FileId, pos: usize) {
        let size = self.file(fid).map(|f| f.text.size()).unwrap_or(0);
        for w in self.wins.iter_mut().flatten() {
            if w.file == fid {
                for c in w.view.cursors.iter_mut() {
                    c.pos = c.pos.min(size);
                    c.anchor = None;
                    c.sel = None;
                }
            }
        }
        if let Some(w) = self.win_mut(win) {
            w.view.primary_mut().pos = pos.min(size);
        }
        self.scroll_to(win, pos);
        self.draw();
    }

    // ---------------------------------------------------------------------
    // cursors and selections
    // ---------------------------------------------------------------------

    pub(crate) fn cursor_to(&mut self, win: WinId, cid: CursorId, pos: usize) {
        let fid = match self.win_ref(win) {
            Some(w) => w.file,
            None => return,
        };
        let (pos, sel) = {
            let Some(file) = self.file(fid) else { return };
            let txt = &*file.text;
            let pos = pos.min(txt.size());
            let anchor = self
                .win_ref(win)
                .and_then(|w| w.view.cursor(cid))
                .and_then(|c| c.anchor);
            let sel = anchor.map(|a| {
                let (lo, hi) = if a <= pos { (a, pos) } else { (pos, a) };
                (lo, txt.char_next(hi))
            });
            (pos, sel)
        };
        if let Some(c) = self.win_mut(win).and_then(|w| w.view.cursor_mut(cid)) {
            c.pos = pos;
            if sel.is_some() {
                c.sel = sel;
            }
        }
    }

    fn selections_start(&mut self) {
        let win = self.win;
        let fid = self.cur_file_id();
        let Editor { files, wins, .. } = self;
        let Some(file) = files.get(fid).and_then(|f| f.as_ref()) else {
            return;
        };
        if let Some(w) = wins.get_mut(win).and_then(|w| w.as_mut()) {
            w.view.selections_start(&*file.text);
        }
    }

    fn selections_clear(&mut self) {
        let win = self.win;
        if let Some(w) = self.win_mut(win) {
            w.view.selections_clear();
        }
    }

    /// Record the selection endpoints in the file-global `'<` / `'>` marks.
    pub(crate) fn selection_marks_set(&mut self, fid: FileId, range: core_text::ByteRange) {
        if let Some(file) = self.file_mut(fid) {
            let start = file.text.mark_set(range.0);
            let end = file.text.mark_set(range.1);
            file.marks[MarkId::SelectionStart.index()] = Some(start);
            file.marks[MarkId::SelectionEnd.index()] = Some(end);
        }
    }

    pub fn mark_set_at_cursor(&mut self, id: MarkId) {
        let fid = self.cur_file_id();
        let pos = self.cursor_pos();
        if let Some(file) = self.file_mut(fid) {
            let mark = file.text.mark_set(pos);
            file.marks[id.index()] = Some(mark);
        }
    }

    // ---------------------------------------------------------------------
    // windows and files
    // ---------------------------------------------------------------------

    /// Open a window. Filenames already open share the existing `File`.
    pub fn window_new(&mut self, filename: Option<&str>) -> Result<()> {
        let fid = self.file_new(filename)?;
        let wid = self.win_insert(Win::new(fid));
        self.order.push(wid);
        self.win = wid;
        self.ui.window_new(wid);
        self.ui.window_focus(wid);
        info!(target: "win", wid, file = filename.unwrap_or("-"), "window_new");
        self.draw();
        Ok(())
    }

    fn win_insert(&mut self, win: Win) -> WinId {
        for (i, slot) in self.wins.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(win);
                return i;
            }
        }
        self.wins.push(Some(win));
        self.wins.len() - 1
    }

    fn file_new(&mut self, filename: Option<&str>) -> Result<FileId> {
        if let Some(name) = filename {
            for (fid, file) in self.files.iter_mut().enumerate() {
                if let Some(f) = file
                    && f.name.as_deref() == Some(name)
                {
                    f.refcount += 1;
                    return Ok(fid);
                }
            }
        }
        let text: RopeText = match filename {
            Some(name) => {
                let path = Path::new(name);
                if path.exists() {
                    RopeText::load(path).with_context(|| format!("load {name}"))?
                } else {
                    RopeText::new("")
                }
            }
            None => RopeText::new(""),
        };
        let stat = text.loaded_at();
        let mut file = File::new(Box::new(text), filename.map(str::to_string));
        file.stat = stat;
        for (fid, slot) in self.files.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(file);
                return Ok(fid);
            }
        }
        self.files.push(Some(file));
        Ok(self.files.len() - 1)
    }

    fn file_release(&mut self, fid: FileId) {
        if let Some(file) = self.file_mut(fid) {
            file.refcount -= 1;
            if file.refcount == 0 {
                self.files[fid] = None;
            }
        }
    }

    /// Close a window; returns false when no windows remain.
    pub fn window_close(&mut self, wid: WinId) -> bool {
        let Some(fid) = self.win_ref(wid).map(|w| w.file) else {
            return !self.order.is_empty();
        };
        self.file_release(fid);
        self.wins[wid] = None;
        self.order.retain(|&w| w != wid);
        self.ui.window_free(wid);
        if self.win == wid {
            if let Some(&next) = self.order.first() {
                self.win = next;
                self.ui.window_focus(next);
            }
        }
        self.draw();
        !self.order.is_empty()
    }

    /// Split: a second window onto the same file, sharing its `Text`.
    pub fn window_split(&mut self) -> bool {
        let Some(src) = self.win_ref(self.win) else {
            return false;
        };
        let fid = src.file;
        let pos = src.view.primary().pos;
        let top = src.view_top;
        let Some(file) = self.file_mut(fid) else {
            return false;
        };
        file.refcount += 1;
        let mut win = Win::new(fid);
        win.view.primary_mut().pos = pos;
        win.view_top = top;
        let wid = self.win_insert(win);
        self.order.push(wid);
        self.win = wid;
        self.ui.window_new(wid);
        self.ui.window_focus(wid);
        self.draw();
        true
    }

    pub fn window_next(&mut self) {
        if let Some(at) = self.order.iter().position(|&w| w == self.win) {
            self.win = self.order[(at + 1) % self.order.len()];
            self.ui.window_focus(self.win);
            self.draw();
        }
    }

    pub fn window_prev(&mut self) {
        if let Some(at) = self.order.iter().position(|&w| w == self.win) {
            let n = self.order.len();
            self.win = self.order[(at + n - 1) % n];
            self.ui.window_focus(self.win);
            self.draw();
        }
    }

    // ---------------------------------------------------------------------
    // prompt
    // ---------------------------------------------------------------------

    /// Bring up the command/search prompt. The prompt is a window over an
    /// internal file, so all editing machinery applies to it.
    pub fn prompt_show(&mut self, title: &str, content: &str) {
        if self.prompt_backup.is_some() {
            return;
        }
        let pfid = self.prompt_file;
        let size = self.file(pfid).map(|f| f.text.size()).unwrap_or(0);
        self.text_delete(pfid, 0, size);
        self.text_insert(pfid, 0, content);
        let pwin = self.prompt_win;
        if let Some(w) = self.win_mut(pwin) {
            w.view.collapse();
            w.view.primary_mut().pos = content.len();
        }
        self.prompt_backup = Some(self.win);
        self.win = pwin;
        self.prompt_type = title.chars().next().unwrap_or(':');
        self.ui.prompt(title, content);
        self.mode_switch(ModeId::Prompt);
    }

    fn prompt_hide(&mut self) {
        if let Some(w) = self.prompt_backup.take() {
            self.ui.prompt_hide();
            self.win = w;
        }
    }

    /// The prompt's Enter: restore the previous mode (and focused window)
    /// first, then evaluate, so evaluation sees the real window.
    pub fn prompt_enter(&mut self) {
        let input = self
            .file(self.prompt_file)
            .map(|f| f.text.content())
            .unwrap_or_default();
        let input = input.trim_end_matches('\n').to_string();
        let ty = self.prompt_type;
        self.mode_set(self.mode_before_prompt);
        if !input.is_empty() {
            self.prompt_cmd(ty, &input);
        }
        if self.running {
            self.mode_switch(ModeId::Normal);
        }
        self.draw();
    }

    pub fn prompt_escape(&mut self) {
        self.mode_set(self.mode_before_prompt);
        self.draw();
    }

    /// Dispatch a prompt line: search motions or the ex-command hook.
    pub fn prompt_cmd(&mut self, ty: char, cmd: &str) -> bool {
        match ty {
            '/' => self.motion_search(true, cmd),
            '?' => self.motion_search(false, cmd),
            ':' | '+' => match self.cmd_handler {
                Some(handler) => handler(self, cmd),
                None => {
                    self.info(&format!("Not an editor command: {cmd}"));
                    false
                }
            },
            _ => false,
        }
    }

    // ---------------------------------------------------------------------
    // surface
    // ---------------------------------------------------------------------

    pub fn info(&mut self, msg: &str) {
        self.ui.info(msg);
    }

    pub fn exit(&mut self, status: i32) {
        self.running = false;
        self.exit_status = status;
    }

    /// Fatal: tear down the surface and produce the error to propagate.
    pub fn die(&mut self, msg: &str) -> anyhow::Error {
        self.running = false;
        self.exit_status = 1;
        self.ui.die(msg);
        anyhow::anyhow!("{msg}")
    }

    pub(crate) fn scroll_to(&mut self, win: WinId, pos: usize) {
        let height = self.ui.height().max(1);
        let Some(fid) = self.win_ref(win).map(|w| w.file) else {
            return;
        };
        let Some(file) = self.file(fid) else { return };
        let ln = file.text.lineno_by_pos(pos);
        if let Some(w) = self.win_mut(win) {
            if ln < w.view_top {
                w.view_top = ln;
            } else if ln >= w.view_top + height {
                w.view_top = ln + 1 - height;
            }
        }
    }

    fn status_line(&self) -> StatusLine {
        let fid = self.cur_file_id();
        let (name, modified, position) = match self.file(fid) {
            Some(file) => {
                let pos = self.cursor_pos();
                let ln = file.text.lineno_by_pos(pos);
                let col = file
                    .text
                    .bytes_in(file.text.line_begin(pos), pos)
                    .graphemes(true)
                    .count()
                    + 1;
                (
                    file.name.clone().unwrap_or_else(|| "[No Name]".to_string()),
                    file.text.modified(),
                    (ln, col),
                )
            }
            None => ("[No Name]".to_string(), false, (1, 1)),
        };
        StatusLine {
            mode: self.cur_mode().status.to_string(),
            file: name,
            position,
            modified,
        }
    }

    fn build_frame(&self) -> Frame {
        let mut frame = Frame::default();
        let Some(win) = self.win_ref(self.win) else {
            return frame;
        };
        let Some(file) = self.file(win.file) else {
            return frame;
        };
        let txt = &*file.text;
        let height = self.ui.height().max(1);
        let total = txt.lineno_by_pos(txt.size());
        let top = win.view_top.min(total).max(1);
        frame.first_lineno = top;
        for ln in top..top + height {
            if ln > total {
                break;
            }
            let begin = txt.pos_by_lineno(ln);
            frame.lines.push(txt.bytes_in(begin, txt.line_end(begin)));
        }
        let pos = win.view.primary().pos;
        let ln = txt.lineno_by_pos(pos);
        let col = txt
            .bytes_in(txt.line_begin(pos), pos)
            .graphemes(true)
            .count();
        frame.cursor = (ln.saturating_sub(top), col);
        for c in win.view.cursors.iter() {
            if let Some((s, e)) = c.sel {
                let sl = txt.lineno_by_pos(s);
                let el = txt.lineno_by_pos(e);
                for line in sl.max(top)..=el.min(top + height - 1) {
                    let begin = txt.pos_by_lineno(line);
                    let end = txt.line_end(begin);
                    let from = s.max(begin);
                    let to = e.min(end);
                    if from < to {
                        let fc = txt.bytes_in(begin, from).graphemes(true).count();
                        let tc = txt.bytes_in(begin, to).graphemes(true).count();
                        frame.selections.push((line - top, fc, tc));
                    }
                }
            }
        }
        frame
    }

    pub fn draw(&mut self) {
        let frame = self.build_frame();
        self.ui.draw(&frame);
        let status = self.status_line();
        self.ui.draw_status(&status);
    }

    pub fn update(&mut self) {
        self.draw();
    }
}
