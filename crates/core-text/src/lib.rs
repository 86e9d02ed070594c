//! Byte-addressed text storage consumed by the editor core.
//!
//! The editor never touches a rope directly; it talks to the object-safe
//! [`Text`] trait, which bundles everything a modal editor needs from its
//! buffer: byte-offset edits, line navigation, stable marks that track
//! edits, a snapshot history for undo/redo and the changelist, and regex
//! search. [`RopeText`] is the in-memory implementation backed by
//! `ropey::Rope`.
//!
//! Positions are absolute byte offsets. All navigation helpers clamp to
//! `[0, size]` and land on UTF-8 boundaries; horizontal stepping
//! (`char_next`/`char_prev`) moves by grapheme cluster within a line so a
//! cursor never splits a combining sequence.

use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use regex::Regex;
use ropey::Rope;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

pub mod motion;
pub mod object;

/// Handle to a stable position registered with [`Text::mark_set`].
pub type Mark = usize;

/// Half-open byte range `[start, end)`.
pub type ByteRange = (usize, usize);

/// Line-break convention detected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineType {
    #[default]
    Lf,
    CrLf,
}

impl NewlineType {
    pub fn as_str(self) -> &'static str {
        match self {
            NewlineType::Lf => "\n",
            NewlineType::CrLf => "\r\n",
        }
    }
}

/// The buffer collaborator. One instance per open file, shared by every
/// window displaying it.
pub trait Text {
    /// Insert `data` at byte offset `pos`. Returns false when `pos` is out
    /// of range or not on a character boundary; the buffer is unchanged.
    fn insert(&mut self, pos: usize, data: &str) -> bool;

    /// Delete `len` bytes starting at `pos`. Same failure contract as
    /// [`Text::insert`].
    fn delete(&mut self, pos: usize, len: usize) -> bool;

    fn size(&self) -> usize;

    /// The byte at `pos`, if any.
    fn byte_get(&self, pos: usize) -> Option<u8>;

    /// The character starting at `pos`, if `pos` is a boundary.
    fn char_at(&self, pos: usize) -> Option<char>;

    /// Owned copy of `[start, end)`, clamped to the buffer.
    fn bytes_in(&self, start: usize, end: usize) -> String;

    /// The whole buffer as a string.
    fn content(&self) -> String;

    /// Next grapheme boundary; steps over a line break one codepoint at a
    /// time. Clamps at `size`.
    fn char_next(&self, pos: usize) -> usize;

    /// Previous grapheme boundary; clamps at 0.
    fn char_prev(&self, pos: usize) -> usize;

    /// First byte of the line containing `pos`.
    fn line_begin(&self, pos: usize) -> usize;
    /// First non-blank of the line, or the line end when the line is blank.
    fn line_start(&self, pos: usize) -> usize;
    /// Last non-blank character of the line, or the line begin when blank.
    fn line_finish(&self, pos: usize) -> usize;
    /// Last character of the line, ignoring the terminator.
    fn line_lastchar(&self, pos: usize) -> usize;
    /// The line terminator position (the `\n`, or `size` on the last line).
    fn line_end(&self, pos: usize) -> usize;
    /// First byte of the following line, or `size`.
    fn line_next(&self, pos: usize) -> usize;
    /// First byte of the preceding line, or 0.
    fn line_prev(&self, pos: usize) -> usize;
    /// First byte of 1-based line `lineno`, clamped to the last line.
    fn pos_by_lineno(&self, lineno: usize) -> usize;
    /// 1-based line number of `pos`.
    fn lineno_by_pos(&self, pos: usize) -> usize;
    /// Position of 1-based character column `col` on the line of `pos`,
    /// clamped to the line end.
    fn line_offset(&self, pos: usize, col: usize) -> usize;

    /// Register a stable position. The returned mark tracks subsequent
    /// edits: insertions and deletions before it shift it, a deletion
    /// spanning it kills it.
    fn mark_set(&mut self, pos: usize) -> Mark;
    /// Resolve a mark, `None` once the marked byte was deleted.
    fn mark_get(&self, mark: Mark) -> Option<usize>;

    /// Commit the current content as an undo boundary. No-op when nothing
    /// changed since the last snapshot.
    fn snapshot(&mut self);
    /// Step back one snapshot; returns the position of the undone change.
    fn undo(&mut self) -> Option<usize>;
    /// Step forward one snapshot; returns the position of the redone change.
    fn redo(&mut self) -> Option<usize>;
    /// Token identifying the current committed revision. Changes whenever a
    /// snapshot commits new content.
    fn state(&self) -> u64;
    /// Position of the change made `index` revisions before the current
    /// one. `None` past the oldest recorded change.
    fn history_pos(&self, index: usize) -> Option<usize>;
    /// True when the buffer differs from the last committed snapshot.
    fn modified(&self) -> bool;

    /// First match starting strictly after `pos`, wrapping at the end.
    fn search_forward(&self, pos: usize, pattern: &Regex) -> Option<usize>;
    /// Last match starting strictly before `pos`, wrapping at the start.
    fn search_backward(&self, pos: usize, pattern: &Regex) -> Option<usize>;

    fn newline_type(&self) -> NewlineType;

    /// Whether a fault at `addr` hit this buffer's backing store. Only
    /// memory-mapped implementations can answer true; [`RopeText`] never
    /// does.
    fn sigbus(&self, addr: usize) -> bool;

    fn save(&self, path: &Path) -> Result<()>;
}

struct Revision {
    rope: Rope,
    /// Position of the last edit leading up to this revision.
    change: usize,
    state: u64,
}

/// In-memory [`Text`] over a `ropey::Rope`.
pub struct RopeText {
    rope: Rope,
    marks: Vec<Option<usize>>,
    history: Vec<Revision>,
    at: usize,
    next_state: u64,
    /// Position of the most recent uncommitted edit.
    dirty: Option<usize>,
    newline: NewlineType,
    loaded: Option<SystemTime>,
}

impl RopeText {
    pub fn new(content: &str) -> Self {
        let newline = if content.contains("\r\n") {
            NewlineType::CrLf
        } else {
            NewlineType::Lf
        };
        let rope = Rope::from_str(content);
        Self {
            history: vec![Revision {
                rope: rope.clone(),
                change: 0,
                state: 0,
            }],
            rope,
            marks: Vec::new(),
            at: 0,
            next_state: 1,
            dirty: None,
            newline,
            loaded: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let mut text = Self::new(&content);
        text.loaded = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        Ok(text)
    }

    /// Modification time captured at load, if loaded from disk.
    pub fn loaded_at(&self) -> Option<SystemTime> {
        self.loaded
    }

    fn boundary(&self, pos: usize) -> bool {
        pos <= self.rope.len_bytes()
            && self
                .rope
                .try_byte_to_char(pos)
                .is_ok_and(|c| self.rope.char_to_byte(c) == pos)
    }

    fn shift_marks_insert(&mut self, pos: usize, len: usize) {
        for m in self.marks.iter_mut().flatten() {
            if *m >= pos {
                *m += len;
            }
        }
    }

    fn shift_marks_delete(&mut self, pos: usize, len: usize) {
        for slot in self.marks.iter_mut() {
            if let Some(m) = *slot {
                if m >= pos + len {
                    *slot = Some(m - len);
                } else if m >= pos {
                    *slot = None;
                }
            }
        }
    }

    /// Line content without its terminator, plus the line's begin offset.
    fn line_content(&self, pos: usize) -> (usize, String) {
        let line = self.rope.byte_to_line(pos.min(self.rope.len_bytes()));
        let begin = self.rope.line_to_byte(line);
        let mut s = self.rope.line(line).to_string();
        if s.ends_with('\n') {
            s.pop();
            if s.ends_with('\r') {
                s.pop();
            }
        }
        (begin, s)
    }
}

impl Text for RopeText {
    fn insert(&mut self, pos: usize, data: &str) -> bool {
        if data.is_empty() {
            return true;
        }
        if !self.boundary(pos) {
            return false;
        }
        let char_idx = self.rope.byte_to_char(pos);
        self.rope.insert(char_idx, data);
        self.shift_marks_insert(pos, data.len());
        self.dirty = Some(pos);
        true
    }

    fn delete(&mut self, pos: usize, len: usize) -> bool {
        if len == 0 {
            return true;
        }
        let end = pos + len;
        if !self.boundary(pos) || !self.boundary(end) {
            return false;
        }
        let start_char = self.rope.byte_to_char(pos);
        let end_char = self.rope.byte_to_char(end);
        self.rope.remove(start_char..end_char);
        self.shift_marks_delete(pos, len);
        self.dirty = Some(pos);
        true
    }

    fn size(&self) -> usize {
        self.rope.len_bytes()
    }

    fn byte_get(&self, pos: usize) -> Option<u8> {
        if pos < self.rope.len_bytes() {
            Some(self.rope.byte(pos))
        } else {
            None
        }
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.rope.len_bytes() || !self.boundary(pos) {
            return None;
        }
        self.rope.get_char(self.rope.byte_to_char(pos))
    }

    fn bytes_in(&self, start: usize, end: usize) -> String {
        let total = self.rope.len_bytes();
        let s = start.min(total);
        let e = end.min(total);
        if s >= e {
            return String::new();
        }
        let sc = self.rope.byte_to_char(s);
        let ec = self.rope.byte_to_char(e);
        self.rope.slice(sc..ec).to_string()
    }

    fn content(&self) -> String {
        self.rope.to_string()
    }

    fn char_next(&self, pos: usize) -> usize {
        let size = self.rope.len_bytes();
        if pos >= size {
            return size;
        }
        let (begin, content) = self.line_content(pos);
        let rel = pos - begin;
        if rel >= content.len() {
            // step over the terminator one codepoint at a time
            let c = self.rope.byte_to_char(pos);
            return self.rope.char_to_byte((c + 1).min(self.rope.len_chars()));
        }
        let next = content[rel..]
            .grapheme_indices(true)
            .nth(1)
            .map(|(i, _)| rel + i)
            .unwrap_or(content.len());
        begin + next
    }

    fn char_prev(&self, pos: usize) -> usize {
        if pos == 0 {
            return 0;
        }
        let pos = pos.min(self.rope.len_bytes());
        let (begin, content) = self.line_content(pos);
        let rel = pos - begin;
        if rel == 0 {
            let c = self.rope.byte_to_char(pos);
            return self.rope.char_to_byte(c.saturating_sub(1));
        }
        let prev = content[..rel]
            .grapheme_indices(true)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        begin + prev
    }

    fn line_begin(&self, pos: usize) -> usize {
        let line = self.rope.byte_to_line(pos.min(self.rope.len_bytes()));
        self.rope.line_to_byte(line)
    }

    fn line_start(&self, pos: usize) -> usize {
        let (begin, content) = self.line_content(pos);
        match content.find(|c: char| c != ' ' && c != '\t') {
            Some(off) => begin + off,
            None => begin + content.len(),
        }
    }

    fn line_finish(&self, pos: usize) -> usize {
        let (begin, content) = self.line_content(pos);
        let trimmed = content.trim_end_matches([' ', '\t']);
        if trimmed.is_empty() {
            return begin;
        }
        let last = trimmed
            .grapheme_indices(true)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        begin + last
    }

    fn line_lastchar(&self, pos: usize) -> usize {
        let (begin, content) = self.line_content(pos);
        if content.is_empty() {
            return begin;
        }
        let last = content
            .grapheme_indices(true)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        begin + last
    }

    fn line_end(&self, pos: usize) -> usize {
        let (begin, content) = self.line_content(pos);
        begin + content.len()
    }

    fn line_next(&self, pos: usize) -> usize {
        let line = self.rope.byte_to_line(pos.min(self.rope.len_bytes()));
        if line + 1 >= self.rope.len_lines() {
            self.rope.len_bytes()
        } else {
            self.rope.line_to_byte(line + 1)
        }
    }

    fn line_prev(&self, pos: usize) -> usize {
        let line = self.rope.byte_to_line(pos.min(self.rope.len_bytes()));
        self.rope.line_to_byte(line.saturating_sub(1))
    }

    fn pos_by_lineno(&self, lineno: usize) -> usize {
        if lineno == 0 {
            return 0;
        }
        let line = (lineno - 1).min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_byte(line)
    }

    fn lineno_by_pos(&self, pos: usize) -> usize {
        self.rope.byte_to_line(pos.min(self.rope.len_bytes())) + 1
    }

    fn line_offset(&self, pos: usize, col: usize) -> usize {
        let (begin, content) = self.line_content(pos);
        let target = col.saturating_sub(1);
        content
            .grapheme_indices(true)
            .nth(target)
            .map(|(i, _)| begin + i)
            .unwrap_or(begin + content.len())
    }

    fn mark_set(&mut self, pos: usize) -> Mark {
        self.marks.push(Some(pos.min(self.rope.len_bytes())));
        self.marks.len() - 1
    }

    fn mark_get(&self, mark: Mark) -> Option<usize> {
        self.marks.get(mark).copied().flatten()
    }

    fn snapshot(&mut self) {
        let Some(change) = self.dirty.take() else {
            return;
        };
        self.history.truncate(self.at + 1);
        self.history.push(Revision {
            rope: self.rope.clone(),
            change,
            state: self.next_state,
        });
        self.at += 1;
        self.next_state += 1;
        trace!(target: "text.history", revisions = self.history.len(), change, "snapshot");
    }

    fn undo(&mut self) -> Option<usize> {
        self.snapshot();
        if self.at == 0 {
            return None;
        }
        let change = self.history[self.at].change;
        self.at -= 1;
        self.rope = self.history[self.at].rope.clone();
        trace!(target: "text.history", at = self.at, change, "undo");
        Some(change.min(self.rope.len_bytes()))
    }

    fn redo(&mut self) -> Option<usize> {
        self.snapshot();
        if self.at + 1 >= self.history.len() {
            return None;
        }
        self.at += 1;
        self.rope = self.history[self.at].rope.clone();
        let change = self.history[self.at].change;
        trace!(target: "text.history", at = self.at, change, "redo");
        Some(change.min(self.rope.len_bytes()))
    }

    fn state(&self) -> u64 {
        self.history[self.at].state
    }

    fn history_pos(&self, index: usize) -> Option<usize> {
        let rev = self.at.checked_sub(index)?;
        if rev == 0 {
            return None;
        }
        Some(self.history[rev].change.min(self.rope.len_bytes()))
    }

    fn modified(&self) -> bool {
        self.dirty.is_some()
    }

    fn search_forward(&self, pos: usize, pattern: &Regex) -> Option<usize> {
        let hay = self.content();
        let from = self.char_next(pos.min(self.size()));
        if let Some(m) = pattern.find(&hay[from..]) {
            return Some(from + m.start());
        }
        pattern.find(&hay).map(|m| m.start())
    }

    fn search_backward(&self, pos: usize, pattern: &Regex) -> Option<usize> {
        let hay = self.content();
        let pos = pos.min(self.size());
        let mut before = None;
        let mut last = None;
        for m in pattern.find_iter(&hay) {
            if m.start() < pos {
                before = Some(m.start());
            }
            last = Some(m.start());
        }
        before.or(last)
    }

    fn newline_type(&self) -> NewlineType {
        self.newline
    }

    fn sigbus(&self, _addr: usize) -> bool {
        false
    }

    fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("create {}", path.display()))?;
        self.rope
            .write_to(std::io::BufWriter::new(file))
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RopeText {
        RopeText::new(s)
    }

    #[test]
    fn insert_delete_roundtrip() {
        let mut t = text("hello world");
        assert!(t.insert(5, ","));
        assert_eq!(t.content(), "hello, world");
        assert!(t.delete(5, 1));
        assert_eq!(t.content(), "hello world");
    }

    #[test]
    fn insert_rejects_non_boundary() {
        let mut t = text("a😀b");
        assert!(!t.insert(2, "x"));
        assert_eq!(t.content(), "a😀b");
    }

    #[test]
    fn line_navigation() {
        let t = text("  foo bar  \nsecond\n");
        assert_eq!(t.line_begin(5), 0);
        assert_eq!(t.line_start(5), 2);
        assert_eq!(t.line_end(0), 11);
        assert_eq!(t.line_finish(0), 8); // the 'r' of bar
        assert_eq!(t.line_lastchar(0), 10); // trailing blank
        assert_eq!(t.line_next(0), 12);
        assert_eq!(t.line_prev(13), 0);
        assert_eq!(t.pos_by_lineno(2), 12);
        assert_eq!(t.lineno_by_pos(12), 2);
    }

    #[test]
    fn line_prev_from_eof_is_last_line() {
        // a trailing newline makes position `size` the begin of an empty
        // final line; line_prev from there must land on the last real line
        let t = text("abc\ndef\n");
        assert_eq!(t.line_prev(8), 4);
        assert_eq!(t.line_begin(8), 8);
    }

    #[test]
    fn char_stepping_over_graphemes_and_newlines() {
        let t = text("a😀\nb");
        assert_eq!(t.char_next(0), 1);
        assert_eq!(t.char_next(1), 5); // over the emoji
        assert_eq!(t.char_next(5), 6); // over the newline
        assert_eq!(t.char_prev(6), 5);
        assert_eq!(t.char_prev(5), 1);
        assert_eq!(t.char_prev(0), 0);
    }

    #[test]
    fn marks_shift_with_edits() {
        let mut t = text("hello world");
        let before = t.mark_set(2);
        let after = t.mark_set(8);
        t.insert(5, "XY");
        assert_eq!(t.mark_get(before), Some(2));
        assert_eq!(t.mark_get(after), Some(10));
        t.delete(0, 3);
        assert_eq!(t.mark_get(after), Some(7));
    }

    #[test]
    fn mark_dies_when_span_deleted() {
        let mut t = text("hello world");
        let m = t.mark_set(6);
        t.delete(4, 4);
        assert_eq!(t.mark_get(m), None);
    }

    #[test]
    fn undo_redo_restores_content() {
        let mut t = text("abc");
        t.snapshot();
        t.insert(3, "def");
        t.snapshot();
        assert_eq!(t.undo(), Some(3));
        assert_eq!(t.content(), "abc");
        assert_eq!(t.redo(), Some(3));
        assert_eq!(t.content(), "abcdef");
        // undo then redo is a no-op on content
        let before = t.content();
        t.undo();
        t.redo();
        assert_eq!(t.content(), before);
    }

    #[test]
    fn state_token_moves_with_snapshots() {
        let mut t = text("abc");
        let s0 = t.state();
        t.insert(0, "x");
        assert_eq!(t.state(), s0); // uncommitted
        t.snapshot();
        assert_ne!(t.state(), s0);
    }

    #[test]
    fn history_positions_walk_backward() {
        let mut t = text("aaaa");
        t.insert(1, "b");
        t.snapshot();
        t.insert(3, "c");
        t.snapshot();
        assert_eq!(t.history_pos(0), Some(3));
        assert_eq!(t.history_pos(1), Some(1));
        assert_eq!(t.history_pos(2), None);
    }

    #[test]
    fn search_wraps_both_directions() {
        let t = text("foo bar\nfoo baz\n");
        let re = Regex::new("foo").unwrap();
        assert_eq!(t.search_forward(0, &re), Some(8));
        assert_eq!(t.search_forward(8, &re), Some(0));
        assert_eq!(t.search_backward(8, &re), Some(0));
        assert_eq!(t.search_backward(0, &re), Some(8));
    }

    #[test]
    fn newline_detection() {
        assert_eq!(text("a\nb").newline_type(), NewlineType::Lf);
        assert_eq!(text("a\r\nb").newline_type(), NewlineType::CrLf);
    }

    #[test]
    fn save_writes_content() {
        let t = text("persisted\n");
        let tmp = tempfile::NamedTempFile::new().unwrap();
        t.save(tmp.path()).unwrap();
        assert_eq!(std::fs::read_to_string(tmp.path()).unwrap(), "persisted\n");
    }
}
