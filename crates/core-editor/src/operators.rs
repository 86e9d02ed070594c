//! The named operator table.
//!
//! An operator consumes a resolved byte range and yields the next cursor
//! position, or `None` to dispose the cursor. Operators run once per
//! cursor and must not change the mode; post-run transitions belong to
//! the executor. All mutation goes through [`OpCtx::insert`] /
//! [`OpCtx::delete`], which log the edit so the executor can re-anchor
//! every other cursor and view afterwards.

use core_text::{ByteRange, Text};
use tracing::trace;

use crate::action::{CaseMode, CursorPlace, OpArg, PutMode};
use crate::register::Register;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Delete,
    Change,
    Yank,
    Put,
    ShiftRight,
    ShiftLeft,
    CaseChange,
    Join,
    /// Pseudo-operator attaching a recorded keystream to insert.
    Insert,
    /// Pseudo-operator attaching a recorded keystream to replace.
    Replace,
    /// Spawns a cursor per line of the range.
    NewCursors,
}

/// One logged edit: position and signed byte delta.
pub type Edit = (usize, isize);

pub struct OpCtx<'a> {
    pub txt: &'a mut dyn Text,
    pub reg: &'a mut Register,
    pub count: u32,
    pub pos: usize,
    pub newpos: Option<usize>,
    pub range: ByteRange,
    pub linewise: bool,
    pub arg: OpArg,
    pub tabwidth: usize,
    pub expandtab: bool,
    pub edits: Vec<Edit>,
    pub new_cursors: Vec<usize>,
    /// Set when the operator wants the operator macro restarted.
    pub start_macro: bool,
}

impl<'a> OpCtx<'a> {
    pub fn insert(&mut self, pos: usize, data: &str) {
        if self.txt.insert(pos, data) {
            self.edits.push((pos, data.len() as isize));
        }
    }

    pub fn delete(&mut self, pos: usize, len: usize) {
        if len > 0 && self.txt.delete(pos, len) {
            self.edits.push((pos, -(len as isize)));
        }
    }
}

/// Expand a range to full-line boundaries: begin of the first line through
/// the begin of the line after the last.
pub fn linewise_range(txt: &dyn Text, range: ByteRange) -> ByteRange {
    let start = txt.line_begin(range.0);
    let end = if range.1 > range.0 && range.1 == txt.line_begin(range.1) {
        range.1
    } else {
        txt.line_next(range.1)
    };
    (start, end.max(start))
}

fn range_is_linewise(txt: &dyn Text, range: ByteRange) -> bool {
    range.0 == txt.line_begin(range.0) && range.1 == txt.line_begin(range.1)
}

/// The indent string `>` inserts: `tabwidth` spaces (capped at 8) when
/// `expandtab` is set, else a tab.
pub fn expandtab(tabwidth: usize, expandtab: bool) -> String {
    if expandtab {
        " ".repeat(tabwidth.min(8))
    } else {
        "\t".to_string()
    }
}

pub fn run(op: OperatorKind, ctx: &mut OpCtx) -> Option<usize> {
    trace!(target: "exec.op", ?op, range_start = ctx.range.0, range_end = ctx.range.1, linewise = ctx.linewise, "run");
    match op {
        OperatorKind::Delete => op_delete(ctx),
        OperatorKind::Change => op_change(ctx),
        OperatorKind::Yank => op_yank(ctx),
        OperatorKind::Put => op_put(ctx),
        OperatorKind::ShiftRight => op_shift_right(ctx),
        OperatorKind::ShiftLeft => op_shift_left(ctx),
        OperatorKind::CaseChange => op_case_change(ctx),
        OperatorKind::Join => op_join(ctx),
        OperatorKind::Insert | OperatorKind::Replace => {
            ctx.start_macro = true;
            Some(ctx.newpos.unwrap_or(ctx.pos))
        }
        OperatorKind::NewCursors => op_new_cursors(ctx),
    }
}

fn op_delete(ctx: &mut OpCtx) -> Option<usize> {
    ctx.reg.linewise = ctx.linewise;
    ctx.reg.data = ctx.txt.bytes_in(ctx.range.0, ctx.range.1);
    ctx.delete(ctx.range.0, ctx.range.1.saturating_sub(ctx.range.0));
    let mut pos = ctx.range.0;
    if ctx.linewise && pos == ctx.txt.size() && pos > 0 {
        pos = ctx.txt.line_begin(ctx.txt.line_prev(pos));
    }
    Some(pos)
}

fn op_change(ctx: &mut OpCtx) -> Option<usize> {
    op_delete(ctx);
    ctx.start_macro = true;
    Some(ctx.range.0)
}

fn op_yank(ctx: &mut OpCtx) -> Option<usize> {
    ctx.reg.linewise = ctx.linewise;
    ctx.reg.data = ctx.txt.bytes_in(ctx.range.0, ctx.range.1);
    Some(ctx.pos)
}

fn op_put(ctx: &mut OpCtx) -> Option<usize> {
    let data = ctx.reg.data.clone();
    let linewise = ctx.reg.linewise;
    let mode = match ctx.arg {
        OpArg::Put(m) => m,
        _ => PutMode::After,
    };
    let mut pos = ctx.pos;
    match mode {
        PutMode::After | PutMode::AfterEnd => {
            pos = if linewise {
                ctx.txt.line_next(pos)
            } else {
                ctx.txt.char_next(pos)
            };
        }
        PutMode::Before | PutMode::BeforeEnd => {
            if linewise {
                pos = ctx.txt.line_begin(pos);
            }
        }
    }

    for _ in 0..ctx.count.max(1) {
        ctx.insert(pos, &data);
        pos += data.len();
    }

    if linewise {
        pos = match mode {
            PutMode::AfterEnd | PutMode::BeforeEnd => ctx.txt.line_start(pos),
            PutMode::After => {
                let next = ctx.txt.line_next(ctx.pos);
                ctx.txt.line_start(next)
            }
            PutMode::Before => ctx.txt.line_start(ctx.pos),
        };
    } else if matches!(mode, PutMode::After | PutMode::Before) {
        pos = ctx.txt.char_prev(pos);
    }
    Some(pos)
}

fn op_shift_right(ctx: &mut OpCtx) -> Option<usize> {
    let tab = expandtab(ctx.tabwidth, ctx.expandtab);
    // the cursor lands on the first non-blank of the range's first line;
    // its begin is stable because every edit happens at or after it
    let first = ctx.txt.line_begin(ctx.range.0);
    let mut pos = ctx.txt.line_begin(ctx.range.1);
    // a range ending at a line begin does not touch that line
    if pos == ctx.range.1 {
        pos = ctx.txt.line_prev(pos);
    }
    loop {
        pos = ctx.txt.line_begin(pos);
        let prev_pos = pos;
        ctx.insert(pos, &tab);
        pos = ctx.txt.line_prev(pos);
        if pos < ctx.range.0 || pos == prev_pos {
            break;
        }
    }
    Some(ctx.txt.line_start(first))
}

fn op_shift_left(ctx: &mut OpCtx) -> Option<usize> {
    let tabwidth = ctx.tabwidth;
    let first = ctx.txt.line_begin(ctx.range.0);
    let mut pos = ctx.txt.line_begin(ctx.range.1);
    if pos == ctx.range.1 {
        pos = ctx.txt.line_prev(pos);
    }
    loop {
        pos = ctx.txt.line_begin(pos);
        let prev_pos = pos;
        // one leading tab counts as one column batch, else up to tabwidth spaces
        let len = if ctx.txt.byte_get(pos) == Some(b'\t') {
            1
        } else {
            let mut n = 0;
            while ctx.txt.byte_get(pos + n) == Some(b' ') {
                n += 1;
            }
            n
        };
        ctx.delete(pos, len.min(tabwidth));
        pos = ctx.txt.line_prev(pos);
        if pos < ctx.range.0 || pos == prev_pos {
            break;
        }
    }
    Some(ctx.txt.line_start(first))
}

fn op_case_change(ctx: &mut OpCtx) -> Option<usize> {
    let (start, end) = ctx.range;
    let data = ctx.txt.bytes_in(start, end);
    let mode = match ctx.arg {
        OpArg::Case(m) => m,
        _ => CaseMode::Swap,
    };
    // non-ASCII passes through untouched
    let out: String = data
        .chars()
        .map(|c| {
            if c.is_ascii() {
                match mode {
                    CaseMode::Swap => {
                        if c.is_ascii_lowercase() {
                            c.to_ascii_uppercase()
                        } else {
                            c.to_ascii_lowercase()
                        }
                    }
                    CaseMode::Upper => c.to_ascii_uppercase(),
                    CaseMode::Lower => c.to_ascii_lowercase(),
                }
            } else {
                c
            }
        })
        .collect();
    if out != data {
        ctx.delete(start, end - start);
        ctx.insert(start, &out);
    }
    Some(ctx.pos)
}

fn op_join(ctx: &mut OpCtx) -> Option<usize> {
    let mut pos = ctx.txt.line_begin(ctx.range.1);

    // a linewise operator over a linewise range skips the final line break
    if ctx.linewise && range_is_linewise(ctx.txt, ctx.range) {
        let line_prev = ctx.txt.line_prev(pos);
        let line_prev_prev = ctx.txt.line_prev(line_prev);
        if line_prev_prev >= ctx.range.0 {
            pos = line_prev;
        }
    }

    let mut joined = None;
    loop {
        let prev_pos = pos;
        let end = ctx.txt.line_start(pos);
        let finish = ctx.txt.line_finish(ctx.txt.line_prev(end));
        pos = ctx.txt.char_next(finish);
        if pos >= ctx.range.0 && end > pos {
            ctx.delete(pos, end - pos);
            ctx.insert(pos, " ");
            joined = Some(pos);
        } else {
            break;
        }
        if pos == prev_pos {
            break;
        }
    }
    Some(joined.unwrap_or(ctx.range.0))
}

fn op_new_cursors(ctx: &mut OpCtx) -> Option<usize> {
    let place = match ctx.arg {
        OpArg::Cursors(p) => p,
        _ => CursorPlace::Sol,
    };
    let (start, end) = linewise_range(ctx.txt, ctx.range);
    let mut line = start;
    while line < end {
        let pos = match place {
            CursorPlace::Sol => ctx.txt.line_start(line),
            CursorPlace::Eol => ctx.txt.line_finish(line),
        };
        ctx.new_cursors.push(pos);
        let next = ctx.txt.line_next(line);
        if next == line {
            break;
        }
        line = next;
    }
    // the originating cursor is disposed; the spawned ones take over
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::RopeText;

    fn ctx<'a>(
        txt: &'a mut RopeText,
        reg: &'a mut Register,
        range: ByteRange,
        pos: usize,
        linewise: bool,
    ) -> OpCtx<'a> {
        OpCtx {
            txt,
            reg,
            count: 1,
            pos,
            newpos: None,
            range,
            linewise,
            arg: OpArg::None,
            tabwidth: 8,
            expandtab: false,
            edits: Vec::new(),
            new_cursors: Vec::new(),
            start_macro: false,
        }
    }

    #[test]
    fn delete_fills_register_and_returns_start() {
        let mut txt = RopeText::new("Hello World\n");
        let mut reg = Register::default();
        let mut c = ctx(&mut txt, &mut reg, (0, 6), 0, false);
        assert_eq!(run(OperatorKind::Delete, &mut c), Some(0));
        assert_eq!(txt.content(), "World\n");
        assert_eq!(reg.data, "Hello ");
        assert!(!reg.linewise);
    }

    #[test]
    fn linewise_delete_at_eof_backs_up_a_line() {
        let mut txt = RopeText::new("one\ntwo\n");
        let mut reg = Register::default();
        let mut c = ctx(&mut txt, &mut reg, (4, 8), 4, true);
        assert_eq!(run(OperatorKind::Delete, &mut c), Some(0));
        assert_eq!(txt.content(), "one\n");
        assert!(reg.linewise);
    }

    #[test]
    fn delete_then_put_before_roundtrips() {
        let mut txt = RopeText::new("Hello World\n");
        let mut reg = Register::default();
        let mut c = ctx(&mut txt, &mut reg, (0, 6), 0, false);
        run(OperatorKind::Delete, &mut c);
        let mut c = ctx(&mut txt, &mut reg, (0, 0), 0, false);
        c.arg = OpArg::Put(PutMode::Before);
        run(OperatorKind::Put, &mut c);
        assert_eq!(txt.content(), "Hello World\n");
    }

    #[test]
    fn yank_then_put_after_copies() {
        let mut txt = RopeText::new("ab\n");
        let mut reg = Register::default();
        let mut c = ctx(&mut txt, &mut reg, (0, 2), 0, false);
        assert_eq!(run(OperatorKind::Yank, &mut c), Some(0));
        assert_eq!(txt.content(), "ab\n");
        let mut c = ctx(&mut txt, &mut reg, (0, 0), 0, false);
        c.arg = OpArg::Put(PutMode::After);
        run(OperatorKind::Put, &mut c);
        assert_eq!(txt.content(), "aabb\n");
    }

    #[test]
    fn linewise_put_after_lands_on_next_line_start() {
        let mut txt = RopeText::new("one\ntwo\n");
        let mut reg = Register {
            data: "new\n".into(),
            linewise: true,
        };
        let mut c = ctx(&mut txt, &mut reg, (0, 0), 0, false);
        c.arg = OpArg::Put(PutMode::After);
        let pos = run(OperatorKind::Put, &mut c);
        assert_eq!(txt.content(), "one\nnew\ntwo\n");
        assert_eq!(pos, Some(4));
    }

    #[test]
    fn put_repeats_count_times() {
        let mut txt = RopeText::new("x");
        let mut reg = Register {
            data: "ab".into(),
            linewise: false,
        };
        let mut c = ctx(&mut txt, &mut reg, (0, 0), 0, false);
        c.count = 3;
        c.arg = OpArg::Put(PutMode::Before);
        run(OperatorKind::Put, &mut c);
        assert_eq!(txt.content(), "abababx");
    }

    #[test]
    fn shift_right_expandtab_indents_each_line() {
        let mut txt = RopeText::new("  line1\n  line2\n");
        let mut reg = Register::default();
        let mut c = ctx(&mut txt, &mut reg, (0, 16), 0, true);
        c.tabwidth = 4;
        c.expandtab = true;
        let pos = run(OperatorKind::ShiftRight, &mut c);
        assert_eq!(txt.content(), "      line1\n      line2\n");
        // cursor on the first non-blank of the range's first line
        assert_eq!(pos, Some(6));
    }

    #[test]
    fn shift_left_removes_up_to_tabwidth_spaces_or_one_tab() {
        let mut txt = RopeText::new("        a\n\tb\n  c\n");
        let mut reg = Register::default();
        let mut c = ctx(&mut txt, &mut reg, (0, 17), 0, true);
        c.tabwidth = 4;
        let pos = run(OperatorKind::ShiftLeft, &mut c);
        assert_eq!(txt.content(), "    a\nb\nc\n");
        assert_eq!(pos, Some(4));
    }

    #[test]
    fn shift_left_keeps_cursor_on_the_shifted_line() {
        // cursor inside the removed indent of a non-first buffer line
        let mut txt = RopeText::new("x\n    y\n");
        let mut reg = Register::default();
        let mut c = ctx(&mut txt, &mut reg, (2, 8), 2, true);
        c.tabwidth = 4;
        let pos = run(OperatorKind::ShiftLeft, &mut c);
        assert_eq!(txt.content(), "x\ny\n");
        assert_eq!(pos, Some(2));
    }

    #[test]
    fn case_change_leaves_non_ascii_alone() {
        let mut txt = RopeText::new("abÄc");
        let mut reg = Register::default();
        let len = txt.size();
        let mut c = ctx(&mut txt, &mut reg, (0, len), 0, false);
        c.arg = OpArg::Case(CaseMode::Upper);
        run(OperatorKind::CaseChange, &mut c);
        assert_eq!(txt.content(), "ABÄC");
    }

    #[test]
    fn join_replaces_break_and_indent_with_space() {
        let mut txt = RopeText::new("abc\n   def\n");
        let mut reg = Register::default();
        let mut c = ctx(&mut txt, &mut reg, (0, 4), 0, false);
        let pos = run(OperatorKind::Join, &mut c);
        assert_eq!(txt.content(), "abc def\n");
        assert_eq!(pos, Some(3));
    }

    #[test]
    fn linewise_join_skips_final_line_break() {
        let mut txt = RopeText::new("a\nb\nc\n");
        let mut reg = Register::default();
        let mut c = ctx(&mut txt, &mut reg, (0, 6), 0, true);
        run(OperatorKind::Join, &mut c);
        assert_eq!(txt.content(), "a b c\n");
    }

    #[test]
    fn new_cursors_per_line() {
        let mut txt = RopeText::new("  aa\nbb\n");
        let mut reg = Register::default();
        let mut c = ctx(&mut txt, &mut reg, (1, 6), 0, true);
        c.arg = OpArg::Cursors(CursorPlace::Sol);
        assert_eq!(run(OperatorKind::NewCursors, &mut c), None);
        assert_eq!(c.new_cursors, vec![2, 5]);
    }

    #[test]
    fn linewise_range_expansion() {
        let txt = RopeText::new("aa\nbb\ncc\n");
        assert_eq!(linewise_range(&txt, (1, 4)), (0, 6));
        assert_eq!(linewise_range(&txt, (0, 3)), (0, 3)); // already at a begin
        assert_eq!(linewise_range(&txt, (4, 4)), (3, 6)); // empty: whole line
    }
}
