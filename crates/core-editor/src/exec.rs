//! The action executor: runs a completed parse over every cursor.

use core_text::{ByteRange, Text, motion};
use regex::Regex;
use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

use crate::Editor;
use crate::action::{Action, MotionType};
use crate::macros::MacroSlot;
use crate::modes::ModeId;
use crate::motions::{MotionKind, motion_type};
use crate::operators::{self, OpCtx, OperatorKind};
use crate::register::RegisterId;
use crate::textobjects;
use crate::window::{CursorId, FileId, MarkId, WinId};

impl Editor {
    /// Execute and clear the pending action.
    pub(crate) fn action_do_pending(&mut self) {
        let a = std::mem::take(&mut self.action);
        self.action_do(a, false);
    }

    /// Run `a` over every cursor of the focused view. `is_prev` marks a
    /// replay of the previous action (`.`), which must not restamp it.
    pub(crate) fn action_do(&mut self, mut a: Action, is_prev: bool) {
        let win_id = self.win;
        let Some(fid) = self.win_ref(win_id).map(|w| w.file) else {
            return;
        };
        if a.count < 1 {
            a.count = 1;
        }
        let repeatable = a.op.is_some() && !self.macros.operator_active;
        let multi = self
            .win_ref(win_id)
            .map(|w| w.view.cursors.len() > 1)
            .unwrap_or(false);
        let mtype = a.movement.map(motion_type).unwrap_or_default();
        let linewise = !a.kind.contains(MotionType::CHARWISE)
            && (a.kind.contains(MotionType::LINEWISE)
                || mtype.contains(MotionType::LINEWISE)
                || self.mode == ModeId::VisualLine);
        let visual = self.mode_is_visual();
        debug!(target: "exec", op = ?a.op, movement = ?a.movement, textobj = ?a.textobj, count = a.count, linewise, "action_do");

        let ids: Vec<CursorId> = match self.win_ref(win_id) {
            Some(w) => w.view.ids(),
            None => return,
        };
        for cid in ids {
            let Some(pos0) = self
                .win_ref(win_id)
                .and_then(|w| w.view.cursor(cid))
                .map(|c| c.pos)
            else {
                continue; // disposed by an earlier cursor's operator
            };
            let mut range: ByteRange = (pos0, pos0);
            let mut newpos: Option<usize> = None;

            if let Some(m) = a.movement {
                if !matches!(m, MotionKind::LineUp | MotionKind::LineDown)
                    && let Some(c) = self.win_mut(win_id).and_then(|w| w.view.cursor_mut(cid))
                {
                    c.sticky_col = None;
                }
                let mut pos = pos0;
                let mut failed = false;
                for _ in 0..a.count {
                    match self.motion_target(m, win_id, fid, cid, pos, a.count, a.mark) {
                        Some(np) => pos = np,
                        None => {
                            failed = true;
                            break;
                        }
                    }
                    if motion_type(m).contains(MotionType::IDEMPOTENT) {
                        break;
                    }
                }
                if failed {
                    trace!(target: "exec", ?m, "motion_aborted");
                    pos = pos0;
                } else {
                    range = (pos0.min(pos), pos0.max(pos));
                    newpos = Some(pos);
                }
                if a.op.is_none() {
                    self.cursor_to(win_id, cid, pos);
                    self.scroll_to(win_id, pos);
                    if visual
                        && let Some(sel) = self.selection_of(win_id, fid, cid)
                    {
                        range = sel;
                    }
                    match m {
                        // walking the jumplist must not disturb its cursor
                        MotionKind::JumplistNext | MotionKind::JumplistPrev => {}
                        _ if motion_type(m).contains(MotionType::JUMP) && !failed => {
                            self.jumplist_add(win_id, fid, pos0);
                        }
                        _ => {
                            if let Some(w) = self.win_mut(win_id) {
                                w.jumplist.invalidate();
                            }
                        }
                    }
                } else if motion_type(m).contains(MotionType::INCLUSIVE) && newpos.is_some() {
                    if let Some(file) = self.file(fid) {
                        range.1 = file.text.char_next(range.1);
                    }
                }
            } else if let Some(to) = a.textobj {
                range = if visual {
                    self.selection_of(win_id, fid, cid).unwrap_or((pos0, pos0))
                } else {
                    (pos0, pos0)
                };
                let mut pos = pos0;
                for i in 0..a.count {
                    let resolved = {
                        let Some(file) = self.file(fid) else { break };
                        let txt = &*file.text;
                        textobjects::resolve(txt, to, pos).map(|mut r| {
                            if textobjects::is_outer_delimited(to) {
                                r.0 = r.0.saturating_sub(1);
                                r.1 = (r.1 + 1).min(txt.size());
                            }
                            (r, txt.size())
                        })
                    };
                    let Some((r, size)) = resolved else { break };
                    range = if range.0 == range.1 {
                        r
                    } else {
                        (range.0.min(r.0), range.1.max(r.1))
                    };
                    if i + 1 < a.count {
                        pos = range.1 + 1;
                        if pos > size {
                            break;
                        }
                    }
                }
            } else if visual {
                range = self.selection_of(win_id, fid, cid).unwrap_or((pos0, pos0));
            }

            if linewise && self.mode != ModeId::Visual {
                if let Some(file) = self.file(fid) {
                    range = operators::linewise_range(&*file.text, range);
                }
            }
            if visual {
                if let Some(c) = self.win_mut(win_id).and_then(|w| w.view.cursor_mut(cid)) {
                    c.sel = Some(range);
                    c.anchor = Some(range.0);
                }
                self.selection_marks_set(fid, range);
                if self.mode == ModeId::Visual || a.textobj.is_some() {
                    // keep the cursor on the selection's last character
                    let sync = self
                        .file(fid)
                        .map(|f| f.text.char_prev(range.1).max(range.0));
                    if let Some(p) = sync
                        && let Some(c) = self.win_mut(win_id).and_then(|w| w.view.cursor_mut(cid))
                    {
                        c.pos = p;
                    }
                }
            }

            if let Some(op) = a.op {
                self.run_operator(op, &a, win_id, fid, cid, multi, pos0, newpos, range, linewise);
            }
        }

        if let Some(op) = a.op {
            // visual repeat is not supported; keep `.` well-defined anyway
            if self.mode_is_visual() && a.movement.is_none() && a.textobj.is_none() {
                a.movement = Some(MotionKind::Nop);
            }
            match op {
                OperatorKind::Insert | OperatorKind::Change => self.mode_switch(ModeId::Insert),
                OperatorKind::Replace => self.mode_switch(ModeId::Replace),
                _ => {
                    if self.mode == ModeId::Operator {
                        let prev = self.mode_prev;
                        self.mode_switch(prev);
                    } else if self.mode_is_visual() {
                        self.mode_switch(ModeId::Normal);
                    }
                }
            }
            if let Some(file) = self.file_mut(fid) {
                file.text.snapshot();
            }
            self.draw();
        }

        if is_prev {
            self.action_prev = a;
        } else {
            if repeatable {
                if a.macro_slot.is_none() && self.macros.operator_active {
                    a.macro_slot = Some(MacroSlot::Operator);
                }
                self.action_prev = a;
            }
            self.action.reset();
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run_operator(
        &mut self,
        op: OperatorKind,
        a: &Action,
        win_id: WinId,
        fid: FileId,
        cid: CursorId,
        multi: bool,
        pos0: usize,
        newpos: Option<usize>,
        range: ByteRange,
        linewise: bool,
    ) {
        let (ret, edits, new_cursors, start_macro) = {
            let Editor {
                files,
                wins,
                registers,
                options,
                ..
            } = self;
            let Some(file) = files.get_mut(fid).and_then(|f| f.as_mut()) else {
                return;
            };
            let Some(win) = wins.get_mut(win_id).and_then(|w| w.as_mut()) else {
                return;
            };
            let reg = match a.reg {
                Some(r) => &mut registers[r.index()],
                None if multi => match win.view.cursor_mut(cid) {
                    Some(c) => &mut c.reg,
                    None => &mut registers[RegisterId::Default.index()],
                },
                None => &mut registers[RegisterId::Default.index()],
            };
            let mut ctx = OpCtx {
                txt: &mut *file.text,
                reg,
                count: a.count,
                pos: pos0,
                newpos,
                range,
                linewise,
                arg: a.arg,
                tabwidth: options.tabwidth,
                expandtab: options.expandtab,
                edits: Vec::new(),
                new_cursors: Vec::new(),
                start_macro: false,
            };
            let ret = operators::run(op, &mut ctx);
            (ret, ctx.edits, ctx.new_cursors, ctx.start_macro)
        };
        if start_macro {
            self.macros.operator_record();
        }
        // re-anchor every view showing this file; the acting cursor gets
        // its authoritative position from the operator's return value
        for (pos, delta) in edits {
            for w in self.wins.iter_mut().flatten() {
                if w.file == fid {
                    if delta >= 0 {
                        w.view.adjust_insert(pos, delta as usize);
                    } else {
                        w.view.adjust_delete(pos, (-delta) as usize);
                    }
                }
            }
        }
        if !new_cursors.is_empty()
            && let Some(w) = self.win_mut(win_id)
        {
            for pos in new_cursors {
                w.view.add_cursor(pos);
            }
        }
        match ret {
            Some(p) => {
                let size = self.file(fid).map(|f| f.text.size()).unwrap_or(0);
                if let Some(c) = self.win_mut(win_id).and_then(|w| w.view.cursor_mut(cid)) {
                    c.pos = p.min(size);
                }
            }
            None => {
                if let Some(w) = self.win_mut(win_id) {
                    w.view.dispose(cid);
                }
            }
        }
    }

    fn selection_of(&self, win_id: WinId, fid: FileId, cid: CursorId) -> Option<ByteRange> {
        let file = self.file(fid)?;
        self.win_ref(win_id)?
            .view
            .cursor(cid)?
            .selection_get(&*file.text)
    }

    fn jumplist_add(&mut self, win_id: WinId, fid: FileId, pos: usize) {
        let Some(mark) = self.file_mut(fid).map(|f| f.text.mark_set(pos)) else {
            return;
        };
        if let Some(w) = self.win_mut(win_id) {
            w.jumplist.add(mark);
        }
    }

    /// Resolve one motion step. `None` is the aborted motion: the range
    /// stays empty and the cursor does not move.
    #[allow(clippy::too_many_arguments)]
    fn motion_target(
        &mut self,
        m: MotionKind,
        win_id: WinId,
        fid: FileId,
        cid: CursorId,
        pos: usize,
        count: u32,
        mark: Option<MarkId>,
    ) -> Option<usize> {
        use MotionKind::*;
        match m {
            LineUp | LineDown => self.vertical_motion(m, win_id, fid, cid, pos),
            LineBegin => self.with_text(fid, |t| t.line_begin(pos)),
            LineStart => self.with_text(fid, |t| t.line_start(pos)),
            LineFinish => self.with_text(fid, |t| t.line_finish(pos)),
            LineLastChar => self.with_text(fid, |t| t.line_lastchar(pos)),
            LineEnd => self.with_text(fid, |t| t.line_end(pos)),
            LinePrev => self.with_text(fid, |t| t.line_prev(pos)),
            LineNext => self.with_text(fid, |t| t.line_next(pos)),
            Line => self.with_text(fid, |t| t.pos_by_lineno(count as usize)),
            Column => self.with_text(fid, |t| t.line_offset(pos, count as usize)),
            CharPrev => self.with_text(fid, |t| t.char_prev(pos)),
            CharNext => self.with_text(fid, |t| t.char_next(pos)),
            LineCharPrev => self.with_text(fid, |t| {
                if pos > t.line_begin(pos) {
                    t.char_prev(pos)
                } else {
                    pos
                }
            }),
            LineCharNext => self.with_text(fid, |t| {
                let next = t.char_next(pos);
                if next <= t.line_end(pos) { next } else { pos }
            }),
            WordStartPrev => self.with_text(fid, |t| motion::word_start_prev(t, pos)),
            WordStartNext => self.with_text(fid, |t| motion::word_start_next(t, pos)),
            WordEndPrev => self.with_text(fid, |t| motion::word_end_prev(t, pos)),
            WordEndNext => self.with_text(fid, |t| motion::word_end_next(t, pos)),
            LongwordStartPrev => self.with_text(fid, |t| motion::longword_start_prev(t, pos)),
            LongwordStartNext => self.with_text(fid, |t| motion::longword_start_next(t, pos)),
            LongwordEndPrev => self.with_text(fid, |t| motion::longword_end_prev(t, pos)),
            LongwordEndNext => self.with_text(fid, |t| motion::longword_end_next(t, pos)),
            SentencePrev => self.with_text(fid, |t| motion::sentence_prev(t, pos)),
            SentenceNext => self.with_text(fid, |t| motion::sentence_next(t, pos)),
            ParagraphPrev => self.with_text(fid, |t| motion::paragraph_prev(t, pos)),
            ParagraphNext => self.with_text(fid, |t| motion::paragraph_next(t, pos)),
            FunctionStartPrev => self.with_text(fid, |t| motion::function_start_prev(t, pos)),
            FunctionStartNext => self.with_text(fid, |t| motion::function_start_next(t, pos)),
            FunctionEndPrev => self.with_text(fid, |t| motion::function_end_prev(t, pos)),
            FunctionEndNext => self.with_text(fid, |t| motion::function_end_next(t, pos)),
            BracketMatch => self.with_text(fid, |t| motion::bracket_match(t, pos)),
            FileBegin => Some(0),
            FileEnd => self.with_text(fid, |t| t.size()),
            RightTo => {
                let ch = self.search_char?;
                self.with_text(fid, |t| {
                    motion::find_char_next(t, t.char_next(pos), ch).unwrap_or(pos)
                })
            }
            RightTill => {
                let ch = self.search_char?;
                self.with_text(fid, |t| {
                    match motion::find_char_next(t, t.char_next(pos), ch) {
                        Some(hit) if hit != pos => t.char_prev(hit),
                        _ => pos,
                    }
                })
            }
            LeftTo => {
                let ch = self.search_char?;
                self.with_text(fid, |t| {
                    if pos == 0 {
                        return pos;
                    }
                    motion::find_char_prev(t, t.char_prev(pos), ch).unwrap_or(pos)
                })
            }
            LeftTill => {
                let ch = self.search_char?;
                self.with_text(fid, |t| {
                    if pos == 0 {
                        return pos;
                    }
                    match motion::find_char_prev(t, t.char_prev(pos), ch) {
                        Some(hit) if hit != pos => t.char_next(hit),
                        _ => pos,
                    }
                })
            }
            TotillRepeat | TotillReverse => Some(pos), // resolved before dispatch
            Mark => {
                let id = mark?;
                let file = self.file(fid)?;
                let m = file.marks[id.index()]?;
                file.text.mark_get(m)
            }
            MarkLine => {
                let id = mark?;
                let file = self.file(fid)?;
                let m = file.marks[id.index()]?;
                let p = file.text.mark_get(m)?;
                Some(file.text.line_start(p))
            }
            SearchWordForward | SearchWordBackward => {
                let word = {
                    let file = self.file(fid)?;
                    let txt = &*file.text;
                    core_text::object::word(txt, pos).map(|r| txt.bytes_in(r.0, r.1))
                }?;
                let re = Regex::new(&regex::escape(&word)).ok()?;
                let hit = {
                    let txt = &*self.file(fid)?.text;
                    if m == SearchWordForward {
                        txt.search_forward(pos, &re)
                    } else {
                        txt.search_backward(pos, &re)
                    }
                };
                self.search_pattern = Some(re);
                hit
            }
            SearchNext => {
                let re = self.search_pattern.clone()?;
                let txt = &*self.file(fid)?.text;
                txt.search_forward(pos, &re)
            }
            SearchPrev => {
                let re = self.search_pattern.clone()?;
                let txt = &*self.file(fid)?.text;
                txt.search_backward(pos, &re)
            }
            WindowLineTop | WindowLineMiddle | WindowLineBottom => {
                let top = self.win_ref(win_id)?.view_top;
                let height = self.ui.height().max(1);
                let target = match m {
                    WindowLineTop => top + count.saturating_sub(1) as usize,
                    WindowLineMiddle => top + height / 2,
                    _ => (top + height).saturating_sub(count as usize),
                };
                self.with_text(fid, |t| t.line_start(t.pos_by_lineno(target)))
            }
            ChangelistNext => {
                let Editor { files, wins, .. } = self;
                let txt = &*files.get(fid)?.as_ref()?.text;
                let cl = &mut wins.get_mut(win_id)?.as_mut()?.changelist;
                Some(cl.newer(txt, pos))
            }
            ChangelistPrev => {
                let Editor { files, wins, .. } = self;
                let txt = &*files.get(fid)?.as_ref()?.text;
                let cl = &mut wins.get_mut(win_id)?.as_mut()?.changelist;
                Some(cl.older(txt, pos))
            }
            JumplistNext => {
                let Editor { files, wins, .. } = self;
                let txt = &*files.get(fid)?.as_ref()?.text;
                let jl = &mut wins.get_mut(win_id)?.as_mut()?.jumplist;
                loop {
                    let Some(mark) = jl.next() else {
                        return Some(pos);
                    };
                    if let Some(p) = txt.mark_get(mark)
                        && p != pos
                    {
                        return Some(p);
                    }
                }
            }
            JumplistPrev => {
                let Editor { files, wins, .. } = self;
                let txt = &*files.get(fid)?.as_ref()?.text;
                let jl = &mut wins.get_mut(win_id)?.as_mut()?.jumplist;
                loop {
                    let Some(mark) = jl.prev() else {
                        return Some(pos);
                    };
                    if let Some(p) = txt.mark_get(mark)
                        && p != pos
                    {
                        return Some(p);
                    }
                }
            }
            Nop => Some(pos),
        }
    }

    fn with_text<F>(&self, fid: FileId, f: F) -> Option<usize>
    where
        F: FnOnce(&dyn Text) -> usize,
    {
        self.file(fid).map(|file| f(&*file.text))
    }

    fn vertical_motion(
        &mut self,
        m: MotionKind,
        win_id: WinId,
        fid: FileId,
        cid: CursorId,
        pos: usize,
    ) -> Option<usize> {
        let (np, col) = {
            let file = self.file(fid)?;
            let txt = &*file.text;
            let ln = txt.lineno_by_pos(pos);
            let total = txt.lineno_by_pos(txt.size());
            let target = match m {
                MotionKind::LineDown if ln < total => ln + 1,
                MotionKind::LineUp if ln > 1 => ln - 1,
                _ => return Some(pos),
            };
            let sticky = self
                .win_ref(win_id)
                .and_then(|w| w.view.cursor(cid))
                .and_then(|c| c.sticky_col);
            let col = sticky.unwrap_or_else(|| {
                txt.bytes_in(txt.line_begin(pos), pos).graphemes(true).count()
            });
            let begin = txt.pos_by_lineno(target);
            (txt.line_offset(begin, col + 1), col)
        };
        if let Some(c) = self.win_mut(win_id).and_then(|w| w.view.cursor_mut(cid)) {
            c.sticky_col = Some(col);
        }
        Some(np)
    }
}
