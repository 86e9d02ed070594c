//! Named editor actions and the default binding tables.
//!
//! Every action is registered by name so `<name>` key sequences resolve
//! through the registry; the binding tables then attach keys per mode.
//! Key actions receive the unparsed remainder of the input buffer and
//! report how much of it they consumed (find-char eats one key, a count
//! digit none); returning `None` holds the parse until more input
//! arrives.

use core_input::key_char;
use tracing::warn;

use crate::Editor;
use crate::action::{CaseMode, CursorPlace, MotionType, OpArg, PutMode};
use crate::macros::MacroSlot;
use crate::modes::{Arg, Binding, KeyAction, ModeId};
use crate::motions::MotionKind;
use crate::operators::OperatorKind;
use crate::register::RegisterId;
use crate::textobjects::TextObjectKind;
use crate::window::MarkId;

fn next_key<'a>(ed: &Editor, keys: &'a str) -> Option<(usize, &'a str)> {
    let len = core_input::key_len(keys, &|n| ed.actions.contains_key(n));
    if len == 0 {
        None
    } else {
        Some((len, &keys[..len]))
    }
}

// ---------------------------------------------------------------------
// action functions
// ---------------------------------------------------------------------

fn movement(ed: &mut Editor, _keys: &str, arg: &Arg) -> Option<usize> {
    if let Arg::Motion(m) = arg {
        ed.motion(*m);
    }
    Some(0)
}

/// `G`: with a count goto that line, else end of file.
fn movement_line_or_eof(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    if ed.action.count > 0 {
        ed.motion(MotionKind::Line);
    } else {
        ed.motion(MotionKind::FileEnd);
    }
    Some(0)
}

/// Find-char motions consume one more key as their target.
fn movement_key(ed: &mut Editor, keys: &str, arg: &Arg) -> Option<usize> {
    let (len, key) = next_key(ed, keys)?;
    match (arg, key_char(key)) {
        (Arg::Motion(m), Some(ch)) => {
            ed.motion_find(*m, ch);
        }
        _ => ed.action.reset(),
    }
    Some(len)
}

fn count(ed: &mut Editor, _keys: &str, arg: &Arg) -> Option<usize> {
    if let Arg::I(d) = arg {
        ed.action.count = ed
            .action
            .count
            .saturating_mul(10)
            .saturating_add(*d as u32);
    }
    Some(0)
}

/// `0` is a motion without a pending count and a count digit with one.
fn count_zero_or_line_begin(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    if ed.action.count == 0 {
        ed.motion(MotionKind::LineBegin);
    } else {
        ed.action.count = ed.action.count.saturating_mul(10);
    }
    Some(0)
}

fn register_select(ed: &mut Editor, keys: &str, _arg: &Arg) -> Option<usize> {
    let (len, key) = next_key(ed, keys)?;
    if let Some(r) = key_char(key).and_then(RegisterId::from_char) {
        ed.action.reg = Some(r);
    }
    Some(len)
}

fn mark_set(ed: &mut Editor, keys: &str, _arg: &Arg) -> Option<usize> {
    let (len, key) = next_key(ed, keys)?;
    if let Some(id) = key_char(key).and_then(MarkId::from_char) {
        ed.mark_set_at_cursor(id);
    }
    Some(len)
}

fn mark_motion(ed: &mut Editor, keys: &str, arg: &Arg) -> Option<usize> {
    let (len, key) = next_key(ed, keys)?;
    match (arg, key_char(key).and_then(MarkId::from_char)) {
        (Arg::Motion(m), Some(id)) => {
            ed.motion_mark(*m, id);
        }
        _ => ed.action.reset(),
    }
    Some(len)
}

fn operator(ed: &mut Editor, _keys: &str, arg: &Arg) -> Option<usize> {
    if let Arg::Operator(kind, oparg) = arg {
        ed.operator(*kind, *oparg);
    }
    Some(0)
}

/// `J` stages the join operator over a line-next motion; in visual modes
/// the operator alone consumes the selection.
fn join(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    let was_visual = ed.mode_is_visual();
    ed.operator(OperatorKind::Join, OpArg::None);
    if !was_visual {
        ed.motion(MotionKind::LineNext);
    }
    Some(0)
}

fn switch_mode(ed: &mut Editor, _keys: &str, arg: &Arg) -> Option<usize> {
    if let Arg::Mode(m) = arg {
        ed.mode_switch(*m);
    }
    Some(0)
}

/// Force the pending action charwise or linewise (operator option).
fn motion_type_set(ed: &mut Editor, _keys: &str, arg: &Arg) -> Option<usize> {
    if let Arg::Type(t) = arg {
        ed.action.kind = *t;
    }
    Some(0)
}

fn textobject(ed: &mut Editor, _keys: &str, arg: &Arg) -> Option<usize> {
    if let Arg::Object(o) = arg {
        ed.textobject(*o);
    }
    Some(0)
}

fn cancel(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.action.reset();
    ed.mode_switch(ModeId::Normal);
    Some(0)
}

fn insert_before(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.mode_switch(ModeId::Insert);
    Some(0)
}

fn insert_after(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.motion(MotionKind::LineCharNext);
    ed.mode_switch(ModeId::Insert);
    Some(0)
}

fn insert_line_start(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.motion(MotionKind::LineStart);
    ed.mode_switch(ModeId::Insert);
    Some(0)
}

fn insert_line_end(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.motion(MotionKind::LineEnd);
    ed.mode_switch(ModeId::Insert);
    Some(0)
}

fn openline_below(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.mode_switch(ModeId::Insert);
    ed.motion(MotionKind::LineEnd);
    ed.insert_nl();
    Some(0)
}

fn openline_above(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.mode_switch(ModeId::Insert);
    ed.motion(MotionKind::LineBegin);
    ed.insert_nl();
    ed.motion(MotionKind::CharPrev);
    Some(0)
}

fn editor_undo(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.undo();
    Some(0)
}

fn editor_redo(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.redo();
    Some(0)
}

/// `q`: toggle recording; starting consumes the register key.
fn macro_record(ed: &mut Editor, keys: &str, _arg: &Arg) -> Option<usize> {
    if ed.macros.recording.is_some() {
        ed.macro_record_stop();
        return Some(0);
    }
    let (len, key) = next_key(ed, keys)?;
    if let Some(slot) = key_char(key).and_then(MacroSlot::from_char) {
        ed.macro_record(slot);
    }
    Some(len)
}

fn macro_replay(ed: &mut Editor, keys: &str, _arg: &Arg) -> Option<usize> {
    let (len, key) = next_key(ed, keys)?;
    let slot = if key == "@" {
        ed.macros.last_recorded
    } else {
        key_char(key).and_then(MacroSlot::from_char)
    };
    if let Some(slot) = slot {
        ed.macro_replay(slot);
    }
    Some(len)
}

fn repeat(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.repeat();
    Some(0)
}

fn prompt_search_forward(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.prompt_show("/", "");
    Some(0)
}

fn prompt_search_backward(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.prompt_show("?", "");
    Some(0)
}

fn prompt_cmd(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.prompt_show(":", "");
    Some(0)
}

fn prompt_enter(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.prompt_enter();
    Some(0)
}

fn prompt_escape(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.prompt_escape();
    Some(0)
}

fn insert_newline(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.insert_nl();
    Some(0)
}

fn insert_tab(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.insert_tab();
    Some(0)
}

fn delete_char_backward(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.delete_key_backward();
    Some(0)
}

fn delete_char_forward(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.delete_key_forward();
    Some(0)
}

fn window_next(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.window_next();
    Some(0)
}

fn window_prev(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.window_prev();
    Some(0)
}

fn window_split(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.window_split();
    Some(0)
}

fn window_close(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    let wid = ed.win;
    if !ed.window_close(wid) {
        ed.exit(0);
    }
    Some(0)
}

fn editor_suspend(ed: &mut Editor, _keys: &str, _arg: &Arg) -> Option<usize> {
    ed.ui.suspend();
    ed.draw();
    Some(0)
}

// ---------------------------------------------------------------------
// the named action table
// ---------------------------------------------------------------------

macro_rules! actions {
    ($($ident:ident = ($name:literal, $func:expr, $arg:expr);)*) => {
        $(static $ident: KeyAction = KeyAction { name: $name, func: $func, arg: $arg };)*
        static ACTIONS: &[&KeyAction] = &[$(&$ident),*];
    };
}

actions! {
    A_CHAR_LEFT = ("cursor-char-left", movement, Arg::Motion(MotionKind::LineCharPrev));
    A_CHAR_RIGHT = ("cursor-char-right", movement, Arg::Motion(MotionKind::LineCharNext));
    A_LINE_UP = ("cursor-line-up", movement, Arg::Motion(MotionKind::LineUp));
    A_LINE_DOWN = ("cursor-line-down", movement, Arg::Motion(MotionKind::LineDown));
    A_LINE_BEGIN = ("cursor-line-begin", movement, Arg::Motion(MotionKind::LineBegin));
    A_LINE_START = ("cursor-line-start", movement, Arg::Motion(MotionKind::LineStart));
    A_LINE_FINISH = ("cursor-line-finish", movement, Arg::Motion(MotionKind::LineFinish));
    A_LINE_LASTCHAR = ("cursor-line-lastchar", movement, Arg::Motion(MotionKind::LineLastChar));
    A_LINE_GOTO = ("cursor-line-goto", movement, Arg::Motion(MotionKind::Line));
    A_LINE_OR_EOF = ("cursor-line-or-eof", movement_line_or_eof, Arg::None);
    A_COLUMN = ("cursor-column", movement, Arg::Motion(MotionKind::Column));
    A_WORD_NEXT = ("cursor-word-start-next", movement, Arg::Motion(MotionKind::WordStartNext));
    A_WORD_PREV = ("cursor-word-start-prev", movement, Arg::Motion(MotionKind::WordStartPrev));
    A_WORD_END_NEXT = ("cursor-word-end-next", movement, Arg::Motion(MotionKind::WordEndNext));
    A_WORD_END_PREV = ("cursor-word-end-prev", movement, Arg::Motion(MotionKind::WordEndPrev));
    A_LONGWORD_NEXT = ("cursor-longword-start-next", movement, Arg::Motion(MotionKind::LongwordStartNext));
    A_LONGWORD_PREV = ("cursor-longword-start-prev", movement, Arg::Motion(MotionKind::LongwordStartPrev));
    A_LONGWORD_END_NEXT = ("cursor-longword-end-next", movement, Arg::Motion(MotionKind::LongwordEndNext));
    A_LONGWORD_END_PREV = ("cursor-longword-end-prev", movement, Arg::Motion(MotionKind::LongwordEndPrev));
    A_SENTENCE_PREV = ("cursor-sentence-prev", movement, Arg::Motion(MotionKind::SentencePrev));
    A_SENTENCE_NEXT = ("cursor-sentence-next", movement, Arg::Motion(MotionKind::SentenceNext));
    A_PARA_PREV = ("cursor-paragraph-prev", movement, Arg::Motion(MotionKind::ParagraphPrev));
    A_PARA_NEXT = ("cursor-paragraph-next", movement, Arg::Motion(MotionKind::ParagraphNext));
    A_FUNC_START_PREV = ("cursor-function-start-prev", movement, Arg::Motion(MotionKind::FunctionStartPrev));
    A_FUNC_START_NEXT = ("cursor-function-start-next", movement, Arg::Motion(MotionKind::FunctionStartNext));
    A_FUNC_END_PREV = ("cursor-function-end-prev", movement, Arg::Motion(MotionKind::FunctionEndPrev));
    A_FUNC_END_NEXT = ("cursor-function-end-next", movement, Arg::Motion(MotionKind::FunctionEndNext));
    A_BRACKET_MATCH = ("cursor-bracket-match", movement, Arg::Motion(MotionKind::BracketMatch));
    A_WINDOW_TOP = ("cursor-window-top", movement, Arg::Motion(MotionKind::WindowLineTop));
    A_WINDOW_MIDDLE = ("cursor-window-middle", movement, Arg::Motion(MotionKind::WindowLineMiddle));
    A_WINDOW_BOTTOM = ("cursor-window-bottom", movement, Arg::Motion(MotionKind::WindowLineBottom));
    A_JUMPLIST_PREV = ("jumplist-prev", movement, Arg::Motion(MotionKind::JumplistPrev));
    A_JUMPLIST_NEXT = ("jumplist-next", movement, Arg::Motion(MotionKind::JumplistNext));
    A_CHANGELIST_PREV = ("changelist-prev", movement, Arg::Motion(MotionKind::ChangelistPrev));
    A_CHANGELIST_NEXT = ("changelist-next", movement, Arg::Motion(MotionKind::ChangelistNext));
    A_SEARCH_WORD_FWD = ("search-word-forward", movement, Arg::Motion(MotionKind::SearchWordForward));
    A_SEARCH_WORD_BWD = ("search-word-backward", movement, Arg::Motion(MotionKind::SearchWordBackward));
    A_SEARCH_NEXT = ("search-next", movement, Arg::Motion(MotionKind::SearchNext));
    A_SEARCH_PREV = ("search-prev", movement, Arg::Motion(MotionKind::SearchPrev));
    A_TOTILL_REPEAT = ("totill-repeat", movement, Arg::Motion(MotionKind::TotillRepeat));
    A_TOTILL_REVERSE = ("totill-reverse", movement, Arg::Motion(MotionKind::TotillReverse));
    A_TO_RIGHT = ("to-char-right", movement_key, Arg::Motion(MotionKind::RightTo));
    A_TO_LEFT = ("to-char-left", movement_key, Arg::Motion(MotionKind::LeftTo));
    A_TILL_RIGHT = ("till-char-right", movement_key, Arg::Motion(MotionKind::RightTill));
    A_TILL_LEFT = ("till-char-left", movement_key, Arg::Motion(MotionKind::LeftTill));
    A_COUNT_1 = ("count-1", count, Arg::I(1));
    A_COUNT_2 = ("count-2", count, Arg::I(2));
    A_COUNT_3 = ("count-3", count, Arg::I(3));
    A_COUNT_4 = ("count-4", count, Arg::I(4));
    A_COUNT_5 = ("count-5", count, Arg::I(5));
    A_COUNT_6 = ("count-6", count, Arg::I(6));
    A_COUNT_7 = ("count-7", count, Arg::I(7));
    A_COUNT_8 = ("count-8", count, Arg::I(8));
    A_COUNT_9 = ("count-9", count, Arg::I(9));
    A_COUNT_0 = ("count-zero", count_zero_or_line_begin, Arg::None);
    A_REGISTER = ("register", register_select, Arg::None);
    A_MARK_SET = ("mark-set", mark_set, Arg::None);
    A_MARK_GOTO = ("mark-goto", mark_motion, Arg::Motion(MotionKind::Mark));
    A_MARK_GOTO_LINE = ("mark-goto-line", mark_motion, Arg::Motion(MotionKind::MarkLine));
    A_OP_DELETE = ("op-delete", operator, Arg::Operator(OperatorKind::Delete, OpArg::None));
    A_OP_CHANGE = ("op-change", operator, Arg::Operator(OperatorKind::Change, OpArg::None));
    A_OP_YANK = ("op-yank", operator, Arg::Operator(OperatorKind::Yank, OpArg::None));
    A_OP_PUT_AFTER = ("op-put-after", operator, Arg::Operator(OperatorKind::Put, OpArg::Put(PutMode::After)));
    A_OP_PUT_BEFORE = ("op-put-before", operator, Arg::Operator(OperatorKind::Put, OpArg::Put(PutMode::Before)));
    A_OP_PUT_AFTER_END = ("op-put-after-end", operator, Arg::Operator(OperatorKind::Put, OpArg::Put(PutMode::AfterEnd)));
    A_OP_PUT_BEFORE_END = ("op-put-before-end", operator, Arg::Operator(OperatorKind::Put, OpArg::Put(PutMode::BeforeEnd)));
    A_OP_SHIFT_RIGHT = ("op-shift-right", operator, Arg::Operator(OperatorKind::ShiftRight, OpArg::None));
    A_OP_SHIFT_LEFT = ("op-shift-left", operator, Arg::Operator(OperatorKind::ShiftLeft, OpArg::None));
    A_OP_CASE_SWAP = ("op-case-swap", operator, Arg::Operator(OperatorKind::CaseChange, OpArg::Case(CaseMode::Swap)));
    A_OP_CASE_UPPER = ("op-case-upper", operator, Arg::Operator(OperatorKind::CaseChange, OpArg::Case(CaseMode::Upper)));
    A_OP_CASE_LOWER = ("op-case-lower", operator, Arg::Operator(OperatorKind::CaseChange, OpArg::Case(CaseMode::Lower)));
    A_OP_JOIN = ("op-join", join, Arg::None);
    A_OP_CURSORS_SOL = ("op-cursors-line-start", operator, Arg::Operator(OperatorKind::NewCursors, OpArg::Cursors(CursorPlace::Sol)));
    A_OP_CURSORS_EOL = ("op-cursors-line-end", operator, Arg::Operator(OperatorKind::NewCursors, OpArg::Cursors(CursorPlace::Eol)));
    A_INSERT = ("insert-mode", insert_before, Arg::None);
    A_INSERT_AFTER = ("insert-after", insert_after, Arg::None);
    A_INSERT_LINE_START = ("insert-line-start", insert_line_start, Arg::None);
    A_INSERT_LINE_END = ("insert-line-end", insert_line_end, Arg::None);
    A_OPENLINE_BELOW = ("openline-below", openline_below, Arg::None);
    A_OPENLINE_ABOVE = ("openline-above", openline_above, Arg::None);
    A_MODE_REPLACE = ("mode-replace", switch_mode, Arg::Mode(ModeId::Replace));
    A_MODE_VISUAL = ("mode-visual", switch_mode, Arg::Mode(ModeId::Visual));
    A_MODE_VISUAL_LINE = ("mode-visual-line", switch_mode, Arg::Mode(ModeId::VisualLine));
    A_CANCEL = ("cancel", cancel, Arg::None);
    A_TYPE_CHARWISE = ("motion-charwise", motion_type_set, Arg::Type(MotionType::CHARWISE));
    A_TYPE_LINEWISE = ("motion-linewise", motion_type_set, Arg::Type(MotionType::LINEWISE));
    A_UNDO = ("editor-undo", editor_undo, Arg::None);
    A_REDO = ("editor-redo", editor_redo, Arg::None);
    A_MACRO_RECORD = ("macro-record", macro_record, Arg::None);
    A_MACRO_REPLAY = ("macro-replay", macro_replay, Arg::None);
    A_REPEAT = ("repeat", repeat, Arg::None);
    A_PROMPT_SEARCH_FWD = ("prompt-search-forward", prompt_search_forward, Arg::None);
    A_PROMPT_SEARCH_BWD = ("prompt-search-backward", prompt_search_backward, Arg::None);
    A_PROMPT_CMD = ("prompt-cmd", prompt_cmd, Arg::None);
    A_PROMPT_ENTER = ("prompt-enter", prompt_enter, Arg::None);
    A_PROMPT_ESCAPE = ("prompt-escape", prompt_escape, Arg::None);
    A_INSERT_NEWLINE = ("insert-newline", insert_newline, Arg::None);
    A_INSERT_TAB = ("insert-tab", insert_tab, Arg::None);
    A_DELETE_BACK = ("delete-char-backward", delete_char_backward, Arg::None);
    A_DELETE_FWD = ("delete-char-forward", delete_char_forward, Arg::None);
    A_WINDOW_NEXT = ("window-next", window_next, Arg::None);
    A_WINDOW_PREV = ("window-prev", window_prev, Arg::None);
    A_WINDOW_SPLIT = ("window-split", window_split, Arg::None);
    A_WINDOW_CLOSE = ("window-close", window_close, Arg::None);
    A_SUSPEND = ("editor-suspend", editor_suspend, Arg::None);
    A_OBJ_WORD_INNER = ("textobj-word-inner", textobject, Arg::Object(TextObjectKind::InnerWord));
    A_OBJ_WORD_OUTER = ("textobj-word-outer", textobject, Arg::Object(TextObjectKind::OuterWord));
    A_OBJ_LONGWORD_INNER = ("textobj-longword-inner", textobject, Arg::Object(TextObjectKind::InnerLongword));
    A_OBJ_LONGWORD_OUTER = ("textobj-longword-outer", textobject, Arg::Object(TextObjectKind::OuterLongword));
    A_OBJ_SENTENCE = ("textobj-sentence", textobject, Arg::Object(TextObjectKind::Sentence));
    A_OBJ_PARAGRAPH = ("textobj-paragraph", textobject, Arg::Object(TextObjectKind::Paragraph));
    A_OBJ_SQUARE_INNER = ("textobj-square-inner", textobject, Arg::Object(TextObjectKind::InnerSquare));
    A_OBJ_SQUARE_OUTER = ("textobj-square-outer", textobject, Arg::Object(TextObjectKind::OuterSquare));
    A_OBJ_CURLY_INNER = ("textobj-curly-inner", textobject, Arg::Object(TextObjectKind::InnerCurly));
    A_OBJ_CURLY_OUTER = ("textobj-curly-outer", textobject, Arg::Object(TextObjectKind::OuterCurly));
    A_OBJ_ANGLE_INNER = ("textobj-angle-inner", textobject, Arg::Object(TextObjectKind::InnerAngle));
    A_OBJ_ANGLE_OUTER = ("textobj-angle-outer", textobject, Arg::Object(TextObjectKind::OuterAngle));
    A_OBJ_PAREN_INNER = ("textobj-paren-inner", textobject, Arg::Object(TextObjectKind::InnerParen));
    A_OBJ_PAREN_OUTER = ("textobj-paren-outer", textobject, Arg::Object(TextObjectKind::OuterParen));
    A_OBJ_QUOTE_INNER = ("textobj-quote-inner", textobject, Arg::Object(TextObjectKind::InnerQuote));
    A_OBJ_QUOTE_OUTER = ("textobj-quote-outer", textobject, Arg::Object(TextObjectKind::OuterQuote));
    A_OBJ_SQUOTE_INNER = ("textobj-single-quote-inner", textobject, Arg::Object(TextObjectKind::InnerSingleQuote));
    A_OBJ_SQUOTE_OUTER = ("textobj-single-quote-outer", textobject, Arg::Object(TextObjectKind::OuterSingleQuote));
    A_OBJ_BACKTICK_INNER = ("textobj-backtick-inner", textobject, Arg::Object(TextObjectKind::InnerBacktick));
    A_OBJ_BACKTICK_OUTER = ("textobj-backtick-outer", textobject, Arg::Object(TextObjectKind::OuterBacktick));
    A_OBJ_ENTIRE_INNER = ("textobj-entire-inner", textobject, Arg::Object(TextObjectKind::InnerEntire));
    A_OBJ_ENTIRE_OUTER = ("textobj-entire-outer", textobject, Arg::Object(TextObjectKind::OuterEntire));
    A_OBJ_FUNCTION_INNER = ("textobj-function-inner", textobject, Arg::Object(TextObjectKind::InnerFunction));
    A_OBJ_FUNCTION_OUTER = ("textobj-function-outer", textobject, Arg::Object(TextObjectKind::OuterFunction));
    A_OBJ_LINE_INNER = ("textobj-line-inner", textobject, Arg::Object(TextObjectKind::InnerLine));
    A_OBJ_LINE_OUTER = ("textobj-line-outer", textobject, Arg::Object(TextObjectKind::OuterLine));
}

// ---------------------------------------------------------------------
// default binding tables
// ---------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Bind {
    A(&'static str),
    Alias(&'static str),
}

#[rustfmt::skip]
static DEFAULT_BINDINGS: &[(ModeId, &str, Bind)] = &[
    // BASIC: keys every mode understands
    (ModeId::Basic, "<Esc>", Bind::A("cancel")),
    (ModeId::Basic, "<Left>", Bind::A("cursor-char-left")),
    (ModeId::Basic, "<Right>", Bind::A("cursor-char-right")),
    (ModeId::Basic, "<Up>", Bind::A("cursor-line-up")),
    (ModeId::Basic, "<Down>", Bind::A("cursor-line-down")),
    (ModeId::Basic, "<Home>", Bind::A("cursor-line-begin")),
    (ModeId::Basic, "<End>", Bind::A("cursor-line-lastchar")),
    (ModeId::Basic, "<C-z>", Bind::A("editor-suspend")),
    // MOVE
    (ModeId::Move, "h", Bind::A("cursor-char-left")),
    (ModeId::Move, "l", Bind::A("cursor-char-right")),
    (ModeId::Move, "k", Bind::A("cursor-line-up")),
    (ModeId::Move, "j", Bind::A("cursor-line-down")),
    (ModeId::Move, "0", Bind::A("count-zero")),
    (ModeId::Move, "1", Bind::A("count-1")),
    (ModeId::Move, "2", Bind::A("count-2")),
    (ModeId::Move, "3", Bind::A("count-3")),
    (ModeId::Move, "4", Bind::A("count-4")),
    (ModeId::Move, "5", Bind::A("count-5")),
    (ModeId::Move, "6", Bind::A("count-6")),
    (ModeId::Move, "7", Bind::A("count-7")),
    (ModeId::Move, "8", Bind::A("count-8")),
    (ModeId::Move, "9", Bind::A("count-9")),
    (ModeId::Move, "^", Bind::A("cursor-line-start")),
    (ModeId::Move, "$", Bind::A("cursor-line-lastchar")),
    (ModeId::Move, "g_", Bind::A("cursor-line-finish")),
    (ModeId::Move, "w", Bind::A("cursor-word-start-next")),
    (ModeId::Move, "b", Bind::A("cursor-word-start-prev")),
    (ModeId::Move, "e", Bind::A("cursor-word-end-next")),
    (ModeId::Move, "ge", Bind::A("cursor-word-end-prev")),
    (ModeId::Move, "W", Bind::A("cursor-longword-start-next")),
    (ModeId::Move, "B", Bind::A("cursor-longword-start-prev")),
    (ModeId::Move, "E", Bind::A("cursor-longword-end-next")),
    (ModeId::Move, "gE", Bind::A("cursor-longword-end-prev")),
    (ModeId::Move, "(", Bind::A("cursor-sentence-prev")),
    (ModeId::Move, ")", Bind::A("cursor-sentence-next")),
    (ModeId::Move, "{", Bind::A("cursor-paragraph-prev")),
    (ModeId::Move, "}", Bind::A("cursor-paragraph-next")),
    (ModeId::Move, "[[", Bind::A("cursor-function-start-prev")),
    (ModeId::Move, "]]", Bind::A("cursor-function-start-next")),
    (ModeId::Move, "[]", Bind::A("cursor-function-end-prev")),
    (ModeId::Move, "][", Bind::A("cursor-function-end-next")),
    (ModeId::Move, "%", Bind::A("cursor-bracket-match")),
    (ModeId::Move, "|", Bind::A("cursor-column")),
    (ModeId::Move, "gg", Bind::A("cursor-line-goto")),
    (ModeId::Move, "G", Bind::A("cursor-line-or-eof")),
    (ModeId::Move, "H", Bind::A("cursor-window-top")),
    (ModeId::Move, "M", Bind::A("cursor-window-middle")),
    (ModeId::Move, "L", Bind::A("cursor-window-bottom")),
    (ModeId::Move, "f", Bind::A("to-char-right")),
    (ModeId::Move, "F", Bind::A("to-char-left")),
    (ModeId::Move, "t", Bind::A("till-char-right")),
    (ModeId::Move, "T", Bind::A("till-char-left")),
    (ModeId::Move, ";", Bind::A("totill-repeat")),
    (ModeId::Move, ",", Bind::A("totill-reverse")),
    (ModeId::Move, "`", Bind::A("mark-goto")),
    (ModeId::Move, "'", Bind::A("mark-goto-line")),
    (ModeId::Move, "\"", Bind::A("register")),
    (ModeId::Move, "*", Bind::A("search-word-forward")),
    (ModeId::Move, "#", Bind::A("search-word-backward")),
    (ModeId::Move, "n", Bind::A("search-next")),
    (ModeId::Move, "N", Bind::A("search-prev")),
    (ModeId::Move, "/", Bind::A("prompt-search-forward")),
    (ModeId::Move, "?", Bind::A("prompt-search-backward")),
    (ModeId::Move, ":", Bind::A("prompt-cmd")),
    (ModeId::Move, "<C-o>", Bind::A("jumplist-prev")),
    (ModeId::Move, "<C-i>", Bind::A("jumplist-next")),
    (ModeId::Move, "g;", Bind::A("changelist-prev")),
    (ModeId::Move, "g,", Bind::A("changelist-next")),
    // TEXTOBJ (reachable while an operator or a visual mode is active)
    (ModeId::TextObj, "iw", Bind::A("textobj-word-inner")),
    (ModeId::TextObj, "aw", Bind::A("textobj-word-outer")),
    (ModeId::TextObj, "iW", Bind::A("textobj-longword-inner")),
    (ModeId::TextObj, "aW", Bind::A("textobj-longword-outer")),
    (ModeId::TextObj, "is", Bind::A("textobj-sentence")),
    (ModeId::TextObj, "as", Bind::A("textobj-sentence")),
    (ModeId::TextObj, "ip", Bind::A("textobj-paragraph")),
    (ModeId::TextObj, "ap", Bind::A("textobj-paragraph")),
    (ModeId::TextObj, "i[", Bind::A("textobj-square-inner")),
    (ModeId::TextObj, "a[", Bind::A("textobj-square-outer")),
    (ModeId::TextObj, "i]", Bind::A("textobj-square-inner")),
    (ModeId::TextObj, "a]", Bind::A("textobj-square-outer")),
    (ModeId::TextObj, "i(", Bind::A("textobj-paren-inner")),
    (ModeId::TextObj, "a(", Bind::A("textobj-paren-outer")),
    (ModeId::TextObj, "i)", Bind::A("textobj-paren-inner")),
    (ModeId::TextObj, "a)", Bind::A("textobj-paren-outer")),
    (ModeId::TextObj, "ib", Bind::A("textobj-paren-inner")),
    (ModeId::TextObj, "ab", Bind::A("textobj-paren-outer")),
    (ModeId::TextObj, "i{", Bind::A("textobj-curly-inner")),
    (ModeId::TextObj, "a{", Bind::A("textobj-curly-outer")),
    (ModeId::TextObj, "i}", Bind::A("textobj-curly-inner")),
    (ModeId::TextObj, "a}", Bind::A("textobj-curly-outer")),
    (ModeId::TextObj, "iB", Bind::A("textobj-curly-inner")),
    (ModeId::TextObj, "aB", Bind::A("textobj-curly-outer")),
    (ModeId::TextObj, "i<", Bind::A("textobj-angle-inner")),
    (ModeId::TextObj, "a<", Bind::A("textobj-angle-outer")),
    (ModeId::TextObj, "i>", Bind::A("textobj-angle-inner")),
    (ModeId::TextObj, "a>", Bind::A("textobj-angle-outer")),
    (ModeId::TextObj, "i\"", Bind::A("textobj-quote-inner")),
    (ModeId::TextObj, "a\"", Bind::A("textobj-quote-outer")),
    (ModeId::TextObj, "i'", Bind::A("textobj-single-quote-inner")),
    (ModeId::TextObj, "a'", Bind::A("textobj-single-quote-outer")),
    (ModeId::TextObj, "i`", Bind::A("textobj-backtick-inner")),
    (ModeId::TextObj, "a`", Bind::A("textobj-backtick-outer")),
    (ModeId::TextObj, "ie", Bind::A("textobj-entire-inner")),
    (ModeId::TextObj, "ae", Bind::A("textobj-entire-outer")),
    (ModeId::TextObj, "if", Bind::A("textobj-function-inner")),
    (ModeId::TextObj, "af", Bind::A("textobj-function-outer")),
    (ModeId::TextObj, "il", Bind::A("textobj-line-inner")),
    (ModeId::TextObj, "al", Bind::A("textobj-line-outer")),
    // OPERATOR-OPTION: force charwise/linewise while an operator pends
    (ModeId::OperatorOption, "v", Bind::A("motion-charwise")),
    (ModeId::OperatorOption, "V", Bind::A("motion-linewise")),
    // OPERATOR
    (ModeId::Operator, "d", Bind::A("op-delete")),
    (ModeId::Operator, "c", Bind::A("op-change")),
    (ModeId::Operator, "y", Bind::A("op-yank")),
    (ModeId::Operator, ">", Bind::A("op-shift-right")),
    (ModeId::Operator, "<", Bind::A("op-shift-left")),
    (ModeId::Operator, "g~", Bind::A("op-case-swap")),
    (ModeId::Operator, "gu", Bind::A("op-case-lower")),
    (ModeId::Operator, "gU", Bind::A("op-case-upper")),
    // NORMAL
    (ModeId::Normal, "i", Bind::A("insert-mode")),
    (ModeId::Normal, "a", Bind::A("insert-after")),
    (ModeId::Normal, "I", Bind::A("insert-line-start")),
    (ModeId::Normal, "A", Bind::A("insert-line-end")),
    (ModeId::Normal, "o", Bind::A("openline-below")),
    (ModeId::Normal, "O", Bind::A("openline-above")),
    (ModeId::Normal, "R", Bind::A("mode-replace")),
    (ModeId::Normal, "v", Bind::A("mode-visual")),
    (ModeId::Normal, "V", Bind::A("mode-visual-line")),
    (ModeId::Normal, "p", Bind::A("op-put-after")),
    (ModeId::Normal, "P", Bind::A("op-put-before")),
    (ModeId::Normal, "gp", Bind::A("op-put-after-end")),
    (ModeId::Normal, "gP", Bind::A("op-put-before-end")),
    (ModeId::Normal, "J", Bind::A("op-join")),
    (ModeId::Normal, "u", Bind::A("editor-undo")),
    (ModeId::Normal, "<C-r>", Bind::A("editor-redo")),
    (ModeId::Normal, "q", Bind::A("macro-record")),
    (ModeId::Normal, "@", Bind::A("macro-replay")),
    (ModeId::Normal, ".", Bind::A("repeat")),
    (ModeId::Normal, "m", Bind::A("mark-set")),
    (ModeId::Normal, "x", Bind::Alias("dl")),
    (ModeId::Normal, "X", Bind::Alias("dh")),
    (ModeId::Normal, "D", Bind::Alias("d$")),
    (ModeId::Normal, "C", Bind::Alias("c$")),
    (ModeId::Normal, "Y", Bind::Alias("y$")),
    (ModeId::Normal, "s", Bind::Alias("cl")),
    (ModeId::Normal, "S", Bind::Alias("cc")),
    (ModeId::Normal, "~", Bind::Alias("g~l")),
    (ModeId::Normal, "<C-w>w", Bind::A("window-next")),
    (ModeId::Normal, "<C-w>p", Bind::A("window-prev")),
    (ModeId::Normal, "<C-w>s", Bind::A("window-split")),
    (ModeId::Normal, "<C-w>c", Bind::A("window-close")),
    // VISUAL
    (ModeId::Visual, "v", Bind::A("cancel")),
    (ModeId::Visual, "V", Bind::A("mode-visual-line")),
    (ModeId::Visual, "x", Bind::Alias("d")),
    (ModeId::Visual, "J", Bind::A("op-join")),
    (ModeId::Visual, "I", Bind::A("op-cursors-line-start")),
    (ModeId::Visual, "A", Bind::A("op-cursors-line-end")),
    // VISUAL LINE
    (ModeId::VisualLine, "v", Bind::A("mode-visual")),
    (ModeId::VisualLine, "V", Bind::A("cancel")),
    // READLINE: line-editing keys shared by insert and prompt
    (ModeId::Readline, "<Backspace>", Bind::A("delete-char-backward")),
    (ModeId::Readline, "<Del>", Bind::A("delete-char-forward")),
    // PROMPT
    (ModeId::Prompt, "<Enter>", Bind::A("prompt-enter")),
    (ModeId::Prompt, "<Esc>", Bind::A("prompt-escape")),
    // INSERT
    (ModeId::Insert, "<Enter>", Bind::A("insert-newline")),
    (ModeId::Insert, "<Tab>", Bind::A("insert-tab")),
];

/// Register the named actions and attach the default bindings.
pub fn install(ed: &mut Editor) {
    for &a in ACTIONS {
        ed.actions.insert(a.name, a);
    }
    for &(mode, key, ref bind) in DEFAULT_BINDINGS {
        let binding = match *bind {
            Bind::A(name) => match ed.actions.get(name) {
                Some(&a) => Binding::Action(a),
                None => {
                    warn!(target: "keys.bind", name, "unknown_action");
                    continue;
                }
            },
            Bind::Alias(keys) => Binding::Alias(keys),
        };
        ed.modes[mode.index()].bind(key, binding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_are_unique() {
        let mut names: Vec<&str> = ACTIONS.iter().map(|a| a.name).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn every_bound_action_exists() {
        for (_, key, bind) in DEFAULT_BINDINGS {
            if let Bind::A(name) = bind {
                assert!(
                    ACTIONS.iter().any(|a| a.name == *name),
                    "binding {key} references unknown action {name}"
                );
            }
        }
    }
}
