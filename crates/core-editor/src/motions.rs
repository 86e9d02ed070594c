//! The named motion table.
//!
//! Each motion is a name plus a type flagset; the executor dispatches on
//! the name, reaching into the text, the cursor (sticky columns), the file
//! (marks), the view (screen lines) or editor state (search, find-char,
//! jump/change lists) as the motion requires.

use crate::action::MotionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    LineUp,
    LineDown,
    LineBegin,
    LineStart,
    LineFinish,
    LineLastChar,
    LineEnd,
    LinePrev,
    LineNext,
    /// Goto line `count`.
    Line,
    /// Goto column `count` on the current line.
    Column,
    CharPrev,
    CharNext,
    LineCharPrev,
    LineCharNext,
    WordStartPrev,
    WordStartNext,
    WordEndPrev,
    WordEndNext,
    LongwordStartPrev,
    LongwordStartNext,
    LongwordEndPrev,
    LongwordEndNext,
    SentencePrev,
    SentenceNext,
    ParagraphPrev,
    ParagraphNext,
    FunctionStartPrev,
    FunctionStartNext,
    FunctionEndPrev,
    FunctionEndNext,
    BracketMatch,
    FileBegin,
    FileEnd,
    LeftTo,
    RightTo,
    LeftTill,
    RightTill,
    /// Repeat the last find-char motion.
    TotillRepeat,
    /// Repeat the last find-char motion in the opposite direction.
    TotillReverse,
    Mark,
    MarkLine,
    SearchWordForward,
    SearchWordBackward,
    SearchNext,
    SearchPrev,
    WindowLineTop,
    WindowLineMiddle,
    WindowLineBottom,
    ChangelistNext,
    ChangelistPrev,
    JumplistNext,
    JumplistPrev,
    Nop,
}

/// Type flags of each motion, mirrored from the motion table of a
/// traditional vi: linewise verticals, inclusive finds and ends-of-word,
/// jumps for everything "large".
pub fn motion_type(m: MotionKind) -> MotionType {
    use MotionKind::*;
    use MotionType as T;
    match m {
        LineUp | LineDown => T::LINEWISE,
        Line => T::LINEWISE | T::IDEMPOTENT | T::JUMP,
        Column => T::CHARWISE | T::IDEMPOTENT,
        CharPrev | CharNext | LineCharPrev | LineCharNext => T::CHARWISE,
        WordStartPrev | WordStartNext | LongwordStartPrev | LongwordStartNext => T::CHARWISE,
        WordEndPrev | WordEndNext | LongwordEndPrev | LongwordEndNext => {
            T::CHARWISE | T::INCLUSIVE
        }
        LineFinish | LineLastChar => T::INCLUSIVE,
        SentencePrev | SentenceNext => T::LINEWISE,
        ParagraphPrev | ParagraphNext => T::LINEWISE | T::JUMP,
        FunctionStartPrev | FunctionStartNext | FunctionEndPrev | FunctionEndNext => {
            T::LINEWISE | T::JUMP
        }
        BracketMatch => T::INCLUSIVE | T::JUMP,
        FileBegin | FileEnd => T::LINEWISE | T::JUMP,
        RightTo | RightTill => T::INCLUSIVE,
        Mark => T::JUMP | T::IDEMPOTENT,
        MarkLine => T::LINEWISE | T::JUMP | T::IDEMPOTENT,
        SearchWordForward | SearchWordBackward | SearchNext | SearchPrev => T::JUMP,
        WindowLineTop | WindowLineMiddle | WindowLineBottom => {
            T::LINEWISE | T::JUMP | T::IDEMPOTENT
        }
        ChangelistNext | ChangelistPrev | JumplistNext | JumplistPrev => T::INCLUSIVE,
        Nop => T::IDEMPOTENT,
        LineBegin | LineStart | LineEnd | LinePrev | LineNext | LeftTo | LeftTill
        | TotillRepeat | TotillReverse => T::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_table_spot_checks() {
        assert!(motion_type(MotionKind::LineDown).contains(MotionType::LINEWISE));
        assert!(motion_type(MotionKind::WordEndNext).contains(MotionType::INCLUSIVE));
        assert!(motion_type(MotionKind::SearchNext).contains(MotionType::JUMP));
        assert!(motion_type(MotionKind::Line).contains(MotionType::IDEMPOTENT));
        assert!(motion_type(MotionKind::LineNext).is_empty());
        assert!(!motion_type(MotionKind::JumplistPrev).contains(MotionType::JUMP));
    }
}
