//! The pending action: what the interpreter has parsed so far.

use bitflags::bitflags;

use crate::macros::MacroSlot;
use crate::motions::MotionKind;
use crate::operators::OperatorKind;
use crate::register::RegisterId;
use crate::textobjects::TextObjectKind;
use crate::window::MarkId;

bitflags! {
    /// Range semantics of a motion or of the whole pending action.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MotionType: u8 {
        /// Target is a column; operator ranges stay partial-line.
        const CHARWISE = 1 << 0;
        /// Target implies whole lines.
        const LINEWISE = 1 << 1;
        /// With an operator the end character is included.
        const INCLUSIVE = 1 << 2;
        /// Pushes the origin onto the jumplist.
        const JUMP = 1 << 3;
        /// Applying N times equals applying once.
        const IDEMPOTENT = 1 << 4;
    }
}

/// Which side a put operator anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutMode {
    After,
    AfterEnd,
    Before,
    BeforeEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Swap,
    Upper,
    Lower,
}

/// Where the cursor-spawning operator places new cursors on each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPlace {
    Sol,
    Eol,
}

/// Operator argument payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpArg {
    #[default]
    None,
    Put(PutMode),
    Case(CaseMode),
    Cursors(CursorPlace),
}

/// The interpreter's pending `(count, register, operator, motion,
/// text-object)` tuple. Zeroed after every completed action; `count`
/// defaults to 1 at execution time.
#[derive(Debug, Clone, Default)]
pub struct Action {
    pub count: u32,
    pub kind: MotionType,
    pub op: Option<OperatorKind>,
    pub movement: Option<MotionKind>,
    pub textobj: Option<TextObjectKind>,
    pub reg: Option<RegisterId>,
    pub mark: Option<MarkId>,
    pub arg: OpArg,
    /// Keystream to replay when the action is repeated with `.`.
    pub macro_slot: Option<MacroSlot>,
}

impl Action {
    pub fn reset(&mut self) {
        *self = Action::default();
    }
}
