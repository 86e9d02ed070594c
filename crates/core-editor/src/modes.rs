//! The mode graph: a flat table of nodes with mutable parent slots.
//!
//! Binding resolution is an explicit walk up the parent edges; dynamic
//! reparenting (the operator node borrowing the text-object subtree) is a
//! single slot assignment guarded by the enter/leave hooks in the editor.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::time::Duration;

use crate::Editor;
use crate::action::{MotionType, OpArg};
use crate::motions::MotionKind;
use crate::operators::OperatorKind;
use crate::textobjects::TextObjectKind;

pub const MODE_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeId {
    Basic,
    Move,
    TextObj,
    OperatorOption,
    Operator,
    Normal,
    Visual,
    VisualLine,
    Readline,
    Prompt,
    Insert,
    Replace,
}

impl ModeId {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Argument payload attached to a key action at binding time.
#[derive(Debug, Clone, Copy)]
pub enum Arg {
    None,
    I(i64),
    Motion(MotionKind),
    Operator(OperatorKind, OpArg),
    Object(TextObjectKind),
    Mode(ModeId),
    Type(MotionType),
}

/// A bound action returns how many extra bytes of the remaining input it
/// consumed, or `None` when it needs more input (the parse is held).
pub type KeyActionFn = fn(&mut Editor, &str, &Arg) -> Option<usize>;

pub struct KeyAction {
    pub name: &'static str,
    pub func: KeyActionFn,
    pub arg: Arg,
}

#[derive(Clone, Copy)]
pub enum Binding {
    Action(&'static KeyAction),
    /// Replacement keystring, re-parsed in place of the matched keys.
    Alias(&'static str),
}

pub struct Mode {
    pub name: &'static str,
    /// Status-line tag (`--INSERT--` etc.); empty for normal.
    pub status: &'static str,
    pub parent: Option<ModeId>,
    pub is_user: bool,
    pub visual: bool,
    pub idle_timeout: Option<Duration>,
    pub bindings: BTreeMap<String, Binding>,
}

impl Mode {
    fn new(name: &'static str, parent: Option<ModeId>) -> Self {
        Self {
            name,
            status: "",
            parent,
            is_user: false,
            visual: false,
            idle_timeout: None,
            bindings: BTreeMap::new(),
        }
    }

    pub fn bind(&mut self, key: &str, binding: Binding) {
        self.bindings.insert(key.to_string(), binding);
    }

    pub fn binding(&self, key: &str) -> Option<Binding> {
        self.bindings.get(key).copied()
    }

    /// Whether some binding key strictly extends `prefix`.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.bindings
            .range::<str, _>((Bound::Excluded(prefix), Bound::Unbounded))
            .next()
            .is_some_and(|(k, _)| k.starts_with(prefix))
    }
}

/// The statically enumerated mode table:
///
/// ```text
/// BASIC <- MOVE <- OPERATOR <- NORMAL
///                  ^ (dynamic)
///                  OPERATOR_OPTION <- TEXTOBJ <- MOVE (same MOVE)
/// MOVE <- VISUAL <- VISUAL_LINE
/// BASIC <- READLINE <- PROMPT
/// READLINE <- INSERT <- REPLACE
/// ```
pub fn mode_table(insert_idle: Duration) -> Vec<Mode> {
    let mut modes = Vec::with_capacity(MODE_COUNT);
    modes.push(Mode::new("BASIC", None));
    modes.push(Mode::new("MOVE", Some(ModeId::Basic)));
    modes.push(Mode::new("TEXT-OBJECTS", Some(ModeId::Move)));
    modes.push(Mode::new("OPERATOR-OPTION", Some(ModeId::TextObj)));
    modes.push(Mode::new("OPERATOR", Some(ModeId::Move)));
    let mut normal = Mode::new("NORMAL", Some(ModeId::Operator));
    normal.is_user = true;
    modes.push(normal);
    let mut visual = Mode::new("VISUAL", Some(ModeId::Operator));
    visual.is_user = true;
    visual.visual = true;
    visual.status = "--VISUAL--";
    modes.push(visual);
    let mut visual_line = Mode::new("VISUAL LINE", Some(ModeId::Visual));
    visual_line.is_user = true;
    visual_line.visual = true;
    visual_line.status = "--VISUAL LINE--";
    modes.push(visual_line);
    modes.push(Mode::new("READLINE", Some(ModeId::Basic)));
    let mut prompt = Mode::new("PROMPT", Some(ModeId::Readline));
    prompt.is_user = true;
    modes.push(prompt);
    let mut insert = Mode::new("INSERT", Some(ModeId::Readline));
    insert.is_user = true;
    insert.status = "--INSERT--";
    insert.idle_timeout = Some(insert_idle);
    modes.push(insert);
    let mut replace = Mode::new("REPLACE", Some(ModeId::Insert));
    replace.is_user = true;
    replace.status = "--REPLACE--";
    replace.idle_timeout = Some(insert_idle);
    modes.push(replace);
    debug_assert_eq!(modes.len(), MODE_COUNT);
    modes
}
