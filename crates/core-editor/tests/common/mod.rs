#![allow(dead_code)]

use core_editor::Editor;
use core_editor::register::{Register, RegisterId};
use core_ui::ScriptedUi;

/// Editor over a single scratch window holding `content`, cursor at 0.
pub fn editor_with(content: &str) -> Editor {
    let mut ed = Editor::new(Box::new(ScriptedUi::new(Vec::<String>::new())));
    ed.window_new(None).expect("scratch window");
    let fid = ed.cur_file_id();
    assert!(ed.text_insert(fid, 0, content));
    if let Some(f) = ed.file_mut(fid) {
        f.text.snapshot();
    }
    ed
}

pub fn default_register(ed: &Editor) -> &Register {
    &ed.registers[RegisterId::Default.index()]
}

pub fn named_register(ed: &Editor, name: char) -> &Register {
    let id = RegisterId::from_char(name).expect("register name");
    &ed.registers[id.index()]
}
