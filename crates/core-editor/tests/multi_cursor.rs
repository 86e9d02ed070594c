//! Multi-cursor editing: cursor spawning, per-cursor registers, and
//! cursor-count invariants across operators.

mod common;

use common::editor_with;

fn cursor_count(ed: &core_editor::Editor) -> usize {
    ed.win_ref(ed.win).map(|w| w.view.cursors.len()).unwrap_or(0)
}

#[test]
fn visual_line_i_spawns_a_cursor_per_line() {
    let mut ed = editor_with("aa\nbb\n");
    ed.keys("VjI");
    assert_eq!(cursor_count(&ed), 2);
    let positions: Vec<usize> = ed
        .win_ref(ed.win)
        .unwrap()
        .view
        .cursors
        .iter()
        .map(|c| c.pos)
        .collect();
    assert_eq!(positions, vec![0, 3]);
}

#[test]
fn insert_applies_to_every_cursor() {
    let mut ed = editor_with("aa\nbb\n");
    ed.keys("VjI");
    ed.keys("iX<Esc>");
    assert_eq!(ed.text_content(), "Xaa\nXbb\n");
}

#[test]
fn delete_applies_per_cursor() {
    let mut ed = editor_with("aa\nbb\n");
    ed.keys("VjI");
    ed.keys("x");
    assert_eq!(ed.text_content(), "a\nb\n");
    assert_eq!(cursor_count(&ed), 2);
}

#[test]
fn multi_cursor_yank_uses_private_registers() {
    let mut ed = editor_with("ab cd\nef gh\n");
    ed.keys("VjI"); // cursors at both line starts
    ed.keys("yw");
    let regs: Vec<String> = ed
        .win_ref(ed.win)
        .unwrap()
        .view
        .cursors
        .iter()
        .map(|c| c.reg.data.clone())
        .collect();
    assert_eq!(regs, vec!["ab ".to_string(), "ef ".to_string()]);
    ed.keys("P");
    assert_eq!(ed.text_content(), "ab ab cd\nef ef gh\n");
}

#[test]
fn operator_never_grows_the_cursor_set() {
    let mut ed = editor_with("aa\nbb\ncc\n");
    ed.keys("VjjI");
    let n = cursor_count(&ed);
    assert_eq!(n, 3);
    ed.keys("dw");
    assert!(cursor_count(&ed) <= n);
}

#[test]
fn cursor_spawning_at_line_ends() {
    let mut ed = editor_with("aaa\nb\n");
    ed.keys("VjA");
    let positions: Vec<usize> = ed
        .win_ref(ed.win)
        .unwrap()
        .view
        .cursors
        .iter()
        .map(|c| c.pos)
        .collect();
    // line_finish of each line
    assert_eq!(positions, vec![2, 4]);
}
