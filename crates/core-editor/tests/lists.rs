//! Jumplist and changelist navigation through key streams.

mod common;

use common::editor_with;

#[test]
fn jump_motions_record_their_origin() {
    let mut ed = editor_with("a\nb\nc\n");
    ed.keys("G"); // jump from 0
    assert_eq!(ed.cursor_pos(), 6);
    ed.keys("gg"); // jump from 6
    assert_eq!(ed.cursor_pos(), 0);
    ed.keys("<C-o>");
    assert_eq!(ed.cursor_pos(), 6);
    ed.keys("<C-o>");
    assert_eq!(ed.cursor_pos(), 0);
    ed.keys("<C-i>");
    assert_eq!(ed.cursor_pos(), 6);
}

#[test]
fn jumplist_origins_come_back_in_reverse_order() {
    let mut ed = editor_with("one\ntwo\nthree\nfour\n");
    // three jumps from lines 1, 2, 3 (G pollutes; use line gotos)
    ed.keys("2gg");
    ed.keys("3gg");
    ed.keys("4gg");
    let mut seen = Vec::new();
    for _ in 0..3 {
        ed.keys("<C-o>");
        seen.push(ed.cursor_pos());
    }
    // origins were 0, 4, 8; newest first
    assert_eq!(seen, vec![8, 4, 0]);
}

#[test]
fn non_jump_motion_restarts_the_walk_at_the_newest_end() {
    let mut ed = editor_with("a\nb\nc\nd\n");
    ed.keys("G");
    ed.keys("gg");
    ed.keys("<C-o>");
    assert_eq!(ed.cursor_pos(), 6);
    ed.keys("j"); // plain motion invalidates the ring cursor
    ed.keys("<C-o>");
    // the walk starts over from the newest mark (origin of gg)
    assert_eq!(ed.cursor_pos(), 6);
}

#[test]
fn changelist_walks_edit_positions() {
    let mut ed = editor_with("aaa\nbbb\nccc\n");
    ed.keys("x"); // edit at 0
    ed.keys("jjx"); // edit on the third line
    let third_edit = ed.cursor_pos();
    assert_eq!(ed.text_content(), "aa\nbbb\ncc\n");

    ed.keys("g;");
    assert_eq!(ed.cursor_pos(), third_edit);
    ed.keys("g;");
    assert_eq!(ed.cursor_pos(), 0);
    ed.keys("g,");
    assert_eq!(ed.cursor_pos(), third_edit);
}

#[test]
fn changelist_resets_after_new_edit() {
    let mut ed = editor_with("aaa\n");
    ed.keys("x");
    ed.keys("g;");
    let first = ed.cursor_pos();
    let _ = first;
    ed.keys("$x"); // new edit: the walk must restart at the newest change
    ed.keys("g;");
    let fid = ed.cur_file_id();
    let newest = ed.file(fid).unwrap().text.history_pos(0);
    assert_eq!(Some(ed.cursor_pos()), newest);
}
