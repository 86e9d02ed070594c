//! Operator, motion and text-object behaviour through the executor.

mod common;

use common::{default_register, editor_with, named_register};
use core_editor::modes::ModeId;

#[test]
fn register_linewise_flag_matches_range() {
    let mut ed = editor_with("one\ntwo\n");
    ed.keys("dd");
    assert!(default_register(&ed).linewise);
    assert_eq!(default_register(&ed).data, "one\n");
    assert_eq!(ed.text_content(), "two\n");

    let mut ed = editor_with("one two\n");
    ed.keys("dw");
    assert!(!default_register(&ed).linewise);
}

#[test]
fn named_register_receives_delete() {
    let mut ed = editor_with("one\ntwo\n");
    ed.keys("\"add");
    assert_eq!(named_register(&ed, 'a').data, "one\n");
    assert!(named_register(&ed, 'a').linewise);
    assert_eq!(ed.text_content(), "two\n");
}

#[test]
fn yank_then_put_copies_line_and_keeps_original() {
    let mut ed = editor_with("abc\n");
    ed.keys("yyp");
    assert_eq!(ed.text_content(), "abc\nabc\n");
    assert_eq!(ed.cursor_pos(), 4);
}

#[test]
fn delete_then_put_before_restores_buffer() {
    let mut ed = editor_with("Hello World\n");
    ed.keys("dwP");
    assert_eq!(ed.text_content(), "Hello World\n");
}

#[test]
fn undo_then_redo_is_a_noop_on_content() {
    let mut ed = editor_with("one\ntwo\n");
    ed.keys("dd");
    let deleted = ed.text_content();
    ed.keys("u");
    assert_eq!(ed.text_content(), "one\ntwo\n");
    ed.keys("<C-r>");
    assert_eq!(ed.text_content(), deleted);
}

#[test]
fn counted_linewise_delete() {
    let mut ed = editor_with("a\nb\nc\nd\n");
    ed.keys("2dd");
    assert_eq!(ed.text_content(), "c\nd\n");
    assert_eq!(default_register(&ed).data, "a\nb\n");
}

#[test]
fn change_word_behaves_like_change_to_word_end() {
    let mut ed = editor_with("foo bar");
    ed.keys("cwX<Esc>");
    assert_eq!(ed.text_content(), "X bar");
}

#[test]
fn delete_inclusive_word_end() {
    let mut ed = editor_with("foo bar");
    ed.keys("de");
    assert_eq!(ed.text_content(), " bar");
}

#[test]
fn inner_word_object_deletes_word_only() {
    let mut ed = editor_with("foo bar");
    ed.keys("diw");
    assert_eq!(ed.text_content(), " bar");
}

#[test]
fn outer_paren_object_includes_delimiters() {
    let mut ed = editor_with("a (bc) d");
    ed.keys("ll");
    ed.keys("da(");
    assert_eq!(ed.text_content(), "a  d");
}

#[test]
fn change_inner_quote() {
    let mut ed = editor_with("say \"hi\" now");
    ed.keys("ci\"X<Esc>");
    assert_eq!(ed.text_content(), "say \"X\" now");
}

#[test]
fn visual_charwise_delete_takes_selection() {
    let mut ed = editor_with("abcdef");
    ed.keys("vlld");
    assert_eq!(ed.text_content(), "def");
    assert_eq!(ed.mode, ModeId::Normal);
}

#[test]
fn visual_shift_left_removes_indent() {
    let mut ed = editor_with("\tfoo\n");
    ed.keys("V<");
    ed.keys_flush();
    assert_eq!(ed.text_content(), "foo\n");
}

#[test]
fn case_operators() {
    let mut ed = editor_with("foo bar");
    ed.keys("gUiw");
    assert_eq!(ed.text_content(), "FOO bar");
    ed.keys("0~");
    assert_eq!(ed.text_content(), "fOO bar");
}

#[test]
fn find_char_then_repeat_and_reverse() {
    let mut ed = editor_with("axbxc");
    ed.keys("fx");
    assert_eq!(ed.cursor_pos(), 1);
    ed.keys(";");
    assert_eq!(ed.cursor_pos(), 3);
    ed.keys(",");
    assert_eq!(ed.cursor_pos(), 1);
}

#[test]
fn till_stops_before_target() {
    let mut ed = editor_with("a_x");
    ed.keys("tx");
    assert_eq!(ed.cursor_pos(), 1);
}

#[test]
fn mark_set_and_goto() {
    let mut ed = editor_with("one two three");
    ed.keys("ma");
    ed.keys("ww");
    assert_eq!(ed.cursor_pos(), 8);
    ed.keys("`a");
    assert_eq!(ed.cursor_pos(), 0);
}

#[test]
fn goto_line_and_file_end() {
    let mut ed = editor_with("a\nb\nc\n");
    ed.keys("G");
    assert_eq!(ed.cursor_pos(), 6);
    ed.keys("2gg");
    assert_eq!(ed.cursor_pos(), 2);
    ed.keys("gg");
    assert_eq!(ed.cursor_pos(), 0);
}

#[test]
fn paragraph_delete_is_linewise() {
    let mut ed = editor_with("aa\nbb\n\ncc\n");
    ed.keys("d}");
    assert_eq!(ed.text_content(), "\ncc\n");
    assert!(default_register(&ed).linewise);
}

#[test]
fn search_prompt_moves_cursor() {
    let mut ed = editor_with("foo bar\nfoo baz\n");
    ed.keys("/baz<Enter>");
    assert_eq!(ed.cursor_pos(), 12);
    assert_eq!(ed.mode, ModeId::Normal);
    // n repeats the search, wrapping
    ed.keys("n");
    assert_eq!(ed.cursor_pos(), 12);
}

#[test]
fn invalid_search_pattern_is_refused() {
    let mut ed = editor_with("foo\n");
    ed.keys("/[<Enter>");
    assert_eq!(ed.cursor_pos(), 0);
    assert_eq!(ed.text_content(), "foo\n");
}

#[test]
fn stray_key_in_operator_mode_resets() {
    let mut ed = editor_with("foo bar\n");
    ed.keys("d");
    assert_eq!(ed.mode, ModeId::Operator);
    ed.keys("Z");
    assert_eq!(ed.mode, ModeId::Normal);
    assert_eq!(ed.text_content(), "foo bar\n");
    // the interpreter is intact
    ed.keys("dw");
    assert_eq!(ed.text_content(), "bar\n");
}

#[test]
fn window_split_shares_file_and_tracks_edits() {
    let mut ed = editor_with("hello");
    let first = ed.win;
    ed.keys("<C-w>s");
    assert_ne!(ed.win, first);
    let fid = ed.cur_file_id();
    assert_eq!(ed.file(fid).map(|f| f.refcount), Some(2));
    ed.keys("iX<Esc>");
    assert_eq!(ed.text_content(), "Xhello");
    // the other window's cursor was re-anchored past the insert
    assert_eq!(ed.win_ref(first).map(|w| w.view.primary().pos), Some(1));
    // closing one window keeps the shared file alive
    ed.keys("<C-w>c");
    assert_eq!(ed.file(fid).map(|f| f.refcount), Some(1));
    assert_eq!(ed.win, first);
}

#[test]
fn selection_endpoint_marks_track_visual() {
    let mut ed = editor_with("abcdef");
    ed.keys("vll<Esc>");
    let fid = ed.cur_file_id();
    let file = ed.file(fid).unwrap();
    let start = file.marks[core_editor::window::MarkId::SelectionStart.index()]
        .and_then(|m| file.text.mark_get(m));
    let end = file.marks[core_editor::window::MarkId::SelectionEnd.index()]
        .and_then(|m| file.text.mark_get(m));
    assert_eq!(start, Some(0));
    assert_eq!(end, Some(3));
}
