//! End-to-end key-stream scenarios against known buffers.

mod common;

use common::{default_register, editor_with};

#[test]
fn dw_deletes_word_into_register() {
    let mut ed = editor_with("Hello World\n");
    ed.keys("dw");
    assert_eq!(ed.text_content(), "World\n");
    assert_eq!(ed.cursor_pos(), 0);
    let reg = default_register(&ed);
    assert_eq!(reg.data, "Hello ");
    assert!(!reg.linewise);
}

#[test]
fn join_replaces_line_break_with_space() {
    let mut ed = editor_with("abc\ndef\n");
    ed.keys("J");
    assert_eq!(ed.text_content(), "abc def\n");
    assert_eq!(ed.cursor_pos(), 3);
}

#[test]
fn visual_line_shift_right_expands_tabs() {
    let mut ed = editor_with("  line1\n  line2\n");
    ed.options.tabwidth = 4;
    ed.options.expandtab = true;
    ed.keys("Vj>");
    assert_eq!(ed.text_content(), "      line1\n      line2\n");
}

#[test]
fn star_searches_word_under_cursor_forward() {
    let mut ed = editor_with("foo bar\nfoo baz\n");
    ed.keys("*");
    assert_eq!(ed.cursor_pos(), 8);
}

#[test]
fn dot_replays_inserted_text_once() {
    let mut ed = editor_with("x");
    ed.keys("ifoo<Esc>.");
    assert_eq!(ed.text_content(), "foofoox");
}

#[test]
fn recorded_macro_replays_edit() {
    let mut ed = editor_with("");
    ed.keys("qaifoo<Esc>q@a@a");
    assert_eq!(ed.text_content(), "foofoofoo");
}

fn run_fragmented(content: &str, stream: &str, chunk: usize) -> (String, usize) {
    let mut ed = editor_with(content);
    let chars: Vec<char> = stream.chars().collect();
    for piece in chars.chunks(chunk) {
        let s: String = piece.iter().collect();
        ed.keys(&s);
    }
    ed.keys_flush();
    (ed.text_content(), ed.cursor_pos())
}

#[test]
fn input_fragmentation_is_transparent() {
    let content = "alpha beta gamma\n";
    let stream = "wdwifoo bar<Esc>0x2w";
    let whole = run_fragmented(content, stream, stream.chars().count());
    for chunk in [1, 2, 3, 5] {
        assert_eq!(
            run_fragmented(content, stream, chunk),
            whole,
            "chunk size {chunk} diverged"
        );
    }
}
