//! `.` repeat and macro record/replay machinery.

mod common;

use common::editor_with;

#[test]
fn dot_repeats_a_delete() {
    let mut ed = editor_with("aa bb cc\n");
    ed.keys("dw");
    assert_eq!(ed.text_content(), "bb cc\n");
    ed.keys(".");
    assert_eq!(ed.text_content(), "cc\n");
}

#[test]
fn dot_count_overrides_saved_count() {
    let mut ed = editor_with("aa bb cc dd\n");
    ed.keys("dw");
    assert_eq!(ed.text_content(), "bb cc dd\n");
    ed.keys("2.");
    assert_eq!(ed.text_content(), "dd\n");
}

#[test]
fn dot_repeats_change_with_typed_text() {
    let mut ed = editor_with("foo bar baz");
    ed.keys("cwX<Esc>");
    assert_eq!(ed.text_content(), "X bar baz");
    ed.keys("w.");
    assert_eq!(ed.text_content(), "X X baz");
}

#[test]
fn dot_with_count_replays_insert_text_n_times() {
    let mut ed = editor_with("");
    ed.keys("ia<Esc>");
    assert_eq!(ed.text_content(), "a");
    ed.keys("3.");
    assert_eq!(ed.text_content(), "aaaa");
}

#[test]
fn repeat_survives_later_insert_sessions() {
    // the repeat slot is a copy, so a later insert must not corrupt it
    let mut ed = editor_with("x");
    ed.keys("ifoo<Esc>");
    ed.keys(".");
    assert_eq!(ed.text_content(), "foofoox");
    ed.keys("ibar<Esc>");
    ed.keys(".");
    assert_eq!(ed.text_content(), "foofoobarbarx");
}

#[test]
fn macro_records_motions_and_operators() {
    let mut ed = editor_with("aa bb cc dd\n");
    ed.keys("qbdwq");
    assert_eq!(ed.text_content(), "bb cc dd\n");
    ed.keys("@b");
    assert_eq!(ed.text_content(), "cc dd\n");
    ed.keys("@@");
    assert_eq!(ed.text_content(), "dd\n");
}

#[test]
fn replay_of_recording_register_is_refused() {
    let mut ed = editor_with("aa bb\n");
    ed.keys("qa");
    assert!(ed.macros.recording.is_some());
    ed.keys("@a"); // would alias the buffer being recorded
    ed.keys("q");
    assert_eq!(ed.text_content(), "aa bb\n");
}

#[test]
fn stopping_without_recording_is_harmless() {
    let mut ed = editor_with("aa\n");
    ed.keys("q");
    ed.keys("a"); // register name consumed by record start
    ed.keys("q"); // stop immediately: empty macro
    ed.keys("@a");
    assert_eq!(ed.text_content(), "aa\n");
}
