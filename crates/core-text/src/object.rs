//! Range-producing text object primitives.
//!
//! Each function returns the *inner* half-open byte range `[start, end)` of
//! the syntactic unit at a position, or `None` when there is no such unit.
//! Outer widening for delimited objects (one byte per side) is a policy of
//! the editor's object table, not of these primitives; word/sentence/line
//! objects have dedicated outer variants because their widening is not a
//! fixed byte.

use crate::motion::{self, line_blank};
use crate::{ByteRange, Text};

fn same_class(a: char, b: char) -> bool {
    fn word(c: char) -> bool {
        c == '_' || c.is_alphanumeric()
    }
    (a.is_whitespace() && b.is_whitespace())
        || (word(a) && word(b))
        || (!a.is_whitespace() && !word(a) && !b.is_whitespace() && !word(b))
}

/// The run of same-class characters containing `pos`.
pub fn word(txt: &dyn Text, pos: usize) -> Option<ByteRange> {
    let c = txt.char_at(pos)?;
    let mut start = pos;
    while start > 0 {
        let p = txt.char_prev(start);
        match txt.char_at(p) {
            Some(pc) if same_class(pc, c) && pc != '\n' => start = p,
            _ => break,
        }
    }
    let size = txt.size();
    let mut end = txt.char_next(pos);
    while end < size {
        match txt.char_at(end) {
            Some(nc) if same_class(nc, c) && nc != '\n' => end = txt.char_next(end),
            _ => break,
        }
    }
    Some((start, end))
}

fn widen_spaces(txt: &dyn Text, (start, end): ByteRange) -> ByteRange {
    let size = txt.size();
    let mut e = end;
    while e < size && matches!(txt.char_at(e), Some(' ' | '\t')) {
        e = txt.char_next(e);
    }
    if e != end {
        return (start, e);
    }
    let mut s = start;
    while s > 0 {
        let p = txt.char_prev(s);
        if matches!(txt.char_at(p), Some(' ' | '\t')) {
            s = p;
        } else {
            break;
        }
    }
    (s, end)
}

/// Word plus its trailing blanks, or leading blanks when there are none.
pub fn word_outer(txt: &dyn Text, pos: usize) -> Option<ByteRange> {
    word(txt, pos).map(|r| widen_spaces(txt, r))
}

pub fn longword(txt: &dyn Text, pos: usize) -> Option<ByteRange> {
    let c = txt.char_at(pos)?;
    let space = c.is_whitespace();
    let mut start = pos;
    while start > 0 {
        let p = txt.char_prev(start);
        match txt.char_at(p) {
            Some(pc) if pc.is_whitespace() == space && pc != '\n' => start = p,
            _ => break,
        }
    }
    let size = txt.size();
    let mut end = txt.char_next(pos);
    while end < size {
        match txt.char_at(end) {
            Some(nc) if nc.is_whitespace() == space && nc != '\n' => end = txt.char_next(end),
            _ => break,
        }
    }
    Some((start, end))
}

pub fn longword_outer(txt: &dyn Text, pos: usize) -> Option<ByteRange> {
    longword(txt, pos).map(|r| widen_spaces(txt, r))
}

/// The sentence containing `pos`: from its first character up to (not
/// including) the next sentence's first character.
pub fn sentence(txt: &dyn Text, pos: usize) -> Option<ByteRange> {
    let size = txt.size();
    if size == 0 {
        return None;
    }
    let pos = pos.min(size.saturating_sub(1));
    let start = motion::sentence_prev(txt, txt.char_next(pos));
    let end = motion::sentence_next(txt, pos);
    if start >= end { None } else { Some((start, end)) }
}

/// The paragraph containing `pos`: the lines between the surrounding blank
/// lines (blank lines themselves form an empty paragraph).
pub fn paragraph(txt: &dyn Text, pos: usize) -> Option<ByteRange> {
    let size = txt.size();
    if size == 0 {
        return None;
    }
    let mut start = txt.line_begin(pos);
    if line_blank(txt, start) {
        return Some((start, txt.line_next(start)));
    }
    while start > 0 {
        let p = txt.line_prev(start);
        if line_blank(txt, p) {
            break;
        }
        start = p;
    }
    let mut end = txt.line_next(pos);
    while end < size && !line_blank(txt, end) {
        end = txt.line_next(end);
    }
    Some((start, end))
}

/// Inner span of the innermost `open`/`close` pair enclosing `pos`.
/// Nesting-aware; a cursor sitting on a delimiter counts as inside.
pub fn delimited(txt: &dyn Text, pos: usize, open: char, close: char) -> Option<ByteRange> {
    let size = txt.size();
    if size == 0 {
        return None;
    }
    let pos = pos.min(size.saturating_sub(1));
    let open_pos = if txt.char_at(pos) == Some(open) {
        pos
    } else {
        let mut depth = 0usize;
        let mut p = pos;
        loop {
            match txt.char_at(p) {
                Some(c) if c == close && p != pos => depth += 1,
                Some(c) if c == open => {
                    if depth == 0 {
                        break p;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            if p == 0 {
                return None;
            }
            p = txt.char_prev(p);
        }
    };
    let mut depth = 0usize;
    let mut q = txt.char_next(open_pos);
    while q < size {
        match txt.char_at(q) {
            Some(c) if c == open => depth += 1,
            Some(c) if c == close => {
                if depth == 0 {
                    return Some((txt.char_next(open_pos), q));
                }
                depth -= 1;
            }
            _ => {}
        }
        q = txt.char_next(q);
    }
    None
}

/// Inner span between a pair of `quote` characters on the current line.
/// Quotes pair up left to right; when no pair encloses `pos` the first
/// pair after it on the line is used.
pub fn quoted(txt: &dyn Text, pos: usize, quote: char) -> Option<ByteRange> {
    let begin = txt.line_begin(pos.min(txt.size()));
    let end = txt.line_end(pos.min(txt.size()));
    let line = txt.bytes_in(begin, end);
    let marks: Vec<usize> = line
        .char_indices()
        .filter(|&(_, c)| c == quote)
        .map(|(i, _)| begin + i)
        .collect();
    for pair in marks.chunks_exact(2) {
        let (q1, q2) = (pair[0], pair[1]);
        if pos <= q2 || q1 > pos {
            return Some((txt.char_next(q1), q2));
        }
    }
    None
}

pub fn entire(txt: &dyn Text) -> ByteRange {
    (0, txt.size())
}

/// Whole buffer minus leading and trailing blank lines.
pub fn entire_inner(txt: &dyn Text) -> ByteRange {
    let size = txt.size();
    let mut start = 0;
    while start < size && line_blank(txt, start) {
        start = txt.line_next(start);
    }
    let mut end = size;
    while end > start {
        let p = txt.line_prev(end);
        let last = txt.line_begin(end.saturating_sub(1).max(p));
        if !line_blank(txt, last) {
            break;
        }
        end = last;
    }
    (start, end)
}

/// Body of the function enclosing `pos` (brace-at-column-0 convention):
/// inner is between the braces, outer spans the brace lines inclusive.
pub fn function_inner(txt: &dyn Text, pos: usize) -> Option<ByteRange> {
    let open = if txt.byte_get(txt.line_begin(pos)) == Some(b'{') {
        txt.line_begin(pos)
    } else {
        let begin = txt.line_begin(pos);
        if begin == 0 {
            return None;
        }
        let mut p = txt.line_prev(begin);
        loop {
            if txt.byte_get(p) == Some(b'{') {
                break p;
            }
            if txt.byte_get(p) == Some(b'}') {
                return None; // above us a body closed before one opened
            }
            if p == 0 {
                return None;
            }
            p = txt.line_prev(p);
        }
    };
    let close = motion::function_end_next(txt, open);
    if txt.byte_get(close) != Some(b'}') {
        return None;
    }
    Some((txt.char_next(open), close))
}

pub fn function(txt: &dyn Text, pos: usize) -> Option<ByteRange> {
    let (start, end) = function_inner(txt, pos)?;
    let open = txt.char_prev(start);
    Some((open, txt.line_next(end)))
}

/// The whole line including its terminator.
pub fn line(txt: &dyn Text, pos: usize) -> ByteRange {
    (txt.line_begin(pos), txt.line_next(pos))
}

/// The line's content between its first and last non-blank characters.
pub fn line_inner(txt: &dyn Text, pos: usize) -> ByteRange {
    let start = txt.line_start(pos);
    if start == txt.line_end(pos) {
        return (start, start);
    }
    (start, txt.char_next(txt.line_finish(pos)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RopeText;

    fn text(s: &str) -> RopeText {
        RopeText::new(s)
    }

    #[test]
    fn word_runs() {
        let t = text("foo bar,baz");
        assert_eq!(word(&t, 1), Some((0, 3)));
        assert_eq!(word(&t, 4), Some((4, 7)));
        assert_eq!(word(&t, 7), Some((7, 8))); // the comma run
        assert_eq!(word(&t, 3), Some((3, 4))); // whitespace run
        assert_eq!(word(&t, 11), None);
    }

    #[test]
    fn word_outer_prefers_trailing_blanks() {
        let t = text("foo  bar");
        assert_eq!(word_outer(&t, 0), Some((0, 5)));
        assert_eq!(word_outer(&t, 6), Some((3, 8))); // no trailing, takes leading
    }

    #[test]
    fn longword_spans_punctuation() {
        let t = text("a.b c");
        assert_eq!(longword(&t, 0), Some((0, 3)));
        assert_eq!(longword_outer(&t, 0), Some((0, 4)));
    }

    #[test]
    fn word_does_not_cross_lines() {
        let t = text("foo\nbar");
        assert_eq!(word(&t, 0), Some((0, 3)));
        assert_eq!(word(&t, 4), Some((4, 7)));
    }

    #[test]
    fn sentence_span() {
        let t = text("One two. Three four.");
        assert_eq!(sentence(&t, 3), Some((0, 9)));
        assert_eq!(sentence(&t, 12), Some((9, 20)));
    }

    #[test]
    fn paragraph_span() {
        let t = text("aaa\nbbb\n\nccc\n");
        assert_eq!(paragraph(&t, 5), Some((0, 8)));
        assert_eq!(paragraph(&t, 9), Some((9, 13)));
        assert_eq!(paragraph(&t, 8), Some((8, 9))); // the blank line itself
    }

    #[test]
    fn delimited_pairs() {
        let t = text("a (b (c) d) e");
        assert_eq!(delimited(&t, 6, '(', ')'), Some((6, 7)));
        assert_eq!(delimited(&t, 4, '(', ')'), Some((3, 10)));
        assert_eq!(delimited(&t, 9, '(', ')'), Some((3, 10)));
        assert_eq!(delimited(&t, 0, '(', ')'), None);
        // sitting on the opening delimiter
        assert_eq!(delimited(&t, 5, '(', ')'), Some((6, 7)));
    }

    #[test]
    fn quoted_pairs_line_local() {
        let t = text(r#"say "hi" or "bye""#);
        assert_eq!(quoted(&t, 6, '"'), Some((5, 7)));
        assert_eq!(quoted(&t, 14, '"'), Some((13, 16)));
        // before any pair: first pair forward
        assert_eq!(quoted(&t, 0, '"'), Some((5, 7)));
    }

    #[test]
    fn entire_and_inner() {
        let t = text("\n\nbody\n\n");
        assert_eq!(entire(&t), (0, 8));
        assert_eq!(entire_inner(&t), (2, 7));
    }

    #[test]
    fn function_body() {
        let t = text("fn f()\n{\nbody\n}\nrest\n");
        assert_eq!(function_inner(&t, 10), Some((8, 14)));
        assert_eq!(function(&t, 10), Some((7, 16)));
        assert_eq!(function_inner(&t, 17), None);
    }

    #[test]
    fn line_objects() {
        let t = text("  padded  \nnext");
        assert_eq!(line(&t, 3), (0, 11));
        assert_eq!(line_inner(&t, 3), (2, 8));
    }
}
