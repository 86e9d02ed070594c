//! Pure position-to-position motions over a [`Text`].
//!
//! These are the building blocks the editor's motion table dispatches to.
//! They are free of editor state: everything that needs a register, a mark
//! table or the focused view lives a layer up. A motion never fails; it
//! returns its argument unchanged when there is nowhere to go. Lookups that
//! genuinely can miss (find-char) return `Option`.

use crate::Text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Word,
    Punct,
}

fn class_of(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Space
    } else if c == '_' || c.is_alphanumeric() {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

/// Long-word classification: whitespace-delimited only.
fn long_class_of(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Word
    }
}

fn class_at(txt: &dyn Text, pos: usize, classify: fn(char) -> CharClass) -> CharClass {
    txt.char_at(pos).map(classify).unwrap_or(CharClass::Space)
}

fn start_next(txt: &dyn Text, pos: usize, classify: fn(char) -> CharClass) -> usize {
    let size = txt.size();
    if pos >= size {
        return size;
    }
    let mut p = pos;
    let class = class_at(txt, p, classify);
    if class != CharClass::Space {
        while p < size && class_at(txt, p, classify) == class {
            p = txt.char_next(p);
        }
    }
    while p < size && class_at(txt, p, classify) == CharClass::Space {
        p = txt.char_next(p);
    }
    p
}

fn end_next(txt: &dyn Text, pos: usize, classify: fn(char) -> CharClass) -> usize {
    let size = txt.size();
    let mut p = txt.char_next(pos);
    while p < size && class_at(txt, p, classify) == CharClass::Space {
        p = txt.char_next(p);
    }
    if p >= size {
        return pos;
    }
    let class = class_at(txt, p, classify);
    loop {
        let n = txt.char_next(p);
        if n >= size || class_at(txt, n, classify) != class {
            return p;
        }
        p = n;
    }
}

fn start_prev(txt: &dyn Text, pos: usize, classify: fn(char) -> CharClass) -> usize {
    if pos == 0 {
        return 0;
    }
    let mut p = txt.char_prev(pos);
    while p > 0 && class_at(txt, p, classify) == CharClass::Space {
        p = txt.char_prev(p);
    }
    let class = class_at(txt, p, classify);
    if class == CharClass::Space {
        return p;
    }
    while p > 0 && class_at(txt, txt.char_prev(p), classify) == class {
        p = txt.char_prev(p);
    }
    p
}

fn end_prev(txt: &dyn Text, pos: usize, classify: fn(char) -> CharClass) -> usize {
    if pos == 0 {
        return 0;
    }
    let mut p = txt.char_prev(pos);
    if class_at(txt, p, classify) != CharClass::Space {
        // step before the run the cursor is in
        let class = class_at(txt, p, classify);
        while p > 0 && class_at(txt, p, classify) == class {
            p = txt.char_prev(p);
        }
        if p == 0 && class_at(txt, p, classify) == class {
            return 0;
        }
    }
    while p > 0 && class_at(txt, p, classify) == CharClass::Space {
        p = txt.char_prev(p);
    }
    p
}

pub fn word_start_next(txt: &dyn Text, pos: usize) -> usize {
    start_next(txt, pos, class_of)
}
pub fn word_start_prev(txt: &dyn Text, pos: usize) -> usize {
    start_prev(txt, pos, class_of)
}
pub fn word_end_next(txt: &dyn Text, pos: usize) -> usize {
    end_next(txt, pos, class_of)
}
pub fn word_end_prev(txt: &dyn Text, pos: usize) -> usize {
    end_prev(txt, pos, class_of)
}
pub fn longword_start_next(txt: &dyn Text, pos: usize) -> usize {
    start_next(txt, pos, long_class_of)
}
pub fn longword_start_prev(txt: &dyn Text, pos: usize) -> usize {
    start_prev(txt, pos, long_class_of)
}
pub fn longword_end_next(txt: &dyn Text, pos: usize) -> usize {
    end_next(txt, pos, long_class_of)
}
pub fn longword_end_prev(txt: &dyn Text, pos: usize) -> usize {
    end_prev(txt, pos, long_class_of)
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Byte offsets where sentences begin: the first non-blank of the text and
/// the first non-blank following each terminator.
fn sentence_starts(txt: &dyn Text) -> Vec<usize> {
    let content = txt.content();
    let mut starts = Vec::new();
    let mut after_end = true;
    for (i, c) in content.char_indices() {
        if after_end && !c.is_whitespace() {
            starts.push(i);
            after_end = false;
        }
        if is_sentence_end(c) {
            after_end = true;
        }
    }
    starts
}

pub fn sentence_next(txt: &dyn Text, pos: usize) -> usize {
    sentence_starts(txt)
        .into_iter()
        .find(|&s| s > pos)
        .unwrap_or(txt.size())
}

pub fn sentence_prev(txt: &dyn Text, pos: usize) -> usize {
    sentence_starts(txt)
        .into_iter()
        .filter(|&s| s < pos)
        .next_back()
        .unwrap_or(0)
}

pub fn line_blank(txt: &dyn Text, pos: usize) -> bool {
    txt.line_begin(pos) == txt.line_end(pos)
}

/// Next blank line strictly below the current one, or end of buffer.
pub fn paragraph_next(txt: &dyn Text, pos: usize) -> usize {
    let size = txt.size();
    let mut p = txt.line_next(pos);
    while p < size && !line_blank(txt, p) {
        p = txt.line_next(p);
    }
    p
}

/// Previous blank line strictly above the current one, or start of buffer.
pub fn paragraph_prev(txt: &dyn Text, pos: usize) -> usize {
    let mut p = txt.line_begin(pos);
    if p == 0 {
        return 0;
    }
    p = txt.line_prev(p);
    while p > 0 && !line_blank(txt, p) {
        p = txt.line_prev(p);
    }
    p
}

/// Function boundaries use the brace-at-column-0 convention: a line whose
/// first byte is `{` opens a body, one whose first byte is `}` closes it.
fn scan_lines(txt: &dyn Text, from: usize, forward: bool, first: u8) -> Option<usize> {
    let size = txt.size();
    let mut p = from;
    loop {
        if txt.byte_get(p) == Some(first) {
            return Some(p);
        }
        if forward {
            let n = txt.line_next(p);
            if n >= size || n == p {
                return None;
            }
            p = n;
        } else {
            if p == 0 {
                return None;
            }
            p = txt.line_prev(p);
        }
    }
}

pub fn function_start_next(txt: &dyn Text, pos: usize) -> usize {
    let next = txt.line_next(pos);
    if next >= txt.size() {
        return txt.size();
    }
    scan_lines(txt, next, true, b'{').unwrap_or(txt.size())
}

pub fn function_start_prev(txt: &dyn Text, pos: usize) -> usize {
    let begin = txt.line_begin(pos);
    if begin == 0 {
        return 0;
    }
    scan_lines(txt, txt.line_prev(begin), false, b'{').unwrap_or(0)
}

pub fn function_end_next(txt: &dyn Text, pos: usize) -> usize {
    let next = txt.line_next(pos);
    if next >= txt.size() {
        return txt.size();
    }
    scan_lines(txt, next, true, b'}').unwrap_or(txt.size())
}

pub fn function_end_prev(txt: &dyn Text, pos: usize) -> usize {
    let begin = txt.line_begin(pos);
    if begin == 0 {
        return 0;
    }
    scan_lines(txt, txt.line_prev(begin), false, b'}').unwrap_or(0)
}

const BRACKETS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

/// `%`: from the first bracket at or after `pos` on the current line, jump
/// to its nesting-aware partner. Unchanged position when there is none.
pub fn bracket_match(txt: &dyn Text, pos: usize) -> usize {
    let line_end = txt.line_end(pos);
    let mut p = pos;
    let (open, close, forward) = loop {
        if p >= line_end {
            return pos;
        }
        match txt.char_at(p) {
            Some(c) => {
                if let Some(&(o, cl)) = BRACKETS.iter().find(|&&(o, _)| o == c) {
                    break (o, cl, true);
                }
                if let Some(&(o, cl)) = BRACKETS.iter().find(|&&(_, cl)| cl == c) {
                    break (o, cl, false);
                }
            }
            None => return pos,
        }
        p = txt.char_next(p);
    };
    let size = txt.size();
    let mut depth = 0usize;
    if forward {
        let mut q = txt.char_next(p);
        while q < size {
            match txt.char_at(q) {
                Some(c) if c == open => depth += 1,
                Some(c) if c == close => {
                    if depth == 0 {
                        return q;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            q = txt.char_next(q);
        }
    } else {
        let mut q = p;
        while q > 0 {
            q = txt.char_prev(q);
            match txt.char_at(q) {
                Some(c) if c == close => depth += 1,
                Some(c) if c == open => {
                    if depth == 0 {
                        return q;
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    }
    pos
}

/// Next occurrence of `ch` at or after `pos` on the same line.
pub fn find_char_next(txt: &dyn Text, pos: usize, ch: char) -> Option<usize> {
    let line_end = txt.line_end(pos.min(txt.size()));
    let mut p = pos;
    while p < line_end {
        if txt.char_at(p) == Some(ch) {
            return Some(p);
        }
        p = txt.char_next(p);
    }
    None
}

/// Last occurrence of `ch` at or before `pos` on the same line.
pub fn find_char_prev(txt: &dyn Text, pos: usize, ch: char) -> Option<usize> {
    let begin = txt.line_begin(pos.min(txt.size()));
    let mut p = pos.min(txt.size());
    loop {
        if txt.char_at(p) == Some(ch) {
            return Some(p);
        }
        if p <= begin {
            return None;
        }
        p = txt.char_prev(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RopeText;

    fn text(s: &str) -> RopeText {
        RopeText::new(s)
    }

    #[test]
    fn word_forward_hits_each_start() {
        let t = text("foo, bar baz\nqux");
        assert_eq!(word_start_next(&t, 0), 3); // the comma run
        assert_eq!(word_start_next(&t, 3), 5); // bar
        assert_eq!(word_start_next(&t, 5), 9); // baz
        assert_eq!(word_start_next(&t, 9), 13); // qux, across the newline
        assert_eq!(word_start_next(&t, 13), 16); // end of buffer
    }

    #[test]
    fn word_backward_and_ends() {
        let t = text("foo bar baz");
        assert_eq!(word_start_prev(&t, 8), 4);
        assert_eq!(word_start_prev(&t, 4), 0);
        assert_eq!(word_start_prev(&t, 0), 0);
        assert_eq!(word_end_next(&t, 0), 2); // last char of foo
        assert_eq!(word_end_next(&t, 2), 6); // last char of bar
        assert_eq!(word_end_prev(&t, 8), 6);
        assert_eq!(word_end_prev(&t, 5), 2);
    }

    #[test]
    fn longword_ignores_punctuation() {
        let t = text("a.b c.d");
        assert_eq!(longword_start_next(&t, 0), 4);
        assert_eq!(longword_end_next(&t, 0), 2);
        assert_eq!(longword_start_prev(&t, 5), 4);
    }

    #[test]
    fn sentences() {
        let t = text("One two. Three!  Four");
        assert_eq!(sentence_next(&t, 0), 9);
        assert_eq!(sentence_next(&t, 9), 17);
        assert_eq!(sentence_prev(&t, 17), 9);
        assert_eq!(sentence_prev(&t, 9), 0);
    }

    #[test]
    fn paragraphs() {
        let t = text("aaa\nbbb\n\nccc\n\n\nddd\n");
        assert_eq!(paragraph_next(&t, 0), 8); // the blank line
        assert_eq!(paragraph_next(&t, 8), 13);
        assert_eq!(paragraph_next(&t, 13), 14);
        assert_eq!(paragraph_prev(&t, 15), 14);
        assert_eq!(paragraph_prev(&t, 14), 13);
        assert_eq!(paragraph_prev(&t, 13), 8);
        assert_eq!(paragraph_prev(&t, 10), 8);
        assert_eq!(paragraph_prev(&t, 4), 0);
    }

    #[test]
    fn function_boundaries() {
        let t = text("fn main()\n{\nbody\n}\nfn other()\n{\n}\n");
        assert_eq!(function_start_next(&t, 0), 10);
        assert_eq!(function_end_next(&t, 10), 17);
        assert_eq!(function_start_next(&t, 10), 30);
        assert_eq!(function_start_prev(&t, 17), 10);
        assert_eq!(function_end_prev(&t, 30), 17);
    }

    #[test]
    fn bracket_matching() {
        let t = text("a (b [c] d) e");
        assert_eq!(bracket_match(&t, 2), 10);
        assert_eq!(bracket_match(&t, 10), 2);
        assert_eq!(bracket_match(&t, 5), 7);
        // scans forward on the line for the first bracket
        assert_eq!(bracket_match(&t, 0), 10);
        assert_eq!(bracket_match(&t, 12), 12);
    }

    #[test]
    fn find_char_is_line_local() {
        let t = text("abcabc\nabc");
        assert_eq!(find_char_next(&t, 1, 'a'), Some(3));
        assert_eq!(find_char_next(&t, 4, 'a'), None);
        assert_eq!(find_char_prev(&t, 5, 'a'), Some(3));
        assert_eq!(find_char_prev(&t, 2, 'b'), Some(1));
        assert_eq!(find_char_prev(&t, 8, 'c'), None);
    }
}
