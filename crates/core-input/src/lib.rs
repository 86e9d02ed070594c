//! Tokenisation of the editor's keystroke notation.
//!
//! Keys travel through the editor as strings in vim notation: printable
//! characters stand for themselves, everything else is angle-bracketed
//! (`<Enter>`, `<C-a>`, `<S-F5>`). The input queue is a flat byte string;
//! [`key_len`] splits one key off its front:
//!
//! - `<NAME>` is a single key when `NAME` parses as a known named key *or*
//!   the caller recognises it as a registered editor action;
//! - a `<` that begins neither is the literal one-byte key `<` and never a
//!   prefix;
//! - anything else is one UTF-8 codepoint.
//!
//! Splitting is stateless, so arbitrary fragmentation of the incoming
//! stream cannot change the token sequence.

use tracing::trace;

const NAMED: &[&str] = &[
    "Enter", "Esc", "Escape", "Space", "Tab", "Backspace", "BS", "Del", "Delete", "Up", "Down",
    "Left", "Right", "Home", "End", "PageUp", "PageDown", "Insert",
];

fn is_function_key(name: &str) -> bool {
    name.len() >= 2
        && name.starts_with('F')
        && name[1..].chars().all(|c| c.is_ascii_digit())
        && name[1..].parse::<u8>().is_ok_and(|n| (1..=12).contains(&n))
}

/// Whether `name` (the inside of `<...>`) is a key the tokeniser knows:
/// an optionally modifier-prefixed named key, or a modified single
/// character (`C-a`). A bare single character never needs brackets and
/// is not named.
pub fn is_named_key(name: &str) -> bool {
    let mut base = name;
    let mut modified = false;
    while base.len() > 2 && base.as_bytes()[1] == b'-' {
        match base.as_bytes()[0] {
            b'C' | b'S' | b'M' | b'A' => {
                base = &base[2..];
                modified = true;
            }
            _ => break,
        }
    }
    if base.is_empty() {
        return false;
    }
    if NAMED.contains(&base) || is_function_key(base) {
        return true;
    }
    modified && base.chars().count() == 1
}

/// Byte length of the first key in `keys`; 0 when `keys` is empty.
/// `is_action` answers whether a bracketed name is a registered editor
/// action (those parse as one key even though no terminal emits them).
pub fn key_len(keys: &str, is_action: &dyn Fn(&str) -> bool) -> usize {
    let Some(first) = keys.chars().next() else {
        return 0;
    };
    if first == '<'
        && let Some(end) = keys.find('>')
        && end > 1
    {
        let inner = &keys[1..end];
        if is_named_key(inner) || is_action(inner) {
            return end + 1;
        }
        trace!(target: "keys.token", name = inner, "unknown_bracketed_name");
    }
    first.len_utf8()
}

/// Whether `partial` (the text after an unterminated `<`) could still grow
/// into a named key once more input arrives. Used to hold an incomplete
/// bracketed key in the input buffer instead of misreading its `<` as a
/// literal when the stream is fragmented mid-key.
pub fn is_named_key_prefix(partial: &str) -> bool {
    if partial.len() > 32 {
        return false;
    }
    let mut base = partial;
    loop {
        if base.is_empty() || matches!(base, "C" | "S" | "M" | "A") {
            return true; // could become a modifier prefix or any name
        }
        if base.len() >= 2 && base.as_bytes()[1] == b'-' && matches!(base.as_bytes()[0], b'C' | b'S' | b'M' | b'A')
        {
            base = &base[2..];
            continue;
        }
        break;
    }
    if base.chars().count() == 1 && partial.len() > base.len() {
        return true; // modified single character, e.g. "C-a"
    }
    NAMED.iter().any(|n| n.starts_with(base)) || (base.starts_with('F') && base.len() <= 3)
}

/// The literal character a key inserts, when it has one.
pub fn key_char(key: &str) -> Option<char> {
    if !key.starts_with('<') {
        return key.chars().next();
    }
    match key {
        "<Space>" => Some(' '),
        "<Tab>" => Some('\t'),
        "<Enter>" => Some('\n'),
        _ => None,
    }
}

/// Split a key string into individual keys, assuming no registered
/// action names (useful for iterating binding keys and macro contents).
pub fn keys_iter(keys: &str) -> impl Iterator<Item = &str> {
    let mut rest = keys;
    std::iter::from_fn(move || {
        let len = key_len(rest, &|_| false);
        if len == 0 {
            return None;
        }
        let (key, tail) = rest.split_at(len);
        rest = tail;
        Some(key)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn len(keys: &str) -> usize {
        key_len(keys, &|_| false)
    }

    #[test]
    fn plain_chars_split_by_codepoint() {
        assert_eq!(len("abc"), 1);
        assert_eq!(len("ü"), 2);
        assert_eq!(len("😀x"), 4);
        assert_eq!(len(""), 0);
    }

    #[test]
    fn named_keys_are_single_tokens() {
        assert_eq!(len("<Enter>x"), 7);
        assert_eq!(len("<Esc>"), 5);
        assert_eq!(len("<C-a>rest"), 5);
        assert_eq!(len("<C-S-Left>"), 10);
        assert_eq!(len("<F5>"), 4);
    }

    #[test]
    fn unknown_brackets_are_literal_lt() {
        assert_eq!(len("<x>"), 1);
        assert_eq!(len("<"), 1);
        assert_eq!(len("<notakey>"), 1);
        assert_eq!(len("<>"), 1);
    }

    #[test]
    fn action_names_count_as_keys() {
        let is_action = |name: &str| name == "editor-suspend";
        assert_eq!(key_len("<editor-suspend>q", &is_action), 16);
        assert_eq!(key_len("<editor-unknown>q", &is_action), 1);
    }

    #[test]
    fn named_key_grammar() {
        assert!(is_named_key("Enter"));
        assert!(is_named_key("C-a"));
        assert!(is_named_key("C-S-Tab"));
        assert!(is_named_key("F12"));
        assert!(!is_named_key("F13"));
        assert!(!is_named_key("a"));
        assert!(!is_named_key(""));
        assert!(!is_named_key("Fish"));
    }

    #[test]
    fn named_key_prefixes() {
        assert!(is_named_key_prefix("En"));
        assert!(is_named_key_prefix("C"));
        assert!(is_named_key_prefix("C-"));
        assert!(is_named_key_prefix("C-a"));
        assert!(is_named_key_prefix("C-S-Le"));
        assert!(is_named_key_prefix("F1"));
        assert!(!is_named_key_prefix("p"));
        assert!(!is_named_key_prefix("xyz"));
    }

    #[test]
    fn key_chars() {
        assert_eq!(key_char("a"), Some('a'));
        assert_eq!(key_char("<Space>"), Some(' '));
        assert_eq!(key_char("<Enter>"), Some('\n'));
        assert_eq!(key_char("<C-a>"), None);
    }

    #[test]
    fn iterate_mixed_stream() {
        let keys: Vec<&str> = keys_iter("2dw<Esc>i<C-r>").collect();
        assert_eq!(keys, vec!["2", "d", "w", "<Esc>", "i", "<C-r>"]);
    }

    #[test]
    fn fragmentation_is_transparent() {
        // splitting the same stream at any point yields the same tokens
        let stream = "d2w<Enter><C-a>x";
        let whole: Vec<&str> = keys_iter(stream).collect();
        for cut in 1..stream.len() {
            if !stream.is_char_boundary(cut) {
                continue;
            }
            // tokens never straddle a completed-key boundary: re-joining the
            // halves must reproduce the token sequence
            let joined = format!("{}{}", &stream[..cut], &stream[cut..]);
            let again: Vec<String> = keys_iter(&joined).map(str::to_string).collect();
            assert_eq!(again, whole);
        }
    }
}
