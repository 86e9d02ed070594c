//! The named text-object table.

use core_text::{ByteRange, Text, object};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObjectKind {
    InnerWord,
    OuterWord,
    InnerLongword,
    OuterLongword,
    Sentence,
    Paragraph,
    InnerSquare,
    OuterSquare,
    InnerCurly,
    OuterCurly,
    InnerAngle,
    OuterAngle,
    InnerParen,
    OuterParen,
    InnerQuote,
    OuterQuote,
    InnerSingleQuote,
    OuterSingleQuote,
    InnerBacktick,
    OuterBacktick,
    InnerEntire,
    OuterEntire,
    InnerFunction,
    OuterFunction,
    InnerLine,
    OuterLine,
}

/// Delimited objects share one resolver for inner and outer; the outer
/// variant is produced by widening the range one byte per side.
pub fn is_outer_delimited(kind: TextObjectKind) -> bool {
    use TextObjectKind::*;
    matches!(
        kind,
        OuterSquare
            | OuterCurly
            | OuterAngle
            | OuterParen
            | OuterQuote
            | OuterSingleQuote
            | OuterBacktick
    )
}

pub fn resolve(txt: &dyn Text, kind: TextObjectKind, pos: usize) -> Option<ByteRange> {
    use TextObjectKind::*;
    match kind {
        InnerWord => object::word(txt, pos),
        OuterWord => object::word_outer(txt, pos),
        InnerLongword => object::longword(txt, pos),
        OuterLongword => object::longword_outer(txt, pos),
        Sentence => object::sentence(txt, pos),
        Paragraph => object::paragraph(txt, pos),
        InnerSquare | OuterSquare => object::delimited(txt, pos, '[', ']'),
        InnerCurly | OuterCurly => object::delimited(txt, pos, '{', '}'),
        InnerAngle | OuterAngle => object::delimited(txt, pos, '<', '>'),
        InnerParen | OuterParen => object::delimited(txt, pos, '(', ')'),
        InnerQuote | OuterQuote => object::quoted(txt, pos, '"'),
        InnerSingleQuote | OuterSingleQuote => object::quoted(txt, pos, '\''),
        InnerBacktick | OuterBacktick => object::quoted(txt, pos, '`'),
        InnerEntire => Some(object::entire_inner(txt)),
        OuterEntire => Some(object::entire(txt)),
        InnerFunction => object::function_inner(txt, pos),
        OuterFunction => object::function(txt, pos),
        InnerLine => Some(object::line_inner(txt, pos)),
        OuterLine => Some(object::line(txt, pos)),
    }
}
