//! Yank storage: a byte buffer plus a linewise flag per register.

use core_text::{ByteRange, Text};

/// The default (unnamed) register plus `a`-`z`.
pub const NUM_REGISTERS: usize = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterId {
    Default,
    Named(u8),
}

impl RegisterId {
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_lowercase() {
            Some(RegisterId::Named(c as u8 - b'a'))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        match self {
            RegisterId::Default => 0,
            RegisterId::Named(n) => 1 + n as usize,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Register {
    pub data: String,
    pub linewise: bool,
}

impl Register {
    /// Copy `[start, end)` out of the text.
    pub fn put(&mut self, txt: &dyn Text, range: ByteRange) {
        self.data = txt.bytes_in(range.0, range.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_ids_map_to_distinct_slots() {
        assert_eq!(RegisterId::Default.index(), 0);
        assert_eq!(RegisterId::from_char('a').unwrap().index(), 1);
        assert_eq!(RegisterId::from_char('z').unwrap().index(), 26);
        assert_eq!(RegisterId::from_char('A'), None);
        assert_eq!(RegisterId::from_char('1'), None);
    }

    #[test]
    fn put_copies_range() {
        let txt = core_text::RopeText::new("hello world");
        let mut reg = Register::default();
        reg.put(&txt, (0, 5));
        assert_eq!(reg.data, "hello");
    }
}
