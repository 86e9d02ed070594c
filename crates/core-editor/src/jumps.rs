//! Jumplist ring and changelist cursor.

use std::collections::VecDeque;

use core_text::{Mark, Text};

/// Default jumplist capacity.
pub const JUMPLIST_SIZE: usize = 31;

/// Bounded ring of marks with a walk cursor. Adding past capacity evicts
/// the oldest entry; invalidating resets the cursor so the next walk
/// starts from the newest end.
#[derive(Debug)]
pub struct JumpList {
    ring: VecDeque<Mark>,
    cap: usize,
    cursor: Option<usize>,
}

impl JumpList {
    pub fn new(cap: usize) -> Self {
        Self {
            ring: VecDeque::with_capacity(cap),
            cap,
            cursor: None,
        }
    }

    pub fn add(&mut self, mark: Mark) {
        if self.ring.len() == self.cap {
            self.ring.pop_front();
        }
        self.ring.push_back(mark);
        self.cursor = None;
    }

    /// Step toward older entries.
    pub fn prev(&mut self) -> Option<Mark> {
        let idx = match self.cursor {
            None => self.ring.len().checked_sub(1)?,
            Some(0) => return None,
            Some(c) => c - 1,
        };
        self.cursor = Some(idx);
        self.ring.get(idx).copied()
    }

    /// Step back toward newer entries.
    pub fn next(&mut self) -> Option<Mark> {
        let idx = self.cursor? + 1;
        if idx >= self.ring.len() {
            return None;
        }
        self.cursor = Some(idx);
        self.ring.get(idx).copied()
    }

    pub fn invalidate(&mut self) {
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

/// Per-window walk over the text's change history. The index is anchored
/// to a history state token; any new edit resets the walk.
#[derive(Debug)]
pub struct ChangeList {
    pub index: usize,
    pub pos: usize,
    pub state: u64,
}

impl Default for ChangeList {
    fn default() -> Self {
        Self {
            index: 0,
            pos: 0,
            state: u64::MAX,
        }
    }
}

impl ChangeList {
    /// Step to an older change (`g;`).
    pub fn older(&mut self, txt: &dyn Text, pos: usize) -> usize {
        let state = txt.state();
        if self.state != state {
            self.index = 0;
        } else if pos == self.pos {
            self.index += 1;
        }
        match txt.history_pos(self.index) {
            Some(p) => self.pos = p,
            None => self.index = self.index.saturating_sub(1),
        }
        self.state = state;
        self.pos
    }

    /// Step back to a newer change (`g,`).
    pub fn newer(&mut self, txt: &dyn Text, pos: usize) -> usize {
        let state = txt.state();
        if self.state != state {
            self.index = 0;
        } else if self.index > 0 && pos == self.pos {
            self.index -= 1;
        }
        match txt.history_pos(self.index) {
            Some(p) => self.pos = p,
            None => self.index += 1,
        }
        self.state = state;
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::RopeText;

    #[test]
    fn ring_walks_newest_to_oldest() {
        let mut jl = JumpList::new(31);
        for m in [10, 20, 30] {
            jl.add(m);
        }
        assert_eq!(jl.prev(), Some(30));
        assert_eq!(jl.prev(), Some(20));
        assert_eq!(jl.prev(), Some(10));
        assert_eq!(jl.prev(), None);
        assert_eq!(jl.next(), Some(20));
        assert_eq!(jl.next(), Some(30));
        assert_eq!(jl.next(), None);
    }

    #[test]
    fn adding_past_capacity_evicts_oldest() {
        let mut jl = JumpList::new(3);
        for m in 0..5 {
            jl.add(m);
        }
        assert_eq!(jl.len(), 3);
        assert_eq!(jl.prev(), Some(4));
        assert_eq!(jl.prev(), Some(3));
        assert_eq!(jl.prev(), Some(2));
        assert_eq!(jl.prev(), None);
    }

    #[test]
    fn add_resets_walk_cursor() {
        let mut jl = JumpList::new(31);
        jl.add(1);
        jl.add(2);
        assert_eq!(jl.prev(), Some(2));
        jl.add(3);
        assert_eq!(jl.prev(), Some(3));
    }

    #[test]
    fn changelist_walks_history_and_resets_on_edit() {
        let mut txt = RopeText::new("aaaa");
        txt.insert(1, "x");
        txt.snapshot();
        txt.insert(3, "y");
        txt.snapshot();

        let mut cl = ChangeList::default();
        let p1 = cl.older(&txt, 0);
        assert_eq!(p1, 3); // most recent change
        let p2 = cl.older(&txt, p1);
        assert_eq!(p2, 1);
        // past the end: stays put
        let p3 = cl.older(&txt, p2);
        assert_eq!(p3, 1);
        // walk back newer
        let p4 = cl.newer(&txt, p3);
        assert_eq!(p4, 3);

        // a new edit resets the walk
        txt.insert(0, "z");
        txt.snapshot();
        let p5 = cl.older(&txt, p4);
        assert_eq!(p5, 0);
    }
}
