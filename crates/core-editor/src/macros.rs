//! Macro storage and the two recorders.
//!
//! Two independent machines share this store: user recording (`q<reg>` ...
//! `q`) appends every raw key to a named slot, and the operator macro is
//! auto-recorded across insert/replace/change so `.` can replay the typed
//! text. The `Repeat` slot receives a copy of the operator macro before
//! each replay so subsequent edits cannot mutate repeat history.

use core_input::keys_iter;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroSlot {
    /// `a`-`z`.
    Named(u8),
    /// Auto-recorded keystream of the last insert/replace/change.
    Operator,
    /// Stable copy replayed by `.`.
    Repeat,
}

impl MacroSlot {
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_lowercase() {
            Some(MacroSlot::Named(c as u8 - b'a'))
        } else {
            None
        }
    }
}

#[derive(Default)]
pub struct Macros {
    named: [String; 26],
    operator: String,
    repeat: String,
    /// Slot receiving every raw key while user recording is active.
    pub recording: Option<MacroSlot>,
    pub last_recorded: Option<MacroSlot>,
    /// Whether the operator macro is currently capturing keys.
    pub operator_active: bool,
}

impl Macros {
    pub fn get(&self, slot: MacroSlot) -> &str {
        match slot {
            MacroSlot::Named(n) => &self.named[n as usize],
            MacroSlot::Operator => &self.operator,
            MacroSlot::Repeat => &self.repeat,
        }
    }

    fn get_mut(&mut self, slot: MacroSlot) -> &mut String {
        match slot {
            MacroSlot::Named(n) => &mut self.named[n as usize],
            MacroSlot::Operator => &mut self.operator,
            MacroSlot::Repeat => &mut self.repeat,
        }
    }

    pub fn set(&mut self, slot: MacroSlot, content: String) {
        *self.get_mut(slot) = content;
    }

    pub fn append(&mut self, slot: MacroSlot, keys: &str) {
        self.get_mut(slot).push_str(keys);
    }

    /// Begin user recording into `slot`. Refused while another recording
    /// is active.
    pub fn record(&mut self, slot: MacroSlot) -> bool {
        if self.recording.is_some() {
            return false;
        }
        self.get_mut(slot).clear();
        self.recording = Some(slot);
        debug!(target: "macro", ?slot, "record_start");
        true
    }

    /// Stop user recording, trimming the trailing stop key which was
    /// already captured.
    pub fn record_stop(&mut self) -> bool {
        let Some(slot) = self.recording.take() else {
            return false;
        };
        let content = self.get_mut(slot);
        if let Some((last_start, _)) = keys_iter(content)
            .scan(0usize, |off, k| {
                let start = *off;
                *off += k.len();
                Some((start, k.len()))
            })
            .last()
        {
            content.truncate(last_start);
        }
        self.last_recorded = Some(slot);
        debug!(target: "macro", ?slot, len = self.get(slot).len(), "record_stop");
        true
    }

    /// Restart the operator macro (insert/replace/change entry).
    pub fn operator_record(&mut self) {
        self.operator.clear();
        self.operator_active = true;
    }

    pub fn operator_stop(&mut self) {
        self.operator_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_and_trims_stop_key() {
        let mut m = Macros::default();
        assert!(m.record(MacroSlot::Named(0)));
        m.append(MacroSlot::Named(0), "i");
        m.append(MacroSlot::Named(0), "hi");
        m.append(MacroSlot::Named(0), "<Esc>");
        m.append(MacroSlot::Named(0), "q");
        assert!(m.record_stop());
        assert_eq!(m.get(MacroSlot::Named(0)), "ihi<Esc>");
        assert_eq!(m.last_recorded, Some(MacroSlot::Named(0)));
    }

    #[test]
    fn nested_recording_refused() {
        let mut m = Macros::default();
        assert!(m.record(MacroSlot::Named(0)));
        assert!(!m.record(MacroSlot::Named(1)));
    }

    #[test]
    fn operator_macro_restarts_clean() {
        let mut m = Macros::default();
        m.operator_record();
        m.append(MacroSlot::Operator, "abc");
        m.operator_record();
        assert_eq!(m.get(MacroSlot::Operator), "");
        assert!(m.operator_active);
    }

    #[test]
    fn stop_trims_bracketed_stop_key() {
        // a macro stopped by a remapped bracketed key loses exactly one key
        let mut m = Macros::default();
        m.record(MacroSlot::Named(1));
        m.append(MacroSlot::Named(1), "x<F2>");
        m.record_stop();
        assert_eq!(m.get(MacroSlot::Named(1)), "x");
    }
}
