/* src/form.rs */

use tracing::debug;

use crate::error::{GeoIpError, Result};
use crate::format::is_well_formed_ipv4;
use crate::octet::{CELL_COUNT, Key, NavigationIntent, OctetArray, handle_key};

/// State of the four-cell lookup form.
///
/// Owns the cells and carries out the navigation intents that
/// [`crate::octet`] decides on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    octets: OctetArray,
    focus: usize,
    select_all: bool,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn octets(&self) -> &OctetArray {
        &self.octets
    }

    /// Index of the focused cell.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Whether the focused cell's contents are selected.
    pub fn is_selected(&self) -> bool {
        self.select_all
    }

    /// Replace the contents of cell `index` with `raw` (the whole new text of
    /// the cell) and move focus forward when the entry calls for it.
    pub fn input(&mut self, index: usize, raw: &str) {
        let Some(advance) = self.octets.apply(index, raw) else {
            return;
        };

        if advance && index + 1 < CELL_COUNT {
            self.actuate(NavigationIntent::Advance(index + 1));
        } else {
            self.focus = index;
            self.select_all = false;
        }
    }

    /// Handle a key press in cell `index`. Must run after [`EntryForm::input`]
    /// for the same keystroke so the updated cell value is seen.
    pub fn key(&mut self, index: usize, key: Key) -> NavigationIntent {
        let current = self.octets.get(index).unwrap_or_default();
        let intent = handle_key(index, key, current);
        self.actuate(intent);
        intent
    }

    fn actuate(&mut self, intent: NavigationIntent) {
        match intent {
            NavigationIntent::Advance(next) => {
                self.focus = next;
                self.select_all = true;
            }
            NavigationIntent::Retreat(prev) => {
                self.focus = prev;
                self.select_all = false;
            }
            NavigationIntent::None => {}
        }
    }

    /// Assemble the address for a lookup, rejecting incomplete or malformed entries.
    pub fn submit(&self) -> Result<String> {
        if !self.octets.is_complete() {
            debug!(entry = %self.octets, "rejecting incomplete entry");
            return Err(GeoIpError::IncompleteEntry);
        }

        let ip = self.octets.to_dotted_string();
        if !is_well_formed_ipv4(&ip) {
            return Err(GeoIpError::MalformedAddress(ip));
        }
        Ok(ip)
    }

    /// Fill the cells from a looked-up address.
    pub fn load_address(&mut self, ip: &str) {
        self.octets = OctetArray::from_dotted_string(ip);
        self.focus = 0;
        self.select_all = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_address(form: &mut EntryForm, ip: &str) {
        for part in ip.split('.') {
            let cell = form.focus();
            form.input(cell, part);
            if part.len() < 3 {
                form.key(cell, Key::Dot);
            }
        }
    }

    #[test]
    fn full_octet_advances_and_selects() {
        let mut form = EntryForm::new();
        form.input(0, "192");
        assert_eq!(form.focus(), 1);
        assert!(form.is_selected());
    }

    #[test]
    fn partial_octet_keeps_focus() {
        let mut form = EntryForm::new();
        form.input(0, "19");
        assert_eq!(form.focus(), 0);
        assert!(!form.is_selected());
    }

    #[test]
    fn last_cell_never_advances() {
        let mut form = EntryForm::new();
        form.input(3, "255");
        assert_eq!(form.focus(), 3);
        assert_eq!(form.key(3, Key::Enter), NavigationIntent::None);
        assert_eq!(form.focus(), 3);
    }

    #[test]
    fn typing_a_full_address() {
        let mut form = EntryForm::new();
        type_address(&mut form, "8.8.8.8");
        assert_eq!(form.submit(), Ok("8.8.8.8".to_string()));

        let mut form = EntryForm::new();
        type_address(&mut form, "192.168.1.100");
        assert_eq!(form.submit(), Ok("192.168.1.100".to_string()));
    }

    #[test]
    fn backspace_on_empty_cell_moves_back() {
        let mut form = EntryForm::new();
        form.input(0, "10");
        form.key(0, Key::Dot);
        assert_eq!(form.focus(), 1);

        assert_eq!(form.key(1, Key::Backspace), NavigationIntent::Retreat(0));
        assert_eq!(form.focus(), 0);
        assert!(!form.is_selected());
    }

    #[test]
    fn incomplete_entry_is_rejected() {
        let mut form = EntryForm::new();
        assert_eq!(form.submit(), Err(GeoIpError::IncompleteEntry));

        form.load_address("1.2.3");
        assert_eq!(form.submit(), Err(GeoIpError::IncompleteEntry));
    }

    #[test]
    fn loaded_ipv6_result_is_malformed_on_submit() {
        let mut form = EntryForm::new();
        form.load_address("2001:db8::1.2.3.4");
        assert!(matches!(form.submit(), Err(GeoIpError::MalformedAddress(_))));
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = EntryForm::new();
        form.load_address("1.1.1.1");
        form.input(2, "25");
        form.reset();
        assert_eq!(form, EntryForm::new());
    }
}
