/* src/octet.rs */
//! Segmented IPv4 entry: four bounded decimal cells with auto-advance and
//! auto-backspace. Everything here is a pure decision function; moving focus
//! and selecting text is left to the caller (see [`crate::form`]).

use std::fmt;

/// Number of cells in an IPv4 address.
pub const CELL_COUNT: usize = 4;

const LAST_CELL: usize = CELL_COUNT - 1;
const MAX_OCTET: u32 = 255;
const MAX_CELL_LEN: usize = 3;

/// Exactly four cells, each empty or a decimal string in `0..=255`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OctetArray([String; CELL_COUNT]);

impl OctetArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split on `.`, padding with empty cells and dropping anything past the fourth.
    ///
    /// ```rust
    /// use iplocate::OctetArray;
    ///
    /// let octets = OctetArray::from_dotted_string("192.168");
    /// assert_eq!(octets.cells(), &["192", "168", "", ""]);
    /// ```
    pub fn from_dotted_string(ip: &str) -> Self {
        let mut cells: [String; CELL_COUNT] = Default::default();
        for (cell, part) in cells.iter_mut().zip(ip.split('.')) {
            *cell = part.to_string();
        }
        Self(cells)
    }

    /// Join the cells with `.`.
    pub fn to_dotted_string(&self) -> String {
        self.0.join(".")
    }

    pub fn cells(&self) -> &[String; CELL_COUNT] {
        &self.0
    }

    /// Cell at `index`, or `None` past the fourth cell.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Run `raw` through [`apply_input`] and store the result in cell `index`.
    ///
    /// Returns whether focus should advance, or `None` for an out-of-range cell.
    pub fn apply(&mut self, index: usize, raw: &str) -> Option<bool> {
        let cell = self.0.get_mut(index)?;
        let (value, advance) = apply_input(raw);
        *cell = value;
        Some(advance)
    }

    /// True when every cell holds a value.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|cell| !cell.is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for OctetArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted_string())
    }
}

impl From<&str> for OctetArray {
    fn from(ip: &str) -> Self {
        Self::from_dotted_string(ip)
    }
}

/// Normalize raw cell input and decide whether focus should advance.
///
/// Non-digits are stripped, values above 255 clamp to `"255"`, and leading
/// zeros are kept as typed up to the three-character cell width. Focus advances when the raw input contained a `.`
/// or the cell is full.
///
/// ```rust
/// use iplocate::apply_input;
///
/// assert_eq!(apply_input("abc123xyz999"), ("255".to_string(), true));
/// assert_eq!(apply_input("4."), ("4".to_string(), true));
/// assert_eq!(apply_input("25"), ("25".to_string(), false));
/// ```
pub fn apply_input(raw: &str) -> (String, bool) {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    let value = if digits.is_empty() {
        String::new()
    } else if exceeds_octet(&digits) {
        MAX_OCTET.to_string()
    } else {
        // At most 255, so every digit before the last three is a zero.
        digits[digits.len().saturating_sub(MAX_CELL_LEN)..].to_string()
    };

    let advance = raw.contains('.') || value.len() >= MAX_CELL_LEN;
    (value, advance)
}

fn exceeds_octet(digits: &str) -> bool {
    let significant = digits.trim_start_matches('0');
    significant.len() > MAX_CELL_LEN || significant.parse::<u32>().is_ok_and(|n| n > MAX_OCTET)
}

/// A key press relevant to cell navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Dot,
    Enter,
    Backspace,
    Other,
}

impl Key {
    /// Map a DOM-style key name (`"."`, `"Enter"`, `"Backspace"`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "." => Key::Dot,
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            _ => Key::Other,
        }
    }
}

/// What the surrounding UI should do with focus after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Focus the given cell and select its contents.
    Advance(usize),
    /// Focus the given cell without selecting.
    Retreat(usize),
    None,
}

/// Decide navigation for a key press in cell `index` holding `current`.
///
/// ```rust
/// use iplocate::{handle_key, Key, NavigationIntent};
///
/// assert_eq!(handle_key(1, Key::Backspace, ""), NavigationIntent::Retreat(0));
/// assert_eq!(handle_key(0, Key::Backspace, ""), NavigationIntent::None);
/// ```
pub fn handle_key(index: usize, key: Key, current: &str) -> NavigationIntent {
    match key {
        Key::Dot | Key::Enter if index < LAST_CELL => NavigationIntent::Advance(index + 1),
        Key::Backspace if current.is_empty() && index > 0 && index <= LAST_CELL => {
            NavigationIntent::Retreat(index - 1)
        }
        _ => NavigationIntent::None,
    }
}
