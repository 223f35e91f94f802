//! Pins and chords of an eight-dot Perkins keyboard.
//!
//! A chord is the bitwise union of the pins held in one press group. Values
//! outside `0..=255` are reserved for pass-through control keys that never
//! come from pin combinations.

use std::fmt;

/// One of the eight physical switches. Dots 1-3 and 7 sit under the left
/// hand, dots 4-6 and 8 under the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pin {
    Dot1,
    Dot2,
    Dot3,
    Dot4,
    Dot5,
    Dot6,
    Dot7,
    Dot8,
}

impl Pin {
    pub const ALL: [Pin; 8] = [
        Pin::Dot1,
        Pin::Dot2,
        Pin::Dot3,
        Pin::Dot4,
        Pin::Dot5,
        Pin::Dot6,
        Pin::Dot7,
        Pin::Dot8,
    ];

    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Dot number as printed on the keyboard (1-based).
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Pin> {
        Pin::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    pub fn from_bit(bit: u8) -> Option<Pin> {
        if bit.count_ones() != 1 {
            return None;
        }
        Pin::from_number(bit.trailing_zeros() as u8 + 1)
    }
}

/// Numeric chord value ("pin code").
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Chord(i16);

impl Chord {
    /// Dots 5-6: grade 1 indicator, also the final-letter groupsign prefix.
    pub const GRADE1: Chord = Chord(48);
    /// Dot 6: capital indicator.
    pub const SHIFT: Chord = Chord(32);
    /// Dots 4-6: Greek / secondary shift indicator.
    pub const SECONDARY_SHIFT: Chord = Chord(40);
    /// Dots 3-4-5-6: numeric indicator.
    pub const DIGIT: Chord = Chord(60);
    /// Dot 4 alone. Starts bracket and typeform sequences, so a qualifier
    /// following it is part of the symbol.
    pub const BRACKET_PREFIX: Chord = Chord(8);
    /// Dot 8 doubles as the enter key.
    pub const ENTER: Chord = Chord(128);

    pub const SPACE: Chord = Chord(-32);
    pub const TAB: Chord = Chord(-9);
    pub const BACKSPACE: Chord = Chord(-8);

    pub const fn new(value: i16) -> Chord {
        Chord(value)
    }

    pub fn from_pins<I: IntoIterator<Item = Pin>>(pins: I) -> Chord {
        Chord(pins.into_iter().fold(0u8, |acc, p| acc | p.bit()).into())
    }

    pub fn value(self) -> i16 {
        self.0
    }

    /// True for chords produced by pins rather than control keys.
    pub fn is_pin_chord(self) -> bool {
        (0..=255).contains(&self.0)
    }

    pub fn contains(self, pin: Pin) -> bool {
        self.is_pin_chord() && (self.0 as u8) & pin.bit() != 0
    }

    pub fn pins(self) -> Vec<Pin> {
        Pin::ALL.into_iter().filter(|p| self.contains(*p)).collect()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for Chord {
    fn from(bits: u8) -> Self {
        Chord(bits.into())
    }
}

impl fmt::Debug for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_pin_chord() {
            return write!(f, "{}", self.0);
        }
        if self.0 == 0 {
            return f.write_str("-");
        }
        for pin in self.pins() {
            write!(f, "{}", pin.number())?;
        }
        Ok(())
    }
}

/// Render a chord sequence as `[1, 40, 25]` for logs and error messages.
pub fn format_sequence(chords: &[Chord]) -> String {
    format!("{chords:?}")
}
