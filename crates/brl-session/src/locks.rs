use brl_core::chord::Chord;

/// Scope of a lock. Each qualifier entry moves one step along
/// Off → NextChar → NextWord → Locked → Off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    Off,
    NextChar,
    NextWord,
    Locked,
}

impl LockState {
    pub fn next(self) -> Self {
        match self {
            LockState::Off => LockState::NextChar,
            LockState::NextChar => LockState::NextWord,
            LockState::NextWord => LockState::Locked,
            LockState::Locked => LockState::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self != LockState::Off
    }

    fn char_reset(&mut self) {
        if *self == LockState::NextChar {
            *self = LockState::Off;
        }
    }

    fn word_reset(&mut self) {
        if matches!(self, LockState::NextChar | LockState::NextWord) {
            *self = LockState::Off;
        }
    }
}

/// Single-chord indicators that change how later chords read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Shift,
    SecondaryShift,
    Digit,
    Grade1,
}

impl Qualifier {
    pub fn from_chord(chord: Chord) -> Option<Qualifier> {
        match chord {
            Chord::SHIFT => Some(Qualifier::Shift),
            Chord::SECONDARY_SHIFT => Some(Qualifier::SecondaryShift),
            Chord::DIGIT => Some(Qualifier::Digit),
            Chord::GRADE1 => Some(Qualifier::Grade1),
            _ => None,
        }
    }

    pub fn chord(self) -> Chord {
        match self {
            Qualifier::Shift => Chord::SHIFT,
            Qualifier::SecondaryShift => Chord::SECONDARY_SHIFT,
            Qualifier::Digit => Chord::DIGIT,
            Qualifier::Grade1 => Chord::GRADE1,
        }
    }

    /// Secondary shift and digit are spelled out in the trie, so the
    /// pending sequence has to be re-qualified when they change.
    pub(crate) fn requalifies(self) -> bool {
        matches!(self, Qualifier::SecondaryShift | Qualifier::Digit)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locks {
    pub shift: LockState,
    pub secondary: LockState,
    pub digit: LockState,
    /// Off or NextChar only: grade 1 covers the next symbol.
    pub grade1: LockState,
}

impl Locks {
    pub fn state(&self, q: Qualifier) -> LockState {
        match q {
            Qualifier::Shift => self.shift,
            Qualifier::SecondaryShift => self.secondary,
            Qualifier::Digit => self.digit,
            Qualifier::Grade1 => self.grade1,
        }
    }

    /// Apply one entry of a qualifier chord. Shift and digit share the
    /// a-j range, so each clears the other.
    pub(crate) fn engage(&mut self, q: Qualifier) {
        match q {
            Qualifier::Shift => {
                self.shift = self.shift.next();
                self.digit = LockState::Off;
            }
            Qualifier::SecondaryShift => self.secondary = self.secondary.next(),
            Qualifier::Digit => {
                self.digit = self.digit.next();
                self.shift = LockState::Off;
            }
            Qualifier::Grade1 => {
                if self.grade1 == LockState::Off {
                    self.grade1 = LockState::NextChar;
                }
            }
        }
    }

    pub(crate) fn char_reset(&mut self) {
        self.grade1.char_reset();
        self.shift.char_reset();
        self.secondary.char_reset();
        self.digit.char_reset();
    }

    pub(crate) fn word_reset(&mut self) {
        self.grade1.word_reset();
        self.shift.word_reset();
        self.secondary.word_reset();
        self.digit.word_reset();
    }

    /// Chords that prefix the next sequence while secondary shift or digit
    /// is on. Greek letters outside numeric mode sit behind a doubled
    /// secondary shift unless the shift covers one character only.
    pub fn qualifiers(&self) -> Vec<Chord> {
        let mut q = Vec::new();
        if self.digit.is_on() {
            q.push(Chord::DIGIT);
        }
        if self.secondary.is_on() {
            q.push(Chord::SECONDARY_SHIFT);
            if self.secondary != LockState::NextChar && !self.digit.is_on() {
                q.push(Chord::SECONDARY_SHIFT);
            }
        }
        q
    }
}

/// Strip trailing qualifier chords added by [`Locks::qualifiers`].
pub(crate) fn pop_qualifiers(sequence: &mut Vec<Chord>) {
    while sequence.last() == Some(&Chord::SECONDARY_SHIFT) {
        sequence.pop();
    }
    if sequence.last() == Some(&Chord::DIGIT) {
        sequence.pop();
    }
}
