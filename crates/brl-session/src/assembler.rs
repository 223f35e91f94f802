use brl_core::chord::{Chord, Pin};

/// Collects pins pressed in one group. The chord completes when the last
/// held pin is released and is the union of every pin pressed since the
/// group started, so press and release order do not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ChordAssembler {
    held: u8,
    accumulated: u8,
}

impl ChordAssembler {
    pub fn press(&mut self, pin: Pin) {
        self.held |= pin.bit();
        self.accumulated |= pin.bit();
    }

    /// Returns the completed chord on release of the last held pin.
    pub fn release(&mut self, pin: Pin) -> Option<Chord> {
        if self.held & pin.bit() == 0 {
            // release without a matching press
            return None;
        }
        self.held &= !pin.bit();
        if self.held != 0 {
            return None;
        }
        Some(Chord::from(std::mem::take(&mut self.accumulated)))
    }

    pub fn is_idle(&self) -> bool {
        self.held == 0
    }
}
