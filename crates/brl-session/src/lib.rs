//! Per-stream chorded input decoder.
//!
//! `Decoder` owns the pin accumulator, the lock states, the pending chord
//! sequence and the two-entry history, and turns each key event into the
//! output actions a host text surface should apply.

mod assembler;
mod history;
mod key_handlers;
mod locks;
mod resolver;
mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::debug;

use brl_core::chord::Chord;
use brl_core::settings::settings;
use brl_core::table::SymbolTable;

pub use history::{Emission, EmissionClass, History, HistoryEntry};
pub use locks::{LockState, Locks, Qualifier};
pub use types::{ControlKey, DecoderError, KeyEvent, KeyResponse};

use assembler::ChordAssembler;

pub struct Decoder {
    table: Arc<SymbolTable>,
    /// Active word-sign dictionary name.
    dictionary: String,

    assembler: ChordAssembler,
    locks: Locks,
    /// Chords accumulated since the last emission, qualifiers included.
    sequence: Vec<Chord>,
    history: History,
}

impl Decoder {
    /// Decoder using the dictionary named in the global settings.
    pub fn new(table: Arc<SymbolTable>) -> Self {
        let dictionary = settings().decoder.dictionary.clone();
        if table.dictionary(&dictionary).is_none() {
            debug!(%dictionary, "configured dictionary not in table");
        }
        Self {
            table,
            dictionary,
            assembler: ChordAssembler::default(),
            locks: Locks::default(),
            sequence: Vec::new(),
            history: History::default(),
        }
    }

    pub fn with_dictionary(table: Arc<SymbolTable>, name: &str) -> Result<Self, DecoderError> {
        let mut decoder = Self::new(table);
        decoder.set_dictionary(name)?;
        Ok(decoder)
    }

    pub fn set_dictionary(&mut self, name: &str) -> Result<(), DecoderError> {
        if self.table.dictionary(name).is_none() {
            return Err(DecoderError::UnknownDictionary(name.to_string()));
        }
        self.dictionary = name.to_string();
        Ok(())
    }

    pub fn dictionary(&self) -> &str {
        &self.dictionary
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn locks(&self) -> &Locks {
        &self.locks
    }

    /// Chords waiting for more input.
    pub fn pending(&self) -> &[Chord] {
        &self.sequence
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// True while some pin is held.
    pub fn is_chording(&self) -> bool {
        !self.assembler.is_idle()
    }

    /// Drop all input state, as after the host moves focus. The table and
    /// dictionary stay.
    pub fn reset(&mut self) {
        self.assembler = ChordAssembler::default();
        self.locks = Locks::default();
        self.sequence.clear();
        self.history = History::default();
    }
}
