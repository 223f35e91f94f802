use brl_core::chord::Chord;
use brl_core::output::Output;
use brl_core::table::{GreekAlternates, Symbol, SymbolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionClass {
    Letter,
    Text,
    Character,
    Whitespace,
    Control,
}

/// What a resolution stood for, as far as later context rules care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub class: EmissionClass,
    pub standalone: bool,
    pub word_sign: bool,
    /// Greek replacement for an overloaded contraction.
    pub greek: Option<GreekAlternates>,
}

impl Emission {
    pub(crate) fn of(symbol: &Symbol) -> Self {
        let (class, greek) = match &symbol.kind {
            SymbolKind::Letter(_) => (EmissionClass::Letter, None),
            SymbolKind::Expansion(e) => (EmissionClass::Text, e.greek.clone()),
            SymbolKind::Whitespace(_) => (EmissionClass::Whitespace, None),
            SymbolKind::Control(_) => (EmissionClass::Control, None),
            SymbolKind::Character(_)
            | SymbolKind::Modifier(_)
            | SymbolKind::LigatureMarker(_) => (EmissionClass::Character, None),
        };
        Self {
            class,
            standalone: symbol.standalone,
            word_sign: symbol.word_sign,
            greek,
        }
    }

    /// A word-sign expansion after it has been rewritten in place.
    pub(crate) fn text() -> Self {
        Self {
            class: EmissionClass::Text,
            standalone: false,
            word_sign: false,
            greek: None,
        }
    }

    pub(crate) fn letter() -> Self {
        Self {
            class: EmissionClass::Letter,
            standalone: false,
            word_sign: false,
            greek: None,
        }
    }

    fn enter() -> Self {
        Self {
            class: EmissionClass::Whitespace,
            standalone: true,
            word_sign: false,
            greek: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Sequence that produced this entry, qualifiers included.
    pub chords: Vec<Chord>,
    pub emission: Emission,
    /// Output sent for this entry, including any later rewrite.
    pub output: Output,
    pub shift: bool,
    pub grade1: bool,
    /// Letter chords fused so far, starting with the root letter. Empty
    /// when this entry cannot start or extend a ligature.
    pub ligature_chain: Vec<Chord>,
    /// Emitted at a continuation terminal; a longer match retracts it.
    pub provisional: bool,
}

impl HistoryEntry {
    fn seed() -> Self {
        Self {
            chords: vec![Chord::ENTER],
            emission: Emission::enter(),
            output: Output::text("\n"),
            shift: false,
            grade1: false,
            ligature_chain: Vec::new(),
            provisional: false,
        }
    }
}

/// The last two emissions, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    older: HistoryEntry,
    last: HistoryEntry,
}

impl Default for History {
    fn default() -> Self {
        Self {
            older: HistoryEntry::seed(),
            last: HistoryEntry::seed(),
        }
    }
}

impl History {
    pub fn older(&self) -> &HistoryEntry {
        &self.older
    }

    pub fn last(&self) -> &HistoryEntry {
        &self.last
    }

    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.older = std::mem::replace(&mut self.last, entry);
    }

    pub(crate) fn replace_last(&mut self, entry: HistoryEntry) {
        self.last = entry;
    }

    /// Attribute output sent after the fact to the last entry, optionally
    /// reinterpreting what it stood for.
    pub(crate) fn amend_last(&mut self, emission: Option<Emission>, appended: &Output) {
        self.last.output.extend(appended);
        if let Some(emission) = emission {
            self.last.emission = emission;
            self.last.ligature_chain.clear();
        }
    }
}
