use tracing::{debug, debug_span, trace};

use brl_core::chord::{format_sequence, Chord};
use brl_core::output::{Output, OutputAction};
use brl_core::table::{Symbol, SymbolKind};

use super::history::{Emission, EmissionClass, HistoryEntry};
use super::locks::{pop_qualifiers, Qualifier};
use super::resolver::{Resolution, Resolved, Resolver};
use super::types::{KeyEvent, KeyResponse};
use super::Decoder;

impl Decoder {
    /// Process a key event. Returns the output actions the host should
    /// apply, in order.
    pub fn handle_key(&mut self, event: KeyEvent) -> KeyResponse {
        let _span = debug_span!("handle_key", ?event).entered();

        match event {
            KeyEvent::PinDown(pin) => {
                self.assembler.press(pin);
                KeyResponse::empty()
            }
            KeyEvent::PinUp(pin) => match self.assembler.release(pin) {
                Some(chord) => self.on_chord(chord),
                None => KeyResponse::empty(),
            },
            KeyEvent::Control(key) if key.is_pass_through() => self.pass_through(key.chord()),
            KeyEvent::Control(key) => self.on_chord(key.chord()),
        }
    }

    fn on_chord(&mut self, chord: Chord) -> KeyResponse {
        debug!(%chord, "chord");
        let mut actions = Vec::new();
        self.process_chord(chord, false, &mut actions);
        KeyResponse {
            actions,
            chord: Some(chord),
        }
    }

    fn process_chord(&mut self, chord: Chord, retried: bool, actions: &mut Vec<OutputAction>) {
        // Dot 4 prefixes reuse qualifier values as punctuation.
        if let Some(q) = Qualifier::from_chord(chord) {
            if self.sequence.first() != Some(&Chord::BRACKET_PREFIX) {
                self.engage(q);
                return;
            }
        }

        if self.is_whitespace(chord) {
            pop_qualifiers(&mut self.sequence);
        }
        self.sequence.push(chord);

        let resolver = Resolver {
            table: &self.table,
            locks: &self.locks,
            history: &self.history,
            dictionary: self.table.dictionary(&self.dictionary),
        };
        match resolver.resolve(&mut self.sequence) {
            Resolution::Pending => {
                trace!(sequence = %format_sequence(&self.sequence), "pending");
            }
            Resolution::Emit(resolved) => self.emit(resolved, actions),
            Resolution::NoMatch => {
                let original = self.sequence.len();
                self.sequence.clear();
                self.locks.char_reset();
                self.qualify();
                if !retried && self.sequence.len() + 1 != original {
                    debug!(%chord, "no match, retrying");
                    self.process_chord(chord, true, actions);
                } else {
                    debug!(%chord, "no match, dropped");
                }
            }
        }
    }

    fn emit(&mut self, r: Resolved, actions: &mut Vec<OutputAction>) {
        let retract = r.retract_previous && self.history.last().provisional;
        if retract {
            let n = self.history.last().output.net_len();
            actions.extend(Output::backspaces(n).into_actions());
        }
        if !r.preamble.is_empty() {
            actions.extend_from_slice(r.preamble.actions());
            self.history.amend_last(r.rewrite_previous, &r.preamble);
        }
        actions.extend_from_slice(r.output.actions());

        let whitespace = r.emission.class == EmissionClass::Whitespace;
        let entry = HistoryEntry {
            chords: self.sequence.clone(),
            emission: r.emission,
            output: r.output,
            shift: self.locks.shift.is_on(),
            grade1: self.locks.grade1.is_on(),
            ligature_chain: r.ligature_chain,
            provisional: r.continuation,
        };
        debug!(
            sequence = %format_sequence(&entry.chords),
            class = ?entry.emission.class,
            "emit"
        );
        if retract {
            self.history.replace_last(entry);
        } else {
            self.history.push(entry);
        }

        if !r.continuation {
            self.sequence.clear();
        }
        if whitespace {
            self.locks.word_reset();
        }
        if !r.continuation {
            self.locks.char_reset();
            self.qualify();
        }
    }

    /// Backspace and Tab go straight to the host and end the word.
    fn pass_through(&mut self, chord: Chord) -> KeyResponse {
        let Some((emission, output)) = self.table.get(&[chord]).and_then(plain_output) else {
            debug!(%chord, "unmapped control key");
            return KeyResponse::empty().with_chord(chord);
        };
        let entry = HistoryEntry {
            chords: vec![chord],
            emission,
            output: output.clone(),
            shift: self.locks.shift.is_on(),
            grade1: self.locks.grade1.is_on(),
            ligature_chain: Vec::new(),
            provisional: false,
        };
        self.history.push(entry);
        self.locks.word_reset();
        self.sequence.clear();
        self.qualify();
        KeyResponse {
            actions: output.into_actions(),
            chord: Some(chord),
        }
    }

    fn engage(&mut self, q: Qualifier) {
        let digit_was_on = self.locks.digit.is_on();
        self.locks.engage(q);
        debug!(qualifier = ?q, state = ?self.locks.state(q), "qualifier");
        if q.requalifies() || (q == Qualifier::Shift && digit_was_on) {
            pop_qualifiers(&mut self.sequence);
            self.qualify();
        }
    }

    fn qualify(&mut self) {
        let qualifiers = self.locks.qualifiers();
        self.sequence.extend(qualifiers);
    }

    fn is_whitespace(&self, chord: Chord) -> bool {
        self.table.get(&[chord]).is_some_and(Symbol::is_whitespace)
    }
}

fn plain_output(symbol: &Symbol) -> Option<(Emission, Output)> {
    match &symbol.kind {
        SymbolKind::Character(out) | SymbolKind::Whitespace(out) | SymbolKind::Control(out) => {
            Some((Emission::of(symbol), out.clone()))
        }
        _ => None,
    }
}
