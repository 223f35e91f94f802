//! Chord sequence resolution against the symbol table.
//!
//! The resolver is a read-only view over decoder state. It may rewrite the
//! pending sequence (grade 1 prefix, continuation restart) but leaves every
//! other state change to the caller, which applies the returned
//! [`Resolved`] in one place.

use tracing::{debug, trace};

use brl_core::chord::{format_sequence, Chord};
use brl_core::output::{Output, OutputAction};
use brl_core::table::{
    Letter, LigatureMarker, Modifier, Symbol, SymbolKind, SymbolTable, Walk, WordSignDictionary,
};

use crate::history::{Emission, EmissionClass, History};
use crate::locks::{LockState, Locks};

#[derive(Debug)]
pub(crate) enum Resolution {
    /// The sequence leads nowhere in the table.
    NoMatch,
    /// More chords are needed.
    Pending,
    Emit(Resolved),
}

#[derive(Debug)]
pub(crate) struct Resolved {
    /// Output owed by the previous entry (final sigma, word-sign
    /// expansion), sent before `output`.
    pub preamble: Output,
    pub output: Output,
    pub emission: Emission,
    /// New meaning of the previous entry after a word-sign rewrite.
    pub rewrite_previous: Option<Emission>,
    /// A longer match replaced a provisional continuation terminal.
    pub retract_previous: bool,
    /// The symbol allows longer sequences; keep the sequence pending.
    pub continuation: bool,
    pub ligature_chain: Vec<Chord>,
}

impl Resolved {
    fn new(emission: Emission) -> Self {
        Self {
            preamble: Output::new(),
            output: Output::new(),
            emission,
            rewrite_previous: None,
            retract_previous: false,
            continuation: false,
            ligature_chain: Vec::new(),
        }
    }
}

/// Pending modifier and ligature marker seen on the way to a terminal.
#[derive(Default, Clone, Copy)]
struct Decorations<'a> {
    modifier: Option<&'a Modifier>,
    marker: Option<&'a LigatureMarker>,
}

pub(crate) struct Resolver<'a> {
    pub table: &'a SymbolTable,
    pub locks: &'a Locks,
    pub history: &'a History,
    pub dictionary: Option<&'a WordSignDictionary>,
}

impl Resolver<'_> {
    pub fn resolve(&self, sequence: &mut Vec<Chord>) -> Resolution {
        self.prefix_grade1(sequence);
        self.walk(sequence, false)
    }

    /// Route the lookup through the grade 1 prefix when the table has a
    /// form for it. Not at a word start, where grade 1 only blocks the
    /// word-sign rule.
    fn prefix_grade1(&self, sequence: &mut Vec<Chord>) {
        if !self.locks.grade1.is_on()
            || self.history.last().emission.standalone
            || sequence.first() == Some(&Chord::GRADE1)
        {
            return;
        }
        let mut prefixed = Vec::with_capacity(sequence.len() + 1);
        prefixed.push(Chord::GRADE1);
        prefixed.extend_from_slice(sequence);
        if matches!(self.table.root().walk(&prefixed), Walk::Missing) {
            return;
        }
        trace!(sequence = %format_sequence(&prefixed), "grade 1 prefix");
        *sequence = prefixed;
    }

    fn walk(&self, sequence: &mut Vec<Chord>, restarted: bool) -> Resolution {
        let root = self.table.root();
        let mut offset = 0;
        let mut deco = Decorations::default();
        loop {
            let (node, symbol, consumed) = match root.walk(&sequence[offset..]) {
                Walk::Missing => return Resolution::NoMatch,
                Walk::Prefix => return Resolution::Pending,
                Walk::Hit {
                    node,
                    symbol,
                    consumed,
                } => (node, symbol, consumed),
            };
            let end = offset + consumed;
            match &symbol.kind {
                SymbolKind::Modifier(m) => deco.modifier = Some(m),
                SymbolKind::LigatureMarker(l) => deco.marker = Some(l),
                _ if node.has_children() && end < sequence.len() => {
                    // Past a continuation terminal: the longer entry wins.
                    let Some(next) = node.descend(&sequence[end..]) else {
                        return self.restart(sequence, restarted);
                    };
                    let Some(longer) = next.symbol() else {
                        return Resolution::Pending;
                    };
                    let mut r = self.finish(longer, &sequence[offset..], deco);
                    r.retract_previous = true;
                    r.continuation = next.has_children();
                    return Resolution::Emit(r);
                }
                // Chords after a terminal that allows no continuation are
                // left for the next keystroke.
                _ => {
                    let mut r = self.finish(symbol, &sequence[offset..end], deco);
                    r.continuation = node.has_children();
                    return Resolution::Emit(r);
                }
            }
            offset = end;
            if offset == sequence.len() {
                return Resolution::Pending;
            }
        }
    }

    /// Start over from the qualifiers and the final chord, once.
    fn restart(&self, sequence: &mut Vec<Chord>, restarted: bool) -> Resolution {
        if restarted {
            return Resolution::NoMatch;
        }
        let Some(&last) = sequence.last() else {
            return Resolution::NoMatch;
        };
        sequence.clear();
        sequence.extend(self.locks.qualifiers());
        sequence.push(last);
        debug!(sequence = %format_sequence(sequence), "continuation restart");
        self.prefix_grade1(sequence);
        self.walk(sequence, true)
    }

    fn finish(&self, symbol: &Symbol, path: &[Chord], deco: Decorations<'_>) -> Resolved {
        let mut r = Resolved::new(Emission::of(symbol));
        match &symbol.kind {
            SymbolKind::Letter(letter) => self.letter(letter, path, deco, &mut r),
            SymbolKind::Expansion(e) => {
                r.output = match self.locks.shift {
                    LockState::Off => e.lower.clone(),
                    LockState::NextChar => e.upper_with_lower.clone(),
                    LockState::NextWord | LockState::Locked => e.upper.clone(),
                };
            }
            SymbolKind::Character(out) | SymbolKind::Whitespace(out) | SymbolKind::Control(out) => {
                r.output = out.clone();
            }
            // Only reachable as the longer entry behind a continuation.
            SymbolKind::Modifier(m) => r.output = Output::char(m.mark),
            SymbolKind::LigatureMarker(_) => {}
        }
        if symbol.standalone {
            self.standalone_rules(&mut r);
        }
        r
    }

    fn letter(&self, letter: &Letter, path: &[Chord], deco: Decorations<'_>, r: &mut Resolved) {
        let upper = self.locks.shift.is_on();
        let glyph = letter.glyph(upper);
        let single = match path {
            [chord] => Some(*chord),
            _ => None,
        };
        r.output = Output::char(glyph);
        r.ligature_chain = single.into_iter().collect();

        if let Some(modifier) = deco.modifier {
            let composed = single
                .and_then(|c| modifier.composed.get(&c))
                .and_then(|pair| pair.get(upper));
            r.output = match composed {
                Some(c) => Output::char(c),
                None => Output::char(glyph).then(&Output::char(modifier.mark)),
            };
            r.ligature_chain.clear();
            r.emission = Emission::letter();
        }

        let Some(marker) = deco.marker else {
            return;
        };
        let previous = self.history.last();
        if previous.emission.class != EmissionClass::Letter {
            return;
        }
        r.emission = Emission::letter();
        let fused = single
            .filter(|_| deco.modifier.is_none())
            .and_then(|chord| self.fuse(&previous.ligature_chain, chord, upper));
        match fused {
            Some((glyph, chain)) => {
                r.output = Output::backspaces(1).then(&Output::char(glyph));
                r.ligature_chain = chain;
            }
            None => {
                let mut wrapped = Output::char(marker.left);
                wrapped.extend(&r.output);
                wrapped.push(OutputAction::insert(marker.right));
                r.output = wrapped;
                r.ligature_chain.clear();
            }
        }
    }

    /// Glyph for `chain` extended by `chord`, if the root letter has one in
    /// the current case.
    fn fuse(&self, chain: &[Chord], chord: Chord, upper: bool) -> Option<(char, Vec<Chord>)> {
        let (root, rest) = chain.split_first()?;
        let mut path = rest.to_vec();
        path.push(chord);
        let glyph = self.table.letter(*root)?.ligature(&path)?.glyph?.get(upper)?;
        let mut extended = chain.to_vec();
        extended.push(chord);
        Some((glyph, extended))
    }

    fn standalone_rules(&self, r: &mut Resolved) {
        let last = self.history.last();

        if let Some(sigma) = self.table.final_sigma() {
            if last.output.last_char() == Some(sigma.medial) {
                trace!("final sigma");
                r.preamble.extend(&Output::backspaces(1).then(&Output::char(sigma.final_form)));
            }
        }

        if !self.history.older().emission.standalone
            || !last.emission.word_sign
            || last.grade1
            || self.locks.grade1.is_on()
        {
            return;
        }
        let Some(&trigger) = last.chords.first() else {
            return;
        };
        let expansion = if trigger == Chord::SECONDARY_SHIFT {
            last.emission.greek.as_ref().map(|greek| greek.get(last.shift))
        } else {
            self.dictionary
                .and_then(|dict| dict.expand(trigger, last.shift, self.locks.shift.is_on()))
        };
        if let Some(expansion) = expansion.filter(|e| !e.is_empty()) {
            debug!(?trigger, "word sign rewrite");
            r.preamble.extend(expansion);
            r.rewrite_previous = Some(Emission::text());
        }
    }
}
