use std::collections::BTreeMap;

use crate::chord::Chord;
use crate::output::Output;

/// A definition stored at a trie node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// May stand next to a word and acts as a word boundary for word-sign
    /// purposes (whitespace, most punctuation).
    pub standalone: bool,
    /// Typed alone between word boundaries, this symbol stands for a whole
    /// word from the active dictionary.
    pub word_sign: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Letter(Letter),
    Expansion(Expansion),
    Character(Output),
    Whitespace(Output),
    /// Pass-through editing key (backspace).
    Control(Output),
    Modifier(Modifier),
    LigatureMarker(LigatureMarker),
}

impl Symbol {
    pub fn letter(letter: Letter, word_sign: bool) -> Self {
        Self {
            kind: SymbolKind::Letter(letter),
            standalone: false,
            word_sign,
        }
    }

    pub fn expansion(expansion: Expansion, word_sign: bool) -> Self {
        Self {
            kind: SymbolKind::Expansion(expansion),
            standalone: false,
            word_sign,
        }
    }

    pub fn character(output: Output, standalone: bool, word_sign: bool) -> Self {
        Self {
            kind: SymbolKind::Character(output),
            standalone,
            word_sign,
        }
    }

    pub fn whitespace(output: Output) -> Self {
        Self {
            kind: SymbolKind::Whitespace(output),
            standalone: true,
            word_sign: false,
        }
    }

    pub fn control(output: Output) -> Self {
        Self {
            kind: SymbolKind::Control(output),
            standalone: false,
            word_sign: false,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, SymbolKind::Whitespace(_))
    }

    /// Short description for logs and build errors.
    pub fn describe(&self) -> String {
        match &self.kind {
            SymbolKind::Letter(l) => format!("letter {}", l.lower),
            SymbolKind::Expansion(e) => format!("expansion {:?}", e.text),
            SymbolKind::Character(o) => format!("character {:?}", o.inserted_chars().collect::<String>()),
            SymbolKind::Whitespace(o) => format!("whitespace {:?}", o.inserted_chars().collect::<String>()),
            SymbolKind::Control(_) => "control".to_string(),
            SymbolKind::Modifier(m) => format!("modifier U+{:04X}", m.mark as u32),
            SymbolKind::LigatureMarker(_) => "ligature marker".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CasePair {
    pub lower: Option<char>,
    pub upper: Option<char>,
}

impl CasePair {
    pub fn get(&self, upper: bool) -> Option<char> {
        if upper {
            self.upper
        } else {
            self.lower
        }
    }
}

/// A case-pair letter. Latin letters also carry the ligatures they start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letter {
    pub lower: char,
    pub upper: char,
    pub ligatures: BTreeMap<Chord, LigatureNode>,
}

impl Letter {
    pub fn new(lower: char, upper: char) -> Self {
        Self {
            lower,
            upper,
            ligatures: BTreeMap::new(),
        }
    }

    pub fn glyph(&self, upper: bool) -> char {
        if upper {
            self.upper
        } else {
            self.lower
        }
    }

    /// Follow a chain of letter chords after this one through the
    /// ligature tree.
    pub fn ligature(&self, chain: &[Chord]) -> Option<&LigatureNode> {
        let (first, rest) = chain.split_first()?;
        let mut node = self.ligatures.get(first)?;
        for chord in rest {
            node = node.next.get(chord)?;
        }
        Some(node)
    }
}

/// A fused glyph for the letters along its path, and the longer ligatures
/// that extend it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LigatureNode {
    pub glyph: Option<CasePair>,
    pub next: BTreeMap<Chord, LigatureNode>,
}

/// A multi-character contraction rendered in one of three case forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    pub lower: Output,
    pub upper: Output,
    /// First letter capitalized, the rest lower case.
    pub upper_with_lower: Output,
    /// Present when the chord is also a Greek letter.
    pub greek: Option<GreekAlternates>,
}

impl Expansion {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            lower: Output::text(text),
            upper: Output::text(&text.to_uppercase()),
            upper_with_lower: Output::text(&capitalize(text)),
            greek: None,
        }
    }
}

/// Output that replaces an overloaded contraction with its Greek letter:
/// backspaces over the contraction, then the glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreekAlternates {
    pub lower: Output,
    pub upper: Output,
}

impl GreekAlternates {
    pub fn get(&self, upper: bool) -> &Output {
        if upper {
            &self.upper
        } else {
            &self.lower
        }
    }
}

/// A combining diacritic applied to the next letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub mark: char,
    /// Precomposed forms keyed by base letter chord.
    pub composed: BTreeMap<Chord, CasePair>,
}

/// Joins the next letter to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LigatureMarker {
    pub left: char,
    pub right: char,
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
