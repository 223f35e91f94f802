//! Immutable prefix trie from chord sequences to symbol definitions.
//!
//! Built once from [`Rules`](crate::rules::Rules) by [`build_symbol_table`]
//! and shared read-only between decoders.

mod builder;
mod symbol;
mod wordsign;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::chord::Chord;
use crate::rules::{parse_rules_toml, DEFAULT_RULES_TOML};

pub use builder::{build_symbol_table, BuildError};
pub use symbol::{
    CasePair, Expansion, GreekAlternates, Letter, LigatureMarker, LigatureNode, Modifier, Symbol,
    SymbolKind,
};
pub use wordsign::{CrossCase, WordSign, WordSignDictionary};

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

#[derive(Debug, PartialEq)]
pub enum TrieLookupResult<'a> {
    None,
    Prefix,
    Exact(&'a Symbol),
    ExactAndPrefix(&'a Symbol),
}

/// Result of walking from a node until the first definition.
#[derive(Debug)]
pub enum Walk<'a> {
    /// Some chord has no child.
    Missing,
    /// Every chord matched but no definition was reached.
    Prefix,
    Hit {
        node: &'a Node,
        symbol: &'a Symbol,
        consumed: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    symbol: Option<Symbol>,
    children: BTreeMap<Chord, Node>,
}

impl Node {
    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }

    pub fn child(&self, chord: Chord) -> Option<&Node> {
        self.children.get(&chord)
    }

    /// A terminal with children allows continuation.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Walk `chords` below this node, stopping at the first node that
    /// carries a definition even if chords remain.
    pub fn walk(&self, chords: &[Chord]) -> Walk<'_> {
        let mut node = self;
        for (i, chord) in chords.iter().enumerate() {
            node = match node.child(*chord) {
                Some(n) => n,
                None => return Walk::Missing,
            };
            if let Some(symbol) = &node.symbol {
                return Walk::Hit {
                    node,
                    symbol,
                    consumed: i + 1,
                };
            }
        }
        Walk::Prefix
    }

    /// Follow every chord, ignoring definitions on the way.
    pub fn descend(&self, chords: &[Chord]) -> Option<&Node> {
        chords.iter().try_fold(self, |node, chord| node.child(*chord))
    }

    fn collect<'a>(&'a self, path: &mut Vec<Chord>, out: &mut Vec<(Vec<Chord>, &'a Symbol)>) {
        if let Some(symbol) = &self.symbol {
            out.push((path.clone(), symbol));
        }
        for (chord, child) in &self.children {
            path.push(*chord);
            child.collect(path, out);
            path.pop();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalSigma {
    pub medial: char,
    pub final_form: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    root: Node,
    dictionaries: BTreeMap<String, WordSignDictionary>,
    final_sigma: Option<FinalSigma>,
}

impl SymbolTable {
    /// Set custom rule TOML before first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), BuildError> {
        // Validate eagerly, including duplicate definitions
        build_symbol_table(&parse_rules_toml(&toml_content)?)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| BuildError::AlreadyInitialized)
    }

    /// Get or initialize the global table.
    pub fn global() -> &'static SymbolTable {
        static INSTANCE: OnceLock<SymbolTable> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let toml_str = CUSTOM_TOML
                .get()
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_RULES_TOML);
            let rules = parse_rules_toml(toml_str).expect("rules TOML must be valid");
            build_symbol_table(&rules).expect("rules must not contain conflicting definitions")
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn lookup(&self, chords: &[Chord]) -> TrieLookupResult<'_> {
        let Some(node) = self.root.descend(chords) else {
            return TrieLookupResult::None;
        };
        match (&node.symbol, node.has_children()) {
            (None, false) => TrieLookupResult::None,
            (None, true) => TrieLookupResult::Prefix,
            (Some(s), false) => TrieLookupResult::Exact(s),
            (Some(s), true) => TrieLookupResult::ExactAndPrefix(s),
        }
    }

    /// Definition stored at exactly `chords`.
    pub fn get(&self, chords: &[Chord]) -> Option<&Symbol> {
        self.root.descend(chords)?.symbol()
    }

    /// Every definition with its full path, in chord order.
    pub fn entries(&self) -> Vec<(Vec<Chord>, &Symbol)> {
        let mut out = Vec::new();
        self.root.collect(&mut Vec::new(), &mut out);
        out
    }

    pub fn dictionary(&self, name: &str) -> Option<&WordSignDictionary> {
        self.dictionaries.get(name)
    }

    pub fn dictionary_names(&self) -> impl Iterator<Item = &str> {
        self.dictionaries.keys().map(|k| k.as_str())
    }

    pub fn final_sigma(&self) -> Option<FinalSigma> {
        self.final_sigma
    }

    /// Letter whose ligature tree starts at `chord`.
    pub fn letter(&self, chord: Chord) -> Option<&Letter> {
        match &self.root.child(chord)?.symbol()?.kind {
            SymbolKind::Letter(l) => Some(l),
            _ => None,
        }
    }
}
