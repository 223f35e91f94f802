use std::collections::{BTreeMap, HashMap};

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::chord::{format_sequence, Chord};
use crate::output::Output;
use crate::rules::{case_chars, Rules, RulesError};

use super::symbol::{
    CasePair, Expansion, GreekAlternates, Letter, LigatureMarker, LigatureNode, Modifier, Symbol,
    SymbolKind,
};
use super::wordsign::WordSignDictionary;
use super::{FinalSigma, Node, SymbolTable};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error("conflicting definitions at {path}: {existing} vs {incoming}")]
    Duplicate {
        path: String,
        existing: String,
        incoming: String,
    },
    #[error("ligature {0} does not start with a letter")]
    LigatureWithoutLetter(String),
    #[error("greek overload {0} has no greek letter at the same path")]
    OverloadWithoutGreek(String),
    #[error("unknown trigger {trigger:?} in dictionary {dictionary}")]
    UnknownTrigger { dictionary: String, trigger: String },
    #[error("symbol table already initialized")]
    AlreadyInitialized,
}

/// Build the symbol table from rule data. Pure and deterministic: the same
/// rules always yield an equal table.
pub fn build_symbol_table(rules: &Rules) -> Result<SymbolTable, BuildError> {
    let mut b = Builder::default();

    for (key, text) in &rules.whitespace {
        b.insert(&rules.sequence(key)?, Symbol::whitespace(Output::text(text)))?;
    }
    for key in rules.control.keys() {
        // "backspace" is the only control action
        b.insert(&rules.sequence(key)?, Symbol::control(Output::backspaces(1)))?;
    }

    for (key, pair) in &rules.alphabet {
        let path = rules.sequence(key)?;
        let (lower, upper) = case_pair(key, pair)?;
        b.insert(&path, Symbol::letter(Letter::new(lower, upper), true))?;
        if let [chord] = path[..] {
            b.letters.push((chord, lower, upper));
        }
    }
    for (key, pair) in &rules.phonetics {
        let (lower, upper) = case_pair(key, pair)?;
        b.insert(&rules.sequence(key)?, Symbol::letter(Letter::new(lower, upper), false))?;
    }

    b.insert_greek(rules)?;

    for (key, text) in rules.digits.iter().chain(&rules.characters) {
        b.insert(&rules.sequence(key)?, Symbol::character(Output::text(text), false, false))?;
    }
    for (key, text) in &rules.standalones {
        b.insert(&rules.sequence(key)?, Symbol::character(Output::text(text), true, false))?;
    }

    for (key, mark) in &rules.modifiers {
        let mark = single_char(key, mark)?;
        let composed = b.compose_all(mark);
        b.insert(
            &rules.sequence(key)?,
            Symbol {
                kind: SymbolKind::Modifier(Modifier { mark, composed }),
                standalone: false,
                word_sign: false,
            },
        )?;
    }
    if let Some(marker) = &rules.ligature_marker {
        let symbol = Symbol {
            kind: SymbolKind::LigatureMarker(LigatureMarker {
                left: single_char(&marker.keys, &marker.left)?,
                right: single_char(&marker.keys, &marker.right)?,
            }),
            standalone: false,
            word_sign: false,
        };
        b.insert(&rules.sequence(&marker.keys)?, symbol)?;
    }
    for (key, glyphs) in &rules.ligatures {
        let (lower, upper) = case_chars(key, glyphs, false)?;
        b.insert_ligature(key, &rules.sequence(key)?, CasePair { lower: Some(lower), upper })?;
    }

    for (key, text) in &rules.groupsigns {
        b.insert(&rules.sequence(key)?, Symbol::expansion(Expansion::new(text), false))?;
    }
    for (key, text) in &rules.wordsigns {
        let path = rules.sequence(key)?;
        let symbol = if text.chars().count() == 1 {
            Symbol::character(Output::text(text), true, true)
        } else {
            Symbol::expansion(Expansion::new(text), true)
        };
        b.insert(&path, symbol)?;
        if let [chord] = path[..] {
            b.triggers.insert(text.clone(), (chord, false));
            let upper = text.to_uppercase();
            if upper != *text {
                b.triggers.insert(upper, (chord, true));
            }
        }
    }

    let final_sigma = match &rules.final_sigma {
        Some(rule) => Some(FinalSigma {
            medial: single_char("final_sigma", &rule.medial)?,
            final_form: single_char("final_sigma", &rule.final_form)?,
        }),
        None => None,
    };

    let mut dictionaries = BTreeMap::new();
    for (name, rule) in &rules.dictionaries {
        let mut dict = WordSignDictionary::new(name, rule.upper_from_lower);
        for (trigger, word) in &rule.signs {
            let unknown = || BuildError::UnknownTrigger {
                dictionary: name.clone(),
                trigger: trigger.clone(),
            };
            let &(chord, upper) = b.triggers.get(trigger).ok_or_else(unknown)?;
            if rule.upper_from_lower {
                if upper {
                    return Err(unknown());
                }
                dict.insert_folded(chord, trigger, word);
            } else {
                dict.insert_cased(chord, trigger, word, upper);
            }
        }
        debug!(dictionary = %name, entries = dict.len(), "word-sign dictionary built");
        dictionaries.insert(name.clone(), dict);
    }

    debug!(symbols = b.count, "symbol table built");
    Ok(SymbolTable {
        root: b.root,
        dictionaries,
        final_sigma,
    })
}

#[derive(Default)]
struct Builder {
    root: Node,
    count: usize,
    /// Single-chord Latin letters, for diacritic composition.
    letters: Vec<(Chord, char, char)>,
    /// Trigger text as typed to (chord, typed with shift).
    triggers: HashMap<String, (Chord, bool)>,
}

impl Builder {
    fn insert(&mut self, path: &[Chord], symbol: Symbol) -> Result<(), BuildError> {
        let node = path
            .iter()
            .fold(&mut self.root, |node, chord| node.children.entry(*chord).or_default());
        if let Some(existing) = &node.symbol {
            return Err(BuildError::Duplicate {
                path: format_sequence(path),
                existing: existing.describe(),
                incoming: symbol.describe(),
            });
        }
        if let SymbolKind::Letter(l) = &symbol.kind {
            if let [chord] = path {
                self.triggers.insert(l.lower.to_string(), (*chord, false));
                self.triggers.insert(l.upper.to_string(), (*chord, true));
            }
        }
        node.symbol = Some(symbol);
        self.count += 1;
        Ok(())
    }

    fn insert_greek(&mut self, rules: &Rules) -> Result<(), BuildError> {
        let mut overloads = BTreeMap::new();
        for (key, text) in &rules.greek_overloads {
            overloads.insert(rules.sequence(key)?, (key, text));
        }
        let aliases = rules
            .greek
            .aliases
            .iter()
            .map(|a| rules.sequence(a))
            .collect::<Result<Vec<_>, _>>()?;

        for (key, pair) in &rules.greek.letters {
            let path = rules.sequence(key)?;
            let (lower, upper) = case_pair(key, pair)?;
            let symbol = match overloads.remove(&path) {
                Some((_, text)) => {
                    let retract = Output::backspaces(text.chars().count());
                    let mut expansion = Expansion::new(text);
                    expansion.greek = Some(GreekAlternates {
                        lower: retract.clone().then(&Output::char(lower)),
                        upper: retract.then(&Output::char(upper)),
                    });
                    Symbol::expansion(expansion, true)
                }
                None => Symbol::letter(Letter::new(lower, upper), false),
            };
            self.insert(&path, symbol)?;
            for alias in &aliases {
                let aliased: Vec<Chord> = alias.iter().chain(&path).copied().collect();
                self.insert(&aliased, Symbol::letter(Letter::new(lower, upper), false))?;
            }
        }

        if let Some((key, _)) = overloads.into_values().next() {
            return Err(BuildError::OverloadWithoutGreek(key.clone()));
        }
        Ok(())
    }

    fn insert_ligature(
        &mut self,
        key: &str,
        path: &[Chord],
        glyph: CasePair,
    ) -> Result<(), BuildError> {
        let missing = || BuildError::LigatureWithoutLetter(key.to_string());
        let (first, rest) = path.split_first().ok_or_else(missing)?;
        if rest.is_empty() {
            return Err(missing());
        }
        let letter = match self.root.children.get_mut(first).and_then(|n| n.symbol.as_mut()) {
            Some(Symbol {
                kind: SymbolKind::Letter(letter),
                ..
            }) => letter,
            _ => return Err(missing()),
        };
        let (head, tail) = rest.split_first().ok_or_else(missing)?;
        let node = tail.iter().fold(
            letter.ligatures.entry(*head).or_insert_with(LigatureNode::default),
            |node, chord| node.next.entry(*chord).or_default(),
        );
        if node.glyph.is_some() {
            return Err(BuildError::Duplicate {
                path: format_sequence(path),
                existing: "ligature".to_string(),
                incoming: key.to_string(),
            });
        }
        node.glyph = Some(glyph);
        Ok(())
    }

    /// Precomposed forms of every single-chord letter with `mark`.
    fn compose_all(&self, mark: char) -> BTreeMap<Chord, CasePair> {
        self.letters
            .iter()
            .filter_map(|&(chord, lower, upper)| {
                let pair = CasePair {
                    lower: compose(lower, mark),
                    upper: compose(upper, mark),
                };
                (pair.lower.is_some() || pair.upper.is_some()).then_some((chord, pair))
            })
            .collect()
    }
}

/// Canonical composition of `base` + combining `mark`, when Unicode has a
/// single code point for it.
fn compose(base: char, mark: char) -> Option<char> {
    let mut composed = [base, mark].into_iter().nfc();
    match (composed.next(), composed.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn case_pair(key: &str, pair: &[String]) -> Result<(char, char), BuildError> {
    match case_chars(key, pair, true)? {
        (lower, Some(upper)) => Ok((lower, upper)),
        (_, None) => Err(RulesError::BadCasePair(key.to_string()).into()),
    }
}

fn single_char(key: &str, value: &str) -> Result<char, BuildError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(RulesError::BadCasePair(key.to_string()).into()),
    }
}
