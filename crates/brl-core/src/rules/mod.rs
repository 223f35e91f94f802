//! Declarative rule data: chord sequences mapped to glyphs, contractions and
//! word-sign dictionaries, loaded from TOML.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::chord::Chord;

pub const DEFAULT_RULES_TOML: &str = include_str!("default_rules.toml");

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[codes] table is empty")]
    NoCodes,
    #[error("unknown code {token:?} in {entry:?}")]
    UnknownCode { entry: String, token: String },
    #[error("empty chord sequence in [{0}]")]
    EmptySequence(String),
    #[error("empty value for key: {0}")]
    EmptyValue(String),
    #[error("expected one character per case for key: {0}")]
    BadCasePair(String),
    #[error("unknown control action {action:?} for key: {key}")]
    UnknownAction { key: String, action: String },
}

/// Raw rule document. Sequence keys stay as written until
/// [`Rules::sequence`] resolves them against `codes`.
#[derive(Debug, Clone, Deserialize)]
pub struct Rules {
    pub codes: BTreeMap<String, i16>,
    #[serde(default)]
    pub whitespace: BTreeMap<String, String>,
    #[serde(default)]
    pub control: BTreeMap<String, String>,
    #[serde(default)]
    pub alphabet: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub phonetics: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub greek: GreekRules,
    #[serde(default)]
    pub greek_overloads: BTreeMap<String, String>,
    pub final_sigma: Option<FinalSigmaRule>,
    #[serde(default)]
    pub digits: BTreeMap<String, String>,
    #[serde(default)]
    pub characters: BTreeMap<String, String>,
    #[serde(default)]
    pub standalones: BTreeMap<String, String>,
    #[serde(default)]
    pub modifiers: BTreeMap<String, String>,
    pub ligature_marker: Option<LigatureMarkerRule>,
    #[serde(default)]
    pub ligatures: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub groupsigns: BTreeMap<String, String>,
    #[serde(default)]
    pub wordsigns: BTreeMap<String, String>,
    #[serde(default)]
    pub dictionaries: BTreeMap<String, DictionaryRule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GreekRules {
    /// Prefixes under which every Greek letter is inserted a second time.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub letters: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinalSigmaRule {
    pub medial: String,
    #[serde(rename = "final")]
    pub final_form: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LigatureMarkerRule {
    pub keys: String,
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryRule {
    /// When true, capitalized triggers reuse the lower-case words.
    #[serde(default = "default_true")]
    pub upper_from_lower: bool,
    /// Trigger text (a letter or contraction as typed) to expansion.
    pub signs: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

/// Control actions a `[control]` entry may name.
pub const CONTROL_ACTIONS: &[&str] = &["backspace"];

impl Rules {
    /// Resolve a space-separated sequence key into chords.
    pub fn sequence(&self, key: &str) -> Result<Vec<Chord>, RulesError> {
        key.split_whitespace()
            .map(|token| self.code(key, token))
            .collect()
    }

    fn code(&self, entry: &str, token: &str) -> Result<Chord, RulesError> {
        if let Some(value) = self.codes.get(token) {
            return Ok(Chord::new(*value));
        }
        token
            .parse::<i16>()
            .map(Chord::new)
            .map_err(|_| RulesError::UnknownCode {
                entry: entry.to_string(),
                token: token.to_string(),
            })
    }

    /// Sections whose keys are chord sequences and whose values are plain text.
    pub(crate) fn text_sections(&self) -> [(&'static str, &BTreeMap<String, String>); 9] {
        [
            ("whitespace", &self.whitespace),
            ("control", &self.control),
            ("greek_overloads", &self.greek_overloads),
            ("digits", &self.digits),
            ("characters", &self.characters),
            ("standalones", &self.standalones),
            ("modifiers", &self.modifiers),
            ("groupsigns", &self.groupsigns),
            ("wordsigns", &self.wordsigns),
        ]
    }

    /// Sections whose values are `[lower, upper]` glyph pairs.
    pub(crate) fn case_pair_sections(&self) -> [(&'static str, &BTreeMap<String, Vec<String>>); 3] {
        [
            ("alphabet", &self.alphabet),
            ("phonetics", &self.phonetics),
            ("greek.letters", &self.greek.letters),
        ]
    }
}

/// Split a `[lower, upper]` entry into single characters. Ligature entries
/// may omit the upper form.
pub(crate) fn case_chars(
    key: &str,
    values: &[String],
    require_upper: bool,
) -> Result<(char, Option<char>), RulesError> {
    let single = |s: &String| {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(RulesError::BadCasePair(key.to_string())),
        }
    };
    match values {
        [lower] if !require_upper => Ok((single(lower)?, None)),
        [lower, upper] => Ok((single(lower)?, Some(single(upper)?))),
        _ => Err(RulesError::BadCasePair(key.to_string())),
    }
}

/// Parse and validate a rule document.
pub fn parse_rules_toml(toml_str: &str) -> Result<Rules, RulesError> {
    let rules: Rules = toml::from_str(toml_str).map_err(|e| RulesError::Parse(e.to_string()))?;

    if rules.codes.is_empty() {
        return Err(RulesError::NoCodes);
    }

    for (section, map) in rules.text_sections() {
        for (key, value) in map {
            check_sequence(&rules, section, key)?;
            if value.is_empty() {
                return Err(RulesError::EmptyValue(key.clone()));
            }
        }
    }
    for (key, action) in &rules.control {
        if !CONTROL_ACTIONS.contains(&action.as_str()) {
            return Err(RulesError::UnknownAction {
                key: key.clone(),
                action: action.clone(),
            });
        }
    }
    for (section, map) in rules.case_pair_sections() {
        for (key, values) in map {
            check_sequence(&rules, section, key)?;
            case_chars(key, values, true)?;
        }
    }
    for (key, values) in &rules.ligatures {
        check_sequence(&rules, "ligatures", key)?;
        case_chars(key, values, false)?;
    }
    for alias in &rules.greek.aliases {
        check_sequence(&rules, "greek.aliases", alias)?;
    }
    if let Some(marker) = &rules.ligature_marker {
        check_sequence(&rules, "ligature_marker", &marker.keys)?;
        if marker.left.is_empty() || marker.right.is_empty() {
            return Err(RulesError::EmptyValue(marker.keys.clone()));
        }
    }
    for (name, dict) in &rules.dictionaries {
        for (trigger, word) in &dict.signs {
            if trigger.is_empty() || word.is_empty() {
                return Err(RulesError::EmptyValue(format!("dictionaries.{name}.{trigger}")));
            }
        }
    }

    Ok(rules)
}

fn check_sequence(rules: &Rules, section: &str, key: &str) -> Result<(), RulesError> {
    if rules.sequence(key)?.is_empty() {
        return Err(RulesError::EmptySequence(section.to_string()));
    }
    Ok(())
}
