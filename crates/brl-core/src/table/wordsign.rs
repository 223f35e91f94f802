use std::collections::BTreeMap;

use crate::chord::Chord;
use crate::output::Output;

/// Expansion for one triggering chord.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSign {
    pub lower: Option<Output>,
    pub upper: Option<Output>,
    /// Set when the word does not begin with the trigger text, so the
    /// trigger is backspaced and the whole word retyped.
    pub cross: Option<CrossCase>,
}

/// Retype forms for a trigger typed in a different case than the word
/// should render in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossCase {
    pub upper_with_lower: Output,
    pub lower_with_upper: Output,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSignDictionary {
    name: String,
    upper_from_lower: bool,
    entries: BTreeMap<Chord, WordSign>,
}

impl WordSignDictionary {
    pub(crate) fn new(name: &str, upper_from_lower: bool) -> Self {
        Self {
            name: name.to_string(),
            upper_from_lower,
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn upper_from_lower(&self) -> bool {
        self.upper_from_lower
    }

    pub fn get(&self, trigger: Chord) -> Option<&WordSign> {
        self.entries.get(&trigger)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick the output for `trigger`, given whether the trigger was typed
    /// with shift and whether shift is on now.
    pub fn expand(&self, trigger: Chord, trigger_upper: bool, upper_now: bool) -> Option<&Output> {
        let sign = self.entries.get(&trigger)?;
        if let Some(cross) = &sign.cross {
            return if trigger_upper == upper_now {
                pick(sign, upper_now)
            } else if upper_now {
                Some(&cross.lower_with_upper)
            } else {
                Some(&cross.upper_with_lower)
            };
        }
        if self.upper_from_lower {
            pick(sign, upper_now)
        } else {
            pick(sign, trigger_upper)
        }
    }

    /// Add a case-folding entry: one word serves both cases.
    pub(crate) fn insert_folded(&mut self, trigger: Chord, trigger_text: &str, word: &str) {
        let n = trigger_text.chars().count();
        let sign = match word.strip_prefix(trigger_text) {
            Some("") => return,
            Some(rest) => WordSign {
                lower: Some(Output::text(rest)),
                upper: Some(Output::text(&rest.to_uppercase())),
                cross: None,
            },
            None => {
                let head: String = word.chars().take(n).collect();
                let rest: String = word.chars().skip(n).collect();
                let retype = Output::backspaces(n);
                WordSign {
                    lower: Some(retype.clone().then(&Output::text(word))),
                    upper: Some(retype.clone().then(&Output::text(&word.to_uppercase()))),
                    cross: Some(CrossCase {
                        upper_with_lower: retype
                            .clone()
                            .then(&Output::text(&head.to_uppercase()))
                            .then(&Output::text(&rest)),
                        lower_with_upper: retype
                            .then(&Output::text(&head))
                            .then(&Output::text(&rest.to_uppercase())),
                    }),
                }
            }
        };
        self.entries.insert(trigger, sign);
    }

    /// Add one case of a case-sensitive entry.
    pub(crate) fn insert_cased(&mut self, trigger: Chord, trigger_text: &str, word: &str, upper: bool) {
        let output = match word.strip_prefix(trigger_text) {
            Some("") => return,
            Some(rest) => Output::text(rest),
            None => Output::backspaces(trigger_text.chars().count()).then(&Output::text(word)),
        };
        let sign = self.entries.entry(trigger).or_default();
        if upper {
            sign.upper = Some(output);
        } else {
            sign.lower = Some(output);
        }
    }
}

fn pick(sign: &WordSign, upper: bool) -> Option<&Output> {
    if upper {
        sign.upper.as_ref()
    } else {
        sign.lower.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::apply;

    fn render(before: &str, out: &Output) -> String {
        let mut buf = before.to_string();
        apply(&mut buf, out.actions());
        buf
    }

    const W: Chord = Chord::new(58);
    const X: Chord = Chord::new(45);

    #[test]
    fn folded_word_starting_with_trigger_appends_rest() {
        let mut dict = WordSignDictionary::new("t", true);
        dict.insert_folded(W, "w", "will");
        let sign = dict.get(W).unwrap();
        assert!(sign.cross.is_none());
        assert_eq!(render("w", dict.expand(W, false, false).unwrap()), "will");
        // capital trigger with shift released since: rest stays lower case
        assert_eq!(render("W", dict.expand(W, true, false).unwrap()), "Will");
        assert_eq!(render("W", dict.expand(W, true, true).unwrap()), "WILL");
    }

    #[test]
    fn folded_word_with_other_first_letter_retypes() {
        let mut dict = WordSignDictionary::new("t", true);
        dict.insert_folded(X, "x", "it");
        assert_eq!(render("x", dict.expand(X, false, false).unwrap()), "it");
        assert_eq!(render("X", dict.expand(X, true, false).unwrap()), "It");
        assert_eq!(render("x", dict.expand(X, false, true).unwrap()), "iT");
        assert_eq!(render("X", dict.expand(X, true, true).unwrap()), "IT");
    }

    #[test]
    fn identical_word_adds_nothing() {
        let mut dict = WordSignDictionary::new("t", true);
        dict.insert_folded(Chord::new(20), "in", "in");
        assert!(dict.is_empty());
    }

    #[test]
    fn cased_entries_follow_trigger_case() {
        let a = Chord::new(1);
        let mut dict = WordSignDictionary::new("java", false);
        dict.insert_cased(a, "a", "new", false);
        dict.insert_cased(a, "A", "ArrayList", true);
        assert_eq!(render("a", dict.expand(a, false, false).unwrap()), "new");
        assert_eq!(render("A", dict.expand(a, true, false).unwrap()), "ArrayList");
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn multi_letter_trigger_backspaces_each_letter() {
        let ch = Chord::new(33);
        let mut dict = WordSignDictionary::new("astronomy", true);
        dict.insert_folded(ch, "ch", "nebula");
        assert_eq!(render("ch", dict.expand(ch, false, false).unwrap()), "nebula");
        assert_eq!(render("CH", dict.expand(ch, true, false).unwrap()), "NEbula");
    }
}
