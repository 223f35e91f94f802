use brl_core::chord::Chord;

use super::*;
use crate::EmissionClass;

const SHIFT: i16 = 32;
const SECONDARY: i16 = 40;
const DIGIT: i16 = 60;
const GRADE1: i16 = 48;
const SPACE: i16 = -32;
const ACUTE: [i16; 2] = [24, 12];
const JOIN: [i16; 2] = [24, 22];

// --- Word signs ---

#[test]
fn test_word_sign_expands_at_space() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_string(&mut decoder, "w "), "will ");
    let rewritten = decoder.history().older();
    assert_eq!(rewritten.emission.class, EmissionClass::Text);
    assert!(!rewritten.emission.word_sign);
    assert_eq!(rewritten.output.net_len(), 4);
}

#[test]
fn test_contraction_word_sign() {
    let mut decoder = make_decoder("default");
    // th
    assert_eq!(type_chords(&mut decoder, &[57, SPACE]), "this ");
}

#[test]
fn test_letter_without_word_stays() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_string(&mut decoder, "a i "), "a i ");
}

#[test]
fn test_word_sign_needs_word_start() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_string(&mut decoder, "aw "), "aw ");
}

#[test]
fn test_consecutive_word_signs() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_string(&mut decoder, "w x c "), "will it can ");
}

#[test]
fn test_word_sign_retyped_when_first_letter_differs() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_string(&mut decoder, "x "), "it ");

    let mut decoder = make_decoder("default");
    chord(&mut decoder, SHIFT);
    assert_eq!(type_string(&mut decoder, "x "), "It ");
}

#[test]
fn test_capital_word_sign() {
    let mut decoder = make_decoder("default");
    chord(&mut decoder, SHIFT);
    assert_eq!(type_chords(&mut decoder, &[57, SPACE]), "This ");

    let mut decoder = make_decoder("default");
    chord(&mut decoder, SHIFT);
    chord(&mut decoder, SHIFT);
    assert_eq!(type_string(&mut decoder, "w "), "WILL ");
}

#[test]
fn test_punctuation_word_signs() {
    let mut decoder = make_decoder("default");
    // be, his
    assert_eq!(type_chords(&mut decoder, &[6, SPACE, 38, SPACE]), "be his ");
}

#[test]
fn test_punctuation_ends_word() {
    let mut decoder = make_decoder("default");
    // comma
    assert_eq!(type_chords(&mut decoder, &[58, 2]), "will,");
}

#[test]
fn test_groupsign_is_not_word_sign() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_chords(&mut decoder, &[46, SPACE]), "the ");
    chord(&mut decoder, SHIFT);
    assert_eq!(type_chords(&mut decoder, &[46]), "The");
}

#[test]
fn test_case_sensitive_dictionary() {
    let mut decoder = make_decoder("java");
    assert_eq!(type_string(&mut decoder, "a "), "new ");
    chord(&mut decoder, SHIFT);
    assert_eq!(type_string(&mut decoder, "a "), "ArrayList ");
    // in
    assert_eq!(type_chords(&mut decoder, &[20, SPACE]), "int ");
    chord(&mut decoder, SHIFT);
    assert_eq!(type_chords(&mut decoder, &[20, SPACE]), "Integer ");
}

#[test]
fn test_domain_dictionary() {
    let mut decoder = make_decoder("astronomy");
    // ch
    assert_eq!(type_chords(&mut decoder, &[33, SPACE]), "nebula ");
    assert_eq!(type_string(&mut decoder, "a "), "asteroid ");
}

#[test]
fn test_case_sensitive_domain_dictionary() {
    let mut decoder = make_decoder("genealogy");
    assert_eq!(type_string(&mut decoder, "b d "), "born died ");
    chord(&mut decoder, SHIFT);
    assert_eq!(type_string(&mut decoder, "b "), "Birth ");
    chord(&mut decoder, SHIFT);
    assert_eq!(type_string(&mut decoder, "w "), "Will ");
    assert_eq!(type_string(&mut decoder, "u e "), "buried e ");
}

#[test]
fn test_switching_dictionary_mid_stream() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_string(&mut decoder, "c "), "can ");
    decoder.set_dictionary("astronomy").unwrap();
    assert_eq!(type_string(&mut decoder, "c "), "carbon ");
}

// --- Grade 1 ---

#[test]
fn test_grade1_inside_word_reaches_final_groupsign() {
    let mut decoder = make_decoder("default");
    let mut buffer = type_string(&mut decoder, "na");
    chord(&mut decoder, GRADE1);
    buffer.push_str(&type_string(&mut decoder, "n"));
    assert_eq!(buffer, "nation");
}

#[test]
fn test_grade1_without_grade1_form_spells_letter() {
    let mut decoder = make_decoder("default");
    let mut buffer = type_string(&mut decoder, "a");
    chord(&mut decoder, GRADE1);
    buffer.push_str(&type_string(&mut decoder, "b"));
    assert_eq!(buffer, "ab");
    assert!(decoder.history().last().grade1);
}

// --- Diacritics ---

#[test]
fn test_modifier_composes_letter() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_chords(&mut decoder, &ACUTE), "");
    assert_eq!(decoder.pending(), &[Chord::new(24), Chord::new(12)]);
    assert_eq!(type_chords(&mut decoder, &[17]), "é");
    assert!(decoder.pending().is_empty());
    assert!(!decoder.history().last().emission.word_sign);
}

#[test]
fn test_modifier_with_shift() {
    let mut decoder = make_decoder("default");
    chord(&mut decoder, SHIFT);
    assert_eq!(type_chords(&mut decoder, &[24, 12, 17]), "É");
}

#[test]
fn test_modifier_without_composed_form_appends_mark() {
    let mut decoder = make_decoder("default");
    // q has no precomposed acute
    assert_eq!(type_chords(&mut decoder, &[24, 12, 31]), "q\u{0301}");
}

#[test]
fn test_modified_letter_is_not_word_sign() {
    let mut decoder = make_decoder("default");
    // c with cedilla, then space
    assert_eq!(type_chords(&mut decoder, &[24, 47, 9, SPACE]), "ç ");
}

// --- Ligatures ---

#[test]
fn test_ligature_fuses_with_previous_letter() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_chords(&mut decoder, &[11, JOIN[0], JOIN[1], 10]), "ﬁ");
    assert_eq!(decoder.history().last().ligature_chain, vec![Chord::new(11), Chord::new(10)]);
}

#[test]
fn test_ligature_chains() {
    let mut decoder = make_decoder("default");
    let chords = [11, JOIN[0], JOIN[1], 11, JOIN[0], JOIN[1], 10];
    assert_eq!(type_chords(&mut decoder, &chords), "ﬃ");
}

#[test]
fn test_ligature_without_glyph_uses_markers() {
    let mut decoder = make_decoder("default");
    assert_eq!(
        type_chords(&mut decoder, &[1, JOIN[0], JOIN[1], 3]),
        "a\u{FE20}b\u{FE21}"
    );
}

#[test]
fn test_ligature_glyph_missing_for_case_uses_markers() {
    let mut decoder = make_decoder("default");
    let mut buffer = type_chords(&mut decoder, &[11, JOIN[0], JOIN[1]]);
    chord(&mut decoder, SHIFT);
    buffer.push_str(&type_chords(&mut decoder, &[10]));
    assert_eq!(buffer, "f\u{FE20}I\u{FE21}");
}

#[test]
fn test_ligature_marker_without_previous_letter_keeps_word_sign() {
    let mut decoder = make_decoder("default");
    let chords = [SPACE, JOIN[0], JOIN[1], 58, SPACE];
    assert_eq!(type_chords(&mut decoder, &chords), " will ");

    let mut decoder = make_decoder("default");
    assert_eq!(type_chords(&mut decoder, &[JOIN[0], JOIN[1], 45, SPACE]), "it ");
}

#[test]
fn test_ligature_after_non_letter_is_plain() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_chords(&mut decoder, &[2, JOIN[0], JOIN[1], 10]), ",i");
}

// --- Greek ---

#[test]
fn test_greek_overload_spells_contraction_inside_word() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_chords(&mut decoder, &[14, SECONDARY, 25, SPACE]), "sound ");
}

#[test]
fn test_greek_overload_alone_is_greek_letter() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_chords(&mut decoder, &[SECONDARY, 25, SPACE]), "δ ");

    let mut decoder = make_decoder("default");
    chord(&mut decoder, SHIFT);
    assert_eq!(type_chords(&mut decoder, &[SECONDARY, 25, SPACE]), "Δ ");
}

#[test]
fn test_greek_word_mode() {
    let mut decoder = make_decoder("default");
    chord(&mut decoder, SECONDARY);
    chord(&mut decoder, SECONDARY);
    assert_eq!(decoder.pending(), &[Chord::SECONDARY_SHIFT, Chord::SECONDARY_SHIFT]);
    assert_eq!(type_string(&mut decoder, "ab"), "αβ");
    assert_eq!(type_string(&mut decoder, " a"), " a");
}

#[test]
fn test_final_sigma() {
    let mut decoder = make_decoder("default");
    chord(&mut decoder, SECONDARY);
    chord(&mut decoder, SECONDARY);
    assert_eq!(type_string(&mut decoder, "as "), "ας ");
}

#[test]
fn test_greek_in_numeric_mode() {
    let mut decoder = make_decoder("default");
    chord(&mut decoder, DIGIT);
    chord(&mut decoder, DIGIT);
    chord(&mut decoder, SECONDARY);
    assert_eq!(decoder.pending(), &[Chord::DIGIT, Chord::SECONDARY_SHIFT]);
    assert_eq!(type_string(&mut decoder, "p"), "π");
}

// --- Characters ---

#[test]
fn test_prefixed_characters() {
    let mut decoder = make_decoder("default");
    // dot 4 s, dots 4-5 c, dot 5 group open
    assert_eq!(type_chords(&mut decoder, &[8, 14, 24, 9, 16, 35]), "$©(");
}

// --- Unresolvable input ---

#[test]
fn test_unknown_chord_is_dropped() {
    let mut decoder = make_decoder("default");
    let resp = chord(&mut decoder, 64);
    assert!(resp.is_empty());
    assert_eq!(resp.chord, Some(Chord::new(64)));
    assert!(decoder.pending().is_empty());
}

#[test]
fn test_failed_prefix_retries_last_chord() {
    let mut decoder = make_decoder("default");
    assert_eq!(type_chords(&mut decoder, &[16, 1]), "a");
    assert!(decoder.pending().is_empty());
}

#[test]
fn test_unknown_chord_keeps_digit_qualifier() {
    let mut decoder = make_decoder("default");
    for _ in 0..3 {
        chord(&mut decoder, DIGIT);
    }
    assert!(chord(&mut decoder, 64).is_empty());
    assert_eq!(decoder.pending(), &[Chord::DIGIT]);
    assert_eq!(type_string(&mut decoder, "b"), "2");
}

// --- Continuation ---

const PRIME_RULES: &str = r#"
[codes]
a = 1
prime = 54
space = -32

[whitespace]
space = " "

[alphabet]
a = ["a", "A"]

[characters]
prime = "′"
"prime prime" = "″"
"prime 4 4" = "‴"
"#;

#[test]
fn test_continuation_terminal_is_replaced() {
    let mut decoder = make_custom_decoder(PRIME_RULES);
    assert_eq!(type_chords(&mut decoder, &[54]), "′");
    assert!(decoder.history().last().provisional);
    assert_eq!(decoder.pending(), &[Chord::new(54)]);

    let resp = chord(&mut decoder, 54);
    assert_eq!(resp.actions.len(), 2);
    let mut buffer = String::from("′");
    apply(&mut buffer, &resp.actions);
    assert_eq!(buffer, "″");
    assert!(!decoder.history().last().provisional);
    assert!(decoder.pending().is_empty());
}

#[test]
fn test_continuation_restarts_with_last_chord() {
    let mut decoder = make_custom_decoder(PRIME_RULES);
    assert_eq!(type_chords(&mut decoder, &[54, 1]), "′a");
    assert!(decoder.pending().is_empty());
}

#[test]
fn test_overflow_without_terminal_terminates() {
    let mut decoder = make_custom_decoder(PRIME_RULES);
    assert_eq!(type_chords(&mut decoder, &[54, 4]), "′");
    assert_eq!(decoder.pending(), &[Chord::new(54), Chord::new(4)]);
    assert_eq!(type_chords(&mut decoder, &[1]), "a");
    assert!(decoder.pending().is_empty());
}

#[test]
fn test_overflow_with_unknown_chord_drops_it() {
    let mut decoder = make_custom_decoder(PRIME_RULES);
    assert_eq!(type_chords(&mut decoder, &[54, 2]), "′");
    assert!(decoder.pending().is_empty());
    assert_eq!(type_chords(&mut decoder, &[54, 54]), "″");
}
