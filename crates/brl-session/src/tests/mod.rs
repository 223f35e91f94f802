mod resolver;

use std::sync::Arc;

use brl_core::chord::Chord;
use brl_core::output::apply;
use brl_core::rules::parse_rules_toml;
use brl_core::table::{build_symbol_table, SymbolTable};

use super::{ControlKey, Decoder, KeyEvent, KeyResponse};

pub(super) fn make_test_table() -> Arc<SymbolTable> {
    Arc::new(SymbolTable::global().clone())
}

pub(super) fn make_decoder(dictionary: &str) -> Decoder {
    Decoder::with_dictionary(make_test_table(), dictionary).unwrap()
}

/// Decoder over a table built from `toml` instead of the embedded rules.
pub(super) fn make_custom_decoder(toml: &str) -> Decoder {
    let table = build_symbol_table(&parse_rules_toml(toml).unwrap()).unwrap();
    Decoder::new(Arc::new(table))
}

/// Press every pin of `chord`, then release them in the same order.
/// Returns the response to the final release.
pub(super) fn chord(decoder: &mut Decoder, value: i16) -> KeyResponse {
    let pins = Chord::new(value).pins();
    for pin in &pins {
        let resp = decoder.handle_key(KeyEvent::PinDown(*pin));
        assert!(resp.is_empty());
    }
    let mut resp = KeyResponse::default();
    for pin in &pins {
        resp = decoder.handle_key(KeyEvent::PinUp(*pin));
    }
    resp
}

pub(super) fn control(decoder: &mut Decoder, key: ControlKey) -> KeyResponse {
    decoder.handle_key(KeyEvent::Control(key))
}

pub(super) fn letter_chord(ch: char) -> i16 {
    match ch {
        'a' => 1,
        'b' => 3,
        'c' => 9,
        'd' => 25,
        'e' => 17,
        'f' => 11,
        'g' => 27,
        'h' => 19,
        'i' => 10,
        'j' => 26,
        'k' => 5,
        'l' => 7,
        'm' => 13,
        'n' => 29,
        'o' => 21,
        'p' => 15,
        'q' => 31,
        'r' => 23,
        's' => 14,
        't' => 30,
        'u' => 37,
        'v' => 39,
        'w' => 58,
        'x' => 45,
        'y' => 61,
        'z' => 53,
        other => panic!("no letter chord for {other:?}"),
    }
}

// Helper: type letters and spaces, applying every response to a buffer
pub(super) fn type_string(decoder: &mut Decoder, s: &str) -> String {
    let mut buffer = String::new();
    for ch in s.chars() {
        let resp = match ch {
            ' ' => control(decoder, ControlKey::Space),
            '\n' => control(decoder, ControlKey::Enter),
            c => chord(decoder, letter_chord(c)),
        };
        apply(&mut buffer, &resp.actions);
    }
    buffer
}

// Helper: feed raw chord values, applying every response to a buffer
pub(super) fn type_chords(decoder: &mut Decoder, chords: &[i16]) -> String {
    let mut buffer = String::new();
    for value in chords {
        let resp = match Chord::new(*value) {
            Chord::SPACE => control(decoder, ControlKey::Space),
            c => chord(decoder, c.value()),
        };
        apply(&mut buffer, &resp.actions);
    }
    buffer
}
