use toml::{Table, Value};

const SETTINGS: &str = "src/default_settings.toml";
const RULES: &str = "src/rules/default_rules.toml";

fn main() {
    println!("cargo:rerun-if-changed={SETTINGS}");
    println!("cargo:rerun-if-changed={RULES}");

    let settings = parse(SETTINGS, include_str!("src/default_settings.toml"));
    let rules = parse(RULES, include_str!("src/rules/default_rules.toml"));

    check_codes(&rules);
    check_keyboard(&settings);
    check_dictionaries(&settings, &rules);
}

fn parse(path: &str, content: &str) -> Table {
    match content.parse::<Table>() {
        Ok(table) => table,
        Err(e) => panic!("{path} contains invalid TOML: {e}"),
    }
}

fn section<'a>(path: &str, table: &'a Table, key: &str) -> &'a Table {
    match table.get(key) {
        Some(Value::Table(t)) => t,
        _ => panic!("{path} is missing the [{key}] table"),
    }
}

/// Pin codes fit in one eight-dot cell; control keys are negative.
fn check_codes(rules: &Table) {
    let codes = section(RULES, rules, "codes");
    if codes.is_empty() {
        panic!("{RULES}: [codes] is empty");
    }
    for (name, value) in codes {
        match value.as_integer() {
            Some(1..=255 | -255..=-1) => {}
            _ => panic!("{RULES}: code {name} = {value} is not a chord value"),
        }
    }
}

/// Host keys map onto distinct dots 1-8.
fn check_keyboard(settings: &Table) {
    let keyboard = section(SETTINGS, settings, "keyboard");
    let mut seen = [false; 8];
    for (key, value) in keyboard {
        let dot = match value.as_integer() {
            Some(d @ 1..=8) => d as usize,
            _ => panic!("{SETTINGS}: key {key:?} maps to {value}, expected a dot 1-8"),
        };
        if std::mem::replace(&mut seen[dot - 1], true) {
            panic!("{SETTINGS}: dot {dot} is bound to more than one key");
        }
    }
}

/// The startup dictionary exists and every dictionary carries signs.
fn check_dictionaries(settings: &Table, rules: &Table) {
    let dictionaries = section(RULES, rules, "dictionaries");
    for (name, dict) in dictionaries {
        match dict.get("signs") {
            Some(Value::Table(signs)) if !signs.is_empty() => {}
            _ => panic!("{RULES}: dictionary {name} has no signs"),
        }
    }
    let decoder = section(SETTINGS, settings, "decoder");
    if let Some(name) = decoder.get("dictionary").and_then(Value::as_str) {
        if !dictionaries.contains_key(name) {
            panic!("{SETTINGS}: startup dictionary {name} is not defined in {RULES}");
        }
    }
}
