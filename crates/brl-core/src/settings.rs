//! Global settings loaded from TOML, following the same OnceLock pattern as
//! the symbol table.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::chord::Pin;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub decoder: DecoderSettings,
    #[serde(default)]
    keyboard: BTreeMap<String, u8>,
    /// Parsed keyboard: host key → pin.
    #[serde(skip)]
    keyboard_parsed: Vec<(char, Pin)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecoderSettings {
    pub dictionary: String,
}

impl Settings {
    /// Pin bound to a host key, if any. Letters match either case.
    pub fn pin_for_key(&self, key: char) -> Option<Pin> {
        let key = key.to_ascii_lowercase();
        self.keyboard_parsed
            .iter()
            .find_map(|(k, pin)| (*k == key).then_some(*pin))
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let mut s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    s.keyboard_parsed = parse_keyboard(&s.keyboard)?;
    Ok(s)
}

fn parse_keyboard(raw: &BTreeMap<String, u8>) -> Result<Vec<(char, Pin)>, SettingsError> {
    let mut result: Vec<(char, Pin)> = Vec::new();
    for (key_str, dot) in raw {
        let field = format!("keyboard.{}", key_str);
        let mut chars = key_str.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_lowercase(),
            _ => {
                return Err(SettingsError::InvalidValue {
                    field,
                    reason: "key must be a single character".to_string(),
                })
            }
        };
        let pin = Pin::from_number(*dot).ok_or_else(|| SettingsError::InvalidValue {
            field: field.clone(),
            reason: "dot must be between 1 and 8".to_string(),
        })?;
        if result.iter().any(|(_, p)| *p == pin) {
            return Err(SettingsError::InvalidValue {
                field,
                reason: format!("dot {} is already bound", dot),
            });
        }
        result.push((key, pin));
    }
    Ok(result)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    if s.decoder.dictionary.trim().is_empty() {
        return Err(SettingsError::InvalidValue {
            field: "decoder.dictionary".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
