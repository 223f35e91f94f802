use brl_core::chord::{Chord, Pin};
use brl_core::output::OutputAction;
use brl_core::settings::Settings;

/// Keys recognized by identity rather than by pin combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Enter,
    Space,
    Backspace,
    Tab,
}

impl ControlKey {
    pub fn chord(self) -> Chord {
        match self {
            ControlKey::Enter => Chord::ENTER,
            ControlKey::Space => Chord::SPACE,
            ControlKey::Backspace => Chord::BACKSPACE,
            ControlKey::Tab => Chord::TAB,
        }
    }

    /// Backspace and Tab skip chord resolution and are emitted as they are.
    pub fn is_pass_through(self) -> bool {
        matches!(self, ControlKey::Backspace | ControlKey::Tab)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    PinDown(Pin),
    PinUp(Pin),
    /// Control keys resolve as themselves on press.
    Control(ControlKey),
}

impl KeyEvent {
    /// Translate a host key transition through the keyboard settings.
    /// Control key releases carry no meaning and map to `None`.
    pub fn from_host_key(key: char, down: bool, settings: &Settings) -> Option<KeyEvent> {
        let control = match key {
            ' ' => Some(ControlKey::Space),
            '\n' | '\r' => Some(ControlKey::Enter),
            '\t' => Some(ControlKey::Tab),
            '\u{8}' => Some(ControlKey::Backspace),
            _ => None,
        };
        if let Some(c) = control {
            return down.then_some(KeyEvent::Control(c));
        }
        let pin = settings.pin_for_key(key)?;
        Some(if down {
            KeyEvent::PinDown(pin)
        } else {
            KeyEvent::PinUp(pin)
        })
    }
}

/// Response from handle_key, returned to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyResponse {
    /// Edits to apply, in order.
    pub actions: Vec<OutputAction>,
    /// The chord this event completed, if any.
    pub chord: Option<Chord>,
}

impl KeyResponse {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn with_chord(mut self, chord: Chord) -> Self {
        self.chord = Some(chord);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Inserted characters, ignoring backspaces.
    pub fn inserted(&self) -> String {
        self.actions
            .iter()
            .filter_map(|a| match a {
                OutputAction::Insert(k) => Some(k.ch),
                OutputAction::Backspace => None,
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("unknown word-sign dictionary: {0}")]
    UnknownDictionary(String),
}
