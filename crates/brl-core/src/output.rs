//! Output actions sent to the host text surface.

/// Shifted ASCII punctuation on a US layout that a host may need a shift
/// modifier to synthesize.
const SHIFTED_PUNCTUATION: &str = "@^<>:\"!{}()~$£&_";

/// A synthesized keystroke: the character to insert plus a logical key code
/// and case hint for hosts that replay it as a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub ch: char,
    /// Upper-case code point of `ch`. Control characters keep their own
    /// code (`\n` = 10, `\t` = 9), which matches common virtual key codes.
    pub code: u32,
    pub shift: bool,
}

impl KeyStroke {
    pub fn from_char(ch: char) -> Self {
        let mut upper = ch.to_uppercase();
        let code = match (upper.next(), upper.next()) {
            (Some(u), None) => u as u32,
            _ => ch as u32,
        };
        Self {
            ch,
            code,
            shift: ch.is_ascii_uppercase() || SHIFTED_PUNCTUATION.contains(ch),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputAction {
    Insert(KeyStroke),
    /// Delete the unit immediately before the caret.
    Backspace,
}

impl OutputAction {
    pub fn insert(ch: char) -> Self {
        OutputAction::Insert(KeyStroke::from_char(ch))
    }
}

/// An ordered run of output actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output(Vec<OutputAction>);

impl Output {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn text(text: &str) -> Self {
        Self(text.chars().map(OutputAction::insert).collect())
    }

    pub fn char(ch: char) -> Self {
        Self(vec![OutputAction::insert(ch)])
    }

    pub fn backspaces(count: usize) -> Self {
        Self(vec![OutputAction::Backspace; count])
    }

    pub fn push(&mut self, action: OutputAction) {
        self.0.push(action);
    }

    pub fn extend(&mut self, other: &Output) {
        self.0.extend_from_slice(&other.0);
    }

    pub fn then(mut self, other: &Output) -> Self {
        self.extend(other);
        self
    }

    pub fn actions(&self) -> &[OutputAction] {
        &self.0
    }

    pub fn into_actions(self) -> Vec<OutputAction> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn inserted_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().filter_map(|a| match a {
            OutputAction::Insert(k) => Some(k.ch),
            OutputAction::Backspace => None,
        })
    }

    pub fn first_char(&self) -> Option<char> {
        self.inserted_chars().next()
    }

    pub fn last_char(&self) -> Option<char> {
        self.inserted_chars().last()
    }

    /// Number of trailing units in the buffer that were inserted by this
    /// output. Used to retract a provisional emission.
    pub fn net_len(&self) -> usize {
        self.0.iter().fold(0usize, |n, a| match a {
            OutputAction::Insert(_) => n + 1,
            OutputAction::Backspace => n.saturating_sub(1),
        })
    }
}

impl From<Vec<OutputAction>> for Output {
    fn from(actions: Vec<OutputAction>) -> Self {
        Self(actions)
    }
}

/// Reference host edit model: inserts append, backspace removes the last
/// character.
pub fn apply(buffer: &mut String, actions: &[OutputAction]) {
    for action in actions {
        match action {
            OutputAction::Insert(k) => buffer.push(k.ch),
            OutputAction::Backspace => {
                buffer.pop();
            }
        }
    }
}
