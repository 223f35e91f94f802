//! Eight-dot chorded braille input engine.
//!
//! Re-exports the rule and table layer (`brl_core`) and the per-stream
//! decoder (`brl_session`). Hosts create one [`Decoder`] per editing
//! session; every decoder shares one symbol table.

mod trace_init;

use std::sync::{Arc, OnceLock};

pub use brl_core::chord::{Chord, Pin};
pub use brl_core::output::{apply, KeyStroke, Output, OutputAction};
pub use brl_core::settings::{settings, Settings};
pub use brl_core::table::{BuildError, SymbolTable};
pub use brl_core::{chord, output, rules, table};
pub use brl_session::{
    ControlKey, Decoder, DecoderError, Emission, EmissionClass, History, HistoryEntry, KeyEvent,
    KeyResponse, LockState, Locks, Qualifier,
};
pub use trace_init::init_tracing;

/// The global symbol table behind an `Arc`, for handing to decoders.
pub fn shared_table() -> Arc<SymbolTable> {
    static SHARED: OnceLock<Arc<SymbolTable>> = OnceLock::new();
    Arc::clone(SHARED.get_or_init(|| Arc::new(SymbolTable::global().clone())))
}

/// Decoder over the shared table, using the configured dictionary.
pub fn new_decoder() -> Decoder {
    Decoder::new(shared_table())
}
