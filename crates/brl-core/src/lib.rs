//! Rule data and symbol table for an eight-dot chorded braille decoder.

pub mod chord;
pub mod output;
pub mod rules;
pub mod settings;
pub mod table;
