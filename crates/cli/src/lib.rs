//! Lendcore CLI library - command implementations and input parsing

pub mod commands;
pub mod mantissa;

pub use mantissa::Mantissa;
