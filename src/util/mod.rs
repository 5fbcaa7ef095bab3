//! Utility modules

pub mod text;

pub use text::{char_len, preview, slice_chars, splice};
