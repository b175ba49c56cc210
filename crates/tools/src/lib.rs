//! Leaf utilities shared by the markup engine: byte buffers, text helpers and
//! character-encoding conversion.

pub mod buffer;
pub mod encoding;
pub mod text;
pub mod utf8;
