//! CLI command implementations.

pub mod common;
pub mod font;
pub mod image;
pub mod inspect;
