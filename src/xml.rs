//! XML parser module

pub mod cursor;
pub mod parser;

pub use cursor::Cursor;
pub use parser::{Config, Parser};
