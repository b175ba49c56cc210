//! Markup repair engine: reads malformed HTML or XML, rebuilds a well-formed
//! tree, reports everything it changed and prints the result.
//!
//! The usual entry point is [`Document`]:
//!
//! ```
//! let mut doc = html::Document::from_text("<p>unclosed");
//! let status = doc.run();
//! assert_eq!(status, 1);
//! assert!(doc.output().unwrap().contains("<p>unclosed</p>"));
//! ```

pub mod access;
pub mod attrs;
pub mod clean;
pub mod config;
pub mod document;
pub mod dom;
pub mod entities;
pub mod error;
#[cfg(any(test, feature = "test-harness"))]
pub mod outline;
pub mod printer;
pub mod report;
pub mod stream;
pub mod tags;
pub mod tree_builder;
pub mod version;

mod lexer;

pub use crate::access::AccessRule;
pub use crate::config::{OptionId, Options};
pub use crate::document::Document;
pub use crate::dom::{Dom, NodeId, NodeKind};
pub use crate::entities::EntityOptions;
pub use crate::error::{ConfigError, FatalError};
pub use crate::lexer::LexerConfig;
pub use crate::printer::{PrintOptions, print};
pub use crate::report::{Diagnostic, MessageCode, Report, Severity};
pub use crate::tags::{TagId, TagTable, UserTagKind};

#[cfg(feature = "internal-api")]
pub mod internal {
    pub use super::lexer::{LexMode, Lexer, Token};
}

/// Repair `input` with a copy of `options`.
pub fn repair_str(input: &str, options: &Options) -> Document {
    let mut doc = Document::from_text(input);
    *doc.options_mut() = options.clone();
    doc.run();
    doc
}
