//! XML tokenizing, tree building and debug output.
//!
//! The tree builder consumes a [`TokenSource`], the low-level event stream
//! interface. [`XmlTokenizer`] implements it over quick-xml.

mod builder;
mod loader;
mod printer;
mod tokenizer;

pub use builder::TreeBuilder;
pub use loader::{
    load_file, load_reader, load_str, try_load_file, try_load_reader, try_load_str, Loader,
};
pub use printer::{print_to_string, ElementPrinter, ElementPrinterOptions};
pub use tokenizer::{TokenizerConfig, XmlTokenizer};

use crate::error::Result;

/// A markup event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Start of an element, including self-closing elements.
    Start(String),
    /// End of an element.
    End(String),
    /// Character data.
    Text(String),
    /// No more input.
    Eof,
}

/// Interface to a stream of markup events.
///
/// The attribute accessors and [`is_self_closing`](Self::is_self_closing)
/// describe the most recent [`Token::Start`] and are only meaningful right
/// after one was returned.
pub trait TokenSource {
    /// Reads the next event.
    fn advance(&mut self) -> Result<Token>;

    /// Returns true if the last start tag had no body (`<tag/>`).
    fn is_self_closing(&self) -> bool;

    /// Returns the number of attributes on the last start tag.
    fn attribute_count(&self) -> usize;

    /// Returns the name of the attribute at `index`.
    fn attribute_name(&self, index: usize) -> Option<&str>;

    /// Returns the value of the attribute at `index`.
    fn attribute_value(&self, index: usize) -> Option<&str>;

    /// Consumes everything up to and including the end tag matching the last
    /// start tag. Nested elements with the same name must be balanced.
    fn skip_current_subtree(&mut self) -> Result<()>;
}
