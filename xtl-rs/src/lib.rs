//! Template-driven XML loading.
//!
//! This library loads a restricted subset of XML into an in-memory tree that
//! only contains what the caller asked for. The caller describes the
//! interesting part of a document with templates: per element, which
//! attributes to keep (and how to convert them), which child elements to
//! descend into, and whether text content matters.
//!
//! # Overview
//!
//! - [`ElementSchema`] is the per-element template. [`DeclaredSchema`] covers
//!   closed sets of attributes and children; [`GenericSchema`] accepts
//!   everything.
//! - [`TreeBuilder`] walks a [`TokenSource`] and builds [`Element`]s,
//!   dropping undeclared attributes and pruning undeclared subtrees whole.
//! - [`load_file`] and friends open a document and return the last element
//!   matching the root template, or `None`.
//!
//! # Example
//!
//! ```
//! use xml_template::{load_str, AttributeKind, DeclaredSchema, Value};
//!
//! let template = DeclaredSchema::new("items")
//!     .child(DeclaredSchema::new("item").attribute("id", AttributeKind::Int))
//!     .into_template();
//!
//! let items = load_str(r#"<items><item id="1"/><item id="2"/></items>"#, &template).unwrap();
//! let ids: Vec<_> = items.children().iter().map(|c| c.attribute("id").cloned()).collect();
//! assert_eq!(ids, vec![Some(Value::Int(1)), Some(Value::Int(2))]);
//! ```
//!
//! Markup is assumed to be well formed. Document type declarations,
//! namespaces and validation are out of scope.

pub mod convert;
pub mod error;
pub mod node;
pub mod xml;

// Re-export commonly used types
pub use convert::{AttributeKind, CustomConverter, Value};
pub use error::{Error, Result};
pub use node::{DeclaredSchema, Element, ElementFactory, ElementSchema, GenericSchema, Template};
pub use xml::{
    load_file, load_reader, load_str, print_to_string, try_load_file, try_load_reader,
    try_load_str, ElementPrinter, ElementPrinterOptions, Loader, Token, TokenSource,
    TokenizerConfig, TreeBuilder, XmlTokenizer,
};
