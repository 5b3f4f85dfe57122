//! Declarative schemas with a closed set of attributes and children.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{ElementSchema, Template};
use crate::convert::{AttributeKind, Value};

/// A schema built from explicit declarations.
///
/// Only declared attributes and children are accepted; everything else is
/// dropped or pruned.
///
/// ```
/// use xml_template::{AttributeKind, DeclaredSchema, ElementSchema};
///
/// let items = DeclaredSchema::new("items")
///     .child(DeclaredSchema::new("item").attribute("id", AttributeKind::Int))
///     .into_template();
/// assert_eq!(items.tag(), "items");
/// ```
#[derive(Debug, Clone)]
pub struct DeclaredSchema {
    tag: String,
    is_wrapper: bool,
    attributes: FxHashMap<String, AttributeKind>,
    children: FxHashMap<String, Template>,
    text_kind: AttributeKind,
}

impl DeclaredSchema {
    /// Creates a schema for `tag` that accepts nothing yet and ignores text.
    pub fn new(tag: impl Into<String>) -> Self {
        DeclaredSchema {
            tag: tag.into(),
            is_wrapper: false,
            attributes: FxHashMap::default(),
            children: FxHashMap::default(),
            text_kind: AttributeKind::String,
        }
    }

    /// Sets whether text content is kept.
    pub fn wrapper(mut self, is_wrapper: bool) -> Self {
        self.is_wrapper = is_wrapper;
        self
    }

    /// Accepts an attribute with the given converter.
    pub fn attribute(mut self, name: impl Into<String>, kind: AttributeKind) -> Self {
        self.attributes.insert(name.into(), kind);
        self
    }

    /// Accepts a child element. The child's tag is the lookup key.
    pub fn child(self, child: impl ElementSchema + 'static) -> Self {
        self.child_template(Arc::new(child))
    }

    /// Accepts a child element from an existing template.
    pub fn child_template(mut self, child: Template) -> Self {
        self.children.insert(child.tag().to_string(), child);
        self
    }

    /// Declares how text converts. Implies a wrapper schema.
    pub fn text_kind(mut self, kind: AttributeKind) -> Self {
        self.text_kind = kind;
        self.is_wrapper = true;
        self
    }

    /// Wraps the schema into a shareable template.
    pub fn into_template(self) -> Template {
        Arc::new(self)
    }
}

impl ElementSchema for DeclaredSchema {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn is_wrapper(&self) -> bool {
        self.is_wrapper
    }

    fn supports_attribute(&self, name: &str) -> Option<AttributeKind> {
        self.attributes.get(name).cloned()
    }

    fn supports_child(&self, name: &str) -> Option<Template> {
        self.children.get(name).cloned()
    }

    fn convert_text(&self, raw: &str) -> Value {
        self.text_kind.convert(raw)
    }
}
