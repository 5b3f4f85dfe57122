//! Element trees produced by template-driven loading.
//!
//! An [`Element`] only ever holds what its template declared: accepted
//! attributes, accepted children in document order, and (for wrapper
//! templates) the trimmed text content. Each element keeps a handle to the
//! template that created it so typed views dispatch through the same schema.

mod declared;
mod schema;

pub use declared::DeclaredSchema;
pub use schema::{ElementFactory, ElementSchema, GenericSchema, Template};

use rustc_hash::FxHashMap;

use crate::convert::Value;

/// A loaded element.
#[derive(Debug, Clone)]
pub struct Element {
    /// Template this element was cloned from.
    template: Template,
    /// Tag name, non-empty once matched.
    tag: String,
    /// Whether text content is kept.
    is_wrapper: bool,
    /// Accepted attributes after conversion.
    attributes: FxHashMap<String, Value>,
    /// Accepted children in document order.
    children: Vec<Element>,
    /// Trimmed text, present only for wrappers that saw text.
    text: Option<String>,
    /// Convenience fields written by schema hooks.
    fields: FxHashMap<String, Value>,
}

impl Element {
    /// Creates an empty element carrying the template's identity.
    pub(crate) fn new(template: Template) -> Self {
        let tag = template.tag().to_string();
        let is_wrapper = template.is_wrapper();
        Element {
            template,
            tag,
            is_wrapper,
            attributes: FxHashMap::default(),
            children: Vec::new(),
            text: None,
            fields: FxHashMap::default(),
        }
    }

    /// Returns the tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns true if text content is kept for this element.
    pub fn is_wrapper(&self) -> bool {
        self.is_wrapper
    }

    /// Returns the template this element was built from.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Returns the accepted attributes.
    pub fn attributes(&self) -> &FxHashMap<String, Value> {
        &self.attributes
    }

    /// Returns an accepted attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns the accepted children in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Iterates over children with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Returns the first child with the given tag.
    pub fn first_child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Returns the trimmed text content.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Converts the text content through the template's `convert_text`.
    pub fn typed_text(&self) -> Option<Value> {
        self.text.as_deref().map(|t| self.template.convert_text(t))
    }

    /// Returns a convenience field recorded by a schema hook.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Records a convenience field.
    ///
    /// Only meant to be called from [`ElementSchema::on_attribute_accepted`]
    /// while the element is being built. Loaded trees are treated as
    /// finished; changing a field afterwards is not reflected anywhere else.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub(crate) fn set_tag(&mut self, tag: &str) {
        self.tag = tag.to_string();
    }

    pub(crate) fn insert_attribute(&mut self, name: String, value: Value) {
        self.attributes.insert(name, value);
    }

    pub(crate) fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }
}

/// Structural equality: templates are compared by identity fields only.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.is_wrapper == other.is_wrapper
            && self.attributes == other.attributes
            && self.children == other.children
            && self.text == other.text
            && self.fields == other.fields
    }
}
