//! Element schemas: the templates that drive loading.
//!
//! A schema declares, for one kind of element, which attributes and child
//! elements are kept and how its text converts to a typed value. The default
//! method bodies accept everything, so an implementation only overrides the
//! lookups it wants to narrow.

use std::fmt;
use std::sync::Arc;

use super::Element;
use crate::convert::{AttributeKind, Value};

/// Shared handle to a schema. One template stands for every element built
/// from it.
pub type Template = Arc<dyn ElementSchema>;

/// Per-element loading behavior.
pub trait ElementSchema: Send + Sync {
    /// Tag this schema matches. An empty tag on a root template means "the
    /// first top-level element, whatever its name".
    fn tag(&self) -> &str;

    /// Whether text content is kept for elements of this schema.
    fn is_wrapper(&self) -> bool;

    /// Returns the converter for an accepted attribute, or `None` to drop it.
    fn supports_attribute(&self, _name: &str) -> Option<AttributeKind> {
        Some(AttributeKind::String)
    }

    /// Returns the template for an accepted child, or `None` to prune the
    /// child's whole subtree.
    fn supports_child(&self, name: &str) -> Option<Template> {
        Some(GenericSchema::template(name))
    }

    /// Converts trimmed text content into a typed value.
    fn convert_text(&self, raw: &str) -> Value {
        Value::String(raw.to_string())
    }

    /// Called after an attribute has been converted and stored on `element`.
    fn on_attribute_accepted(&self, _element: &mut Element, _name: &str, _value: &Value) {}
}

impl fmt::Debug for dyn ElementSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementSchema")
            .field("tag", &self.tag())
            .field("is_wrapper", &self.is_wrapper())
            .finish()
    }
}

/// Factory trait for creating empty elements from a template.
pub trait ElementFactory {
    /// Creates a new element carrying the template's tag and wrapper flag,
    /// with no attributes, children or text.
    fn clone_identity(&self) -> Element;
}

impl ElementFactory for Template {
    fn clone_identity(&self) -> Element {
        Element::new(Arc::clone(self))
    }
}

/// Schema that accepts every attribute as a string and every child as
/// another generic element.
#[derive(Debug, Clone)]
pub struct GenericSchema {
    tag: String,
    is_wrapper: bool,
}

impl GenericSchema {
    /// Creates a generic, wrapper-capable schema for `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        GenericSchema {
            tag: tag.into(),
            is_wrapper: true,
        }
    }

    /// Sets whether text content is kept.
    pub fn wrapper(mut self, is_wrapper: bool) -> Self {
        self.is_wrapper = is_wrapper;
        self
    }

    /// Shorthand for a wrapper-capable generic template.
    pub fn template(tag: impl Into<String>) -> Template {
        Arc::new(GenericSchema::new(tag))
    }

    /// Generic template matching the first top-level element of a document.
    pub fn any_root() -> Template {
        Arc::new(GenericSchema::new(""))
    }
}

impl ElementSchema for GenericSchema {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn is_wrapper(&self) -> bool {
        self.is_wrapper
    }

    fn supports_child(&self, name: &str) -> Option<Template> {
        Some(Arc::new(GenericSchema::new(name).wrapper(self.is_wrapper)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Narrow;

    impl ElementSchema for Narrow {
        fn tag(&self) -> &str {
            "narrow"
        }

        fn is_wrapper(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_default_policy_accepts_everything() {
        let schema = Narrow;
        assert!(matches!(
            schema.supports_attribute("anything"),
            Some(AttributeKind::String)
        ));
        let child = schema.supports_child("whatever").unwrap();
        assert_eq!(child.tag(), "whatever");
        assert!(child.is_wrapper());
        assert_eq!(schema.convert_text("  x "), Value::String("  x ".to_string()));
    }

    #[test]
    fn test_clone_identity_is_empty() {
        let template: Template = Arc::new(GenericSchema::new("item").wrapper(false));
        let element = template.clone_identity();
        assert_eq!(element.tag(), "item");
        assert!(!element.is_wrapper());
        assert!(element.attributes().is_empty());
        assert!(element.children().is_empty());
        assert_eq!(element.text(), None);
    }

    #[test]
    fn test_generic_children_inherit_wrapper_flag() {
        let schema = GenericSchema::new("root").wrapper(false);
        let child = schema.supports_child("leaf").unwrap();
        assert!(!child.is_wrapper());
        assert_eq!(GenericSchema::any_root().tag(), "");
    }
}
