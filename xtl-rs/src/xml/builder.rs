//! Template-driven tree building.
//!
//! The builder walks a [`TokenSource`] and, at each element, asks the
//! element's template what to keep. Unsupported attributes are dropped,
//! unsupported children are skipped together with their whole subtree, and
//! text is only collected for wrapper templates.

use std::sync::Arc;

use super::{Token, TokenSource};
use crate::error::Result;
use crate::node::{Element, ElementFactory, Template};

/// Builds element trees from a token source.
///
/// Each nesting level of a kept element costs one stack frame, so documents
/// nested tens of thousands of levels deep can exhaust the thread's stack.
/// Pruned subtrees are skipped by the token source and cost nothing.
pub struct TreeBuilder<S: TokenSource> {
    source: S,
}

impl<S: TokenSource> TreeBuilder<S> {
    /// Creates a builder reading from `source`.
    pub fn new(source: S) -> Self {
        TreeBuilder { source }
    }

    /// Reads the whole stream and returns the last element matching `root`.
    ///
    /// A root template with an empty tag matches the first element name
    /// seen; later elements only match if they share that name. The template
    /// itself is never modified. Elements outside a match are scanned for
    /// nested matches. Each new match replaces the previous result.
    pub fn build(mut self, root: &Template) -> Result<Option<Element>> {
        let mut root_tag: Option<String> = if root.tag().is_empty() {
            None
        } else {
            Some(root.tag().to_string())
        };
        let mut result = None;

        loop {
            match self.source.advance()? {
                Token::Start(name) => {
                    let matched = match &root_tag {
                        Some(tag) => *tag == name,
                        None => {
                            tracing::debug!(tag = %name, "Adopting first element as root tag");
                            root_tag = Some(name.clone());
                            true
                        }
                    };
                    if matched {
                        if result.is_some() {
                            tracing::debug!(tag = %name, "Replacing earlier root match");
                        }
                        result = Some(self.build_element(root, &name)?);
                    }
                }
                Token::Eof => break,
                Token::End(_) | Token::Text(_) => {}
            }
        }

        if result.is_none() {
            tracing::debug!(tag = ?root_tag, "No element matched the root template");
        }
        Ok(result)
    }

    /// Builds one element whose start tag `name` was just read.
    ///
    /// Consumes the element's content up to its end tag, or to the end of the
    /// stream for truncated input.
    fn build_element(&mut self, template: &Template, name: &str) -> Result<Element> {
        let mut element = template.clone_identity();
        if element.tag().is_empty() {
            element.set_tag(name);
        }
        // Dispatch through the instance's own template
        let schema = Arc::clone(element.template());

        for index in 0..self.source.attribute_count() {
            let (Some(attr), Some(raw)) = (
                self.source.attribute_name(index),
                self.source.attribute_value(index),
            ) else {
                continue;
            };
            match schema.supports_attribute(attr) {
                Some(kind) => {
                    let value = kind.convert(raw);
                    element.insert_attribute(attr.to_string(), value.clone());
                    schema.on_attribute_accepted(&mut element, attr, &value);
                }
                None => tracing::trace!(tag = %name, attribute = %attr, "Dropping attribute"),
            }
        }

        if self.source.is_self_closing() {
            return Ok(element);
        }

        let mut text: Option<String> = None;
        loop {
            match self.source.advance()? {
                Token::Start(child) => match schema.supports_child(&child) {
                    Some(child_template) => {
                        let child_element = self.build_element(&child_template, &child)?;
                        element.push_child(child_element);
                    }
                    None => {
                        tracing::debug!(parent = %name, child = %child, "Pruning unsupported subtree");
                        self.source.skip_current_subtree()?;
                    }
                },
                Token::Text(chunk) if element.is_wrapper() => match text.as_mut() {
                    Some(buffer) => {
                        buffer.push(' ');
                        buffer.push_str(&chunk);
                    }
                    None => text = Some(chunk),
                },
                Token::End(end) if end == name => break,
                Token::Eof => {
                    tracing::debug!(tag = %name, "Stream ended before end tag");
                    break;
                }
                // Ignored text and stray end tags
                Token::Text(_) | Token::End(_) => {}
            }
        }

        if let Some(buffer) = text {
            element.set_text(buffer.trim().to_string());
        }
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::convert::{AttributeKind, Value};
    use crate::node::{DeclaredSchema, ElementSchema, GenericSchema};

    /// Scripted token source: each entry is a token plus, for start tags,
    /// its attributes, self-closing flag and the tokens a skip would consume.
    #[derive(Default)]
    struct Script {
        events: VecDeque<(Token, Vec<(String, String)>, bool)>,
        current: Option<(Vec<(String, String)>, bool)>,
        skips: usize,
    }

    impl Script {
        fn start(mut self, name: &str, attrs: &[(&str, &str)], self_closing: bool) -> Self {
            let attrs = attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            self.events
                .push_back((Token::Start(name.to_string()), attrs, self_closing));
            self
        }

        fn end(mut self, name: &str) -> Self {
            self.events
                .push_back((Token::End(name.to_string()), Vec::new(), false));
            self
        }

        fn text(mut self, text: &str) -> Self {
            self.events
                .push_back((Token::Text(text.to_string()), Vec::new(), false));
            self
        }
    }

    impl TokenSource for Script {
        fn advance(&mut self) -> Result<Token> {
            match self.events.pop_front() {
                Some((token, attrs, self_closing)) => {
                    if matches!(token, Token::Start(_)) {
                        self.current = Some((attrs, self_closing));
                    }
                    Ok(token)
                }
                None => Ok(Token::Eof),
            }
        }

        fn is_self_closing(&self) -> bool {
            self.current.as_ref().is_some_and(|(_, s)| *s)
        }

        fn attribute_count(&self) -> usize {
            self.current.as_ref().map_or(0, |(a, _)| a.len())
        }

        fn attribute_name(&self, index: usize) -> Option<&str> {
            self.current.as_ref()?.0.get(index).map(|(k, _)| k.as_str())
        }

        fn attribute_value(&self, index: usize) -> Option<&str> {
            self.current.as_ref()?.0.get(index).map(|(_, v)| v.as_str())
        }

        fn skip_current_subtree(&mut self) -> Result<()> {
            self.skips += 1;
            if self.is_self_closing() {
                return Ok(());
            }
            let mut depth = 1;
            while let Some((token, _, self_closing)) = self.events.pop_front() {
                match token {
                    Token::Start(_) if !self_closing => depth += 1,
                    Token::End(_) => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_attribute_filtering_and_conversion() {
        let source = Script::default()
            .start("item", &[("id", "12"), ("flag", "TRUE"), ("extra", "x")], true);
        let template = DeclaredSchema::new("item")
            .attribute("id", AttributeKind::Int)
            .attribute("flag", AttributeKind::Bool)
            .into_template();

        let item = TreeBuilder::new(source).build(&template).unwrap().unwrap();
        assert_eq!(item.attributes().len(), 2);
        assert_eq!(item.attribute("id"), Some(&Value::Int(12)));
        assert_eq!(item.attribute("flag"), Some(&Value::Bool(true)));
        assert!(item.attribute("extra").is_none());
    }

    #[test]
    fn test_pruned_subtree_is_never_visited() {
        let source = Script::default()
            .start("root", &[], false)
            .start("skip", &[], false)
            .start("keep", &[], true)
            .end("skip")
            .start("keep", &[], true)
            .end("root");
        let template = DeclaredSchema::new("root")
            .child(DeclaredSchema::new("keep"))
            .into_template();

        let mut builder = TreeBuilder::new(source);
        assert_eq!(builder.source.advance().unwrap(), Token::Start("root".to_string()));
        let root = builder.build_element(&template, "root").unwrap();
        assert_eq!(root.child_count(), 1);
        assert_eq!(builder.source.skips, 1);
    }

    #[test]
    fn test_text_chunks_joined_with_single_space() {
        let source = Script::default()
            .start("p", &[], false)
            .text("  first")
            .start("b", &[], true)
            .text("second  ")
            .end("p");
        let template = DeclaredSchema::new("p").wrapper(true).into_template();

        let p = TreeBuilder::new(source).build(&template).unwrap().unwrap();
        assert_eq!(p.text(), Some("first second"));
        assert_eq!(p.child_count(), 0);
    }

    #[test]
    fn test_non_wrapper_ignores_text() {
        let source = Script::default()
            .start("p", &[], false)
            .text("ignored")
            .end("p");
        let template = DeclaredSchema::new("p").into_template();

        let p = TreeBuilder::new(source).build(&template).unwrap().unwrap();
        assert_eq!(p.text(), None);
    }

    #[test]
    fn test_empty_root_tag_adopts_first_element() {
        let source = Script::default()
            .start("first", &[("n", "1")], true)
            .start("other", &[], true)
            .start("first", &[("n", "2")], true);
        let template = GenericSchema::any_root();

        let found = TreeBuilder::new(source).build(&template).unwrap().unwrap();
        assert_eq!(found.tag(), "first");
        assert_eq!(found.attribute("n"), Some(&Value::String("2".to_string())));
        // the shared template is untouched
        assert_eq!(template.tag(), "");
    }

    #[test]
    fn test_stray_end_tags_are_absorbed() {
        let source = Script::default()
            .start("root", &[], false)
            .end("stray")
            .start("a", &[], true)
            .end("root");
        let template = GenericSchema::template("root");

        let root = TreeBuilder::new(source).build(&template).unwrap().unwrap();
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn test_truncated_stream_keeps_partial_content() {
        let source = Script::default()
            .start("root", &[], false)
            .start("a", &[], false)
            .text("partial");
        let template = GenericSchema::template("root");

        let root = TreeBuilder::new(source).build(&template).unwrap().unwrap();
        assert_eq!(root.child_count(), 1);
        assert_eq!(root.children()[0].text(), Some("partial"));
        assert_eq!(root.text(), None);
    }

    struct Recording {
        seen: Mutex<Vec<String>>,
    }

    impl ElementSchema for Recording {
        fn tag(&self) -> &str {
            "rec"
        }

        fn is_wrapper(&self) -> bool {
            false
        }

        fn on_attribute_accepted(&self, element: &mut Element, name: &str, value: &Value) {
            self.seen.lock().unwrap().push(name.to_string());
            element.set_field(format!("mirror_{}", name), value.clone());
        }
    }

    #[test]
    fn test_hook_runs_for_accepted_attributes() {
        let schema = Arc::new(Recording {
            seen: Mutex::new(Vec::new()),
        });
        let template: Template = schema.clone();
        let source = Script::default().start("rec", &[("a", "1"), ("b", "2")], true);

        let rec = TreeBuilder::new(source).build(&template).unwrap().unwrap();
        assert_eq!(*schema.seen.lock().unwrap(), vec!["a", "b"]);
        assert_eq!(rec.field("mirror_b"), Some(&Value::String("2".to_string())));
    }
}
