//! Debug rendering of loaded element trees.
//!
//! Output looks like indented XML but is meant for inspection: attributes
//! are sorted by name, and each element's text is printed before its
//! children.

use std::fmt;
use std::io::Write;

use quick_xml::escape::escape;

use crate::node::Element;

/// Options for element printing.
#[derive(Debug, Clone)]
pub struct ElementPrinterOptions {
    /// Spaces per nesting level.
    pub indent_width: usize,
}

impl Default for ElementPrinterOptions {
    fn default() -> Self {
        ElementPrinterOptions { indent_width: 2 }
    }
}

/// Prints element trees to a writer.
pub struct ElementPrinter<W: Write> {
    writer: W,
    options: ElementPrinterOptions,
}

impl<W: Write> ElementPrinter<W> {
    /// Creates a new printer.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, ElementPrinterOptions::default())
    }

    /// Creates a new printer with the given options.
    pub fn with_options(writer: W, options: ElementPrinterOptions) -> Self {
        ElementPrinter { writer, options }
    }

    /// Prints an element tree.
    pub fn print(&mut self, root: &Element) -> std::io::Result<()> {
        self.print_element(root, 0)?;
        self.writer.flush()
    }

    fn print_element(&mut self, element: &Element, depth: usize) -> std::io::Result<()> {
        let indent = " ".repeat(depth * self.options.indent_width);
        write!(self.writer, "{}<{}", indent, element.tag())?;

        let mut attributes: Vec<_> = element.attributes().iter().collect();
        attributes.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in attributes {
            write!(self.writer, " {}=\"{}\"", name, escape(value.to_string().as_str()))?;
        }

        let text = element.text().filter(|t| !t.is_empty());
        match (text, element.children().is_empty()) {
            (None, true) => writeln!(self.writer, "/>"),
            (Some(text), true) => {
                writeln!(self.writer, ">{}</{}>", escape(text), element.tag())
            }
            (text, false) => {
                writeln!(self.writer, ">")?;
                if let Some(text) = text {
                    let inner = " ".repeat((depth + 1) * self.options.indent_width);
                    writeln!(self.writer, "{}{}", inner, escape(text))?;
                }
                for child in element.children() {
                    self.print_element(child, depth + 1)?;
                }
                writeln!(self.writer, "{}</{}>", indent, element.tag())
            }
        }
    }
}

/// Prints an element tree to a string.
pub fn print_to_string(root: &Element) -> String {
    let mut output = Vec::new();
    {
        let mut printer = ElementPrinter::new(&mut output);
        // Writing to a Vec cannot fail
        let _ = printer.print(root);
    }
    String::from_utf8_lossy(&output).into_owned()
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_to_string(self))
    }
}
