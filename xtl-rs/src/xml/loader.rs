//! Document loading entry points.
//!
//! `try_*` functions report failures as errors. The plain variants follow the
//! lenient contract: an unreadable source and a document without a match
//! both come back as `None`, with the failure logged.

use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use super::{TokenizerConfig, TreeBuilder, XmlTokenizer};
use crate::error::{Error, Result};
use crate::node::{Element, Template};

/// Loads documents with a fixed tokenizer configuration.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: TokenizerConfig,
}

impl Loader {
    /// Creates a loader with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader with the given tokenizer configuration.
    pub fn with_config(config: TokenizerConfig) -> Self {
        Loader { config }
    }

    /// Returns the tokenizer configuration.
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Loads the element matching `template` from a file.
    pub fn try_load_file<P: AsRef<Path>>(
        &self,
        path: P,
        template: &Template,
    ) -> Result<Option<Element>> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), tag = template.tag(), "Loading document");

        let file = File::open(path).map_err(|source| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        // The file is closed when the tokenizer drops, on every return path
        TreeBuilder::new(XmlTokenizer::from_file(file, &self.config)).build(template)
    }

    /// Loads the element matching `template` from a buffered reader.
    pub fn try_load_reader<R: BufRead>(
        &self,
        reader: R,
        template: &Template,
    ) -> Result<Option<Element>> {
        TreeBuilder::new(XmlTokenizer::from_reader(reader, &self.config)).build(template)
    }

    /// Loads the element matching `template` from a string.
    pub fn try_load_str(&self, xml: &str, template: &Template) -> Result<Option<Element>> {
        TreeBuilder::new(XmlTokenizer::from_xml(xml, &self.config)).build(template)
    }

    /// Like [`try_load_file`](Self::try_load_file), collapsing errors into `None`.
    pub fn load_file<P: AsRef<Path>>(&self, path: P, template: &Template) -> Option<Element> {
        lenient(self.try_load_file(path, template))
    }

    /// Like [`try_load_reader`](Self::try_load_reader), collapsing errors into `None`.
    pub fn load_reader<R: BufRead>(&self, reader: R, template: &Template) -> Option<Element> {
        lenient(self.try_load_reader(reader, template))
    }

    /// Like [`try_load_str`](Self::try_load_str), collapsing errors into `None`.
    pub fn load_str(&self, xml: &str, template: &Template) -> Option<Element> {
        lenient(self.try_load_str(xml, template))
    }
}

fn lenient(result: Result<Option<Element>>) -> Option<Element> {
    match result {
        Ok(element) => element,
        Err(e) => {
            tracing::warn!(error = %e, "Document could not be loaded");
            None
        }
    }
}

/// Loads from a file using the default configuration.
pub fn load_file<P: AsRef<Path>>(path: P, template: &Template) -> Option<Element> {
    Loader::default().load_file(path, template)
}

/// Loads from a reader using the default configuration.
pub fn load_reader<R: BufRead>(reader: R, template: &Template) -> Option<Element> {
    Loader::default().load_reader(reader, template)
}

/// Loads from a string using the default configuration.
pub fn load_str(xml: &str, template: &Template) -> Option<Element> {
    Loader::default().load_str(xml, template)
}

/// Loads from a file using the default configuration, reporting errors.
pub fn try_load_file<P: AsRef<Path>>(path: P, template: &Template) -> Result<Option<Element>> {
    Loader::default().try_load_file(path, template)
}

/// Loads from a reader using the default configuration, reporting errors.
pub fn try_load_reader<R: BufRead>(reader: R, template: &Template) -> Result<Option<Element>> {
    Loader::default().try_load_reader(reader, template)
}

/// Loads from a string using the default configuration, reporting errors.
pub fn try_load_str(xml: &str, template: &Template) -> Result<Option<Element>> {
    Loader::default().try_load_str(xml, template)
}
