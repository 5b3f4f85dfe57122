//! quick-xml backed token source.
//!
//! Wraps quick-xml's streaming reader and reduces its events to the four
//! tokens the tree builder understands. Comments, declarations, processing
//! instructions and doctypes are dropped; adjacent text and entity
//! references are merged into one text token.

use std::fs::File;
use std::io::{BufRead, BufReader};

use quick_xml::errors::IllFormedError;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;

use super::{Token, TokenSource};
use crate::error::{Error, Result};

/// Tokenizer settings applied to the underlying quick-xml reader.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Reject end tags whose name differs from the open start tag.
    pub check_end_names: bool,
    /// Resolve predefined entities and character references in text.
    /// Unresolved references are kept literally (`&name;`).
    pub resolve_references: bool,
    /// Report text consisting only of whitespace.
    pub keep_whitespace_text: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            check_end_names: false,
            resolve_references: true,
            keep_whitespace_text: false,
        }
    }
}

/// Event as read from quick-xml, before text merging.
enum RawEvent {
    Start(String),
    End(String),
    Text(String),
    Eof,
    Ignored,
}

/// Token source over a quick-xml reader.
pub struct XmlTokenizer<R: BufRead> {
    reader: Reader<R>,
    config: TokenizerConfig,
    buf: Vec<u8>,
    skip_buf: Vec<u8>,
    /// Event read ahead while collecting text.
    pending: Option<Token>,
    /// Raw name of the last start tag, used to skip its subtree.
    last_start: Vec<u8>,
    self_closing: bool,
    attributes: Vec<(String, String)>,
    finished: bool,
}

impl<'a> XmlTokenizer<&'a [u8]> {
    /// Creates a tokenizer over an in-memory document.
    pub fn from_xml(xml: &'a str, config: &TokenizerConfig) -> Self {
        Self::with_reader(Reader::from_str(xml), config)
    }
}

impl XmlTokenizer<BufReader<File>> {
    /// Creates a tokenizer over an opened file.
    pub fn from_file(file: File, config: &TokenizerConfig) -> Self {
        Self::from_reader(BufReader::new(file), config)
    }
}

impl<R: BufRead> XmlTokenizer<R> {
    /// Creates a tokenizer over any buffered reader.
    pub fn from_reader(reader: R, config: &TokenizerConfig) -> Self {
        Self::with_reader(Reader::from_reader(reader), config)
    }

    fn with_reader(mut reader: Reader<R>, config: &TokenizerConfig) -> Self {
        // Don't trim text - the tree builder trims accumulated content itself
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        reader.config_mut().check_end_names = config.check_end_names;
        // A bare `&` is kept as text
        reader.config_mut().allow_dangling_amp = true;

        XmlTokenizer {
            reader,
            config: config.clone(),
            buf: Vec::new(),
            skip_buf: Vec::new(),
            pending: None,
            last_start: Vec::new(),
            self_closing: false,
            attributes: Vec::new(),
            finished: false,
        }
    }

    /// Reads one quick-xml event.
    fn read_raw(&mut self) -> Result<RawEvent> {
        if self.finished {
            return Ok(RawEvent::Eof);
        }

        self.buf.clear();
        let raw = match self.reader.read_event_into(&mut self.buf) {
            Ok(Event::Start(ref e)) => {
                let (name, attributes) = Self::parse_start(e, &self.reader)?;
                self.last_start.clear();
                self.last_start.extend_from_slice(e.name().as_ref());
                self.self_closing = false;
                self.attributes = attributes;
                RawEvent::Start(name)
            }
            Ok(Event::Empty(ref e)) => {
                let (name, attributes) = Self::parse_start(e, &self.reader)?;
                self.last_start.clear();
                self.last_start.extend_from_slice(e.name().as_ref());
                self.self_closing = true;
                self.attributes = attributes;
                RawEvent::Start(name)
            }
            Ok(Event::End(ref e)) => {
                let name = self
                    .reader
                    .decoder()
                    .decode(e.name().as_ref())
                    .map_err(|e| Error::Parse(e.to_string()))?
                    .to_string();
                RawEvent::End(name)
            }
            Ok(Event::Text(e)) => {
                let raw =
                    std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                RawEvent::Text(raw.to_string())
            }
            Ok(Event::CData(ref e)) => RawEvent::Text(String::from_utf8_lossy(e.as_ref()).to_string()),
            Ok(Event::GeneralRef(e)) => {
                let name =
                    std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                let resolved = if self.config.resolve_references {
                    resolve_reference(name)
                } else {
                    None
                };
                RawEvent::Text(resolved.unwrap_or_else(|| format!("&{};", name)))
            }
            Ok(Event::Eof) => RawEvent::Eof,
            Ok(Event::Comment(_))
            | Ok(Event::Decl(_))
            | Ok(Event::PI(_))
            | Ok(Event::DocType(_)) => RawEvent::Ignored,
            // Truncated input ends the stream instead of failing it
            Err(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(_))) => RawEvent::Eof,
            Err(e @ quick_xml::Error::Io(_)) => return Err(e.into()),
            // Damaged markup ends the stream after the last complete token
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    position = self.reader.error_position(),
                    "Ending stream at malformed markup"
                );
                RawEvent::Eof
            }
        };

        if matches!(raw, RawEvent::Eof) {
            self.finished = true;
        }
        Ok(raw)
    }

    /// Parses an element's name and attributes.
    fn parse_start(e: &BytesStart, reader: &Reader<R>) -> Result<(String, Vec<(String, String)>)> {
        let name = reader
            .decoder()
            .decode(e.name().as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();

        // Duplicates are passed through; the element keeps the last one
        let mut attributes = Vec::new();
        for attr_result in e.attributes().with_checks(false) {
            let attr = match attr_result {
                Ok(attr) => attr,
                Err(e) => {
                    tracing::debug!(error = %e, tag = %name, "Dropping malformed attributes");
                    break;
                }
            };
            let key = reader
                .decoder()
                .decode(attr.key.as_ref())
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            // Unknown references stay as written
            let value = match attr.unescape_value() {
                Ok(value) => value.to_string(),
                Err(_) => reader
                    .decoder()
                    .decode(&attr.value)
                    .map_err(|e| Error::Parse(e.to_string()))?
                    .to_string(),
            };
            attributes.push((key, value));
        }

        Ok((name, attributes))
    }

    fn into_token(raw: RawEvent) -> Option<Token> {
        match raw {
            RawEvent::Start(name) => Some(Token::Start(name)),
            RawEvent::End(name) => Some(Token::End(name)),
            RawEvent::Text(text) => Some(Token::Text(text)),
            RawEvent::Eof => Some(Token::Eof),
            RawEvent::Ignored => None,
        }
    }
}

impl<R: BufRead> TokenSource for XmlTokenizer<R> {
    fn advance(&mut self) -> Result<Token> {
        if let Some(token) = self.pending.take() {
            return Ok(token);
        }

        let mut text: Option<String> = None;
        loop {
            let raw = self.read_raw()?;
            if let RawEvent::Text(chunk) = raw {
                text.get_or_insert_with(String::new).push_str(&chunk);
                continue;
            }
            let token = Self::into_token(raw);

            // A dropped comment or instruction still separates text chunks
            match text.take() {
                Some(t) if self.config.keep_whitespace_text || !t.trim().is_empty() => {
                    self.pending = token;
                    return Ok(Token::Text(t));
                }
                _ => {
                    if let Some(token) = token {
                        return Ok(token);
                    }
                }
            }
        }
    }

    fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    fn attribute_name(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(|(name, _)| name.as_str())
    }

    fn attribute_value(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(|(_, value)| value.as_str())
    }

    fn skip_current_subtree(&mut self) -> Result<()> {
        if self.self_closing || self.finished {
            return Ok(());
        }

        self.skip_buf.clear();
        match self
            .reader
            .read_to_end_into(QName(&self.last_start), &mut self.skip_buf)
        {
            Ok(_) => Ok(()),
            Err(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(_))) => {
                self.finished = true;
                Ok(())
            }
            Err(e @ quick_xml::Error::Io(_)) => Err(e.into()),
            Err(e) => {
                tracing::debug!(error = %e, "Ending stream inside skipped subtree");
                self.finished = true;
                Ok(())
            }
        }
    }
}

/// Resolves a predefined entity or numeric character reference by name.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}
