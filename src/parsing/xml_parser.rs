//! Element tree shared by the text XML and binary XML readers

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::parsing::abx_parser::{self, AbxError};

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML syntax error at byte {position}: {reason}")]
    Syntax { position: usize, reason: String },

    #[error("unbalanced end tag </{0}>")]
    UnbalancedEnd(String),

    #[error("document ended with {0} unclosed element(s)")]
    Unclosed(usize),

    #[error("binary XML: {0}")]
    Binary(#[from] AbxError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement { name: name.into(), ..Default::default() }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Depth-first iteration over every element below this one.
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        let mut stack: Vec<&XmlElement> = self.children.iter().rev().collect();
        while let Some(element) = stack.pop() {
            found.push(element);
            stack.extend(element.children.iter().rev());
        }
        found
    }
}

/// A parsed document. Binary XML written by Android may carry several roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlDocument {
    pub roots: Vec<XmlElement>,
}

impl XmlDocument {
    /// Every element of the document, roots included, in document order.
    pub fn elements(&self) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        for root in &self.roots {
            found.push(root);
            found.extend(root.descendants());
        }
        found
    }
}

/// Builds a tree from start/end events; used by both readers.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    roots: Vec<XmlElement>,
    open: Vec<XmlElement>,
}

impl TreeBuilder {
    pub(crate) fn start(&mut self, element: XmlElement) {
        self.open.push(element);
    }

    pub(crate) fn attribute(&mut self, name: String, value: String) {
        if let Some(current) = self.open.last_mut() {
            current.attributes.push((name, value));
        }
    }

    pub(crate) fn text(&mut self, text: &str) {
        if let Some(current) = self.open.last_mut() {
            current.text.push_str(text);
        }
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<(), XmlError> {
        let element = match self.open.pop() {
            Some(element) if element.name == name => element,
            _ => return Err(XmlError::UnbalancedEnd(name.to_string())),
        };
        match self.open.last_mut() {
            Some(parent) => parent.children.push(element),
            None => self.roots.push(element),
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<XmlDocument, XmlError> {
        if !self.open.is_empty() {
            return Err(XmlError::Unclosed(self.open.len()));
        }
        Ok(XmlDocument { roots: self.roots })
    }
}

/// Read a settings or policy file in whichever form it was stored.
pub fn read_xml_document(bytes: &[u8]) -> Result<XmlDocument, XmlError> {
    if abx_parser::is_abx(bytes) {
        return Ok(abx_parser::parse_abx(bytes)?);
    }
    parse_text_xml(bytes)
}

fn syntax_error(reader: &Reader<&[u8]>, reason: impl ToString) -> XmlError {
    XmlError::Syntax { position: reader.buffer_position(), reason: reason.to_string() }
}

fn element_from_start(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| syntax_error(reader, e))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(|e| syntax_error(reader, e))?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

pub fn parse_text_xml(bytes: &[u8]) -> Result<XmlDocument, XmlError> {
    let mut reader = Reader::from_reader(bytes);
    let mut builder = TreeBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let element = element_from_start(&reader, &start)?;
                builder.start(element);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&reader, &start)?;
                let name = element.name.clone();
                builder.start(element);
                builder.end(&name)?;
            }
            Ok(Event::End(end)) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                builder.end(&name)?;
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().map_err(|e| syntax_error(&reader, e))?;
                builder.text(&text);
            }
            Ok(Event::CData(data)) => builder.text(&String::from_utf8_lossy(&data)),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(syntax_error(&reader, err)),
        }
    }

    builder.finish()
}
