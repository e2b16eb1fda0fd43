//! Parsed form of the definition XML handed to templates.
//!
//! The tree is deliberately plain: element local names, an attribute map,
//! child elements and text. Namespace declarations are dropped and prefixes
//! stripped, so a template can match `Activity` whether or not the document
//! uses the BAM namespace.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;

use crate::generation::GenerationError;

/// One element of the definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmlElement {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlElement>,
    /// Character data directly inside this element, trimmed
    pub text: String,
}

impl XmlElement {
    /// Direct children with the given local name
    pub fn elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A well-formed definition document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionDocument {
    root: XmlElement,
    source: String,
}

impl DefinitionDocument {
    /// Parse definition XML, rejecting anything that is not well-formed
    pub fn parse(xml: &str) -> Result<Self, GenerationError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);
        reader.check_end_names(true);

        let mut builder = TreeBuilder::default();
        loop {
            let event = reader.read_event().map_err(|e| {
                malformed(format!("{e} (at byte {})", reader.buffer_position()))
            })?;
            match event {
                Event::Start(start) => builder.open(element_from(&start)?)?,
                Event::Empty(start) => builder.attach(element_from(&start)?)?,
                Event::End(_) => builder.close()?,
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| malformed(e.to_string()))?;
                    builder.text(&text)?;
                }
                Event::CData(cdata) => {
                    let text = String::from_utf8(cdata.into_inner().into_owned())
                        .map_err(|e| malformed(e.to_string()))?;
                    builder.text(&text)?;
                }
                Event::Eof => break,
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }

        Ok(Self {
            root: builder.finish()?,
            source: xml.to_string(),
        })
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// The XML text the document was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }
}

fn malformed<S: Into<String>>(message: S) -> GenerationError {
    GenerationError::MalformedDefinition(message.into())
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement, GenerationError> {
    let mut element = XmlElement {
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        ..Default::default()
    };

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| malformed(e.to_string()))?;
        let key = attribute.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let name = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| malformed(e.to_string()))?
            .into_owned();
        element.attributes.insert(name, value);
    }

    Ok(element)
}

#[derive(Default)]
struct TreeBuilder {
    open: Vec<XmlElement>,
    root: Option<XmlElement>,
}

impl TreeBuilder {
    fn open(&mut self, element: XmlElement) -> Result<(), GenerationError> {
        if self.open.is_empty() && self.root.is_some() {
            return Err(malformed(format!(
                "more than one root element (found <{}>)",
                element.name
            )));
        }
        self.open.push(element);
        Ok(())
    }

    fn close(&mut self) -> Result<(), GenerationError> {
        let mut element = self
            .open
            .pop()
            .ok_or_else(|| malformed("closing tag without a matching opening tag"))?;
        let trimmed = element.text.trim();
        if trimmed.len() != element.text.len() {
            element.text = trimmed.to_string();
        }
        self.attach(element)
    }

    fn attach(&mut self, element: XmlElement) -> Result<(), GenerationError> {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(element),
            None if self.root.is_some() => {
                return Err(malformed(format!(
                    "more than one root element (found <{}>)",
                    element.name
                )));
            }
            None => self.root = Some(element),
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), GenerationError> {
        match self.open.last_mut() {
            Some(parent) => parent.text.push_str(text),
            None if text.trim().is_empty() => {}
            None => return Err(malformed("text content outside the root element")),
        }
        Ok(())
    }

    fn finish(self) -> Result<XmlElement, GenerationError> {
        if let Some(unclosed) = self.open.last() {
            return Err(malformed(format!("element <{}> is never closed", unclosed.name)));
        }
        self.root.ok_or_else(|| malformed("document has no root element"))
    }
}
