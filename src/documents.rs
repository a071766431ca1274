//! XML document tree
//!
//! Schema sources are read with `quick-xml` into an owned element tree. Every
//! element carries its fully resolved name and the cumulative namespace
//! context in scope at that element, which the schema parser needs to
//! resolve QName-valued attributes such as `type="tns:noteType"`.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::namespaces::{NamespaceContext, QName};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// XML Element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Element attributes
    pub attributes: HashMap<QName, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Namespace context in scope at this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: HashMap::new(),
            text: None,
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Get an unqualified attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&QName::local(name))
            .map(|s| s.as_str())
    }

    /// Append character data, ignoring whitespace-only runs
    fn append_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    /// Find child elements by local name
    pub fn find_children(&self, local_name: &str) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|e| e.local_name() == local_name)
            .collect()
    }

    /// First child element with the given local name
    pub fn find_child(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.local_name() == local_name)
    }
}

/// XML Document representation
#[derive(Debug, Default)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes(), &Limits::default())
    }

    /// Parse an XML document from bytes, bounding the tree depth
    pub fn parse(xml: &[u8], limits: &Limits) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut doc = Document::new();
        let mut open: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                Error::Xml(format!(
                    "Error parsing XML at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;
            match event {
                Event::Start(start) => {
                    limits.check_xml_depth(open.len() + 1)?;
                    let element = Self::parse_element(&start, open.last())?;
                    open.push(element);
                }
                Event::Empty(start) => {
                    limits.check_xml_depth(open.len() + 1)?;
                    let element = Self::parse_element(&start, open.last())?;
                    doc.close(&mut open, element);
                }
                Event::End(_) => {
                    if let Some(element) = open.pop() {
                        doc.close(&mut open, element);
                    }
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?;
                    if let Some(current) = open.last_mut() {
                        current.append_text(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = open.last_mut() {
                        current.append_text(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                // Comments, processing instructions, doctype
                _ => {}
            }
            buf.clear();
        }

        if let Some(unclosed) = open.last() {
            return Err(Error::Xml(format!(
                "Unexpected end of document inside <{}>",
                unclosed.local_name()
            )));
        }

        Ok(doc)
    }

    /// Attach a finished element to its parent, or make it the root
    fn close(&mut self, open: &mut [Element], element: Element) {
        match open.last_mut() {
            Some(parent) => parent.children.push(element),
            None => self.root = Some(element),
        }
    }

    /// Build an element from a start tag. Namespace declarations on the tag
    /// extend the parent's context before any name on it is resolved.
    fn parse_element(start: &BytesStart, parent: Option<&Element>) -> Result<Element> {
        let mut namespaces = parent.map(|p| p.namespaces.clone()).unwrap_or_default();
        let mut declared = Vec::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::Xml(format!("Malformed attribute: {}", e)))?;
            let name = utf8(attr.key.as_ref(), "attribute name")?;
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Bad value for attribute '{}': {}", name, e)))?
                .into_owned();

            if name == "xmlns" {
                namespaces.set_default_namespace(value);
            } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                namespaces.add_prefix(prefix, value);
            } else {
                declared.push((name, value));
            }
        }

        let tag = utf8(start.name().as_ref(), "element name")?;
        let mut element = Element::new(namespaces.resolve(&tag)?);
        for (name, value) in declared {
            // Unprefixed attributes are in no namespace
            let qname = if name.contains(':') {
                namespaces.resolve(&name)?
            } else {
                QName::local(name)
            };
            element.attributes.insert(qname, value);
        }
        element.namespaces = namespaces;

        Ok(element)
    }
}

fn utf8(bytes: &[u8], what: &str) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| Error::Xml(format!("Invalid {}: {}", what, e)))
}
