use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::errors::ParseError;

// @module: Minimal element tree built from quick-xml events

/// A node in the parsed document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Element with attributes and children
    Element(Element),
    /// Character data (already XML-unescaped)
    Text(String),
    /// Comment or processing instruction; kept so child counts stay exact
    Other,
}

/// An XML element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Qualified tag name as written
    pub name: String,
    /// Attributes in source order, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes in source order
    pub children: Vec<Node>,
}

impl Element {
    /// Value of the named attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
                Node::Other => {}
            }
        }
    }

    /// This element and all descendants with the given tag name, in document order
    pub fn elements_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            if let Node::Element(element) = child {
                element.collect_named(name, found);
            }
        }
    }

    fn from_start(start: &BytesStart) -> Result<Self, ParseError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::Malformed(format!("bad attribute on <{}>: {}", name, e)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value_with(resolve_xml_entity)
                .map_err(|e| ParseError::Malformed(format!("bad attribute value on <{}>: {}", name, e)))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }
}

/// Document builder state
struct TreeBuilder {
    open: Vec<Element>,
    root: Option<Element>,
}

impl TreeBuilder {
    fn push_node(&mut self, node: Node) -> Result<(), ParseError> {
        match self.open.last_mut() {
            Some(parent) => {
                parent.children.push(node);
                Ok(())
            }
            None => match node {
                Node::Text(text) if text.trim().is_empty() => Ok(()),
                Node::Text(_) => Err(ParseError::Malformed("text outside the root element".to_string())),
                Node::Other => Ok(()),
                Node::Element(element) => self.set_root(element),
            },
        }
    }

    fn set_root(&mut self, element: Element) -> Result<(), ParseError> {
        if self.root.is_some() {
            return Err(ParseError::Malformed(format!(
                "junk after document element: <{}>",
                element.name
            )));
        }
        self.root = Some(element);
        Ok(())
    }

    fn open(&mut self, element: Element) -> Result<(), ParseError> {
        if self.open.is_empty() && self.root.is_some() {
            return Err(ParseError::Malformed(format!(
                "junk after document element: <{}>",
                element.name
            )));
        }
        self.open.push(element);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ParseError> {
        let element = self
            .open
            .pop()
            .ok_or_else(|| ParseError::Malformed("closing tag without an open element".to_string()))?;
        self.push_node(Node::Element(element))
    }

    fn finish(self) -> Result<Element, ParseError> {
        if let Some(unclosed) = self.open.last() {
            return Err(ParseError::Malformed(format!("unclosed element <{}>", unclosed.name)));
        }
        self.root
            .ok_or_else(|| ParseError::Malformed("no root element".to_string()))
    }
}

/// Parse a complete XML document into its root element.
///
/// Any well-formedness problem is reported as `ParseError::Malformed`; no
/// partial tree is ever returned.
pub fn parse_document(xml: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(xml.trim_start_matches('\u{feff}'));
    reader.config_mut().check_end_names = true;

    let mut builder = TreeBuilder {
        open: Vec::new(),
        root: None,
    };

    loop {
        let event = reader.read_event().map_err(|e| {
            ParseError::Malformed(format!("{} at position {}", e, reader.error_position()))
        })?;

        match event {
            Event::Start(start) => builder.open(Element::from_start(&start)?)?,
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                if builder.open.is_empty() {
                    builder.set_root(element)?;
                } else {
                    builder.push_node(Node::Element(element))?;
                }
            }
            Event::End(_) => builder.close()?,
            Event::Text(text) => {
                let text = text
                    .unescape_with(resolve_xml_entity)
                    .map_err(|e| ParseError::Malformed(format!("bad character data: {}", e)))?;
                builder.push_node(Node::Text(text.into_owned()))?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                builder.push_node(Node::Text(text))?;
            }
            Event::Comment(_) | Event::PI(_) => builder.push_node(Node::Other)?,
            Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    builder.finish()
}
