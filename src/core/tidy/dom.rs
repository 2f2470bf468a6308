//! Minimal mutable XML tree for project files.
//!
//! Text, attribute values and comments are kept in their escaped source form
//! so a load/save round trip only changes what tidying deliberately changes.

use crate::error::{Error, Result};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

const BOM: &str = "\u{feff}";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
    ProcessingInstruction(String),
    Declaration(String),
    DocType(String),
}

impl Node {
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    /// Attribute name and escaped value, in source order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Escaped attribute value, or `""` when absent.
    pub fn attr(&self, name: &str) -> &str {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Unescaped attribute value, falling back to the raw text on bad entities.
    pub fn attr_unescaped(&self, name: &str) -> String {
        let raw = self.attr(name);
        quick_xml::escape::unescape(raw)
            .map(|value| value.into_owned())
            .unwrap_or_else(|_| raw.to_string())
    }

    /// Concatenated escaped text of direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(text) | Node::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub bom: bool,
    pub nodes: Vec<Node>,
}

impl Document {
    /// Visit every element depth-first in document order.
    pub fn for_each_element_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        fn walk(nodes: &mut [Node], f: &mut impl FnMut(&mut Element)) {
            for node in nodes {
                if let Node::Element(element) = node {
                    f(element);
                    walk(&mut element.children, f);
                }
            }
        }
        walk(&mut self.nodes, f);
    }

    pub fn for_each_element(&self, f: &mut impl FnMut(&Element)) {
        fn walk(nodes: &[Node], f: &mut impl FnMut(&Element)) {
            for node in nodes {
                if let Node::Element(element) = node {
                    f(element);
                    walk(&element.children, f);
                }
            }
        }
        walk(&self.nodes, f);
    }
}

fn utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn read_element_start(start: &BytesStart<'_>, source: &str) -> Result<Element> {
    let mut element = Element::new(utf8(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::xml_parse(source, 0, e))?;
        element
            .attributes
            .push((utf8(attr.key.as_ref()), utf8(&attr.value)));
    }
    Ok(element)
}

/// Parse a project file into a [`Document`]. `source` names the input in errors.
pub fn parse(input: &[u8], source: &str) -> Result<Document> {
    let text = std::str::from_utf8(input)
        .map_err(|e| Error::xml_parse(source, e.valid_up_to() as u64, e))?;
    let (bom, text) = match text.strip_prefix(BOM) {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut reader = Reader::from_str(text);
    let mut document = Document {
        bom,
        nodes: Vec::new(),
    };
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::xml_parse(source, reader.error_position() as u64, e))?;

        let node = match event {
            Event::Start(start) => {
                stack.push(read_element_start(&start, source)?);
                continue;
            }
            Event::End(_) => match stack.pop() {
                Some(element) => Node::Element(element),
                None => {
                    return Err(Error::xml_parse(
                        source,
                        reader.buffer_position() as u64,
                        "unexpected closing tag",
                    ))
                }
            },
            Event::Empty(start) => Node::Element(read_element_start(&start, source)?),
            Event::Text(text) => Node::Text(utf8(&text)),
            Event::CData(data) => Node::CData(utf8(&data)),
            Event::Comment(comment) => Node::Comment(utf8(&comment)),
            Event::PI(pi) => Node::ProcessingInstruction(utf8(&pi)),
            Event::Decl(decl) => Node::Declaration(utf8(&decl)),
            Event::DocType(doctype) => Node::DocType(utf8(&doctype)),
            Event::Eof => break,
        };

        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => document.nodes.push(node),
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::xml_parse(
            source,
            reader.buffer_position() as u64,
            format!("unclosed element <{}>", open.name),
        ));
    }

    Ok(document)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> std::io::Result<()> {
    match node {
        Node::Element(element) => {
            let mut start = BytesStart::new(element.name.as_str());
            for (key, value) in &element.attributes {
                let value = if value.contains('"') {
                    Cow::Owned(value.replace('"', "&quot;"))
                } else {
                    Cow::Borrowed(value.as_str())
                };
                start.push_attribute(Attribute {
                    key: QName(key.as_bytes()),
                    value: match value {
                        Cow::Borrowed(v) => Cow::Borrowed(v.as_bytes()),
                        Cow::Owned(v) => Cow::Owned(v.into_bytes()),
                    },
                });
            }

            if element.children.is_empty() {
                writer.write_event(Event::Empty(start))?;
            } else {
                writer.write_event(Event::Start(start))?;
                for child in &element.children {
                    write_node(writer, child)?;
                }
                writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
            }
        }
        Node::Text(text) => {
            writer.write_event(Event::Text(BytesText::from_escaped(text.as_str())))?
        }
        Node::Comment(text) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?
        }
        Node::CData(text) => writer.write_event(Event::CData(BytesCData::new(text.as_str())))?,
        Node::ProcessingInstruction(text) => {
            writer.write_event(Event::PI(BytesPI::new(text.as_str())))?
        }
        Node::Declaration(text) => {
            let start = BytesStart::from_content(text.as_str(), 3);
            writer.write_event(Event::Decl(BytesDecl::from_start(start)))?
        }
        Node::DocType(text) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(text.as_str())))?
        }
    }
    Ok(())
}

/// Serialize a [`Document`] back to bytes.
pub fn serialize(document: &Document) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    if document.bom {
        writer
            .get_mut()
            .extend_from_slice(BOM.as_bytes());
    }

    for node in &document.nodes {
        write_node(&mut writer, node)
            .map_err(|e| Error::internal_unexpected(format!("Failed to write XML: {}", e)))?;
    }

    Ok(writer.into_inner())
}
