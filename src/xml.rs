//! XML helpers: an escaping writer for request fragments and a small
//! element tree for reading responses.
//!
//! Both sides use quick-xml, which does not expand external entities.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{MktError, Result};

/// Builds an XML fragment event by event. Text content is always escaped.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
        }
    }

    pub(crate) fn start(&mut self, name: &str) -> Result<&mut Self> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Writes `<name>text</name>`.
    pub(crate) fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self> {
        self.start(name)?;
        if !text.is_empty() {
            self.write(Event::Text(BytesText::new(text)))?;
        }
        self.end(name)
    }

    /// Writes `<name>`, the content produced by `inner`, then `</name>`.
    pub(crate) fn element<F>(&mut self, name: &str, inner: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.start(name)?;
        inner(self)?;
        self.end(name)
    }

    pub(crate) fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner()).map_err(|e| MktError::Xml(e.to_string()))
    }

    fn write(&mut self, event: Event<'_>) -> Result<&mut Self> {
        self.inner
            .write_event(event)
            .map_err(|e| MktError::Xml(e.to_string()))?;
        Ok(self)
    }
}

/// A parsed XML element, keyed by local name (namespace prefixes dropped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First element with the given local name, searching depth-first
    /// starting at `self`.
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Text of the named direct child. Missing or empty children yield `None`,
    /// which covers `xsi:nil` values.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
    }
}

/// Parses a complete document into its root element.
///
/// Anything that is not a single well-formed element tree fails with the
/// base fault carrying `parsing error: <text>`.
pub fn parse(text: &str) -> Result<Element> {
    parse_tree(text).map_err(|reason| {
        tracing::debug!(%reason, "response is not well-formed XML");
        MktError::parsing(text)
    })
}

fn parse_tree(text: &str) -> std::result::Result<Element, String> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(ref e) => {
                if root.is_some() {
                    return Err("content after root element".into());
                }
                stack.push(Element {
                    name: local_name(e),
                    ..Element::default()
                });
            }
            Event::Empty(ref e) => {
                let element = Element {
                    name: local_name(e),
                    ..Element::default()
                };
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or("unexpected closing tag")?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                let content = e.unescape().map_err(|e| e.to_string())?;
                match stack.last_mut() {
                    Some(top) => top.text.push_str(&content),
                    None if content.trim().is_empty() => {}
                    None => return Err("text outside of root element".into()),
                }
            }
            Event::CData(e) => {
                let content = e.into_inner();
                match stack.last_mut() {
                    Some(top) => top.text.push_str(&String::from_utf8_lossy(&content)),
                    None => return Err("CDATA outside of root element".into()),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err("unclosed element at end of input".into());
    }
    root.ok_or_else(|| "no root element".to_string())
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> std::result::Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err("multiple root elements".into()),
    }
    Ok(())
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}
