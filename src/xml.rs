//! Pull-style structural reader over `quick-xml`.
//!
//! Part readers are written as recursive descent: a handler receives the
//! start tag of the element it owns, walks its children with
//! [`XmlReader::next_child`], and returns once that element's end tag has
//! been consumed.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::str::FromStr;

/// Boolean attribute convention used throughout SpreadsheetML.
pub fn is_true(value: &str) -> bool {
    value == "1" || value == "true"
}

/// An element start tag with its attributes decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    qualified: String,
    attributes: Vec<(String, String)>,
    namespaces: Vec<(String, String)>,
}

impl StartTag {
    fn from_event(event: &BytesStart<'_>) -> Result<Self> {
        let qualified = utf8(event.name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        let mut namespaces = Vec::new();

        for attr in event.attributes() {
            let attr = attr?;
            let key = utf8(attr.key.as_ref())?;
            let value = attr.unescape_value()?.into_owned();

            if key == "xmlns" {
                namespaces.push((String::new(), value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                namespaces.push((prefix.to_string(), value));
            } else {
                attributes.push((key.to_string(), value));
            }
        }

        Ok(Self {
            qualified,
            attributes,
            namespaces,
        })
    }

    /// Local element name (prefix stripped).
    pub fn name(&self) -> &str {
        local_part(&self.qualified)
    }

    /// Element name as written, including any prefix.
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    /// Namespace declarations made on this element as `(prefix, uri)`.
    /// The default namespace has an empty prefix.
    pub fn namespaces(&self) -> &[(String, String)] {
        &self.namespaces
    }

    /// Whether this element declares a namespace with the given prefix.
    pub fn declares_prefix(&self, prefix: &str) -> bool {
        self.namespaces.iter().any(|(p, _)| p == prefix)
    }

    /// All non-namespace attributes as `(qualified key, value)`.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look an attribute up by qualified key, falling back to its local name
    /// (so `id` and `r:id` both find `ns1:id`).
    pub fn attr(&self, key: &str) -> Option<&str> {
        let local = local_part(key);
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(k, _)| k.contains(':') && local_part(k) == local)
            })
            .map(|(_, v)| v.as_str())
    }

    /// Whether an attribute is present.
    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    /// An attribute that the grammar requires.
    pub fn required(&self, key: &str) -> Result<&str> {
        self.attr(key).ok_or_else(|| Error::MissingAttribute {
            element: self.name().to_string(),
            attribute: key.to_string(),
        })
    }

    /// Parse an optional attribute; present but malformed values are errors.
    pub fn parse_attr<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.attr(key) {
            Some(value) => parse_value(&format!("{}@{}", self.name(), key), value).map(Some),
            None => Ok(None),
        }
    }

    /// Parse a required attribute.
    pub fn required_parse<T: FromStr>(&self, key: &str) -> Result<T> {
        let value = self.required(key)?;
        parse_value(&format!("{}@{}", self.name(), key), value)
    }

    /// Optional boolean attribute (`1`/`true` are true, anything else false).
    pub fn bool_attr(&self, key: &str) -> Option<bool> {
        self.attr(key).map(is_true)
    }
}

/// Parse text into `T`, reporting `what` on failure.
pub fn parse_value<T: FromStr>(what: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| Error::invalid_value(what, value))
}

fn local_part(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::XmlParse(e.to_string()))
}

enum Node {
    Start(StartTag),
    End,
    Text(String),
    Eof,
}

/// Structural reader over one part's XML text.
pub struct XmlReader<'a> {
    reader: Reader<&'a [u8]>,
    part: String,
}

impl<'a> XmlReader<'a> {
    /// Create a reader over `xml`; `part` names the source in error messages.
    pub fn new(xml: &'a str, part: impl Into<String>) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);
        reader.config_mut().expand_empty_elements = true;
        Self {
            reader,
            part: part.into(),
        }
    }

    /// Name of the part being read.
    pub fn part(&self) -> &str {
        &self.part
    }

    fn next_node(&mut self) -> Result<Node> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return Ok(Node::Start(StartTag::from_event(&e)?)),
                Event::End(_) => return Ok(Node::End),
                Event::Text(e) => return Ok(Node::Text(e.unescape()?.into_owned())),
                Event::CData(e) => return Ok(Node::Text(utf8(&e)?.to_string())),
                Event::Eof => return Ok(Node::Eof),
                _ => {}
            }
        }
    }

    fn unexpected(&self, expected: &str, found: impl Into<String>) -> Error {
        Error::UnexpectedElement {
            part: self.part.clone(),
            expected: expected.to_string(),
            found: found.into(),
        }
    }

    /// Skip the prolog and return the document element, which must be `name`.
    pub fn expect_root(&mut self, name: &str) -> Result<StartTag> {
        loop {
            match self.next_node()? {
                Node::Start(tag) if tag.name() == name => return Ok(tag),
                Node::Start(tag) => {
                    return Err(self.unexpected(name, format!("<{}>", tag.qualified_name())))
                }
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Text(_) => return Err(self.unexpected(name, "text")),
                Node::End => return Err(self.unexpected(name, "end tag")),
                Node::Eof => return Err(self.unexpected(name, "end of document")),
            }
        }
    }

    /// Next child element of the current element, or `None` once the
    /// current element's end tag has been consumed. Text between child
    /// elements is ignored.
    pub fn next_child(&mut self) -> Result<Option<StartTag>> {
        loop {
            match self.next_node()? {
                Node::Start(tag) => return Ok(Some(tag)),
                Node::End => return Ok(None),
                Node::Text(_) => {}
                Node::Eof => {
                    return Err(Error::XmlParse(format!(
                        "unexpected end of document in {}",
                        self.part
                    )))
                }
            }
        }
    }

    /// Next child element, which must be `name`.
    pub fn expect_child(&mut self, name: &str) -> Result<StartTag> {
        match self.next_child()? {
            Some(tag) if tag.name() == name => Ok(tag),
            Some(tag) => Err(self.unexpected(name, format!("<{}>", tag.qualified_name()))),
            None => Err(self.unexpected(name, "end tag")),
        }
    }

    /// Text content of the current element up to its end tag. Text inside
    /// nested elements is not included.
    pub fn read_text(&mut self) -> Result<String> {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            match self.next_node()? {
                Node::Text(t) if depth == 0 => text.push_str(&t),
                Node::Text(_) => {}
                Node::Start(_) => depth += 1,
                Node::End if depth == 0 => return Ok(text),
                Node::End => depth -= 1,
                Node::Eof => {
                    return Err(Error::XmlParse(format!(
                        "unexpected end of document in {}",
                        self.part
                    )))
                }
            }
        }
    }

    /// Consume everything up to and including the current element's end tag.
    pub fn skip_to_end(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.next_node()? {
                Node::Start(_) => depth += 1,
                Node::End if depth == 0 => return Ok(()),
                Node::End => depth -= 1,
                Node::Text(_) => {}
                Node::Eof => {
                    return Err(Error::XmlParse(format!(
                        "unexpected end of document in {}",
                        self.part
                    )))
                }
            }
        }
    }
}
