//! In-memory element tree built from quick-xml events.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::core::ConvertError;

/// Tag of the container element wrapping one exported object.
pub const CONTAINER_TAG: &str = "TALLYMESSAGE";
/// Tag of the voucher element.
pub const VOUCHER_TAG: &str = "VOUCHER";
/// Attribute carrying the voucher type on the voucher element.
pub const VOUCHER_TYPE_ATTR: &str = "VCHTYPE";
/// The only voucher type this crate converts.
pub const RECEIPT: &str = "Receipt";
/// Deepest element nesting accepted by [`parse_document`].
pub const MAX_DEPTH: usize = 256;

/// One XML element with its attributes, direct text and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Concatenated direct text content, trimmed.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Case-insensitive tag comparison.
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct text, or `None` when blank.
    pub fn value(&self) -> Option<&str> {
        let t = self.text.trim();
        if t.is_empty() { None } else { Some(t) }
    }

    pub fn children_named<'a, 'b>(&'a self, tag: &'b str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.is(tag))
    }

    /// Last non-blank text among direct children named `tag`.
    pub fn child_value(&self, tag: &str) -> Option<&str> {
        self.children_named(tag).filter_map(Element::value).last()
    }

    /// Pre-order walk over this element and all of its descendants, in
    /// document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// One receipt voucher together with the container that holds it.
#[derive(Debug, Clone, Copy)]
pub struct VoucherGroup<'a> {
    pub container: &'a Element,
    pub voucher: &'a Element,
}

/// Select every receipt voucher whose parent is a `TALLYMESSAGE`
/// container, in document order.
pub fn voucher_groups(root: &Element) -> Vec<VoucherGroup<'_>> {
    root.descendants()
        .filter(|e| e.is(CONTAINER_TAG))
        .flat_map(|container| {
            container
                .children_named(VOUCHER_TAG)
                .filter(|v| v.attr(VOUCHER_TYPE_ATTR) == Some(RECEIPT))
                .map(move |voucher| VoucherGroup { container, voucher })
        })
        .collect()
}

/// Parse a complete XML document into its root element.
///
/// Fails on mismatched or unclosed tags, multiple roots, text outside the
/// root element, an empty document and nesting deeper than [`MAX_DEPTH`].
pub fn parse_document(xml: &str) -> Result<Element, ConvertError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| ConvertError::parse(position, e.to_string()))?;
        match event {
            Event::Start(ref e) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(ConvertError::parse(position, "element nesting too deep"));
                }
                stack.push(start_element(e, position)?);
            }
            Event::Empty(ref e) => {
                let element = start_element(e, position)?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ConvertError::parse(position, "unexpected closing tag"))?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|err| ConvertError::parse(position, err.to_string()))?;
                push_text(&mut stack, &text, position)?;
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                let text = std::str::from_utf8(&raw)
                    .map_err(|err| ConvertError::parse(position, err.to_string()))?;
                push_text(&mut stack, text, position)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConvertError::parse(
            reader.buffer_position() as u64,
            format!("unclosed element <{}>", open.name),
        ));
    }
    root.ok_or_else(|| ConvertError::parse(0, "document has no root element"))
}

fn start_element(e: &BytesStart<'_>, position: u64) -> Result<Element, ConvertError> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| ConvertError::parse(position, err.to_string()))?
        .to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ConvertError::parse(position, err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| ConvertError::parse(position, err.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| ConvertError::parse(position, err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        ..Default::default()
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: u64,
) -> Result<(), ConvertError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ConvertError::parse(position, "multiple root elements"));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str, position: u64) -> Result<(), ConvertError> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ConvertError::parse(position, "text outside the root element")),
    }
}
