//! Lead attribute triples and their `<attribute>` XML form.

use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::xml::{Element, XmlWriter};

/// Declared type of a lead attribute.
///
/// Marketo does not reject unknown tags, so anything outside the known
/// vocabulary is kept verbatim in [`AttributeType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeType {
    String,
    Integer,
    Date,
    DateTime,
    Boolean,
    Float,
    Text,
    Email,
    Phone,
    Url,
    Other(std::string::String),
}

impl AttributeType {
    /// Wire name of the type tag.
    pub fn as_str(&self) -> &str {
        match self {
            AttributeType::String => "string",
            AttributeType::Integer => "integer",
            AttributeType::Date => "date",
            AttributeType::DateTime => "datetime",
            AttributeType::Boolean => "boolean",
            AttributeType::Float => "float",
            AttributeType::Text => "text",
            AttributeType::Email => "email",
            AttributeType::Phone => "phone",
            AttributeType::Url => "url",
            AttributeType::Other(tag) => tag,
        }
    }
}

impl From<&str> for AttributeType {
    fn from(tag: &str) -> Self {
        match tag {
            "string" => AttributeType::String,
            "integer" => AttributeType::Integer,
            "date" => AttributeType::Date,
            "datetime" => AttributeType::DateTime,
            "boolean" => AttributeType::Boolean,
            "float" => AttributeType::Float,
            "text" => AttributeType::Text,
            "email" => AttributeType::Email,
            "phone" => AttributeType::Phone,
            "url" => AttributeType::Url,
            other => AttributeType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed lead field beyond the core identity fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub attr_type: AttributeType,
    pub value: String,
}

impl Attribute {
    pub fn new(
        name: impl Into<String>,
        attr_type: impl Into<AttributeType>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            attr_type: attr_type.into(),
            value: value.into(),
        }
    }

    /// Writes `<list_name>` holding one `<attribute>` per entry, in input order.
    /// The wrapping element is written even for an empty slice.
    pub(crate) fn write_list(
        w: &mut XmlWriter,
        list_name: &str,
        attributes: &[Attribute],
    ) -> Result<()> {
        w.element(list_name, |w| {
            for attr in attributes {
                w.element("attribute", |w| {
                    w.text_element("attrName", &attr.name)?;
                    w.text_element("attrType", attr.attr_type.as_str())?;
                    w.text_element("attrValue", &attr.value)?;
                    Ok(())
                })?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

/// Collects the `<attribute>` children of `list` into a name → value map.
///
/// Entries without an `attrName` element are skipped; an empty name is kept.
/// A repeated name keeps the last value seen.
pub fn decode_list(list: &Element) -> HashMap<String, String> {
    list.children_named("attribute")
        .filter_map(|attr| {
            let name = attr.child("attrName")?.text.clone();
            let value = attr.child("attrValue").map(|v| v.text.clone());
            Some((name, value.unwrap_or_default()))
        })
        .collect()
}
