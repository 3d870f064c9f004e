//! Common types shared between the JSON token source and the XML encoder

use serde::Deserialize;
use serde_json::Number;

/// Name of the document root element
pub(crate) const ROOT_ELEMENT: &str = "data";
/// Name of the element wrapping a scalar value
pub(crate) const ENTRY_ELEMENT: &str = "entry";
/// Attribute carrying an object member name
pub(crate) const KEY_ATTRIBUTE: &str = "key";

/// A lexical JSON token, in document order.
///
/// Object member names arrive as plain [`JsonToken::String`] tokens; inside an
/// object, strings alternate between name and value.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonToken {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

/// Kind of an open JSON container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    Object,
    Array,
}

impl Container {
    /// Returns the XML element name used for this container
    pub(crate) fn element_name(self) -> &'static str {
        match self {
            Container::Object => "map",
            Container::Array => "array",
        }
    }

    /// Returns the JSON delimiter that closes this container
    pub(crate) fn close_char(self) -> char {
        match self {
            Container::Object => '}',
            Container::Array => ']',
        }
    }
}

/// How a JSON `null` is rendered as an `entry` element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullStyle {
    /// `<entry/>`
    #[default]
    SelfClosing,
    /// `<entry></entry>`
    Empty,
    /// `<entry>null</entry>`
    Literal,
}
