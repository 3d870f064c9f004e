//! # json2xml_rs
//!
//! A streaming JSON → XML transcoder.
//!
//! JSON is read token by token and XML is written as soon as each token is
//! seen, so documents of any size convert in constant memory (bounded by the
//! nesting depth). Objects become `map` elements, arrays become `array`
//! elements, and scalars become `entry` elements. Object member names are
//! carried as `key` attributes on the element holding the member's value, and
//! everything is wrapped in a single `data` root.
//!
//! ## Example
//!
//! ```rust
//! use json2xml_rs::{to_string, ConvertOptions};
//!
//! let json = r#"{"name": "Alice", "tags": ["admin", 7], "active": true}"#;
//! let xml = to_string(json, &ConvertOptions::default()).unwrap();
//! assert_eq!(
//!     xml,
//!     "<data><map><entry key=\"name\">Alice</entry>\
//!      <array key=\"tags\"><entry>admin</entry><entry>7</entry></array>\
//!      <entry key=\"active\">true</entry></map></data>"
//! );
//! ```
//!
//! Readers and writers are streamed with [`to_writer`]; an already tokenized
//! input can be fed through [`transcode`] or a [`Transcoder`] directly.

mod common;
mod decoder;
mod encoder;
mod error;

// Re-export public API
pub use common::{JsonToken, NullStyle};
pub use decoder::{to_string, to_writer};
pub use encoder::{transcode, ConvertOptions, Transcoder};
pub use error::ConvertError;
