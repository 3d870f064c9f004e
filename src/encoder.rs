//! JSON token to XML encoder implementation

use crate::common::{
    Container, JsonToken, NullStyle, ENTRY_ELEMENT, KEY_ATTRIBUTE, ROOT_ELEMENT,
};
use crate::error::ConvertError;
use log::{debug, trace, warn};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Deserialize;
use serde_json::Number;
use std::io::Write;

/// Conversion options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Rendering of JSON `null` values (default: SelfClosing)
    pub null: NullStyle,
}

/// Transcode a sequence of JSON tokens into XML written to `output`.
///
/// Tokens are pulled one at a time and their XML is written before the next
/// token is requested. Returns the writer once `</data>` has been flushed.
pub fn transcode<I, W>(tokens: I, output: W, options: &ConvertOptions) -> Result<W, ConvertError>
where
    I: IntoIterator<Item = Result<JsonToken, ConvertError>>,
    W: Write,
{
    let mut transcoder = Transcoder::new(output, options)?;
    for token in tokens {
        transcoder.push(token?)?;
    }
    transcoder.finish()
}

/// Streaming state machine turning JSON tokens into XML events.
///
/// Holds a stack of open containers (with a sentinel for the top level) and a
/// single pending object key. Inside an object, a string is a member name when
/// no key is pending and that key's value otherwise.
pub struct Transcoder<'a, W: Write> {
    writer: Writer<W>,
    options: &'a ConvertOptions,
    stack: Vec<Container>,
    pending_key: Option<String>,
    tokens: usize,
}

impl<'a, W: Write> Transcoder<'a, W> {
    /// Create a transcoder and write the opening `<data>` tag.
    pub fn new(output: W, options: &'a ConvertOptions) -> Result<Self, ConvertError> {
        debug!("starting JSON to XML conversion");
        let mut writer = Writer::new(output);
        writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
        Ok(Self {
            writer,
            options,
            stack: vec![Container::Array],
            pending_key: None,
            tokens: 0,
        })
    }

    /// Number of currently open JSON containers
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Consume one token, writing whatever XML it completes.
    pub fn push(&mut self, token: JsonToken) -> Result<(), ConvertError> {
        trace!("token {:?} at depth {}", token, self.depth());
        self.tokens += 1;
        match token {
            JsonToken::BeginObject => self.open(Container::Object),
            JsonToken::BeginArray => self.open(Container::Array),
            JsonToken::EndObject => self.close(Container::Object),
            JsonToken::EndArray => self.close(Container::Array),
            JsonToken::String(s) => self.string(s),
            JsonToken::Number(n) => {
                let key = self.pending_key.take();
                self.write_entry(key.as_deref(), &render_number(&n))
            }
            JsonToken::Bool(b) => {
                let key = self.pending_key.take();
                self.write_entry(key.as_deref(), if b { "true" } else { "false" })
            }
            JsonToken::Null => self.null(),
        }
    }

    /// Write `</data>`, flush, and hand back the destination.
    ///
    /// Fails if any container is still open.
    pub fn finish(mut self) -> Result<W, ConvertError> {
        let open = self.depth();
        if open > 0 {
            return Err(ConvertError::UnterminatedContainer { open });
        }
        self.writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
        self.writer.get_mut().flush()?;
        debug!("finished JSON to XML conversion after {} tokens", self.tokens);
        Ok(self.writer.into_inner())
    }

    fn open(&mut self, container: Container) -> Result<(), ConvertError> {
        let start = self.start_element(container.element_name());
        self.writer.write_event(Event::Start(start))?;
        self.stack.push(container);
        Ok(())
    }

    fn close(&mut self, container: Container) -> Result<(), ConvertError> {
        // The sentinel at index 0 is never popped.
        if self.stack.len() < 2 || self.stack.last() != Some(&container) {
            return Err(ConvertError::MismatchedClose {
                found: container.close_char(),
            });
        }
        if let Some(orphan) = self.pending_key.take() {
            warn!("key {:?} has no value, writing it as a plain entry", orphan);
            self.write_entry(None, &orphan)?;
        }
        self.stack.pop();
        self.writer.write_event(Event::End(BytesEnd::new(container.element_name())))?;
        Ok(())
    }

    fn string(&mut self, s: String) -> Result<(), ConvertError> {
        if self.stack.last() != Some(&Container::Object) {
            return self.write_entry(None, &s);
        }
        match self.pending_key.take() {
            Some(key) => self.write_entry(Some(&key), &s),
            None => {
                self.pending_key = Some(s);
                Ok(())
            }
        }
    }

    fn null(&mut self) -> Result<(), ConvertError> {
        match self.options.null {
            NullStyle::SelfClosing => {
                let start = self.start_element(ENTRY_ELEMENT);
                self.writer.write_event(Event::Empty(start))?;
                Ok(())
            }
            NullStyle::Empty => {
                let key = self.pending_key.take();
                self.write_entry(key.as_deref(), "")
            }
            NullStyle::Literal => {
                let key = self.pending_key.take();
                self.write_entry(key.as_deref(), "null")
            }
        }
    }

    /// Build a start tag, consuming the pending key as its `key` attribute
    fn start_element(&mut self, name: &'static str) -> BytesStart<'static> {
        let mut start = BytesStart::new(name);
        if let Some(key) = self.pending_key.take() {
            start.push_attribute((KEY_ATTRIBUTE, key.as_str()));
        }
        start
    }

    fn write_entry(&mut self, key: Option<&str>, text: &str) -> Result<(), ConvertError> {
        let mut start = BytesStart::new(ENTRY_ELEMENT);
        if let Some(key) = key {
            start.push_attribute((KEY_ATTRIBUTE, key));
        }
        self.writer.write_event(Event::Start(start))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(ENTRY_ELEMENT)))?;
        Ok(())
    }
}

/// Canonical text of a JSON number.
///
/// Integers print as integers. Floats use the shortest round-tripping form,
/// without a `.0` on whole values, and zero of either sign is `0`.
fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    if n.as_f64() == Some(0.0) {
        return "0".to_string();
    }
    let s = n.to_string();
    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => s.split_at(idx),
        None => (s.as_str(), ""),
    };
    let mantissa = mantissa.strip_suffix(".0").unwrap_or(mantissa);
    format!("{mantissa}{exponent}")
}
