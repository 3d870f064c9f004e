//! JSON decoding front end: drives `serde_json` in streaming mode and feeds
//! each token to the encoder as soon as it is lexed.
//!
//! No `serde_json::Value` is built. The seed below visits the document and
//! pushes `JsonToken`s into a [`Transcoder`], so memory use is bounded by the
//! nesting depth rather than the document size. serde_json's recursion limit
//! is lifted and `serde_stacker` grows the stack on demand, so nesting depth
//! is not capped.

use crate::common::JsonToken;
use crate::encoder::{ConvertOptions, Transcoder};
use crate::error::ConvertError;
use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde_json::{Deserializer, Number};
use std::fmt;
use std::io::{self, BufReader, Read, Write};

/// Convert JSON read from `input` into XML written to `output`.
///
/// Any number of whitespace-separated top-level values is accepted, each
/// becoming one child of `<data>`. On error, whatever XML was already
/// written stays in `output`.
pub fn to_writer<R, W>(input: R, output: W, options: &ConvertOptions) -> Result<(), ConvertError>
where
    R: Read,
    W: Write,
{
    let mut transcoder = Transcoder::new(output, options)?;
    let mut de = Deserializer::from_reader(BufReader::new(input));
    feed_all(&mut de, &mut transcoder)?;
    transcoder.finish()?;
    Ok(())
}

/// Convert a JSON string into an XML string
pub fn to_string(input: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
    let mut transcoder = Transcoder::new(Vec::with_capacity(input.len()), options)?;
    let mut de = Deserializer::from_str(input);
    feed_all(&mut de, &mut transcoder)?;
    let bytes = transcoder.finish()?;
    String::from_utf8(bytes)
        .map_err(|err| ConvertError::Emit(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Stream every top-level value in `de` into `sink` until end of input.
fn feed_all<'de, R, W>(
    de: &mut Deserializer<R>,
    sink: &mut Transcoder<'_, W>,
) -> Result<(), ConvertError>
where
    R: serde_json::de::Read<'de>,
    W: Write,
{
    de.disable_recursion_limit();
    loop {
        // `end` only skips whitespace; a syntax error means another value
        // (or garbage, which `feed` then reports) follows.
        match de.end() {
            Ok(()) => return Ok(()),
            Err(err) if err.is_syntax() => feed(de, sink)?,
            Err(err) => return Err(err.into()),
        }
    }
}

/// Stream one JSON value from `de` into `sink`.
fn feed<'de, R, W>(
    de: &mut Deserializer<R>,
    sink: &mut Transcoder<'_, W>,
) -> Result<(), ConvertError>
where
    R: serde_json::de::Read<'de>,
    W: Write,
{
    let mut failure = None;
    let seed = TokenSeed {
        sink,
        failure: &mut failure,
    };
    match seed.deserialize(serde_stacker::Deserializer::new(de)) {
        Ok(()) => Ok(()),
        // A failure recorded by the visitor takes precedence over the
        // stringified copy serde_json carried out of the parser.
        Err(err) => Err(failure.unwrap_or(ConvertError::Tokenize(err))),
    }
}

/// Visits one JSON value, pushing its tokens into the transcoder.
struct TokenSeed<'s, 'a, W: Write> {
    sink: &'s mut Transcoder<'a, W>,
    failure: &'s mut Option<ConvertError>,
}

impl<'a, W: Write> TokenSeed<'_, 'a, W> {
    fn reborrow(&mut self) -> TokenSeed<'_, 'a, W> {
        TokenSeed {
            sink: &mut *self.sink,
            failure: &mut *self.failure,
        }
    }

    fn emit<E: de::Error>(&mut self, token: JsonToken) -> Result<(), E> {
        self.sink.push(token).map_err(|err| self.fail(err))
    }

    fn unexpected<E: de::Error>(mut self, kind: &'static str) -> Result<(), E> {
        Err(self.fail(ConvertError::UnexpectedToken { kind }))
    }

    fn fail<E: de::Error>(&mut self, err: ConvertError) -> E {
        let msg = err.to_string();
        *self.failure = Some(err);
        E::custom(msg)
    }
}

impl<'de, W: Write> DeserializeSeed<'de> for TokenSeed<'_, '_, W> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, W: Write> Visitor<'de> for TokenSeed<'_, '_, W> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(mut self, v: bool) -> Result<(), E> {
        self.emit(JsonToken::Bool(v))
    }

    fn visit_i64<E: de::Error>(mut self, v: i64) -> Result<(), E> {
        self.emit(JsonToken::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(mut self, v: u64) -> Result<(), E> {
        self.emit(JsonToken::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(mut self, v: f64) -> Result<(), E> {
        match Number::from_f64(v) {
            Some(n) => self.emit(JsonToken::Number(n)),
            None => self.unexpected("non-finite number"),
        }
    }

    fn visit_str<E: de::Error>(mut self, v: &str) -> Result<(), E> {
        self.emit(JsonToken::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(mut self, v: String) -> Result<(), E> {
        self.emit(JsonToken::String(v))
    }

    fn visit_bytes<E: de::Error>(self, _v: &[u8]) -> Result<(), E> {
        self.unexpected("byte string")
    }

    fn visit_unit<E: de::Error>(mut self) -> Result<(), E> {
        self.emit(JsonToken::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        self.unexpected("option")
    }

    fn visit_some<D>(self, _deserializer: D) -> Result<(), D::Error>
    where
        D: de::Deserializer<'de>,
    {
        self.unexpected("option")
    }

    fn visit_newtype_struct<D>(self, _deserializer: D) -> Result<(), D::Error>
    where
        D: de::Deserializer<'de>,
    {
        self.unexpected("newtype struct")
    }

    fn visit_enum<A>(self, _data: A) -> Result<(), A::Error>
    where
        A: de::EnumAccess<'de>,
    {
        self.unexpected("enum")
    }

    fn visit_seq<A>(mut self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        self.emit(JsonToken::BeginArray)?;
        while seq.next_element_seed(self.reborrow())?.is_some() {}
        self.emit(JsonToken::EndArray)
    }

    fn visit_map<A>(mut self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        self.emit(JsonToken::BeginObject)?;
        // Member names go through `visit_str` like any other string.
        while map.next_key_seed(self.reborrow())?.is_some() {
            map.next_value_seed(self.reborrow())?;
        }
        self.emit(JsonToken::EndObject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::NullStyle;
    use serde_json::json;

    fn convert(input: &str) -> String {
        to_string(input, &ConvertOptions::default()).unwrap()
    }

    #[test]
    fn test_reference_document() {
        let input = r#"{"whatever":["foo",3.45,"bar",1],"something":{"another":"object","and an":["array"]}}"#;
        let expected = "<data><map><array key=\"whatever\"><entry>foo</entry><entry>3.45</entry>\
                        <entry>bar</entry><entry>1</entry></array><map key=\"something\">\
                        <entry key=\"another\">object</entry><array key=\"and an\">\
                        <entry>array</entry></array></map></map></data>";
        assert_eq!(convert(input), expected);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(convert("{}"), "<data><map></map></data>");
        assert_eq!(convert("[]"), "<data><array></array></data>");
    }

    #[test]
    fn test_bare_scalars() {
        assert_eq!(convert("42"), "<data><entry>42</entry></data>");
        assert_eq!(convert("true"), "<data><entry>true</entry></data>");
        assert_eq!(convert("\"hi\""), "<data><entry>hi</entry></data>");
        assert_eq!(convert("null"), "<data><entry/></data>");
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(
            convert("[-7, 0, 2.5, 18446744073709551615]"),
            "<data><array><entry>-7</entry><entry>0</entry><entry>2.5</entry>\
             <entry>18446744073709551615</entry></array></data>"
        );
    }

    #[test]
    fn test_string_that_looks_like_key() {
        // A value equal to a member name is still a value.
        assert_eq!(
            convert(r#"{"a":"a","b":"a"}"#),
            "<data><map><entry key=\"a\">a</entry><entry key=\"b\">a</entry></map></data>"
        );
    }

    #[test]
    fn test_json_escapes_are_decoded() {
        assert_eq!(
            convert(r#"{"line":"one\ntwo é"}"#),
            "<data><map><entry key=\"line\">one\ntwo é</entry></map></data>"
        );
    }

    #[test]
    fn test_null_option() {
        let options = ConvertOptions {
            null: NullStyle::Literal,
        };
        let xml = to_string(&json!({"gone": null}).to_string(), &options).unwrap();
        assert_eq!(xml, "<data><map><entry key=\"gone\">null</entry></map></data>");
    }

    #[test]
    fn test_truncated_input() {
        let err = to_string("[1, 2", &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Tokenize(_)));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(convert(""), "<data></data>");
        assert_eq!(convert("  \n\t"), "<data></data>");
    }

    #[test]
    fn test_multiple_top_level_values() {
        assert_eq!(
            convert("1 2"),
            "<data><entry>1</entry><entry>2</entry></data>"
        );
        assert_eq!(
            convert("{} [\"x\"]\n null"),
            "<data><map></map><array><entry>x</entry></array><entry/></data>"
        );
    }

    #[test]
    fn test_garbage_after_value() {
        let mut out = Vec::new();
        let err = to_writer(&b"[1] ?"[..], &mut out, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Tokenize(_)));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<data><array><entry>1</entry></array>"
        );
    }

    #[test]
    fn test_float_numbers_are_canonical() {
        assert_eq!(convert("1.0"), "<data><entry>1</entry></data>");
        assert_eq!(convert("1E2"), "<data><entry>100</entry></data>");
        assert_eq!(convert("-0.0"), "<data><entry>0</entry></data>");
        assert_eq!(
            convert(r#"{"x":2.50}"#),
            "<data><map><entry key=\"x\">2.5</entry></map></data>"
        );
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 10_000;
        let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let expected = format!(
            "<data>{}{}</data>",
            "<array>".repeat(depth),
            "</array>".repeat(depth)
        );
        assert_eq!(convert(&input), expected);

        let mut out = Vec::new();
        to_writer(input.as_bytes(), &mut out, &ConvertOptions::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_deep_objects() {
        let depth = 500;
        let input = format!("{}1{}", r#"{"k":"#.repeat(depth), "}".repeat(depth));
        let xml = convert(&input);
        assert!(xml.starts_with("<data><map><map key=\"k\"><map key=\"k\">"));
        assert!(xml.ends_with("<entry key=\"k\">1</entry></map></map></data>"));
        assert_eq!(xml.matches("<map").count(), depth);
    }

    #[test]
    fn test_partial_output_is_kept() {
        let mut out = Vec::new();
        let err = to_writer(&b"[1, 2, oops]"[..], &mut out, &ConvertOptions::default());
        assert!(matches!(err, Err(ConvertError::Tokenize(_))));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<data><array><entry>1</entry><entry>2</entry>"
        );
    }

    struct FailingWriter {
        budget: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.len() > self.budget {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.budget -= buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_emit_failure_surfaces_as_emit_error() {
        let sink = FailingWriter { budget: 16 };
        let input = &br#"{"key":"a fairly long value that will not fit"}"#[..];
        let err = to_writer(input, sink, &ConvertOptions::default()).unwrap_err();
        match err {
            ConvertError::Emit(io_err) => assert_eq!(io_err.to_string(), "disk full"),
            other => panic!("expected Emit, got {other:?}"),
        }
    }

    #[test]
    fn test_root_write_failure() {
        let sink = FailingWriter { budget: 0 };
        let err = to_writer(&b"1"[..], sink, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Emit(_)));
    }
}
