/*!
# Writer for tokenizer events

Turns [`Event`]s back into markup. Everything the [`Lexer`](crate::Lexer)
produces for well-formed input encodes into markup which lexes to the same
events again.
*/
use bytes::{BufMut, BytesMut};

use sxml_validation::selectors::{CharSelector, CLASS_CHAR_REFERENCE, CLASS_XML_CHAR};
use sxml_validation::{validate_cdata, validate_name, Error as ValidationError};

use crate::error::EncodeError;
use crate::sink::{Attributes, Event, Name};

const TEXT_SPECIALS: &'static [char] = &['<', '>', '&'];

const ATTR_SPECIALS: &'static [char] = &['"', '<', '&'];

/// Write `data`, replacing specials with entities and scalars which may not
/// appear literally (such as U+0001) with character references.
///
/// `data` must have passed [`check_text`].
fn escape<'a, B: BufMut>(out: &'a mut B, data: &'a str, specials: &'static [char]) {
	let mut last_index = 0;
	for (i, ch) in data.char_indices() {
		let literal = CLASS_XML_CHAR.select(ch);
		if literal && !specials.contains(&ch) {
			continue;
		}
		if i > last_index {
			out.put_slice(data[last_index..i].as_bytes());
		}
		match ch {
			'"' => out.put_slice(b"&quot;"),
			'<' => out.put_slice(b"&lt;"),
			'>' => out.put_slice(b"&gt;"),
			'&' => out.put_slice(b"&amp;"),
			ch => out.put_slice(format!("&#x{:x};", ch as u32).as_bytes()),
		}
		last_index = i + ch.len_utf8();
	}
	out.put_slice(data[last_index..].as_bytes());
}

/// Check that every scalar of `text` can be written, either literally or as
/// a character reference.
fn check_text(text: &str) -> Result<(), EncodeError> {
	match text.chars().find(|ch| !CLASS_CHAR_REFERENCE.select(*ch)) {
		Some(ch) => Err(EncodeError::InvalidText(ValidationError::InvalidChar(ch))),
		None => Ok(()),
	}
}

fn check_name(name: &Name) -> Result<(), EncodeError> {
	validate_name(name).map_err(|e| EncodeError::InvalidName(name.clone(), e))
}

/**
Encodes events into buffers.

The encoder keeps no state between events: it does not check that tags
nest, it only ensures that each single event is written as valid markup.
Attributes are written sorted by name so that the output is deterministic.

```rust
use bytes::BytesMut;
use sxml::{Encoder, Event};

let enc = Encoder::new();
let mut buf = BytesMut::new();
enc.encode_event(&Event::Data("1 < 2".to_string()), &mut buf).unwrap();
assert_eq!(&buf[..], b"1 &lt; 2");
```
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
	_priv: (),
}

impl Encoder {
	/// Create a new encoder.
	pub fn new() -> Self {
		Self { _priv: () }
	}

	fn encode_head<O: BufMut>(
		&self,
		name: &Name,
		attributes: &Attributes,
		output: &mut O,
	) -> Result<(), EncodeError> {
		check_name(name)?;
		let mut attrs: Vec<_> = attributes.iter().collect();
		attrs.sort_by(|a, b| a.0.cmp(b.0));
		for (key, value) in attrs.iter() {
			check_name(key)?;
			check_text(value)?;
		}
		output.put_u8(b'<');
		output.put_slice(name.as_bytes());
		for (key, value) in attrs {
			output.put_u8(b' ');
			output.put_slice(key.as_bytes());
			output.put_slice(b"=\"");
			escape(output, value, ATTR_SPECIALS);
			output.put_u8(b'"');
		}
		Ok(())
	}

	/// Encode a single event into a buffer.
	///
	/// Nothing is written if an error is returned. Diagnostics encode to
	/// nothing at all.
	pub fn encode<O: BufMut>(&self, ev: &Event, output: &mut O) -> Result<(), EncodeError> {
		match ev {
			Event::Data(text) => {
				check_text(text)?;
				escape(output, text, TEXT_SPECIALS);
			}
			Event::TagOpen(name, attrs) => {
				self.encode_head(name, attrs, output)?;
				output.put_u8(b'>');
			}
			Event::TagEmpty(name, attrs) => {
				self.encode_head(name, attrs, output)?;
				output.put_slice(b"/>");
			}
			Event::TagClose(name) => {
				check_name(name)?;
				output.put_slice(b"</");
				output.put_slice(name.as_bytes());
				output.put_u8(b'>');
			}
			Event::ProcessingInstruction(target, data) => {
				check_name(target)?;
				if target.eq_ignore_ascii_case("xml") || data.contains("?>") {
					return Err(EncodeError::InvalidPiData);
				}
				validate_cdata(data)?;
				output.put_slice(b"<?");
				output.put_slice(target.as_bytes());
				if !data.is_empty() {
					output.put_u8(b' ');
					output.put_slice(data.as_bytes());
				}
				output.put_slice(b"?>");
			}
			Event::Diagnostic(..) => (),
		}
		Ok(())
	}

	/// Encode a single event into a BytesMut.
	///
	/// This reserves a rough estimate of the required space up front.
	pub fn encode_event(&self, ev: &Event, output: &mut BytesMut) -> Result<(), EncodeError> {
		let hint = match ev {
			Event::Data(text) => text.len(),
			Event::TagOpen(name, attrs) | Event::TagEmpty(name, attrs) => {
				name.len() + 3 + attrs.iter().map(|(k, v)| k.len() + v.len() + 4).sum::<usize>()
			}
			Event::TagClose(name) => name.len() + 3,
			Event::ProcessingInstruction(target, data) => target.len() + data.len() + 5,
			Event::Diagnostic(..) => 0,
		};
		output.reserve(hint);
		self.encode(ev, output)
	}

	/// Encode a sequence of events, stopping at the first error.
	pub fn encode_all<'x, I: IntoIterator<Item = &'x Event>>(
		&self,
		events: I,
		output: &mut BytesMut,
	) -> Result<(), EncodeError> {
		for ev in events {
			self.encode_event(ev, output)?;
		}
		Ok(())
	}
}
