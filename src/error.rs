/*!
# Error types

This module holds the diagnostic type reported by the tokenizer through
[`EventSink::on_diagnostic`](crate::EventSink::on_diagnostic) and the error
type returned by the [`Encoder`](crate::writer::Encoder).

None of these are ever returned as a failed `Result` from parsing: the lexer
recovers from everything except running out of input inside a construct, and
even that is only reported, not raised.
*/
use std::error;
use std::fmt;

use sxml_validation::Error as ValidationError;

pub use crate::errctx::*;
use crate::sink::Name;

/// Coarse classification of a [`ScanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
	/// A malformed construct; the lexer rewinds and rescans it as text.
	Lexical,
	/// A malformed reference; its source text is kept literally.
	Reference,
	/// The input ended inside a construct; lexing stops.
	Exhaustion,
}

/// Violation of the XML grammar understood by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
	/// Codepoint which was not expected at that point in the grammar.
	///
	/// Context, codepoint encountered and, where one has been read already,
	/// the name of the construct.
	UnexpectedChar(&'static str, char, Option<Name>),

	/// `<!` followed by anything other than `--`.
	UnsupportedDeclaration,

	/// A processing instruction with the reserved target `xml`.
	XmlDeclaration,

	/// Attribute was declared multiple times in the same element.
	DuplicateAttribute(Name),

	/// Something resembling an attribute after the name of an end tag.
	EndTagAttributes(Name),

	/// `--` inside a comment, not followed by `>`.
	///
	/// Like every other diagnostic, this is reported at the scalar which
	/// broke the construct, i.e. the one following the `--`, not at the
	/// second hyphen.
	DoubleHyphenInComment,

	/// `&` followed by neither `#` nor a name start character.
	UnescapedAmpersand,

	/// Character reference to U+0000.
	NullCharReference,

	/// Character reference to a codepoint which is not allowed.
	InvalidCharReference(u32),

	/// A name, attribute value, reference or processing instruction exceeded
	/// [`LexerOptions::max_token_length`](crate::LexerOptions::max_token_length).
	TokenTooLong(&'static str),

	/// End of input encountered where more data was expected.
	///
	/// The contents are implementation details.
	InvalidEof(&'static str),
}

struct DisplayChar(char);

impl fmt::Display for DisplayChar {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		let ch = self.0;
		if ch.is_control() || ch == '\'' {
			write!(f, "U+{:04x}", ch as u32)
		} else {
			write!(f, "'{}'", ch)
		}
	}
}

impl ScanError {
	/// Classify the error by the way the lexer recovers from it.
	pub fn class(&self) -> ErrorClass {
		match self {
			Self::InvalidEof(ctx) if *ctx == ERRCTX_REF => ErrorClass::Reference,
			Self::TokenTooLong(ctx) if *ctx == ERRCTX_REF => ErrorClass::Reference,
			Self::InvalidEof(_) => ErrorClass::Exhaustion,
			Self::UnescapedAmpersand | Self::NullCharReference | Self::InvalidCharReference(_) => {
				ErrorClass::Reference
			}
			Self::UnexpectedChar(ctx, ..) if *ctx == ERRCTX_ENTITY_REF || *ctx == ERRCTX_CHAR_REF => {
				ErrorClass::Reference
			}
			_ => ErrorClass::Lexical,
		}
	}

	/// Return true if the lexer stops after reporting this error.
	pub fn is_fatal(&self) -> bool {
		self.class() == ErrorClass::Exhaustion
	}
}

impl error::Error for ScanError {}

impl fmt::Display for ScanError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::UnexpectedChar(ctx, ch, Some(name)) => {
				write!(f, "unexpected {} {} '{}'", DisplayChar(*ch), ctx, name)
			}
			Self::UnexpectedChar(ctx, ch, None) => write!(f, "unexpected {} {}", DisplayChar(*ch), ctx),
			Self::UnsupportedDeclaration => {
				f.write_str("unsupported declaration: only comments may follow '<!'")
			}
			Self::XmlDeclaration => f.write_str("XML declarations are unsupported"),
			Self::DuplicateAttribute(name) => write!(f, "redefinition of attribute '{}'", name),
			Self::EndTagAttributes(name) => write!(f, "end tag '{}' cannot contain attributes", name),
			Self::DoubleHyphenInComment => {
				f.write_str("unexpected double hyphen '--' inside comment body")
			}
			Self::UnescapedAmpersand => f.write_str("unescaped ampersand '&'"),
			Self::NullCharReference => f.write_str("cannot reference null character U+0000"),
			Self::InvalidCharReference(cp) => write!(f, "cannot reference illegal character U+{:x}", cp),
			Self::TokenTooLong(ctx) => write!(f, "token too long {}", ctx),
			Self::InvalidEof(ctx) => write!(f, "unexpected end of stream {}", ctx),
		}
	}
}

/// Failure to turn an [`Event`](crate::Event) into markup.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeError {
	/// An element, attribute or processing instruction name is not a valid
	/// XML Name.
	InvalidName(Name, ValidationError),

	/// Text or attribute value contains a codepoint which cannot be written.
	InvalidText(ValidationError),

	/// Processing instruction data would terminate the instruction early.
	InvalidPiData,
}

impl error::Error for EncodeError {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Self::InvalidName(_, e) | Self::InvalidText(e) => Some(e),
			Self::InvalidPiData => None,
		}
	}
}

impl fmt::Display for EncodeError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidName(name, e) => write!(f, "invalid name {:?}: {}", name.as_str(), e),
			Self::InvalidText(e) => write!(f, "invalid text: {}", e),
			Self::InvalidPiData => f.write_str("processing instruction data must not contain '?>'"),
		}
	}
}

impl From<ValidationError> for EncodeError {
	fn from(other: ValidationError) -> Self {
		Self::InvalidText(other)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_construct() {
		let e = ScanError::UnexpectedChar(ERRCTX_START_TAG, '!', Some("foo".into()));
		assert_eq!(e.to_string(), "unexpected '!' in start tag 'foo'");
		let e = ScanError::UnexpectedChar(ERRCTX_MARKUP_START, '\n', None);
		assert_eq!(e.to_string(), "unexpected U+000a after left angle bracket '<'");
		let e = ScanError::DuplicateAttribute("b".into());
		assert_eq!(e.to_string(), "redefinition of attribute 'b'");
	}

	#[test]
	fn classification() {
		assert_eq!(ScanError::InvalidEof(ERRCTX_MARKUP).class(), ErrorClass::Exhaustion);
		assert!(ScanError::InvalidEof(ERRCTX_MARKUP).is_fatal());
		assert_eq!(ScanError::InvalidEof(ERRCTX_REF).class(), ErrorClass::Reference);
		assert_eq!(ScanError::TokenTooLong(ERRCTX_REF).class(), ErrorClass::Reference);
		assert_eq!(ScanError::TokenTooLong(ERRCTX_ATTVAL).class(), ErrorClass::Lexical);
		assert!(!ScanError::InvalidEof(ERRCTX_REF).is_fatal());
		assert_eq!(ScanError::NullCharReference.class(), ErrorClass::Reference);
		assert_eq!(
			ScanError::UnexpectedChar(ERRCTX_CHAR_REF, 'z', None).class(),
			ErrorClass::Reference
		);
		assert_eq!(ScanError::DoubleHyphenInComment.class(), ErrorClass::Lexical);
		assert_eq!(ScanError::UnsupportedDeclaration.class(), ErrorClass::Lexical);
	}
}
