/*!
# Entity and character reference resolution

Shared by text scanning and attribute value scanning. The resolver is entered
right after the `&` has been consumed and reads through the same
[`Cursor`] as the state machine, so positions stay exact.
*/
use smartstring::alias::String as SmartString;

use sxml_validation::{is_char_reference_target, is_name_char, is_name_start_char};

use super::read::Cursor;
use crate::error::{ScanError, ERRCTX_CHAR_REF, ERRCTX_ENTITY_REF, ERRCTX_REF};

/// The five predefined XML entities.
pub static NAMED_ENTITIES: &'static [(&'static str, char)] = &[
	("amp", '&'),
	("lt", '<'),
	("gt", '>'),
	("apos", '\''),
	("quot", '"'),
];

/// Look up one of the predefined entities by name.
pub fn resolve_named_entity(name: &str) -> Option<char> {
	NAMED_ENTITIES
		.iter()
		.find(|(candidate, _)| *candidate == name)
		.map(|(_, ch)| *ch)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RefState {
	/// Just after `&`
	Initial,
	Name,
	/// `&#`
	Hash,
	/// `&#x`
	HexStart,
	Decimal(u32),
	Hexadecimal(u32),
}

// saturates instead of wrapping, so that overlong references end up as an
// invalid codepoint
#[inline]
fn accumulate(acc: u32, radix: u32, digit: u32) -> u32 {
	acc.checked_mul(radix)
		.and_then(|v| v.checked_add(digit))
		.unwrap_or(u32::MAX)
}

fn finish_char_reference<I: Iterator<Item = char> + Clone>(
	codepoint: u32,
	cursor: &mut Cursor<I>,
	raw: &str,
	into: &mut String,
) -> Option<ScanError> {
	if codepoint == 0 {
		into.push_str(raw);
		return Some(ScanError::NullCharReference);
	}
	match std::char::from_u32(codepoint) {
		Some(ch) if is_char_reference_target(codepoint) => {
			// consume the `;`
			cursor.bump();
			into.push(ch);
			None
		}
		_ => {
			into.push_str(raw);
			Some(ScanError::InvalidCharReference(codepoint))
		}
	}
}

/// Read a reference and append its expansion to `into`.
///
/// On success, the terminating `;` has been consumed. On failure, the source
/// text read so far (including the `&`) is appended instead and the scalar
/// which broke the reference is left unconsumed, so that the cursor position
/// is the position to report. Unknown entity names are not an error: they are
/// appended verbatim, `;` included.
///
/// The source text buffered for one reference (including the `&`) is limited
/// to `limit` bytes; the scalar which would exceed it breaks the reference.
pub(crate) fn read_reference<I: Iterator<Item = char> + Clone>(
	cursor: &mut Cursor<I>,
	into: &mut String,
	limit: usize,
) -> Option<ScanError> {
	let mut raw = SmartString::new();
	raw.push('&');
	let mut state = RefState::Initial;
	let err = loop {
		let ch = match cursor.current() {
			Some(ch) => ch,
			None => break ScanError::InvalidEof(ERRCTX_REF),
		};
		state = match (state, ch) {
			(RefState::Initial, '#') => RefState::Hash,
			(RefState::Initial, ch) if is_name_start_char(ch) => RefState::Name,
			(RefState::Initial, _) => break ScanError::UnescapedAmpersand,

			(RefState::Name, ';') => {
				cursor.bump();
				match resolve_named_entity(&raw.as_str()[1..]) {
					Some(resolved) => into.push(resolved),
					None => {
						into.push_str(&raw);
						into.push(';');
					}
				}
				return None;
			}
			(RefState::Name, ch) if is_name_char(ch) => RefState::Name,
			(RefState::Name, ch) => break ScanError::UnexpectedChar(ERRCTX_ENTITY_REF, ch, None),

			(RefState::Hash, 'x') => RefState::HexStart,
			(RefState::Hash, ch) => match ch.to_digit(10) {
				Some(d) => RefState::Decimal(d),
				None => break ScanError::UnexpectedChar(ERRCTX_CHAR_REF, ch, None),
			},

			(RefState::HexStart, ch) => match ch.to_digit(16) {
				Some(d) => RefState::Hexadecimal(d),
				None => break ScanError::UnexpectedChar(ERRCTX_CHAR_REF, ch, None),
			},

			(RefState::Decimal(acc), ';') | (RefState::Hexadecimal(acc), ';') => {
				return finish_char_reference(acc, cursor, &raw, into);
			}
			(RefState::Decimal(acc), ch) => match ch.to_digit(10) {
				Some(d) => RefState::Decimal(accumulate(acc, 10, d)),
				None => break ScanError::UnexpectedChar(ERRCTX_CHAR_REF, ch, None),
			},
			(RefState::Hexadecimal(acc), ch) => match ch.to_digit(16) {
				Some(d) => RefState::Hexadecimal(accumulate(acc, 16, d)),
				None => break ScanError::UnexpectedChar(ERRCTX_CHAR_REF, ch, None),
			},
		};
		if raw.len() + ch.len_utf8() > limit {
			break ScanError::TokenTooLong(ERRCTX_REF);
		}
		raw.push(ch);
		cursor.bump();
	};
	into.push_str(&raw);
	Some(err)
}
