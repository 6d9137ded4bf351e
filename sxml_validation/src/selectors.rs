/*!
# Constants and Utilities for matching ranges of codepoints

The contents of this module are implementation details of `sxml` and
`sxml_validation` and should not be relied upon.
*/
use std::fmt;

/**
# Predicate trait for matching chars
*/
pub trait CharSelector {
	/// Return true if the given char is selected by the selector
	fn select(&self, c: char) -> bool;
}

impl CharSelector for char {
	fn select(&self, c: char) -> bool {
		*self == c
	}
}

impl CharSelector for &'_ [char] {
	fn select(&self, c: char) -> bool {
		self.iter().any(|r| *r == c)
	}
}

// start to end (incl., because some of our edge points are not valid chars
// in rust)
/// Selects all chars from a range (including both ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointRange(pub char, pub char);

impl CodepointRange {
	pub fn contains(&self, c: char) -> bool {
		(self.0 <= c) && (c <= self.1)
	}
}

/// Codepoints which a character reference may expand to.
///
/// This is deliberately wider than the XML 1.0 `Char` production at the low
/// end: everything from U+0001 up is accepted, only NUL, surrogates and the
/// two non-characters U+FFFE/U+FFFF are excluded.
pub const VALID_CHAR_REFERENCE_RANGES: &'static [CodepointRange] = &[
	CodepointRange('\u{0001}', '\u{d7ff}'),
	CodepointRange('\u{e000}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{10ffff}'),
];

/// Valid codepoints for character data (XML 1.0 § 2.2)
pub const VALID_XML_CDATA_RANGES: &'static [CodepointRange] = &[
	CodepointRange('\x09', '\x0a'),
	CodepointRange('\x0d', '\x0d'),
	CodepointRange('\u{0020}', '\u{d7ff}'),
	CodepointRange('\u{e000}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{10ffff}'),
];

// XML 1.0 § 2.3 [4]
const VALID_XML_NAME_START_RANGES: &'static [CodepointRange] = &[
	CodepointRange(':', ':'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{2ff}'),
	CodepointRange('\u{370}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

// XML 1.0 § 2.3 [4a]
const VALID_XML_NAME_RANGES: &'static [CodepointRange] = &[
	CodepointRange(':', ':'),
	CodepointRange('-', '-'),
	CodepointRange('.', '.'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('0', '9'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{b7}', '\u{b7}'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{2ff}'),
	CodepointRange('\u{300}', '\u{36f}'),
	CodepointRange('\u{370}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{203f}', '\u{2040}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

// XML 1.0 § 2.3 [3]
const XML_SPACE_CHARS: &'static [CodepointRange] = &[
	CodepointRange('\t', '\n'),
	CodepointRange('\r', '\r'),
	CodepointRange(' ', ' '),
];

/// Selects all chars from any of the contained ranges
#[derive(Clone, Copy)]
pub struct CodepointRanges(pub &'static [CodepointRange]);

/// Valid non-first characters for an XML Name (XML 1.0 § 2.3 \[4a\])
pub static CLASS_XML_NAME: CodepointRanges = CodepointRanges(VALID_XML_NAME_RANGES);

/// Valid first characters for an XML Name (XML 1.0 § 2.3 \[4\])
pub static CLASS_XML_NAMESTART: CodepointRanges = CodepointRanges(VALID_XML_NAME_START_RANGES);

/// XML whitespace (XML 1.0 § 2.3 \[3\])
pub static CLASS_XML_SPACES: CodepointRanges = CodepointRanges(XML_SPACE_CHARS);

/// See [`VALID_XML_CDATA_RANGES`]
pub static CLASS_XML_CHAR: CodepointRanges = CodepointRanges(VALID_XML_CDATA_RANGES);

/// See [`VALID_CHAR_REFERENCE_RANGES`]
pub static CLASS_CHAR_REFERENCE: CodepointRanges = CodepointRanges(VALID_CHAR_REFERENCE_RANGES);

impl CharSelector for CodepointRange {
	fn select(&self, c: char) -> bool {
		self.contains(c)
	}
}

impl CharSelector for CodepointRanges {
	fn select(&self, c: char) -> bool {
		contained_in_ranges(c, self.0)
	}
}

pub fn contained_in_ranges(c: char, rs: &[CodepointRange]) -> bool {
	for r in rs.iter() {
		if r.contains(c) {
			return true;
		}
	}
	false
}

impl fmt::Debug for CodepointRanges {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "CodepointRanges(<{} ranges>)", self.0.len())
	}
}

impl PartialEq for CodepointRanges {
	fn eq(&self, other: &CodepointRanges) -> bool {
		std::ptr::eq(self.0, other.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn namestart_is_subset_of_name() {
		for cp in 0x0..=0x10ffffu32 {
			if let Some(ch) = std::char::from_u32(cp) {
				if CLASS_XML_NAMESTART.select(ch) && !CLASS_XML_NAME.select(ch) {
					panic!("U+{:x} may start a name but not continue it", cp)
				}
			}
		}
	}

	#[test]
	fn char_reference_ranges_exclude_nul_and_nonchars() {
		assert!(!CLASS_CHAR_REFERENCE.select('\0'));
		assert!(!CLASS_CHAR_REFERENCE.select('\u{fffe}'));
		assert!(!CLASS_CHAR_REFERENCE.select('\u{ffff}'));
		assert!(CLASS_CHAR_REFERENCE.select('\u{1}'));
		assert!(CLASS_CHAR_REFERENCE.select('\u{10ffff}'));
	}

	#[test]
	fn spaces_are_exactly_the_four_xml_spaces() {
		let selected: Vec<char> = (0u32..0x80)
			.filter_map(std::char::from_u32)
			.filter(|c| CLASS_XML_SPACES.select(*c))
			.collect();
		assert_eq!(selected, vec!['\t', '\n', '\r', ' ']);
	}
}
