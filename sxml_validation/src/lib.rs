/*!
# Character classes and validator functions for XML-related strings

This is a supplementary crate for `sxml`. It holds the pure classification
predicates the tokenizer uses to decide, scalar by scalar, what may start or
continue a name and what counts as whitespace, as well as whole-string
validators used when writing markup.
*/
use std::fmt;

pub mod selectors;

use selectors::CharSelector;

/**
Error condition from validating an XML string.
*/
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	/// A Name was empty.
	EmptyName,
	/// An invalid character was encountered.
	///
	/// This variant contains the character as data.
	InvalidChar(char),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::EmptyName => f.write_str("Name must not be empty"),
			Self::InvalidChar(c) => write!(f, "character U+{:04x} is not allowed", *c as u32),
		}
	}
}

impl std::error::Error for Error {}

/// Return true if `c` may start an XML Name.
#[inline]
pub fn is_name_start_char(c: char) -> bool {
	selectors::CLASS_XML_NAMESTART.select(c)
}

/// Return true if `c` may occur after the first char of an XML Name.
#[inline]
pub fn is_name_char(c: char) -> bool {
	selectors::CLASS_XML_NAME.select(c)
}

/// Return true if `c` is one of the four XML whitespace characters.
#[inline]
pub fn is_space(c: char) -> bool {
	selectors::CLASS_XML_SPACES.select(c)
}

/// Return true if a character reference may expand to codepoint `cp`.
///
/// NUL, surrogates, U+FFFE, U+FFFF and anything beyond U+10FFFF are
/// rejected.
pub fn is_char_reference_target(cp: u32) -> bool {
	match std::char::from_u32(cp) {
		Some(ch) => selectors::CLASS_CHAR_REFERENCE.select(ch),
		None => false,
	}
}

/**
Check whether a str is a valid XML 1.0 Name

# Example

```rust
use sxml_validation::{validate_name, Error};

assert!(validate_name("foobar").is_ok());
assert!(validate_name("foo:bar").is_ok());
assert!(matches!(validate_name("foo bar"), Err(Error::InvalidChar(' '))));
assert!(matches!(validate_name(""), Err(Error::EmptyName)));
```
*/
pub fn validate_name(s: &str) -> Result<(), Error> {
	let mut chars = s.chars();
	match chars.next() {
		// must have at least one char
		None => return Err(Error::EmptyName),
		Some(c) => {
			if !is_name_start_char(c) {
				return Err(Error::InvalidChar(c));
			}
		}
	}
	for ch in chars {
		if !is_name_char(ch) {
			return Err(Error::InvalidChar(ch));
		}
	}
	Ok(())
}

/**
Check whether a str is valid XML 1.0 CData

# Example

```rust
use sxml_validation::{validate_cdata, Error};

assert!(validate_cdata("foo bar baz <fnord!>").is_ok());
assert!(matches!(validate_cdata("\x01"), Err(Error::InvalidChar('\x01'))));
```
*/
pub fn validate_cdata(s: &str) -> Result<(), Error> {
	for ch in s.chars() {
		if !selectors::CLASS_XML_CHAR.select(ch) {
			return Err(Error::InvalidChar(ch));
		}
	}
	Ok(())
}
