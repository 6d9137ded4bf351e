use std::fmt;

/// Zero-based line and column of a scalar in the input.
///
/// A newline scalar moves to the start of the next line; every other scalar
/// moves one column to the right. Columns count Unicode scalars, not bytes or
/// grapheme clusters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
	pub line: usize,
	pub column: usize,
}

impl Position {
	pub const fn new(line: usize, column: usize) -> Position {
		Position { line, column }
	}

	/// Account for `ch` having been consumed.
	#[inline]
	pub fn advance(&mut self, ch: char) {
		if ch == '\n' {
			self.line += 1;
			self.column = 0;
		} else {
			self.column += 1;
		}
	}
}

impl fmt::Display for Position {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}:{}", self.line + 1, self.column + 1)
	}
}

/// Forward-only cursor over a scalar iterator.
///
/// The cursor always holds the scalar under inspection, which has *not* been
/// consumed yet; [`Cursor::position`] is the position of that scalar.
/// Cloning a cursor yields a checkpoint: assigning the clone back rewinds
/// the iterator, the position and the current scalar in one go.
#[derive(Clone)]
pub struct Cursor<I> {
	iter: I,
	current: Option<char>,
	position: Position,
}

impl<I: Iterator<Item = char> + Clone> Cursor<I> {
	pub fn new(mut iter: I) -> Self {
		let current = iter.next();
		Self {
			iter,
			current,
			position: Position::default(),
		}
	}

	/// The scalar under inspection, or `None` at end of input.
	#[inline]
	pub fn current(&self) -> Option<char> {
		self.current
	}

	#[inline]
	pub fn position(&self) -> Position {
		self.position
	}

	/// Consume the current scalar.
	///
	/// This is the only place where the position advances.
	#[inline]
	pub fn bump(&mut self) {
		if let Some(ch) = self.current {
			self.position.advance(ch);
			self.current = self.iter.next();
		}
	}
}

impl<I> fmt::Debug for Cursor<I> {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Cursor")
			.field("current", &self.current)
			.field("position", &self.position)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn position_counts_columns_and_lines() {
		let mut pos = Position::default();
		for ch in "ab\ncd".chars() {
			pos.advance(ch);
		}
		assert_eq!(pos, Position::new(1, 2));
	}

	#[test]
	fn cursor_bump_advances_exactly_once() {
		let mut cursor = Cursor::new("a\nb".chars());
		assert_eq!(cursor.current(), Some('a'));
		assert_eq!(cursor.position(), Position::new(0, 0));
		cursor.bump();
		assert_eq!(cursor.current(), Some('\n'));
		assert_eq!(cursor.position(), Position::new(0, 1));
		cursor.bump();
		assert_eq!(cursor.current(), Some('b'));
		assert_eq!(cursor.position(), Position::new(1, 0));
		cursor.bump();
		assert_eq!(cursor.current(), None);
		assert_eq!(cursor.position(), Position::new(1, 1));
		// bumping at eof is a no-op
		cursor.bump();
		assert_eq!(cursor.position(), Position::new(1, 1));
	}

	#[test]
	fn cursor_clone_rewinds() {
		let mut cursor = Cursor::new("xyz".chars());
		cursor.bump();
		let checkpoint = cursor.clone();
		cursor.bump();
		cursor.bump();
		assert_eq!(cursor.current(), None);
		cursor = checkpoint;
		assert_eq!(cursor.current(), Some('y'));
		assert_eq!(cursor.position(), Position::new(0, 1));
	}

	#[test]
	fn position_display_is_one_based() {
		assert_eq!(Position::new(0, 0).to_string(), "1:1");
	}
}
