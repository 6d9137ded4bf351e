/*!
# Event interface

The lexer does not return anything; it reports every construct it recognizes
to an [`EventSink`]. Any consumer (a tree builder, a validator, a printer)
implements this trait.
*/
use std::collections::HashMap;

use crate::error::ScanError;
use crate::lexer::Position;

/// Owned element, attribute and processing instruction target name.
pub type Name = smartstring::alias::String;

/// Attributes of a start or empty tag.
///
/// Keys are unique. No ordering is implied.
pub type Attributes = HashMap<Name, String>;

/**
# Receiver for tokenizer events

Events arrive in document order. A completed tag is only reported once the
lexer has looked at the scalar following it (or reached the end of input).

A successfully closed comment is not reported at all.
*/
pub trait EventSink {
	/// Character data, with references already expanded.
	fn on_data(&mut self, text: String);

	/// A start tag such as `<a b="c">`.
	fn on_tag_open(&mut self, name: Name, attributes: Attributes);

	/// A self-closing tag such as `<a b="c"/>`.
	fn on_tag_empty(&mut self, name: Name, attributes: Attributes);

	/// An end tag such as `</a>`.
	fn on_tag_close(&mut self, name: Name);

	/// A processing instruction such as `<?target data?>`.
	fn on_processing_instruction(&mut self, target: Name, data: String);

	/// A recoverable or fatal problem in the input.
	///
	/// `at` is the position of the scalar which caused the problem.
	fn on_diagnostic(&mut self, error: ScanError, at: Position);

	/// Lex `input` with a fresh [`Lexer`](crate::Lexer) and report to
	/// `self`.
	fn parse(&mut self, input: &str)
	where
		Self: Sized,
	{
		crate::parse(input, self)
	}
}

/// A single tokenizer event, as recorded by the [`Vec<Event>`] sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	/// See [`EventSink::on_data`].
	Data(String),
	/// See [`EventSink::on_tag_open`].
	TagOpen(Name, Attributes),
	/// See [`EventSink::on_tag_empty`].
	TagEmpty(Name, Attributes),
	/// See [`EventSink::on_tag_close`].
	TagClose(Name),
	/// See [`EventSink::on_processing_instruction`].
	ProcessingInstruction(Name, String),
	/// See [`EventSink::on_diagnostic`].
	Diagnostic(ScanError, Position),
}

impl Event {
	/// Return true for [`Event::Diagnostic`].
	pub fn is_diagnostic(&self) -> bool {
		matches!(self, Self::Diagnostic(..))
	}

	/// Replay this event into another sink.
	pub fn dispatch<S: EventSink + ?Sized>(self, sink: &mut S) {
		match self {
			Self::Data(text) => sink.on_data(text),
			Self::TagOpen(name, attrs) => sink.on_tag_open(name, attrs),
			Self::TagEmpty(name, attrs) => sink.on_tag_empty(name, attrs),
			Self::TagClose(name) => sink.on_tag_close(name),
			Self::ProcessingInstruction(target, data) => sink.on_processing_instruction(target, data),
			Self::Diagnostic(error, at) => sink.on_diagnostic(error, at),
		}
	}
}

impl EventSink for Vec<Event> {
	fn on_data(&mut self, text: String) {
		self.push(Event::Data(text));
	}

	fn on_tag_open(&mut self, name: Name, attributes: Attributes) {
		self.push(Event::TagOpen(name, attributes));
	}

	fn on_tag_empty(&mut self, name: Name, attributes: Attributes) {
		self.push(Event::TagEmpty(name, attributes));
	}

	fn on_tag_close(&mut self, name: Name) {
		self.push(Event::TagClose(name));
	}

	fn on_processing_instruction(&mut self, target: Name, data: String) {
		self.push(Event::ProcessingInstruction(target, data));
	}

	fn on_diagnostic(&mut self, error: ScanError, at: Position) {
		self.push(Event::Diagnostic(error, at));
	}
}

/// Return true if `text` is layout whitespace: one to three newlines, with
/// any number of spaces around and between them.
pub fn is_insignificant_whitespace(text: &str) -> bool {
	let mut newlines = 0usize;
	for ch in text.chars() {
		match ch {
			' ' => (),
			'\n' => newlines += 1,
			_ => return false,
		}
	}
	newlines >= 1 && newlines <= 3
}

/**
# Sink adapter dropping layout whitespace

Forwards everything to the wrapped sink except data events for which
[`is_insignificant_whitespace`] holds. The lexer itself never drops such
data; this is the policy a whitespace-insensitive consumer applies on top.
*/
#[derive(Debug, Clone, Default)]
pub struct WhitespaceFilter<S> {
	inner: S,
}

impl<S: EventSink> WhitespaceFilter<S> {
	/// Wrap a sink.
	pub fn new(inner: S) -> Self {
		Self { inner }
	}

	/// Return a reference to the wrapped sink.
	pub fn get_ref(&self) -> &S {
		&self.inner
	}

	/// Return a mutable reference to the wrapped sink.
	pub fn get_mut(&mut self) -> &mut S {
		&mut self.inner
	}

	/// Unwrap the sink.
	pub fn into_inner(self) -> S {
		self.inner
	}
}

impl<S: EventSink> EventSink for WhitespaceFilter<S> {
	fn on_data(&mut self, text: String) {
		if !is_insignificant_whitespace(&text) {
			self.inner.on_data(text)
		}
	}

	fn on_tag_open(&mut self, name: Name, attributes: Attributes) {
		self.inner.on_tag_open(name, attributes)
	}

	fn on_tag_empty(&mut self, name: Name, attributes: Attributes) {
		self.inner.on_tag_empty(name, attributes)
	}

	fn on_tag_close(&mut self, name: Name) {
		self.inner.on_tag_close(name)
	}

	fn on_processing_instruction(&mut self, target: Name, data: String) {
		self.inner.on_processing_instruction(target, data)
	}

	fn on_diagnostic(&mut self, error: ScanError, at: Position) {
		self.inner.on_diagnostic(error, at)
	}
}
