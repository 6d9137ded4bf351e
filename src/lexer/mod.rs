/*!
# XML tokenizer

The [`Lexer`] is a finite state machine which consumes one scalar at a time
and reports completed constructs to an [`EventSink`].

## Recovery

When a construct turns out to be malformed, the lexer reports a diagnostic,
forgets everything it buffered for that construct and rewinds to the scalar
right after the `<` which opened it. The `<` is then treated as character
data and scanning continues as text. Each rewind therefore makes progress by
at least that one `<`.

Completed constructs are only reported when the next construct boundary is
reached, which is what makes discarding them on a rewind possible.
*/
use std::collections::hash_map::Entry;
use std::mem;

use tracing::{debug, trace};

use sxml_validation::{is_name_char, is_name_start_char, is_space};

mod read;
mod reference;

pub use read::{Cursor, Position};
pub use reference::{resolve_named_entity, NAMED_ENTITIES};

use crate::error::*;
use crate::sink::{Attributes, EventSink, Name};
use reference::read_reference;

/// Markup construct which has been read completely but not yet reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Construct {
	StartTag,
	EmptyTag,
	EndTag,
	Comment,
	ProcessingInstruction,
}

/// Construct whose name is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameKind {
	StartTag,
	EndTag,
	ProcessingInstruction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
	/// Between constructs; reports the one which just ended
	Boundary(Option<Construct>),
	/// Character data; `lead_lt` if a rewound `<` starts the data
	Text { lead_lt: bool },
	/// Encountered <
	BeginMarkup,
	/// Encountered </
	EndTagStart,
	Name(NameKind),
	/// Inside a start tag, before an attribute name or the end of the tag
	Attributes,
	AttributeName,
	/// Whitespace between attribute name and =
	BeforeEq,
	/// After =, expecting a quote
	AfterEq,
	/// Delimiter of the value
	AttributeValue(char),
	/// Closing quote read, whitespace or end of tag required
	AfterAttributeValue,
	/// Whitespace after the name of an end tag
	EndTagTail,
	/// Encountered / inside a start tag
	EmptyClose,
	/// Encountered <!
	Exclam,
	/// Encountered <!-
	CommentOpen,
	Comment,
	/// One - inside a comment
	CommentHyphen,
	/// -- inside a comment, must be followed by >
	CommentDoubleHyphen,
	/// Encountered <?
	PiStart,
	/// Whitespace after the target of a processing instruction
	PiSpace,
	PiData,
	/// Encountered ? inside a processing instruction
	PiQuestion,
}

/// What the driving loop does after a state handled the current scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
	/// Consume the current scalar and continue in the given state.
	Consume(State),
	/// Inspect the current scalar again, in the given state.
	Reprocess(State),
	/// End of input reached outside of any construct.
	Done,
}

type StepResult = Result<Step, ScanError>;

/// Hold options to configure a [`Lexer`].
///
/// See also [`Lexer::with_options()`].
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct LexerOptions {
	/// Maximum number of UTF-8 bytes a single name, attribute value or
	/// processing instruction may occupy after reference expansion.
	///
	/// This exists to bound the memory the lexer buffers for one construct.
	/// A construct exceeding the limit is treated as malformed: a
	/// [`ScanError::TokenTooLong`] diagnostic is reported and the construct
	/// is rescanned as text. Character data is never limited.
	///
	/// The source text of a single reference is limited as well. An overlong
	/// reference is broken off like any other malformed reference: its text
	/// so far is kept literally and scanning continues.
	pub max_token_length: usize,
}

impl LexerOptions {
	/// Set the [`LexerOptions::max_token_length`] value.
	///
	/// # Example
	///
	/// ```
	/// use sxml::{Lexer, LexerOptions};
	/// let lexer = Lexer::with_options(LexerOptions::default().max_token_length(1024));
	/// assert_eq!(lexer.options().max_token_length, 1024);
	/// ```
	pub fn max_token_length(mut self, v: usize) -> LexerOptions {
		self.max_token_length = v;
		self
	}
}

impl Default for LexerOptions {
	/// Constructs default lexer options.
	///
	/// The defaults are implementation-defined and should not be relied upon.
	fn default() -> Self {
		Self {
			max_token_length: 8192,
		}
	}
}

/**
# Streaming XML tokenizer

A `Lexer` owns the buffers for the construct currently being read. Those are
reused from one call to [`Lexer::lex`] to the next, which is why lexing
requires `&mut self`; independent inputs need independent lexers to be lexed
at the same time.

# Example

```
use sxml::{Event, Lexer};

let mut lexer = Lexer::new();
let mut events: Vec<Event> = Vec::new();
lexer.lex("<a>hi</a>".chars(), &mut events);
assert_eq!(events.len(), 3);
```
*/
#[derive(Debug, Default)]
pub struct Lexer {
	opts: LexerOptions,
	name: Name,
	/// attribute name or processing instruction data
	label: String,
	value: String,
	attributes: Attributes,
	/// reference diagnostics from attribute values of the current construct
	deferred: Vec<(ScanError, Position)>,
}

impl Lexer {
	/// Construct a new Lexer based on [`LexerOptions::default()`].
	pub fn new() -> Self {
		Self::with_options(LexerOptions::default())
	}

	/// Construct a new Lexer with the given options.
	pub fn with_options(opts: LexerOptions) -> Self {
		Self {
			opts,
			name: Name::new(),
			label: String::new(),
			value: String::new(),
			attributes: Attributes::new(),
			deferred: Vec::new(),
		}
	}

	/// Return the options this lexer was created with.
	pub fn options(&self) -> &LexerOptions {
		&self.opts
	}

	/// Lex `input` completely, reporting to `sink`.
	///
	/// Returns once the input is exhausted. If the input ends inside a
	/// construct, a final diagnostic is reported first.
	pub fn lex<T, S>(&mut self, input: T, sink: &mut S)
	where
		T: IntoIterator<Item = char>,
		T::IntoIter: Clone,
		S: EventSink + ?Sized,
	{
		self.reset();
		let mut cursor = Cursor::new(input.into_iter());
		let mut checkpoint = cursor.clone();
		let mut state = State::Boundary(None);
		loop {
			let step = match state {
				State::Boundary(done) => {
					self.emit(done, sink);
					match cursor.current() {
						Some('<') => Ok(Step::Consume(State::BeginMarkup)),
						Some(_) => Ok(Step::Reprocess(State::Text { lead_lt: false })),
						None => Ok(Step::Done),
					}
				}
				State::Text { lead_lt } => Ok(self.lex_text(lead_lt, &mut cursor, sink)),
				State::AttributeValue(delim) => self.lex_attribute_value(delim, &mut cursor),
				State::BeginMarkup => {
					checkpoint = cursor.clone();
					match cursor.current() {
						Some(ch) => self.lex_begin_markup(ch),
						None => Err(ScanError::InvalidEof(ERRCTX_MARKUP)),
					}
				}
				other => match cursor.current() {
					Some(ch) => self.lex_markup(other, ch),
					None => Err(ScanError::InvalidEof(ERRCTX_MARKUP)),
				},
			};

			match step {
				Ok(Step::Consume(next)) => {
					cursor.bump();
					state = next;
				}
				Ok(Step::Reprocess(next)) => state = next,
				Ok(Step::Done) => return,
				Err(err) if err.is_fatal() => {
					let at = cursor.position();
					debug!(%err, line = at.line, column = at.column, "input ended inside markup");
					for (deferred, deferred_at) in self.deferred.drain(..) {
						sink.on_diagnostic(deferred, deferred_at);
					}
					sink.on_diagnostic(err, at);
					self.reset();
					return;
				}
				Err(err) => {
					let at = cursor.position();
					debug!(%err, line = at.line, column = at.column, "rescanning malformed markup as text");
					sink.on_diagnostic(err, at);
					self.reset();
					cursor = checkpoint.clone();
					state = State::Text { lead_lt: true };
				}
			}
		}
	}

	fn reset(&mut self) {
		self.name.clear();
		self.label.clear();
		self.value.clear();
		self.attributes.clear();
		self.deferred.clear();
	}

	/// Report the construct which just ended (if any) and clear all buffers.
	fn emit<S: EventSink + ?Sized>(&mut self, done: Option<Construct>, sink: &mut S) {
		for (err, at) in self.deferred.drain(..) {
			sink.on_diagnostic(err, at);
		}
		if let Some(construct) = done {
			trace!(?construct, name = %self.name, "construct complete");
		}
		match done {
			None | Some(Construct::Comment) => (),
			Some(Construct::StartTag) => {
				sink.on_tag_open(mem::take(&mut self.name), mem::take(&mut self.attributes))
			}
			Some(Construct::EmptyTag) => {
				sink.on_tag_empty(mem::take(&mut self.name), mem::take(&mut self.attributes))
			}
			Some(Construct::EndTag) => sink.on_tag_close(mem::take(&mut self.name)),
			Some(Construct::ProcessingInstruction) => {
				sink.on_processing_instruction(mem::take(&mut self.name), mem::take(&mut self.label))
			}
		}
		self.reset();
	}

	#[inline]
	fn check_length(&self, len: usize, ctx: &'static str) -> Result<(), ScanError> {
		if len > self.opts.max_token_length {
			Err(ScanError::TokenTooLong(ctx))
		} else {
			Ok(())
		}
	}

	fn push_name(&mut self, ch: char, ctx: &'static str) -> Result<(), ScanError> {
		self.check_length(self.name.len() + ch.len_utf8(), ctx)?;
		self.name.push(ch);
		Ok(())
	}

	fn push_label(&mut self, ch: char, ctx: &'static str) -> Result<(), ScanError> {
		self.check_length(self.label.len() + ch.len_utf8(), ctx)?;
		self.label.push(ch);
		Ok(())
	}

	fn unexpected(&self, ctx: &'static str, ch: char) -> ScanError {
		ScanError::UnexpectedChar(ctx, ch, Some(self.name.clone()))
	}

	/// Consume character data up to the next `<` or the end of input and
	/// report it as a single data event.
	fn lex_text<I, S>(&mut self, lead_lt: bool, cursor: &mut Cursor<I>, sink: &mut S) -> Step
	where
		I: Iterator<Item = char> + Clone,
		S: EventSink + ?Sized,
	{
		let mut text = String::new();
		if lead_lt {
			text.push('<');
		}
		loop {
			match cursor.current() {
				None => {
					sink.on_data(text);
					return Step::Done;
				}
				Some('<') => {
					sink.on_data(text);
					return Step::Consume(State::BeginMarkup);
				}
				Some('&') => {
					cursor.bump();
					if let Some(err) = read_reference(cursor, &mut text, self.opts.max_token_length) {
						sink.on_diagnostic(err, cursor.position());
					}
				}
				Some(ch) => {
					text.push(ch);
					cursor.bump();
				}
			}
		}
	}

	/// Consume an attribute value up to (but excluding) its closing
	/// delimiter and store the attribute.
	fn lex_attribute_value<I>(&mut self, delim: char, cursor: &mut Cursor<I>) -> StepResult
	where
		I: Iterator<Item = char> + Clone,
	{
		loop {
			match cursor.current() {
				None => return Err(ScanError::InvalidEof(ERRCTX_MARKUP)),
				Some(ch) if ch == delim => break,
				Some('&') => {
					cursor.bump();
					if let Some(err) = read_reference(cursor, &mut self.value, self.opts.max_token_length) {
						// only reported if the tag survives; a rewind rescans
						// (and reports) the reference as text
						self.deferred.push((err, cursor.position()));
					}
				}
				Some(ch) => {
					self.check_length(self.value.len() + ch.len_utf8(), ERRCTX_ATTVAL)?;
					self.value.push(ch);
					cursor.bump();
				}
			}
			self.check_length(self.value.len(), ERRCTX_ATTVAL)?;
		}

		let name = Name::from(mem::take(&mut self.label));
		match self.attributes.entry(name) {
			Entry::Occupied(existing) => Err(ScanError::DuplicateAttribute(existing.key().clone())),
			Entry::Vacant(slot) => {
				slot.insert(mem::take(&mut self.value));
				Ok(Step::Consume(State::AfterAttributeValue))
			}
		}
	}

	fn lex_begin_markup(&mut self, ch: char) -> StepResult {
		match ch {
			'/' => Ok(Step::Consume(State::EndTagStart)),
			'!' => Ok(Step::Consume(State::Exclam)),
			'?' => Ok(Step::Consume(State::PiStart)),
			ch if is_name_start_char(ch) => {
				self.push_name(ch, ERRCTX_START_TAG)?;
				Ok(Step::Consume(State::Name(NameKind::StartTag)))
			}
			ch => Err(ScanError::UnexpectedChar(ERRCTX_MARKUP_START, ch, None)),
		}
	}

	fn lex_name_end(&mut self, kind: NameKind, ch: char) -> StepResult {
		match kind {
			NameKind::StartTag => match ch {
				'/' => Ok(Step::Consume(State::EmptyClose)),
				'>' => Ok(Step::Consume(State::Boundary(Some(Construct::StartTag)))),
				ch if is_space(ch) => Ok(Step::Consume(State::Attributes)),
				ch => Err(self.unexpected(ERRCTX_START_TAG, ch)),
			},
			NameKind::EndTag => match ch {
				'>' => Ok(Step::Consume(State::Boundary(Some(Construct::EndTag)))),
				ch if is_space(ch) => Ok(Step::Consume(State::EndTagTail)),
				ch => Err(self.unexpected(ERRCTX_END_TAG, ch)),
			},
			NameKind::ProcessingInstruction => {
				if self.name.eq_ignore_ascii_case("xml") {
					return Err(ScanError::XmlDeclaration);
				}
				match ch {
					'?' => Ok(Step::Consume(State::PiQuestion)),
					ch if is_space(ch) => Ok(Step::Consume(State::PiSpace)),
					ch => Err(self.unexpected(ERRCTX_PI, ch)),
				}
			}
		}
	}

	/// Handle a scalar inside markup, for all states which look at a
	/// single scalar at a time.
	fn lex_markup(&mut self, state: State, ch: char) -> StepResult {
		match state {
			State::Name(kind) => {
				if is_name_char(ch) {
					let ctx = match kind {
						NameKind::StartTag => ERRCTX_START_TAG,
						NameKind::EndTag => ERRCTX_END_TAG,
						NameKind::ProcessingInstruction => ERRCTX_PI,
					};
					self.push_name(ch, ctx)?;
					Ok(Step::Consume(State::Name(kind)))
				} else {
					self.lex_name_end(kind, ch)
				}
			}

			State::EndTagStart => {
				if is_name_start_char(ch) {
					self.push_name(ch, ERRCTX_END_TAG)?;
					Ok(Step::Consume(State::Name(NameKind::EndTag)))
				} else {
					Err(ScanError::UnexpectedChar(ERRCTX_END_TAG, ch, None))
				}
			}
			State::EndTagTail => match ch {
				'>' => Ok(Step::Consume(State::Boundary(Some(Construct::EndTag)))),
				ch if is_space(ch) => Ok(Step::Consume(State::EndTagTail)),
				ch if is_name_start_char(ch) => Err(ScanError::EndTagAttributes(self.name.clone())),
				ch => Err(self.unexpected(ERRCTX_END_TAG, ch)),
			},

			State::Attributes => match ch {
				'/' => Ok(Step::Consume(State::EmptyClose)),
				'>' => Ok(Step::Consume(State::Boundary(Some(Construct::StartTag)))),
				ch if is_space(ch) => Ok(Step::Consume(State::Attributes)),
				ch if is_name_start_char(ch) => {
					self.push_label(ch, ERRCTX_ATTNAME)?;
					Ok(Step::Consume(State::AttributeName))
				}
				ch => Err(self.unexpected(ERRCTX_START_TAG, ch)),
			},
			State::AttributeName => match ch {
				'=' => Ok(Step::Consume(State::AfterEq)),
				ch if is_name_char(ch) => {
					self.push_label(ch, ERRCTX_ATTNAME)?;
					Ok(Step::Consume(State::AttributeName))
				}
				ch if is_space(ch) => Ok(Step::Consume(State::BeforeEq)),
				ch => Err(self.unexpected(ERRCTX_ATTNAME, ch)),
			},
			State::BeforeEq => match ch {
				'=' => Ok(Step::Consume(State::AfterEq)),
				ch if is_space(ch) => Ok(Step::Consume(State::BeforeEq)),
				ch => Err(self.unexpected(ERRCTX_START_TAG, ch)),
			},
			State::AfterEq => match ch {
				'"' | '\'' => Ok(Step::Consume(State::AttributeValue(ch))),
				ch if is_space(ch) => Ok(Step::Consume(State::AfterEq)),
				ch => Err(self.unexpected(ERRCTX_START_TAG, ch)),
			},
			State::AfterAttributeValue => match ch {
				'/' => Ok(Step::Consume(State::EmptyClose)),
				'>' => Ok(Step::Consume(State::Boundary(Some(Construct::StartTag)))),
				ch if is_space(ch) => Ok(Step::Consume(State::Attributes)),
				ch => Err(self.unexpected(ERRCTX_START_TAG, ch)),
			},
			State::EmptyClose => match ch {
				'>' => Ok(Step::Consume(State::Boundary(Some(Construct::EmptyTag)))),
				ch => Err(self.unexpected(ERRCTX_EMPTY_TAG, ch)),
			},

			State::Exclam => match ch {
				'-' => Ok(Step::Consume(State::CommentOpen)),
				_ => Err(ScanError::UnsupportedDeclaration),
			},
			State::CommentOpen => match ch {
				'-' => Ok(Step::Consume(State::Comment)),
				ch => Err(ScanError::UnexpectedChar(ERRCTX_COMMENT_START, ch, None)),
			},
			State::Comment => match ch {
				'-' => Ok(Step::Consume(State::CommentHyphen)),
				_ => Ok(Step::Consume(State::Comment)),
			},
			State::CommentHyphen => match ch {
				'-' => Ok(Step::Consume(State::CommentDoubleHyphen)),
				_ => Ok(Step::Consume(State::Comment)),
			},
			State::CommentDoubleHyphen => match ch {
				'>' => Ok(Step::Consume(State::Boundary(Some(Construct::Comment)))),
				_ => Err(ScanError::DoubleHyphenInComment),
			},

			State::PiStart => {
				if is_name_start_char(ch) {
					self.push_name(ch, ERRCTX_PI)?;
					Ok(Step::Consume(State::Name(NameKind::ProcessingInstruction)))
				} else {
					Err(ScanError::UnexpectedChar(ERRCTX_PI_START, ch, None))
				}
			}
			State::PiSpace => match ch {
				'?' => Ok(Step::Consume(State::PiQuestion)),
				ch if is_space(ch) => Ok(Step::Consume(State::PiSpace)),
				ch => {
					self.push_label(ch, ERRCTX_PI)?;
					Ok(Step::Consume(State::PiData))
				}
			},
			State::PiData => match ch {
				'?' => Ok(Step::Consume(State::PiQuestion)),
				ch => {
					self.push_label(ch, ERRCTX_PI)?;
					Ok(Step::Consume(State::PiData))
				}
			},
			State::PiQuestion => match ch {
				'>' => Ok(Step::Consume(State::Boundary(Some(Construct::ProcessingInstruction)))),
				_ => {
					// a lone ? is data; look at the current scalar again
					self.push_label('?', ERRCTX_PI)?;
					Ok(Step::Reprocess(State::PiData))
				}
			},

			State::Boundary(_) | State::Text { .. } | State::BeginMarkup | State::AttributeValue(_) => {
				unreachable!("state {:?} is driven by the main loop", state)
			}
		}
	}
}
