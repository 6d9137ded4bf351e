/*!
# Streaming XML tokenization

This crate provides a forgiving, event-driven tokenizer for a practical
subset of XML 1.0. It never fails: malformed markup is reported as a
diagnostic and then treated as character data, so every input yields a
stream of events.

## Features (some call them restrictions)

* Start, end and empty tags with attributes
* The five predefined entities and numeric character references
* Comments (skipped) and processing instructions
* No DTD whatsoever, no CDATA sections, no XML declaration
* No namespace processing
* Input is any sequence of Unicode scalars; decoding is up to the caller

## Example

```
use sxml::{Event, EventSink};

let mut events: Vec<Event> = Vec::new();
events.parse("<hello who=\"world\">&lt;3</hello>");
assert_eq!(events.len(), 3);
assert_eq!(events[1], Event::Data("<3".to_string()));
```

## Error recovery

When a construct turns out to be malformed, a diagnostic is reported to
[`EventSink::on_diagnostic`] and scanning restarts right after the `<` which
opened the construct, treating that `<` as text. Malformed references are
reported and kept literally. Running out of input inside markup is the only
diagnostic after which no more events follow.

## High-level usage

Implement [`EventSink`] (or use the recording `Vec<Event>` impl) and call
[`parse`], or keep a [`Lexer`] around to reuse its buffers. The [`tree`]
module assembles events into a simple document tree and the [`Encoder`]
writes events back as markup.
*/
pub mod error;
mod errctx;
pub mod lexer;
pub mod sink;
pub mod tree;
pub mod writer;

#[cfg(test)]
mod tests;

#[doc(inline)]
pub use error::{EncodeError, ErrorClass, ScanError};
#[doc(inline)]
pub use lexer::{Lexer, LexerOptions, Position};
#[doc(inline)]
pub use sink::{Attributes, Event, EventSink, Name, WhitespaceFilter};
#[doc(inline)]
pub use tree::{Node, TreeBuilder};
#[doc(inline)]
pub use writer::Encoder;

/// Package version
pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

/// Lex `input` with a fresh [`Lexer`] using default options, reporting all
/// events to `sink`.
pub fn parse<S: EventSink + ?Sized>(input: &str, sink: &mut S) {
	Lexer::new().lex(input.chars(), sink)
}
