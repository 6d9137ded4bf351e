/*!
# Minimal document tree

[`TreeBuilder`] is an [`EventSink`] which assembles the event stream into a
list of [`Node`]s. It is intentionally forgiving: it never fails, and
mismatched end tags are repaired rather than reported.

```
use sxml::tree::{Node, TreeBuilder};

let mut builder = TreeBuilder::new();
sxml::parse("<p class=\"x\">hello <b>world</b></p>", &mut builder);
let (nodes, diagnostics) = builder.finish();
assert!(diagnostics.is_empty());
assert_eq!(nodes[0].text(), "hello world");
assert_eq!(nodes[0].to_markup(), "<p class=\"x\">hello <b>world</b></p>");
```
*/
use std::fmt;

use tracing::debug;

use crate::error::ScanError;
use crate::lexer::Position;
use crate::sink::{is_insignificant_whitespace, Attributes, EventSink, Name};

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
	pub tag: Name,
	pub attributes: Attributes,
	pub children: Vec<Node>,
}

/// A comment.
///
/// The lexer skips comments, so these only appear in trees built by hand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comment {
	pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Element(Element),
	Comment(Comment),
	Text(String),
}

impl Element {
	pub fn new(tag: Name, attributes: Attributes) -> Self {
		Self {
			tag,
			attributes,
			children: Vec::new(),
		}
	}

	/// Concatenated text of all descendants.
	pub fn text(&self) -> String {
		let mut out = String::new();
		for child in self.children.iter() {
			out.push_str(&child.text());
		}
		out
	}
}

impl Node {
	/// Text content of the node.
	///
	/// For elements, this is the text of all children in document order;
	/// comments contribute their value.
	pub fn text(&self) -> String {
		match self {
			Self::Element(el) => el.text(),
			Self::Comment(c) => c.value.clone(),
			Self::Text(s) => s.clone(),
		}
	}

	/// Render the node back into markup.
	///
	/// Text and attribute values are written as they are, without escaping.
	/// Use the [`Encoder`](crate::writer::Encoder) to produce well-formed
	/// output.
	pub fn to_markup(&self) -> String {
		self.to_string()
	}

	/// Return the element if this is an element node.
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Self::Element(el) => Some(el),
			_ => None,
		}
	}
}

impl fmt::Display for Element {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "<{}", self.tag)?;
		let mut attrs: Vec<_> = self.attributes.iter().collect();
		attrs.sort_by(|a, b| a.0.cmp(b.0));
		for (key, value) in attrs {
			write!(f, " {}=\"{}\"", key, value)?;
		}
		f.write_str(">")?;
		for child in self.children.iter() {
			write!(f, "{}", child)?;
		}
		write!(f, "</{}>", self.tag)
	}
}

impl fmt::Display for Comment {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "<!--{}-->", self.value)
	}
}

impl fmt::Display for Node {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Element(el) => fmt::Display::fmt(el, f),
			Self::Comment(c) => fmt::Display::fmt(c, f),
			Self::Text(s) => f.write_str(s),
		}
	}
}

/**
# Event sink building a [`Node`] tree

Open tags push a new element, end tags pop up to and including the nearest
open element with the same name; an end tag matching no open element is
dropped. Elements still open when [`TreeBuilder::finish`] is called are
closed implicitly.

By default, data consisting only of layout whitespace (see
[`is_insignificant_whitespace`]) is dropped. Processing instructions are
ignored and diagnostics are collected for the caller.
*/
#[derive(Debug, Clone)]
pub struct TreeBuilder {
	roots: Vec<Node>,
	stack: Vec<Element>,
	diagnostics: Vec<(ScanError, Position)>,
	keep_whitespace: bool,
}

impl Default for TreeBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TreeBuilder {
	pub fn new() -> Self {
		Self {
			roots: Vec::new(),
			stack: Vec::new(),
			diagnostics: Vec::new(),
			keep_whitespace: false,
		}
	}

	/// Configure whether layout whitespace is kept as text nodes.
	pub fn keep_whitespace(mut self, v: bool) -> Self {
		self.keep_whitespace = v;
		self
	}

	/// Diagnostics collected so far.
	pub fn diagnostics(&self) -> &[(ScanError, Position)] {
		&self.diagnostics
	}

	fn append(&mut self, node: Node) {
		match self.stack.last_mut() {
			Some(parent) => parent.children.push(node),
			None => self.roots.push(node),
		}
	}

	fn close_top(&mut self) {
		if let Some(el) = self.stack.pop() {
			self.append(Node::Element(el));
		}
	}

	/// Close all open elements and return the top-level nodes and the
	/// collected diagnostics.
	pub fn finish(mut self) -> (Vec<Node>, Vec<(ScanError, Position)>) {
		while !self.stack.is_empty() {
			self.close_top();
		}
		(self.roots, self.diagnostics)
	}
}

impl EventSink for TreeBuilder {
	fn on_data(&mut self, text: String) {
		if !self.keep_whitespace && is_insignificant_whitespace(&text) {
			return;
		}
		self.append(Node::Text(text));
	}

	fn on_tag_open(&mut self, name: Name, attributes: Attributes) {
		self.stack.push(Element::new(name, attributes));
	}

	fn on_tag_empty(&mut self, name: Name, attributes: Attributes) {
		self.append(Node::Element(Element::new(name, attributes)));
	}

	fn on_tag_close(&mut self, name: Name) {
		match self.stack.iter().rposition(|el| el.tag == name) {
			Some(index) => {
				while self.stack.len() > index {
					self.close_top();
				}
			}
			None => debug!(%name, "ignoring end tag without matching start tag"),
		}
	}

	fn on_processing_instruction(&mut self, _target: Name, _data: String) {}

	fn on_diagnostic(&mut self, error: ScanError, at: Position) {
		self.diagnostics.push((error, at));
	}
}
