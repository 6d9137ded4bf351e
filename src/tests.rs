use super::*;

use crate::error::*;

// note that these are just smoketests... the components are tested
// extensively in the modules.

fn events(src: &str) -> Vec<Event> {
	let mut out = Vec::new();
	parse(src, &mut out);
	out
}

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
	pairs
		.iter()
		.map(|(k, v)| (Name::from(*k), v.to_string()))
		.collect()
}

#[test]
fn parse_can_read_document() {
	let doc = "<?style sheet?>\n<root a=\"foo\" b='bar'>\n  <child>with some text</child>\n  <empty/>\n</root>\n";
	let mut sink = WhitespaceFilter::new(Vec::new());
	sink.parse(doc);
	let out = sink.into_inner();

	let mut iter = out.iter();
	assert_eq!(
		*iter.next().unwrap(),
		Event::ProcessingInstruction("style".into(), "sheet".to_string())
	);
	match iter.next().unwrap() {
		Event::TagOpen(name, attrs) => {
			assert_eq!(name.as_str(), "root");
			assert_eq!(attrs.len(), 2);
			assert_eq!(attrs.get("a").unwrap(), "foo");
			assert_eq!(attrs.get("b").unwrap(), "bar");
		}
		other => panic!("unexpected event: {:?}", other),
	};
	assert_eq!(*iter.next().unwrap(), Event::TagOpen("child".into(), attrs(&[])));
	assert_eq!(*iter.next().unwrap(), Event::Data("with some text".to_string()));
	assert_eq!(*iter.next().unwrap(), Event::TagClose("child".into()));
	assert_eq!(*iter.next().unwrap(), Event::TagEmpty("empty".into(), attrs(&[])));
	assert_eq!(*iter.next().unwrap(), Event::TagClose("root".into()));
	assert!(iter.next().is_none());
}

#[test]
fn named_entities_resolve_without_diagnostics() {
	assert_eq!(
		events("&amp;&lt;&gt;&apos;&quot;"),
		vec![Event::Data("&<>'\"".to_string())]
	);
}

#[test]
fn numeric_references_resolve() {
	assert_eq!(events("&#65;"), vec![Event::Data("A".to_string())]);
	assert_eq!(events("&#x41;"), vec![Event::Data("A".to_string())]);
}

#[test]
fn null_reference_is_reported_and_kept() {
	let out = events("&#0;");
	assert_eq!(out.iter().filter(|ev| ev.is_diagnostic()).count(), 1);
	assert_eq!(out.last(), Some(&Event::Data("&#0;".to_string())));
}

#[test]
fn duplicate_attribute_produces_no_tag() {
	let out = events("<a b=\"1\" b=\"2\"></a>");
	let diagnostics: Vec<_> = out
		.iter()
		.filter_map(|ev| match ev {
			Event::Diagnostic(err, _) => Some(err),
			_ => None,
		})
		.collect();
	assert_eq!(diagnostics, vec![&ScanError::DuplicateAttribute("b".into())]);
	assert!(out.iter().all(|ev| !matches!(ev, Event::TagOpen(..))));
}

#[test]
fn comments_are_skipped_or_rejected() {
	assert_eq!(events("<!-- ok -->"), vec![]);
	let out = events("<!-- bad -- -->");
	assert_eq!(out.iter().filter(|ev| ev.is_diagnostic()).count(), 1);
	assert!(out
		.iter()
		.all(|ev| matches!(ev, Event::Diagnostic(..) | Event::Data(..))));
}

#[test]
fn invalid_namestart_is_rescanned_as_text() {
	assert_eq!(
		events("<1abc>"),
		vec![
			Event::Diagnostic(
				ScanError::UnexpectedChar(ERRCTX_MARKUP_START, '1', None),
				Position::new(0, 1)
			),
			Event::Data("<1abc>".to_string()),
		]
	);
}

#[test]
fn tree_and_encoder_agree() {
	let doc = "<list><item n=\"1\">a &amp; b</item><item n=\"2\"/></list>";
	let mut builder = TreeBuilder::new();
	builder.parse(doc);
	let (nodes, diagnostics) = builder.finish();
	assert!(diagnostics.is_empty());
	assert_eq!(nodes.len(), 1);
	assert_eq!(nodes[0].text(), "a & b");

	let mut buf = bytes::BytesMut::new();
	Encoder::new().encode_all(events(doc).iter(), &mut buf).unwrap();
	assert_eq!(&buf[..], doc.as_bytes());
}

#[test]
fn version_is_set() {
	assert!(!VERSION.is_empty());
}

mod proptests {
	use super::*;

	use bytes::BytesMut;
	use proptest::prelude::*;

	/// Generate a valid element or attribute name
	fn name() -> impl Strategy<Value = String> {
		prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_.-]{0,8}").unwrap()
	}

	/// Generate a reference to a C0 control character, which may only
	/// appear as a reference
	fn control_reference() -> impl Strategy<Value = String> {
		prop_oneof![
			(1u32..0x20).prop_map(|cp| format!("&#x{:x};", cp)),
			(1u32..0x20).prop_map(|cp| format!("&#{};", cp)),
		]
	}

	/// Generate escaped character data, never empty
	fn text() -> impl Strategy<Value = String> {
		prop_oneof![
			prop::string::string_regex("[a-zA-Z0-9 .,;:!?'\"=/]{1,16}").unwrap(),
			Just("&amp;".to_string()),
			Just("&lt;&gt;".to_string()),
			Just("&#x263a;".to_string()),
			Just("&#65;".to_string()),
			control_reference(),
		]
	}

	/// Generate an escaped attribute value, double-quote delimited
	fn attribute_value() -> impl Strategy<Value = String> {
		prop::collection::vec(
			prop_oneof![
				prop::string::string_regex("([a-zA-Z0-9 ']|&quot;|&amp;|&lt;){0,4}").unwrap(),
				control_reference(),
			],
			0..4,
		)
		.prop_map(|parts| parts.concat())
	}

	fn head(name: &str, attributes: &std::collections::BTreeMap<String, String>) -> String {
		let mut out = format!("<{}", name);
		for (k, v) in attributes.iter() {
			out.push_str(&format!(" {}=\"{}\"", k, v));
		}
		out
	}

	/// Generate a well-formed document without comments
	fn document() -> impl Strategy<Value = String> {
		let leaf = prop_oneof![
			text(),
			(name(), prop::collection::btree_map(name(), attribute_value(), 0..3))
				.prop_map(|(name, attributes)| format!("{}/>", head(&name, &attributes))),
		];
		leaf.prop_recursive(4, 32, 4, |inner| {
			(
				name(),
				prop::collection::btree_map(name(), attribute_value(), 0..3),
				prop::collection::vec(inner, 0..4),
			)
				.prop_map(|(name, attributes, children)| {
					format!(
						"{}>{}</{}>",
						head(&name, &attributes),
						children.concat(),
						name
					)
				})
		})
	}

	proptest! {
		/// Encoding the events of a well-formed document yields markup with
		/// the same events
		#[test]
		fn encode_roundtrip_preserves_events(input in document()) {
			let first = events(&input);
			prop_assert!(
				first.iter().all(|ev| !ev.is_diagnostic()),
				"Generated document has diagnostics: {}\n{:?}",
				input,
				first
			);

			let mut buf = BytesMut::new();
			let encoded = Encoder::new().encode_all(first.iter(), &mut buf);
			prop_assert!(encoded.is_ok(), "{:?}", encoded);
			let encoded = String::from_utf8(buf.to_vec()).unwrap();

			let second = events(&encoded);
			prop_assert_eq!(first, second, "Input:\n{}\nEncoded:\n{}", input, encoded);
		}

		/// The diagnostic position is the number of advances before the
		/// offending scalar
		#[test]
		fn diagnostic_position_counts_preceding_scalars(prefix in "[a-z \n]{0,30}") {
			let mut expected = Position::default();
			for ch in prefix.chars() {
				expected.advance(ch);
			}
			expected.advance('<');

			let out = events(&format!("{}<1", prefix));
			let found: Vec<_> = out
				.iter()
				.filter_map(|ev| match ev {
					Event::Diagnostic(err, at) => Some((err.clone(), *at)),
					_ => None,
				})
				.collect();
			prop_assert_eq!(
				found,
				vec![(ScanError::UnexpectedChar(ERRCTX_MARKUP_START, '1', None), expected)]
			);
		}

		/// Text without markup or references is a single data event
		#[test]
		fn plain_text_is_a_single_data_event(input in "[^<&]{1,40}") {
			prop_assert_eq!(events(&input), vec![Event::Data(input.clone())]);
		}

		/// Arbitrary input terminates, and a fatal diagnostic can only be
		/// the very last event
		#[test]
		fn arbitrary_input_never_panics(input in "\\PC{0,64}|[<>&;#x/?!=\"' a-c0-9-]{0,64}") {
			let out = events(&input);
			for (i, ev) in out.iter().enumerate() {
				if let Event::Diagnostic(err, _) = ev {
					if err.is_fatal() {
						prop_assert_eq!(i + 1, out.len());
					}
				}
			}
		}
	}
}
