use crate::plog::{detect, Catalog, DetectorEntry, ErrorKind, Node, Status, Tree, Value};

fn msg_header(type_value: u32) -> Node {
	Node::new(
		"msg_header",
		Value::Tree(Tree::new(vec![
			Node::new("type", Value::U32(type_value)),
			Node::new("timestamp", Value::U64(0)),
		])),
	)
}

fn entry(parent: &str, predicates: Vec<(&str, Value)>, child: &str) -> DetectorEntry {
	DetectorEntry {
		parent: parent.to_owned(),
		predicates: predicates
			.into_iter()
			.map(|(name, value)| (name.to_owned(), value))
			.collect(),
		child: child.to_owned(),
	}
}

#[test]
fn matching_predicates_name_the_child_type() {
	let mut catalog = Catalog::new();
	catalog.add_detector(entry("msg_header", vec![("type", Value::U32(0x52))], "ibeo.header"));

	let child = detect(&catalog, &msg_header(0x52)).expect("detection succeeds");
	assert_eq!(child, "ibeo.header");
}

#[test]
fn value_mismatch_falls_back_to_raw() {
	let mut catalog = Catalog::new();
	catalog.add_detector(entry("msg_header", vec![("type", Value::U32(0x52))], "ibeo.header"));

	let child = detect(&catalog, &msg_header(0x53)).expect("detection succeeds");
	assert_eq!(child, "raw");
}

#[test]
fn parent_name_must_match() {
	let mut catalog = Catalog::new();
	catalog.add_detector(entry("other_header", vec![("type", Value::U32(0x52))], "ibeo.header"));

	let child = detect(&catalog, &msg_header(0x52)).expect("detection succeeds");
	assert_eq!(child, "raw");
}

#[test]
fn missing_predicate_field_is_a_non_match() {
	let mut catalog = Catalog::new();
	catalog.add_detector(entry(
		"msg_header",
		vec![("absent", Value::U32(0)), ("type", Value::U32(0x52))],
		"ibeo.header",
	));

	let child = detect(&catalog, &msg_header(0x52)).expect("detection succeeds");
	assert_eq!(child, "raw");
}

#[test]
fn comparison_is_strongly_typed() {
	let mut catalog = Catalog::new();
	// Width mismatch: predicate coerced as uint16, field decoded as uint32.
	catalog.add_detector(entry("msg_header", vec![("type", Value::U16(0x52))], "ibeo.header"));

	let child = detect(&catalog, &msg_header(0x52)).expect("detection succeeds");
	assert_eq!(child, "raw");
}

#[test]
fn two_matching_entries_are_an_error() {
	let mut catalog = Catalog::new();
	catalog.add_detector(entry("msg_header", vec![("type", Value::U32(0x52))], "ibeo.header"));
	catalog.add_detector(entry("msg_header", vec![("timestamp", Value::U64(0))], "mobileye.header"));

	let err = detect(&catalog, &msg_header(0x52)).expect_err("ambiguity should fail");
	match err.kind() {
		ErrorKind::NonUniqueDetectors { first, second } => {
			assert_eq!(first, "ibeo.header");
			assert_eq!(second, "mobileye.header");
		}
		other => panic!("unexpected kind: {other}"),
	}
	assert_eq!(err.status(), Status::DescriptionError);
	assert_eq!(err.module(), Some("detector"));
}

#[test]
fn non_tree_parent_is_rejected() {
	let catalog = Catalog::new();
	let parent = Node::new("msg_header", Value::U32(7));
	let err = detect(&catalog, &parent).expect_err("non-tree parent should fail");
	assert!(matches!(err.kind(), ErrorKind::ParentNotTree));
	assert_eq!(err.status(), Status::BadInput);
}

#[test]
fn empty_parent_tree_is_rejected() {
	let catalog = Catalog::new();
	let parent = Node::new("msg_header", Value::Tree(Tree::new(Vec::new())));
	let err = detect(&catalog, &parent).expect_err("empty parent should fail");
	assert!(matches!(err.kind(), ErrorKind::EmptyParentTree));
}
