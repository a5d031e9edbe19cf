use crate::plog::descriptor::{Field, TypeDesc};
use crate::plog::{decode_record, Catalog, DetectorEntry, ErrorKind, PlogFile, Value};

fn record_bytes(index: u32, prev_size: u32, msg_type: u32, payload: &[u8]) -> Vec<u8> {
	let mut bytes = Vec::new();
	bytes.extend_from_slice(&index.to_le_bytes());
	bytes.extend_from_slice(&(20 + payload.len() as u32).to_le_bytes());
	bytes.extend_from_slice(&prev_size.to_le_bytes());
	bytes.extend_from_slice(&(1_000 + u64::from(index)).to_le_bytes());

	bytes.extend_from_slice(&msg_type.to_le_bytes());
	bytes.extend_from_slice(&(2_000 + u64::from(index)).to_le_bytes());
	bytes.extend_from_slice(&7_u64.to_le_bytes());

	bytes.extend_from_slice(payload);
	bytes
}

fn widget_catalog() -> Catalog {
	let mut catalog = Catalog::core();
	catalog
		.register(TypeDesc::new("widget", vec![Field::of::<u16>("v")]))
		.expect("widget registers");
	catalog.add_detector(DetectorEntry {
		parent: "msg_header".to_owned(),
		predicates: vec![("type".to_owned(), Value::U32(0x10))],
		child: "widget".to_owned(),
	});
	catalog
}

#[test]
fn iterates_records_in_stream_order() {
	let catalog = Catalog::core();
	let mut bytes = record_bytes(0, 0, 0x10, &[0xaa, 0xbb]);
	let first_len = bytes.len() as u32;
	bytes.extend_from_slice(&record_bytes(1, first_len, 0x11, &[0xcc]));

	let file = PlogFile::from_bytes(bytes);
	let records: Vec<_> = file
		.records(&catalog, 0)
		.collect::<Result<_, _>>()
		.expect("records parse");

	assert_eq!(records.len(), 2);
	assert_eq!(records[0].index, 0);
	assert_eq!(records[0].size, 22);
	assert_eq!(records[0].timestamp, 1_000);
	assert_eq!(records[0].payload, &[0xaa, 0xbb]);
	assert_eq!(records[0].file_offset, 0);
	assert_eq!(
		records[0].header.get("type").map(|node| &node.value),
		Some(&Value::U32(0x10))
	);

	assert_eq!(records[1].index, 1);
	assert_eq!(records[1].prev_size, first_len);
	assert_eq!(records[1].payload, &[0xcc]);
	assert_eq!(records[1].file_offset, first_len as usize);
}

#[test]
fn undersized_record_is_rejected() {
	let catalog = Catalog::core();
	let mut bytes = Vec::new();
	bytes.extend_from_slice(&0_u32.to_le_bytes());
	bytes.extend_from_slice(&10_u32.to_le_bytes()); // smaller than msg_header
	bytes.extend_from_slice(&0_u32.to_le_bytes());
	bytes.extend_from_slice(&0_u64.to_le_bytes());

	let file = PlogFile::from_bytes(bytes);
	let err = file
		.records(&catalog, 0)
		.next()
		.expect("one item")
		.expect_err("undersized record should fail");
	assert!(matches!(err.kind(), ErrorKind::RecordTooShort { size: 10 }));
	assert_eq!(err.module(), Some("plog"));
}

#[test]
fn truncated_stream_stops_iteration_with_an_error() {
	let catalog = Catalog::core();
	let mut bytes = record_bytes(0, 0, 0x10, &[0xaa]);
	bytes.truncate(bytes.len() - 1);

	let file = PlogFile::from_bytes(bytes);
	let mut iter = file.records(&catalog, 0);
	let err = iter.next().expect("one item").expect_err("truncated record should fail");
	assert!(matches!(err.kind(), ErrorKind::ReadError { .. }));
	assert!(iter.next().is_none(), "iteration ends after an error");
}

#[test]
fn detected_payload_decodes_as_named_child() {
	let catalog = widget_catalog();
	let bytes = record_bytes(0, 0, 0x10, &[0x2a, 0x00]);
	let file = PlogFile::from_bytes(bytes);

	let record = file
		.records(&catalog, 0)
		.next()
		.expect("one record")
		.expect("record parses");
	let tree = decode_record(&catalog, &record).expect("record decodes");

	let names: Vec<&str> = tree.iter().map(|node| node.name.as_str()).collect();
	assert_eq!(names, ["msg_header", "widget"]);

	let Some(Value::Tree(widget)) = tree.get("widget").map(|node| &node.value) else {
		panic!("expected widget tree");
	};
	assert_eq!(widget.get("v").map(|node| &node.value), Some(&Value::U16(0x2a)));
}

#[test]
fn undetected_payload_falls_back_to_raw() {
	let catalog = widget_catalog();
	let bytes = record_bytes(0, 0, 0x99, &[0xde, 0xad]);
	let file = PlogFile::from_bytes(bytes);

	let record = file
		.records(&catalog, 0)
		.next()
		.expect("one record")
		.expect("record parses");
	let tree = decode_record(&catalog, &record).expect("record decodes");

	let names: Vec<&str> = tree.iter().map(|node| node.name.as_str()).collect();
	assert_eq!(names, ["msg_header", "raw"]);
	assert_eq!(
		tree.get("raw").map(|node| &node.value),
		Some(&Value::Bytes(vec![0xde, 0xad]))
	);
}

#[test]
fn unconsumed_tail_after_detected_child_decodes_as_raw() {
	let catalog = widget_catalog();
	let bytes = record_bytes(0, 0, 0x10, &[0x2a, 0x00, 0xfe, 0xff]);
	let file = PlogFile::from_bytes(bytes);

	let record = file
		.records(&catalog, 0)
		.next()
		.expect("one record")
		.expect("record parses");
	let tree = decode_record(&catalog, &record).expect("record decodes");

	let names: Vec<&str> = tree.iter().map(|node| node.name.as_str()).collect();
	assert_eq!(names, ["msg_header", "widget", "raw"]);
	assert_eq!(
		tree.get("raw").map(|node| &node.value),
		Some(&Value::Bytes(vec![0xfe, 0xff]))
	);
}

#[test]
fn empty_payload_keeps_only_the_message_header() {
	let catalog = widget_catalog();
	let bytes = record_bytes(0, 0, 0x10, &[]);
	let file = PlogFile::from_bytes(bytes);

	let record = file
		.records(&catalog, 0)
		.next()
		.expect("one record")
		.expect("record parses");
	let tree = decode_record(&catalog, &record).expect("record decodes");
	assert_eq!(tree.len(), 1);
	assert_eq!(tree.nodes()[0].name, "msg_header");
}
