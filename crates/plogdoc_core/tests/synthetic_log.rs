//! End-to-end decode of a synthetic plog through TOML-loaded descriptions.

use plogdoc_core::plog::{decode_record, Catalog, DetectorEntry, PlogFile, Value};
use plogdoc_testkit::{sample_description, LogBuilder};

const IBEO_MSG: u32 = 0x10;

fn vendor_catalog() -> Catalog {
	let mut catalog = Catalog::core();
	catalog.load_str(sample_description()).expect("descriptions load");
	catalog.add_detector(DetectorEntry {
		parent: "msg_header".to_owned(),
		predicates: vec![("type".to_owned(), Value::U32(IBEO_MSG))],
		child: "ibeo.header".to_owned(),
	});
	catalog
}

fn ibeo_header(scanner_type: u8, size: u16) -> Vec<u8> {
	let mut bytes = vec![scanner_type, 0, 0, 0];
	bytes.extend_from_slice(&size.to_be_bytes());
	bytes
}

#[test]
fn decodes_a_full_synthetic_log() {
	let catalog = vendor_catalog();

	// Record 0: vehicle state behind an ibeo header.
	let mut vehicle_payload = ibeo_header(0x52, 12);
	vehicle_payload.extend_from_slice(&123_456_u64.to_le_bytes()); // timestamp
	vehicle_payload.extend_from_slice(&256_u16.to_be_bytes()); // speed
	vehicle_payload.extend_from_slice(&(-5_i16).to_le_bytes()); // steering

	// Record 1: two scan points behind an ibeo header.
	let mut scan_payload = ibeo_header(0x2a, 10);
	scan_payload.extend_from_slice(&2_u16.to_le_bytes()); // count
	for (x, y) in [(1_i16, -1_i16), (7, 9)] {
		scan_payload.extend_from_slice(&x.to_le_bytes());
		scan_payload.extend_from_slice(&y.to_le_bytes());
	}

	// Record 2: unknown message type, kept raw.
	let bytes = LogBuilder::new()
		.header((1, 1, 0), 0xabcd)
		.record(IBEO_MSG, 10, 1, &vehicle_payload)
		.record(IBEO_MSG, 20, 1, &scan_payload)
		.record(0x99, 30, 1, &[0xca, 0xfe])
		.finish();

	let file = PlogFile::from_bytes(bytes);
	let (header, offset) = file.header(&catalog).expect("preamble decodes");
	assert_eq!(header.get("node_guid").map(|node| &node.value), Some(&Value::U64(0xabcd)));

	let records: Vec<_> = file
		.records(&catalog, offset)
		.collect::<Result<_, _>>()
		.expect("records parse");
	assert_eq!(records.len(), 3);

	// Record 0: msg_header -> ibeo.header -> ibeo.vehicle_state.
	let tree = decode_record(&catalog, &records[0]).expect("record 0 decodes");
	let names: Vec<&str> = tree.iter().map(|node| node.name.as_str()).collect();
	assert_eq!(names, ["msg_header", "ibeo.header", "ibeo.vehicle_state"]);

	let Some(Value::Tree(ibeo)) = tree.get("ibeo.header").map(|node| &node.value) else {
		panic!("expected ibeo.header tree");
	};
	assert_eq!(ibeo.get("scanner_type").map(|node| &node.value), Some(&Value::U8(0x52)));
	assert_eq!(ibeo.get("skip-1").map(|node| &node.value), Some(&Value::Bytes(vec![0, 0, 0])));
	assert_eq!(ibeo.get("size").map(|node| &node.value), Some(&Value::U16(12)));

	let Some(Value::Tree(state)) = tree.get("ibeo.vehicle_state").map(|node| &node.value) else {
		panic!("expected vehicle state tree");
	};
	assert_eq!(state.get("timestamp").map(|node| &node.value), Some(&Value::U64(123_456)));
	assert_eq!(state.get("speed").map(|node| &node.value), Some(&Value::U16(256)));
	assert_eq!(state.get("steering").map(|node| &node.value), Some(&Value::I16(-5)));

	// Record 1: sibling-sized array of nested points.
	let tree = decode_record(&catalog, &records[1]).expect("record 1 decodes");
	let Some(Value::Tree(scan)) = tree.get("ibeo.scan_points").map(|node| &node.value) else {
		panic!("expected scan points tree");
	};
	let Some(Value::TreeArray(points)) = scan.get("points").map(|node| &node.value) else {
		panic!("expected points array");
	};
	assert_eq!(points.len(), 2);
	assert_eq!(points[0].get("y").map(|node| &node.value), Some(&Value::I16(-1)));
	assert_eq!(points[1].get("x").map(|node| &node.value), Some(&Value::I16(7)));

	// Record 2: undetected payload falls back to raw.
	let tree = decode_record(&catalog, &records[2]).expect("record 2 decodes");
	assert_eq!(
		tree.get("raw").map(|node| &node.value),
		Some(&Value::Bytes(vec![0xca, 0xfe]))
	);
}
