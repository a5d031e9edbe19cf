//! Shared test helpers for workspace crates: canned vendor descriptions
//! and a synthetic plog byte-image builder.

/// Vendor description TOML exercising fields, skips, arrays, endianness,
/// formatters, and a detector section.
pub fn sample_description() -> &'static str {
	r#"
[ibeo.header]
[[ibeo.header.description]]
name = "scanner_type"
type = "uint8"
format = "hex"
[[ibeo.header.description]]
skip = 3
[[ibeo.header.description]]
name = "size"
type = "uint16"
endian = true

[ibeo.header.detector."ibeo.vehicle_state"]
scanner_type = "0x52"

[ibeo.header.detector."ibeo.scan_points"]
scanner_type = "0x2a"

[ibeo.vehicle_state]
[[ibeo.vehicle_state.description]]
name = "timestamp"
type = "ps_timestamp"
[[ibeo.vehicle_state.description]]
name = "speed"
type = "uint16"
endian = true
[[ibeo.vehicle_state.description]]
name = "steering"
type = "int16"

[ibeo.scan_points]
[[ibeo.scan_points.description]]
name = "count"
type = "uint16"
[[ibeo.scan_points.description]]
name = "points"
type = "ibeo.point"
count = "count"

[ibeo.point]
[[ibeo.point.description]]
name = "x"
type = "int16"
[[ibeo.point.description]]
name = "y"
type = "int16"
"#
}

/// Incremental builder for a synthetic plog byte image.
#[derive(Default)]
pub struct LogBuilder {
	bytes: Vec<u8>,
	index: u32,
	prev_size: u32,
}

impl LogBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a minimal preamble header with no modules or type supports.
	pub fn header(mut self, version: (u8, u8, u16), node_guid: u64) -> Self {
		self.bytes.push(version.0);
		self.bytes.push(version.1);
		self.bytes.extend_from_slice(&version.2.to_le_bytes());
		self.bytes.extend_from_slice(&0_u32.to_le_bytes()); // build_date
		self.bytes.extend_from_slice(&node_guid.to_le_bytes());
		self.bytes.extend_from_slice(&0_u32.to_le_bytes()); // module_count
		self.bytes.extend_from_slice(&0_u32.to_le_bytes()); // type_support_count
		self
	}

	/// Append one record: envelope, message header, payload.
	pub fn record(mut self, msg_type: u32, timestamp: u64, src_guid: u64, payload: &[u8]) -> Self {
		let size = 20 + payload.len() as u32;

		self.bytes.extend_from_slice(&self.index.to_le_bytes());
		self.bytes.extend_from_slice(&size.to_le_bytes());
		self.bytes.extend_from_slice(&self.prev_size.to_le_bytes());
		self.bytes.extend_from_slice(&timestamp.to_le_bytes());

		self.bytes.extend_from_slice(&msg_type.to_le_bytes());
		self.bytes.extend_from_slice(&timestamp.to_le_bytes());
		self.bytes.extend_from_slice(&src_guid.to_le_bytes());
		self.bytes.extend_from_slice(payload);

		self.index += 1;
		self.prev_size = size;
		self
	}

	pub fn finish(self) -> Vec<u8> {
		self.bytes
	}
}
