use crate::plog::descriptor::{ArrayType, Field, Size, Terminal, TypeDesc};

/// Serialized size of a `msg_header` (type + timestamp + src_guid).
pub const MSG_HEADER_SIZE: usize = 20;

/// Type name decoded for every record's message header.
pub const MSG_HEADER: &str = "msg_header";

/// Type name of the log preamble.
pub const LOG_HEADER: &str = "log_header";

/// Type name of the per-record envelope.
pub const LOG_RECORD: &str = "log_record";

/// Hand-written descriptors for the fixed preamble structures.
///
/// The dynamic descriptor model subsumes these layouts: each
/// length-prefixed sequence becomes a count field followed by an array
/// sized by that sibling.
pub fn core_types() -> Vec<TypeDesc> {
	vec![
		// Length-prefixed byte string.
		TypeDesc::new(
			"ps_name",
			vec![
				Field::of::<u16>("len"),
				Field::array("value", Size::Field("len".to_owned()), ArrayType::Terminal(Terminal::UInt8)),
			],
		),
		TypeDesc::new(
			"log_module",
			vec![
				Field::of::<u8>("version_major"),
				Field::of::<u8>("version_minor"),
				Field::of::<u16>("version_subminor"),
				Field::of::<u32>("build_date"),
				Field::nested("build_hash", "ps_hash"),
				Field::nested("name", "ps_name"),
			],
		),
		TypeDesc::new(
			"type_support",
			vec![Field::of::<u32>("type"), Field::nested("name", "ps_name")],
		),
		TypeDesc::new(
			LOG_HEADER,
			vec![
				Field::of::<u8>("version_major"),
				Field::of::<u8>("version_minor"),
				Field::of::<u16>("version_subminor"),
				Field::of::<u32>("build_date"),
				Field::of::<u64>("node_guid"),
				Field::of::<u32>("module_count"),
				Field::array(
					"modules",
					Size::Field("module_count".to_owned()),
					ArrayType::Nested("log_module".to_owned()),
				),
				Field::of::<u32>("type_support_count"),
				Field::array(
					"type_supports",
					Size::Field("type_support_count".to_owned()),
					ArrayType::Nested("type_support".to_owned()),
				),
			],
		),
		TypeDesc::new(
			LOG_RECORD,
			vec![
				Field::of::<u32>("index"),
				Field::of::<u32>("size"),
				Field::of::<u32>("prev_size"),
				Field::of::<u64>("timestamp"),
			],
		),
		TypeDesc::new(
			MSG_HEADER,
			vec![
				Field::of::<u32>("type"),
				Field::of::<u64>("timestamp"),
				Field::of::<u64>("src_guid"),
			],
		),
	]
}
