use crate::plog::descriptor::{lookup_terminal, BitFieldDesc, Field, FieldType, Terminal, TerminalType};

#[test]
fn registry_holds_the_ten_primitives() {
	assert_eq!(Terminal::ALL.len(), 10);
	for term in Terminal::ALL {
		assert_eq!(Terminal::by_name(term.name()), Some(term));
	}
}

#[test]
fn terminal_sizes_match_width() {
	assert_eq!(Terminal::UInt8.size(), 1);
	assert_eq!(Terminal::Int16.size(), 2);
	assert_eq!(Terminal::UInt32.size(), 4);
	assert_eq!(Terminal::Float32.size(), 4);
	assert_eq!(Terminal::Int64.size(), 8);
	assert_eq!(Terminal::Float64.size(), 8);
}

#[test]
fn lookup_resolves_aliases_to_canonical_ids() {
	assert_eq!(lookup_terminal("uint16"), Some(Terminal::UInt16));
	assert_eq!(lookup_terminal("float"), Some(Terminal::Float32));
	assert_eq!(lookup_terminal("double"), Some(Terminal::Float64));
	assert_eq!(lookup_terminal("ps_timestamp"), Some(Terminal::UInt64));
	assert_eq!(lookup_terminal("ps_guid"), Some(Terminal::UInt64));
	assert_eq!(lookup_terminal("ps_msg_type"), Some(Terminal::UInt32));
	assert_eq!(lookup_terminal("widget"), None);
}

#[test]
fn aliases_do_not_extend_the_canonical_set() {
	assert_eq!(Terminal::by_name("ps_timestamp"), None);
	assert_eq!(Terminal::by_name("double"), None);
}

#[test]
fn native_identity_maps_to_terminals() {
	assert_eq!(<u8 as TerminalType>::TERMINAL, Terminal::UInt8);
	assert_eq!(<i32 as TerminalType>::TERMINAL, Terminal::Int32);
	assert_eq!(<f64 as TerminalType>::TERMINAL, Terminal::Float64);

	let field = Field::of::<u32>("build_date");
	assert_eq!(field.kind, FieldType::Terminal(Terminal::UInt32));
}

#[test]
fn bitfield_total_sums_member_widths() {
	let desc = BitFieldDesc::new(vec![("lo", 3), ("mid", 5), ("hi", 8)]);
	assert_eq!(desc.total_bits(), 16);
	assert_eq!(desc.members[0].name, "lo");
}
