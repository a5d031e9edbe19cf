use tracing::{debug, trace};

use crate::plog::bytes::Cursor;
use crate::plog::descriptor::{
	lookup_terminal, ArrayDesc, ArrayType, BitFieldDesc, ByteOrder, Field, FieldType, Size, Terminal, TypeDesc,
};
use crate::plog::value::{Formatter, Node, Tree, Value};
use crate::plog::{Catalog, ErrorKind, PlogError, Result};

/// Streaming, strictly forward descriptor-driven reader over one byte slice.
///
/// The decoder does not own the bytes; callers manage stream lifetime and
/// set the record end before decoding a record payload so that the `raw`
/// terminal can consume the remainder.
pub struct Decoder<'a> {
	cursor: Cursor<'a>,
	record_end: Option<usize>,
}

impl<'a> Decoder<'a> {
	pub fn new(bytes: &'a [u8]) -> Self {
		Self {
			cursor: Cursor::new(bytes),
			record_end: None,
		}
	}

	/// Decoder over exactly one record payload.
	pub fn record(payload: &'a [u8]) -> Self {
		Self {
			cursor: Cursor::new(payload),
			record_end: Some(payload.len()),
		}
	}

	/// Set the absolute offset where the current record ends.
	pub fn set_record_end(&mut self, end: usize) {
		self.record_end = Some(end);
	}

	pub fn pos(&self) -> usize {
		self.cursor.pos()
	}

	pub fn remaining(&self) -> usize {
		self.cursor.remaining()
	}

	/// Decode one value of the named type, advancing the stream by exactly
	/// the type's byte footprint.
	pub fn decode(&mut self, catalog: &Catalog, type_name: &str) -> Result<Value> {
		self.decode_named(catalog, type_name, None, false)
			.map_err(|err| err.with_module("decoder").with_type(type_name))
	}

	/// Decode a catalog-described type directly to its tree.
	pub fn decode_tree(&mut self, catalog: &Catalog, type_name: &str) -> Result<Tree> {
		let desc = catalog.get(type_name).ok_or_else(|| {
			PlogError::new(ErrorKind::NoDecoder)
				.with_module("decoder")
				.with_type(type_name)
		})?;
		debug!(type_name, offset = self.cursor.pos(), "decoding type");
		self.decode_type(catalog, desc)
	}

	/// Dispatch a type name: special readers and terminals (including the
	/// `.be` suffix convention) first, then the catalog.
	fn decode_named(&mut self, catalog: &Catalog, name: &str, order: Option<ByteOrder>, nested: bool) -> Result<Value> {
		match name {
			"raw" => return self.read_raw(),
			"ps_hash" => return Ok(Value::Hash(self.cursor.read_u128_be()?)),
			_ => {}
		}

		let (base, suffix_order) = match name.strip_suffix(".be") {
			Some(base) => (base, Some(ByteOrder::Big)),
			None => (name, None),
		};
		if let Some(term) = lookup_terminal(base) {
			let order = suffix_order.or(order).unwrap_or(ByteOrder::Little);
			return self.read_terminal(term, order);
		}

		match catalog.get(name) {
			Some(desc) => {
				debug!(type_name = name, offset = self.cursor.pos(), "decoding type");
				Ok(Value::Tree(self.decode_type(catalog, desc)?))
			}
			None if nested => Err(ErrorKind::NoNestedDescriptor { name: name.to_owned() }.into()),
			None => Err(ErrorKind::NoDecoder.into()),
		}
	}

	/// Walk a described type field by field, appending one node per field.
	fn decode_type(&mut self, catalog: &Catalog, desc: &TypeDesc) -> Result<Tree> {
		let mut nodes: Vec<Node> = Vec::with_capacity(desc.fields.len());

		for field in &desc.fields {
			if let Err(err) = self.decode_field(catalog, &mut nodes, field) {
				let err = err.with_module("decoder").with_type(desc.name.clone());
				// A failed read leaves the stream indeterminate; only
				// decode-level failures quote the partial tree.
				let err = match err.kind() {
					ErrorKind::ReadError { .. } | ErrorKind::Io(_) => err,
					_ => err.with_partial(Tree::new(nodes)),
				};
				return Err(err);
			}
		}

		Ok(Tree::new(nodes))
	}

	fn decode_field(&mut self, catalog: &Catalog, nodes: &mut Vec<Node>, field: &Field) -> Result<()> {
		match &field.kind {
			FieldType::Terminal(term) => {
				let value = self
					.read_terminal(*term, field.byteorder)
					.map_err(|err| err.with_field(field.name.clone()))?;
				trace!(field = %field.name, value = %value, "decoded terminal");
				nodes.push(Node::with_format(field.name.clone(), value, field.format));
			}
			FieldType::Nested(nested) => {
				// Aliases sometimes appear as nested types because the alias
				// was defined after the type that uses it; the terminal
				// re-dispatch inside decode_named covers that case.
				let value = self
					.decode_named(catalog, nested, Some(field.byteorder), true)
					.map_err(|err| err.with_field(field.name.clone()))?;
				trace!(field = %field.name, nested = %nested, "decoded nested");
				nodes.push(Node::with_format(field.name.clone(), value, field.format));
			}
			FieldType::Array(array) => self.decode_array(catalog, nodes, field, array)?,
			FieldType::BitField(bits) => self.decode_bitfield(nodes, bits)?,
			FieldType::Skip { size, order } => {
				let bytes = self.cursor.read_exact(*size)?.to_vec();
				trace!(skip = *order, size = *size, "retained reserved bytes");
				nodes.push(Node::new(format!("skip-{order}"), Value::Bytes(bytes)));
			}
		}
		Ok(())
	}

	fn decode_array(&mut self, catalog: &Catalog, nodes: &mut Vec<Node>, field: &Field, array: &ArrayDesc) -> Result<()> {
		let count = match &array.size {
			Size::Fixed(count) => *count as u64,
			Size::Field(sibling) => {
				// The sibling must already sit in the current child tree.
				let node = nodes
					.iter()
					.find(|node| node.name == *sibling)
					.ok_or_else(|| PlogError::new(ErrorKind::MissingSizeField).with_field(sibling.clone()))?;
				node.value.as_index().ok_or_else(|| {
					PlogError::new(ErrorKind::BadSizeValue {
						label: node.value.type_label(),
					})
					.with_field(sibling.clone())
				})?
			}
		};

		match &array.elem {
			ArrayType::Nested(type_name) => {
				let desc = catalog
					.get(type_name)
					.ok_or_else(|| ErrorKind::NoNestedDescriptor { name: type_name.clone() })?;
				let mut trees = Vec::with_capacity(count as usize);
				for index in 0..count {
					trace!(elem = %type_name, index, count, "decoding array element");
					trees.push(self.decode_type(catalog, desc)?);
				}
				nodes.push(Node::with_format(field.name.clone(), Value::TreeArray(trees), field.format));
			}
			ArrayType::Terminal(term) => {
				let total = (count as usize)
					.checked_mul(term.size())
					.ok_or_else(|| PlogError::read_error(self.cursor.pos(), usize::MAX, self.cursor.remaining()))?;
				let bytes = self.cursor.read_exact(total)?.to_vec();
				nodes.push(Node::with_format(field.name.clone(), Value::Bytes(bytes), field.format));
			}
		}
		Ok(())
	}

	/// Read a byte-aligned bitfield partition and extract members starting
	/// from the least significant end.
	fn decode_bitfield(&mut self, nodes: &mut Vec<Node>, bits: &BitFieldDesc) -> Result<()> {
		let total_bits = bits.total_bits();
		if total_bits == 0 || total_bits % 8 != 0 {
			return Err(ErrorKind::BitFieldAlignment { total_bits }.into());
		}
		if total_bits > 128 {
			return Err(ErrorKind::BitFieldTooWide { total_bits }.into());
		}

		let bytes = self.cursor.read_exact(total_bits / 8)?;
		let mut blob: u128 = 0;
		for byte in bytes {
			blob = (blob << 8) | u128::from(*byte);
		}

		for member in &bits.members {
			if member.width == 0 || member.width > 64 {
				return Err(PlogError::new(ErrorKind::BitFieldMemberWidth { width: member.width })
					.with_field(member.name.clone()));
			}
			let mask = (1_u128 << member.width) - 1;
			let extracted = (blob & mask) as u64;
			blob >>= member.width;

			let value = if member.width <= 8 {
				Value::U8(extracted as u8)
			} else if member.width <= 16 {
				Value::U16(extracted as u16)
			} else if member.width <= 32 {
				Value::U32(extracted as u32)
			} else {
				Value::U64(extracted)
			};
			trace!(field = %member.name, width = member.width, value = extracted, "extracted bitfield member");
			nodes.push(Node::with_format(member.name.clone(), value, Some(Formatter::Hex)));
		}
		Ok(())
	}

	/// Consume the remainder of the current record into a byte buffer.
	fn read_raw(&mut self) -> Result<Value> {
		let end = self.record_end.ok_or(ErrorKind::NoRecordBoundary)?;
		let rem = end.saturating_sub(self.cursor.pos());
		let bytes = self.cursor.read_exact(rem)?.to_vec();
		Ok(Value::Bytes(bytes))
	}

	fn read_terminal(&mut self, term: Terminal, order: ByteOrder) -> Result<Value> {
		let value = match (term, order) {
			(Terminal::Int8, _) => Value::I8(self.cursor.read_i8()?),
			(Terminal::UInt8, _) => Value::U8(self.cursor.read_u8()?),
			(Terminal::Int16, ByteOrder::Little) => Value::I16(self.cursor.read_i16_le()?),
			(Terminal::Int16, ByteOrder::Big) => Value::I16(self.cursor.read_i16_be()?),
			(Terminal::Int32, ByteOrder::Little) => Value::I32(self.cursor.read_i32_le()?),
			(Terminal::Int32, ByteOrder::Big) => Value::I32(self.cursor.read_i32_be()?),
			(Terminal::Int64, ByteOrder::Little) => Value::I64(self.cursor.read_i64_le()?),
			(Terminal::Int64, ByteOrder::Big) => Value::I64(self.cursor.read_i64_be()?),
			(Terminal::UInt16, ByteOrder::Little) => Value::U16(self.cursor.read_u16_le()?),
			(Terminal::UInt16, ByteOrder::Big) => Value::U16(self.cursor.read_u16_be()?),
			(Terminal::UInt32, ByteOrder::Little) => Value::U32(self.cursor.read_u32_le()?),
			(Terminal::UInt32, ByteOrder::Big) => Value::U32(self.cursor.read_u32_be()?),
			(Terminal::UInt64, ByteOrder::Little) => Value::U64(self.cursor.read_u64_le()?),
			(Terminal::UInt64, ByteOrder::Big) => Value::U64(self.cursor.read_u64_be()?),
			(Terminal::Float32, ByteOrder::Little) => Value::F32(self.cursor.read_f32_le()?),
			(Terminal::Float32, ByteOrder::Big) => Value::F32(self.cursor.read_f32_be()?),
			(Terminal::Float64, ByteOrder::Little) => Value::F64(self.cursor.read_f64_le()?),
			(Terminal::Float64, ByteOrder::Big) => Value::F64(self.cursor.read_f64_be()?),
		};
		Ok(value)
	}
}
