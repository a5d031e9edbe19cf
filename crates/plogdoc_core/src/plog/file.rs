use std::fs;
use std::path::Path;

use tracing::debug;

use crate::plog::bytes::Cursor;
use crate::plog::preamble::{LOG_HEADER, MSG_HEADER, MSG_HEADER_SIZE};
use crate::plog::value::{Node, Tree, Value};
use crate::plog::{detect, Catalog, Decoder, ErrorKind, PlogError, Result};

/// In-memory plog container.
///
/// The file owns its bytes; decoders borrow record payload slices and read
/// strictly forward.
pub struct PlogFile {
	bytes: Vec<u8>,
}

impl PlogFile {
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let bytes = fs::read(path).map_err(|err| PlogError::from(err).with_path(path.display().to_string()))?;
		Ok(Self { bytes })
	}

	pub fn from_bytes(bytes: Vec<u8>) -> Self {
		Self { bytes }
	}

	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Decode the preamble, returning the header tree and the offset of the
	/// first record.
	pub fn header(&self, catalog: &Catalog) -> Result<(Tree, usize)> {
		let mut decoder = Decoder::new(&self.bytes);
		let tree = decoder.decode_tree(catalog, LOG_HEADER)?;
		Ok((tree, decoder.pos()))
	}

	/// Iterate records starting at `start` (the offset returned by
	/// [`PlogFile::header`]).
	pub fn records<'a>(&'a self, catalog: &'a Catalog, start: usize) -> RecordIter<'a> {
		RecordIter::new(catalog, &self.bytes, start)
	}
}

/// One log record: fixed envelope, decoded message header, raw payload.
#[derive(Debug, Clone)]
pub struct Record<'a> {
	pub index: u32,
	pub size: u32,
	pub prev_size: u32,
	pub timestamp: u64,
	/// Decoded `msg_header` tree; detection branches on its fields.
	pub header: Tree,
	/// Payload bytes following the message header.
	pub payload: &'a [u8],
	/// File offset of the record envelope.
	pub file_offset: usize,
}

pub struct RecordIter<'a> {
	catalog: &'a Catalog,
	cursor: Cursor<'a>,
	offset_base: usize,
	done: bool,
}

impl<'a> RecordIter<'a> {
	pub fn new(catalog: &'a Catalog, bytes: &'a [u8], offset: usize) -> Self {
		let slice = bytes.get(offset..).unwrap_or(&[]);
		Self {
			catalog,
			cursor: Cursor::new(slice),
			offset_base: offset,
			done: false,
		}
	}

	fn parse_next(&mut self) -> Result<Record<'a>> {
		let file_offset = self.offset_base + self.cursor.pos();

		let index = self.cursor.read_u32_le()?;
		let size = self.cursor.read_u32_le()?;
		let prev_size = self.cursor.read_u32_le()?;
		let timestamp = self.cursor.read_u64_le()?;

		// `size` counts the message header plus the payload behind it.
		let payload_len = (size as usize)
			.checked_sub(MSG_HEADER_SIZE)
			.ok_or(ErrorKind::RecordTooShort { size: u64::from(size) })?;

		let header_bytes = self.cursor.read_exact(MSG_HEADER_SIZE)?;
		let header = Decoder::new(header_bytes).decode_tree(self.catalog, MSG_HEADER)?;
		let payload = self.cursor.read_exact(payload_len)?;

		debug!(index, size, file_offset, "read record");
		Ok(Record {
			index,
			size,
			prev_size,
			timestamp,
			header,
			payload,
			file_offset,
		})
	}
}

impl<'a> Iterator for RecordIter<'a> {
	type Item = Result<Record<'a>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}
		if self.cursor.remaining() == 0 {
			self.done = true;
			return None;
		}

		let result = self.parse_next().map_err(|err| err.with_module("plog"));
		if result.is_err() {
			self.done = true;
		}
		Some(result)
	}
}

/// Decode a record payload through the detector loop.
///
/// Starting from the message header, each decoded node is offered to the
/// detector to name the next payload type, until the record is consumed.
/// An undetected remainder decodes as `raw`.
pub fn decode_record(catalog: &Catalog, record: &Record<'_>) -> Result<Tree> {
	let mut decoder = Decoder::record(record.payload);
	let mut nodes = vec![Node::new(MSG_HEADER, Value::Tree(record.header.clone()))];

	while decoder.remaining() > 0 {
		let child = match nodes.last() {
			Some(parent) => detect(catalog, parent)?,
			None => break,
		};

		let before = decoder.remaining();
		let value = decoder.decode(catalog, &child)?;
		if decoder.remaining() == before {
			return Err(PlogError::new(ErrorKind::DecodeStalled { name: child })
				.with_module("plog")
				.with_partial(Tree::new(nodes)));
		}

		debug!(child = %child, remaining = decoder.remaining(), "decoded record sequel");
		nodes.push(Node::new(child, value));
	}

	Ok(Tree::new(nodes))
}

#[cfg(test)]
mod tests;
