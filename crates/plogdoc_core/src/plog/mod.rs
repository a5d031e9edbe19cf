mod bytes;
mod catalog;
mod decode;
mod descriptor;
mod detect;
mod error;
mod file;
mod preamble;
mod value;

/// Descriptor catalog and detector registry types.
pub use catalog::{Catalog, DetectorEntry};
/// Streaming descriptor-driven decoder.
pub use decode::Decoder;
/// Descriptor model: terminals, field layouts, and type descriptors.
pub use descriptor::{
	lookup_terminal, ArrayDesc, ArrayType, BitFieldDesc, BitFieldMember, ByteOrder, Field, FieldType, Size,
	Terminal, TerminalType, TypeDesc,
};
/// Payload type detection.
pub use detect::{detect, RAW_TYPE};
/// Error, status, and result aliases.
pub use error::{ErrorKind, PlogError, Result, Status};
/// Plog container, record iteration, and record decoding.
pub use file::{decode_record, PlogFile, Record, RecordIter};
/// Preamble type names and sizes.
pub use preamble::{LOG_HEADER, LOG_RECORD, MSG_HEADER, MSG_HEADER_SIZE};
/// Decoded runtime value types.
pub use value::{Formatter, Node, Tree, Value};
