use crate::plog::value::Formatter;

/// Canonical terminal id for the ten primitive numeric families.
///
/// Endianness is a per-field attribute, not part of the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
	Int8,
	Int16,
	Int32,
	Int64,
	UInt8,
	UInt16,
	UInt32,
	UInt64,
	Float32,
	Float64,
}

/// Alias names accepted wherever a terminal name is expected.
///
/// These appear in real descriptions as shorthand for their primitive
/// family; the canonical id set stays the ten entries of [`Terminal`].
const TERMINAL_ALIASES: &[(&str, Terminal)] = &[
	("float", Terminal::Float32),
	("double", Terminal::Float64),
	("ps_timestamp", Terminal::UInt64),
	("ps_guid", Terminal::UInt64),
	("ps_msg_type", Terminal::UInt32),
];

impl Terminal {
	/// All canonical terminals, in registry order.
	pub const ALL: [Terminal; 10] = [
		Terminal::Int8,
		Terminal::Int16,
		Terminal::Int32,
		Terminal::Int64,
		Terminal::UInt8,
		Terminal::UInt16,
		Terminal::UInt32,
		Terminal::UInt64,
		Terminal::Float32,
		Terminal::Float64,
	];

	/// Canonical terminal name.
	pub fn name(self) -> &'static str {
		match self {
			Terminal::Int8 => "int8",
			Terminal::Int16 => "int16",
			Terminal::Int32 => "int32",
			Terminal::Int64 => "int64",
			Terminal::UInt8 => "uint8",
			Terminal::UInt16 => "uint16",
			Terminal::UInt32 => "uint32",
			Terminal::UInt64 => "uint64",
			Terminal::Float32 => "float32",
			Terminal::Float64 => "float64",
		}
	}

	/// Serialized size in bytes.
	pub fn size(self) -> usize {
		match self {
			Terminal::Int8 | Terminal::UInt8 => 1,
			Terminal::Int16 | Terminal::UInt16 => 2,
			Terminal::Int32 | Terminal::UInt32 | Terminal::Float32 => 4,
			Terminal::Int64 | Terminal::UInt64 | Terminal::Float64 => 8,
		}
	}

	/// Look up a canonical terminal by name.
	pub fn by_name(name: &str) -> Option<Terminal> {
		Terminal::ALL.iter().copied().find(|term| term.name() == name)
	}
}

/// Resolve a terminal name or alias to its canonical id.
pub fn lookup_terminal(name: &str) -> Option<Terminal> {
	Terminal::by_name(name).or_else(|| {
		TERMINAL_ALIASES
			.iter()
			.find(|(alias, _)| *alias == name)
			.map(|(_, term)| *term)
	})
}

/// Native types with a terminal identity, for describing fixed structures.
pub trait TerminalType {
	const TERMINAL: Terminal;
}

macro_rules! terminal_type {
	($($native:ty => $term:ident),* $(,)?) => {
		$(impl TerminalType for $native {
			const TERMINAL: Terminal = Terminal::$term;
		})*
	};
}

terminal_type! {
	i8 => Int8,
	i16 => Int16,
	i32 => Int32,
	i64 => Int64,
	u8 => UInt8,
	u16 => UInt16,
	u32 => UInt32,
	u64 => UInt64,
	f32 => Float32,
	f64 => Float64,
}

/// Byte order applied when reading a terminal field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
	Little,
	Big,
}

/// Array element count: fixed, or read from a previously decoded sibling.
#[derive(Debug, Clone, PartialEq)]
pub enum Size {
	Fixed(usize),
	Field(String),
}

/// Array element type.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayType {
	Terminal(Terminal),
	Nested(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDesc {
	pub size: Size,
	pub elem: ArrayType,
}

/// One member of a bitfield partition.
#[derive(Debug, Clone, PartialEq)]
pub struct BitFieldMember {
	pub name: String,
	pub width: usize,
}

/// Byte-aligned partition of sub-byte unsigned fields, packed low-bits-first.
#[derive(Debug, Clone, PartialEq)]
pub struct BitFieldDesc {
	pub members: Vec<BitFieldMember>,
}

impl BitFieldDesc {
	pub fn new(members: Vec<(&str, usize)>) -> Self {
		Self {
			members: members
				.into_iter()
				.map(|(name, width)| BitFieldMember {
					name: name.to_owned(),
					width,
				})
				.collect(),
		}
	}

	/// Total declared width in bits.
	pub fn total_bits(&self) -> usize {
		self.members.iter().map(|member| member.width).sum()
	}
}

/// Closed set of field layouts a descriptor can declare.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
	Terminal(Terminal),
	Nested(String),
	Array(ArrayDesc),
	BitField(BitFieldDesc),
	/// Reserved bytes, retained under the synthesized name `skip-<order>`.
	Skip { size: usize, order: u16 },
}

/// One field of a described type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	pub name: String,
	pub kind: FieldType,
	pub byteorder: ByteOrder,
	pub format: Option<Formatter>,
}

impl Field {
	pub fn new(name: impl Into<String>, kind: FieldType) -> Self {
		Self {
			name: name.into(),
			kind,
			byteorder: ByteOrder::Little,
			format: None,
		}
	}

	/// Terminal field typed by native identity.
	pub fn of<T: TerminalType>(name: impl Into<String>) -> Self {
		Self::new(name, FieldType::Terminal(T::TERMINAL))
	}

	pub fn nested(name: impl Into<String>, type_name: impl Into<String>) -> Self {
		Self::new(name, FieldType::Nested(type_name.into()))
	}

	pub fn array(name: impl Into<String>, size: Size, elem: ArrayType) -> Self {
		Self::new(name, FieldType::Array(ArrayDesc { size, elem }))
	}

	pub fn big_endian(mut self) -> Self {
		self.byteorder = ByteOrder::Big;
		self
	}

	pub fn formatted(mut self, format: Formatter) -> Self {
		self.format = Some(format);
		self
	}
}

/// Runtime-loaded layout of one named type: an ordered field sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDesc {
	pub name: String,
	pub fields: Vec<Field>,
}

impl TypeDesc {
	pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
		Self {
			name: name.into(),
			fields,
		}
	}

	/// Find a field by name.
	pub fn field(&self, name: &str) -> Option<&Field> {
		self.fields.iter().find(|field| field.name == name)
	}
}

#[cfg(test)]
mod tests;
