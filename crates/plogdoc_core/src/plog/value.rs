use std::fmt;
use std::sync::Arc;

/// Decoded runtime value for one descriptor field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	I8(i8),
	I16(i16),
	I32(i32),
	I64(i64),
	U8(u8),
	U16(u16),
	U32(u32),
	U64(u64),
	F32(f32),
	F64(f64),
	/// Wide fixed-width unsigned integer, used for hash fields.
	Hash(u128),
	/// Opaque byte buffer (`raw`, `skip-N`, terminal arrays).
	Bytes(Vec<u8>),
	Tree(Tree),
	/// Homogeneous array of decoded subtrees.
	TreeArray(Vec<Tree>),
}

impl Value {
	/// Coerce unsigned integer variants to an array element count.
	pub fn as_index(&self) -> Option<u64> {
		match self {
			Value::U8(v) => Some(u64::from(*v)),
			Value::U16(v) => Some(u64::from(*v)),
			Value::U32(v) => Some(u64::from(*v)),
			Value::U64(v) => Some(*v),
			_ => None,
		}
	}

	/// Stable lowercase label for diagnostics.
	pub fn type_label(&self) -> &'static str {
		match self {
			Value::I8(_) => "int8",
			Value::I16(_) => "int16",
			Value::I32(_) => "int32",
			Value::I64(_) => "int64",
			Value::U8(_) => "uint8",
			Value::U16(_) => "uint16",
			Value::U32(_) => "uint32",
			Value::U64(_) => "uint64",
			Value::F32(_) => "float32",
			Value::F64(_) => "float64",
			Value::Hash(_) => "hash",
			Value::Bytes(_) => "bytes",
			Value::Tree(_) => "tree",
			Value::TreeArray(_) => "tree array",
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::I8(v) => write!(f, "{v}"),
			Value::I16(v) => write!(f, "{v}"),
			Value::I32(v) => write!(f, "{v}"),
			Value::I64(v) => write!(f, "{v}"),
			Value::U8(v) => write!(f, "{v}"),
			Value::U16(v) => write!(f, "{v}"),
			Value::U32(v) => write!(f, "{v}"),
			Value::U64(v) => write!(f, "{v}"),
			Value::F32(v) => write!(f, "{v}"),
			Value::F64(v) => write!(f, "{v}"),
			Value::Hash(v) => write!(f, "0x{v:x}"),
			Value::Bytes(bytes) => write_bytes(f, bytes),
			Value::Tree(tree) => write!(f, "{tree}"),
			Value::TreeArray(trees) => {
				write!(f, "[")?;
				for (idx, tree) in trees.iter().enumerate() {
					if idx > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{tree}")?;
				}
				write!(f, "]")
			}
		}
	}
}

const BYTES_PRINT_MAX: usize = 32;

fn write_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
	write!(f, "[")?;
	for (idx, byte) in bytes.iter().take(BYTES_PRINT_MAX).enumerate() {
		if idx > 0 {
			write!(f, " ")?;
		}
		write!(f, "{byte:02x}")?;
	}
	if bytes.len() > BYTES_PRINT_MAX {
		write!(f, " .. {} bytes", bytes.len())?;
	}
	write!(f, "]")
}

/// Named pure presentation function attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
	Hex,
}

impl Formatter {
	/// Resolve a formatter by its description-file name.
	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"hex" => Some(Formatter::Hex),
			_ => None,
		}
	}

	/// Description-file name of this formatter.
	pub fn name(self) -> &'static str {
		match self {
			Formatter::Hex => "hex",
		}
	}

	/// Render a value through this formatter.
	pub fn apply(self, value: &Value) -> String {
		match (self, value) {
			(Formatter::Hex, Value::I8(v)) => format!("0x{v:x}"),
			(Formatter::Hex, Value::I16(v)) => format!("0x{v:x}"),
			(Formatter::Hex, Value::I32(v)) => format!("0x{v:x}"),
			(Formatter::Hex, Value::I64(v)) => format!("0x{v:x}"),
			(Formatter::Hex, Value::U8(v)) => format!("0x{v:x}"),
			(Formatter::Hex, Value::U16(v)) => format!("0x{v:x}"),
			(Formatter::Hex, Value::U32(v)) => format!("0x{v:x}"),
			(Formatter::Hex, Value::U64(v)) => format!("0x{v:x}"),
			(Formatter::Hex, Value::Hash(v)) => format!("0x{v:x}"),
			(Formatter::Hex, other) => other.to_string(),
		}
	}
}

/// One named node of a decoded tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
	pub name: String,
	pub value: Value,
	/// Optional presentation override applied when printing.
	pub format: Option<Formatter>,
}

impl Node {
	pub fn new(name: impl Into<String>, value: Value) -> Self {
		Self {
			name: name.into(),
			value,
			format: None,
		}
	}

	pub fn with_format(name: impl Into<String>, value: Value, format: Option<Formatter>) -> Self {
		Self {
			name: name.into(),
			value,
			format,
		}
	}

	/// Render the value, honoring the attached formatter.
	pub fn render(&self) -> String {
		match self.format {
			Some(formatter) => formatter.apply(&self.value),
			None => self.value.to_string(),
		}
	}
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.name, self.render())
	}
}

/// Shared, ordered sequence of named nodes.
///
/// Trees are append-only while a decode is in flight and logically immutable
/// once the producing call returns; sharing lets a partial decode be quoted
/// into error context without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
	nodes: Arc<Vec<Node>>,
}

impl Tree {
	pub fn new(nodes: Vec<Node>) -> Self {
		Self { nodes: Arc::new(nodes) }
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Find a child node by name.
	pub fn get(&self, name: &str) -> Option<&Node> {
		self.nodes.iter().find(|node| node.name == name)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Node> {
		self.nodes.iter()
	}
}

impl fmt::Display for Tree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{{ ")?;
		for (idx, node) in self.nodes.iter().enumerate() {
			if idx > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{node}")?;
		}
		write!(f, " }}")
	}
}
