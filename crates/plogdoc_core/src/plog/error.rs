use std::fmt;

use thiserror::Error;

use crate::plog::value::Tree;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, PlogError>;

/// Machine-readable failure class, surfaced as a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	Ok,
	BadArgument,
	BadInput,
	NoPlugin,
	DescriptionError,
	BadEnvironment,
}

impl Status {
	/// Shell exit code for this status.
	pub fn exit_code(self) -> i32 {
		match self {
			Status::Ok => 0,
			Status::BadArgument => -1,
			Status::BadInput => -2,
			Status::NoPlugin => -3,
			Status::DescriptionError => -4,
			Status::BadEnvironment => -5,
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Status::Ok => "ok",
			Status::BadArgument => "bad-argument",
			Status::BadInput => "bad-input",
			Status::NoPlugin => "no-plugin",
			Status::DescriptionError => "description-error",
			Status::BadEnvironment => "bad-environment",
		}
	}
}

/// Failure messages produced while loading descriptions and decoding.
#[derive(Debug, Error)]
pub enum ErrorKind {
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	#[error("invalid description file: {0}")]
	TomlParse(String),
	#[error("read error: need {need} bytes at offset {at}, {rem} remain")]
	ReadError { at: usize, need: usize, rem: usize },
	#[error("no decoder")]
	NoDecoder,
	#[error("no nested descriptor for \"{name}\"")]
	NoNestedDescriptor { name: String },
	#[error("missing required \"{key}\" key")]
	MissingKey { key: &'static str },
	#[error("\"{key}\" must be a string")]
	BadKeyType { key: &'static str },
	#[error("[description] must be a table array")]
	DescriptionNotArray,
	#[error("namespace entry \"{key}\" must be a table")]
	ExpectedTable { key: String },
	#[error("\"skip\" must be a positive byte count")]
	BadSkipCount,
	#[error("\"count\" must be an integer or a sibling field name")]
	BadCount,
	#[error("unsupported formatter \"{name}\"")]
	UnknownFormatter { name: String },
	#[error("duplicate type description \"{name}\"")]
	DuplicateType { name: String },
	#[error("detector must be a table")]
	DetectorNotTable,
	#[error("detector predicate references unknown field")]
	PredicateFieldMissing,
	#[error("detector predicate on compound field")]
	PredicateFieldCompound,
	#[error("cannot parse predicate value \"{value}\"")]
	BadPredicateValue { value: String },
	#[error("array size indicator field not found")]
	MissingSizeField,
	#[error("cannot use {label} value as array size")]
	BadSizeValue { label: &'static str },
	#[error("bitfield must fill a whole number of bytes (total {total_bits} bits)")]
	BitFieldAlignment { total_bits: usize },
	#[error("bitfield wider than 128 bits (total {total_bits} bits)")]
	BitFieldTooWide { total_bits: usize },
	#[error("bitfield member width {width} out of range")]
	BitFieldMemberWidth { width: usize },
	#[error("non-unique detectors: {first} and {second}")]
	NonUniqueDetectors { first: String, second: String },
	#[error("detector parent is not a tree")]
	ParentNotTree,
	#[error("parent tree is empty")]
	EmptyParentTree,
	#[error("no record boundary set for raw field")]
	NoRecordBoundary,
	#[error("record size {size} smaller than message header")]
	RecordTooShort { size: u64 },
	#[error("decoding \"{name}\" consumed no bytes")]
	DecodeStalled { name: String },
}

impl ErrorKind {
	fn default_status(&self) -> Status {
		match self {
			ErrorKind::Io(_)
			| ErrorKind::ReadError { .. }
			| ErrorKind::ParentNotTree
			| ErrorKind::EmptyParentTree
			| ErrorKind::NoRecordBoundary
			| ErrorKind::RecordTooShort { .. }
			| ErrorKind::DecodeStalled { .. } => Status::BadInput,
			_ => Status::DescriptionError,
		}
	}
}

/// Decode or description failure with accumulated context.
///
/// Context slots are filled as the error propagates outward; a slot set by
/// an inner frame is never overwritten, so the originator wins.
#[derive(Debug)]
pub struct PlogError {
	kind: ErrorKind,
	status: Status,
	module: Option<&'static str>,
	type_name: Option<String>,
	field: Option<String>,
	path: Option<String>,
	detector: Option<String>,
	partial: Option<Tree>,
}

impl PlogError {
	pub fn new(kind: ErrorKind) -> Self {
		let status = kind.default_status();
		Self {
			kind,
			status,
			module: None,
			type_name: None,
			field: None,
			path: None,
			detector: None,
			partial: None,
		}
	}

	/// Shorthand for a short-read failure at a stream offset.
	pub fn read_error(at: usize, need: usize, rem: usize) -> Self {
		Self::new(ErrorKind::ReadError { at, need, rem })
	}

	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	pub fn status(&self) -> Status {
		self.status
	}

	pub fn module(&self) -> Option<&str> {
		self.module
	}

	pub fn type_name(&self) -> Option<&str> {
		self.type_name.as_deref()
	}

	pub fn field(&self) -> Option<&str> {
		self.field.as_deref()
	}

	pub fn path(&self) -> Option<&str> {
		self.path.as_deref()
	}

	pub fn detector(&self) -> Option<&str> {
		self.detector.as_deref()
	}

	pub fn partial(&self) -> Option<&Tree> {
		self.partial.as_ref()
	}

	pub fn with_module(mut self, module: &'static str) -> Self {
		if self.module.is_none() {
			self.module = Some(module);
		}
		self
	}

	pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
		if self.type_name.is_none() {
			self.type_name = Some(type_name.into());
		}
		self
	}

	pub fn with_field(mut self, field: impl Into<String>) -> Self {
		if self.field.is_none() {
			self.field = Some(field.into());
		}
		self
	}

	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		if self.path.is_none() {
			self.path = Some(path.into());
		}
		self
	}

	pub fn with_detector(mut self, detector: impl Into<String>) -> Self {
		if self.detector.is_none() {
			self.detector = Some(detector.into());
		}
		self
	}

	pub fn with_partial(mut self, tree: Tree) -> Self {
		if self.partial.is_none() {
			self.partial = Some(tree);
		}
		self
	}
}

impl From<ErrorKind> for PlogError {
	fn from(kind: ErrorKind) -> Self {
		Self::new(kind)
	}
}

impl From<std::io::Error> for PlogError {
	fn from(err: std::io::Error) -> Self {
		Self::new(ErrorKind::Io(err))
	}
}

impl fmt::Display for PlogError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.kind)?;
		if let Some(module) = self.module {
			write!(f, "\n\tmodule: {module}")?;
		}
		if let Some(type_name) = &self.type_name {
			write!(f, "\n\ttype: {type_name}")?;
		}
		if let Some(field) = &self.field {
			write!(f, "\n\tfield: {field}")?;
		}
		if let Some(path) = &self.path {
			write!(f, "\n\tpath: {path}")?;
		}
		if let Some(detector) = &self.detector {
			write!(f, "\n\tdetector: {detector}")?;
		}
		if let Some(partial) = &self.partial {
			write!(f, "\n\tpartial decode: {partial}")?;
		}
		Ok(())
	}
}

impl std::error::Error for PlogError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match &self.kind {
			ErrorKind::Io(err) => Some(err),
			_ => None,
		}
	}
}
