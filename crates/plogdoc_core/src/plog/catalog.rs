use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::plog::descriptor::{lookup_terminal, ArrayType, Field, FieldType, Size, Terminal, TypeDesc};
use crate::plog::value::{Formatter, Value};
use crate::plog::{preamble, ErrorKind, PlogError, Result};

/// One payload-type detection rule.
///
/// When every predicate value equals the like-named field of a decoded
/// `parent` instance, the payload that follows is a `child`.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorEntry {
	pub parent: String,
	pub predicates: Vec<(String, Value)>,
	pub child: String,
}

/// Registry of type descriptors and detector rules, keyed by qualified name.
#[derive(Debug, Default)]
pub struct Catalog {
	types: HashMap<String, TypeDesc>,
	detectors: Vec<DetectorEntry>,
}

impl Catalog {
	/// Empty catalog.
	pub fn new() -> Self {
		Self::default()
	}

	/// Catalog pre-loaded with the fixed preamble descriptors.
	pub fn core() -> Self {
		let mut catalog = Self::new();
		for desc in preamble::core_types() {
			catalog.types.insert(desc.name.clone(), desc);
		}
		catalog
	}

	/// Register a descriptor under its qualified name.
	pub fn register(&mut self, desc: TypeDesc) -> Result<()> {
		if self.types.contains_key(&desc.name) {
			return Err(PlogError::new(ErrorKind::DuplicateType { name: desc.name.clone() })
				.with_module("description"));
		}
		self.types.insert(desc.name.clone(), desc);
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<&TypeDesc> {
		self.types.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.types.contains_key(name)
	}

	pub fn type_count(&self) -> usize {
		self.types.len()
	}

	/// Iterate registered descriptors in unspecified order.
	pub fn types(&self) -> impl Iterator<Item = &TypeDesc> {
		self.types.values()
	}

	/// Detector rules in installation order.
	pub fn detectors(&self) -> &[DetectorEntry] {
		&self.detectors
	}

	pub fn add_detector(&mut self, entry: DetectorEntry) {
		self.detectors.push(entry);
	}

	/// Resolve a formatter from the catalog's known set.
	pub fn formatter(&self, name: &str) -> Option<Formatter> {
		Formatter::by_name(name)
	}

	/// Load descriptions and detectors from TOML text.
	pub fn load_str(&mut self, text: &str) -> Result<()> {
		let table: toml::Table = text
			.parse()
			.map_err(|err: toml::de::Error| {
				PlogError::new(ErrorKind::TomlParse(err.to_string())).with_module("description")
			})?;
		self.load_table("", &table)
	}

	/// Load descriptions and detectors from a TOML file.
	pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let text = fs::read_to_string(path)
			.map_err(|err| PlogError::from(err).with_path(path.display().to_string()))?;
		self.load_str(&text)
			.map_err(|err| err.with_path(path.display().to_string()))
	}

	/// Recurse a table tree: tables without `description` are namespaces.
	fn load_table(&mut self, path: &str, table: &toml::Table) -> Result<()> {
		if !table.contains_key("description") {
			for (key, value) in table {
				let sub = value.as_table().ok_or_else(|| {
					PlogError::new(ErrorKind::ExpectedTable { key: key.clone() })
						.with_type(path)
						.with_module("description")
				})?;
				let subpath = if path.is_empty() {
					key.clone()
				} else {
					format!("{path}.{key}")
				};
				self.load_table(&subpath, sub)?;
			}
			return Ok(());
		}

		self.load_type(path, table).map_err(|err| {
			// The loader is recursive; the deepest frame owns the context.
			if err.type_name().is_none() {
				err.with_type(path).with_module("description")
			} else {
				err
			}
		})
	}

	fn load_type(&mut self, name: &str, table: &toml::Table) -> Result<()> {
		debug!(type_name = name, "loading type description");

		let entries = table
			.get("description")
			.and_then(|value| value.as_array())
			.ok_or(ErrorKind::DescriptionNotArray)?;

		let mut fields = Vec::with_capacity(entries.len());
		let mut skip_order: u16 = 0;

		for entry in entries {
			let entry = entry.as_table().ok_or(ErrorKind::DescriptionNotArray)?;

			if let Some(skip) = entry.get("skip") {
				let size = skip
					.as_integer()
					.filter(|count| *count > 0)
					.ok_or(ErrorKind::BadSkipCount)?;
				skip_order += 1;
				fields.push(Field::new(
					format!("skip-{skip_order}"),
					FieldType::Skip {
						size: size as usize,
						order: skip_order,
					},
				));
				continue;
			}

			fields.push(parse_field_entry(self, entry)?);
		}

		let desc = TypeDesc::new(name, fields);

		let detectors = match table.get("detector") {
			Some(section) => parse_detectors(&desc, section)?,
			None => Vec::new(),
		};

		self.register(desc)?;
		self.detectors.extend(detectors);
		Ok(())
	}
}

fn parse_field_entry(catalog: &Catalog, entry: &toml::Table) -> Result<Field> {
	let fname = require_str(entry, "name")?;
	let ftype = require_str(entry, "type")?;

	let mut field = if let Some(count) = entry.get("count") {
		let size = parse_count(count)?;
		let elem = match lookup_terminal(ftype) {
			Some(term) => ArrayType::Terminal(term),
			None => ArrayType::Nested(ftype.to_owned()),
		};
		Field::array(fname, size, elem)
	} else {
		match lookup_terminal(ftype) {
			Some(term) => Field::new(fname, FieldType::Terminal(term)),
			None => Field::nested(fname, ftype),
		}
	};

	// Presence of the key alone selects big-endian.
	if entry.contains_key("endian") {
		field = field.big_endian();
	}

	if let Some(format) = entry.get("format") {
		let format_name = format.as_str().ok_or(ErrorKind::BadKeyType { key: "format" })?;
		let formatter = catalog.formatter(format_name).ok_or_else(|| {
			PlogError::new(ErrorKind::UnknownFormatter {
				name: format_name.to_owned(),
			})
			.with_field(fname)
		})?;
		field = field.formatted(formatter);
	}

	Ok(field)
}

fn parse_count(count: &toml::Value) -> Result<Size> {
	if let Some(fixed) = count.as_integer() {
		let fixed = usize::try_from(fixed).map_err(|_| ErrorKind::BadCount)?;
		return Ok(Size::Fixed(fixed));
	}
	if let Some(sibling) = count.as_str() {
		return Ok(Size::Field(sibling.to_owned()));
	}
	Err(ErrorKind::BadCount.into())
}

fn require_str<'a>(entry: &'a toml::Table, key: &'static str) -> Result<&'a str> {
	entry
		.get(key)
		.ok_or(ErrorKind::MissingKey { key })?
		.as_str()
		.ok_or_else(|| ErrorKind::BadKeyType { key }.into())
}

fn parse_detectors(desc: &TypeDesc, section: &toml::Value) -> Result<Vec<DetectorEntry>> {
	let section = section.as_table().ok_or(ErrorKind::DetectorNotTable)?;
	let mut entries = Vec::with_capacity(section.len());

	for (child, predicates) in section {
		let predicates = predicates
			.as_table()
			.ok_or_else(|| PlogError::new(ErrorKind::DetectorNotTable).with_detector(child.clone()))?;

		let mut coerced = Vec::with_capacity(predicates.len());
		for (field_name, raw) in predicates {
			let field = desc.field(field_name).ok_or_else(|| {
				PlogError::new(ErrorKind::PredicateFieldMissing)
					.with_field(field_name.clone())
					.with_detector(child.clone())
			})?;

			// Branching is only supported on terminal fields.
			let FieldType::Terminal(term) = &field.kind else {
				return Err(PlogError::new(ErrorKind::PredicateFieldCompound)
					.with_field(field_name.clone())
					.with_detector(child.clone()));
			};

			let text = raw.as_str().ok_or_else(|| {
				PlogError::new(ErrorKind::BadPredicateValue { value: raw.to_string() })
					.with_field(field_name.clone())
			})?;
			let value = coerce_predicate(text, *term)
				.map_err(|err| err.with_field(field_name.clone()).with_detector(child.clone()))?;
			coerced.push((field_name.clone(), value));
		}

		debug!(parent = %desc.name, child = %child, "installed detector");
		entries.push(DetectorEntry {
			parent: desc.name.clone(),
			predicates: coerced,
			child: child.clone(),
		});
	}

	Ok(entries)
}

/// Coerce a predicate string to the terminal type of the referenced field.
///
/// A `0x` prefix selects hexadecimal; anything else parses as decimal.
fn coerce_predicate(text: &str, term: Terminal) -> Result<Value> {
	let bad = || PlogError::new(ErrorKind::BadPredicateValue { value: text.to_owned() });

	let value = match term {
		Terminal::UInt8 => Value::U8(u8::try_from(parse_u64(text).ok_or_else(bad)?).map_err(|_| bad())?),
		Terminal::UInt16 => Value::U16(u16::try_from(parse_u64(text).ok_or_else(bad)?).map_err(|_| bad())?),
		Terminal::UInt32 => Value::U32(u32::try_from(parse_u64(text).ok_or_else(bad)?).map_err(|_| bad())?),
		Terminal::UInt64 => Value::U64(parse_u64(text).ok_or_else(bad)?),
		Terminal::Int8 => Value::I8(i8::try_from(parse_i64(text).ok_or_else(bad)?).map_err(|_| bad())?),
		Terminal::Int16 => Value::I16(i16::try_from(parse_i64(text).ok_or_else(bad)?).map_err(|_| bad())?),
		Terminal::Int32 => Value::I32(i32::try_from(parse_i64(text).ok_or_else(bad)?).map_err(|_| bad())?),
		Terminal::Int64 => Value::I64(parse_i64(text).ok_or_else(bad)?),
		Terminal::Float32 => Value::F32(text.parse().map_err(|_| bad())?),
		Terminal::Float64 => Value::F64(text.parse().map_err(|_| bad())?),
	};
	Ok(value)
}

fn parse_u64(text: &str) -> Option<u64> {
	if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
		u64::from_str_radix(hex, 16).ok()
	} else {
		text.parse().ok()
	}
}

fn parse_i64(text: &str) -> Option<i64> {
	if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
		i64::from_str_radix(hex, 16).ok()
	} else {
		text.parse().ok()
	}
}
