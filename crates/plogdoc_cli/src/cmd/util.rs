use std::path::PathBuf;

use plogdoc_core::plog::{ArrayType, ByteOrder, Catalog, Field, FieldType, Result, Size, Tree, Value};

/// Build a catalog from the core preamble plus description files.
pub(crate) fn load_catalog(describe: &[PathBuf]) -> Result<Catalog> {
	let mut catalog = Catalog::core();
	for path in describe {
		catalog.load_file(path)?;
	}
	tracing::info!(
		types = catalog.type_count(),
		detectors = catalog.detectors().len(),
		"catalog loaded"
	);
	Ok(catalog)
}

/// Render a field's layout as a compact one-line label.
pub(crate) fn render_field(field: &Field) -> String {
	let mut label = match &field.kind {
		FieldType::Terminal(term) => term.name().to_owned(),
		FieldType::Nested(name) => name.clone(),
		FieldType::Array(array) => {
			let elem = match &array.elem {
				ArrayType::Terminal(term) => term.name().to_owned(),
				ArrayType::Nested(name) => name.clone(),
			};
			match &array.size {
				Size::Fixed(count) => format!("{elem}[{count}]"),
				Size::Field(sibling) => format!("{elem}[{sibling}]"),
			}
		}
		FieldType::BitField(bits) => format!("bitfield({} bits)", bits.total_bits()),
		FieldType::Skip { size, .. } => format!("skip({size})"),
	};

	if field.byteorder == ByteOrder::Big {
		label.push_str(" be");
	}
	if let Some(format) = field.format {
		label.push_str(" format=");
		label.push_str(format.name());
	}
	label
}

/// Print a decoded tree with two-space indentation per nesting level.
pub(crate) fn print_tree(tree: &Tree, indent: usize) {
	for node in tree.iter() {
		match &node.value {
			Value::Tree(sub) => {
				println!("{:indent$}{}:", "", node.name);
				print_tree(sub, indent + 2);
			}
			Value::TreeArray(subs) => {
				for (index, sub) in subs.iter().enumerate() {
					println!("{:indent$}{}[{index}]:", "", node.name);
					print_tree(sub, indent + 2);
				}
			}
			_ => println!("{:indent$}{}", "", node),
		}
	}
}

/// Convert a decoded tree to JSON, preserving node order.
pub(crate) fn tree_to_json(tree: &Tree) -> serde_json::Value {
	let mut map = serde_json::Map::new();
	for node in tree.iter() {
		map.insert(node.name.clone(), value_to_json(&node.value));
	}
	serde_json::Value::Object(map)
}

fn value_to_json(value: &Value) -> serde_json::Value {
	match value {
		Value::I8(v) => serde_json::json!(v),
		Value::I16(v) => serde_json::json!(v),
		Value::I32(v) => serde_json::json!(v),
		Value::I64(v) => serde_json::json!(v),
		Value::U8(v) => serde_json::json!(v),
		Value::U16(v) => serde_json::json!(v),
		Value::U32(v) => serde_json::json!(v),
		Value::U64(v) => serde_json::json!(v),
		Value::F32(v) => serde_json::json!(v),
		Value::F64(v) => serde_json::json!(v),
		// JSON numbers cannot hold 128 bits; render as hex text.
		Value::Hash(v) => serde_json::json!(format!("0x{v:x}")),
		Value::Bytes(bytes) => serde_json::json!(bytes),
		Value::Tree(tree) => tree_to_json(tree),
		Value::TreeArray(trees) => {
			serde_json::Value::Array(trees.iter().map(tree_to_json).collect())
		}
	}
}

/// Decode a length-prefixed name subtree to printable text.
pub(crate) fn name_text(value: &Value) -> Option<String> {
	let Value::Tree(tree) = value else {
		return None;
	};
	let Value::Bytes(bytes) = &tree.get("value")?.value else {
		return None;
	};
	Some(String::from_utf8_lossy(bytes).into_owned())
}
