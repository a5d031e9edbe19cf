use std::path::PathBuf;

use plogdoc_core::plog::{Catalog, PlogFile, Result, Value};

use crate::cmd::util::name_text;

/// Decode and summarize the preamble of one plog file.
pub fn run(path: PathBuf) -> Result<()> {
	let catalog = Catalog::core();
	let file = PlogFile::open(&path)?;
	let (header, offset) = file.header(&catalog)?;

	println!("path: {}", path.display());
	for name in ["version_major", "version_minor", "version_subminor", "build_date"] {
		if let Some(node) = header.get(name) {
			println!("{name}: {}", node.render());
		}
	}
	if let Some(node) = header.get("node_guid") {
		if let Value::U64(guid) = node.value {
			println!("node_guid: 0x{guid:016x}");
		}
	}

	if let Some(Value::TreeArray(modules)) = header.get("modules").map(|node| &node.value) {
		println!("modules: {}", modules.len());
		for module in modules {
			if let Some(name) = module.get("name").and_then(|node| name_text(&node.value)) {
				println!("  {name}");
			}
		}
	}
	if let Some(Value::TreeArray(supports)) = header.get("type_supports").map(|node| &node.value) {
		println!("type_supports: {}", supports.len());
	}

	let mut count = 0_usize;
	for record in file.records(&catalog, offset) {
		record?;
		count += 1;
	}
	println!("records: {count}");

	Ok(())
}
