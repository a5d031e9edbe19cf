use std::path::PathBuf;

use plogdoc_core::plog::{ErrorKind, PlogError, Result};

use crate::cmd::util::{load_catalog, render_field};

/// List loaded descriptors, or print one type's field table.
pub fn run(describe: Vec<PathBuf>, type_name: Option<String>) -> Result<()> {
	let catalog = load_catalog(&describe)?;

	let Some(name) = type_name else {
		let mut names: Vec<&str> = catalog.types().map(|desc| desc.name.as_str()).collect();
		names.sort_unstable();
		for name in names {
			println!("{name}");
		}
		return Ok(());
	};

	let desc = catalog
		.get(&name)
		.ok_or_else(|| PlogError::new(ErrorKind::NoDecoder).with_type(name.clone()))?;

	println!("type: {}", desc.name);
	println!("field_count: {}", desc.fields.len());
	for field in &desc.fields {
		println!("  {} {}", render_field(field), field.name);
	}

	Ok(())
}
